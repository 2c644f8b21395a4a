//! Parser for type names as they appear in binding expressions and imports:
//! `int`, `String`, `java.util.Map<K,java.util.List<? extends V>>[]`, `java.util.Map.Entry`.

use dbc_types::PrimitiveType;

/// Unresolved syntax tree of a type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TypeName {
    Primitive(PrimitiveType),
    /// Dotted segments; any segment may carry type arguments.
    Named(Vec<Segment>),
    Array(Box<TypeName>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Segment {
    pub ident: String,
    pub args: Vec<TypeArg>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TypeArg {
    Type(TypeName),
    Wildcard,
    Extends(TypeName),
    Super(TypeName),
}

impl TypeName {
    /// The dotted name without type arguments, e.g. `java.util.List` for `java.util.List<T>[]`.
    pub(crate) fn plain_name(&self) -> String {
        match self {
            TypeName::Primitive(p) => p.name().to_string(),
            TypeName::Named(segments) => segments
                .iter()
                .map(|s| s.ident.as_str())
                .collect::<Vec<_>>()
                .join("."),
            TypeName::Array(component) => component.plain_name(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    Dot,
    Lt,
    Gt,
    Comma,
    Question,
    LBracket,
    RBracket,
}

fn tokenize(text: &str) -> Result<Vec<Token<'_>>, String> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            '.' => Token::Dot,
            '<' => Token::Lt,
            '>' => Token::Gt,
            ',' => Token::Comma,
            '?' => Token::Question,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            c if is_ident_start(c) => {
                let mut end = start + c.len_utf8();
                while let Some(&(idx, next)) = chars.peek() {
                    if !is_ident_part(next) {
                        break;
                    }
                    end = idx + next.len_utf8();
                    chars.next();
                }
                Token::Ident(&text[start..end])
            }
            other => return Err(format!("unexpected character `{other}`")),
        };
        tokens.push(token);
    }
    Ok(tokens)
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Parse `text` into a [`TypeName`]. Errors carry a human readable reason.
pub(crate) fn parse_type_name(text: &str) -> Result<TypeName, String> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err("empty type name".to_string());
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let ty = parser.parse_type()?;
    match parser.peek() {
        None => Ok(ty),
        Some(token) => Err(format!("unexpected {} after type", describe(token))),
    }
}

/// Deepest type-argument nesting accepted before the name is rejected.
const MAX_ARGUMENT_DEPTH: usize = 128;

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: Token<'_>) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_ident(&mut self) -> Result<&'a str, String> {
        match self.bump() {
            Some(Token::Ident(ident)) => Ok(ident),
            Some(other) => Err(format!("expected identifier, found {}", describe(other))),
            None => Err("expected identifier, found end of input".to_string()),
        }
    }

    fn parse_type(&mut self) -> Result<TypeName, String> {
        let first = self.expect_ident()?;
        let mut ty = match PrimitiveType::from_name(first) {
            Some(p) => {
                if matches!(self.peek(), Some(Token::Dot | Token::Lt)) {
                    return Err(format!("primitive type `{first}` cannot be qualified"));
                }
                TypeName::Primitive(p)
            }
            None => self.parse_named(first)?,
        };

        while self.eat(Token::LBracket) {
            if !self.eat(Token::RBracket) {
                return Err("expected `]`".to_string());
            }
            if matches!(ty, TypeName::Primitive(PrimitiveType::Void)) {
                return Err("array of void".to_string());
            }
            ty = TypeName::Array(Box::new(ty));
        }
        Ok(ty)
    }

    fn parse_named(&mut self, first: &'a str) -> Result<TypeName, String> {
        let mut segments = vec![self.parse_segment(first)?];
        while self.eat(Token::Dot) {
            let ident = self.expect_ident()?;
            if PrimitiveType::from_name(ident).is_some() {
                return Err(format!("`{ident}` is not a valid name segment"));
            }
            segments.push(self.parse_segment(ident)?);
        }
        Ok(TypeName::Named(segments))
    }

    fn parse_segment(&mut self, ident: &'a str) -> Result<Segment, String> {
        let mut args = Vec::new();
        if self.eat(Token::Lt) {
            if self.depth >= MAX_ARGUMENT_DEPTH {
                return Err(format!(
                    "type arguments nested deeper than {MAX_ARGUMENT_DEPTH} levels"
                ));
            }
            self.depth += 1;
            loop {
                args.push(self.parse_arg()?);
                if self.eat(Token::Comma) {
                    continue;
                }
                if self.eat(Token::Gt) {
                    break;
                }
                return Err("expected `,` or `>` in type arguments".to_string());
            }
            self.depth -= 1;
        }
        Ok(Segment {
            ident: ident.to_string(),
            args,
        })
    }

    fn parse_arg(&mut self) -> Result<TypeArg, String> {
        if !self.eat(Token::Question) {
            let ty = self.parse_type()?;
            return match ty {
                TypeName::Primitive(p) => {
                    Err(format!("primitive type `{}` used as a type argument", p.name()))
                }
                ty => Ok(TypeArg::Type(ty)),
            };
        }

        match self.peek() {
            Some(Token::Ident("extends")) => {
                self.pos += 1;
                Ok(TypeArg::Extends(self.parse_reference_bound()?))
            }
            Some(Token::Ident("super")) => {
                self.pos += 1;
                Ok(TypeArg::Super(self.parse_reference_bound()?))
            }
            _ => Ok(TypeArg::Wildcard),
        }
    }

    fn parse_reference_bound(&mut self) -> Result<TypeName, String> {
        match self.parse_type()? {
            TypeName::Primitive(p) => Err(format!("primitive type `{}` used as a bound", p.name())),
            ty => Ok(ty),
        }
    }
}

fn describe(token: Token<'_>) -> String {
    match token {
        Token::Ident(ident) => format!("`{ident}`"),
        Token::Dot => "`.`".to_string(),
        Token::Lt => "`<`".to_string(),
        Token::Gt => "`>`".to_string(),
        Token::Comma => "`,`".to_string(),
        Token::Question => "`?`".to_string(),
        Token::LBracket => "`[`".to_string(),
        Token::RBracket => "`]`".to_string(),
    }
}
