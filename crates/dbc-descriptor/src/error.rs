use thiserror::Error;

pub type Result<T> = std::result::Result<T, DescriptorError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// The type model handed us a shape we can't render. Always an upstream defect.
    #[error("unsupported type shape: {shape}")]
    UnsupportedTypeShape { shape: String },
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),
}

impl DescriptorError {
    pub(crate) fn shape(shape: impl Into<String>) -> Self {
        DescriptorError::UnsupportedTypeShape {
            shape: shape.into(),
        }
    }
}
