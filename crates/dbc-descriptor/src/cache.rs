use std::collections::HashMap;
use std::sync::Arc;

use dbc_types::{erasure, Type};
use parking_lot::RwLock;

use crate::binary::to_binary_descriptor;
use crate::error::Result;

/// Memoised binary descriptors, keyed by erased type.
///
/// Safe to share between threads. Two threads racing on the same key both compute the descriptor
/// and the second insert keeps the first value; rendering is deterministic so either is correct.
#[derive(Debug, Default)]
pub struct DescriptorCache {
    entries: RwLock<HashMap<Type, Arc<str>>>,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn descriptor(&self, ty: &Type) -> Result<Arc<str>> {
        let key = erasure(ty);
        if let Some(hit) = self.entries.read().get(&key) {
            return Ok(Arc::clone(hit));
        }

        let rendered: Arc<str> = Arc::from(to_binary_descriptor(&key)?);
        let mut entries = self.entries.write();
        Ok(Arc::clone(entries.entry(key).or_insert(rendered)))
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
