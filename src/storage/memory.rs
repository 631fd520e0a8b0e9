//! In-memory storage backend.

use super::backend::{BackendType, StorageBackend};
use crate::Result;
use std::collections::HashMap;

/// Storage backend that keeps values in a map. Contents are lost on drop.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    values: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-populated with one value.
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut backend = Self::new();
        backend.values.insert(key.to_string(), value.to_string());
        backend
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }

    fn backend_type(&self) -> &'static str {
        BackendType::Memory.as_str()
    }
}
