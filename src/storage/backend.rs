//! Storage backend trait.
//!
//! Pinnote persists through a key-value text store:
//! - `FileBackend` - one JSON file per key in a data directory (default)
//! - `MemoryBackend` - in-process map, for tests and embedding

use crate::Result;

/// Trait for storage backends that handle raw text persistence.
pub trait StorageBackend {
    /// Read the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Get the storage location description (for display purposes).
    fn location(&self) -> String;

    /// Get the backend type name.
    fn backend_type(&self) -> &'static str;
}

/// Available storage backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// Files under the data directory (default)
    File,
    /// Volatile in-process storage
    Memory,
}

impl BackendType {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Memory => "memory",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_type_as_str() {
        assert_eq!(BackendType::File.as_str(), "file");
        assert_eq!(BackendType::Memory.as_str(), "memory");
    }
}
