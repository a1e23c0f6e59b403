//! ID generation utilities.

use ulid::Ulid;
use uuid::Uuid;

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are:
    /// - Lexicographically sortable
    /// - Monotonically increasing within the same millisecond
    /// - Shorter than UUIDs when represented as strings
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate a new UUID v7-based ID.
    ///
    /// UUID v7 is time-ordered and suitable for database primary keys.
    #[must_use]
    pub fn generate_uuid_v7(&self) -> String {
        Uuid::now_v7().to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ulid() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_eq!(id1.len(), 26);
        assert_eq!(id2.len(), 26);
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_generate_uuid_v7() {
        let id_gen = IdGenerator::new();
        let id = id_gen.generate_uuid_v7();

        assert_eq!(id.len(), 36); // UUID with hyphens
        assert!(id.starts_with('0')); // UUID v7 starts with version nibble
    }

    #[test]
    fn test_ids_fit_primary_key_columns() {
        let id_gen = IdGenerator::new();
        assert!(id_gen.generate().len() <= 64);
        assert!(id_gen.generate_uuid_v7().len() <= 64);
    }
}
