//! ID generation utilities.

use rand::{Rng, distributions::Alphanumeric};
use ulid::Ulid;
use uuid::Uuid;

/// Length of the random suffix appended to listing slugs.
pub const SLUG_SUFFIX_LEN: usize = 6;

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
    /// ULIDs are lexicographically sortable and shorter than UUIDs.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate a session token.
    #[must_use]
    pub fn generate_token(&self) -> String {
        // No time component, unlike v7
        Uuid::new_v4().simple().to_string()
    }

    /// Generate a random lowercase alphanumeric suffix for slugs.
    #[must_use]
    pub fn generate_slug_suffix(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SLUG_SUFFIX_LEN)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ulid() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_eq!(id1.len(), 26);
        assert_ne!(id1, id2);
        assert_eq!(id1, id1.to_lowercase());
    }

    #[test]
    fn test_generate_token() {
        let token = IdGenerator::new().generate_token();

        assert_eq!(token.len(), 32);
    }

    #[test]
    fn test_slug_suffix() {
        let suffix = IdGenerator::new().generate_slug_suffix();

        assert_eq!(suffix.len(), SLUG_SUFFIX_LEN);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
        );
    }
}
