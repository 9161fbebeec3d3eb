//! Content hashing for atoms.

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::model::ContentHash;

/// Which digests to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashOptions {
    pub md5: bool,
    pub sha1: bool,
    pub sha256: bool,
}

impl HashOptions {
    /// All digests enabled.
    pub fn all() -> Self {
        Self {
            md5: true,
            sha1: true,
            sha256: true,
        }
    }

    /// No digests.
    pub fn none() -> Self {
        Self {
            md5: false,
            sha1: false,
            sha256: false,
        }
    }

    /// Only SHA-256.
    pub fn sha256_only() -> Self {
        Self {
            sha256: true,
            ..Self::none()
        }
    }
}

impl Default for HashOptions {
    fn default() -> Self {
        Self::all()
    }
}

/// Computes [`ContentHash`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentHasher {
    options: HashOptions,
}

impl ContentHasher {
    /// Create a hasher computing the selected digests.
    pub fn new(options: HashOptions) -> Self {
        Self { options }
    }

    /// Hash raw bytes.
    pub fn hash_bytes(&self, data: &[u8]) -> ContentHash {
        ContentHash {
            md5: self.options.md5.then(|| digest_hex::<Md5>(data)),
            sha1: self.options.sha1.then(|| digest_hex::<Sha1>(data)),
            sha256: self.options.sha256.then(|| digest_hex::<Sha256>(data)),
        }
    }

    /// Hash UTF-8 text.
    pub fn hash_text(&self, text: &str) -> ContentHash {
        self.hash_bytes(text.as_bytes())
    }

    /// Hash list items, separated by newlines.
    pub fn hash_items(&self, items: &[String]) -> ContentHash {
        self.hash_text(&items.join("\n"))
    }

    /// Hash table cells: tabs between cells, newlines between rows.
    pub fn hash_rows(&self, rows: &[Vec<String>]) -> ContentHash {
        let text = rows
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n");
        self.hash_text(&text)
    }
}

fn digest_hex<D: Digest>(data: &[u8]) -> String {
    let mut hasher = D::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digests() {
        let hash = ContentHasher::default().hash_text("abc");
        assert_eq!(hash.md5.as_deref(), Some("900150983cd24fb0d6963f7d28e17f72"));
        assert_eq!(
            hash.sha1.as_deref(),
            Some("a9993e364706816aba3e25717850c26c9cd0d89d")
        );
        assert_eq!(
            hash.sha256.as_deref(),
            Some("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
    }

    #[test]
    fn test_disabled_digests() {
        let hash = ContentHasher::new(HashOptions::sha256_only()).hash_bytes(b"x");
        assert!(hash.md5.is_none());
        assert!(hash.sha1.is_none());
        assert!(hash.sha256.is_some());

        let hash = ContentHasher::new(HashOptions::none()).hash_bytes(b"x");
        assert_eq!(hash, ContentHash::default());
    }

    #[test]
    fn test_structured_hashes_match_joined_text() {
        let hasher = ContentHasher::default();
        let items = vec!["a".to_string(), "b".to_string()];
        assert_eq!(hasher.hash_items(&items), hasher.hash_text("a\nb"));

        let rows = vec![vec!["A".to_string(), "B".to_string()], vec!["C".to_string(), "D".to_string()]];
        assert_eq!(hasher.hash_rows(&rows), hasher.hash_text("A\tB\nC\tD"));
    }
}
