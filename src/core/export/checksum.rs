//! Output checksums
//!
//! Every serialised output notebook gets a SHA-256 digest, recorded in the
//! export summary. Projection is deterministic, so two runs over unchanged
//! sources report identical checksums.

use sha2::{Digest, Sha256};

/// Calculate SHA-256 checksum of raw bytes
///
/// Returns a hex-encoded SHA-256 checksum string (64 characters).
///
/// # Examples
///
/// ```
/// use nbexport::core::export::checksum::calculate_checksum_bytes;
///
/// let checksum = calculate_checksum_bytes(b"{}\n");
/// assert_eq!(checksum.len(), 64);
/// ```
pub fn calculate_checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    format!("{result:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_checksum_bytes() {
        let checksum = calculate_checksum_bytes(b"Hello, World!");

        assert_eq!(checksum.len(), 64);
        assert!(checksum.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_known_value() {
        assert_eq!(
            calculate_checksum_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_different_content() {
        assert_ne!(calculate_checksum_bytes(b"a"), calculate_checksum_bytes(b"b"));
    }
}
