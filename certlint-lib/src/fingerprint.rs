//! Certificate fingerprints.

use digest::Digest;
use sha2::Sha256;

/// SHA-256 over the certificate DER as colon-separated uppercase hex
/// (e.g. `AB:CD:EF:...`).
pub fn sha256_fingerprint(der_bytes: &[u8]) -> String {
    Sha256::digest(der_bytes)
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_digest() {
        let fp = sha256_fingerprint(b"");
        assert!(fp.starts_with("E3:B0:C4:42:98:FC:1C:14"));
        assert_eq!(fp.len(), 32 * 3 - 1);
    }
}
