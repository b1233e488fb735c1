//! Certificate policy OID → type code table.

use crate::certificate::CertType;

/// Known certificate policy identifiers and the type they imply.
pub const POLICY_TYPES: &[(&str, CertType)] = &[
    // ── GlobalSign CP: Extended Validation ──
    ("1.3.6.1.4.1.4146.1.1", CertType::Ev),
    ("1.3.6.1.4.1.4146.1.2", CertType::Cs), // EV code signing
    // ── GlobalSign CP: Domain / Organization Validation ──
    ("1.3.6.1.4.1.4146.1.10", CertType::Dv),
    ("1.3.6.1.4.1.4146.1.10.10", CertType::Dv), // AlphaSSL
    ("1.3.6.1.4.1.4146.1.20", CertType::Ov),
    ("1.3.6.1.4.1.4146.1.21", CertType::Excluded), // untrusted test certificates
    // ── GlobalSign CP: Time Stamping ──
    ("1.3.6.1.4.1.4146.1.30", CertType::Ts),
    ("1.3.6.1.4.1.4146.1.31", CertType::Ts), // AATL
    // ── GlobalSign CP: Client certificates ──
    ("1.3.6.1.4.1.4146.1.40", CertType::Ps),
    ("1.3.6.1.4.1.4146.1.40.10", CertType::Ps),
    ("1.3.6.1.4.1.4146.1.40.20", CertType::Ps),
    ("1.3.6.1.4.1.4146.1.40.30", CertType::Ps),
    ("1.3.6.1.4.1.4146.1.40.40", CertType::Ps),
    ("1.3.6.1.4.1.4146.1.40.30.2", CertType::Ps), // AATL Adobe
    // ── GlobalSign CP: Code Signing ──
    ("1.3.6.1.4.1.4146.1.50", CertType::Cs),
    // ── GlobalSign CP: CA chaining and cross signing ──
    ("1.3.6.1.4.1.4146.1.60", CertType::Ca),
    ("1.3.6.1.4.1.4146.1.60.1", CertType::Ca),
    // ── CA/Browser Forum ──
    ("2.23.140.1.1", CertType::Ev),
    ("2.23.140.1.3", CertType::Cs), // EV code signing
    ("2.23.140.1.4", CertType::Cs),
    ("2.23.140.1.2.1", CertType::Dv),
    ("2.23.140.1.2.2", CertType::Ov),
    ("2.23.140.1.2.3", CertType::Iv),
    // ── Document signing ──
    ("1.2.840.113583.1.2.1", CertType::Ps), // Adobe PDF
    ("1.2.840.113583.1.2.2", CertType::Ps), // Adobe PDF test
    ("1.2.392.200063.30.5300", CertType::Ps), // JCAN
];

/// Type implied by a single policy OID.
pub fn lookup(policy_oid: &str) -> Option<CertType> {
    POLICY_TYPES
        .iter()
        .find(|(oid, _)| *oid == policy_oid)
        .map(|(_, t)| *t)
}

/// Type implied by the first recognized OID in `policies`.
pub fn first_match<S: AsRef<str>>(policies: &[S]) -> Option<CertType> {
    policies.iter().find_map(|p| lookup(p.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("2.23.140.1.2.2"), Some(CertType::Ov));
        assert_eq!(lookup("1.3.6.1.4.1.4146.1.21"), Some(CertType::Excluded));
        assert_eq!(lookup("2.23.140.1.2"), None);
    }

    #[test]
    fn test_first_match_skips_unknown() {
        let policies = ["1.2.3.4", "2.23.140.1.1", "2.23.140.1.2.1"];
        assert_eq!(first_match(&policies), Some(CertType::Ev));
        assert_eq!(first_match::<&str>(&[]), None);
    }

    #[test]
    fn test_table_has_no_duplicates() {
        for (i, (a, _)) in POLICY_TYPES.iter().enumerate() {
            assert!(
                POLICY_TYPES.iter().skip(i + 1).all(|(b, _)| a != b),
                "duplicate policy {}",
                a
            );
        }
    }
}
