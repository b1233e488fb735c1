//! Names that are, or directly wildcard, a public suffix.

use crate::certificate::CertType;
use crate::finding::Findings;
use crate::registry::{CertData, Filter, RegistryBuilder};

pub fn register(builder: &mut RegistryBuilder) {
    builder.certificate_check(
        "Public Suffix (xTLD) Check",
        Filter::Only(CertType::TLS_SERVER),
        check,
    );
}

/// The public suffix `name` covers entirely, if any.
fn covered_suffix(name: &str) -> Option<String> {
    let lower = name.to_ascii_lowercase();
    let suffix = psl::suffix(lower.as_bytes()).filter(|s| s.is_known())?;
    let suffix = std::str::from_utf8(suffix.as_bytes()).ok()?.to_string();
    let wildcard = format!("*.{}", suffix);
    (lower == suffix || lower == wildcard).then_some(suffix)
}

pub fn check(data: &CertData<'_>) -> Findings {
    let mut findings = Findings::new();
    let cn = data.cert.common_name();
    if !cn.is_empty() {
        if let Some(suffix) = covered_suffix(cn) {
            findings.err(format!(
                "Certificate CommonName '{}' equals '{}' from the public suffix list",
                cn, suffix
            ));
        }
    }
    for name in &data.cert.dns_names {
        if let Some(suffix) = covered_suffix(name) {
            findings.err(format!(
                "Certificate subjectAltName '{}' equals '{}' from the public suffix list",
                name, suffix
            ));
        }
    }
    findings
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::certificate::{Certificate, DistinguishedName};
    use crate::oid;

    #[test]
    fn test_public_suffix_names() {
        let c = Certificate {
            subject: DistinguishedName::from_pairs([(oid::COMMON_NAME, "*.com")]),
            dns_names: ["*.com", "com", "*.co.uk", "gov.uk", "*.eu.com"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ..Certificate::default()
        };
        let f = check(&CertData::new(&c, CertType::Dv));
        assert_eq!(f.len(), 6, "{:?}", f);
        assert_eq!(
            f.as_slice()[0].message,
            "Certificate CommonName '*.com' equals 'com' from the public suffix list"
        );
    }

    #[test]
    fn test_registrable_names_pass() {
        let c = Certificate {
            subject: DistinguishedName::from_pairs([(oid::COMMON_NAME, "*.example.com")]),
            dns_names: vec!["example.co.uk".into(), "WWW.Example.COM".into()],
            ..Certificate::default()
        };
        assert!(check(&CertData::new(&c, CertType::Ov)).is_empty());
    }
}
