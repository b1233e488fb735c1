//! Issuer name chaining against a supplied issuing CA.

use crate::finding::Findings;
use crate::registry::{CertData, Filter, RegistryBuilder};

pub fn register(builder: &mut RegistryBuilder) {
    builder.certificate_check("Issuer DN Check", Filter::Always, check);
}

/// Byte-exact comparison; passes when no issuer was supplied.
pub fn check(data: &CertData<'_>) -> Findings {
    let mut findings = Findings::new();
    if let Some(issuer) = data.issuer {
        if data.cert.issuer.raw != issuer.subject.raw {
            findings.err(
                "Certificate Issuer Distinguished Name field MUST match the Subject DN of the Issuing CA",
            );
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::{CertType, Certificate, DistinguishedName};

    fn name(raw: &[u8]) -> DistinguishedName {
        DistinguishedName {
            attributes: Vec::new(),
            raw: raw.to_vec(),
        }
    }

    #[test]
    fn test_issuer_chaining() {
        let leaf = Certificate {
            issuer: name(&[0x30, 0x03, 0x31, 0x01, 0x00]),
            ..Certificate::default()
        };
        let good_ca = Certificate {
            subject: name(&[0x30, 0x03, 0x31, 0x01, 0x00]),
            ..Certificate::default()
        };
        let other_ca = Certificate {
            subject: name(&[0x30, 0x00]),
            ..Certificate::default()
        };

        let data = CertData::new(&leaf, CertType::Dv);
        assert!(check(&data).is_empty());
        assert!(check(&data.with_issuer(Some(&good_ca))).is_empty());
        assert!(check(&data.with_issuer(Some(&other_ca))).is_error());
    }
}
