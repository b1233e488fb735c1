//! Extended key usages permitted per certificate type.

use crate::certificate::{CertType, ExtKeyUsage};
use crate::finding::Findings;
use crate::registry::{CertData, Filter, RegistryBuilder};

const TYPES: &[CertType] = &[
    CertType::Dv,
    CertType::Ov,
    CertType::Ev,
    CertType::Ps,
    CertType::Cs,
];

pub fn register(builder: &mut RegistryBuilder) {
    builder.certificate_check("Extended Key Usage Check", Filter::Only(TYPES), check);
}

fn allowed(cert_type: CertType, usage: &ExtKeyUsage) -> bool {
    match cert_type {
        CertType::Dv | CertType::Ov | CertType::Ev => matches!(
            usage,
            ExtKeyUsage::ServerAuth
                | ExtKeyUsage::ClientAuth
                | ExtKeyUsage::MicrosoftServerGatedCrypto
        ),
        CertType::Ps => matches!(
            usage,
            ExtKeyUsage::ClientAuth | ExtKeyUsage::EmailProtection
        ),
        CertType::Cs => matches!(usage, ExtKeyUsage::CodeSigning),
        _ => true,
    }
}

fn violation_message(cert_type: CertType) -> &'static str {
    match cert_type {
        CertType::Ps => "Certificate contains a key usage different from ClientAuth or EmailProtection",
        CertType::Cs => "Certificate contains a key usage different from CodeSigning",
        _ => "Certificate contains a key usage different from ServerAuth, ClientAuth or ServerGatedCrypto",
    }
}

/// Reports at most one finding: the first disallowed usage decides.
pub fn check(data: &CertData<'_>) -> Findings {
    let mut findings = Findings::new();
    if data
        .cert
        .ext_key_usage
        .iter()
        .any(|usage| !allowed(data.cert_type, usage))
    {
        findings.err(violation_message(data.cert_type));
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::Certificate;

    fn cert(usages: Vec<ExtKeyUsage>) -> Certificate {
        Certificate {
            ext_key_usage: usages,
            ..Certificate::default()
        }
    }

    #[test]
    fn test_tls_usages() {
        let c = cert(vec![ExtKeyUsage::ServerAuth, ExtKeyUsage::ClientAuth]);
        assert!(check(&CertData::new(&c, CertType::Ev)).is_empty());

        let c = cert(vec![
            ExtKeyUsage::ServerAuth,
            ExtKeyUsage::CodeSigning,
            ExtKeyUsage::EmailProtection,
        ]);
        let f = check(&CertData::new(&c, CertType::Dv));
        assert_eq!(f.len(), 1);
    }

    #[test]
    fn test_personal_usages() {
        let c = cert(vec![ExtKeyUsage::EmailProtection, ExtKeyUsage::ClientAuth]);
        assert!(check(&CertData::new(&c, CertType::Ps)).is_empty());

        let c = cert(vec![ExtKeyUsage::Other("1.3.6.1.4.1.311.10.3.12".into())]);
        assert!(check(&CertData::new(&c, CertType::Ps)).is_error());
    }

    #[test]
    fn test_code_signing_usages() {
        let c = cert(vec![ExtKeyUsage::CodeSigning, ExtKeyUsage::TimeStamping]);
        let f = check(&CertData::new(&c, CertType::Cs));
        assert!(f
            .iter()
            .all(|x| x.message.ends_with("different from CodeSigning")));
        assert_eq!(f.len(), 1);
    }
}
