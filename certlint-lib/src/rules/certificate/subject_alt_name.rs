//! Subject alternative name presence and consistency with the subject.

use crate::certificate::CertType;
use crate::finding::Findings;
use crate::registry::{CertData, Filter, RegistryBuilder};

const TYPES: &[CertType] = &[CertType::Ps, CertType::Dv, CertType::Ov, CertType::Ev];

pub fn register(builder: &mut RegistryBuilder) {
    builder.certificate_check(
        "Subject Alternative Names Check",
        Filter::Only(TYPES),
        check,
    );
}

fn padded(name: &str) -> bool {
    name.starts_with(char::is_whitespace) || name.ends_with(char::is_whitespace)
}

pub fn check(data: &CertData<'_>) -> Findings {
    let mut findings = Findings::new();
    let cert = data.cert;

    match data.cert_type {
        CertType::Ps => {
            if cert.email_addresses.is_empty() {
                findings.err("Certificate doesn't contain any subjectAltName");
                return findings;
            }
            for email in cert.email_addresses.iter().filter(|e| padded(e)) {
                findings.err(format!(
                    "Certificate subjectAltName '{}' contains a whitespace",
                    email
                ));
            }
        }
        CertType::Dv | CertType::Ov | CertType::Ev => {
            if cert.dns_names.is_empty() && cert.ip_addresses.is_empty() {
                findings.err("Certificate doesn't contain any subjectAltName");
                return findings;
            }
            for name in cert.dns_names.iter().filter(|n| padded(n)) {
                findings.err(format!(
                    "Certificate subjectAltName '{}' contains a whitespace",
                    name
                ));
            }

            let cn = cert.common_name();
            let listed = cert.dns_names.iter().any(|n| n.eq_ignore_ascii_case(cn))
                || cert
                    .ip_addresses
                    .iter()
                    .any(|ip| ip.to_string().eq_ignore_ascii_case(cn));
            if !listed {
                findings.err("Certificate CN not listed in subjectAltName");
            }
        }
        _ => {}
    }
    findings
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::certificate::{Certificate, DistinguishedName};
    use crate::oid;

    fn tls(cn: &str, dns: &[&str]) -> Certificate {
        Certificate {
            subject: DistinguishedName::from_pairs([(oid::COMMON_NAME, cn)]),
            dns_names: dns.iter().map(|s| s.to_string()).collect(),
            ..Certificate::default()
        }
    }

    #[test]
    fn test_cn_listed_case_insensitive() {
        let c = tls("WWW.Example.com", &["example.com", "www.example.com"]);
        assert!(check(&CertData::new(&c, CertType::Dv)).is_empty());
    }

    #[test]
    fn test_cn_not_listed() {
        let c = tls("www.example.com", &["example.com"]);
        let f = check(&CertData::new(&c, CertType::Ov));
        assert_eq!(f.len(), 1);
        assert_eq!(f.as_slice()[0].message, "Certificate CN not listed in subjectAltName");
    }

    #[test]
    fn test_missing_cn_is_not_listed() {
        let c = Certificate {
            subject: DistinguishedName::from_pairs([(oid::ORGANIZATION, "Example")]),
            dns_names: vec!["example.com".into()],
            ..Certificate::default()
        };
        let f = check(&CertData::new(&c, CertType::Dv));
        assert_eq!(f.len(), 1);
        assert_eq!(f.worst(), Some(crate::finding::Severity::Error));
        assert_eq!(f.as_slice()[0].message, "Certificate CN not listed in subjectAltName");
    }

    #[test]
    fn test_cn_matches_ip() {
        let mut c = tls("192.0.2.10", &[]);
        c.ip_addresses.push("192.0.2.10".parse().unwrap());
        assert!(check(&CertData::new(&c, CertType::Dv)).is_empty());
    }

    #[test]
    fn test_missing_san() {
        let c = tls("example.com", &[]);
        let f = check(&CertData::new(&c, CertType::Ev));
        assert_eq!(f.len(), 1);
        assert!(f.as_slice()[0].message.contains("doesn't contain any"));
    }

    #[test]
    fn test_whitespace_padding() {
        let c = tls("example.com", &["example.com", " www.example.com", "mail.example.com\t"]);
        let f = check(&CertData::new(&c, CertType::Dv));
        assert_eq!(f.len(), 2);
    }

    #[test]
    fn test_personal_emails() {
        let c = Certificate {
            email_addresses: vec!["john@example.com".into(), "jane@example.com ".into()],
            ..Certificate::default()
        };
        let f = check(&CertData::new(&c, CertType::Ps));
        assert_eq!(f.len(), 1);
        assert!(f.as_slice()[0].message.contains("'jane@example.com '"));

        let f = check(&CertData::new(&Certificate::default(), CertType::Ps));
        assert_eq!(f.len(), 1);
    }
}
