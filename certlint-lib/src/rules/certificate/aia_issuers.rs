//! Authority Info Access CA issuer URLs.

use crate::certificate::CertType;
use crate::finding::Findings;
use crate::registry::{CertData, Filter, RegistryBuilder};
use url::Url;

pub fn register(builder: &mut RegistryBuilder) {
    builder.certificate_check(
        "Authority Info Access Issuers Check",
        Filter::Only(CertType::END_ENTITY),
        check,
    );
}

pub fn check(data: &CertData<'_>) -> Findings {
    let mut findings = Findings::new();
    let urls = &data.cert.issuing_certificate_urls;
    if urls.is_empty() {
        findings.err("Certificate contains no Authority Info Access Issuers");
        return findings;
    }
    for issuer in urls {
        match Url::parse(issuer) {
            Err(_) => findings.err(format!(
                "Certificate contains an invalid Authority Info Access Issuer URL ({})",
                issuer
            )),
            Ok(u) if u.scheme() != "http" => findings.err(format!(
                "Certificate contains an Authority Info Access Issuer with a non-preferred scheme ({})",
                u.scheme()
            )),
            Ok(_) => {}
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::Certificate;

    #[test]
    fn test_issuer_urls() {
        let c = Certificate::default();
        assert!(check(&CertData::new(&c, CertType::Cs)).is_error());

        let c = Certificate {
            issuing_certificate_urls: vec![
                "http://secure.globalsign.com/cacert/gsextendvalsha2g2r2.crt".into(),
            ],
            ..Certificate::default()
        };
        assert!(check(&CertData::new(&c, CertType::Ev)).is_empty());

        let c = Certificate {
            issuing_certificate_urls: vec!["https://secure.example.com/ca.crt".into(), "::".into()],
            ..Certificate::default()
        };
        assert_eq!(check(&CertData::new(&c, CertType::Ev)).len(), 2);
    }
}
