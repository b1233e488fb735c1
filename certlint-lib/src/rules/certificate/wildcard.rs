//! Wildcard placement in names.

use crate::certificate::CertType;
use crate::finding::Findings;
use crate::registry::{CertData, Filter, RegistryBuilder};

const TYPES: &[CertType] = &[CertType::Ev, CertType::Dv, CertType::Ov];

pub fn register(builder: &mut RegistryBuilder) {
    builder.certificate_check("Wildcard(s) Check", Filter::Only(TYPES), check);
}

/// A single `*` making up the whole leftmost label.
fn is_prefix_wildcard(name: &str) -> bool {
    name.strip_prefix("*.").is_some_and(|rest| !rest.contains('*'))
}

pub fn check(data: &CertData<'_>) -> Findings {
    let mut findings = Findings::new();
    let cert = data.cert;
    let cn = cert.common_name();

    if data.cert_type == CertType::Ev {
        if cn.contains('*') {
            findings.err("Certificate should not contain a wildcard");
        }
        for name in cert.dns_names.iter().filter(|n| n.contains('*')) {
            findings.err(format!(
                "Certificate subjectAltName '{}' should not contain a wildcard",
                name
            ));
        }
        return findings;
    }

    if cn.contains('*') && !is_prefix_wildcard(cn) {
        findings.err("Certificate wildcard is only allowed as prefix");
    }
    for name in &cert.dns_names {
        if name.contains('*') && !is_prefix_wildcard(name) {
            findings.err(format!(
                "Certificate subjectAltName '{}' wildcard is only allowed as prefix",
                name
            ));
        }
    }
    findings
}
