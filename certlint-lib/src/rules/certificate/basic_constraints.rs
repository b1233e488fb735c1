//! Subscriber TLS certificates must not be CAs.

use crate::certificate::CertType;
use crate::finding::Findings;
use crate::registry::{CertData, Filter, RegistryBuilder};

const TYPES: &[CertType] = &[CertType::Dv, CertType::Ov, CertType::Ev];

pub fn register(builder: &mut RegistryBuilder) {
    builder.certificate_check("Basic Constraints Check", Filter::Only(TYPES), check);
}

pub fn check(data: &CertData<'_>) -> Findings {
    let mut findings = Findings::new();
    if data.cert.is_ca() {
        findings.err("Certificate has set CA true");
    }
    findings
}
