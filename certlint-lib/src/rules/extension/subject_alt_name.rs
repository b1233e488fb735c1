use crate::certificate::Extension;
use crate::finding::Findings;
use crate::oid;
use crate::registry::{CertData, Filter, RegistryBuilder};

pub fn register(builder: &mut RegistryBuilder) {
    builder.extension_check(
        "SubjectAltName Extension Check",
        oid::EXT_SUBJECT_ALT_NAME,
        Filter::Always,
        check,
    );
}

/// Critical only when the subject is empty (RFC 5280 4.2.1.6).
pub fn check(ext: &Extension, data: &CertData<'_>) -> Findings {
    let mut findings = Findings::new();
    if ext.critical && !data.cert.subject.is_empty() {
        findings.err("SubjectAltName extension set critical while the subject is not empty");
    }
    findings
}
