use crate::certificate::Extension;
use crate::finding::Findings;
use crate::oid;
use crate::registry::{CertData, Filter, RegistryBuilder};

pub fn register(builder: &mut RegistryBuilder) {
    builder.extension_check(
        "BasicConstraints Extension Check",
        oid::EXT_BASIC_CONSTRAINTS,
        Filter::Always,
        check,
    );
}

/// CA certificates must mark basicConstraints critical (RFC 5280 4.2.1.9).
pub fn check(ext: &Extension, data: &CertData<'_>) -> Findings {
    let mut findings = Findings::new();
    if data.is_ca() && !ext.critical {
        findings.err("BasicConstraints extension must be critical in CA certificates");
    }
    findings
}
