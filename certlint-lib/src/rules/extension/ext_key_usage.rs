use crate::certificate::{ExtKeyUsage, Extension};
use crate::finding::Findings;
use crate::oid;
use crate::registry::{CertData, Filter, RegistryBuilder};

pub fn register(builder: &mut RegistryBuilder) {
    builder.extension_check(
        "ExtKeyUsage Extension Check",
        oid::EXT_EXTENDED_KEY_USAGE,
        Filter::Always,
        check,
    );
}

/// RFC 5280 4.2.1.12 recommendations; both are warnings.
pub fn check(ext: &Extension, data: &CertData<'_>) -> Findings {
    let mut findings = Findings::new();
    if data.cert.is_ca() {
        findings.warning("In general ExtKeyUsage will appear only in end entity certificates");
    }
    if ext.critical && data.cert.has_ext_key_usage(&ExtKeyUsage::Any) {
        findings.warning(
            "ExtKeyUsage extension SHOULD NOT be critical if anyExtendedKeyUsage is present",
        );
    }
    findings
}
