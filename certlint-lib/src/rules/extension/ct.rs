//! Certificate Transparency precertificate poison (RFC 6962 3.1).

use crate::certificate::Extension;
use crate::finding::Findings;
use crate::oid;
use crate::registry::{CertData, Filter, RegistryBuilder};

/// DER NULL.
const POISON_VALUE: [u8; 2] = [0x05, 0x00];

pub fn register(builder: &mut RegistryBuilder) {
    builder.extension_check(
        "Certificate Transparency Poison Extension Check",
        oid::EXT_CT_POISON,
        Filter::Always,
        check,
    );
}

pub fn check(ext: &Extension, _data: &CertData<'_>) -> Findings {
    let mut findings = Findings::new();
    if !ext.critical {
        findings.err("Certificate Transparency poison extension set non-critical");
    }
    if ext.value != POISON_VALUE {
        findings.err(format!(
            "Certificate Transparency poison extension value {} is not ASN.1 NULL",
            hex::encode(&ext.value)
        ));
    }
    findings
}
