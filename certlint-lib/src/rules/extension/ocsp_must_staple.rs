//! TLS feature extension carrying OCSP must-staple (RFC 7633).

use crate::certificate::{CertType, Extension};
use crate::finding::Findings;
use crate::oid;
use crate::registry::{CertData, Filter, RegistryBuilder};

/// `SEQUENCE { INTEGER 5 }`, status_request.
pub const EXPECTED_VALUE: [u8; 5] = [0x30, 0x03, 0x02, 0x01, 0x05];

pub fn register(builder: &mut RegistryBuilder) {
    builder.extension_check(
        "OCSP Must Staple Extension Check",
        oid::EXT_TLS_FEATURE,
        Filter::Always,
        check,
    );
}

pub fn check(ext: &Extension, data: &CertData<'_>) -> Findings {
    let mut findings = Findings::new();
    if data.cert_type == CertType::Ocsp {
        findings.err("OCSP Must Staple extension set in non end-entity/issuer certificate");
    }
    if ext.critical {
        findings.err("OCSP Must Staple extension set critical");
    }
    if ext.value != EXPECTED_VALUE {
        findings.err("OCSP Must Staple extension set with an invalid value");
    }
    findings
}
