//! Key usage bits allowed for the subject public key algorithm.

use crate::certificate::{KeyAlgorithm, KeyUsage};
use crate::finding::Findings;
use crate::registry::{CertData, Filter, RegistryBuilder};

pub fn register(builder: &mut RegistryBuilder) {
    builder.certificate_check("Key Usage Check", Filter::Always, check);
}

/// Bits that make no sense for the key algorithm.
fn forbidden_for(algorithm: &KeyAlgorithm) -> KeyUsage {
    let rsa = KeyUsage::KEY_AGREEMENT | KeyUsage::ENCIPHER_ONLY | KeyUsage::DECIPHER_ONLY;
    let ec = KeyUsage::KEY_ENCIPHERMENT | KeyUsage::DATA_ENCIPHERMENT;
    match algorithm {
        KeyAlgorithm::Rsa => rsa,
        KeyAlgorithm::Ec => ec,
        KeyAlgorithm::Dsa => rsa | ec,
        _ => KeyUsage::empty(),
    }
}

pub fn check(data: &CertData<'_>) -> Findings {
    let mut findings = Findings::new();
    let usage = data.cert.key_usage;
    if usage.is_empty() {
        findings.err("Certificate has no key usage set");
        return findings;
    }

    let mut forbidden = forbidden_for(&data.cert.public_key.algorithm);
    if !data.is_ca() {
        forbidden |= KeyUsage::KEY_CERT_SIGN | KeyUsage::CRL_SIGN;
    }

    for bit in (usage & forbidden).iter() {
        findings.err(format!("Certificate has key usage {} set", bit.bit_name()));
    }
    findings
}
