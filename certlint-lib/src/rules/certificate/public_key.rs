//! Subject public key strength.

use crate::certificate::KeyAlgorithm;
use crate::finding::Findings;
use crate::oid;
use crate::registry::{CertData, Filter, RegistryBuilder};

const MIN_RSA_BITS: u32 = 2048;
const ALLOWED_CURVES: [&str; 3] = [oid::CURVE_P256, oid::CURVE_P384, oid::CURVE_P521];

pub fn register(builder: &mut RegistryBuilder) {
    builder.certificate_check("Public Key Check", Filter::Always, check);
}

pub fn check(data: &CertData<'_>) -> Findings {
    let mut findings = Findings::new();
    let key = &data.cert.public_key;
    match &key.algorithm {
        KeyAlgorithm::Dsa => findings.err("Certificate key type DSA is not allowed"),
        KeyAlgorithm::Rsa => {
            let (Some(bits), Some(exponent)) = (key.bits, key.exponent) else {
                findings.err("Certificate RSA key could not be parsed");
                return findings;
            };
            if bits < MIN_RSA_BITS {
                findings.err(format!(
                    "Certificate RSA key size too small ({} < {} bits)",
                    bits, MIN_RSA_BITS
                ));
            }
            if bits % 8 != 0 {
                findings.err(format!(
                    "Certificate RSA key size {} is not divisible by 8",
                    bits
                ));
            }
            if exponent % 2 == 0 {
                findings.err(format!("Certificate RSA public exponent {} is even", exponent));
            }
            if exponent < 3 {
                findings.err(format!(
                    "Certificate RSA public exponent {} is too small",
                    exponent
                ));
            }
        }
        KeyAlgorithm::Ec => match key.curve.as_deref() {
            Some(curve) if ALLOWED_CURVES.contains(&curve) => {}
            Some(curve) => findings.err(format!("Certificate ECDSA curve {} is not allowed", curve)),
            None => findings.err("Certificate ECDSA key has no named curve"),
        },
        KeyAlgorithm::Ed25519 | KeyAlgorithm::Ed448 => {}
        KeyAlgorithm::Other(algorithm) => findings.err(format!(
            "Certificate key algorithm {} is not supported",
            algorithm
        )),
    }
    findings
}
