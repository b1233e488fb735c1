//! Certificate decoding from PEM and DER into [`Certificate`].

use crate::certificate::{
    BasicConstraints, Certificate, DistinguishedName, ExtKeyUsage, Extension, KeyAlgorithm,
    KeyUsage, PublicKey,
};
use crate::oid;
use crate::LintError;
use std::net::IpAddr;
use x509_parser::prelude::*;

/// Parse a certificate from PEM or DER (auto-detected).
///
/// If the input begins with `-----BEGIN` (after stripping whitespace), it is
/// treated as PEM. Otherwise it is treated as DER.
pub fn parse_cert(input: &[u8]) -> Result<Certificate, LintError> {
    if input.is_empty() {
        return Err(LintError::Parse("empty input".into()));
    }

    if is_pem(input) {
        parse_pem(input)
    } else {
        parse_der(input)
    }
}

/// Parse a certificate from PEM format.
pub fn parse_pem(input: &[u8]) -> Result<Certificate, LintError> {
    parse_der(&pem_to_der(input)?)
}

/// Parse every `CERTIFICATE` block of a PEM bundle, in file order.
///
/// Blocks with other labels are skipped. A bundle without any certificate
/// is an error.
pub fn parse_pem_chain(input: &[u8]) -> Result<Vec<Certificate>, LintError> {
    let mut certs = Vec::new();
    for block in x509_parser::pem::Pem::iter_from_buffer(input) {
        let pem = block.map_err(|e| LintError::Pem(format!("{}", e)))?;
        if pem.label == "CERTIFICATE" || pem.label == "TRUSTED CERTIFICATE" {
            certs.push(parse_der(&pem.contents)?);
        }
    }
    if certs.is_empty() {
        return Err(LintError::Pem("no certificates found".into()));
    }
    Ok(certs)
}

/// Unwrap the first PEM certificate block into DER bytes.
pub fn pem_to_der(input: &[u8]) -> Result<Vec<u8>, LintError> {
    let (_, pem) = x509_parser::pem::parse_x509_pem(input)
        .map_err(|e| LintError::Pem(format!("{}", e)))?;

    if pem.label != "CERTIFICATE"
        && pem.label != "TRUSTED CERTIFICATE"
        && pem.label != "X509 CERTIFICATE"
    {
        return Err(LintError::Pem(format!(
            "expected CERTIFICATE, got {}",
            pem.label
        )));
    }

    Ok(pem.contents)
}

/// True when the input looks like PEM text.
pub fn is_pem(input: &[u8]) -> bool {
    let start = input
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(input.len());
    input
        .get(start..)
        .is_some_and(|rest| rest.starts_with(b"-----BEGIN"))
}

/// Parse a certificate from DER format.
pub fn parse_der(input: &[u8]) -> Result<Certificate, LintError> {
    let (remaining, x509) =
        X509Certificate::from_der(input).map_err(|e| LintError::Der(format!("{}", e)))?;

    // Keep only the certificate bytes, not any trailing data.
    let cert_len = input.len() - remaining.len();
    let cert_der = input.get(..cert_len).unwrap_or(input);
    build_certificate(&x509, cert_der)
}

fn build_certificate(x509: &X509Certificate, raw_der: &[u8]) -> Result<Certificate, LintError> {
    let tbs = &x509.tbs_certificate;

    let raw_version = tbs.version.0;
    if raw_version > 2 {
        return Err(LintError::UnsupportedVersion(raw_version + 1));
    }

    let mut cert = Certificate {
        version: raw_version + 1,
        serial: format_serial(tbs.raw_serial()),
        signature_algorithm: format_sig_algorithm(&x509.signature_algorithm),
        issuer: build_dn(&tbs.issuer),
        subject: build_dn(&tbs.subject),
        not_before: build_time(&tbs.validity.not_before)?,
        not_after: build_time(&tbs.validity.not_after)?,
        public_key: build_public_key(&tbs.subject_pki),
        raw: raw_der.to_vec(),
        ..Certificate::default()
    };

    for ext in tbs.extensions() {
        apply_extension(&mut cert, ext);
        cert.extensions
            .push(Extension::new(&ext.oid.to_id_string(), ext.critical, ext.value));
    }

    Ok(cert)
}

/// Format a serial number as a colon-separated uppercase hex string,
/// stripping leading zero bytes but keeping at least one byte.
fn format_serial(raw: &[u8]) -> String {
    let stripped = match raw.iter().position(|&b| b != 0) {
        Some(pos) => raw.get(pos..).unwrap_or(raw),
        None => raw.get(raw.len().saturating_sub(1)..).unwrap_or(raw),
    };
    stripped
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

fn format_sig_algorithm(algo: &AlgorithmIdentifier) -> String {
    match algo.algorithm.to_id_string().as_str() {
        oid::SHA1_WITH_RSA => "sha1WithRSAEncryption".into(),
        oid::SHA256_WITH_RSA => "sha256WithRSAEncryption".into(),
        oid::SHA384_WITH_RSA => "sha384WithRSAEncryption".into(),
        oid::SHA512_WITH_RSA => "sha512WithRSAEncryption".into(),
        oid::ECDSA_WITH_SHA256 => "ecdsa-with-SHA256".into(),
        oid::ECDSA_WITH_SHA384 => "ecdsa-with-SHA384".into(),
        oid::ECDSA_WITH_SHA512 => "ecdsa-with-SHA512".into(),
        oid::ED25519 => "Ed25519".into(),
        other => other.to_string(),
    }
}

fn build_dn(name: &X509Name) -> DistinguishedName {
    let mut attributes = Vec::new();
    for rdn in name.iter() {
        for attr in rdn.iter() {
            let key = attr.attr_type().to_id_string();
            let value = match attr.as_str() {
                Ok(s) => s.to_string(),
                Err(_) => String::from_utf8_lossy(attr.attr_value().as_bytes()).into_owned(),
            };
            attributes.push((key, value));
        }
    }
    DistinguishedName {
        attributes,
        raw: name.as_raw().to_vec(),
    }
}

fn build_time(asn1_time: &ASN1Time) -> Result<::time::OffsetDateTime, LintError> {
    let ts = asn1_time.timestamp();
    ::time::OffsetDateTime::from_unix_timestamp(ts)
        .map_err(|e| LintError::Parse(format!("validity timestamp {} out of range: {}", ts, e)))
}

fn build_public_key(spki: &SubjectPublicKeyInfo) -> PublicKey {
    let oid_str = spki.algorithm.algorithm.to_id_string();

    match oid_str.as_str() {
        oid::RSA_ENCRYPTION => {
            let params = extract_rsa_params(&spki.subject_public_key.data);
            PublicKey {
                algorithm: KeyAlgorithm::Rsa,
                bits: params.map(|(bits, _)| bits),
                exponent: params.map(|(_, exp)| exp),
                curve: None,
            }
        }
        oid::EC_PUBLIC_KEY => {
            let curve = extract_ec_curve(&spki.algorithm);
            let bits = match curve.as_deref() {
                Some(oid::CURVE_P192) => Some(192),
                Some(oid::CURVE_P256) => Some(256),
                Some(oid::CURVE_P384) => Some(384),
                Some(oid::CURVE_P521) => Some(521),
                _ => None,
            };
            PublicKey {
                algorithm: KeyAlgorithm::Ec,
                bits,
                exponent: None,
                curve,
            }
        }
        oid::DSA => PublicKey {
            algorithm: KeyAlgorithm::Dsa,
            ..PublicKey::default()
        },
        oid::ED25519 => PublicKey {
            algorithm: KeyAlgorithm::Ed25519,
            bits: Some(256),
            ..PublicKey::default()
        },
        oid::ED448 => PublicKey {
            algorithm: KeyAlgorithm::Ed448,
            bits: Some(448),
            ..PublicKey::default()
        },
        _ => PublicKey {
            algorithm: KeyAlgorithm::Other(oid_str),
            ..PublicKey::default()
        },
    }
}

/// Extract the RSA modulus length in bits and the public exponent.
///
/// Returns `None` if the DER structure cannot be parsed or the exponent
/// does not fit in 64 bits.
fn extract_rsa_params(data: &[u8]) -> Option<(u32, u64)> {
    let (_, parsed) = x509_parser::der_parser::parse_der(data).ok()?;
    let seq = parsed.as_sequence().ok()?;
    let bigint = seq.first().and_then(|m| m.as_bigint().ok())?;
    let bytes = bigint.to_bytes_be().1;
    let significant: &[u8] = match bytes.iter().position(|&b| b != 0) {
        Some(pos) => bytes.get(pos..)?,
        None => &[],
    };
    let bits = match significant.first() {
        Some(&lead) => {
            (significant.len() as u32 - 1) * 8 + (u8::BITS - lead.leading_zeros())
        }
        None => 0,
    };
    let exponent = seq.get(1).and_then(|e| e.as_u64().ok())?;
    Some((bits, exponent))
}

fn extract_ec_curve(algo: &AlgorithmIdentifier) -> Option<String> {
    algo.parameters
        .as_ref()
        .and_then(|params| params.as_oid().ok())
        .map(|curve| curve.to_id_string())
}

/// Copy the semantic content of known extensions into the certificate.
fn apply_extension(cert: &mut Certificate, ext: &X509Extension) {
    match ext.parsed_extension() {
        ParsedExtension::BasicConstraints(bc) => {
            cert.basic_constraints = Some(BasicConstraints {
                ca: bc.ca,
                path_len: bc.path_len_constraint,
            });
        }
        ParsedExtension::KeyUsage(ku) => {
            let bits = [
                (ku.digital_signature(), KeyUsage::DIGITAL_SIGNATURE),
                (ku.non_repudiation(), KeyUsage::CONTENT_COMMITMENT),
                (ku.key_encipherment(), KeyUsage::KEY_ENCIPHERMENT),
                (ku.data_encipherment(), KeyUsage::DATA_ENCIPHERMENT),
                (ku.key_agreement(), KeyUsage::KEY_AGREEMENT),
                (ku.key_cert_sign(), KeyUsage::KEY_CERT_SIGN),
                (ku.crl_sign(), KeyUsage::CRL_SIGN),
                (ku.encipher_only(), KeyUsage::ENCIPHER_ONLY),
                (ku.decipher_only(), KeyUsage::DECIPHER_ONLY),
            ];
            for (set, flag) in bits {
                cert.key_usage.set(flag, set);
            }
        }
        ParsedExtension::ExtendedKeyUsage(eku) => {
            cert.ext_key_usage = ordered_ext_key_usage(ext.value).unwrap_or_else(|| {
                // Encoding order is lost here; fall back to a fixed order.
                let mut usages = Vec::new();
                let flags = [
                    (eku.any, ExtKeyUsage::Any),
                    (eku.server_auth, ExtKeyUsage::ServerAuth),
                    (eku.client_auth, ExtKeyUsage::ClientAuth),
                    (eku.code_signing, ExtKeyUsage::CodeSigning),
                    (eku.email_protection, ExtKeyUsage::EmailProtection),
                    (eku.time_stamping, ExtKeyUsage::TimeStamping),
                    (eku.ocsp_signing, ExtKeyUsage::OcspSigning),
                ];
                for (set, usage) in flags {
                    if set {
                        usages.push(usage);
                    }
                }
                for other in &eku.other {
                    usages.push(ExtKeyUsage::from_oid(&other.to_id_string()));
                }
                usages
            });
        }
        ParsedExtension::SubjectAlternativeName(san) => {
            for gn in &san.general_names {
                match gn {
                    GeneralName::DNSName(name) => cert.dns_names.push(name.to_string()),
                    GeneralName::RFC822Name(email) => {
                        cert.email_addresses.push(email.to_string())
                    }
                    GeneralName::IPAddress(bytes) => {
                        if let Some(ip) = ip_from_bytes(bytes) {
                            cert.ip_addresses.push(ip);
                        }
                    }
                    GeneralName::URI(uri) => cert.uris.push(uri.to_string()),
                    _ => {}
                }
            }
        }
        ParsedExtension::AuthorityInfoAccess(aia) => {
            for desc in &aia.accessdescs {
                let GeneralName::URI(uri) = &desc.access_location else {
                    continue;
                };
                match desc.access_method.to_id_string().as_str() {
                    oid::ACCESS_OCSP => cert.ocsp_servers.push(uri.to_string()),
                    oid::ACCESS_CA_ISSUERS => {
                        cert.issuing_certificate_urls.push(uri.to_string())
                    }
                    _ => {}
                }
            }
        }
        ParsedExtension::CRLDistributionPoints(cdp) => {
            for point in &cdp.points {
                if let Some(x509_parser::extensions::DistributionPointName::FullName(names)) =
                    &point.distribution_point
                {
                    for gn in names {
                        if let GeneralName::URI(uri) = gn {
                            cert.crl_distribution_points.push(uri.to_string());
                        }
                    }
                }
            }
        }
        ParsedExtension::CertificatePolicies(policies) => {
            cert.policies = policies
                .iter()
                .map(|p| p.policy_id.to_id_string())
                .collect();
        }
        _ => {}
    }
}

/// Read the KeyPurposeId list in encoding order.
fn ordered_ext_key_usage(value: &[u8]) -> Option<Vec<ExtKeyUsage>> {
    let (_, parsed) = x509_parser::der_parser::parse_der(value).ok()?;
    parsed
        .as_sequence()
        .ok()?
        .iter()
        .map(|item| {
            item.as_oid()
                .ok()
                .map(|o| ExtKeyUsage::from_oid(&o.to_id_string()))
        })
        .collect()
}

fn ip_from_bytes(bytes: &[u8]) -> Option<IpAddr> {
    if let Ok(octets) = <[u8; 4]>::try_from(bytes) {
        Some(IpAddr::from(octets))
    } else if let Ok(octets) = <[u8; 16]>::try_from(bytes) {
        Some(IpAddr::from(octets))
    } else {
        None
    }
}
