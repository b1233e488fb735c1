//! Semantic certificate model consumed by the classifier and the rules.

use crate::oid;
use bitflags::bitflags;
use serde::Serialize;
use std::fmt;
use std::net::IpAddr;
use time::OffsetDateTime;

/// Certificate type code. Drives which rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CertType {
    /// Extended validation TLS.
    #[serde(rename = "EV")]
    Ev,
    /// Organization validated TLS.
    #[serde(rename = "OV")]
    Ov,
    /// Domain validated TLS.
    #[serde(rename = "DV")]
    Dv,
    /// Individual validated TLS.
    #[serde(rename = "IV")]
    Iv,
    /// Personal sign (S/MIME, client).
    #[serde(rename = "PS")]
    Ps,
    /// Code signing.
    #[serde(rename = "CS")]
    Cs,
    /// Timestamping.
    #[serde(rename = "TS")]
    Ts,
    #[serde(rename = "OCSP")]
    Ocsp,
    #[serde(rename = "CA")]
    Ca,
    /// Policy explicitly excluded from linting.
    #[serde(rename = "-")]
    Excluded,
}

impl CertType {
    pub fn code(self) -> &'static str {
        match self {
            CertType::Ev => "EV",
            CertType::Ov => "OV",
            CertType::Dv => "DV",
            CertType::Iv => "IV",
            CertType::Ps => "PS",
            CertType::Cs => "CS",
            CertType::Ts => "TS",
            CertType::Ocsp => "OCSP",
            CertType::Ca => "CA",
            CertType::Excluded => "-",
        }
    }

    /// Types issued to subscribers rather than to issuing CAs.
    pub const END_ENTITY: &'static [CertType] = &[
        CertType::Ev,
        CertType::Ov,
        CertType::Dv,
        CertType::Iv,
        CertType::Ps,
        CertType::Cs,
        CertType::Ts,
    ];

    /// Publicly trusted TLS server types.
    pub const TLS_SERVER: &'static [CertType] =
        &[CertType::Dv, CertType::Ov, CertType::Iv, CertType::Ev];
}

impl fmt::Display for CertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Distinguished name as ordered (attribute OID, value) pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    pub attributes: Vec<(String, String)>,
    /// DER encoding of the Name, used for byte-exact comparisons.
    pub raw: Vec<u8>,
}

impl DistinguishedName {
    /// Build a name from (OID, value) pairs without a raw encoding.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self {
            attributes: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            raw: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn contains(&self, attr_oid: &str) -> bool {
        self.attributes.iter().any(|(k, _)| k == attr_oid)
    }

    /// First value of the attribute, if present.
    pub fn get(&self, attr_oid: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == attr_oid)
            .map(|(_, v)| v.as_str())
    }

    pub fn values<'a>(&'a self, attr_oid: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.attributes
            .iter()
            .filter(move |(k, _)| k == attr_oid)
            .map(|(_, v)| v.as_str())
    }

    /// The last commonName, or an empty string.
    pub fn common_name(&self) -> &str {
        self.values(oid::COMMON_NAME).last().unwrap_or("")
    }

    /// Comma-separated one-line form, e.g. `C = US, O = Org, CN = example.com`.
    ///
    /// Commas, equals signs and backslashes in values are escaped.
    pub fn to_oneline(&self) -> String {
        let mut result = String::new();
        for (i, (k, v)) in self.attributes.iter().enumerate() {
            if i > 0 {
                result.push_str(", ");
            }
            result.push_str(attribute_short_name(k));
            result.push_str(" = ");
            for ch in v.chars() {
                match ch {
                    '\\' => result.push_str("\\\\"),
                    ',' => result.push_str("\\,"),
                    '=' => result.push_str("\\="),
                    _ => result.push(ch),
                }
            }
        }
        result
    }
}

impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_oneline())
    }
}

/// Short display name for a DN attribute OID, or the OID itself.
pub fn attribute_short_name(attr_oid: &str) -> &str {
    match attr_oid {
        oid::COMMON_NAME => "CN",
        oid::SURNAME => "SN",
        oid::SERIAL_NUMBER => "serialNumber",
        oid::COUNTRY => "C",
        oid::LOCALITY => "L",
        oid::STATE_OR_PROVINCE => "ST",
        oid::STREET_ADDRESS => "street",
        oid::ORGANIZATION => "O",
        oid::ORGANIZATIONAL_UNIT => "OU",
        oid::BUSINESS_CATEGORY => "businessCategory",
        oid::POSTAL_CODE => "postalCode",
        oid::GIVEN_NAME => "GN",
        oid::EMAIL_ADDRESS => "emailAddress",
        oid::DOMAIN_COMPONENT => "DC",
        oid::JURISDICTION_LOCALITY => "jurisdictionL",
        oid::JURISDICTION_STATE_OR_PROVINCE => "jurisdictionST",
        oid::JURISDICTION_COUNTRY => "jurisdictionC",
        other => other,
    }
}

bitflags! {
    /// KeyUsage bits (RFC 5280 Section 4.2.1.3).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyUsage: u16 {
        const DIGITAL_SIGNATURE = 1 << 0;
        const CONTENT_COMMITMENT = 1 << 1;
        const KEY_ENCIPHERMENT = 1 << 2;
        const DATA_ENCIPHERMENT = 1 << 3;
        const KEY_AGREEMENT = 1 << 4;
        const KEY_CERT_SIGN = 1 << 5;
        const CRL_SIGN = 1 << 6;
        const ENCIPHER_ONLY = 1 << 7;
        const DECIPHER_ONLY = 1 << 8;
    }
}

impl KeyUsage {
    const NAMES: [(KeyUsage, &'static str); 9] = [
        (KeyUsage::DIGITAL_SIGNATURE, "DigitalSignature"),
        (KeyUsage::CONTENT_COMMITMENT, "ContentCommitment"),
        (KeyUsage::KEY_ENCIPHERMENT, "KeyEncipherment"),
        (KeyUsage::DATA_ENCIPHERMENT, "DataEncipherment"),
        (KeyUsage::KEY_AGREEMENT, "KeyAgreement"),
        (KeyUsage::KEY_CERT_SIGN, "CertSign"),
        (KeyUsage::CRL_SIGN, "CRLSign"),
        (KeyUsage::ENCIPHER_ONLY, "EncipherOnly"),
        (KeyUsage::DECIPHER_ONLY, "DecipherOnly"),
    ];

    /// Human-readable name of a single bit.
    pub fn bit_name(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(bit, _)| *bit == self)
            .map_or("Unknown", |(_, name)| name)
    }
}

/// Extended key usage purpose.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExtKeyUsage {
    Any,
    ServerAuth,
    ClientAuth,
    CodeSigning,
    EmailProtection,
    TimeStamping,
    OcspSigning,
    MicrosoftServerGatedCrypto,
    NetscapeServerGatedCrypto,
    Other(String),
}

impl ExtKeyUsage {
    pub fn from_oid(eku_oid: &str) -> Self {
        match eku_oid {
            oid::EKU_ANY => ExtKeyUsage::Any,
            oid::EKU_SERVER_AUTH => ExtKeyUsage::ServerAuth,
            oid::EKU_CLIENT_AUTH => ExtKeyUsage::ClientAuth,
            oid::EKU_CODE_SIGNING => ExtKeyUsage::CodeSigning,
            oid::EKU_EMAIL_PROTECTION => ExtKeyUsage::EmailProtection,
            oid::EKU_TIME_STAMPING => ExtKeyUsage::TimeStamping,
            oid::EKU_OCSP_SIGNING => ExtKeyUsage::OcspSigning,
            oid::EKU_MS_SERVER_GATED_CRYPTO => ExtKeyUsage::MicrosoftServerGatedCrypto,
            oid::EKU_NS_SERVER_GATED_CRYPTO => ExtKeyUsage::NetscapeServerGatedCrypto,
            other => ExtKeyUsage::Other(other.to_string()),
        }
    }
}

/// Public key algorithm family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAlgorithm {
    Rsa,
    Ec,
    Dsa,
    Ed25519,
    Ed448,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub algorithm: KeyAlgorithm,
    /// Modulus length for RSA, field size for EC.
    pub bits: Option<u32>,
    /// RSA public exponent.
    pub exponent: Option<u64>,
    /// EC named-curve OID.
    pub curve: Option<String>,
}

impl Default for PublicKey {
    fn default() -> Self {
        Self {
            algorithm: KeyAlgorithm::Other(String::new()),
            bits: None,
            exponent: None,
            curve: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BasicConstraints {
    pub ca: bool,
    pub path_len: Option<u32>,
}

/// A raw X.509v3 extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub oid: String,
    pub critical: bool,
    /// Content of the extnValue OCTET STRING.
    pub value: Vec<u8>,
}

impl Extension {
    pub fn new(ext_oid: &str, critical: bool, value: &[u8]) -> Self {
        Self {
            oid: ext_oid.to_string(),
            critical,
            value: value.to_vec(),
        }
    }
}

/// Decoded certificate fields the linter works on.
#[derive(Debug, Clone)]
pub struct Certificate {
    /// 1, 2 or 3.
    pub version: u32,
    /// Colon-separated uppercase hex.
    pub serial: String,
    pub signature_algorithm: String,
    pub issuer: DistinguishedName,
    pub subject: DistinguishedName,
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
    pub public_key: PublicKey,
    pub key_usage: KeyUsage,
    pub ext_key_usage: Vec<ExtKeyUsage>,
    pub policies: Vec<String>,
    pub basic_constraints: Option<BasicConstraints>,
    pub dns_names: Vec<String>,
    pub ip_addresses: Vec<IpAddr>,
    pub email_addresses: Vec<String>,
    pub uris: Vec<String>,
    pub crl_distribution_points: Vec<String>,
    pub ocsp_servers: Vec<String>,
    pub issuing_certificate_urls: Vec<String>,
    pub extensions: Vec<Extension>,
    /// Full certificate DER.
    pub raw: Vec<u8>,
}

impl Default for Certificate {
    fn default() -> Self {
        Self {
            version: 3,
            serial: String::new(),
            signature_algorithm: String::new(),
            issuer: DistinguishedName::default(),
            subject: DistinguishedName::default(),
            not_before: OffsetDateTime::UNIX_EPOCH,
            not_after: OffsetDateTime::UNIX_EPOCH,
            public_key: PublicKey::default(),
            key_usage: KeyUsage::empty(),
            ext_key_usage: Vec::new(),
            policies: Vec::new(),
            basic_constraints: None,
            dns_names: Vec::new(),
            ip_addresses: Vec::new(),
            email_addresses: Vec::new(),
            uris: Vec::new(),
            crl_distribution_points: Vec::new(),
            ocsp_servers: Vec::new(),
            issuing_certificate_urls: Vec::new(),
            extensions: Vec::new(),
            raw: Vec::new(),
        }
    }
}

impl Certificate {
    pub fn is_ca(&self) -> bool {
        self.basic_constraints.is_some_and(|bc| bc.ca)
    }

    pub fn common_name(&self) -> &str {
        self.subject.common_name()
    }

    pub fn has_ext_key_usage(&self, usage: &ExtKeyUsage) -> bool {
        self.ext_key_usage.contains(usage)
    }

    pub fn extension(&self, ext_oid: &str) -> Option<&Extension> {
        self.extensions.iter().find(|e| e.oid == ext_oid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dn_lookup() {
        let dn = DistinguishedName::from_pairs([
            (oid::COUNTRY, "US"),
            (oid::ORGANIZATION, "Example, Inc."),
            (oid::COMMON_NAME, "example.com"),
        ]);
        assert!(dn.contains(oid::ORGANIZATION));
        assert!(!dn.contains(oid::LOCALITY));
        assert_eq!(dn.get(oid::COUNTRY), Some("US"));
        assert_eq!(dn.common_name(), "example.com");
        assert_eq!(
            dn.to_oneline(),
            "C = US, O = Example\\, Inc., CN = example.com"
        );
    }

    #[test]
    fn test_dn_value_outlives_lookup_key() {
        let dn = DistinguishedName::from_pairs([
            (oid::LOCALITY, "Leuven"),
            (oid::LOCALITY, "Brussels"),
        ]);
        let first = {
            let key = String::from(oid::LOCALITY);
            dn.get(&key)
        };
        assert_eq!(first, Some("Leuven"));
        assert_eq!(dn.values(oid::LOCALITY).count(), 2);
    }

    #[test]
    fn test_common_name_missing() {
        assert_eq!(DistinguishedName::default().common_name(), "");
    }

    #[test]
    fn test_eku_from_oid() {
        assert_eq!(
            ExtKeyUsage::from_oid(oid::EKU_SERVER_AUTH),
            ExtKeyUsage::ServerAuth
        );
        assert_eq!(
            ExtKeyUsage::from_oid("1.2.3.4"),
            ExtKeyUsage::Other("1.2.3.4".into())
        );
    }

    #[test]
    fn test_cert_type_codes() {
        assert_eq!(CertType::Ocsp.to_string(), "OCSP");
        assert_eq!(CertType::Excluded.code(), "-");
        assert!(!CertType::END_ENTITY.contains(&CertType::Ca));
    }
}
