//! Subject distinguished name field dependencies.

use crate::certificate::{CertType, DistinguishedName};
use crate::finding::Findings;
use crate::oid;
use crate::registry::{CertData, Filter, RegistryBuilder};

/// Accepted businessCategory values (EV Guidelines 9.2.3).
pub const BUSINESS_CATEGORIES: [&str; 4] = [
    "Private Organization",
    "Government Entity",
    "Business Entity",
    "Non-Commercial Entity",
];

pub fn register(builder: &mut RegistryBuilder) {
    builder.certificate_check("Subject Check", Filter::Only(CertType::TLS_SERVER), check);
}

pub fn check(data: &CertData<'_>) -> Findings {
    check_dn(data.cert_type, &data.cert.subject)
}

/// Check which attributes require, or forbid, which others.
///
/// Every violated dependency is a separate Error, reported in the order
/// the attributes appear in the name.
pub fn check_dn(cert_type: CertType, dn: &DistinguishedName) -> Findings {
    let mut findings = Findings::new();

    if matches!(cert_type, CertType::Ov | CertType::Ev) && !dn.contains(oid::ORGANIZATION) {
        findings.err(format!(
            "organizationName is required for {} certificates",
            cert_type
        ));
    }

    if cert_type == CertType::Ev {
        for (attr, name) in [
            (oid::LOCALITY, "localityName"),
            (oid::BUSINESS_CATEGORY, "businessCategory"),
            (oid::JURISDICTION_COUNTRY, "jurisdictionCountryName"),
            (oid::SERIAL_NUMBER, "serialNumber"),
        ] {
            if !dn.contains(attr) {
                findings.err(format!("{} is required for {} certificates", name, cert_type));
            }
        }
    }

    let has = |attr: &str| dn.contains(attr);
    let organization_or_person =
        has(oid::ORGANIZATION) || (has(oid::GIVEN_NAME) && has(oid::SURNAME));

    for (attr, value) in &dn.attributes {
        match attr.as_str() {
            oid::SURNAME => {
                if !has(oid::GIVEN_NAME) {
                    findings.err("surname may only set in combination with givenName");
                }
                if !has(oid::LOCALITY) && !has(oid::STATE_OR_PROVINCE) {
                    findings.err("localityName or stateOrProvinceName is required if surname is set");
                }
            }
            oid::GIVEN_NAME => {
                if !has(oid::SURNAME) {
                    findings.err("givenName may only set in combination with surname");
                }
            }
            oid::COUNTRY => {
                if value.chars().count() != 2 {
                    findings.err("countryName MUST contain the two-letter ISO 3166-1 country code");
                }
            }
            oid::JURISDICTION_COUNTRY => {
                if value.chars().count() != 2 {
                    findings.err(
                        "jurisdictionCountryName MUST contain the two-letter ISO 3166-1 country code",
                    );
                }
            }
            oid::LOCALITY | oid::STATE_OR_PROVINCE | oid::STREET_ADDRESS | oid::POSTAL_CODE => {
                if !organization_or_person {
                    findings.err(format!(
                        "{} is not allowed without organizationName or givenName and surname",
                        long_name(attr)
                    ));
                }
            }
            oid::ORGANIZATION => {
                if !has(oid::LOCALITY) && !has(oid::STATE_OR_PROVINCE) {
                    findings.err(
                        "localityName or stateOrProvinceName is required if organizationName is set",
                    );
                }
                if !has(oid::COUNTRY) {
                    findings.err("countryName is required if organizationName is set");
                }
            }
            oid::BUSINESS_CATEGORY => {
                if !BUSINESS_CATEGORIES.contains(&value.as_str()) {
                    findings.err(
                        "businessCategory should contain 'Private Organization', 'Government Entity', \
                         'Business Entity', or 'Non-Commercial Entity'",
                    );
                }
            }
            _ => {}
        }
    }
    findings
}

fn long_name(attr: &str) -> &str {
    match attr {
        oid::LOCALITY => "localityName",
        oid::STATE_OR_PROVINCE => "stateOrProvinceName",
        oid::STREET_ADDRESS => "streetAddress",
        oid::POSTAL_CODE => "postalCode",
        other => other,
    }
}
