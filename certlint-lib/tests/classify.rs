#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::indexing_slicing
)]
//! Classification through the public API.

use certlint_lib::certificate::ExtKeyUsage;
use certlint_lib::*;

fn server_cert(subject: &[(&str, &str)]) -> Certificate {
    Certificate {
        ext_key_usage: vec![ExtKeyUsage::ServerAuth],
        subject: DistinguishedName::from_pairs(subject.iter().copied()),
        ..Certificate::default()
    }
}

#[test]
fn test_organization_makes_ov() {
    let cert = server_cert(&[
        (oid::COMMON_NAME, "example.com"),
        (oid::ORGANIZATION, "Example Inc"),
    ]);
    let c = classify(&cert).unwrap();
    assert_eq!(c.cert_type, CertType::Ov);
    assert_eq!(c.basis, ClassificationBasis::RegistrableDomain);
}

#[test]
fn test_serial_number_makes_ev() {
    let cert = server_cert(&[
        (oid::COMMON_NAME, "example.com"),
        (oid::ORGANIZATION, "Example Inc"),
        (oid::SERIAL_NUMBER, "C123456"),
    ]);
    assert_eq!(classify(&cert).unwrap().cert_type, CertType::Ev);
}

#[test]
fn test_cabforum_policy_wins_over_subject() {
    let mut cert = server_cert(&[
        (oid::COMMON_NAME, "example.com"),
        (oid::ORGANIZATION, "Example Inc"),
    ]);
    cert.policies = vec!["2.23.140.1.2.1".into()];
    let c = classify(&cert).unwrap();
    assert_eq!(c.cert_type, CertType::Dv);
    assert_eq!(c.basis, ClassificationBasis::ExtKeyUsagePolicy);
}

#[test]
fn test_single_label_name_is_unclassifiable() {
    let cert = server_cert(&[(oid::COMMON_NAME, "localhost")]);
    let err = classify(&cert).unwrap_err();
    assert_eq!(err.to_string(), "Could not determine certificate type");
}
