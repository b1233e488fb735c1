#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::indexing_slicing
)]
//! Structure walk over hand-assembled DER.

use certlint_lib::*;
use hex_literal::hex;
use proptest::prelude::*;

fn messages(findings: &Findings) -> Vec<&str> {
    findings.iter().map(|f| f.message.as_str()).collect()
}

#[test]
fn test_utc_time_without_zulu() {
    // SEQUENCE { UTCTime "150101000000" }
    let der = hex!("30 0e 17 0c 313530313031303030303030");
    let f = validate_structure(&der);
    assert_eq!(f.count(Severity::Error), 2);
    assert_eq!(messages(&f), vec!["UTCTime not in Zulu/GMT", "Invalid UTCTime"]);
}

#[test]
fn test_printable_string_with_asterisk() {
    // SET { SEQUENCE { OID 2.5.4.3, PrintableString "*.a" } }
    let der = hex!("31 0c 30 0a 06 03 550403 13 03 2a2e61");
    let f = validate_structure(&der);
    assert_eq!(f.len(), 1);
    assert_eq!(f.worst(), Some(Severity::Error));
    assert_eq!(f.as_slice()[0].message, "Invalid character in PrintableString '*.a'");
}

#[test]
fn test_empty_input() {
    assert!(validate_structure(&[]).is_empty());
}

#[test]
fn test_indefinite_length_rejected() {
    let der = hex!("30 80 05 00 00 00");
    let f = validate_structure(&der);
    assert_eq!(f.len(), 1);
    assert!(f.as_slice()[0].message.starts_with("ASN.1 decoding error at .1"));
}

#[test]
fn test_deprecated_teletex_warns_only() {
    // SEQUENCE { TeletexString "Acme" }
    let der = hex!("30 06 14 04 41636d65");
    let f = validate_structure(&der);
    assert_eq!(f.worst(), Some(Severity::Warning));
    assert_eq!(messages(&f), vec!["Using deprecated TeletexString for 'Acme'"]);
}

#[test]
fn test_bmp_string_control_character() {
    // BMPString "A" U+200B
    let der = hex!("1e 04 0041 200b");
    let f = validate_structure(&der);
    assert!(f.iter().any(|x| x.message.starts_with("Control character in BMPString")));
}

#[test]
fn test_generalized_time_pre_2050() {
    let der = hex!("18 0f 3230333030313031303030303030 5a");
    assert_eq!(
        messages(&validate_structure(&der)),
        vec!["Generalized Time before 2050"]
    );
}

proptest! {
    #[test]
    fn prop_arbitrary_bytes_never_panic(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        let f = validate_structure(&data);
        prop_assert_eq!(f.worst().is_none(), f.is_empty());
        let _ = validate_structure_with_depth(&data, 0);
    }

    #[test]
    fn prop_printable_sequences_are_clean(values in proptest::collection::vec("[A-Za-z0-9 ]{2,40}", 0..8)) {
        let mut content = Vec::new();
        for v in &values {
            content.push(0x13);
            content.push(v.len() as u8);
            content.extend_from_slice(v.as_bytes());
        }
        let mut der = vec![0x30];
        if content.len() < 0x80 {
            der.push(content.len() as u8);
        } else if content.len() < 0x100 {
            der.extend_from_slice(&[0x81, content.len() as u8]);
        } else {
            der.extend_from_slice(&[0x82, (content.len() >> 8) as u8, content.len() as u8]);
        }
        der.extend_from_slice(&content);
        prop_assert!(validate_structure(&der).is_empty());
    }
}
