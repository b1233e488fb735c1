//! Structural validation of raw DER.
//!
//! Walks every TLV in the input, recursing into constructed values and
//! handing primitive values to [`crate::format::check_format`]. The walk
//! is independent of certificate parsing: it runs on bytes the decoder may
//! later reject, and reports what it can instead of failing fast.

use crate::finding::Findings;
use crate::format::{check_format, Primitive};
use x509_parser::der_parser::asn1_rs::{Class, FromDer, Header, Length};

/// Default bound on constructed-value nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Validate the structure and primitive syntax of `der` with the default
/// nesting bound.
///
/// An empty buffer yields an empty aggregate.
pub fn validate_structure(der: &[u8]) -> Findings {
    validate_structure_with_depth(der, DEFAULT_MAX_DEPTH)
}

/// Like [`validate_structure`], stopping descent at `max_depth` nested
/// constructed values. Exceeding the bound is reported as an Error and the
/// offending value's content is skipped.
pub fn validate_structure_with_depth(der: &[u8], max_depth: usize) -> Findings {
    walk(der, "", 0, max_depth)
}

fn walk(mut input: &[u8], path: &str, depth: usize, max_depth: usize) -> Findings {
    let mut findings = Findings::new();
    let mut sequence = 0usize;

    while !input.is_empty() {
        sequence += 1;
        let value_path = format!("{}.{}", path, sequence);

        let (rest, header) = match Header::from_der(input) {
            Ok(parsed) => parsed,
            Err(e) => {
                findings.err(format!("ASN.1 decoding error at {}: {}", value_path, e));
                return findings;
            }
        };
        let header_len = input.len() - rest.len();

        let declared = match header.length() {
            Length::Definite(len) => len,
            Length::Indefinite => {
                findings.err(format!(
                    "ASN.1 decoding error at {}: indefinite length not allowed in DER",
                    value_path
                ));
                return findings;
            }
        };

        // Truncated values keep whatever content is present so the
        // recovered part is still checked.
        let (content, next) = match (rest.get(..declared), rest.get(declared..)) {
            (Some(content), Some(next)) => (content, next),
            _ => {
                findings.err(format!(
                    "ASN.1 decoding error at {}: data truncated ({} content bytes declared, {} available)",
                    value_path,
                    declared,
                    rest.len()
                ));
                if rest.is_empty() {
                    return findings;
                }
                (rest, &[][..])
            }
        };
        let full_len = header_len + content.len();
        let full = input.get(..full_len).unwrap_or(input);

        if header.is_constructed() {
            if depth >= max_depth {
                tracing::warn!(path = %value_path, max_depth, "DER nesting limit reached");
                findings.err(format!(
                    "ASN.1 nesting exceeds maximum depth of {} at {}",
                    max_depth, value_path
                ));
            } else {
                findings.append(walk(content, &value_path, depth + 1, max_depth));
            }
        } else {
            findings.append(check_format(&Primitive {
                class: class_bits(header.class()),
                tag: header.tag().0,
                content,
                full,
            }));
        }

        input = next;
    }

    findings
}

fn class_bits(class: Class) -> u8 {
    match class {
        Class::Universal => 0,
        Class::Application => 1,
        Class::ContextSpecific => 2,
        Class::Private => 3,
    }
}
