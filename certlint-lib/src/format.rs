//! Per-tag syntax checks for primitive universal-class values.
//!
//! Only the universal class is inspected; application, context-specific and
//! private tags are opaque at this layer. Tags without a rule are accepted.

use crate::finding::Findings;
use x509_parser::der_parser::asn1_rs::{FromDer, GeneralizedTime};

// ── Universal tag numbers (X.680 Section 8.6) ───────────────────────────

pub const TAG_UTF8_STRING: u32 = 12;
pub const TAG_NUMERIC_STRING: u32 = 18;
pub const TAG_PRINTABLE_STRING: u32 = 19;
pub const TAG_TELETEX_STRING: u32 = 20;
pub const TAG_VIDEOTEX_STRING: u32 = 21;
pub const TAG_IA5_STRING: u32 = 22;
pub const TAG_UTC_TIME: u32 = 23;
pub const TAG_GENERALIZED_TIME: u32 = 24;
pub const TAG_GRAPHIC_STRING: u32 = 25;
pub const TAG_GENERAL_STRING: u32 = 27;
pub const TAG_UNIVERSAL_STRING: u32 = 28;
pub const TAG_BMP_STRING: u32 = 30;

/// Primitive value handed over by the structural walker.
#[derive(Debug, Clone, Copy)]
pub struct Primitive<'a> {
    /// Class bits (0 = universal, 1 = application, 2 = context, 3 = private).
    pub class: u8,
    pub tag: u32,
    /// Content octets only.
    pub content: &'a [u8],
    /// Header plus content, as it appeared in the input.
    pub full: &'a [u8],
}

/// Check one primitive value against the syntax of its universal tag.
pub fn check_format(value: &Primitive<'_>) -> Findings {
    let mut findings = Findings::new();
    if value.class != 0 {
        return findings;
    }

    let content = value.content;
    match value.tag {
        TAG_UTF8_STRING => {
            let text = match std::str::from_utf8(content) {
                Ok(s) => s.to_string(),
                Err(_) => {
                    findings.err("Invalid UTF8 encoding in UTF8String");
                    String::from_utf8_lossy(content).into_owned()
                }
            };
            check_text("UTF8String", &text, &mut findings);
        }
        TAG_NUMERIC_STRING => {
            if !content.iter().all(|&b| b.is_ascii_digit() || b == b' ') {
                findings.err(format!(
                    "Invalid character in NumericString '{}'",
                    String::from_utf8_lossy(content)
                ));
            }
        }
        TAG_PRINTABLE_STRING => {
            let text = String::from_utf8_lossy(content);
            for _ in content.iter().filter(|&&b| !is_printable(b)) {
                findings.err(format!("Invalid character in PrintableString '{}'", text));
            }
            if is_forbidden_value(&text) {
                findings.err(format!("Forbidden value in PrintableString '{}'", text));
            }
        }
        TAG_IA5_STRING => {
            let text = String::from_utf8_lossy(content);
            if !content.is_ascii() {
                findings.err(format!("Invalid character in IA5String '{}'", text));
            }
            if is_forbidden_value(&text) {
                findings.err(format!("Forbidden value in IA5String '{}'", text));
            }
        }
        TAG_UTC_TIME => {
            if content.last() != Some(&b'Z') {
                findings.err("UTCTime not in Zulu/GMT");
            }
            if !matches_time_pattern(content, 2) {
                findings.err("Invalid UTCTime");
            }
        }
        TAG_GENERALIZED_TIME => check_generalized_time(value, &mut findings),
        TAG_TELETEX_STRING => check_deprecated("TeletexString", decode_8bit(content), &mut findings),
        TAG_VIDEOTEX_STRING => {
            check_deprecated("VideotexString", decode_8bit(content), &mut findings)
        }
        TAG_GRAPHIC_STRING => check_deprecated("GraphicString", decode_8bit(content), &mut findings),
        TAG_GENERAL_STRING => check_deprecated("GeneralString", decode_8bit(content), &mut findings),
        TAG_UNIVERSAL_STRING => {
            check_deprecated("UniversalString", decode_ucs4(content), &mut findings)
        }
        TAG_BMP_STRING => check_deprecated("BMPString", decode_ucs2(content), &mut findings),
        _ => {}
    }

    findings
}

/// Forbidden-placeholder and control-character checks shared by the
/// unicode-capable string types.
fn check_text(type_name: &str, text: &str, findings: &mut Findings) {
    if is_forbidden_value(text) {
        findings.err(format!("Forbidden value in {} '{}'", type_name, text));
    }
    if text.chars().any(is_control_character) {
        findings.err(format!("Control character in {} '{}'", type_name, text));
    }
}

fn check_deprecated(type_name: &str, text: String, findings: &mut Findings) {
    findings.warning(format!("Using deprecated {} for '{}'", type_name, text));
    check_text(type_name, &text, findings);
}

fn check_generalized_time(value: &Primitive<'_>, findings: &mut Findings) {
    match GeneralizedTime::from_der(value.full) {
        Ok((_, time)) => {
            if time.0.year < 2050 {
                findings.err("Generalized Time before 2050");
            }
        }
        Err(e) => {
            findings.err(format!("Failed to parse Generalized Time: {}", e));
            // an undecodable value counts as year zero
            findings.err("Generalized Time before 2050");
        }
    }
    if value.content.last() != Some(&b'Z') {
        findings.err("Generalized Time not in Zulu/GMT");
    }
    if !matches_time_pattern(value.content, 4) {
        findings.err("Invalid Generalized Time");
    }
}

/// Printable set of X.680 Section 41.4 without `*`.
fn is_printable(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || (b'\''..=b')').contains(&b)
        || (b'+'..=b'/').contains(&b)
        || matches!(b, b' ' | b':' | b'=' | b'?')
}

/// Single-character values used as "not applicable" placeholders.
fn is_forbidden_value(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some('.' | '-' | ' ' | '_'), None)
    )
}

/// Control (Cc), format (Cf) and private-use (Co) code points.
fn is_control_character(c: char) -> bool {
    if c.is_control() {
        return true;
    }
    matches!(
        u32::from(c),
        0x00AD
            | 0x0600..=0x0605
            | 0x061C
            | 0x06DD
            | 0x070F
            | 0x08E2
            | 0x180E
            | 0x200B..=0x200F
            | 0x202A..=0x202E
            | 0x2060..=0x2064
            | 0x2066..=0x206F
            | 0xFEFF
            | 0xFFF9..=0xFFFB
            | 0xE000..=0xF8FF
            | 0xF0000..=0xFFFFD
            | 0x100000..=0x10FFFD
    )
}

/// `YYMMDDHHMMSSZ` (two year digits) or `YYYYMMDDHHMMSSZ` (four), with
/// seconds mandatory and the same per-field digit ranges for both.
fn matches_time_pattern(content: &[u8], year_digits: usize) -> bool {
    if content.len() != year_digits + 11 {
        return false;
    }
    let (year, rest) = content.split_at(year_digits);
    if !year.iter().all(u8::is_ascii_digit) {
        return false;
    }
    // month, day, hour, minute, second: allowed leading digit, then any digit
    let fields: [(u8, u8); 5] = [(b'0', b'1'), (b'0', b'3'), (b'0', b'2'), (b'0', b'5'), (b'0', b'5')];
    let mut pos = rest.iter();
    for (lo, hi) in fields {
        let tens = pos.next();
        let ones = pos.next();
        match (tens, ones) {
            (Some(&t), Some(&o)) if (lo..=hi).contains(&t) && o.is_ascii_digit() => {}
            _ => return false,
        }
    }
    pos.next() == Some(&b'Z') && pos.next().is_none()
}

fn decode_8bit(content: &[u8]) -> String {
    String::from_utf8_lossy(content).into_owned()
}

/// BMPString content is big-endian UCS-2.
fn decode_ucs2(content: &[u8]) -> String {
    let units = content
        .chunks(2)
        .map(|c| match c {
            [hi, lo] => u16::from_be_bytes([*hi, *lo]),
            _ => 0xFFFD,
        });
    char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// UniversalString content is big-endian UCS-4.
fn decode_ucs4(content: &[u8]) -> String {
    content
        .chunks(4)
        .map(|c| match c {
            [a, b, c, d] => char::from_u32(u32::from_be_bytes([*a, *b, *c, *d]))
                .unwrap_or(char::REPLACEMENT_CHARACTER),
            _ => char::REPLACEMENT_CHARACTER,
        })
        .collect()
}
