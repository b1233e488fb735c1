//! Maximum validity period for TLS server certificates.
//!
//! The allowed lifetime depends on when the certificate was issued:
//!
//! | Type  | notBefore                 | Maximum    |
//! |-------|---------------------------|------------|
//! | DV/OV | before 2016-07-01         | 60 months  |
//! | DV/OV | 2016-07-01 .. 2018-03-01  | 39 months  |
//! | DV/OV | from 2018-03-01           | 825 days   |
//! | EV    | before 2017-03-17         | 27 months  |
//! | EV    | from 2017-03-17           | 825 days   |

use crate::certificate::CertType;
use crate::finding::Findings;
use crate::registry::{CertData, Filter, RegistryBuilder};
use std::fmt;
use time::macros::datetime;
use time::{Date, Duration, Month, OffsetDateTime};

const TYPES: &[CertType] = &[CertType::Dv, CertType::Ov, CertType::Ev];

const BR_39_MONTHS_FROM: OffsetDateTime = datetime!(2016-07-01 0:00 UTC);
const BR_825_DAYS_FROM: OffsetDateTime = datetime!(2018-03-01 0:00 UTC);
const EV_825_DAYS_FROM: OffsetDateTime = datetime!(2017-03-17 0:00 UTC);

pub fn register(builder: &mut RegistryBuilder) {
    builder.certificate_check("Validity Period Check", Filter::Only(TYPES), check);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifetime {
    Months(u32),
    Days(i64),
}

impl Lifetime {
    fn end(self, start: OffsetDateTime) -> Option<OffsetDateTime> {
        match self {
            Lifetime::Months(m) => add_months(start, m),
            Lifetime::Days(d) => start.checked_add(Duration::days(d)),
        }
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifetime::Months(m) => write!(f, "{} months", m),
            Lifetime::Days(d) => write!(f, "{} days", d),
        }
    }
}

fn max_lifetime(cert_type: CertType, not_before: OffsetDateTime) -> Option<Lifetime> {
    match cert_type {
        CertType::Ev if not_before < EV_825_DAYS_FROM => Some(Lifetime::Months(27)),
        CertType::Ev => Some(Lifetime::Days(825)),
        CertType::Dv | CertType::Ov if not_before < BR_39_MONTHS_FROM => {
            Some(Lifetime::Months(60))
        }
        CertType::Dv | CertType::Ov if not_before < BR_825_DAYS_FROM => {
            Some(Lifetime::Months(39))
        }
        CertType::Dv | CertType::Ov => Some(Lifetime::Days(825)),
        _ => None,
    }
}

pub fn check(data: &CertData<'_>) -> Findings {
    let mut findings = Findings::new();
    let cert = data.cert;
    let Some(limit) = max_lifetime(data.cert_type, cert.not_before) else {
        return findings;
    };

    let exceeded = match limit.end(cert.not_before) {
        Some(end) => cert.not_after > end,
        None => true,
    };
    if exceeded {
        let prefix = if data.cert_type == CertType::Ev {
            "EV Certificate"
        } else {
            "Certificate"
        };
        findings.err(format!("{} LifeTime exceeds {}", prefix, limit));
    }
    findings
}

/// Add calendar months, clamping the day to the end of the target month.
fn add_months(start: OffsetDateTime, months: u32) -> Option<OffsetDateTime> {
    let months = i32::try_from(months).ok()?;
    let index = start.year() * 12 + i32::from(u8::from(start.month())) - 1 + months;
    let year = index.div_euclid(12);
    let month = Month::try_from(u8::try_from(index.rem_euclid(12) + 1).ok()?).ok()?;
    let day = start.day().min(month.length(year));
    let date = Date::from_calendar_date(year, month, day).ok()?;
    Some(start.replace_date(date))
}
