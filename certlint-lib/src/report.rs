//! Lint results and their text and JSON renderings.

use crate::certificate::CertType;
use crate::classify::ClassificationBasis;
use crate::finding::{Findings, Severity};
use crate::LintError;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Why the rules were not run on a decoded certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SkipReason {
    /// Policy explicitly excluded from linting.
    Excluded,
    /// notAfter has passed and expired certificates were not requested.
    Expired,
}

/// Outcome of linting one certificate.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LintReport {
    /// File or other origin, filled in by the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// `None` when decoding or classification failed.
    pub cert_type: Option<CertType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basis: Option<ClassificationBasis>,
    pub subject: String,
    pub serial: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub not_after: Option<OffsetDateTime>,
    /// SHA-256 over the input bytes.
    pub fingerprint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<SkipReason>,
    pub findings: Findings,
}

impl LintReport {
    /// A report holding a single Error, for input that never reached the linter.
    pub fn failed(message: impl Into<String>) -> Self {
        let mut report = LintReport::default();
        report.findings.err(message);
        report
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// True when no finding is more severe than `threshold`.
    pub fn passes(&self, threshold: Severity) -> bool {
        self.findings.worst().map_or(true, |worst| worst <= threshold)
    }

    pub fn worst(&self) -> Option<Severity> {
        self.findings.worst()
    }
}

/// Human-readable summary of one report.
pub fn display_text(report: &LintReport) -> String {
    let mut out = String::new();

    if let Some(source) = &report.source {
        out.push_str(&format!("{}:\n", source));
    }
    let cert_type = report.cert_type.map_or("unknown", |t| t.code());
    match report.basis {
        Some(basis) => out.push_str(&format!("  Type: {} (by {:?})\n", cert_type, basis)),
        None => out.push_str(&format!("  Type: {}\n", cert_type)),
    }
    if !report.subject.is_empty() {
        out.push_str(&format!("  Subject: {}\n", report.subject));
    }
    if !report.serial.is_empty() {
        out.push_str(&format!("  Serial: {}\n", report.serial));
    }
    if let Some(not_after) = report.not_after.and_then(|t| t.format(&Rfc3339).ok()) {
        out.push_str(&format!("  Not After: {}\n", not_after));
    }
    out.push_str(&format!("  Fingerprint (SHA-256): {}\n", report.fingerprint));

    match report.skipped {
        Some(SkipReason::Excluded) => out.push_str("  Skipped: excluded certificate policy\n"),
        Some(SkipReason::Expired) => out.push_str("  Skipped: certificate has expired\n"),
        None => {}
    }

    out.push_str(&format!("  Findings: {}\n", report.findings.len()));
    for finding in &report.findings {
        out.push_str(&format!("    {:<9} {}\n", finding.severity, finding.message));
    }
    out
}

/// Pretty-printed JSON array of reports.
pub fn to_json(reports: &[LintReport]) -> Result<String, LintError> {
    serde_json::to_string_pretty(reports).map_err(LintError::Json)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn sample() -> LintReport {
        let mut report = LintReport {
            cert_type: Some(CertType::Ov),
            basis: Some(ClassificationBasis::RegistrableDomain),
            subject: "C = BE, O = Example, CN = example.com".into(),
            serial: "01:02".into(),
            fingerprint: "AA:BB".into(),
            ..LintReport::default()
        };
        report.findings.warning("KeyUsage extension SHOULD be marked as critical when present");
        report.findings.err("Certificate contains no CRL or OCSP server");
        report
    }

    #[test]
    fn test_passes_threshold() {
        let report = sample();
        assert!(!report.passes(Severity::Warning));
        assert!(report.passes(Severity::Error));
        assert!(LintReport::default().passes(Severity::Debug));
    }

    #[test]
    fn test_text_rendering() {
        let text = display_text(&sample().with_source("leaf.pem"));
        assert!(text.starts_with("leaf.pem:\n"));
        assert!(text.contains("Type: OV (by RegistrableDomain)"));
        assert!(text.contains("Findings: 2"));
        assert!(text.contains("error     Certificate contains no CRL or OCSP server"));
    }

    #[test]
    fn test_json_rendering() {
        let json = to_json(&[sample()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["cert_type"], "OV");
        assert_eq!(value[0]["findings"]["list"][1]["severity"], "error");
        assert_eq!(value[0]["findings"]["worst"], "error");
        assert!(value[0]["not_after"].is_null());
        assert!(value[0].get("skipped").is_none());
    }

    #[test]
    fn test_failed_report() {
        let report = LintReport::failed("Invalid PEM block");
        assert_eq!(report.worst(), Some(Severity::Error));
        assert!(display_text(&report).contains("Type: unknown"));
    }
}
