//! Lint entry point: structure walk, decode, classify, then rules.

use crate::certificate::{CertType, Certificate};
use crate::classify::classify;
use crate::der::{validate_structure_with_depth, DEFAULT_MAX_DEPTH};
use crate::fingerprint::sha256_fingerprint;
use crate::parser::{is_pem, parse_der, pem_to_der};
use crate::registry::{CertData, Registry};
use crate::report::{LintReport, SkipReason};
use std::sync::LazyLock;
use time::OffsetDateTime;
use tracing::debug;

/// Knobs for a [`Linter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LintOptions {
    /// Deepest constructed nesting the structure walk descends into.
    pub max_depth: usize,
    /// Run the rules on certificates whose notAfter has passed.
    pub check_expired: bool,
    /// Reference time for the expiry test; the current time when `None`.
    pub at_time: Option<OffsetDateTime>,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            check_expired: false,
            at_time: None,
        }
    }
}

/// Runs the full lint pipeline against a fixed rule registry.
///
/// A `Linter` holds no mutable state, so one instance can lint any number of
/// certificates from any number of threads.
#[derive(Debug)]
pub struct Linter {
    registry: Registry,
    options: LintOptions,
}

impl Default for Linter {
    fn default() -> Self {
        Self::new(Registry::default_rules())
    }
}

static DEFAULT_LINTER: LazyLock<Linter> = LazyLock::new(Linter::default);

/// Lint one DER certificate with the built-in rules and default options.
pub fn lint(der: &[u8]) -> LintReport {
    DEFAULT_LINTER.lint_der(der, None)
}

impl Linter {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            options: LintOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LintOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &LintOptions {
        &self.options
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Lint one DER certificate, optionally against its issuing CA.
    pub fn lint_der(&self, der: &[u8], issuer: Option<&Certificate>) -> LintReport {
        self.run(der, |_| issuer)
    }

    /// Lint one DER certificate, picking its issuer from `issuers`.
    ///
    /// See [`select_issuer`] for how the issuer is chosen.
    pub fn lint_der_with_issuers(&self, der: &[u8], issuers: &[Certificate]) -> LintReport {
        self.run(der, |cert| select_issuer(cert, issuers))
    }

    /// Lint every certificate in `input`.
    ///
    /// PEM input may hold several `CERTIFICATE` blocks; each becomes its own
    /// report. Anything else is linted as a single DER certificate.
    pub fn lint_bytes(&self, input: &[u8], issuers: &[Certificate]) -> Vec<LintReport> {
        if !is_pem(input) {
            return vec![self.lint_der_with_issuers(input, issuers)];
        }

        let mut reports = Vec::new();
        for block in x509_parser::pem::Pem::iter_from_buffer(input) {
            match block {
                Ok(pem) if is_certificate_label(&pem.label) => {
                    reports.push(self.lint_der_with_issuers(&pem.contents, issuers));
                }
                Ok(pem) => debug!(label = %pem.label, "skipping non-certificate PEM block"),
                Err(e) => {
                    reports.push(LintReport::failed(format!("Invalid PEM block: {}", e)));
                    break;
                }
            }
        }
        if reports.is_empty() {
            // Fall back to the single-block decoder for its error message.
            let report = match pem_to_der(input) {
                Ok(der) => self.lint_der_with_issuers(&der, issuers),
                Err(e) => LintReport::failed(e.to_string()),
            };
            reports.push(report);
        }
        reports
    }

    fn run<'i, F>(&self, der: &[u8], pick_issuer: F) -> LintReport
    where
        F: FnOnce(&Certificate) -> Option<&'i Certificate>,
    {
        let mut report = LintReport {
            fingerprint: sha256_fingerprint(der),
            ..LintReport::default()
        };
        report
            .findings
            .append(validate_structure_with_depth(der, self.options.max_depth));

        let cert = match parse_der(der) {
            Ok(cert) => cert,
            Err(e) => {
                debug!(error = %e, "certificate could not be decoded");
                report.findings.err(e.to_string());
                return report;
            }
        };
        report.subject = cert.subject.to_oneline();
        report.serial = cert.serial.clone();
        report.not_after = Some(cert.not_after);

        let classification = match classify(&cert) {
            Ok(c) => c,
            Err(e) => {
                report.findings.err(e.to_string());
                return report;
            }
        };
        report.cert_type = Some(classification.cert_type);
        report.basis = Some(classification.basis);

        if classification.cert_type == CertType::Excluded {
            report.skipped = Some(SkipReason::Excluded);
            return report;
        }

        let now = self.options.at_time.unwrap_or_else(OffsetDateTime::now_utc);
        if !self.options.check_expired && cert.not_after < now {
            debug!(subject = %report.subject, not_after = %cert.not_after, "skipping expired certificate");
            report.skipped = Some(SkipReason::Expired);
            return report;
        }

        let data = CertData::new(&cert, classification.cert_type).with_issuer(pick_issuer(&cert));
        report
            .findings
            .append(self.registry.run_certificate_checks(&data));
        for ext in &cert.extensions {
            report
                .findings
                .append(self.registry.run_extension_checks(ext, &data));
        }
        report
    }
}

fn is_certificate_label(label: &str) -> bool {
    matches!(
        label,
        "CERTIFICATE" | "TRUSTED CERTIFICATE" | "X509 CERTIFICATE"
    )
}

/// The issuer whose subject name byte-equals the certificate's issuer name,
/// or the only candidate when exactly one was supplied.
pub fn select_issuer<'i>(cert: &Certificate, issuers: &'i [Certificate]) -> Option<&'i Certificate> {
    issuers
        .iter()
        .find(|candidate| candidate.subject.raw == cert.issuer.raw)
        .or(match issuers {
            [only] => Some(only),
            _ => None,
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::certificate::DistinguishedName;
    use crate::finding::Severity;

    #[test]
    fn test_garbage_input() {
        let report = lint(&[0x30, 0x03, 0x02, 0x01]);
        assert!(report.findings.is_error());
        assert_eq!(report.cert_type, None);
        assert!(!report.passes(Severity::Warning));
    }

    #[test]
    fn test_empty_input() {
        let report = Linter::default().lint_der(&[], None);
        assert_eq!(report.findings.len(), 1);
        assert!(report.skipped.is_none());
    }

    #[test]
    fn test_options_default() {
        let opts = LintOptions::default();
        assert_eq!(opts.max_depth, DEFAULT_MAX_DEPTH);
        assert!(!opts.check_expired);
        assert!(opts.at_time.is_none());
    }

    #[test]
    fn test_select_issuer() {
        let leaf = Certificate {
            issuer: DistinguishedName {
                attributes: Vec::new(),
                raw: vec![1, 2, 3],
            },
            ..Certificate::default()
        };
        let matching = Certificate {
            subject: DistinguishedName {
                attributes: Vec::new(),
                raw: vec![1, 2, 3],
            },
            ..Certificate::default()
        };
        let other = Certificate::default();

        assert!(select_issuer(&leaf, &[]).is_none());
        assert_eq!(
            select_issuer(&leaf, std::slice::from_ref(&other)).map(|c| c.subject.raw.len()),
            Some(0)
        );
        let pool = [other.clone(), matching.clone()];
        assert_eq!(select_issuer(&leaf, &pool).unwrap().subject.raw, vec![1, 2, 3]);
        let pool = [other.clone(), other];
        assert!(select_issuer(&leaf, &pool).is_none());
    }

    #[test]
    fn test_linter_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Linter>();
    }
}
