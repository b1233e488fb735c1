//! certlint-lib: Library for linting X.509 certificates.
//!
//! Walks the raw DER for encoding defects, decodes the certificate,
//! classifies it (EV, OV, DV, PS, CA, ...) and runs the compliance rules
//! that apply to that type. Every problem is reported as a severity-tagged
//! [`Finding`]; callers decide pass/fail by comparing the worst severity of a
//! [`LintReport`] against a threshold.

pub mod certificate;
mod classify;
mod der;
pub mod finding;
mod fingerprint;
mod format;
mod lint;
pub mod oid;
mod parser;
pub mod policy;
pub mod registry;
mod report;
pub mod rules;

pub use certificate::{CertType, Certificate, DistinguishedName, Extension};
pub use classify::{classify, is_registrable_domain, Classification, ClassificationBasis};
pub use der::{validate_structure, validate_structure_with_depth, DEFAULT_MAX_DEPTH};
pub use finding::{Finding, Findings, Severity};
pub use fingerprint::sha256_fingerprint;
pub use format::{check_format, Primitive};
pub use lint::{lint, select_issuer, LintOptions, Linter};
pub use parser::{is_pem, parse_cert, parse_der, parse_pem, parse_pem_chain, pem_to_der};
pub use registry::{CertData, Filter, Registry, RegistryBuilder};
pub use report::{display_text, to_json, LintReport, SkipReason};

/// Errors returned by certlint-lib.
#[derive(Debug, thiserror::Error)]
pub enum LintError {
    #[error("Failed to parse certificate: {0}")]
    Parse(String),

    #[error("Invalid PEM format: {0}")]
    Pem(String),

    #[error("Invalid DER format: {0}")]
    Der(String),

    #[error("{0}")]
    Classification(String),

    #[error("Unsupported certificate version: {0}")]
    UnsupportedVersion(u32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
