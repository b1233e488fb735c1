//! Severity-tagged findings and their ordered aggregate.
//!
//! Every check in the crate (structural walk, format checks, compliance
//! rules, extension rules) reports through [`Findings`]. The aggregate keeps
//! insertion order and tracks the worst severity seen so far, so callers can
//! decide pass/fail by comparing against a threshold.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Syslog-style severity levels.
///
/// Declared least severe first so the derived `Ord` makes
/// `Emergency` the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

impl Severity {
    /// All levels, least severe first.
    pub const ALL: [Severity; 8] = [
        Severity::Debug,
        Severity::Info,
        Severity::Notice,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
        Severity::Alert,
        Severity::Emergency,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Notice => "notice",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
            Severity::Alert => "alert",
            Severity::Emergency => "emergency",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "notice" => Ok(Severity::Notice),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" | "err" => Ok(Severity::Error),
            "critical" | "crit" => Ok(Severity::Critical),
            "alert" => Ok(Severity::Alert),
            "emergency" | "emerg" => Ok(Severity::Emergency),
            other => Err(format!("unknown severity level '{}'", other)),
        }
    }
}

/// One reported deviation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Insertion-ordered findings with a cached worst severity.
///
/// The only way to add a finding is through methods that also update the
/// cached maximum, so `worst()` always matches the contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Findings {
    list: Vec<Finding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    worst: Option<Severity>,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, finding: Finding) {
        self.worst = self.worst.max(Some(finding.severity));
        self.list.push(finding);
    }

    pub fn add(&mut self, severity: Severity, message: impl Into<String>) {
        self.push(Finding::new(severity, message));
    }

    pub fn emerg(&mut self, message: impl Into<String>) {
        self.add(Severity::Emergency, message);
    }

    pub fn alert(&mut self, message: impl Into<String>) {
        self.add(Severity::Alert, message);
    }

    pub fn crit(&mut self, message: impl Into<String>) {
        self.add(Severity::Critical, message);
    }

    pub fn err(&mut self, message: impl Into<String>) {
        self.add(Severity::Error, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.add(Severity::Warning, message);
    }

    pub fn notice(&mut self, message: impl Into<String>) {
        self.add(Severity::Notice, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.add(Severity::Info, message);
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        self.add(Severity::Debug, message);
    }

    /// Append all findings of `other`, preserving both orders.
    pub fn append(&mut self, other: Findings) {
        self.worst = self.worst.max(other.worst);
        self.list.extend(other.list);
    }

    /// Concatenate two aggregates into a new one.
    pub fn merge(mut self, other: Findings) -> Findings {
        self.append(other);
        self
    }

    /// Highest severity contained, `None` when empty.
    pub fn worst(&self) -> Option<Severity> {
        self.worst
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Finding> {
        self.list.iter()
    }

    pub fn as_slice(&self) -> &[Finding] {
        &self.list
    }

    /// Findings of exactly `severity`, in order.
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.list.iter().filter(move |f| f.severity == severity)
    }

    /// Count findings of exactly `severity`.
    pub fn count(&self, severity: Severity) -> usize {
        self.with_severity(severity).count()
    }

    /// True when any finding is at or above `threshold`.
    pub fn reaches(&self, threshold: Severity) -> bool {
        self.worst.is_some_and(|w| w >= threshold)
    }

    /// True when any finding is `Error` or worse.
    pub fn is_error(&self) -> bool {
        self.reaches(Severity::Error)
    }
}

impl IntoIterator for Findings {
    type Item = Finding;
    type IntoIter = std::vec::IntoIter<Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

impl<'a> IntoIterator for &'a Findings {
    type Item = &'a Finding;
    type IntoIter = std::slice::Iter<'a, Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

impl FromIterator<Finding> for Findings {
    fn from_iter<I: IntoIterator<Item = Finding>>(iter: I) -> Self {
        let mut findings = Findings::new();
        for f in iter {
            findings.push(f);
        }
        findings
    }
}

impl Extend<Finding> for Findings {
    fn extend<I: IntoIterator<Item = Finding>>(&mut self, iter: I) {
        for f in iter {
            self.push(f);
        }
    }
}
