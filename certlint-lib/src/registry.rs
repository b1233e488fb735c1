//! Check registry: certificate-level and extension-level rule dispatch.
//!
//! A [`Registry`] is built once with [`RegistryBuilder`] and is immutable
//! afterwards, so a single instance can be shared by any number of threads.
//! Registration order is execution order.

use crate::certificate::{CertType, Certificate, Extension};
use crate::finding::Findings;
use crate::oid;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, warn};

/// Which certificate types a check applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Always,
    Only(&'static [CertType]),
}

impl Filter {
    pub fn applies(&self, cert_type: CertType) -> bool {
        match self {
            Filter::Always => true,
            Filter::Only(types) => types.contains(&cert_type),
        }
    }
}

/// Everything a check may look at.
#[derive(Debug, Clone, Copy)]
pub struct CertData<'a> {
    pub cert: &'a Certificate,
    pub cert_type: CertType,
    /// Issuing CA certificate, when the caller supplied one.
    pub issuer: Option<&'a Certificate>,
}

impl<'a> CertData<'a> {
    pub fn new(cert: &'a Certificate, cert_type: CertType) -> Self {
        Self {
            cert,
            cert_type,
            issuer: None,
        }
    }

    pub fn with_issuer(mut self, issuer: Option<&'a Certificate>) -> Self {
        self.issuer = issuer;
        self
    }

    /// CA by type code or by basicConstraints.
    pub fn is_ca(&self) -> bool {
        self.cert_type == CertType::Ca || self.cert.is_ca()
    }
}

pub type CertificateHandler = Box<dyn Fn(&CertData<'_>) -> Findings + Send + Sync>;
pub type ExtensionHandler = Box<dyn Fn(&Extension, &CertData<'_>) -> Findings + Send + Sync>;

struct CertificateCheck {
    name: &'static str,
    filter: Filter,
    handler: CertificateHandler,
}

struct ExtensionCheck {
    name: &'static str,
    oid: &'static str,
    filter: Filter,
    handler: ExtensionHandler,
}

/// Immutable set of registered checks.
pub struct Registry {
    certificate: Vec<CertificateCheck>,
    extension: Vec<ExtensionCheck>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field(
                "certificate",
                &self.certificate.iter().map(|c| c.name).collect::<Vec<_>>(),
            )
            .field(
                "extension",
                &self
                    .extension
                    .iter()
                    .map(|c| (c.name, c.oid))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Collects checks before freezing them into a [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
    certificate: Vec<CertificateCheck>,
    extension: Vec<ExtensionCheck>,
}

impl RegistryBuilder {
    /// Register a whole-certificate check.
    pub fn certificate_check<F>(&mut self, name: &'static str, filter: Filter, handler: F) -> &mut Self
    where
        F: Fn(&CertData<'_>) -> Findings + Send + Sync + 'static,
    {
        self.certificate.push(CertificateCheck {
            name,
            filter,
            handler: Box::new(handler),
        });
        self
    }

    /// Register a check run for every extension whose OID equals `ext_oid`.
    pub fn extension_check<F>(
        &mut self,
        name: &'static str,
        ext_oid: &'static str,
        filter: Filter,
        handler: F,
    ) -> &mut Self
    where
        F: Fn(&Extension, &CertData<'_>) -> Findings + Send + Sync + 'static,
    {
        self.extension.push(ExtensionCheck {
            name,
            oid: ext_oid,
            filter,
            handler: Box::new(handler),
        });
        self
    }

    pub fn build(self) -> Registry {
        Registry {
            certificate: self.certificate,
            extension: self.extension,
        }
    }
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry with the complete built-in rule set, in its fixed order.
    pub fn default_rules() -> Registry {
        let mut builder = Registry::builder();
        crate::rules::register_all(&mut builder);
        builder.build()
    }

    /// Names and filters of the certificate-level checks, in order.
    pub fn certificate_checks(&self) -> impl Iterator<Item = (&'static str, Filter)> + '_ {
        self.certificate.iter().map(|c| (c.name, c.filter))
    }

    /// Names, OIDs and filters of the extension-level checks, in order.
    pub fn extension_checks(
        &self,
    ) -> impl Iterator<Item = (&'static str, &'static str, Filter)> + '_ {
        self.extension.iter().map(|c| (c.name, c.oid, c.filter))
    }

    /// Run every certificate-level check whose filter accepts the type.
    pub fn run_certificate_checks(&self, data: &CertData<'_>) -> Findings {
        let mut findings = Findings::new();
        let mut ran = 0usize;
        for check in &self.certificate {
            if !check.filter.applies(data.cert_type) {
                continue;
            }
            ran += 1;
            findings.append(isolate(check.name, || (check.handler)(data)));
        }
        debug!(
            cert_type = %data.cert_type,
            ran,
            registered = self.certificate.len(),
            "ran certificate checks"
        );
        findings
    }

    /// Run the checks registered for `ext`'s OID.
    ///
    /// An OID with no registered check outside the private enterprise arc
    /// is reported as unknown. A check skipped by its filter still counts
    /// as registered.
    pub fn run_extension_checks(&self, ext: &Extension, data: &CertData<'_>) -> Findings {
        let mut findings = Findings::new();
        let mut known = false;
        for check in self.extension.iter().filter(|c| c.oid == ext.oid) {
            known = true;
            if !check.filter.applies(data.cert_type) {
                continue;
            }
            findings.append(isolate(check.name, || (check.handler)(ext, data)));
        }

        if !known && !oid::is_under(&ext.oid, oid::PRIVATE_ENTERPRISE_ARC) {
            findings.err(format!("Certificate contains unknown extension {}", ext.oid));
        }
        findings
    }
}

/// Run a handler, turning a panic into an Error finding naming the check.
fn isolate<F>(name: &str, handler: F) -> Findings
where
    F: FnOnce() -> Findings,
{
    match catch_unwind(AssertUnwindSafe(handler)) {
        Ok(findings) => findings,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".into());
            warn!(check = name, reason = %reason, "check panicked");
            let mut findings = Findings::new();
            findings.err(format!("Check '{}' failed internally: {}", name, reason));
            findings
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::finding::Severity;

    const DV_OV: &[CertType] = &[CertType::Dv, CertType::Ov];

    fn message(text: &'static str) -> impl Fn(&CertData<'_>) -> Findings + Send + Sync {
        move |_| {
            let mut f = Findings::new();
            f.warning(text);
            f
        }
    }

    #[test]
    fn test_filter_is_data() {
        assert!(Filter::Always.applies(CertType::Ca));
        assert!(Filter::Only(DV_OV).applies(CertType::Ov));
        assert!(!Filter::Only(DV_OV).applies(CertType::Ev));
    }

    #[test]
    fn test_registration_order_is_execution_order() {
        let mut b = Registry::builder();
        b.certificate_check("first", Filter::Always, message("1"))
            .certificate_check("second", Filter::Always, message("2"))
            .certificate_check("third", Filter::Always, message("3"));
        let reg = b.build();

        let cert = Certificate::default();
        let f = reg.run_certificate_checks(&CertData::new(&cert, CertType::Dv));
        let msgs: Vec<_> = f.iter().map(|x| x.message.as_str()).collect();
        assert_eq!(msgs, vec!["1", "2", "3"]);
        let names: Vec<_> = reg.certificate_checks().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_filter_skips_check() {
        let mut b = Registry::builder();
        b.certificate_check("tls only", Filter::Only(DV_OV), message("tls"));
        let reg = b.build();
        let cert = Certificate::default();
        assert!(reg
            .run_certificate_checks(&CertData::new(&cert, CertType::Ps))
            .is_empty());
        assert_eq!(
            reg.run_certificate_checks(&CertData::new(&cert, CertType::Dv))
                .len(),
            1
        );
    }

    #[test]
    fn test_panicking_check_is_isolated() {
        let mut b = Registry::builder();
        b.certificate_check("boom", Filter::Always, |_| panic!("kaboom"))
            .certificate_check("after", Filter::Always, message("still ran"));
        let reg = b.build();
        let cert = Certificate::default();
        let f = reg.run_certificate_checks(&CertData::new(&cert, CertType::Dv));
        assert_eq!(f.len(), 2);
        assert_eq!(f.as_slice()[0].severity, Severity::Error);
        assert!(f.as_slice()[0].message.contains("'boom'"));
        assert!(f.as_slice()[0].message.contains("kaboom"));
        assert_eq!(f.as_slice()[1].message, "still ran");
    }

    #[test]
    fn test_unknown_extension() {
        let reg = Registry::builder().build();
        let cert = Certificate::default();
        let data = CertData::new(&cert, CertType::Dv);

        let f = reg.run_extension_checks(&Extension::new("1.2.3.4", false, &[]), &data);
        assert_eq!(f.len(), 1);
        assert_eq!(f.worst(), Some(Severity::Error));
        assert!(f.as_slice()[0].message.ends_with("unknown extension 1.2.3.4"));

        let f = reg.run_extension_checks(&Extension::new("1.3.6.1.4.1.99.1", false, &[]), &data);
        assert!(f.is_empty());
    }

    #[test]
    fn test_extension_checks_share_oid() {
        let mut b = Registry::builder();
        b.extension_check("a", "2.5.29.15", Filter::Always, |_, _| {
            let mut f = Findings::new();
            f.notice("a");
            f
        })
        .extension_check("b", "2.5.29.15", Filter::Always, |_, _| {
            let mut f = Findings::new();
            f.notice("b");
            f
        });
        let reg = b.build();
        let cert = Certificate::default();
        let data = CertData::new(&cert, CertType::Dv);
        let f = reg.run_extension_checks(&Extension::new("2.5.29.15", true, &[]), &data);
        assert_eq!(f.len(), 2);
    }

    #[test]
    fn test_filtered_extension_is_not_unknown() {
        let mut b = Registry::builder();
        b.extension_check("ev only", "2.5.29.99", Filter::Only(&[CertType::Ev]), |_, _| {
            let mut f = Findings::new();
            f.err("should not run");
            f
        });
        let reg = b.build();
        let cert = Certificate::default();
        let f = reg.run_extension_checks(
            &Extension::new("2.5.29.99", false, &[]),
            &CertData::new(&cert, CertType::Dv),
        );
        assert!(f.is_empty());
    }

    #[test]
    fn test_registry_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry>();
    }
}
