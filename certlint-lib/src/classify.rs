//! Certificate type classification.
//!
//! The type decides which rules run, so the deciding step is returned along
//! with the type and logged at debug level.

use crate::certificate::{CertType, Certificate, ExtKeyUsage};
use crate::{oid, policy, LintError};
use serde::Serialize;
use tracing::debug;

/// Which step of the decision procedure produced the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClassificationBasis {
    /// serverAuth EKU plus a recognized policy OID.
    ExtKeyUsagePolicy,
    /// A purpose-specific EKU (email, code signing, time stamping, OCSP).
    ExtKeyUsage,
    /// A recognized policy OID without a deciding EKU.
    PolicyIdentifier,
    /// emailAddress attribute in the subject.
    SubjectEmail,
    /// Common name containing `@` or a space.
    CommonNameIdentity,
    /// Common name is a registrable domain.
    RegistrableDomain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub cert_type: CertType,
    pub basis: ClassificationBasis,
}

/// Determine the certificate type.
///
/// Steps, first resolved wins:
/// 1. EKUs in encoding order; serverAuth consults the policy table, the
///    other purpose EKUs map directly. A later EKU overrides an earlier one.
/// 2. The policy table alone.
/// 3. emailAddress in the subject, or `@`/space in the common name → PS.
/// 4. Common name as a registrable domain → EV (O and serialNumber),
///    OV (O only) or DV.
pub fn classify(cert: &Certificate) -> Result<Classification, LintError> {
    let result = classify_inner(cert);
    match &result {
        Ok(c) => debug!(
            cert_type = %c.cert_type,
            basis = ?c.basis,
            subject = %cert.subject,
            "classified certificate"
        ),
        Err(e) => debug!(subject = %cert.subject, error = %e, "classification failed"),
    }
    result
}

fn classify_inner(cert: &Certificate) -> Result<Classification, LintError> {
    let mut resolved: Option<Classification> = None;
    for usage in &cert.ext_key_usage {
        let found = match usage {
            ExtKeyUsage::ServerAuth => policy::first_match(&cert.policies)
                .map(|t| (t, ClassificationBasis::ExtKeyUsagePolicy)),
            ExtKeyUsage::EmailProtection => Some((CertType::Ps, ClassificationBasis::ExtKeyUsage)),
            ExtKeyUsage::CodeSigning => Some((CertType::Cs, ClassificationBasis::ExtKeyUsage)),
            ExtKeyUsage::TimeStamping => Some((CertType::Ts, ClassificationBasis::ExtKeyUsage)),
            ExtKeyUsage::OcspSigning => Some((CertType::Ocsp, ClassificationBasis::ExtKeyUsage)),
            _ => None,
        };
        if let Some((cert_type, basis)) = found {
            resolved = Some(Classification { cert_type, basis });
        }
    }
    if let Some(c) = resolved {
        return Ok(c);
    }

    if let Some(cert_type) = policy::first_match(&cert.policies) {
        return Ok(Classification {
            cert_type,
            basis: ClassificationBasis::PolicyIdentifier,
        });
    }

    if cert.subject.contains(oid::EMAIL_ADDRESS) {
        return Ok(Classification {
            cert_type: CertType::Ps,
            basis: ClassificationBasis::SubjectEmail,
        });
    }

    let cn = cert.common_name();
    if cn.contains('@') || cn.contains(' ') {
        return Ok(Classification {
            cert_type: CertType::Ps,
            basis: ClassificationBasis::CommonNameIdentity,
        });
    }

    if is_registrable_domain(cn) {
        let cert_type = if cert.subject.contains(oid::ORGANIZATION) {
            if cert.subject.contains(oid::SERIAL_NUMBER) {
                CertType::Ev
            } else {
                CertType::Ov
            }
        } else {
            CertType::Dv
        };
        return Ok(Classification {
            cert_type,
            basis: ClassificationBasis::RegistrableDomain,
        });
    }

    Err(LintError::Classification(
        "Could not determine certificate type".into(),
    ))
}

/// True when `name` has at least one label left of its public suffix.
/// A leading `*.` is ignored.
pub fn is_registrable_domain(name: &str) -> bool {
    let name = name.trim_end_matches('.').to_ascii_lowercase();
    let name = name.strip_prefix("*.").unwrap_or(&name);
    if name.is_empty() || name.contains("..") {
        return false;
    }
    psl::domain(name.as_bytes()).is_some()
}
