//! Extensions that must never be marked critical.

use crate::certificate::Extension;
use crate::finding::Findings;
use crate::oid;
use crate::registry::{Filter, RegistryBuilder};

/// (check name, extension OID, label used in the finding)
const NON_CRITICAL: &[(&str, &str, &str)] = &[
    (
        "AuthorityInfoAccess Extension Check",
        oid::EXT_AUTHORITY_INFO_ACCESS,
        "AuthorityInfoAccess",
    ),
    (
        "AuthorityKeyId Extension Check",
        oid::EXT_AUTHORITY_KEY_ID,
        "AuthorityKeyId",
    ),
    (
        "SubjectKeyId Extension Check",
        oid::EXT_SUBJECT_KEY_ID,
        "SubjectKeyId",
    ),
    (
        "CRLDistributionPoints Extension Check",
        oid::EXT_CRL_DISTRIBUTION_POINTS,
        "CRLDistributionPoints",
    ),
    (
        "PolicyIdentifiers Extension Check",
        oid::EXT_CERTIFICATE_POLICIES,
        "PolicyIdentifiers",
    ),
    (
        "Certificate Transparency Extension Check",
        oid::EXT_SCT_LIST,
        "Certificate Transparency",
    ),
];

pub fn register(builder: &mut RegistryBuilder) {
    for &(name, ext_oid, label) in NON_CRITICAL {
        builder.extension_check(name, ext_oid, Filter::Always, move |ext, _| {
            check(label, ext)
        });
    }
}

fn check(label: &str, ext: &Extension) -> Findings {
    let mut findings = Findings::new();
    if ext.critical {
        findings.err(format!("{} extension set critical", label));
    }
    findings
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::certificate::{CertType, Certificate};
    use crate::registry::{CertData, Registry};

    #[test]
    fn test_critical_is_error() {
        let mut b = Registry::builder();
        register(&mut b);
        let reg = b.build();
        let cert = Certificate::default();
        let data = CertData::new(&cert, CertType::Dv);

        for &(_, ext_oid, label) in NON_CRITICAL {
            let f = reg.run_extension_checks(&Extension::new(ext_oid, false, &[]), &data);
            assert!(f.is_empty(), "{}", label);

            let f = reg.run_extension_checks(&Extension::new(ext_oid, true, &[]), &data);
            assert_eq!(f.len(), 1);
            assert_eq!(f.as_slice()[0].message, format!("{} extension set critical", label));
        }
    }
}
