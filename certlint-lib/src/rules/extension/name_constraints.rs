use crate::certificate::Extension;
use crate::finding::Findings;
use crate::oid;
use crate::registry::{CertData, Filter, RegistryBuilder};

pub fn register(builder: &mut RegistryBuilder) {
    builder.extension_check(
        "NameConstraints Extension Check",
        oid::EXT_NAME_CONSTRAINTS,
        Filter::Always,
        check,
    );
}

/// Non-critical name constraints are common in practice, so only warn.
pub fn check(ext: &Extension, data: &CertData<'_>) -> Findings {
    let mut findings = Findings::new();
    if !ext.critical {
        findings.warning("NameConstraints extension set non-critical");
    }
    if !data.is_ca() {
        findings.err("End entity certificate should not contain a NameConstraints extension");
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::{CertType, Certificate};
    use crate::finding::Severity;

    #[test]
    fn test_name_constraints() {
        let cert = Certificate::default();
        let ext = Extension::new(oid::EXT_NAME_CONSTRAINTS, false, &[]);

        let f = check(&ext, &CertData::new(&cert, CertType::Ca));
        assert_eq!(f.worst(), Some(Severity::Warning));

        let f = check(&ext, &CertData::new(&cert, CertType::Ov));
        assert_eq!(f.count(Severity::Warning), 1);
        assert_eq!(f.count(Severity::Error), 1);

        let ext = Extension::new(oid::EXT_NAME_CONSTRAINTS, true, &[]);
        assert!(check(&ext, &CertData::new(&cert, CertType::Ca)).is_empty());
    }
}
