use crate::certificate::Extension;
use crate::finding::Findings;
use crate::oid;
use crate::registry::{CertData, Filter, RegistryBuilder};

pub fn register(builder: &mut RegistryBuilder) {
    builder.extension_check(
        "KeyUsage Extension Check",
        oid::EXT_KEY_USAGE,
        Filter::Always,
        check,
    );
}

pub fn check(ext: &Extension, _data: &CertData<'_>) -> Findings {
    let mut findings = Findings::new();
    if !ext.critical {
        findings.warning("KeyUsage extension SHOULD be marked as critical when present");
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::{CertType, Certificate};

    #[test]
    fn test_key_usage_criticality() {
        let cert = Certificate::default();
        let data = CertData::new(&cert, CertType::Dv);
        assert!(check(&Extension::new(oid::EXT_KEY_USAGE, true, &[]), &data).is_empty());
        assert_eq!(
            check(&Extension::new(oid::EXT_KEY_USAGE, false, &[]), &data).len(),
            1
        );
    }
}
