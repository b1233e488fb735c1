use crate::finding::Findings;
use crate::registry::{CertData, Filter, RegistryBuilder};

pub fn register(builder: &mut RegistryBuilder) {
    builder.certificate_check("Version Check", Filter::Always, check);
}

pub fn check(data: &CertData<'_>) -> Findings {
    let mut findings = Findings::new();
    if data.cert.version != 3 {
        findings.err(format!("Certificate is not V3 ({})", data.cert.version));
    }
    findings
}
