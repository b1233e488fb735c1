//! Revocation information must be present and reachable over plain HTTP.

use crate::certificate::CertType;
use crate::finding::Findings;
use crate::registry::{CertData, Filter, RegistryBuilder};
use url::Url;

pub fn register(builder: &mut RegistryBuilder) {
    builder.certificate_check(
        "Certificate Revocation Information Check",
        Filter::Only(CertType::END_ENTITY),
        check,
    );
}

pub fn check(data: &CertData<'_>) -> Findings {
    let mut findings = Findings::new();
    let cert = data.cert;
    if cert.crl_distribution_points.is_empty() && cert.ocsp_servers.is_empty() {
        findings.err("Certificate contains no CRL or OCSP server");
        return findings;
    }

    for crl in &cert.crl_distribution_points {
        match Url::parse(crl) {
            Err(_) => findings.err(format!("Certificate contains an invalid CRL ({})", crl)),
            Ok(u) if u.scheme() != "http" => findings.err(format!(
                "Certificate contains a CRL with a non-preferred scheme ({})",
                u.scheme()
            )),
            Ok(_) => {}
        }
    }
    for server in &cert.ocsp_servers {
        match Url::parse(server) {
            Err(_) => findings.err(format!(
                "Certificate contains an invalid OCSP server ({})",
                server
            )),
            Ok(u) if u.scheme() != "http" => findings.err(format!(
                "Certificate contains an OCSP server with a non-preferred scheme ({})",
                u.scheme()
            )),
            Ok(_) => {}
        }
    }
    findings
}
