//! Internal server names and non-public IP addresses in TLS certificates.

use crate::certificate::CertType;
use crate::finding::Findings;
use crate::registry::{CertData, Filter, RegistryBuilder};
use std::net::{IpAddr, Ipv6Addr};

pub fn register(builder: &mut RegistryBuilder) {
    builder.certificate_check(
        "Internal Names and IP addresses Check",
        Filter::Only(CertType::TLS_SERVER),
        check,
    );
}

pub fn check(data: &CertData<'_>) -> Findings {
    let mut findings = Findings::new();
    let cert = data.cert;

    let cn = cert.common_name();
    if !cn.is_empty() && cn.parse::<IpAddr>().is_err() && is_internal_name(cn) {
        findings.err(format!(
            "Certificate contains an internal server name in the common name '{}'",
            cn
        ));
    }
    for name in cert.dns_names.iter().filter(|n| is_internal_name(n)) {
        findings.err(format!(
            "Certificate subjectAltName '{}' contains an internal server name",
            name
        ));
    }

    for ip in &cert.ip_addresses {
        if !is_global_unicast(ip) {
            findings.err(format!(
                "Certificate subjectAltName '{}' contains a non global unicast IP address",
                ip
            ));
        }
        if is_private(ip) {
            findings.err(format!(
                "Certificate subjectAltName '{}' contains a private or local IP address",
                ip
            ));
        }
    }
    findings
}

/// A single label, or a name whose suffix is not on the public suffix list.
pub fn is_internal_name(name: &str) -> bool {
    let name = name.trim_end_matches('.').to_ascii_lowercase();
    let name = name.strip_prefix("*.").unwrap_or(&name);
    if !name.contains('.') {
        return true;
    }
    !psl::suffix(name.as_bytes()).is_some_and(|s| s.is_known())
}

fn is_global_unicast(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_unspecified()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_multicast()
                || v4.is_broadcast())
        }
        IpAddr::V6(v6) => {
            !(v6.is_unspecified() || v6.is_loopback() || v6.is_multicast() || is_v6_link_local(v6))
        }
    }
}

fn is_private(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private(),
        IpAddr::V6(v6) => v6.segments().first().is_some_and(|s| s & 0xfe00 == 0xfc00),
    }
}

fn is_v6_link_local(v6: &Ipv6Addr) -> bool {
    v6.segments().first().is_some_and(|s| s & 0xffc0 == 0xfe80)
}
