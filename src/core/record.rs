use std::fmt;
use std::net::Ipv4Addr;

/// A desired A-record binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ARecord {
    pub fqdn: String,
    pub ip: Ipv4Addr,
}

impl ARecord {
    pub fn new(fqdn: &str, ip: Ipv4Addr) -> Self {
        ARecord {
            fqdn: normalize_name(fqdn).to_string(),
            ip,
        }
    }

    /// Owner name in the absolute form dnscmd expects, e.g. `host.example.com.`
    pub fn owner(&self) -> String {
        format!("{}.", self.fqdn)
    }
}

impl fmt::Display for ARecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.fqdn, self.ip)
    }
}

/// Strips a trailing root dot so `host.example.com.` and `host.example.com`
/// refer to the same name.
pub fn normalize_name(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// DNS names compare case-insensitively.
pub fn same_name(a: &str, b: &str) -> bool {
    normalize_name(a).eq_ignore_ascii_case(normalize_name(b))
}
