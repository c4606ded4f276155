use std::env;
use std::path::PathBuf;

const INTERPRETER_64: &str = r"c:\windows\sysnative\cmd.exe";
const INTERPRETER_32: &str = r"c:\windows\system32\cmd.exe";

#[derive(Clone, Debug)]
pub struct Config {
    pub dns_server: String,
    pub dns_ttl: u32,
    pub x86_64: bool,
    pub dnscmd_path: String,
}

impl Config {
    /// Unset or malformed variables fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Config {
            dns_server: env::var("DNS_SERVER").unwrap_or(defaults.dns_server),
            dns_ttl: env::var("DNS_TTL")
                .unwrap_or_else(|_| defaults.dns_ttl.to_string())
                .parse()
                .unwrap_or(defaults.dns_ttl),
            x86_64: env::var("DNSCMD_X86_64")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.x86_64),
            dnscmd_path: env::var("DNSCMD_PATH").unwrap_or(defaults.dnscmd_path),
        }
    }

    /// Command interpreter used to launch dnscmd. A 32-bit process on a 64-bit
    /// host has to go through `sysnative` to reach the native `cmd.exe`.
    pub fn interpreter(&self) -> PathBuf {
        if self.x86_64 {
            PathBuf::from(INTERPRETER_64)
        } else {
            PathBuf::from(INTERPRETER_32)
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dns_server: String::from("localhost"),
            dns_ttl: 86400,
            x86_64: cfg!(target_arch = "x86_64"),
            dnscmd_path: String::from(r"c:\Windows\System32\dnscmd.exe"),
        }
    }
}
