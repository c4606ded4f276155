use crate::config::Config;
use crate::core::record::normalize_name;
use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use log::{debug, warn};
use std::net::{IpAddr, Ipv4Addr};

/// Name resolution used for pre-flight checks. Any failure to resolve is
/// reported as `None`, never as an error. Forward lookups only consider A
/// bindings.
#[async_trait]
pub trait DnsLookup: Send + Sync {
    async fn find_address(&self, fqdn: &str) -> Option<Ipv4Addr>;
    async fn find_name(&self, ip: IpAddr) -> Option<String>;
}

pub struct ResolverLookup {
    resolver: TokioAsyncResolver,
}

impl ResolverLookup {
    pub fn new(config: &Config) -> Self {
        let resolver = match config.dns_server.parse::<IpAddr>() {
            Ok(server) => {
                let name_servers = NameServerConfigGroup::from_ips_clear(&[server], 53, true);
                TokioAsyncResolver::tokio(
                    ResolverConfig::from_parts(None, vec![], name_servers),
                    ResolverOpts::default(),
                )
            }
            Err(_) => TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|e| {
                warn!("Falling back to default resolver configuration: {e}");
                TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
            }),
        };
        Self { resolver }
    }
}

#[async_trait]
impl DnsLookup for ResolverLookup {
    async fn find_address(&self, fqdn: &str) -> Option<Ipv4Addr> {
        // Absolute name so search domains are never appended.
        let name = format!("{}.", normalize_name(fqdn));
        match self.resolver.lookup_ip(name.as_str()).await {
            Ok(response) => response.iter().find_map(|ip| match ip {
                IpAddr::V4(v4) => Some(v4),
                IpAddr::V6(_) => None,
            }),
            Err(e) => {
                debug!("No address for {fqdn}: {e}");
                None
            }
        }
    }

    async fn find_name(&self, ip: IpAddr) -> Option<String> {
        match self.resolver.reverse_lookup(ip).await {
            Ok(response) => response
                .iter()
                .next()
                .map(|ptr| normalize_name(&ptr.to_utf8()).to_string()),
            Err(e) => {
                debug!("No name for {ip}: {e}");
                None
            }
        }
    }
}

pub mod mock {
    use super::*;
    use crate::core::record::same_name;

    /// In-memory bindings for tests and dry runs.
    #[derive(Default)]
    pub struct StaticLookup {
        pub addresses: Vec<(String, IpAddr)>,
    }

    impl StaticLookup {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn bind(mut self, fqdn: &str, ip: IpAddr) -> Self {
            self.addresses.push((fqdn.to_string(), ip));
            self
        }
    }

    #[async_trait]
    impl DnsLookup for StaticLookup {
        async fn find_address(&self, fqdn: &str) -> Option<Ipv4Addr> {
            self.addresses
                .iter()
                .filter(|(name, _)| same_name(name, fqdn))
                .find_map(|(_, ip)| match ip {
                    IpAddr::V4(v4) => Some(*v4),
                    IpAddr::V6(_) => None,
                })
        }

        async fn find_name(&self, ip: IpAddr) -> Option<String> {
            self.addresses
                .iter()
                .find(|(_, bound)| *bound == ip)
                .map(|(name, _)| name.clone())
        }
    }
}
