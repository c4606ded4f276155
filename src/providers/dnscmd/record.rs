use async_trait::async_trait;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use crate::config::Config;
use crate::core::provider::DnsRecordProvider;
use crate::core::record::{ARecord, same_name};
use crate::error::Error;
use crate::lookup::DnsLookup;
use crate::providers::dnscmd::executor::{CommandRunner, DnscmdExecutor};

/// A and PTR record management on a Microsoft DNS server through dnscmd.
///
/// The server keeps PTR records in step with A records itself, so the PTR
/// operations only check for conflicting bindings.
pub struct DnscmdRecord<L: DnsLookup> {
    executor: DnscmdExecutor,
    lookup: L,
    ttl: u32,
}

impl<L: DnsLookup> DnscmdRecord<L> {
    pub fn new(config: &Config, lookup: L, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            executor: DnscmdExecutor::new(config, runner),
            lookup,
            ttl: config.dns_ttl,
        }
    }

    pub fn with_server(mut self, server: Option<&str>) -> Self {
        if let Some(server) = server {
            self.executor = self.executor.with_server(server);
        }
        self
    }

    pub fn with_ttl(mut self, ttl: Option<u32>) -> Self {
        if let Some(ttl) = ttl {
            self.ttl = ttl;
        }
        self
    }

    pub fn server(&self) -> &str {
        self.executor.server()
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn executor(&self) -> &DnscmdExecutor {
        &self.executor
    }
}

#[async_trait]
impl<L: DnsLookup> DnsRecordProvider for DnscmdRecord<L> {
    fn name(&self) -> &str {
        "dnscmd"
    }

    async fn create_a_record(&self, fqdn: &str, ip: Ipv4Addr) -> Result<(), Error> {
        if let Some(found) = self.lookup.find_address(fqdn).await {
            if found != ip {
                return Err(Error::Collision(format!("{fqdn} is already used by {found}")));
            }
            return Ok(());
        }

        let record = ARecord::new(fqdn, ip);
        let zone = self.executor.match_zone(&record.fqdn).await?;
        let description = format!("Added DNS entry {record}");
        let owner = record.owner();
        let address = ip.to_string();
        self.executor
            .execute(
                &["/RecordAdd", zone.as_str(), owner.as_str(), "A", address.as_str()],
                &description,
                false,
            )
            .await?;
        Ok(())
    }

    async fn remove_a_record(&self, fqdn: &str) -> Result<(), Error> {
        let Some(ip) = self.lookup.find_address(fqdn).await else {
            return Err(Error::NotFound(format!("Cannot find DNS entry for {fqdn}")));
        };

        let record = ARecord::new(fqdn, ip);
        let zone = self.executor.match_zone(&record.fqdn).await?;
        let description = format!("Removed DNS entry {record}");
        let owner = record.owner();
        self.executor
            .execute(
                &["/RecordDelete", zone.as_str(), owner.as_str(), "A", "/f"],
                &description,
                false,
            )
            .await?;
        Ok(())
    }

    async fn create_ptr_record(&self, fqdn: &str, ip: IpAddr) -> Result<bool, Error> {
        if let Some(found) = self.lookup.find_name(ip).await {
            if !same_name(&found, fqdn) {
                return Err(Error::Collision(format!("{ip} is already used by {found}")));
            }
        }
        Ok(true)
    }

    async fn remove_ptr_record(&self, ip: IpAddr) -> Result<bool, Error> {
        if self.lookup.find_name(ip).await.is_none() {
            return Err(Error::NotFound(format!("Cannot find DNS entry for {ip}")));
        }
        Ok(true)
    }
}
