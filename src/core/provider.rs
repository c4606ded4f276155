use crate::error::Error;
use async_trait::async_trait;
use std::net::{IpAddr, Ipv4Addr};

#[async_trait]
pub trait DnsRecordProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn create_a_record(&self, fqdn: &str, ip: Ipv4Addr) -> Result<(), Error>;
    async fn remove_a_record(&self, fqdn: &str) -> Result<(), Error>;
    /// Returns `true` once the pre-flight check passes; no record is written.
    async fn create_ptr_record(&self, fqdn: &str, ip: IpAddr) -> Result<bool, Error>;
    /// Returns `true` once the pre-flight check passes; no record is removed.
    async fn remove_ptr_record(&self, ip: IpAddr) -> Result<bool, Error>;
}
