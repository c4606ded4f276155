pub mod config;
pub mod core;
pub mod error;
pub mod lookup;
pub mod providers;

pub use config::Config;
pub use crate::core::provider::DnsRecordProvider;
pub use error::Error;
pub use providers::dnscmd::DnscmdRecord;
