use std::net::{IpAddr, Ipv4Addr};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dns_dnscmd::lookup::ResolverLookup;
use dns_dnscmd::providers::dnscmd::ProcessRunner;
use dns_dnscmd::{Config, DnsRecordProvider, DnscmdRecord, Error};
use log::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(about = "Manage A/PTR records on a Microsoft DNS server through dnscmd")]
struct Cli {
    /// DNS server to administer; defaults to DNS_SERVER
    #[arg(long)]
    server: Option<String>,

    /// Record TTL; defaults to DNS_TTL
    #[arg(long)]
    ttl: Option<u32>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    CreateA { fqdn: String, ip: Ipv4Addr },
    RemoveA { fqdn: String },
    CreatePtr { fqdn: String, ip: IpAddr },
    RemovePtr { ip: IpAddr },
    /// List the primary zones hosted by the server
    Zones,
    /// Show which zone a name would be created in
    MatchZone { fqdn: String },
}

async fn run(cli: Cli) -> Result<(), Error> {
    let mut config = Config::from_env();
    // Pre-flight lookups go to the same server that is administered.
    if let Some(server) = cli.server {
        config.dns_server = server;
    }
    let lookup = ResolverLookup::new(&config);
    let provider = DnscmdRecord::new(&config, lookup, Arc::new(ProcessRunner)).with_ttl(cli.ttl);
    info!(
        "Using dnscmd against {} (ttl {})",
        provider.server(),
        provider.ttl()
    );

    match cli.action {
        Action::CreateA { fqdn, ip } => provider.create_a_record(&fqdn, ip).await?,
        Action::RemoveA { fqdn } => provider.remove_a_record(&fqdn).await?,
        Action::CreatePtr { fqdn, ip } => {
            provider.create_ptr_record(&fqdn, ip).await?;
        }
        Action::RemovePtr { ip } => {
            provider.remove_ptr_record(ip).await?;
        }
        Action::Zones => {
            for zone in provider.executor().enum_zones().await? {
                println!("{zone}");
            }
        }
        Action::MatchZone { fqdn } => {
            println!("{}", provider.executor().match_zone(&fqdn).await?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
