use log::debug;

use crate::core::record::normalize_name;
use crate::error::Error;
use crate::providers::dnscmd::executor::DnscmdExecutor;

impl DnscmdExecutor {
    /// Zones the server hosts as primary, in the order dnscmd lists them.
    pub async fn enum_zones(&self) -> Result<Vec<String>, Error> {
        let description = format!("enumerate zones on {}", self.server());
        let lines = self.execute(&["/EnumZones"], &description, true).await?;
        let zones = parse_zone_rows(&lines, &self.markers().primary_zone);
        debug!("Enumerated dns zones: {zones:?}");
        Ok(zones)
    }

    /// The most specific zone the server is authoritative for `fqdn` in.
    pub async fn match_zone(&self, fqdn: &str) -> Result<String, Error> {
        let zones = self.enum_zones().await?;
        select_zone(fqdn, &zones)
            .map(str::to_string)
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "The DNS server has no authoritative zone for {fqdn}"
                ))
            })
    }
}

pub fn parse_zone_rows(lines: &[String], marker: &str) -> Vec<String> {
    lines
        .iter()
        .filter(|line| line.contains(marker))
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Longest-suffix match of `zones` against `fqdn` minus its host label. Ties
/// go to the zone listed last.
pub fn select_zone<'a>(fqdn: &str, zones: &'a [String]) -> Option<&'a str> {
    let mut name_labels = normalize_name(fqdn).split('.');
    // The host label can never be part of the zone.
    name_labels.next();
    let name_labels: Vec<&str> = name_labels.collect();

    let mut best: Option<(&str, usize)> = None;
    for zone in zones {
        let zone_labels: Vec<&str> = zone.split('.').filter(|l| !l.is_empty()).collect();
        let weight = zone_labels.len();
        if weight > name_labels.len() {
            continue;
        }
        let is_match = zone_labels
            .iter()
            .rev()
            .zip(name_labels.iter().rev())
            .all(|(z, n)| z.eq_ignore_ascii_case(n));
        if is_match && best.is_none_or(|(_, w)| weight >= w) {
            best = Some((zone.as_str(), weight));
        }
    }
    best.map(|(zone, _)| zone)
}
