//! Local address, public address and location, and interface traffic.
//!
//! The geolocation lookup is the only network round-trip of a run. It is
//! bounded by the configured request timeout; on timeout or any other
//! failure its four fields fall back to `N/A`.

use super::command::{mebibytes, read, run};
use crate::config::NetworkConfig;
use crate::error::FetchError;
use crate::models::{fields, InfoRecord, NOT_AVAILABLE};
use anyhow::Result;
use regex::Regex;
use serde::Deserialize;
use std::net::UdpSocket;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, warn};

/// Public address and location as reported by the geolocation endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoInfo {
    pub public_ip: Option<String>,
    pub isp: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// ip-api.com style response body.
#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    status: String,
    query: Option<String>,
    isp: Option<String>,
    city: Option<String>,
    country: Option<String>,
}

/// Client for the geolocation endpoint.
#[derive(Debug, Clone)]
pub struct GeoLookup {
    client: reqwest::Client,
    endpoint: String,
}

impl GeoLookup {
    /// Builds a lookup whose requests give up after the configured timeout.
    pub fn new(config: &NetworkConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.geo_endpoint.clone(),
        })
    }

    /// Queries the endpoint. Any failure yields an empty `GeoInfo`.
    pub async fn lookup(&self) -> GeoInfo {
        match self.fetch().await {
            Ok(info) => info,
            Err(e) => {
                debug!("Geolocation lookup failed: {:#}", e);
                GeoInfo::default()
            }
        }
    }

    async fn fetch(&self) -> Result<GeoInfo> {
        let response: GeoResponse = self
            .client
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.status != "success" {
            debug!("Geolocation endpoint returned status '{}'", response.status);
            return Ok(GeoInfo::default());
        }

        Ok(GeoInfo {
            public_ip: response.query,
            isp: response.isp,
            city: response.city,
            country: response.country,
        })
    }
}

/// Collects the network section.
pub async fn collect(config: NetworkConfig) -> Result<InfoRecord> {
    let geo = async {
        match GeoLookup::new(&config) {
            Ok(lookup) => lookup.lookup().await,
            Err(e) => {
                warn!("{}", e);
                GeoInfo::default()
            }
        }
    };
    let local = tokio::task::spawn_blocking(local_ip);
    let traffic = tokio::task::spawn_blocking(|| read("/proc/net/dev").map(|c| parse_net_dev(&c)));

    let (geo, local, traffic) = tokio::join!(geo, local, traffic);

    let mut info = InfoRecord::new();
    info.insert_or_na(fields::LOCAL_IP, local.ok().flatten());
    info.insert_or_na(fields::PUBLIC_IP, geo.public_ip);
    info.insert_or_na(fields::ISP, geo.isp);
    info.insert_or_na(fields::CITY, geo.city);
    info.insert_or_na(fields::COUNTRY, geo.country);

    let traffic = traffic.ok().flatten().unwrap_or_default();
    info.insert(fields::BANDWIDTH, traffic.to_string());

    debug!("Network collector produced {} fields", info.len());
    Ok(info)
}

fn local_ip() -> Option<String> {
    run("ip", &["route", "get", "1.1.1.1"])
        .and_then(|out| parse_route_src(&out))
        .or_else(socket_local_ip)
}

/// Asks the OS which local address would route to a public host. No
/// packet is sent for a UDP connect.
fn socket_local_ip() -> Option<String> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    socket.local_addr().ok().map(|addr| addr.ip().to_string())
}

fn route_src_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\bsrc (\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})").expect("route pattern is valid")
    })
}

/// Extracts the source address from `ip route get` output.
pub fn parse_route_src(output: &str) -> Option<String> {
    route_src_pattern()
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Sent/received byte counters of one interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Traffic {
    pub sent: Option<u64>,
    pub received: Option<u64>,
}

impl std::fmt::Display for Traffic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |bytes: Option<u64>| bytes.map(mebibytes).unwrap_or_else(|| NOT_AVAILABLE.to_string());
        write!(f, "Sent: {}, Recv: {}", show(self.sent), show(self.received))
    }
}

/// Reads counters for the first non-loopback interface in
/// `/proc/net/dev` content.
pub fn parse_net_dev(content: &str) -> Traffic {
    content
        .lines()
        .skip(2)
        .filter_map(|line| line.split_once(':'))
        .filter(|(name, _)| name.trim() != "lo")
        .find_map(|(_, data)| {
            let cols: Vec<&str> = data.split_whitespace().collect();
            let received = cols.first()?.parse().ok()?;
            let sent = cols.get(8)?.parse().ok()?;
            Some(Traffic {
                sent: Some(sent),
                received: Some(received),
            })
        })
        .unwrap_or_default()
}
