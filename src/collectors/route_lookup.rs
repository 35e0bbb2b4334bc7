//! Origin/destination lookup for airline flights.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const ADSBDB_CALLSIGN_URL: &str = "https://api.adsbdb.com/v0/callsign";

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("lookup returned status {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightInfo {
    pub origin: String,
    pub destination: String,
}

impl FlightInfo {
    pub fn unknown() -> Self {
        Self {
            origin: "Unknown".to_string(),
            destination: "Unknown".to_string(),
        }
    }
}

pub trait RouteLookup: Send + Sync {
    /// Route for a display callsign such as `AA 123`.
    fn lookup(&self, callsign: &str) -> impl Future<Output = Result<FlightInfo, LookupError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteLookupKind {
    Disabled,
    Adsbdb,
}

impl RouteLookupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteLookupKind::Disabled => "none",
            RouteLookupKind::Adsbdb => "adsbdb",
        }
    }
}

impl fmt::Display for RouteLookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown flight info provider: {0}")]
pub struct UnknownRouteLookup(pub String);

impl FromStr for RouteLookupKind {
    type Err = UnknownRouteLookup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "none" => Ok(RouteLookupKind::Disabled),
            "adsbdb" => Ok(RouteLookupKind::Adsbdb),
            other => Err(UnknownRouteLookup(other.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AdsbdbResponse {
    response: AdsbdbData,
}

#[derive(Debug, Deserialize)]
struct AdsbdbData {
    flightroute: Option<AdsbdbRoute>,
}

#[derive(Debug, Deserialize)]
struct AdsbdbRoute {
    origin: AdsbdbAirport,
    destination: AdsbdbAirport,
}

#[derive(Debug, Deserialize)]
struct AdsbdbAirport {
    iata_code: String,
}

/// Queries adsbdb.com by callsign.
pub struct AdsbdbLookup {
    base_url: String,
    client: reqwest::Client,
}

impl AdsbdbLookup {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            base_url: ADSBDB_CALLSIGN_URL.to_string(),
            client,
        }
    }

    fn build_url(&self, callsign: &str) -> String {
        let compact: String = callsign.chars().filter(|c| !c.is_whitespace()).collect();
        format!("{}/{}", self.base_url, compact)
    }
}

impl RouteLookup for AdsbdbLookup {
    async fn lookup(&self, callsign: &str) -> Result<FlightInfo, LookupError> {
        let url = self.build_url(callsign);
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(callsign, "No route known");
            return Ok(FlightInfo::unknown());
        }
        if !status.is_success() {
            return Err(LookupError::Status(status));
        }

        let body: AdsbdbResponse = resp.json().await?;
        Ok(body
            .response
            .flightroute
            .map(|route| FlightInfo {
                origin: route.origin.iata_code,
                destination: route.destination.iata_code,
            })
            .unwrap_or_else(FlightInfo::unknown))
    }
}

/// The configured lookup.
pub enum FlightInfoSource {
    Disabled,
    Adsbdb(AdsbdbLookup),
}

impl FlightInfoSource {
    pub fn new(kind: RouteLookupKind, client: reqwest::Client) -> Self {
        match kind {
            RouteLookupKind::Disabled => FlightInfoSource::Disabled,
            RouteLookupKind::Adsbdb => FlightInfoSource::Adsbdb(AdsbdbLookup::new(client)),
        }
    }
}

impl RouteLookup for FlightInfoSource {
    async fn lookup(&self, callsign: &str) -> Result<FlightInfo, LookupError> {
        match self {
            FlightInfoSource::Disabled => Ok(FlightInfo::unknown()),
            FlightInfoSource::Adsbdb(lookup) => lookup.lookup(callsign).await,
        }
    }
}
