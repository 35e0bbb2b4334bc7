use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::collectors::opensky::OpenSkyProvider;
use crate::collectors::readsb::{ReadsbApi, ReadsbProvider};
use crate::core::geo::GeoPoint;

/// Statute miles to nautical miles.
pub const MILES_TO_NM: f64 = 0.868976;

const USER_AGENT: &str = concat!("flightwatch/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{provider} returned status {status}")]
    Status {
        provider: &'static str,
        status: reqwest::StatusCode,
    },
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One aircraft as reported by a provider for a single poll cycle.
/// Altitude is barometric feet, already normalized by the adapter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AircraftObservation {
    pub flight: Option<String>,
    pub registration: Option<String>,
    pub aircraft_type: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub altitude_ft: Option<f64>,
    pub ground_speed_kt: Option<f64>,
    pub track_deg: Option<f64>,
}

impl AircraftObservation {
    pub fn position(&self) -> Option<GeoPoint> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        }
    }

    /// Transponder callsign, else registration, else "Unknown". Blank
    /// values count as absent.
    pub fn raw_callsign(&self) -> &str {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|s| !s.trim().is_empty())
        }
        present(&self.flight)
            .or_else(|| present(&self.registration))
            .unwrap_or("Unknown")
    }
}

/// A source of aircraft observations around a center point.
pub trait FlightProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Aircraft within `radius_miles` of `center` flying below
    /// `altitude_ceiling_ft`. Aircraft on the ground are excluded.
    fn fetch_observations(
        &self,
        center: GeoPoint,
        radius_miles: f64,
        altitude_ceiling_ft: f64,
    ) -> impl Future<Output = Result<Vec<AircraftObservation>, ProviderError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    AirplanesLive,
    AdsbExchange,
    OpenSky,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::AirplanesLive => "airplanes.live",
            ProviderKind::AdsbExchange => "adsbexchange",
            ProviderKind::OpenSky => "opensky",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown flight data provider: {0}")]
pub struct UnknownProvider(pub String);

impl FromStr for ProviderKind {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "airplanes.live" => Ok(ProviderKind::AirplanesLive),
            "adsbexchange" => Ok(ProviderKind::AdsbExchange),
            "opensky" => Ok(ProviderKind::OpenSky),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}

/// The configured provider.
pub enum Provider {
    Readsb(ReadsbProvider),
    OpenSky(OpenSkyProvider),
}

impl Provider {
    pub fn new(kind: ProviderKind, client: reqwest::Client) -> Self {
        match kind {
            ProviderKind::AirplanesLive => Provider::Readsb(ReadsbProvider::new(ReadsbApi::AirplanesLive, client)),
            ProviderKind::AdsbExchange => Provider::Readsb(ReadsbProvider::new(ReadsbApi::AdsbExchange, client)),
            ProviderKind::OpenSky => Provider::OpenSky(OpenSkyProvider::new(client)),
        }
    }
}

impl FlightProvider for Provider {
    fn name(&self) -> &'static str {
        match self {
            Provider::Readsb(p) => p.name(),
            Provider::OpenSky(p) => p.name(),
        }
    }

    async fn fetch_observations(
        &self,
        center: GeoPoint,
        radius_miles: f64,
        altitude_ceiling_ft: f64,
    ) -> Result<Vec<AircraftObservation>, ProviderError> {
        match self {
            Provider::Readsb(p) => p.fetch_observations(center, radius_miles, altitude_ceiling_ft).await,
            Provider::OpenSky(p) => p.fetch_observations(center, radius_miles, altitude_ceiling_ft).await,
        }
    }
}

/// Shared outbound client. Every request is bounded by `timeout`.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    let client = reqwest::Client::builder()
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Sends a request and returns the body of a successful response.
pub(crate) async fn get_text(
    provider: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<String, ProviderError> {
    let resp = request.send().await?;
    let status = resp.status();
    if !status.is_success() {
        warn!(provider, status = ?status, "Non-success response from provider");
        return Err(ProviderError::Status { provider, status });
    }
    Ok(resp.text().await?)
}
