use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::collectors::poller::PollSettings;
use crate::collectors::provider::{ProviderKind, UnknownProvider};
use crate::collectors::route_lookup::{RouteLookupKind, UnknownRouteLookup};
use crate::core::geo::GeoPoint;

const DEFAULT_RADIUS_MILES: f64 = 5.0;
const DEFAULT_MAX_ALTITUDE_FEET: f64 = 15000.0;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STATIC_DIR: &str = "public";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} is not a valid coordinate: {value:?}")]
    InvalidCoordinate { key: &'static str, value: String },
    #[error(transparent)]
    Provider(#[from] UnknownProvider),
    #[error(transparent)]
    RouteLookup(#[from] UnknownRouteLookup),
    #[error("BIND_ADDR is not a valid address: {0:?}")]
    BindAddr(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub house: GeoPoint,
    pub radius_miles: f64,
    pub max_altitude_ft: f64,
    pub poll_interval: Duration,
    pub provider: ProviderKind,
    pub flight_info: RouteLookupKind,
    pub request_timeout: Duration,
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from a variable lookup. Required coordinates
    /// are fatal when missing or not numeric; optional values fall back to
    /// their defaults.
    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let house = GeoPoint::new(
            coordinate(&var, "HOUSE_LAT")?,
            coordinate(&var, "HOUSE_LON")?,
        );

        let provider = match var("FLIGHT_DATA_PROVIDER") {
            Some(value) => value.parse()?,
            None => ProviderKind::AirplanesLive,
        };
        let flight_info = match var("FLIGHT_INFO_PROVIDER") {
            Some(value) => value.parse()?,
            None => RouteLookupKind::Disabled,
        };

        let ip = match var("BIND_ADDR") {
            Some(value) => value.trim().parse::<IpAddr>().map_err(|_| ConfigError::BindAddr(value))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let port = positive(&var, "PORT", DEFAULT_PORT);

        Ok(Self {
            house,
            radius_miles: positive(&var, "BOUNDING_BOX_MILES", DEFAULT_RADIUS_MILES),
            max_altitude_ft: positive(&var, "MAX_ALTITUDE_FEET", DEFAULT_MAX_ALTITUDE_FEET),
            poll_interval: Duration::from_secs(positive(&var, "POLL_INTERVAL_SECONDS", DEFAULT_POLL_INTERVAL_SECS)),
            provider,
            flight_info,
            request_timeout: Duration::from_secs(positive(
                &var,
                "REQUEST_TIMEOUT_SECONDS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )),
            bind_addr: SocketAddr::new(ip, port),
            static_dir: var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
        })
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            center: self.house,
            radius_miles: self.radius_miles,
            altitude_ceiling_ft: self.max_altitude_ft,
            interval: self.poll_interval,
        }
    }
}

fn coordinate<F>(var: &F, key: &'static str) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = var(key).ok_or(ConfigError::Missing(key))?;
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ConfigError::InvalidCoordinate { key, value }),
    }
}

/// Parses an optional positive number, falling back to `default` when the
/// variable is unset, unparseable, or not positive.
fn positive<F, T>(var: &F, key: &'static str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + Default + Copy + std::fmt::Display,
{
    let Some(value) = var(key) else {
        return default;
    };
    match value.trim().parse::<T>() {
        Ok(v) if v > T::default() => v,
        _ => {
            warn!(key, value = %value, default = %default, "Ignoring invalid setting");
            default
        }
    }
}
