use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::collectors::format::{format_flight, FormattedFlight};
use crate::collectors::provider::{FlightProvider, ProviderError};
use crate::collectors::route_lookup::RouteLookup;
use crate::core::geo::GeoPoint;

/// The published flight list. Replaced as a whole, never mutated.
#[derive(Debug, Default)]
pub struct FlightSnapshot {
    pub flights: Vec<FormattedFlight>,
    /// When the list was computed; `None` until the first successful poll.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Single slot holding the latest snapshot. Readers clone the current
/// `Arc` and never wait on a poll in progress.
#[derive(Clone)]
pub struct FlightStore {
    tx: Arc<watch::Sender<Arc<FlightSnapshot>>>,
}

impl Default for FlightStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FlightStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(FlightSnapshot::default()));
        Self { tx: Arc::new(tx) }
    }

    pub fn snapshot(&self) -> Arc<FlightSnapshot> {
        self.tx.borrow().clone()
    }

    /// Replaces the published list. Last write wins.
    pub fn publish(&self, flights: Vec<FormattedFlight>, updated_at: DateTime<Utc>) {
        self.tx.send_replace(Arc::new(FlightSnapshot {
            flights,
            updated_at: Some(updated_at),
        }));
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub center: GeoPoint,
    pub radius_miles: f64,
    pub altitude_ceiling_ft: f64,
    pub interval: Duration,
}

pub struct Poller<P, L> {
    provider: P,
    lookup: L,
    settings: PollSettings,
    store: FlightStore,
}

impl<P: FlightProvider, L: RouteLookup> Poller<P, L> {
    pub fn new(provider: P, lookup: L, settings: PollSettings, store: FlightStore) -> Self {
        Self {
            provider,
            lookup,
            settings,
            store,
        }
    }

    /// One fetch-format-publish cycle. Returns the number of published
    /// flights. On a provider error nothing is published.
    ///
    /// Records are formatted concurrently, so route lookups for the whole
    /// batch overlap instead of queueing behind each other.
    pub async fn poll_once(&self) -> Result<usize, ProviderError> {
        let s = &self.settings;
        let observations = self
            .provider
            .fetch_observations(s.center, s.radius_miles, s.altitude_ceiling_ft)
            .await?;
        debug!(provider = self.provider.name(), count = observations.len(), "Received observations");

        let now = Utc::now();
        let now_ms = now.timestamp_millis();
        let lookup = &self.lookup;
        let center = s.center;
        let formatted = join_all(
            observations
                .iter()
                .filter(|o| o.position().is_some())
                .map(move |obs| async move { (obs, format_flight(obs, center, lookup, now_ms).await) }),
        )
        .await;

        let mut flights = Vec::with_capacity(formatted.len());
        for (obs, result) in formatted {
            match result {
                Ok(flight) => flights.push(flight),
                Err(e) => warn!(error = %e, callsign = obs.raw_callsign(), "Dropping aircraft"),
            }
        }

        let count = flights.len();
        self.store.publish(flights, now);
        Ok(count)
    }

    /// Polls immediately, then on every interval tick. Never returns.
    pub async fn run(self) {
        info!(
            provider = self.provider.name(),
            interval_secs = self.settings.interval.as_secs(),
            "Scheduled polling"
        );
        let mut ticker = interval(self.settings.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            match self.poll_once().await {
                Ok(count) => info!(count, "Found flights overhead"),
                Err(e) => error!(provider = self.provider.name(), error = %e, "Poll failed, keeping previous flights"),
            }
        }
    }
}
