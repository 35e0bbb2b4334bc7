mod utils;
mod collectors;
mod core;
mod predictors;
mod api;

use std::process::ExitCode;

use tracing::{error, info};

use collectors::poller::{FlightStore, Poller};
use collectors::provider::{http_client, Provider};
use collectors::route_lookup::FlightInfoSource;
use utils::config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    utils::logging::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    info!(
        lat = config.house.lat,
        lon = config.house.lon,
        radius_miles = config.radius_miles,
        max_altitude_ft = config.max_altitude_ft,
        poll_interval_secs = config.poll_interval.as_secs(),
        provider = %config.provider,
        flight_info = %config.flight_info,
        "Flightwatch configured"
    );

    let client = match http_client(config.request_timeout) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            return ExitCode::FAILURE;
        }
    };

    let store = FlightStore::new();
    let poller = Poller::new(
        Provider::new(config.provider, client.clone()),
        FlightInfoSource::new(config.flight_info, client),
        config.poll_settings(),
        store.clone(),
    );
    tokio::spawn(poller.run());

    let state = api::server::AppState::new(store, config.provider.as_str());
    if let Err(e) = api::server::run_server(state, config.bind_addr, &config.static_dir).await {
        error!(error = %e, addr = %config.bind_addr, "Server failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
