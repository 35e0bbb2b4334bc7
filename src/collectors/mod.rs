pub mod format;
pub mod opensky;
pub mod poller;
pub mod provider;
pub mod readsb;
pub mod route_lookup;
