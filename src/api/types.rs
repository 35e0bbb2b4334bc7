use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDto {
    pub status: &'static str,
    pub uptime_seconds: u64,
    /// Epoch milliseconds of the last published poll, if any.
    pub last_update_timestamp: Option<i64>,
    pub flight_count: usize,
    pub provider: &'static str,
}
