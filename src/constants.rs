use std::time::Duration;

pub const API_BASE_URL: &str = "https://api.depined.org/api";
pub const STATS_EARNINGS_PATH: &str = "/stats/earnings";

// Browser-like header set expected by the upstream API.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const REFERER: &str = "https://depined.org/";
pub const ORIGIN: &str = "https://depined.org/";
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Upper bound on concurrent stats fetches within one polling cycle.
pub const FETCH_CONCURRENCY: usize = 20;

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(20);
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

pub fn stats_earnings_url() -> String {
    format!("{}{}", API_BASE_URL, STATS_EARNINGS_PATH)
}
