use crate::constants;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default)]
    pub accounts: Vec<AccountEntry>,
}

fn default_poll_interval_secs() -> u64 {
    constants::DEFAULT_POLL_INTERVAL_SECS
}

/// One configured account: the bearer token plus an optional proxy
/// descriptor string (`scheme://[user:pass@]host:port`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountEntry {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            accounts: Vec::new(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}
