use crate::proxy::resolver::ProxyConfig;
use crate::upstream::client::StatsResult;
use serde::{Deserialize, Serialize};

/// Static input identifying one farming account: its API token plus the
/// proxy it should be routed through, if any. Built once at startup and
/// never mutated afterwards.
#[derive(Debug, Clone)]
pub struct AccountDescriptor {
    pub token: String,
    pub proxy: Option<ProxyConfig>,
}

impl AccountDescriptor {
    pub fn new(token: String, proxy: Option<ProxyConfig>) -> Self {
        Self { token, proxy }
    }

    /// Short display id derived from the token, never the full credential.
    pub fn account_id(&self) -> String {
        let prefix: String = self.token.chars().take(8).collect();
        format!("{}...", prefix)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Pending,
    Active,
    Error,
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AccountStatus::Pending => "pending",
            AccountStatus::Active => "active",
            AccountStatus::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// Latest known stats for one account. Owned by the scheduler; every update
/// replaces the relevant fields in one synchronous step, so a snapshot never
/// mixes old and new values within a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountState {
    pub account_id: String,
    pub username: Option<String>,
    pub email: Option<String>,
    /// Display-only proxy description, fixed at startup.
    pub proxy_label: Option<String>,
    pub status: AccountStatus,
    pub points_today: f64,
    pub total_points: f64,
    pub last_update: Option<i64>,
    pub last_error: Option<String>,
}

impl AccountState {
    pub fn new(descriptor: &AccountDescriptor) -> Self {
        Self {
            account_id: descriptor.account_id(),
            username: None,
            email: None,
            proxy_label: descriptor.proxy.as_ref().map(|p| p.to_string()),
            status: AccountStatus::Pending,
            points_today: 0.0,
            total_points: 0.0,
            last_update: None,
            last_error: None,
        }
    }

    /// Applies the outcome of one fetch attempt. A failure keeps the last
    /// known points and identity fields instead of zeroing them.
    pub fn apply(&mut self, result: StatsResult) {
        let now = chrono::Utc::now().timestamp();
        match result {
            StatsResult::Success(stats) => {
                self.status = AccountStatus::Active;
                self.points_today = stats.points_today;
                self.total_points = stats.total_points;
                if stats.username.is_some() {
                    self.username = stats.username;
                }
                if stats.email.is_some() {
                    self.email = stats.email;
                }
                self.last_update = Some(now);
                self.last_error = None;
            }
            StatsResult::Failure(msg) => {
                self.status = AccountStatus::Error;
                self.last_error = Some(msg);
                self.last_update = Some(now);
            }
        }
    }
}
