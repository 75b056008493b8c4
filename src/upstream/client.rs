use crate::constants;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Stats payload returned by the earnings endpoint. Missing numeric fields
/// deserialize as 0.0, missing identity fields stay unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsStats {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub points_today: f64,
    #[serde(default)]
    pub total_points: f64,
}

/// Outcome of one fetch attempt. Every failure mode (network, non-2xx,
/// malformed body) collapses into `Failure` with a short description; nothing
/// escapes this boundary as an `Err`.
#[derive(Debug, Clone)]
pub enum StatsResult {
    Success(EarningsStats),
    Failure(String),
}

/// Seam between the scheduler and the real HTTP client.
pub trait StatsFetcher: Send + Sync {
    fn fetch_stats(
        &self,
        transport: &Client,
        token: &str,
    ) -> impl Future<Output = StatsResult> + Send;
}

pub struct UpstreamClient {
    stats_url: String,
}

impl UpstreamClient {
    pub fn new() -> Self {
        Self {
            stats_url: constants::stats_earnings_url(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_stats_url(stats_url: String) -> Self {
        Self { stats_url }
    }
}

impl Default for UpstreamClient {
    fn default() -> Self {
        Self::new()
    }
}

fn build_headers(token: &str) -> Result<header::HeaderMap, String> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| e.to_string())?,
    );
    headers.insert(
        header::USER_AGENT,
        header::HeaderValue::from_static(constants::USER_AGENT),
    );
    headers.insert(
        header::REFERER,
        header::HeaderValue::from_static(constants::REFERER),
    );
    headers.insert(
        header::ORIGIN,
        header::HeaderValue::from_static(constants::ORIGIN),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_static(constants::ACCEPT_LANGUAGE),
    );
    headers.insert(
        header::CONNECTION,
        header::HeaderValue::from_static("keep-alive"),
    );
    Ok(headers)
}

impl StatsFetcher for UpstreamClient {
    async fn fetch_stats(&self, transport: &Client, token: &str) -> StatsResult {
        let headers = match build_headers(token) {
            Ok(headers) => headers,
            Err(e) => return StatsResult::Failure(format!("invalid request header: {}", e)),
        };

        let response = match transport
            .get(&self.stats_url)
            .headers(headers)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return StatsResult::Failure(format!("request failed: {}", e)),
        };

        let status = response.status();
        if !status.is_success() {
            return StatsResult::Failure(format!("HTTP {}", status.as_u16()));
        }

        match response.json::<EarningsStats>().await {
            Ok(stats) => StatsResult::Success(stats),
            Err(e) => StatsResult::Failure(format!("invalid response body: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{refused_addr, spawn_http_server};

    #[test]
    fn stats_deserialize_full_body() {
        let raw = r#"{
            "username": "farmer",
            "email": "farmer@example.com",
            "pointsToday": 12.5,
            "totalPoints": 340.25
        }"#;
        let stats: EarningsStats = serde_json::from_str(raw).expect("parse");
        assert_eq!(stats.username.as_deref(), Some("farmer"));
        assert_eq!(stats.email.as_deref(), Some("farmer@example.com"));
        assert_eq!(stats.points_today, 12.5);
        assert_eq!(stats.total_points, 340.25);
    }

    #[test]
    fn stats_deserialize_defaults_missing_fields() {
        let stats: EarningsStats = serde_json::from_str("{}").expect("parse empty object");
        assert!(stats.username.is_none());
        assert!(stats.email.is_none());
        assert_eq!(stats.points_today, 0.0);
        assert_eq!(stats.total_points, 0.0);
    }

    #[test]
    fn stats_deserialize_ignores_unknown_fields() {
        let raw = r#"{"pointsToday": 1.0, "epoch": 42, "referralPoints": 9.0}"#;
        let stats: EarningsStats = serde_json::from_str(raw).expect("parse");
        assert_eq!(stats.points_today, 1.0);
    }

    #[tokio::test]
    async fn fetch_stats_success_against_local_server() {
        let addr = spawn_http_server(
            "HTTP/1.1 200 OK",
            r#"{"username":"farmer","pointsToday":3.5,"totalPoints":99.0}"#,
        )
        .await;
        let client = UpstreamClient::with_stats_url(format!("http://{}/stats/earnings", addr));
        let transport = Client::new();

        match client.fetch_stats(&transport, "test-token").await {
            StatsResult::Success(stats) => {
                assert_eq!(stats.username.as_deref(), Some("farmer"));
                assert_eq!(stats.points_today, 3.5);
                assert_eq!(stats.total_points, 99.0);
            }
            StatsResult::Failure(msg) => panic!("expected success, got failure: {}", msg),
        }
    }

    #[tokio::test]
    async fn fetch_stats_non_2xx_is_failure() {
        let addr = spawn_http_server("HTTP/1.1 502 Bad Gateway", "{}").await;
        let client = UpstreamClient::with_stats_url(format!("http://{}/stats/earnings", addr));
        let transport = Client::new();

        match client.fetch_stats(&transport, "test-token").await {
            StatsResult::Failure(msg) => assert_eq!(msg, "HTTP 502"),
            StatsResult::Success(_) => panic!("expected failure on 502"),
        }
    }

    #[tokio::test]
    async fn fetch_stats_malformed_body_is_failure() {
        let addr = spawn_http_server("HTTP/1.1 200 OK", "not json at all").await;
        let client = UpstreamClient::with_stats_url(format!("http://{}/stats/earnings", addr));
        let transport = Client::new();

        match client.fetch_stats(&transport, "test-token").await {
            StatsResult::Failure(msg) => {
                assert!(msg.starts_with("invalid response body:"), "got: {}", msg)
            }
            StatsResult::Success(_) => panic!("expected failure on malformed body"),
        }
    }

    #[tokio::test]
    async fn fetch_stats_connection_refused_is_failure() {
        let addr = refused_addr().await;
        let client = UpstreamClient::with_stats_url(format!("http://{}/stats/earnings", addr));
        let transport = Client::new();

        match client.fetch_stats(&transport, "test-token").await {
            StatsResult::Failure(msg) => {
                assert!(msg.starts_with("request failed:"), "got: {}", msg)
            }
            StatsResult::Success(_) => panic!("expected failure on refused connection"),
        }
    }
}
