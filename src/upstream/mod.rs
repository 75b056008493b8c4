pub mod client;

pub use client::{EarningsStats, StatsFetcher, StatsResult, UpstreamClient};
