use crate::constants::FETCH_CONCURRENCY;
use crate::models::{AccountDescriptor, AccountState};
use crate::reporter::Reporter;
use crate::upstream::client::{StatsFetcher, StatsResult};
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// One account under management: its immutable descriptor, the transport
/// resolved for it at startup, and the flag guarding fetch re-entry.
pub struct ManagedAccount {
    descriptor: AccountDescriptor,
    transport: Client,
    in_flight: AtomicBool,
}

impl ManagedAccount {
    pub fn new(descriptor: AccountDescriptor, transport: Client) -> Self {
        Self {
            descriptor,
            transport,
            in_flight: AtomicBool::new(false),
        }
    }
}

/// Clears the in-flight flag even when the fetch future is abandoned.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

enum CycleOutcome {
    Completed(StatsResult),
    Skipped,
}

/// Drives the recurring fetch cycle over an explicitly owned account set.
/// Accounts are independent: each fetch outcome is applied to that account's
/// own state record as a whole, and one failure never touches another row.
pub struct PollingScheduler<F: StatsFetcher, R: Reporter> {
    accounts: Vec<ManagedAccount>,
    states: Vec<AccountState>,
    fetcher: F,
    reporter: R,
    interval: Duration,
}

impl<F: StatsFetcher, R: Reporter> PollingScheduler<F, R> {
    pub fn new(
        accounts: Vec<ManagedAccount>,
        fetcher: F,
        reporter: R,
        interval: Duration,
    ) -> Self {
        let states = accounts
            .iter()
            .map(|account| AccountState::new(&account.descriptor))
            .collect();
        Self {
            accounts,
            states,
            fetcher,
            reporter,
            interval,
        }
    }

    /// Runs until the shutdown signal flips. A signal arriving mid-cycle
    /// abandons the unfinished fetches; state records are only ever written
    /// whole, after a fetch resolves, so nothing is left half-updated.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            "Polling scheduler started: accounts={}, interval={}s",
            self.accounts.len(),
            self.interval.as_secs()
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = shutdown.changed() => {
                    tracing::info!("Polling scheduler stopping");
                    break;
                }
            }

            tokio::select! {
                _ = self.run_cycle() => {}
                _ = shutdown.changed() => {
                    tracing::info!("Polling scheduler stopping, abandoning in-flight fetches");
                    break;
                }
            }
        }
    }

    /// One full pass: fan out a fetch per account, apply each outcome to that
    /// account's record as it completes, then hand the snapshot to the
    /// reporter. An account whose previous fetch is still in flight is
    /// skipped for this pass and its state left untouched.
    pub(crate) async fn run_cycle(&mut self) {
        let accounts = &self.accounts;
        let states = &mut self.states;
        let fetcher = &self.fetcher;

        // Boxed and collected eagerly to give the stream a nameable item type;
        // the lazy map iterator trips rust-lang/rust#102211 when the scheduler
        // is spawned.
        let fetches: Vec<_> = accounts.iter().enumerate().map(|(index, account)| {
            async move {
                if account
                    .in_flight
                    .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
                    .is_err()
                {
                    return (index, CycleOutcome::Skipped);
                }
                let _guard = InFlightGuard(&account.in_flight);
                let result = fetcher
                    .fetch_stats(&account.transport, &account.descriptor.token)
                    .await;
                (index, CycleOutcome::Completed(result))
            }
            .boxed()
        }).collect();

        let mut outcomes = stream::iter(fetches).buffer_unordered(FETCH_CONCURRENCY);
        let mut success = 0usize;
        let mut failed = 0usize;
        let mut skipped = 0usize;

        while let Some((index, outcome)) = outcomes.next().await {
            let state = &mut states[index];
            match outcome {
                CycleOutcome::Completed(result) => {
                    match &result {
                        StatsResult::Success(stats) => {
                            success += 1;
                            tracing::info!(
                                "Account {}: points_today={:.2}, total_points={:.2}",
                                state.account_id,
                                stats.points_today,
                                stats.total_points
                            );
                        }
                        StatsResult::Failure(msg) => {
                            failed += 1;
                            tracing::warn!("Account {}: fetch failed: {}", state.account_id, msg);
                        }
                    }
                    state.apply(result);
                }
                CycleOutcome::Skipped => {
                    skipped += 1;
                    tracing::debug!(
                        "Account {}: previous fetch still in flight, skipping",
                        state.account_id
                    );
                }
            }
        }
        drop(outcomes);

        tracing::info!(
            "[Scheduler] Cycle completed: total={}, success={}, failed={}, skipped={}",
            accounts.len(),
            success,
            failed,
            skipped
        );

        self.reporter.render(&self.states);
    }

    #[cfg(test)]
    pub(crate) fn states(&self) -> &[AccountState] {
        &self.states
    }
}
