pub mod constants;
pub mod error;
pub mod models;
pub mod modules;
pub mod proxy;
pub mod reporter;
pub mod upstream;

#[cfg(test)]
mod test_utils;

use error::{AppError, AppResult};
use models::{AccountDescriptor, AppConfig};
use modules::scheduler::{ManagedAccount, PollingScheduler};
use proxy::resolver::{build_transport, ProxyConfig};
use reporter::TableReporter;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};
use upstream::client::UpstreamClient;

/// Resolves each configured entry into a managed account with its transport.
/// A bad proxy string or unsupported scheme drops only that entry; the rest
/// keep going.
fn resolve_accounts(config: &AppConfig) -> Vec<ManagedAccount> {
    let mut managed = Vec::with_capacity(config.accounts.len());

    for (index, entry) in config.accounts.iter().enumerate() {
        let proxy = match entry.proxy.as_deref() {
            Some(raw) => match ProxyConfig::parse(raw) {
                Ok(proxy_config) => Some(proxy_config),
                Err(e) => {
                    warn!("Skipping account entry #{}: {}", index + 1, e);
                    continue;
                }
            },
            None => None,
        };

        let descriptor = AccountDescriptor::new(entry.token.clone(), proxy);
        match build_transport(descriptor.proxy.as_ref()) {
            Ok(transport) => managed.push(ManagedAccount::new(descriptor, transport)),
            Err(e) => warn!("Skipping account entry #{}: {}", index + 1, e),
        }
    }

    managed
}

async fn start_runtime(config_path: PathBuf) -> AppResult<()> {
    let config = modules::config::load_app_config(&config_path)?;
    if config.accounts.is_empty() {
        return Err(AppError::Config(format!(
            "no accounts configured in {}",
            config_path.display()
        )));
    }

    let managed = resolve_accounts(&config);
    if managed.is_empty() {
        return Err(AppError::Config(
            "no usable accounts after proxy resolution".to_string(),
        ));
    }

    let interval_secs = config.poll_interval_secs.max(1);
    info!(
        "Monitoring {} of {} configured accounts every {}s",
        managed.len(),
        config.accounts.len(),
        interval_secs
    );

    let scheduler = PollingScheduler::new(
        managed,
        UpstreamClient::new(),
        TableReporter::new(),
        Duration::from_secs(interval_secs),
    );
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(scheduler.run(shutdown_rx));

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");
    let _ = shutdown_tx.send(true);
    let _ = handle.await;
    Ok(())
}

pub fn run() {
    modules::logger::init_logger();
    reporter::print_banner();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(modules::config::DEFAULT_CONFIG_FILE));

    let runtime = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");
    runtime.block_on(async {
        if let Err(e) = start_runtime(config_path).await {
            error!("{}", e);
            std::process::exit(1);
        }
        info!("Monitor stopped");
    });
}
