use quotedeck_data::{ConnectionStatus, Dashboard, DashboardConfig, fmt};
use std::time::Duration;
use tracing::{error, info, warn};

/// Upper bound for the reconnect backoff.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() {
    init_logging();

    let config = config_from_env();
    info!(
        stream = %config.stream_url,
        rest = %config.rest_url,
        symbols = config.symbols.len(),
        "starting quotedeck server"
    );

    let dashboard = Dashboard::live(config);

    tokio::select! {
        _ = run(&dashboard) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("received ctrl-c, shutting down");
        }
    }

    dashboard.disconnect();
}

/// Connect loop with exponential backoff.
///
/// The core's connection manager deliberately carries no retry policy;
/// it lives out here where it can be tuned without touching the state
/// machine.
async fn run(dashboard: &Dashboard) {
    let mut backoff = Duration::from_secs(1);

    loop {
        match dashboard.connect().await {
            Ok(()) => {
                backoff = Duration::from_secs(1);
                watch_until_failure(dashboard).await;
            }
            Err(error) => {
                error!(%error, "failed to connect to ticker stream");
            }
        }

        warn!(
            delay_secs = backoff.as_secs(),
            error = ?dashboard.connection_error(),
            "reconnecting after backoff"
        );
        tokio::time::sleep(backoff).await;
        backoff = (backoff * 2).min(MAX_BACKOFF);
    }
}

/// Log the projected table periodically while connected; returns once the
/// feed reports failure.
async fn watch_until_failure(dashboard: &Dashboard) {
    let interval_secs = std::env::var("QD_TABLE_INTERVAL_SECS")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(10);
    let mut table_timer = tokio::time::interval(Duration::from_secs(interval_secs));
    let mut status = dashboard.status_watch();

    loop {
        tokio::select! {
            _ = table_timer.tick() => log_view(dashboard),
            // wait_for also checks the current value, so a failure that
            // lands before this subscriber is polled is still seen
            _ = status.wait_for(|s| {
                matches!(s, ConnectionStatus::Failed | ConnectionStatus::Idle)
            }) => return,
        }
    }
}

fn log_view(dashboard: &Dashboard) {
    let view = dashboard.current_view();

    // An empty table while connected is "waiting for the first update",
    // not an error
    if view.is_empty() {
        info!("connected, waiting for first ticker update");
        return;
    }

    for record in &view {
        info!(
            "{:<4} {:<14} {:>12} {:>9} {:>9} {:>9} {:>10} {:>10} {:>10}",
            record.symbol,
            record.name,
            fmt::format_currency(record.price),
            fmt::format_percentage(record.change_1h),
            fmt::format_percentage(record.change_24h),
            fmt::format_percentage(record.change_7d),
            fmt::format_currency(record.market_cap),
            fmt::format_currency(record.volume_24h),
            fmt::format_supply(record.circulating_supply),
        );
    }
}

/// Endpoint overrides via QD_STREAM_URL / QD_REST_URL.
fn config_from_env() -> DashboardConfig {
    let mut config = DashboardConfig::default();
    if let Ok(url) = std::env::var("QD_STREAM_URL") {
        config = config.with_stream_url(url);
    }
    if let Ok(url) = std::env::var("QD_REST_URL") {
        config = config.with_rest_url(url);
    }
    config
}

/// Initialize logging
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
