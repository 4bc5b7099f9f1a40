//! panelwatch - emits change events for webinar panelists.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use panelwatch_server::{build_detector, Args, Poller};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Events go to stdout, logs to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "panelwatch_server=info,panelwatch_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting panelwatch");

    let args = Args::parse();
    let config = args.into_config()?;

    tracing::info!(
        api_url = %config.client.base_url,
        webinars = ?config.detector.webinars,
        fingerprint = %config.detector.fingerprint,
        interval_secs = config.interval.as_secs(),
        persistent = config.is_persistent(),
        sink = ?config.sink,
        dedupe_window = config.dedupe_window,
        "configuration loaded"
    );

    let detector = build_detector(&config)?;
    let poller = Poller::new(detector, config.interval).with_run_on_start(config.run_on_start);

    if config.once {
        let report = poller.run_once().await?;
        tracing::info!(
            webinars = report.webinars.len(),
            events = report.total_events(),
            "single run complete"
        );
        return Ok(());
    }

    // Set up graceful shutdown
    let (shutdown_tx, shutdown_rx) = tokio::sync::broadcast::channel(1);

    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl+c");
            return;
        }
        tracing::info!("received shutdown signal");
        let _ = shutdown_tx_clone.send(());
    });

    let stats = poller.run_until_shutdown(shutdown_rx).await;
    tracing::info!(
        runs = stats.runs,
        failures = stats.failures,
        events = stats.events,
        "panelwatch stopped"
    );

    Ok(())
}
