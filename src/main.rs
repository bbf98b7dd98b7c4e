// Standard library
use std::error::Error;
use std::sync::Arc;

// 3rd party crates
use futures::{stream::FuturesUnordered, StreamExt};
use tokio::signal::ctrl_c;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

// Project imports
use niloofar_ddns::detection::functions::build_protocol;
use niloofar_ddns::logging::types::Reporter;
use niloofar_ddns::settings::types::ConfigManager;
use niloofar_ddns::transport::types::TransportSet;
use niloofar_ddns::RaceDetector;

/// Main entry point for the detection client.
/// Detects the host's public IP addresses over the configured protocol,
/// racing the protocol's primary and alternative endpoints, and reports
/// the results.
#[tokio::main]
async fn main() {
    // loads the .env file from the current directory or parents.
    dotenvy::dotenv_override().ok();

    // Create ConfigManager and wrap it in Arc
    let config: Arc<ConfigManager> = Arc::new(
        ConfigManager::new()
            .await
            .expect("Failed to initialize configuration"),
    );

    // setup logging.
    let log_level: String = config.get_log_level().await;

    let filter: EnvFilter = EnvFilter::builder()
        .with_default_directive(LevelFilter::ERROR.into())
        .parse_lossy(log_level)
        .add_directive("hyper_util=error".parse().unwrap())
        .add_directive("reqwest=error".parse().unwrap())
        .add_directive("hyper=error".parse().unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_level(true)
        .init();

    info!("Settings have been loaded.");

    // One token bounds every detection; Ctrl+C cancels it.
    let shutdown = CancellationToken::new();
    let shutdown_signal = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        info!("Received shutdown signal, abandoning in-progress detections...");
        shutdown_signal.cancel();
    });

    // Run the detection pass
    match run(config, shutdown).await {
        Ok(any_detected) if any_detected => {}
        Ok(_) => std::process::exit(1),
        Err(e) => {
            error!("Application error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Detects the public address of every configured family concurrently and
/// reports each outcome. Returns whether at least one family succeeded.
async fn run(
    config: Arc<ConfigManager>,
    shutdown: CancellationToken,
) -> Result<bool, Box<dyn Error>> {
    let settings = config.get_settings().await;
    let families = settings.get_families();
    let timeout = settings.get_request_timeout();

    // The family-bound transports are built once and shared by every
    // detection attempt.
    let transports = Arc::new(TransportSet::new(timeout)?);
    let protocol = build_protocol(&settings.detection, Arc::clone(&transports))?;
    drop(settings);

    let detector = RaceDetector::new(protocol);
    info!(
        protocol = detector.protocol_name(),
        "Starting public IP detection"
    );

    let reporter = Reporter::tracing();
    let mut detections = FuturesUnordered::new();
    for family in families {
        let detector = &detector;
        let reporter = &reporter;
        let shutdown = &shutdown;
        detections
            .push(async move { (family, detector.detect(shutdown, reporter, family).await) });
    }

    let mut any_detected = false;
    while let Some((family, detected)) = detections.next().await {
        match detected {
            Some(detected) => {
                any_detected = true;
                info!(
                    "Public {} address {} detected via the {} endpoint",
                    family, detected.ip, detected.method
                );
            }
            None => {
                warn!("Public {} address detection failed", family);
            }
        }
    }

    drop(detections);
    drop(detector);
    if let Some(transports) = Arc::into_inner(transports) {
        transports.shutdown();
    }

    Ok(any_detected)
}
