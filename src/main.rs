//! Booking service binary
//!
//! REST API for the EV-charging reservation platform.
//! Reads configuration from TOML file (~/.config/texnouz-booking/config.toml).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use tracing::{error, info};

use texnouz_booking::config::{default_config_path, AppConfig};
use texnouz_booking::server::{ServerHandle, ServerOptions};
use texnouz_booking::shared::shutdown::listen_for_shutdown_signals;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("BOOKING_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Texnouz Booking Service...");

    // ── Prometheus exporter (must be installed before any metrics calls) ──
    if app_cfg.server.metrics_port > 0 {
        let metrics_ip: IpAddr = app_cfg
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let metrics_addr = SocketAddr::new(metrics_ip, app_cfg.server.metrics_port);
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(metrics_addr)
            .install()
            .expect("Failed to install Prometheus metrics exporter");
        info!("📊 Prometheus metrics exported on http://{}/metrics", metrics_addr);
    }

    // ── Boot the service ───────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config: app_cfg,
        auto_migrate: true,
    })
    .await?;

    tokio::spawn(listen_for_shutdown_signals(handle.shutdown_signal()));
    info!("Press Ctrl+C to stop");

    handle.wait().await;
    info!("👋 Booking service stopped");
    Ok(())
}
