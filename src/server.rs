//! Reusable booking service runtime.
//!
//! Provides [`ServerHandle`] that encapsulates the server lifecycle:
//! database init, migrations, REST API, stale-booking sweep and
//! graceful shutdown, so the binary stays a thin wrapper.

use std::net::SocketAddr;
use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info};

use crate::api::router::BookingUnifiedState;
use crate::application::booking::services::start_stale_booking_sweep;
use crate::application::{AdmissionService, AvailabilityService};
use crate::config::AppConfig;
use crate::create_api_router;
use crate::domain::{Clock, CredentialIssuer, RepositoryProvider, SystemClock};
use crate::infrastructure::crypto::QrTokenIssuer;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::database::SeaOrmRepositoryProvider;
use crate::infrastructure::{init_database, DatabaseConfig};
use crate::shared::errors::{AppError, InfraError};
use crate::shared::shutdown::ShutdownSignal;

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the booking service.
pub struct ServerOptions {
    /// Application configuration.
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running booking service.
pub struct ServerHandle {
    /// Actual bound address of the REST API.
    pub addr: SocketAddr,
    /// Repository bundle, shared with the HTTP layer and the sweep.
    pub repos: Arc<dyn RepositoryProvider>,
    shutdown: ShutdownSignal,
    server: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Boot the full service: database, migrations, services, REST API
    /// and the stale-booking sweep.
    pub async fn start(options: ServerOptions) -> Result<Self, AppError> {
        let cfg = options.config;

        let db_config = DatabaseConfig {
            url: cfg.database.connection_url(),
        };
        let db = init_database(&db_config)
            .await
            .map_err(InfraError::Database)?;

        if options.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None)
                .await
                .map_err(InfraError::Database)?;
            info!("Migrations completed");
        }

        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db));
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let credentials: Arc<dyn CredentialIssuer> = Arc::new(QrTokenIssuer::new());

        let availability = Arc::new(AvailabilityService::new(repos.clone()));
        let admission = Arc::new(AdmissionService::new(
            repos.clone(),
            clock.clone(),
            credentials,
        ));

        let shutdown = ShutdownSignal::new();
        start_stale_booking_sweep(
            repos.clone(),
            clock.clone(),
            shutdown.clone(),
            cfg.booking.sweep_interval_secs,
        );

        let router = create_api_router(BookingUnifiedState {
            repos: repos.clone(),
            availability,
            admission,
            clock,
        });

        let listener = tokio::net::TcpListener::bind(cfg.server.address())
            .await
            .map_err(InfraError::Io)?;
        let addr = listener.local_addr().map_err(InfraError::Io)?;
        info!("🚀 REST API listening on http://{}", addr);
        info!("📖 Swagger UI available at http://{}/swagger-ui", addr);

        let graceful = shutdown.clone();
        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router)
                .with_graceful_shutdown(async move { graceful.wait().await })
                .await
            {
                error!(error = %e, "HTTP server error");
            }
        });

        Ok(Self {
            addr,
            repos,
            shutdown,
            server,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Trigger graceful shutdown.
    pub fn stop(&self) {
        self.shutdown.trigger();
    }

    /// Wait until the HTTP server has fully stopped.
    pub async fn wait(self) {
        let _ = self.server.await;
    }
}
