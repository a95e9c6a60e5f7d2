//! # Texnouz Booking Service
//!
//! Backend of the EV-charging reservation platform: station management,
//! hourly slot availability and capacity-safe booking admission.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, status state machines and traits
//! - **application**: Availability calculator, admission controller, sweeps
//! - **infrastructure**: SeaORM persistence, QR token issuer
//! - **api**: REST API with Swagger documentation
//! - **shared**: Errors, pagination, retry, shutdown coordination

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::SeaOrmRepositoryProvider;
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use api::create_api_router;

// Re-export server runtime
pub use server::{ServerHandle, ServerOptions};
