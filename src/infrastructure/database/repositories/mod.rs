//! SeaORM repository implementations

pub mod booking_repository;
pub mod repository_provider;
pub mod station_repository;

pub use booking_repository::SeaOrmBookingRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use station_repository::SeaOrmStationRepository;

use crate::shared::errors::DomainError;

/// Map a SeaORM error onto the domain error model. Connection loss and
/// pool acquisition failures are retryable; everything else is not.
pub(crate) fn db_err(e: sea_orm::DbErr) -> DomainError {
    match &e {
        sea_orm::DbErr::Conn(_) | sea_orm::DbErr::ConnectionAcquire(_) => {
            DomainError::Transient(e.to_string())
        }
        _ => DomainError::Storage(e.to_string()),
    }
}
