//! SeaORM-backed RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::{BookingRepository, RepositoryProvider, StationRepository};

use super::{SeaOrmBookingRepository, SeaOrmStationRepository};

/// Bundles all SeaORM repositories over one shared connection pool.
pub struct SeaOrmRepositoryProvider {
    stations: SeaOrmStationRepository,
    bookings: SeaOrmBookingRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            stations: SeaOrmStationRepository::new(db.clone()),
            bookings: SeaOrmBookingRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn stations(&self) -> &dyn StationRepository {
        &self.stations
    }

    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }
}
