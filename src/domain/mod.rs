pub mod booking;
pub mod clock;
pub mod ports;
pub mod repositories;
pub mod slot;
pub mod station;

// Re-export commonly used types
pub use booking::{Booking, BookingRepository, BookingStatus};
pub use clock::{Clock, SystemClock};
pub use ports::CredentialIssuer;
pub use repositories::{DomainResult, RepositoryProvider};
pub use slot::{day_window, last_fully_ended_hour, ReservationHour, SlotKey, HOURS_PER_DAY};
pub use station::{ChargerType, Station, StationRepository};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::DomainError;
