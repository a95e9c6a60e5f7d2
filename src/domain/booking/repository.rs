//! Booking repository trait

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::super::repositories::DomainResult;
use super::model::Booking;

/// Persistence operations for bookings.
///
/// Occupancy is never pre-aggregated: `count_occupying_slot` and
/// `find_occupying_in_window` derive it from the booking rows at query
/// time, excluding `Cancelled`.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert a new booking. A storage-level uniqueness/serialization
    /// failure maps to `DomainError::Conflict`.
    async fn insert(&self, booking: Booking) -> DomainResult<()>;

    /// Replace an existing booking by id (reschedule, status change).
    async fn replace(&self, booking: Booking) -> DomainResult<()>;

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Booking>>;

    /// Non-cancelled bookings of one station whose reservation day falls
    /// in the half-open UTC window `[start, end)`.
    async fn find_occupying_in_window(
        &self,
        station_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>>;

    /// Count of non-cancelled bookings at one (station, date, hour) slot.
    async fn count_occupying_slot(
        &self,
        station_id: &str,
        date: NaiveDate,
        hour: u8,
    ) -> DomainResult<u64>;

    /// Pending bookings whose reserved hour ended before `cutoff`.
    /// Consumed by the stale-booking sweep.
    async fn find_pending_ended_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>>;

    async fn find_all(&self) -> DomainResult<Vec<Booking>>;
}
