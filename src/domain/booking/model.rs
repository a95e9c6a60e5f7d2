//! Booking domain entity
//!
//! A booking reserves exactly one hourly slot: the (station, date, hour)
//! triple. Status transitions are owned by this model; services never
//! mutate `status` directly.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::shared::errors::DomainError;

use super::super::repositories::DomainResult;
use super::super::slot::{slot_end, ReservationHour, SlotKey};

/// Booking status
///
/// ```text
/// Pending --cancel-->  Cancelled
/// Pending --approve--> Approved
/// Approved --cancel--> Cancelled
/// Approved --complete--> Completed
/// ```
///
/// `Cancelled` and `Completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    /// Requested by the owner, awaiting operator approval
    Pending,
    /// Confirmed by a station operator; access token attached
    Approved,
    /// Withdrawn by the owner or the stale-booking sweep
    Cancelled,
    /// Charging session took place
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Cancelled => "Cancelled",
            Self::Completed => "Completed",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "Pending" => Self::Pending,
            "Approved" => Self::Approved,
            "Cancelled" => Self::Cancelled,
            "Completed" => Self::Completed,
            _ => Self::Pending,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Whether a booking in this status holds its slot.
    pub fn occupies_slot(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One hourly-slot reservation at a station
#[derive(Debug, Clone)]
pub struct Booking {
    /// Unique booking ID
    pub id: Uuid,
    /// Opaque owner (driver) ID
    pub owner_id: String,
    /// Station the slot belongs to
    pub station_id: String,
    /// Reservation day (no time-of-day component)
    pub date: NaiveDate,
    /// Reserved hour, the interval [hour:00, hour+1:00)
    pub hour: u8,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    /// QR access token, attached at approval
    pub access_token: Option<String>,
}

impl Booking {
    pub fn new(
        id: Uuid,
        owner_id: impl Into<String>,
        station_id: impl Into<String>,
        date: NaiveDate,
        hour: ReservationHour,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id: owner_id.into(),
            station_id: station_id.into(),
            date,
            hour: hour.value(),
            status: BookingStatus::Pending,
            created_at,
            access_token: None,
        }
    }

    pub fn slot_key(&self) -> SlotKey {
        SlotKey {
            station_id: self.station_id.clone(),
            date: self.date,
            hour: self.hour,
        }
    }

    /// UTC instant at which the reserved hour is over.
    pub fn slot_end(&self) -> DomainResult<DateTime<Utc>> {
        slot_end(self.date, self.hour)
    }

    /// `Pending → Approved`, attaching the access token.
    pub fn approve(&mut self, access_token: String) -> DomainResult<()> {
        if self.status != BookingStatus::Pending {
            return Err(self.transition_error("approve"));
        }
        self.status = BookingStatus::Approved;
        self.access_token = Some(access_token);
        Ok(())
    }

    /// `Pending|Approved → Cancelled`. The record is kept for audit;
    /// the slot is freed for the next occupancy count.
    pub fn cancel(&mut self) -> DomainResult<()> {
        if !matches!(self.status, BookingStatus::Pending | BookingStatus::Approved) {
            return Err(self.transition_error("cancel"));
        }
        self.status = BookingStatus::Cancelled;
        Ok(())
    }

    /// `Approved → Completed`.
    pub fn complete(&mut self) -> DomainResult<()> {
        if self.status != BookingStatus::Approved {
            return Err(self.transition_error("complete"));
        }
        self.status = BookingStatus::Completed;
        Ok(())
    }

    /// Rescheduling is only allowed before operator approval.
    pub fn ensure_reschedulable(&self) -> DomainResult<()> {
        if self.status != BookingStatus::Pending {
            return Err(self.transition_error("reschedule"));
        }
        Ok(())
    }

    /// Move this booking to a new slot. Caller has already run the
    /// capacity check for the target.
    pub fn relocate(
        &mut self,
        station_id: impl Into<String>,
        date: NaiveDate,
        hour: ReservationHour,
    ) -> DomainResult<()> {
        self.ensure_reschedulable()?;
        self.station_id = station_id.into();
        self.date = date;
        self.hour = hour.value();
        Ok(())
    }

    fn transition_error(&self, action: &str) -> DomainError {
        DomainError::InvalidState(format!(
            "Cannot {} booking {} in status {}",
            action, self.id, self.status
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_booking() -> Booking {
        Booking::new(
            Uuid::new_v4(),
            "driver-1",
            "ST-001",
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            ReservationHour::new(10).unwrap(),
            Utc::now(),
        )
    }

    #[test]
    fn new_booking_is_pending_without_token() {
        let b = sample_booking();
        assert_eq!(b.status, BookingStatus::Pending);
        assert!(b.access_token.is_none());
        assert!(b.status.occupies_slot());
    }

    #[test]
    fn approve_attaches_token() {
        let mut b = sample_booking();
        b.approve("QR-TOKEN".to_string()).unwrap();
        assert_eq!(b.status, BookingStatus::Approved);
        assert_eq!(b.access_token.as_deref(), Some("QR-TOKEN"));
    }

    #[test]
    fn approve_twice_fails() {
        let mut b = sample_booking();
        b.approve("t1".to_string()).unwrap();
        assert!(matches!(
            b.approve("t2".to_string()),
            Err(DomainError::InvalidState(_))
        ));
    }

    #[test]
    fn cancel_from_pending_and_approved() {
        let mut b = sample_booking();
        b.cancel().unwrap();
        assert_eq!(b.status, BookingStatus::Cancelled);
        assert!(!b.status.occupies_slot());

        let mut b = sample_booking();
        b.approve("t".to_string()).unwrap();
        b.cancel().unwrap();
        assert_eq!(b.status, BookingStatus::Cancelled);
    }

    #[test]
    fn terminal_statuses_reject_all_transitions() {
        let mut b = sample_booking();
        b.approve("t".to_string()).unwrap();
        b.complete().unwrap();
        assert!(b.status.is_terminal());

        let status_before = b.status;
        assert!(b.cancel().is_err());
        assert!(b.complete().is_err());
        assert!(b.approve("t2".to_string()).is_err());
        assert_eq!(b.status, status_before);

        let mut b = sample_booking();
        b.cancel().unwrap();
        assert!(b.cancel().is_err());
        assert!(b.approve("t".to_string()).is_err());
        assert!(b.complete().is_err());
    }

    #[test]
    fn complete_requires_approved() {
        let mut b = sample_booking();
        assert!(matches!(b.complete(), Err(DomainError::InvalidState(_))));
        assert_eq!(b.status, BookingStatus::Pending);
    }

    #[test]
    fn relocate_only_while_pending() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
        let hour = ReservationHour::new(8).unwrap();

        let mut b = sample_booking();
        b.relocate("ST-002", date, hour).unwrap();
        assert_eq!(b.station_id, "ST-002");
        assert_eq!(b.date, date);
        assert_eq!(b.hour, 8);

        let mut b = sample_booking();
        b.approve("t".to_string()).unwrap();
        let key_before = b.slot_key();
        assert!(b.relocate("ST-002", date, hour).is_err());
        assert_eq!(b.slot_key(), key_before);
    }

    #[test]
    fn status_round_trips_through_strings() {
        for s in [
            BookingStatus::Pending,
            BookingStatus::Approved,
            BookingStatus::Cancelled,
            BookingStatus::Completed,
        ] {
            assert_eq!(BookingStatus::from_str(s.as_str()), s);
        }
    }
}
