//! Booking admission and lifecycle
//!
//! Gates creation and rescheduling so a station's hourly capacity is
//! never exceeded, and drives the status state machine. The occupancy
//! check and the subsequent insert form one admission unit, serialized
//! per slot key via [`SlotLockRegistry`] — attempts on different slots
//! run in parallel.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::domain::{
    Booking, BookingStatus, Clock, CredentialIssuer, DomainError, DomainResult,
    RepositoryProvider, ReservationHour, SlotKey, Station,
};

use super::slot_lock::SlotLockRegistry;

pub struct AdmissionService {
    repos: Arc<dyn RepositoryProvider>,
    clock: Arc<dyn Clock>,
    credentials: Arc<dyn CredentialIssuer>,
    slot_locks: SlotLockRegistry,
}

impl AdmissionService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        clock: Arc<dyn Clock>,
        credentials: Arc<dyn CredentialIssuer>,
    ) -> Self {
        Self {
            repos,
            clock,
            credentials,
            slot_locks: SlotLockRegistry::new(),
        }
    }

    /// Admit a new booking at (station, date, hour).
    ///
    /// Fails with `CapacityExceeded` when the hour is fully booked; on
    /// success the booking is persisted as `Pending` and returned.
    pub async fn create_booking(
        &self,
        owner_id: &str,
        station_id: &str,
        date: NaiveDate,
        hour: u8,
    ) -> DomainResult<Booking> {
        let hour = ReservationHour::new(hour)?;
        let station = self.active_station(station_id).await?;

        let key = SlotKey::new(station_id, date, hour);
        let _slot = self.slot_locks.acquire(&key).await;

        let booked = self
            .repos
            .bookings()
            .count_occupying_slot(station_id, date, hour.value())
            .await?;
        if booked >= station.capacity as u64 {
            metrics::counter!("bookings_rejected_total", "reason" => "capacity").increment(1);
            return Err(DomainError::CapacityExceeded {
                station_id: station_id.to_string(),
                date,
                hour: hour.value(),
            });
        }

        let booking = Booking::new(
            Uuid::new_v4(),
            owner_id,
            station_id,
            date,
            hour,
            self.clock.now(),
        );
        self.repos.bookings().insert(booking.clone()).await?;

        metrics::counter!("bookings_created_total").increment(1);
        info!(
            booking_id = %booking.id,
            station_id,
            date = %date,
            hour = hour.value(),
            "Booking admitted"
        );
        Ok(booking)
    }

    /// Move a `Pending` booking to a new (station, date, hour), running
    /// the same capacity check against the target slot. The booking's
    /// own occupancy is not counted when the target equals its current
    /// slot. On failure the original booking is left untouched.
    pub async fn reschedule_booking(
        &self,
        booking_id: Uuid,
        station_id: &str,
        date: NaiveDate,
        hour: u8,
    ) -> DomainResult<Booking> {
        let hour = ReservationHour::new(hour)?;
        let mut booking = self.booking_by_id(booking_id).await?;
        booking.ensure_reschedulable()?;

        let station = self.active_station(station_id).await?;

        let key = SlotKey::new(station_id, date, hour);
        let _slot = self.slot_locks.acquire(&key).await;

        let mut booked = self
            .repos
            .bookings()
            .count_occupying_slot(station_id, date, hour.value())
            .await?;
        if booking.slot_key() == key {
            // The booking itself occupies the target slot; it vacates
            // that spot by moving onto it.
            booked = booked.saturating_sub(1);
        }
        if booked >= station.capacity as u64 {
            metrics::counter!("bookings_rejected_total", "reason" => "capacity").increment(1);
            return Err(DomainError::CapacityExceeded {
                station_id: station_id.to_string(),
                date,
                hour: hour.value(),
            });
        }

        let previous_slot = booking.slot_key();
        booking.relocate(station_id, date, hour)?;
        self.repos.bookings().replace(booking.clone()).await?;

        info!(
            booking_id = %booking.id,
            from = %previous_slot,
            to = %booking.slot_key(),
            "Booking rescheduled"
        );
        Ok(booking)
    }

    /// Cancel a booking on behalf of its owner. The record is kept; the
    /// slot is free for the very next admission check.
    pub async fn cancel_booking(
        &self,
        booking_id: Uuid,
        requester_id: &str,
    ) -> DomainResult<Booking> {
        let mut booking = self.booking_by_id(booking_id).await?;
        if booking.owner_id != requester_id {
            return Err(DomainError::Forbidden(format!(
                "Booking {} does not belong to {}",
                booking_id, requester_id
            )));
        }

        booking.cancel()?;
        self.repos.bookings().replace(booking.clone()).await?;

        metrics::counter!("bookings_cancelled_total").increment(1);
        info!(booking_id = %booking.id, slot = %booking.slot_key(), "Booking cancelled");
        Ok(booking)
    }

    /// Operator action: `Pending → Approved`, attaching the QR access
    /// token produced by the credential issuer.
    pub async fn approve_booking(&self, booking_id: Uuid) -> DomainResult<Booking> {
        let mut booking = self.booking_by_id(booking_id).await?;
        if booking.status != BookingStatus::Pending {
            return Err(DomainError::InvalidState(format!(
                "Cannot approve booking {} in status {}",
                booking.id, booking.status
            )));
        }

        let token = self.credentials.issue(&booking).await?;
        booking.approve(token)?;
        self.repos.bookings().replace(booking.clone()).await?;

        info!(booking_id = %booking.id, "Booking approved");
        Ok(booking)
    }

    /// Operator action: `Approved → Completed`.
    pub async fn complete_booking(&self, booking_id: Uuid) -> DomainResult<Booking> {
        let mut booking = self.booking_by_id(booking_id).await?;
        booking.complete()?;
        self.repos.bookings().replace(booking.clone()).await?;

        info!(booking_id = %booking.id, "Booking completed");
        Ok(booking)
    }

    pub async fn get_booking(&self, booking_id: Uuid) -> DomainResult<Booking> {
        self.booking_by_id(booking_id).await
    }

    async fn booking_by_id(&self, id: Uuid) -> DomainResult<Booking> {
        self.repos
            .bookings()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Booking",
                field: "id",
                value: id.to_string(),
            })
    }

    async fn active_station(&self, station_id: &str) -> DomainResult<Station> {
        let station = self
            .repos
            .stations()
            .find_by_id(station_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Station",
                field: "id",
                value: station_id.to_string(),
            })?;
        if !station.active {
            return Err(DomainError::InvalidState(format!(
                "Station {} is deactivated",
                station_id
            )));
        }
        Ok(station)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::booking::testing::{
        created_at, fixed_clock, provider_with_station, static_issuer,
    };

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn service(
        repos: Arc<crate::application::booking::testing::InMemoryProvider>,
    ) -> AdmissionService {
        AdmissionService::new(repos, fixed_clock(), static_issuer())
    }

    #[tokio::test]
    async fn create_persists_pending_booking_with_clock_timestamp() {
        let repos = provider_with_station("ST-001", 2, true);
        let svc = service(repos.clone());

        let booking = svc
            .create_booking("driver-1", "ST-001", date(15), 10)
            .await
            .unwrap();

        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.created_at, created_at());
        let stored = repos
            .bookings()
            .find_by_id(booking.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.slot_key(), booking.slot_key());
    }

    #[tokio::test]
    async fn create_rejects_invalid_hour_before_touching_store() {
        let repos = provider_with_station("ST-001", 2, true);
        let svc = service(repos.clone());

        let err = svc
            .create_booking("driver-1", "ST-001", date(15), 24)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(repos.bookings().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_unknown_and_inactive_stations() {
        let repos = provider_with_station("ST-001", 2, false);
        let svc = service(repos);

        let err = svc
            .create_booking("driver-1", "ST-404", date(15), 10)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let err = svc
            .create_booking("driver-1", "ST-001", date(15), 10)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[tokio::test]
    async fn capacity_two_admits_exactly_two() {
        let repos = provider_with_station("ST-001", 2, true);
        let svc = service(repos);

        svc.create_booking("a", "ST-001", date(15), 10).await.unwrap();
        svc.create_booking("b", "ST-001", date(15), 10).await.unwrap();

        let err = svc
            .create_booking("c", "ST-001", date(15), 10)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::CapacityExceeded { hour: 10, .. }));

        // A different hour is unaffected
        svc.create_booking("c", "ST-001", date(15), 11).await.unwrap();
    }

    #[tokio::test]
    async fn cancel_frees_the_slot_immediately() {
        let repos = provider_with_station("ST-001", 1, true);
        let svc = service(repos);

        let booking = svc
            .create_booking("a", "ST-001", date(15), 10)
            .await
            .unwrap();
        assert!(svc
            .create_booking("b", "ST-001", date(15), 10)
            .await
            .is_err());

        svc.cancel_booking(booking.id, "a").await.unwrap();

        // The freed slot admits the next request with no delay
        svc.create_booking("b", "ST-001", date(15), 10).await.unwrap();
    }

    #[tokio::test]
    async fn cancel_requires_the_owner() {
        let repos = provider_with_station("ST-001", 1, true);
        let svc = service(repos.clone());

        let booking = svc
            .create_booking("a", "ST-001", date(15), 10)
            .await
            .unwrap();
        let err = svc.cancel_booking(booking.id, "mallory").await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let stored = repos
            .bookings()
            .find_by_id(booking.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn reschedule_to_full_hour_leaves_original_unchanged() {
        let repos = provider_with_station("ST-001", 1, true);
        let svc = service(repos.clone());

        let victim = svc
            .create_booking("a", "ST-001", date(15), 10)
            .await
            .unwrap();
        svc.create_booking("b", "ST-001", date(15), 11).await.unwrap();

        let err = svc
            .reschedule_booking(victim.id, "ST-001", date(15), 11)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::CapacityExceeded { hour: 11, .. }));

        let stored = repos
            .bookings()
            .find_by_id(victim.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.hour, 10);
        assert_eq!(stored.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn reschedule_onto_own_slot_does_not_count_itself() {
        let repos = provider_with_station("ST-001", 1, true);
        let svc = service(repos);

        let booking = svc
            .create_booking("a", "ST-001", date(15), 10)
            .await
            .unwrap();

        // The hour is "full" (by this very booking), yet moving onto
        // the same slot must succeed.
        let moved = svc
            .reschedule_booking(booking.id, "ST-001", date(15), 10)
            .await
            .unwrap();
        assert_eq!(moved.hour, 10);
    }

    #[tokio::test]
    async fn reschedule_moves_between_days_and_stations() {
        let repos = provider_with_station("ST-001", 1, true);
        repos.add_station("ST-002", 1, true);
        let svc = service(repos.clone());

        let booking = svc
            .create_booking("a", "ST-001", date(15), 10)
            .await
            .unwrap();
        let moved = svc
            .reschedule_booking(booking.id, "ST-002", date(16), 8)
            .await
            .unwrap();
        assert_eq!(moved.station_id, "ST-002");
        assert_eq!(moved.date, date(16));
        assert_eq!(moved.hour, 8);

        // The vacated slot is bookable again
        svc.create_booking("b", "ST-001", date(15), 10).await.unwrap();
    }

    #[tokio::test]
    async fn reschedule_refused_after_approval() {
        let repos = provider_with_station("ST-001", 2, true);
        let svc = service(repos);

        let booking = svc
            .create_booking("a", "ST-001", date(15), 10)
            .await
            .unwrap();
        svc.approve_booking(booking.id).await.unwrap();

        let err = svc
            .reschedule_booking(booking.id, "ST-001", date(15), 11)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[tokio::test]
    async fn approve_attaches_access_token_once() {
        let repos = provider_with_station("ST-001", 2, true);
        let svc = service(repos.clone());

        let booking = svc
            .create_booking("a", "ST-001", date(15), 10)
            .await
            .unwrap();
        let approved = svc.approve_booking(booking.id).await.unwrap();
        assert_eq!(approved.status, BookingStatus::Approved);
        assert!(approved.access_token.is_some());

        let err = svc.approve_booking(booking.id).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[tokio::test]
    async fn complete_only_from_approved() {
        let repos = provider_with_station("ST-001", 2, true);
        let svc = service(repos);

        let booking = svc
            .create_booking("a", "ST-001", date(15), 10)
            .await
            .unwrap();
        assert!(svc.complete_booking(booking.id).await.is_err());

        svc.approve_booking(booking.id).await.unwrap();
        let completed = svc.complete_booking(booking.id).await.unwrap();
        assert_eq!(completed.status, BookingStatus::Completed);

        // Terminal: neither cancel nor complete may run again
        assert!(svc.complete_booking(booking.id).await.is_err());
        let err = svc.cancel_booking(booking.id, "a").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[tokio::test]
    async fn cancelling_completed_booking_does_not_alter_status() {
        let repos = provider_with_station("ST-001", 2, true);
        let svc = service(repos.clone());

        let booking = svc
            .create_booking("a", "ST-001", date(15), 10)
            .await
            .unwrap();
        svc.approve_booking(booking.id).await.unwrap();
        svc.complete_booking(booking.id).await.unwrap();

        assert!(svc.cancel_booking(booking.id, "a").await.is_err());
        let stored = repos
            .bookings()
            .find_by_id(booking.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, BookingStatus::Completed);
    }

    #[tokio::test]
    async fn full_hour_shows_in_availability_and_recovers_after_cancel() {
        use super::super::availability::AvailabilityService;

        let repos = provider_with_station("ST-001", 2, true);
        let svc = service(repos.clone());
        let availability = AvailabilityService::new(repos);

        let first = svc.create_booking("a", "ST-001", date(15), 10).await.unwrap();
        svc.create_booking("b", "ST-001", date(15), 10).await.unwrap();
        assert!(matches!(
            svc.create_booking("c", "ST-001", date(15), 10).await,
            Err(DomainError::CapacityExceeded { .. })
        ));

        let day = availability
            .get_availability("ST-001", date(15))
            .await
            .unwrap();
        assert_eq!(day.hours[10].booked, 2);
        assert_eq!(day.hours[10].remaining(), 0);

        svc.cancel_booking(first.id, "a").await.unwrap();

        let day = availability
            .get_availability("ST-001", date(15))
            .await
            .unwrap();
        assert_eq!(day.hours[10].booked, 1);
        assert_eq!(day.hours[10].remaining(), 1);

        svc.create_booking("c", "ST-001", date(15), 10).await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_races_for_last_slots_admit_exactly_capacity() {
        const CAPACITY: u32 = 2;
        const CONTENDERS: usize = 16;

        let repos = provider_with_station("ST-001", CAPACITY, true);
        let svc = Arc::new(service(repos.clone()));

        let mut handles = Vec::new();
        for i in 0..CONTENDERS {
            let svc = Arc::clone(&svc);
            handles.push(tokio::spawn(async move {
                svc.create_booking(&format!("driver-{}", i), "ST-001", date(15), 10)
                    .await
            }));
        }

        let mut admitted: u32 = 0;
        let mut capacity_rejected: u32 = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => admitted += 1,
                Err(DomainError::CapacityExceeded { .. }) => capacity_rejected += 1,
                Err(other) => panic!("unexpected error: {}", other),
            }
        }

        assert_eq!(admitted, CAPACITY);
        assert_eq!(capacity_rejected, CONTENDERS as u32 - CAPACITY);

        let occupancy = repos
            .bookings()
            .count_occupying_slot("ST-001", date(15), 10)
            .await
            .unwrap();
        assert_eq!(occupancy, CAPACITY as u64);
    }
}
