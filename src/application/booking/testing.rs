//! In-memory repository fakes and fixed ports for service tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use crate::domain::{
    Booking, BookingRepository, BookingStatus, ChargerType, Clock, CredentialIssuer, DomainError,
    DomainResult, RepositoryProvider, ReservationHour, Station, StationRepository,
};

/// The instant every fake clock reads: 2024-01-10 09:00 UTC.
pub fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap()
}

pub struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(created_at()))
}

pub struct StaticIssuer;

#[async_trait]
impl CredentialIssuer for StaticIssuer {
    async fn issue(&self, booking: &Booking) -> DomainResult<String> {
        Ok(format!("QR-{}", booking.id))
    }
}

pub fn static_issuer() -> Arc<dyn CredentialIssuer> {
    Arc::new(StaticIssuer)
}

// ── In-memory repositories ──────────────────────────────────────

#[derive(Default)]
pub struct InMemoryStationRepository {
    rows: Mutex<Vec<Station>>,
}

#[async_trait]
impl StationRepository for InMemoryStationRepository {
    async fn save(&self, station: Station) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|s| s.id == station.id) {
            return Err(DomainError::Conflict(format!(
                "Station {} already exists",
                station.id
            )));
        }
        rows.push(station);
        Ok(())
    }

    async fn update(&self, station: Station) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|s| s.id == station.id) {
            Some(slot) => {
                *slot = station;
                Ok(())
            }
            None => Err(DomainError::NotFound {
                entity: "Station",
                field: "id",
                value: station.id,
            }),
        }
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Station>> {
        Ok(self.rows.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn find_all(&self) -> DomainResult<Vec<Station>> {
        Ok(self.rows.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct InMemoryBookingRepository {
    rows: Mutex<Vec<Booking>>,
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert(&self, booking: Booking) -> DomainResult<()> {
        // Yield first so the check-then-act window of a caller that
        // forgot the slot lock is actually observable in race tests.
        tokio::task::yield_now().await;
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|b| b.id == booking.id) {
            return Err(DomainError::Conflict(format!(
                "Booking {} already exists",
                booking.id
            )));
        }
        rows.push(booking);
        Ok(())
    }

    async fn replace(&self, booking: Booking) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|b| b.id == booking.id) {
            Some(slot) => {
                *slot = booking;
                Ok(())
            }
            None => Err(DomainError::NotFound {
                entity: "Booking",
                field: "id",
                value: booking.id.to_string(),
            }),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Booking>> {
        Ok(self.rows.lock().unwrap().iter().find(|b| b.id == id).cloned())
    }

    async fn find_occupying_in_window(
        &self,
        station_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|b| {
                let day_start = b.date.and_hms_opt(0, 0, 0).unwrap().and_utc();
                b.station_id == station_id
                    && b.status.occupies_slot()
                    && day_start >= start
                    && day_start < end
            })
            .cloned()
            .collect())
    }

    async fn count_occupying_slot(
        &self,
        station_id: &str,
        date: NaiveDate,
        hour: u8,
    ) -> DomainResult<u64> {
        tokio::task::yield_now().await;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|b| {
                b.station_id == station_id
                    && b.date == date
                    && b.hour == hour
                    && b.status.occupies_slot()
            })
            .count() as u64)
    }

    async fn find_pending_ended_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|b| {
                b.status == BookingStatus::Pending && b.slot_end().unwrap() < cutoff
            })
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> DomainResult<Vec<Booking>> {
        Ok(self.rows.lock().unwrap().clone())
    }
}

// ── Provider ────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryProvider {
    stations: InMemoryStationRepository,
    bookings: InMemoryBookingRepository,
}

impl RepositoryProvider for InMemoryProvider {
    fn stations(&self) -> &dyn StationRepository {
        &self.stations
    }

    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }
}

impl InMemoryProvider {
    pub fn add_station(&self, id: &str, capacity: u32, active: bool) {
        let mut station = Station::new(
            id,
            format!("Station {}", id),
            "Test Street 1",
            None,
            None,
            ChargerType::Ac,
            capacity,
            created_at(),
        )
        .unwrap();
        station.active = active;
        self.stations.rows.lock().unwrap().push(station);
    }

    pub async fn seed_bookings(&self, bookings: Vec<Booking>) {
        for booking in bookings {
            self.bookings.insert(booking).await.unwrap();
        }
    }
}

/// A provider holding one station with the given capacity/active flag.
pub fn provider_with_station(id: &str, capacity: u32, active: bool) -> Arc<InMemoryProvider> {
    let provider = Arc::new(InMemoryProvider::default());
    provider.add_station(id, capacity, active);
    provider
}

/// Booking fixture at a given slot with a forced status.
pub fn sample_booking_at(
    station_id: &str,
    date: NaiveDate,
    hour: u8,
    status: BookingStatus,
) -> Booking {
    let mut booking = Booking::new(
        Uuid::new_v4(),
        "driver-fixture",
        station_id,
        date,
        ReservationHour::new(hour).unwrap(),
        created_at(),
    );
    booking.status = status;
    booking
}
