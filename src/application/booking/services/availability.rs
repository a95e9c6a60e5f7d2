//! Day availability computation
//!
//! Derives per-hour occupancy for one station and calendar day from the
//! booking rows. Pure read: nothing is cached, every call recounts
//! against current state.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::{day_window, DomainError, DomainResult, RepositoryProvider, HOURS_PER_DAY};

/// Occupancy of a single hourly slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourAvailability {
    /// Hour of day, 0..=23
    pub hour: u8,
    /// Non-cancelled bookings at this hour
    pub booked: u32,
    /// Station capacity (same ceiling for every hour)
    pub total: u32,
}

impl HourAvailability {
    pub fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.booked)
    }
}

/// Availability of all 24 hourly slots of one station day.
#[derive(Debug, Clone)]
pub struct DayAvailability {
    pub station_id: String,
    pub date: NaiveDate,
    pub capacity: u32,
    /// Exactly 24 entries, hour 0 through 23
    pub hours: Vec<HourAvailability>,
}

pub struct AvailabilityService {
    repos: Arc<dyn RepositoryProvider>,
}

impl AvailabilityService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Per-hour booked counts and remaining capacity for one station day.
    ///
    /// The day is the half-open UTC window `[date 00:00, date+1 00:00)`.
    /// Any valid date is accepted; whether booking in the past makes
    /// sense is the caller's policy.
    pub async fn get_availability(
        &self,
        station_id: &str,
        date: NaiveDate,
    ) -> DomainResult<DayAvailability> {
        let station = self
            .repos
            .stations()
            .find_by_id(station_id)
            .await?
            .filter(|s| s.active)
            .ok_or_else(|| DomainError::NotFound {
                entity: "Station",
                field: "id",
                value: station_id.to_string(),
            })?;

        let (start, end) = day_window(date)?;
        let bookings = self
            .repos
            .bookings()
            .find_occupying_in_window(station_id, start, end)
            .await?;

        let mut booked = [0u32; HOURS_PER_DAY as usize];
        for booking in &bookings {
            if let Some(count) = booked.get_mut(booking.hour as usize) {
                *count += 1;
            }
        }

        let hours = booked
            .iter()
            .enumerate()
            .map(|(hour, &count)| HourAvailability {
                hour: hour as u8,
                booked: count,
                total: station.capacity,
            })
            .collect();

        Ok(DayAvailability {
            station_id: station.id,
            date,
            capacity: station.capacity,
            hours,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::booking::testing::{provider_with_station, sample_booking_at};
    use crate::domain::BookingStatus;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[tokio::test]
    async fn empty_day_has_full_capacity_everywhere() {
        let repos = provider_with_station("ST-001", 3, true);
        let service = AvailabilityService::new(repos);

        let day = service.get_availability("ST-001", date(15)).await.unwrap();

        assert_eq!(day.hours.len(), 24);
        assert_eq!(day.capacity, 3);
        for (i, slot) in day.hours.iter().enumerate() {
            assert_eq!(slot.hour as usize, i);
            assert_eq!(slot.booked, 0);
            assert_eq!(slot.remaining(), 3);
        }
    }

    #[tokio::test]
    async fn counts_only_non_cancelled_bookings_of_that_day() {
        let repos = provider_with_station("ST-001", 3, true);
        repos
            .seed_bookings(vec![
                sample_booking_at("ST-001", date(15), 10, BookingStatus::Pending),
                sample_booking_at("ST-001", date(15), 10, BookingStatus::Approved),
                sample_booking_at("ST-001", date(15), 10, BookingStatus::Cancelled),
                sample_booking_at("ST-001", date(15), 11, BookingStatus::Completed),
                // other day and other station must not count
                sample_booking_at("ST-001", date(16), 10, BookingStatus::Pending),
                sample_booking_at("ST-002", date(15), 10, BookingStatus::Pending),
            ])
            .await;
        let service = AvailabilityService::new(repos);

        let day = service.get_availability("ST-001", date(15)).await.unwrap();

        assert_eq!(day.hours[10].booked, 2);
        assert_eq!(day.hours[10].remaining(), 1);
        assert_eq!(day.hours[11].booked, 1);
        assert_eq!(day.hours[9].booked, 0);
    }

    #[tokio::test]
    async fn unknown_station_is_not_found() {
        let repos = provider_with_station("ST-001", 3, true);
        let service = AvailabilityService::new(repos);

        let err = service
            .get_availability("ST-404", date(15))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn inactive_station_is_not_found() {
        let repos = provider_with_station("ST-001", 3, false);
        let service = AvailabilityService::new(repos);

        let err = service
            .get_availability("ST-001", date(15))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
