//! Slot addressing and day-window arithmetic
//!
//! A slot is one hourly capacity unit at a station: the triple
//! (station, date, hour). Calendar days are interpreted in UTC,
//! uniformly for availability computation and admission.

use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::shared::errors::DomainError;

use super::repositories::DomainResult;

/// Hours in a reservation day; hours are numbered 0..=23.
pub const HOURS_PER_DAY: u8 = 24;

/// A validated reservation hour.
///
/// Represents the half-open interval `[hour:00, hour+1:00)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReservationHour(u8);

impl ReservationHour {
    pub fn new(hour: u8) -> DomainResult<Self> {
        if hour >= HOURS_PER_DAY {
            return Err(DomainError::Validation(format!(
                "Hour must be in 0..=23, got {}",
                hour
            )));
        }
        Ok(Self(hour))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for ReservationHour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

/// Key identifying one hourly slot at a station.
///
/// Admission serializes on this key: concurrent operations targeting
/// the same key take turns, different keys proceed in parallel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub station_id: String,
    pub date: NaiveDate,
    pub hour: u8,
}

impl SlotKey {
    pub fn new(station_id: impl Into<String>, date: NaiveDate, hour: ReservationHour) -> Self {
        Self {
            station_id: station_id.into(),
            date,
            hour: hour.value(),
        }
    }
}

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{:02}:00", self.station_id, self.date, self.hour)
    }
}

/// The half-open UTC window `[date 00:00, date+1 00:00)` of a calendar day.
pub fn day_window(date: NaiveDate) -> DomainResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| DomainError::Validation(format!("Invalid date: {}", date)))?
        .and_utc();
    let end = date
        .checked_add_days(Days::new(1))
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| DomainError::Validation(format!("Date out of range: {}", date)))?
        .and_utc();
    Ok((start, end))
}

/// UTC instant at which the slot's hour ends (start of the next hour).
pub fn slot_end(date: NaiveDate, hour: u8) -> DomainResult<DateTime<Utc>> {
    let (start, _) = day_window(date)?;
    Ok(start + chrono::Duration::hours(hour as i64 + 1))
}

/// Highest hour of `cutoff`'s own day whose slot ended strictly before
/// `cutoff`, or `None` when no hour of that day has fully passed yet.
/// Slots of earlier days have all ended by definition.
pub fn last_fully_ended_hour(cutoff: DateTime<Utc>) -> Option<u8> {
    use chrono::Timelike;

    let secs = cutoff.time().num_seconds_from_midnight() as i64;
    // hour h has ended strictly before cutoff iff (h + 1) * 3600 < secs
    let h = (secs - 1).div_euclid(3600) - 1;
    if h >= 0 {
        Some(h as u8)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn hour_validation() {
        assert!(ReservationHour::new(0).is_ok());
        assert!(ReservationHour::new(23).is_ok());
        assert!(matches!(
            ReservationHour::new(24),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn day_window_is_half_open_utc() {
        let (start, end) = day_window(date(2024, 1, 15)).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-01-15T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-01-16T00:00:00+00:00");
        assert_eq!(end - start, chrono::Duration::days(1));
    }

    #[test]
    fn day_window_crosses_month_and_year() {
        let (_, end) = day_window(date(2024, 12, 31)).unwrap();
        assert_eq!(end.date_naive(), date(2025, 1, 1));
    }

    #[test]
    fn slot_end_is_start_of_next_hour() {
        let end = slot_end(date(2024, 1, 15), 10).unwrap();
        assert_eq!(end.to_rfc3339(), "2024-01-15T11:00:00+00:00");

        // Hour 23 spills into the next day
        let end = slot_end(date(2024, 1, 15), 23).unwrap();
        assert_eq!(end.to_rfc3339(), "2024-01-16T00:00:00+00:00");
    }

    #[test]
    fn last_fully_ended_hour_is_strict() {
        use chrono::TimeZone;
        let at = |h: u32, m: u32, s: u32| {
            Utc.with_ymd_and_hms(2024, 1, 15, h, m, s).unwrap()
        };

        // Nothing has ended at or just after midnight
        assert_eq!(last_fully_ended_hour(at(0, 0, 0)), None);
        assert_eq!(last_fully_ended_hour(at(0, 59, 59)), None);

        // Hour 0 ends exactly at 01:00 — not strictly before it
        assert_eq!(last_fully_ended_hour(at(1, 0, 0)), None);
        assert_eq!(last_fully_ended_hour(at(1, 0, 1)), Some(0));

        assert_eq!(last_fully_ended_hour(at(9, 0, 0)), Some(7));
        assert_eq!(last_fully_ended_hour(at(9, 30, 0)), Some(8));
        assert_eq!(last_fully_ended_hour(at(23, 59, 59)), Some(22));
    }

    #[test]
    fn slot_keys_compare_by_value() {
        let h = ReservationHour::new(10).unwrap();
        let a = SlotKey::new("ST-001", date(2024, 1, 15), h);
        let b = SlotKey::new("ST-001", date(2024, 1, 15), h);
        let c = SlotKey::new("ST-002", date(2024, 1, 15), h);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
