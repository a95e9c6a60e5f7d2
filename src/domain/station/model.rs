//! Charging station domain entity

use chrono::{DateTime, Utc};

use crate::shared::errors::DomainError;

use super::super::repositories::DomainResult;

/// Charger current type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargerType {
    Ac,
    Dc,
}

impl ChargerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ac => "AC",
            Self::Dc => "DC",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "AC" => Some(Self::Ac),
            "DC" => Some(Self::Dc),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChargerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Charging station with a fixed hourly booking capacity.
///
/// `capacity` is the ceiling applied identically to every hour of every
/// day: at most `capacity` non-cancelled bookings may target any one
/// (date, hour) at this station.
#[derive(Debug, Clone)]
pub struct Station {
    /// Opaque station ID, e.g. "ST-001"
    pub id: String,
    pub name: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub charger_type: ChargerType,
    /// Bookable slots per hour, always >= 1
    pub capacity: u32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Station {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        charger_type: ChargerType,
        capacity: u32,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if capacity == 0 {
            return Err(DomainError::Validation(
                "Station capacity must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            id: id.into(),
            name: name.into(),
            location: location.into(),
            latitude,
            longitude,
            charger_type,
            capacity,
            active: true,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.active = false;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_station() -> Station {
        Station::new(
            "ST-001",
            "Riverside Hub",
            "12 Quay St",
            Some(41.31),
            Some(69.24),
            ChargerType::Dc,
            4,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn new_station_is_active() {
        let s = sample_station();
        assert!(s.active);
        assert_eq!(s.capacity, 4);
        assert_eq!(s.charger_type, ChargerType::Dc);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let result = Station::new(
            "ST-002",
            "Bad",
            "Nowhere",
            None,
            None,
            ChargerType::Ac,
            0,
            Utc::now(),
        );
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn deactivate_clears_active_flag() {
        let mut s = sample_station();
        s.deactivate(Utc::now());
        assert!(!s.active);
    }

    #[test]
    fn charger_type_round_trips() {
        assert_eq!(ChargerType::from_str("dc"), Some(ChargerType::Dc));
        assert_eq!(ChargerType::from_str("AC"), Some(ChargerType::Ac));
        assert_eq!(ChargerType::from_str("Tesla"), None);
        assert_eq!(ChargerType::Dc.as_str(), "DC");
    }
}
