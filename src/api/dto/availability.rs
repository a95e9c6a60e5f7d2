//! Availability DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::{DayAvailability, HourAvailability};

/// Занятость одного часового слота
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HourAvailabilityDto {
    /// Час 0–23
    pub hour: u8,
    /// Активных броней на этот час
    pub booked: u32,
    /// Свободных слотов: `total - booked`
    pub remaining: u32,
    /// Ёмкость станции (одинакова для всех часов)
    pub total: u32,
}

impl HourAvailabilityDto {
    pub fn from_domain(h: HourAvailability) -> Self {
        Self {
            hour: h.hour,
            booked: h.booked,
            remaining: h.remaining(),
            total: h.total,
        }
    }
}

/// Доступность станции на один день
///
/// Всегда ровно 24 записи — часы без броней приходят с `booked = 0`.
/// Пересчитывается при каждом запросе, без кэширования.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "station_id": "ST-001",
    "date": "2024-01-15",
    "capacity": 2,
    "hours": [
        {"hour": 0, "booked": 0, "remaining": 2, "total": 2},
        {"hour": 10, "booked": 2, "remaining": 0, "total": 2}
    ]
}))]
pub struct DayAvailabilityDto {
    /// ID станции
    pub station_id: String,
    /// Запрошенный день
    pub date: NaiveDate,
    /// Ёмкость станции
    pub capacity: u32,
    /// 24 часовых слота
    pub hours: Vec<HourAvailabilityDto>,
}

impl DayAvailabilityDto {
    pub fn from_domain(day: DayAvailability) -> Self {
        Self {
            station_id: day.station_id,
            date: day.date,
            capacity: day.capacity,
            hours: day
                .hours
                .into_iter()
                .map(HourAvailabilityDto::from_domain)
                .collect(),
        }
    }
}

/// Параметры запроса доступности
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct AvailabilityQuery {
    /// День, `YYYY-MM-DD`. Прошлые даты допустимы — решает клиент
    pub date: NaiveDate,
}
