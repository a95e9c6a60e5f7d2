//! Booking DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::Booking;

/// Бронь одного часового слота
///
/// Создаётся в статусе `Pending`. После подтверждения оператором
/// (`Approved`) к брони прикрепляется QR-токен доступа.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": "7f9c1c5e-4a2b-4c6d-9e8f-112233445566",
    "owner_id": "user-42",
    "station_id": "ST-001",
    "date": "2024-01-15",
    "hour": 10,
    "status": "Pending",
    "created_at": "2024-01-10T09:00:00Z",
    "access_token": null
}))]
pub struct BookingDto {
    /// Уникальный ID брони
    pub id: Uuid,
    /// ID владельца (водителя)
    pub owner_id: String,
    /// ID станции
    pub station_id: String,
    /// День брони (без времени суток)
    pub date: NaiveDate,
    /// Час 0–23, интервал [hour:00, hour+1:00)
    pub hour: u8,
    /// Статус: `Pending`, `Approved`, `Cancelled`, `Completed`
    pub status: String,
    /// Время создания (UTC, ISO 8601)
    pub created_at: DateTime<Utc>,
    /// QR-токен доступа. null до подтверждения
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl BookingDto {
    pub fn from_domain(b: Booking) -> Self {
        Self {
            id: b.id,
            owner_id: b.owner_id,
            station_id: b.station_id,
            date: b.date,
            hour: b.hour,
            status: b.status.as_str().to_string(),
            created_at: b.created_at,
            access_token: b.access_token,
        }
    }
}

/// Запрос на создание брони
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateBookingRequest {
    /// ID владельца брони
    #[validate(length(min = 1, max = 120))]
    pub owner_id: String,
    /// ID станции
    #[validate(length(min = 1, max = 120))]
    pub station_id: String,
    /// День брони, `YYYY-MM-DD`
    pub date: NaiveDate,
    /// Час 0–23
    #[validate(range(max = 23))]
    pub hour: u8,
}

/// Запрос на перенос брони
///
/// Разрешён только для броней в статусе `Pending`.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RescheduleBookingRequest {
    /// Целевая станция
    #[validate(length(min = 1, max = 120))]
    pub station_id: String,
    /// Целевой день, `YYYY-MM-DD`
    pub date: NaiveDate,
    /// Целевой час 0–23
    #[validate(range(max = 23))]
    pub hour: u8,
}

/// Запрос на отмену брони
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CancelBookingRequest {
    /// Кто отменяет. Должен совпадать с владельцем брони
    #[validate(length(min = 1, max = 120))]
    pub requester_id: String,
}

/// Фильтры для списка броней
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct BookingFilter {
    /// Фильтр по владельцу
    pub owner_id: Option<String>,
    /// Фильтр по станции
    pub station_id: Option<String>,
    /// Фильтр по статусу: `pending`, `approved`, `cancelled`, `completed`
    pub status: Option<String>,
    /// Фильтр по дню брони, `YYYY-MM-DD`
    pub date: Option<NaiveDate>,
}
