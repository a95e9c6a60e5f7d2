//! Station DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Station;

/// Зарядная станция
///
/// `capacity` — число одновременных броней на каждый час каждого дня.
/// Неактивные станции не принимают новые брони и не отдают доступность.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": "ST-001",
    "name": "Riverside Hub",
    "location": "12 Quay St",
    "latitude": 41.3111,
    "longitude": 69.2406,
    "charger_type": "DC",
    "capacity": 4,
    "active": true,
    "created_at": "2024-01-10T09:00:00Z",
    "updated_at": "2024-01-10T09:00:00Z"
}))]
pub struct StationDto {
    /// Уникальный ID станции
    pub id: String,
    /// Отображаемое имя
    pub name: String,
    /// Адрес / описание местоположения
    pub location: String,
    /// Широта. null если координаты не заданы
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Долгота. null если координаты не заданы
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Тип зарядки: `AC` или `DC`
    pub charger_type: String,
    /// Слотов на каждый час (>= 1)
    pub capacity: u32,
    /// Принимает ли станция новые брони
    pub active: bool,
    /// Время создания (UTC, ISO 8601)
    pub created_at: DateTime<Utc>,
    /// Время последнего изменения (UTC, ISO 8601)
    pub updated_at: DateTime<Utc>,
}

impl StationDto {
    pub fn from_domain(s: Station) -> Self {
        Self {
            id: s.id,
            name: s.name,
            location: s.location,
            latitude: s.latitude,
            longitude: s.longitude,
            charger_type: s.charger_type.as_str().to_string(),
            capacity: s.capacity,
            active: s.active,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

/// Запрос на создание станции
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateStationRequest {
    /// ID станции. Если не задан — генерируется автоматически
    pub id: Option<String>,
    /// Отображаемое имя
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    /// Адрес / описание местоположения
    #[validate(length(min = 1, max = 250))]
    pub location: String,
    /// Широта
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    /// Долгота
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    /// Тип зарядки: `AC` или `DC`
    pub charger_type: String,
    /// Слотов на каждый час
    #[validate(range(min = 1))]
    pub capacity: u32,
}

/// Запрос на изменение станции
///
/// Передаются только изменяемые поля; отсутствующие не трогаются.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateStationRequest {
    /// Новое имя
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    /// Новое местоположение
    #[validate(length(min = 1, max = 250))]
    pub location: Option<String>,
    /// Новая широта
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    /// Новая долгота
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    /// Новый тип зарядки: `AC` или `DC`
    pub charger_type: Option<String>,
    /// Новая ёмкость (слотов на час)
    #[validate(range(min = 1))]
    pub capacity: Option<u32>,
}

/// Фильтр списка станций
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct StationFilter {
    /// Только активные (`true`) или только выключенные (`false`)
    pub active: Option<bool>,
}
