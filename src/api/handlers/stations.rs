//! Station management and availability API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::{
    ApiResponse, AvailabilityQuery, CreateStationRequest, DayAvailabilityDto, PaginatedResponse,
    PaginationQuery, StationDto, StationFilter, UpdateStationRequest,
};
use crate::application::AvailabilityService;
use crate::domain::{ChargerType, Clock, DomainError, RepositoryProvider, Station};

use super::{domain_error, validation_error};

/// Application state for station handlers
#[derive(Clone)]
pub struct StationAppState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub availability: Arc<AvailabilityService>,
    pub clock: Arc<dyn Clock>,
}

fn parse_charger_type(raw: &str) -> Result<ChargerType, (StatusCode, Json<ApiResponse<()>>)> {
    ChargerType::from_str(raw).ok_or_else(|| {
        domain_error(DomainError::Validation(format!(
            "Unknown charger type: {}",
            raw
        )))
    })
}

/// Список станций
///
/// Возвращает станции с пагинацией. Фильтр `active` позволяет
/// запросить только работающие или только выключенные станции.
#[utoipa::path(
    get,
    path = "/api/v1/stations",
    tag = "Stations",
    params(StationFilter, PaginationQuery),
    responses(
        (status = 200, description = "Список станций с пагинацией", body = PaginatedResponse<StationDto>)
    )
)]
pub async fn list_stations(
    State(state): State<StationAppState>,
    Query(filter): Query<StationFilter>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<PaginatedResponse<StationDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let stations = state
        .repos
        .stations()
        .find_all()
        .await
        .map_err(domain_error)?;

    let filtered: Vec<_> = stations
        .into_iter()
        .filter(|s| filter.active.map_or(true, |want| s.active == want))
        .collect();

    let params = pagination.params();
    let total = filtered.len() as u64;
    let items: Vec<StationDto> = filtered
        .into_iter()
        .skip(params.offset() as usize)
        .take(params.limit as usize)
        .map(StationDto::from_domain)
        .collect();

    Ok(Json(PaginatedResponse::new(
        items,
        total,
        params.page,
        params.limit,
    )))
}

/// Получение станции по ID
#[utoipa::path(
    get,
    path = "/api/v1/stations/{station_id}",
    tag = "Stations",
    params(
        ("station_id" = String, Path, description = "Уникальный ID станции")
    ),
    responses(
        (status = 200, description = "Информация о станции", body = ApiResponse<StationDto>),
        (status = 404, description = "Станция не найдена")
    )
)]
pub async fn get_station(
    State(state): State<StationAppState>,
    Path(station_id): Path<String>,
) -> Result<Json<ApiResponse<StationDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let station = state
        .repos
        .stations()
        .find_by_id(&station_id)
        .await
        .map_err(domain_error)?
        .ok_or_else(|| {
            domain_error(DomainError::NotFound {
                entity: "Station",
                field: "id",
                value: station_id.clone(),
            })
        })?;

    Ok(Json(ApiResponse::success(StationDto::from_domain(station))))
}

/// Создание станции
///
/// Станция создаётся активной и сразу принимает брони.
/// Если `id` не передан, он генерируется автоматически.
#[utoipa::path(
    post,
    path = "/api/v1/stations",
    tag = "Stations",
    request_body = CreateStationRequest,
    responses(
        (status = 201, description = "Станция создана", body = ApiResponse<StationDto>),
        (status = 400, description = "Некорректные данные"),
        (status = 409, description = "Станция с таким ID уже существует")
    )
)]
pub async fn create_station(
    State(state): State<StationAppState>,
    Json(req): Json<CreateStationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<StationDto>>), (StatusCode, Json<ApiResponse<()>>)> {
    req.validate().map_err(validation_error)?;
    let charger_type = parse_charger_type(&req.charger_type)?;

    let id = match req.id.as_deref() {
        Some(id) if !id.trim().is_empty() => id.trim().to_string(),
        _ => format!("ST-{}", &Uuid::new_v4().simple().to_string()[..8]),
    };

    let station = Station::new(
        id,
        req.name,
        req.location,
        req.latitude,
        req.longitude,
        charger_type,
        req.capacity,
        state.clock.now(),
    )
    .map_err(domain_error)?;

    state
        .repos
        .stations()
        .save(station.clone())
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(StationDto::from_domain(station))),
    ))
}

/// Изменение станции
///
/// Меняет только переданные поля. Изменение ёмкости действует на все
/// последующие проверки доступности, уже существующие брони не трогает.
#[utoipa::path(
    put,
    path = "/api/v1/stations/{station_id}",
    tag = "Stations",
    params(
        ("station_id" = String, Path, description = "Уникальный ID станции")
    ),
    request_body = UpdateStationRequest,
    responses(
        (status = 200, description = "Станция обновлена", body = ApiResponse<StationDto>),
        (status = 404, description = "Станция не найдена")
    )
)]
pub async fn update_station(
    State(state): State<StationAppState>,
    Path(station_id): Path<String>,
    Json(req): Json<UpdateStationRequest>,
) -> Result<Json<ApiResponse<StationDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    req.validate().map_err(validation_error)?;

    let mut station = state
        .repos
        .stations()
        .find_by_id(&station_id)
        .await
        .map_err(domain_error)?
        .ok_or_else(|| {
            domain_error(DomainError::NotFound {
                entity: "Station",
                field: "id",
                value: station_id.clone(),
            })
        })?;

    if let Some(name) = req.name {
        station.name = name;
    }
    if let Some(location) = req.location {
        station.location = location;
    }
    if let Some(latitude) = req.latitude {
        station.latitude = Some(latitude);
    }
    if let Some(longitude) = req.longitude {
        station.longitude = Some(longitude);
    }
    if let Some(ref raw) = req.charger_type {
        station.charger_type = parse_charger_type(raw)?;
    }
    if let Some(capacity) = req.capacity {
        station.capacity = capacity;
    }
    station.updated_at = state.clock.now();

    state
        .repos
        .stations()
        .update(station.clone())
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(StationDto::from_domain(station))))
}

/// Выключение станции
///
/// Деактивированная станция перестаёт отдавать доступность и принимать
/// брони; существующие брони остаются как есть.
#[utoipa::path(
    post,
    path = "/api/v1/stations/{station_id}/deactivate",
    tag = "Stations",
    params(
        ("station_id" = String, Path, description = "Уникальный ID станции")
    ),
    responses(
        (status = 200, description = "Станция выключена", body = ApiResponse<StationDto>),
        (status = 404, description = "Станция не найдена")
    )
)]
pub async fn deactivate_station(
    State(state): State<StationAppState>,
    Path(station_id): Path<String>,
) -> Result<Json<ApiResponse<StationDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let mut station = state
        .repos
        .stations()
        .find_by_id(&station_id)
        .await
        .map_err(domain_error)?
        .ok_or_else(|| {
            domain_error(DomainError::NotFound {
                entity: "Station",
                field: "id",
                value: station_id.clone(),
            })
        })?;

    station.deactivate(state.clock.now());
    state
        .repos
        .stations()
        .update(station.clone())
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(StationDto::from_domain(station))))
}

/// Доступность станции на день
///
/// Возвращает все 24 часовых слота с числом занятых и свободных мест.
/// Отменённые брони не занимают слоты.
#[utoipa::path(
    get,
    path = "/api/v1/stations/{station_id}/availability",
    tag = "Stations",
    params(
        ("station_id" = String, Path, description = "Уникальный ID станции"),
        AvailabilityQuery
    ),
    responses(
        (status = 200, description = "Занятость 24 часовых слотов", body = ApiResponse<DayAvailabilityDto>),
        (status = 404, description = "Станция не найдена или выключена")
    )
)]
pub async fn get_station_availability(
    State(state): State<StationAppState>,
    Path(station_id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ApiResponse<DayAvailabilityDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let day = state
        .availability
        .get_availability(&station_id, query.date)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(DayAvailabilityDto::from_domain(
        day,
    ))))
}
