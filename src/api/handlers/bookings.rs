//! Booking API handlers
//!
//! Создание и перенос брони идут через сервис допуска, который
//! гарантирует, что ёмкость часа не будет превышена.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::{
    ApiResponse, BookingDto, BookingFilter, CancelBookingRequest, CreateBookingRequest,
    PaginatedResponse, PaginationQuery, RescheduleBookingRequest,
};
use crate::application::AdmissionService;
use crate::domain::RepositoryProvider;

use super::{domain_error, validation_error};

/// Application state for booking handlers
#[derive(Clone)]
pub struct BookingAppState {
    pub admission: Arc<AdmissionService>,
    pub repos: Arc<dyn RepositoryProvider>,
}

/// Создание брони
///
/// Бронирует один часовой слот на станции. Если все слоты часа заняты,
/// возвращает 409 с кодом `capacity_exceeded`.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Бронь создана в статусе Pending", body = ApiResponse<BookingDto>),
        (status = 400, description = "Некорректный час или данные"),
        (status = 404, description = "Станция не найдена"),
        (status = 409, description = "Час полностью занят")
    )
)]
pub async fn create_booking(
    State(state): State<BookingAppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingDto>>), (StatusCode, Json<ApiResponse<()>>)> {
    req.validate().map_err(validation_error)?;

    let booking = state
        .admission
        .create_booking(&req.owner_id, &req.station_id, req.date, req.hour)
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(BookingDto::from_domain(booking))),
    ))
}

/// Получение брони по ID
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{booking_id}",
    tag = "Bookings",
    params(
        ("booking_id" = Uuid, Path, description = "Уникальный ID брони")
    ),
    responses(
        (status = 200, description = "Информация о брони", body = ApiResponse<BookingDto>),
        (status = 404, description = "Бронь не найдена")
    )
)]
pub async fn get_booking(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let booking = state
        .admission
        .get_booking(booking_id)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(BookingDto::from_domain(booking))))
}

/// Список броней
///
/// Возвращает брони с фильтрацией по владельцу, станции, статусу и дню.
/// Поддерживает пагинацию.
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    params(BookingFilter, PaginationQuery),
    responses(
        (status = 200, description = "Список броней с пагинацией", body = PaginatedResponse<BookingDto>)
    )
)]
pub async fn list_bookings(
    State(state): State<BookingAppState>,
    Query(filter): Query<BookingFilter>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<PaginatedResponse<BookingDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let bookings = state
        .repos
        .bookings()
        .find_all()
        .await
        .map_err(domain_error)?;

    let filtered: Vec<_> = bookings
        .into_iter()
        .filter(|b| {
            if let Some(ref owner) = filter.owner_id {
                if &b.owner_id != owner {
                    return false;
                }
            }
            if let Some(ref station) = filter.station_id {
                if &b.station_id != station {
                    return false;
                }
            }
            if let Some(ref status) = filter.status {
                if !status.eq_ignore_ascii_case(b.status.as_str()) {
                    return false;
                }
            }
            if let Some(date) = filter.date {
                if b.date != date {
                    return false;
                }
            }
            true
        })
        .collect();

    let params = pagination.params();
    let total = filtered.len() as u64;
    let items: Vec<BookingDto> = filtered
        .into_iter()
        .skip(params.offset() as usize)
        .take(params.limit as usize)
        .map(BookingDto::from_domain)
        .collect();

    Ok(Json(PaginatedResponse::new(
        items,
        total,
        params.page,
        params.limit,
    )))
}

/// Перенос брони
///
/// Переносит бронь в статусе `Pending` на другой слот (станцию, день
/// или час). Если целевой час занят, бронь остаётся на прежнем месте.
#[utoipa::path(
    put,
    path = "/api/v1/bookings/{booking_id}/reschedule",
    tag = "Bookings",
    params(
        ("booking_id" = Uuid, Path, description = "Уникальный ID брони")
    ),
    request_body = RescheduleBookingRequest,
    responses(
        (status = 200, description = "Бронь перенесена", body = ApiResponse<BookingDto>),
        (status = 404, description = "Бронь или станция не найдена"),
        (status = 409, description = "Целевой час занят или бронь уже подтверждена")
    )
)]
pub async fn reschedule_booking(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<Uuid>,
    Json(req): Json<RescheduleBookingRequest>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    req.validate().map_err(validation_error)?;

    let booking = state
        .admission
        .reschedule_booking(booking_id, &req.station_id, req.date, req.hour)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(BookingDto::from_domain(booking))))
}

/// Отмена брони
///
/// Отменить бронь может только её владелец, пока она в статусе
/// `Pending` или `Approved`. Слот освобождается немедленно.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/cancel",
    tag = "Bookings",
    params(
        ("booking_id" = Uuid, Path, description = "Уникальный ID брони")
    ),
    request_body = CancelBookingRequest,
    responses(
        (status = 200, description = "Бронь отменена", body = ApiResponse<BookingDto>),
        (status = 403, description = "Отменяющий не является владельцем"),
        (status = 404, description = "Бронь не найдена"),
        (status = 409, description = "Бронь уже завершена или отменена")
    )
)]
pub async fn cancel_booking(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<Uuid>,
    Json(req): Json<CancelBookingRequest>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    req.validate().map_err(validation_error)?;

    let booking = state
        .admission
        .cancel_booking(booking_id, &req.requester_id)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(BookingDto::from_domain(booking))))
}

/// Подтверждение брони оператором
///
/// Переводит бронь `Pending → Approved` и прикрепляет QR-токен доступа.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/approve",
    tag = "Bookings",
    params(
        ("booking_id" = Uuid, Path, description = "Уникальный ID брони")
    ),
    responses(
        (status = 200, description = "Бронь подтверждена, токен прикреплён", body = ApiResponse<BookingDto>),
        (status = 404, description = "Бронь не найдена"),
        (status = 409, description = "Бронь не в статусе Pending")
    )
)]
pub async fn approve_booking(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let booking = state
        .admission
        .approve_booking(booking_id)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(BookingDto::from_domain(booking))))
}

/// Завершение брони
///
/// Переводит бронь `Approved → Completed` после состоявшейся зарядки.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/complete",
    tag = "Bookings",
    params(
        ("booking_id" = Uuid, Path, description = "Уникальный ID брони")
    ),
    responses(
        (status = 200, description = "Бронь завершена", body = ApiResponse<BookingDto>),
        (status = 404, description = "Бронь не найдена"),
        (status = 409, description = "Бронь не в статусе Approved")
    )
)]
pub async fn complete_booking(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let booking = state
        .admission
        .complete_booking(booking_id)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(BookingDto::from_domain(booking))))
}
