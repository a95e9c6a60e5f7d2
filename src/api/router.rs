//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    extract::FromRef,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::dto::*;
use crate::api::handlers::{bookings, health, stations};
use crate::application::{AdmissionService, AvailabilityService};
use crate::domain::{Clock, RepositoryProvider};

/// Unified state for all booking-platform routes.
/// Axum extracts the specific handler state via `FromRef`.
#[derive(Clone)]
pub struct BookingUnifiedState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub availability: Arc<AvailabilityService>,
    pub admission: Arc<AdmissionService>,
    pub clock: Arc<dyn Clock>,
}

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<BookingUnifiedState> for stations::StationAppState {
    fn from_ref(s: &BookingUnifiedState) -> Self {
        stations::StationAppState {
            repos: Arc::clone(&s.repos),
            availability: Arc::clone(&s.availability),
            clock: Arc::clone(&s.clock),
        }
    }
}

impl FromRef<BookingUnifiedState> for bookings::BookingAppState {
    fn from_ref(s: &BookingUnifiedState) -> Self {
        bookings::BookingAppState {
            admission: Arc::clone(&s.admission),
            repos: Arc::clone(&s.repos),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Stations
        stations::list_stations,
        stations::get_station,
        stations::create_station,
        stations::update_station,
        stations::deactivate_station,
        stations::get_station_availability,
        // Bookings
        bookings::create_booking,
        bookings::get_booking,
        bookings::list_bookings,
        bookings::reschedule_booking,
        bookings::cancel_booking,
        bookings::approve_booking,
        bookings::complete_booking,
    ),
    components(schemas(
        health::HealthResponse,
        StationDto,
        CreateStationRequest,
        UpdateStationRequest,
        BookingDto,
        CreateBookingRequest,
        RescheduleBookingRequest,
        CancelBookingRequest,
        DayAvailabilityDto,
        HourAvailabilityDto,
        EmptyData,
    )),
    tags(
        (name = "Health", description = "Мониторинг состояния сервиса"),
        (name = "Stations", description = "Управление станциями и доступность слотов"),
        (name = "Bookings", description = "Создание, перенос и жизненный цикл броней")
    ),
    info(
        title = "Texnouz Booking API",
        description = "REST API сервиса бронирования зарядных слотов"
    )
)]
struct ApiDoc;

/// Build the full API router with Swagger UI, CORS and request tracing.
pub fn create_api_router(state: BookingUnifiedState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health::health_check))
        .route(
            "/api/v1/stations",
            get(stations::list_stations).post(stations::create_station),
        )
        .route(
            "/api/v1/stations/{station_id}",
            get(stations::get_station).put(stations::update_station),
        )
        .route(
            "/api/v1/stations/{station_id}/deactivate",
            post(stations::deactivate_station),
        )
        .route(
            "/api/v1/stations/{station_id}/availability",
            get(stations::get_station_availability),
        )
        .route(
            "/api/v1/bookings",
            post(bookings::create_booking).get(bookings::list_bookings),
        )
        .route("/api/v1/bookings/{booking_id}", get(bookings::get_booking))
        .route(
            "/api/v1/bookings/{booking_id}/reschedule",
            put(bookings::reschedule_booking),
        )
        .route(
            "/api/v1/bookings/{booking_id}/cancel",
            post(bookings::cancel_booking),
        )
        .route(
            "/api/v1/bookings/{booking_id}/approve",
            post(bookings::approve_booking),
        )
        .route(
            "/api/v1/bookings/{booking_id}/complete",
            post(bookings::complete_booking),
        )
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
