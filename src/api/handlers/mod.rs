//! API Handlers

pub mod bookings;
pub mod health;
pub mod stations;

pub use bookings::BookingAppState;
pub use health::*;
pub use stations::StationAppState;

use axum::http::StatusCode;
use axum::Json;

use crate::api::dto::ApiResponse;
use crate::domain::DomainError;

fn status_for(e: &DomainError) -> StatusCode {
    match e {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::InvalidState(_)
        | DomainError::CapacityExceeded { .. }
        | DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Map a domain failure onto the HTTP envelope. The `code` field keeps
/// capacity and state failures distinguishable even though both render
/// as 409.
pub(crate) fn domain_error(e: DomainError) -> (StatusCode, Json<ApiResponse<()>>) {
    (
        status_for(&e),
        Json(ApiResponse::error_with_code(e.to_string(), e.code())),
    )
}

pub(crate) fn validation_error(
    e: validator::ValidationErrors,
) -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::error_with_code(
            format!("Validation failed: {}", e),
            "invalid_argument",
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn capacity_and_state_map_to_conflict_with_distinct_codes() {
        let (status, body) = domain_error(DomainError::CapacityExceeded {
            station_id: "ST-001".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            hour: 10,
        });
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.0.code.as_deref(), Some("capacity_exceeded"));

        let (status, body) = domain_error(DomainError::InvalidState("nope".into()));
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.0.code.as_deref(), Some("invalid_state"));
    }

    #[test]
    fn transient_maps_to_service_unavailable() {
        let (status, _) = domain_error(DomainError::Transient("pool exhausted".into()));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
