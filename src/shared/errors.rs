use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Station {station_id} is fully booked on {date} at {hour:02}:00")]
    CapacityExceeded {
        station_id: String,
        date: NaiveDate,
        hour: u8,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Transient store failure: {0}")]
    Transient(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Whether the operation may succeed if retried as-is.
    /// Only store timeouts/unavailability qualify; everything else
    /// needs the caller to fix its input or the entity state.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Transient(_))
    }

    /// Stable machine-readable code carried in API error envelopes,
    /// so clients can render "slot is full" and "booking cannot be
    /// modified" as distinct situations.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::NotFound { .. } => "not_found",
            DomainError::Validation(_) => "invalid_argument",
            DomainError::InvalidState(_) => "invalid_state",
            DomainError::CapacityExceeded { .. } => "capacity_exceeded",
            DomainError::Conflict(_) => "conflict",
            DomainError::Forbidden(_) => "forbidden",
            DomainError::Transient(_) => "transient",
            DomainError::Storage(_) => "storage",
        }
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}
