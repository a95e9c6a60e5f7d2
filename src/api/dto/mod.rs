//! API DTOs

pub mod availability;
pub mod booking;
pub mod common;
pub mod station;

pub use availability::{AvailabilityQuery, DayAvailabilityDto, HourAvailabilityDto};
pub use booking::{
    BookingDto, BookingFilter, CancelBookingRequest, CreateBookingRequest,
    RescheduleBookingRequest,
};
pub use common::{ApiResponse, EmptyData, PaginatedResponse, PaginationQuery};
pub use station::{CreateStationRequest, StationDto, StationFilter, UpdateStationRequest};
