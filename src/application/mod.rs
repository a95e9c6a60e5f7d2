pub mod booking;

pub use booking::services::{
    AdmissionService, AvailabilityService, DayAvailability, HourAvailability, SlotLockRegistry,
};
