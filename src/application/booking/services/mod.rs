pub mod admission;
pub mod availability;
pub mod expiry;
pub mod slot_lock;

pub use admission::AdmissionService;
pub use availability::{AvailabilityService, DayAvailability, HourAvailability};
pub use expiry::start_stale_booking_sweep;
pub use slot_lock::SlotLockRegistry;
