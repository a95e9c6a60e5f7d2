//! SeaORM entity definitions

pub mod booking;
pub mod station;
