pub mod model;
pub mod repository;

pub use model::{ChargerType, Station};
pub use repository::StationRepository;
