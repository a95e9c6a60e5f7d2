//! Station repository trait

use async_trait::async_trait;

use super::super::repositories::DomainResult;
use super::model::Station;

/// Persistence operations for stations.
///
/// The booking core only reads stations; writes come from the
/// station-management API surface.
#[async_trait]
pub trait StationRepository: Send + Sync {
    async fn save(&self, station: Station) -> DomainResult<()>;

    async fn update(&self, station: Station) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Station>>;

    async fn find_all(&self) -> DomainResult<Vec<Station>>;
}
