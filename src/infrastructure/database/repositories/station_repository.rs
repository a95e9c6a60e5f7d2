//! SeaORM implementation of StationRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::domain::station::{ChargerType, Station, StationRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::station;

use super::db_err;

pub struct SeaOrmStationRepository {
    db: DatabaseConnection,
}

impl SeaOrmStationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: station::Model) -> Station {
    Station {
        id: m.id,
        name: m.name,
        location: m.location,
        latitude: m.latitude,
        longitude: m.longitude,
        charger_type: ChargerType::from_str(&m.charger_type).unwrap_or(ChargerType::Ac),
        capacity: m.capacity.max(1) as u32,
        active: m.active,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn domain_to_active(s: Station) -> station::ActiveModel {
    station::ActiveModel {
        id: Set(s.id),
        name: Set(s.name),
        location: Set(s.location),
        latitude: Set(s.latitude),
        longitude: Set(s.longitude),
        charger_type: Set(s.charger_type.as_str().to_string()),
        capacity: Set(s.capacity as i32),
        active: Set(s.active),
        created_at: Set(s.created_at),
        updated_at: Set(s.updated_at),
    }
}

// ── StationRepository impl ──────────────────────────────────────

#[async_trait]
impl StationRepository for SeaOrmStationRepository {
    async fn save(&self, s: Station) -> DomainResult<()> {
        debug!("Saving station: {}", s.id);

        let existing = station::Entity::find_by_id(s.id.as_str())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_some() {
            return Err(DomainError::Conflict(format!(
                "Station {} already exists",
                s.id
            )));
        }

        domain_to_active(s).insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn update(&self, s: Station) -> DomainResult<()> {
        debug!("Updating station: {}", s.id);

        let existing = station::Entity::find_by_id(s.id.as_str())
            .one(&self.db)
            .await
            .map_err(db_err)?;

        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "Station",
                field: "id",
                value: s.id,
            });
        }

        domain_to_active(s).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Station>> {
        let model = station::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Station>> {
        let models = station::Entity::find()
            .order_by_asc(station::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
