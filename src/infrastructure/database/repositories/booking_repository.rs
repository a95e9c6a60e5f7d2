//! SeaORM implementation of BookingRepository
//!
//! Occupancy queries exclude `Cancelled` rows at the SQL level; nothing
//! is pre-aggregated.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::booking::{Booking, BookingRepository, BookingStatus};
use crate::domain::slot::{last_fully_ended_hour, ReservationHour};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::booking;

use super::db_err;

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: booking::Model) -> Booking {
    Booking {
        id: m.id,
        owner_id: m.owner_id,
        station_id: m.station_id,
        date: m.reservation_date,
        hour: m.hour.clamp(0, 23) as u8,
        status: BookingStatus::from_str(&m.status),
        created_at: m.created_at,
        access_token: m.access_token,
    }
}

fn domain_to_active(b: Booking) -> booking::ActiveModel {
    booking::ActiveModel {
        id: Set(b.id),
        owner_id: Set(b.owner_id),
        station_id: Set(b.station_id),
        reservation_date: Set(b.date),
        hour: Set(b.hour as i32),
        status: Set(b.status.as_str().to_string()),
        created_at: Set(b.created_at),
        access_token: Set(b.access_token),
    }
}

fn insert_err(e: sea_orm::DbErr) -> DomainError {
    // A uniqueness/serialization failure means we lost a race that the
    // pre-check did not see; surface it as a retryable-by-user conflict.
    let message = e.to_string();
    if matches!(e, sea_orm::DbErr::RecordNotInserted) || message.contains("UNIQUE constraint") {
        DomainError::Conflict(format!("Booking insert conflicted: {}", message))
    } else {
        db_err(e)
    }
}

/// Filter matching rows that hold their slot (status ≠ Cancelled).
fn occupying() -> Condition {
    Condition::all().add(booking::Column::Status.ne(BookingStatus::Cancelled.as_str()))
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn insert(&self, b: Booking) -> DomainResult<()> {
        debug!("Inserting booking: {}", b.id);

        domain_to_active(b).insert(&self.db).await.map_err(insert_err)?;
        Ok(())
    }

    async fn replace(&self, b: Booking) -> DomainResult<()> {
        debug!("Replacing booking: {}", b.id);

        let existing = booking::Entity::find_by_id(b.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "Booking",
                field: "id",
                value: b.id.to_string(),
            });
        }

        domain_to_active(b).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_occupying_in_window(
        &self,
        station_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::StationId.eq(station_id))
            .filter(occupying())
            .filter(booking::Column::ReservationDate.gte(start.date_naive()))
            .filter(booking::Column::ReservationDate.lt(end.date_naive()))
            .order_by_asc(booking::Column::Hour)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn count_occupying_slot(
        &self,
        station_id: &str,
        date: NaiveDate,
        hour: u8,
    ) -> DomainResult<u64> {
        let hour = ReservationHour::new(hour)?;
        booking::Entity::find()
            .filter(booking::Column::StationId.eq(station_id))
            .filter(booking::Column::ReservationDate.eq(date))
            .filter(booking::Column::Hour.eq(hour.value() as i32))
            .filter(occupying())
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn find_pending_ended_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>> {
        let cutoff_date = cutoff.date_naive();

        let mut ended = Condition::any()
            .add(booking::Column::ReservationDate.lt(cutoff_date));
        if let Some(last_hour) = last_fully_ended_hour(cutoff) {
            ended = ended.add(
                Condition::all()
                    .add(booking::Column::ReservationDate.eq(cutoff_date))
                    .add(booking::Column::Hour.lte(last_hour as i32)),
            );
        }

        let models = booking::Entity::find()
            .filter(booking::Column::Status.eq(BookingStatus::Pending.as_str()))
            .filter(ended)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_all(&self) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .order_by_desc(booking::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
