//! Booking entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub owner_id: String,
    pub station_id: String,

    /// Reserved calendar day (UTC)
    pub reservation_date: Date,

    /// Reserved hour 0..=23
    pub hour: i32,

    /// Booking status: Pending, Approved, Cancelled, Completed
    pub status: String,

    pub created_at: DateTimeUtc,

    /// QR access token, set once approved
    #[sea_orm(nullable)]
    pub access_token: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::station::Entity",
        from = "Column::StationId",
        to = "super::station::Column::Id"
    )]
    Station,
}

impl Related<super::station::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Station.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
