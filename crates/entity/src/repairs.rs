//! Repairs Entity
//!
//! One repair unit at a specific building location. The location is the
//! (project, elevation, drop, level) tuple; `repair_index` disambiguates
//! multiple repairs of the same type at the same location. Repairs are never
//! hard-deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::phases::RepairPhases;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "repairs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:                   String,
    pub project_id:           String,
    pub project_name:         String,
    pub elevation_name:       String,
    pub drop:                 i32,
    pub level:                i32,
    pub repair_index:         i32,
    pub status:               RepairStatus,
    #[sea_orm(column_type = "Json")]
    pub phases:               RepairPhases,
    pub created_by_user_id:   String,
    pub created_by_user_name: String,
    pub created_at:           chrono::DateTime<chrono::Utc>,
    pub updated_at:           chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Project,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedByUserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Creator,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef { Relation::Project.def() }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::Creator.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Repair review status enumeration
///
/// Set to `pending` at creation; mutated only by manager/admin review.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum RepairStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl std::fmt::Display for RepairStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepairStatus::Pending => write!(f, "pending"),
            RepairStatus::Approved => write!(f, "approved"),
            RepairStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl RepairStatus {
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(RepairStatus::Pending),
            "approved" => Some(RepairStatus::Approved),
            "rejected" => Some(RepairStatus::Rejected),
            _ => None,
        }
    }
}
