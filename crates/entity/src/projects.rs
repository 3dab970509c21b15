//! Projects Entity
//!
//! A client engagement: the building's elevations (drop/level grids), the
//! repair-type catalog, and the assigned technician roster. The repair
//! lifecycle and the filter engine validate against this configuration but
//! never mutate it.

use sea_orm::{entity::prelude::*, FromJsonQueryResult};
use serde::{Deserialize, Serialize};

/// Projects carry between 1 and 6 elevations.
pub const MAX_ELEVATIONS: usize = 6;

/// Catalog phase-count bounds (survey + progress steps + finish).
pub const MIN_PHASES: u8 = 3;
pub const MAX_PHASES: u8 = 10;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:                 String,
    pub name:               String,
    pub client_name:        String,
    pub client_id:          String,
    pub status:             ProjectStatus,
    #[sea_orm(column_type = "Json")]
    pub elevations:         ElevationList,
    #[sea_orm(column_type = "Json")]
    pub repair_types:       RepairTypeList,
    #[sea_orm(column_type = "Json")]
    pub technicians:        TechnicianList,
    pub created_by_user_id: String,
    pub created_at:         chrono::DateTime<chrono::Utc>,
    pub updated_at:         chrono::DateTime<chrono::Utc>,
    pub deleted_at:         Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ClientId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Client,
    #[sea_orm(has_many = "super::repairs::Entity")]
    Repairs,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::Client.def() }
}

impl Related<super::repairs::Entity> for Entity {
    fn to() -> RelationDef { Relation::Repairs.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Project status enumeration
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "in-progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStatus::Pending => write!(f, "pending"),
            ProjectStatus::InProgress => write!(f, "in-progress"),
            ProjectStatus::Completed => write!(f, "completed"),
        }
    }
}

impl ProjectStatus {
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ProjectStatus::Pending),
            "in-progress" => Some(ProjectStatus::InProgress),
            "completed" => Some(ProjectStatus::Completed),
            _ => None,
        }
    }
}

/// One named face of the building with its drop/level grid bounds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elevation {
    pub name:   String,
    /// Number of vertical drops on this elevation (>= 1).
    pub drops:  i32,
    /// Number of levels on this elevation (>= 1).
    pub levels: i32,
}

/// One entry of the repair-type catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairTypeSpec {
    pub repair_type_id: String,
    pub repair_type:    String,
    /// Total phase count: survey + (phases - 2) progress steps + finish.
    pub phases:         u8,
    /// Price in minor currency units, > 0.
    pub price:          i64,
    pub unit_to_charge: String,
}

/// One assigned technician.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicianRef {
    pub technician_id:     String,
    pub technician_name:   String,
    #[serde(default)]
    pub technician_avatar: Option<String>,
}

/// JSON column wrapper for the elevation list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ElevationList(pub Vec<Elevation>);

/// JSON column wrapper for the repair-type catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct RepairTypeList(pub Vec<RepairTypeSpec>);

/// JSON column wrapper for the technician roster.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct TechnicianList(pub Vec<TechnicianRef>);

/// Valid coordinate bounds for one elevation.
///
/// Drops and levels are 1-based; an unknown elevation yields no bounds and
/// no repair may be logged against it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElevationBounds {
    pub min_drop:  i32,
    pub max_drop:  i32,
    pub min_level: i32,
    pub max_level: i32,
}

impl ElevationBounds {
    /// Whether a (drop, level) coordinate falls inside these bounds.
    #[must_use]
    pub fn contains(&self, drop: i32, level: i32) -> bool {
        (self.min_drop ..= self.max_drop).contains(&drop) && (self.min_level ..= self.max_level).contains(&level)
    }
}

impl Model {
    /// Look up the named elevation's coordinate bounds.
    #[must_use]
    pub fn elevation_bounds(&self, elevation_name: &str) -> Option<ElevationBounds> {
        self.elevations
            .0
            .iter()
            .find(|e| e.name == elevation_name)
            .map(|e| {
                ElevationBounds {
                    min_drop:  1,
                    max_drop:  e.drops,
                    min_level: 1,
                    max_level: e.levels,
                }
            })
    }

    /// Look up the total phase count for a repair type.
    ///
    /// An unknown repair type has no phase count and no progress steps can be
    /// rendered or submitted for it.
    #[must_use]
    pub fn phase_count(&self, repair_type: &str) -> Option<u8> {
        self.repair_types
            .0
            .iter()
            .find(|rt| rt.repair_type == repair_type)
            .map(|rt| rt.phases)
    }

    /// Technicians assigned to this project.
    #[must_use]
    pub fn assigned_technicians(&self) -> &[TechnicianRef] { &self.technicians.0 }

    /// Whether the given technician is assigned to this project.
    #[must_use]
    pub fn has_technician(&self, technician_id: &str) -> bool {
        self.technicians
            .0
            .iter()
            .any(|t| t.technician_id == technician_id)
    }
}
