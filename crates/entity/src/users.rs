//! Users Entity
//!
//! Represents system users with their role and profile information.
//! The external identity provider's uid is stored in `auth_uid`; all internal
//! references use `id`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:         String,
    #[sea_orm(unique)]
    pub auth_uid:   String,
    #[sea_orm(unique)]
    pub email:      String,
    pub full_name:  String,
    pub avatar_url: Option<String>,
    pub role:       UserRole,
    pub status:     UserStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::projects::Entity")]
    ClientProjects,
    #[sea_orm(has_many = "super::repairs::Entity")]
    CreatedRepairs,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef { Relation::ClientProjects.def() }
}

impl Related<super::repairs::Entity> for Entity {
    fn to() -> RelationDef { Relation::CreatedRepairs.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// User role enumeration
///
/// Roles are assigned at creation and drive the permission matrix and the
/// project-scoped visibility rules for repairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full access, including user management
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Creates projects and reviews repairs
    #[sea_orm(string_value = "manager")]
    Manager,
    /// Logs repairs on assigned projects
    #[sea_orm(string_value = "technician")]
    Technician,
    /// Read access to their own projects' repairs
    #[sea_orm(string_value = "client")]
    Client,
    /// No access until a role is assigned
    #[sea_orm(string_value = "guest")]
    Guest,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Manager => write!(f, "manager"),
            UserRole::Technician => write!(f, "technician"),
            UserRole::Client => write!(f, "client"),
            UserRole::Guest => write!(f, "guest"),
        }
    }
}

impl UserRole {
    /// Parse a role from its wire representation.
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(UserRole::Admin),
            "manager" => Some(UserRole::Manager),
            "technician" => Some(UserRole::Technician),
            "client" => Some(UserRole::Client),
            "guest" => Some(UserRole::Guest),
            _ => None,
        }
    }
}

/// User account status enumeration
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Account is active and can be used
    #[sea_orm(string_value = "active")]
    Active,
    /// Account is inactive (disabled)
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Inactive => write!(f, "inactive"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [
            UserRole::Admin,
            UserRole::Manager,
            UserRole::Technician,
            UserRole::Client,
            UserRole::Guest,
        ] {
            assert_eq!(UserRole::from_string(&role.to_string()), Some(role));
        }
    }

    #[test]
    fn test_role_unknown() {
        assert_eq!(UserRole::from_string("superuser"), None);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(UserStatus::Active.to_string(), "active");
        assert_eq!(UserStatus::Inactive.to_string(), "inactive");
    }
}
