//! # Repair Data Transfer Objects
//!
//! Request and response types for the repair lifecycle endpoints. The
//! response projection is the whitelist of display fields; raw rows never
//! leave the handlers.

use std::collections::BTreeMap;

use entity::phases::RepairPhases;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    dto::users::PaginationInfo,
    repair_query::{RepairQuery, SortBy, SortOrder},
};

/// Request to create a repair: the survey submission for a new location+type
/// group member.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateRepairRequest {
    /// Owning project id
    #[validate(length(min = 1, message = "project_id is required"))]
    pub project_id:     String,
    /// Elevation name within the project
    #[validate(length(min = 1, message = "elevation_name is required"))]
    pub elevation_name: String,
    /// Drop coordinate (1-based)
    #[validate(range(min = 1, message = "drop must be at least 1"))]
    pub drop:           i32,
    /// Level coordinate (1-based)
    #[validate(range(min = 1, message = "level must be at least 1"))]
    pub level:          i32,
    /// Repair type from the project catalog
    #[validate(length(min = 1, message = "repair_type is required"))]
    pub repair_type:    String,
    /// Expected repair index; checked against the computed next index when
    /// present
    pub repair_index:   Option<i32>,
    /// Survey measurements
    #[serde(default)]
    pub measurements:   BTreeMap<String, String>,
    /// Survey comments
    #[serde(default)]
    pub comments:       String,
    /// Survey photo URLs
    #[serde(default)]
    pub photos:         Vec<String>,
}

/// Request to submit a progress or finish phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct PhaseSubmissionRequest {
    /// Measurements for this step
    #[serde(default)]
    pub measurements: BTreeMap<String, String>,
    /// Comments for this step
    #[serde(default)]
    pub comments:     String,
    /// Photo URLs for this step
    #[serde(default)]
    pub photos:       Vec<String>,
}

/// Request to review a repair (manager/admin only).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct ReviewRepairRequest {
    /// New status: approved or rejected
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
}

/// The display projection of a repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairResponse {
    pub id:                   String,
    pub project_id:           String,
    pub project_name:         String,
    pub elevation_name:       String,
    pub drop:                 i32,
    pub level:                i32,
    pub repair_index:         i32,
    pub status:               String,
    pub phases:               RepairPhases,
    pub created_by_user_id:   String,
    pub created_by_user_name: String,
    pub created_at:           String,
    pub updated_at:           String,
}

impl From<entity::repairs::Model> for RepairResponse {
    fn from(model: entity::repairs::Model) -> Self {
        Self {
            id:                   model.id,
            project_id:           model.project_id,
            project_name:         model.project_name,
            elevation_name:       model.elevation_name,
            drop:                 model.drop,
            level:                model.level,
            repair_index:         model.repair_index,
            status:               model.status.to_string(),
            phases:               model.phases,
            created_by_user_id:   model.created_by_user_id,
            created_by_user_name: model.created_by_user_name,
            created_at:           model.created_at.to_rfc3339(),
            updated_at:           model.updated_at.to_rfc3339(),
        }
    }
}

/// Response for repair list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairListResponse {
    /// Whether the operation was successful
    pub success:    bool,
    /// List of repairs
    pub repairs:    Vec<RepairResponse>,
    /// Pagination info
    pub pagination: PaginationInfo,
}

/// Query parameters for repair list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepairListQuery {
    /// Page number (1-based, default: 1)
    pub page:           Option<u64>,
    /// Items per page (default: 20, max: 100)
    pub per_page:       Option<u64>,
    /// Filter by project
    pub project_id:     Option<String>,
    /// Filter by review status (pending, approved, rejected)
    pub status:         Option<String>,
    /// Filter by elevation name (pattern match)
    pub elevation_name: Option<String>,
    /// Filter by drop coordinate
    pub drop:           Option<i32>,
    /// Filter by level coordinate
    pub level:          Option<i32>,
    /// Comma-separated repair types (matched against survey and progress
    /// phases)
    pub repair_types:   Option<String>,
    /// Filter by technician attribution in any phase
    pub technician_id:  Option<String>,
    /// Sort key (created_at, updated_at, id, status, project)
    pub sort_by:        Option<String>,
    /// Sort direction (asc, desc)
    pub sort_order:     Option<String>,
}

impl RepairListQuery {
    pub fn page(&self) -> u64 { self.page.unwrap_or(1).max(1) }

    pub fn per_page(&self) -> u64 { self.per_page.unwrap_or(20).clamp(1, 100) }

    /// Parse into the engine's query input.
    ///
    /// Unknown status values are rejected rather than silently ignored.
    pub fn into_query(self) -> Result<RepairQuery, error::AppError> {
        let status = match &self.status {
            None => None,
            Some(s) => {
                Some(
                    entity::repairs::RepairStatus::from_string(s)
                        .ok_or_else(|| error::AppError::validation(format!("Unknown status '{}'", s)))?,
                )
            },
        };

        let repair_types = self
            .repair_types
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(RepairQuery {
            project_id: self.project_id.clone(),
            status,
            elevation_name: self.elevation_name.clone(),
            drop: self.drop,
            level: self.level,
            repair_types,
            technician_id: self.technician_id.clone(),
            page: self.page(),
            per_page: self.per_page(),
            sort_by: self.sort_by.as_deref().map(SortBy::from_string).unwrap_or_default(),
            sort_order: self
                .sort_order
                .as_deref()
                .map(SortOrder::from_string)
                .unwrap_or_default(),
        })
    }
}

/// Query parameters for the next-index lookup
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NextIndexQuery {
    #[validate(length(min = 1, message = "project_id is required"))]
    pub project_id:     String,
    #[validate(length(min = 1, message = "elevation_name is required"))]
    pub elevation_name: String,
    #[validate(range(min = 1, message = "drop must be at least 1"))]
    pub drop:           i32,
    #[validate(range(min = 1, message = "level must be at least 1"))]
    pub level:          i32,
    #[validate(length(min = 1, message = "repair_type is required"))]
    pub repair_type:    String,
}

/// Response for the next-index lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextIndexResponse {
    /// Whether the operation was successful
    pub success:           bool,
    /// The next free repair index at this location+type
    pub next_repair_index: i32,
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[test]
    fn test_create_repair_request_validation() {
        let valid = CreateRepairRequest {
            project_id:     "prj_1".to_string(),
            elevation_name: "North".to_string(),
            drop:           3,
            level:          2,
            repair_type:    "Crack".to_string(),
            repair_index:   None,
            measurements:   BTreeMap::new(),
            comments:       String::new(),
            photos:         vec![],
        };
        assert!(valid.validate().is_ok());

        let zero_drop = CreateRepairRequest {
            drop: 0,
            ..valid.clone()
        };
        assert!(zero_drop.validate().is_err());

        let no_type = CreateRepairRequest {
            repair_type: String::new(),
            ..valid
        };
        assert!(no_type.validate().is_err());
    }

    #[test]
    fn test_list_query_defaults() {
        let query = RepairListQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 20);

        let parsed = query.into_query().unwrap();
        assert!(parsed.repair_types.is_empty());
        assert!(!parsed.needs_in_memory_path());
    }

    #[test]
    fn test_list_query_parses_repair_types_csv() {
        let query = RepairListQuery {
            repair_types: Some("Crack, Spalling ,".to_string()),
            ..Default::default()
        };
        let parsed = query.into_query().unwrap();
        assert_eq!(parsed.repair_types, vec!["Crack", "Spalling"]);
        assert!(parsed.needs_in_memory_path());
    }

    #[test]
    fn test_list_query_rejects_unknown_status() {
        let query = RepairListQuery {
            status: Some("archived".to_string()),
            ..Default::default()
        };
        assert!(query.into_query().is_err());
    }

    #[test]
    fn test_list_query_parses_status_and_sort() {
        let query = RepairListQuery {
            status: Some("pending".to_string()),
            sort_by: Some("updated_at".to_string()),
            sort_order: Some("asc".to_string()),
            ..Default::default()
        };
        let parsed = query.into_query().unwrap();
        assert_eq!(parsed.status, Some(entity::repairs::RepairStatus::Pending));
        assert_eq!(parsed.sort_by, crate::repair_query::SortBy::UpdatedAt);
        assert_eq!(parsed.sort_order, crate::repair_query::SortOrder::Asc);
    }

    #[test]
    fn test_repair_response_projection() {
        let model = entity::repairs::Model {
            id:                   "rep_1".to_string(),
            project_id:           "prj_1".to_string(),
            project_name:         "Harbor Tower".to_string(),
            elevation_name:       "North".to_string(),
            drop:                 3,
            level:                2,
            repair_index:         1,
            status:               entity::repairs::RepairStatus::Pending,
            phases:               RepairPhases::sized(4),
            created_by_user_id:   "usr_t1".to_string(),
            created_by_user_name: "Tess Ops".to_string(),
            created_at:           chrono::Utc::now(),
            updated_at:           chrono::Utc::now(),
        };

        let response: RepairResponse = model.into();
        assert_eq!(response.status, "pending");
        assert_eq!(response.phases.progress.len(), 2);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["repair_index"], 1);
        assert!(json.get("phases").is_some());
    }
}
