//! # Project Data Transfer Objects
//!
//! Request and response types for project configuration endpoints. The
//! catalog bounds live here: 1-6 elevations per project, 3-10 phases and a
//! positive price per repair type.

use entity::projects::{MAX_ELEVATIONS, MAX_PHASES, MIN_PHASES};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::dto::users::PaginationInfo;

/// One elevation definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElevationInput {
    pub name:   String,
    pub drops:  i32,
    pub levels: i32,
}

/// One repair-type catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairTypeInput {
    /// Catalog id; generated when omitted
    #[serde(default)]
    pub repair_type_id: Option<String>,
    pub repair_type:    String,
    pub phases:         u8,
    pub price:          i64,
    pub unit_to_charge: String,
}

/// One technician assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicianInput {
    pub technician_id:     String,
    pub technician_name:   String,
    #[serde(default)]
    pub technician_avatar: Option<String>,
}

/// Request to create a project
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project name
    #[validate(length(min = 1, max = 255, message = "Project name must be between 1 and 255 characters"))]
    pub name:         String,
    /// Client display name
    #[validate(length(min = 1, max = 255, message = "Client name must be between 1 and 255 characters"))]
    pub client_name:  String,
    /// Internal user id of the client
    #[validate(length(min = 1, message = "client_id is required"))]
    pub client_id:    String,
    /// Elevations (1-6)
    #[validate(custom(function = "validate_elevations"))]
    pub elevations:   Vec<ElevationInput>,
    /// Repair-type catalog
    #[validate(custom(function = "validate_repair_types"))]
    pub repair_types: Vec<RepairTypeInput>,
    /// Assigned technicians
    #[serde(default)]
    pub technicians:  Vec<TechnicianInput>,
}

/// Request to update a project
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    /// New project name
    #[validate(length(min = 1, max = 255, message = "Project name must be between 1 and 255 characters"))]
    pub name:         Option<String>,
    /// New status (pending, in-progress, completed)
    pub status:       Option<String>,
    /// Replacement elevation list (1-6)
    #[validate(custom(function = "validate_elevations_opt"))]
    pub elevations:   Option<Vec<ElevationInput>>,
    /// Replacement repair-type catalog
    #[validate(custom(function = "validate_repair_types_opt"))]
    pub repair_types: Option<Vec<RepairTypeInput>>,
    /// Replacement technician roster
    pub technicians:  Option<Vec<TechnicianInput>>,
}

fn validation_error(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Validate the elevation list bounds.
fn validate_elevations(elevations: &Vec<ElevationInput>) -> Result<(), ValidationError> {
    if elevations.is_empty() || elevations.len() > MAX_ELEVATIONS {
        return Err(validation_error(
            "elevations",
            format!("Projects must have between 1 and {} elevations", MAX_ELEVATIONS),
        ));
    }
    for elevation in elevations {
        if elevation.name.trim().is_empty() {
            return Err(validation_error(
                "elevations",
                "Elevation names must not be empty".to_string(),
            ));
        }
        if elevation.drops < 1 || elevation.levels < 1 {
            return Err(validation_error(
                "elevations",
                "Elevation drops and levels must be at least 1".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_elevations_opt(elevations: &Vec<ElevationInput>) -> Result<(), ValidationError> {
    validate_elevations(elevations)
}

/// Validate the repair-type catalog bounds.
fn validate_repair_types(repair_types: &Vec<RepairTypeInput>) -> Result<(), ValidationError> {
    for rt in repair_types {
        if rt.repair_type.trim().is_empty() {
            return Err(validation_error(
                "repair_types",
                "Repair type names must not be empty".to_string(),
            ));
        }
        if !(MIN_PHASES ..= MAX_PHASES).contains(&rt.phases) {
            return Err(validation_error(
                "repair_types",
                format!("Phases must be between {} and {}", MIN_PHASES, MAX_PHASES),
            ));
        }
        if rt.price <= 0 {
            return Err(validation_error(
                "repair_types",
                "Price must be greater than zero".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_repair_types_opt(repair_types: &Vec<RepairTypeInput>) -> Result<(), ValidationError> {
    validate_repair_types(repair_types)
}

/// Response for a single project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectResponse {
    pub id:           String,
    pub name:         String,
    pub client_name:  String,
    pub client_id:    String,
    pub status:       String,
    pub elevations:   Vec<ElevationInput>,
    pub repair_types: Vec<RepairTypeInput>,
    pub technicians:  Vec<TechnicianInput>,
    pub created_at:   String,
    pub updated_at:   String,
}

/// Response for project list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectListResponse {
    /// Whether the operation was successful
    pub success:    bool,
    /// List of projects
    pub projects:   Vec<ProjectResponse>,
    /// Pagination info
    pub pagination: PaginationInfo,
}

/// Query parameters for project list
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectListQuery {
    /// Page number (1-based, default: 1)
    pub page:     Option<u64>,
    /// Items per page (default: 20, max: 100)
    pub per_page: Option<u64>,
    /// Search term for project/client name
    pub search:   Option<String>,
    /// Filter by status
    pub status:   Option<String>,
}

impl ProjectListQuery {
    pub fn page(&self) -> u64 { self.page.unwrap_or(1).max(1) }

    pub fn per_page(&self) -> u64 { self.per_page.unwrap_or(20).clamp(1, 100) }
}
