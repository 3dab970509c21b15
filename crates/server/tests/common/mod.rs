//! # Common Test Utilities
//!
//! Shared fixtures for server integration tests: tracing init, project and
//! repair builders, and authenticated-caller builders.

use std::{collections::BTreeMap, sync::Once};

use chrono::Utc;
use entity::{
    phases::{RepairPhases, SurveyPhase},
    projects::{Elevation, ElevationList, ProjectStatus, RepairTypeList, RepairTypeSpec, TechnicianList, TechnicianRef},
    repairs::RepairStatus,
    users::UserRole,
};
use server::middleware::auth::AuthenticatedUser;

/// Initialize test logging (run once per test session)
static INIT: Once = Once::new();

/// Initialize test environment including structured logging
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// An authenticated caller with the given role.
pub fn caller(id: &str, role: UserRole) -> AuthenticatedUser {
    AuthenticatedUser {
        id:        id.to_string(),
        auth_uid:  format!("ext-{}", id),
        email:     format!("{}@example.com", id),
        full_name: "Test Caller".to_string(),
        role,
    }
}

/// A project with one elevation ("North", 10 drops, 5 levels), a 4-phase
/// "Crack" repair type and one assigned technician.
pub fn project_fixture(id: &str, client_id: &str, technician_id: &str) -> entity::projects::Model {
    entity::projects::Model {
        id:                 id.to_string(),
        name:               "Harbor Tower".to_string(),
        client_name:        "Harborside Ltd".to_string(),
        client_id:          client_id.to_string(),
        status:             ProjectStatus::InProgress,
        elevations:         ElevationList(vec![Elevation {
            name:   "North".to_string(),
            drops:  10,
            levels: 5,
        }]),
        repair_types:       RepairTypeList(vec![
            RepairTypeSpec {
                repair_type_id: "rt_crack".to_string(),
                repair_type:    "Crack".to_string(),
                phases:         4,
                price:          2500,
                unit_to_charge: "m".to_string(),
            },
            RepairTypeSpec {
                repair_type_id: "rt_spall".to_string(),
                repair_type:    "Spalling".to_string(),
                phases:         5,
                price:          4200,
                unit_to_charge: "m2".to_string(),
            },
        ]),
        technicians:        TechnicianList(vec![TechnicianRef {
            technician_id:     technician_id.to_string(),
            technician_name:   "Tess Ops".to_string(),
            technician_avatar: None,
        }]),
        created_by_user_id: "usr_m1".to_string(),
        created_at:         Utc::now(),
        updated_at:         Utc::now(),
        deleted_at:         None,
    }
}

/// A surveyed repair with the given id, status and survey repair type.
pub fn repair_fixture(
    id: &str,
    repair_index: i32,
    status: RepairStatus,
    repair_type: &str,
    surveyed_by: &str,
) -> entity::repairs::Model {
    let phases = RepairPhases {
        survey:   Some(SurveyPhase {
            repair_type:          repair_type.to_string(),
            measurements:         BTreeMap::new(),
            comments:             String::new(),
            photos:               Vec::new(),
            created_by_user_id:   surveyed_by.to_string(),
            created_by_user_name: "Tess Ops".to_string(),
            created_at:           "2026-03-01T08:00:00Z".to_string(),
        }),
        progress: vec![None, None],
        finish:   None,
    };

    entity::repairs::Model {
        id:                   id.to_string(),
        project_id:           "prj_1".to_string(),
        project_name:         "Harbor Tower".to_string(),
        elevation_name:       "North".to_string(),
        drop:                 3,
        level:                2,
        repair_index,
        status,
        phases,
        created_by_user_id:   surveyed_by.to_string(),
        created_by_user_name: "Tess Ops".to_string(),
        created_at:           Utc::now(),
        updated_at:           Utc::now(),
    }
}
