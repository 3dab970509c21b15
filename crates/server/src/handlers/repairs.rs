//! # Repair Handlers
//!
//! HTTP request handlers for the repair lifecycle: survey creation, progress
//! and finish submissions, the next-index lookup, role-scoped listing, and
//! manager review.

use auth::permissions::{Permission, RepairAction};
use axum::{http::StatusCode, Json};
use chrono::Utc;
use entity::{
    projects::Entity as ProjectsEntity,
    repairs::{Column as RepairColumn, Entity as RepairsEntity, RepairStatus},
};
use error::{AppError, Result};
use permissions_macro::with_permission;
use sea_orm::{
    sea_query::Expr,
    ActiveModelTrait,
    ColumnTrait,
    EntityTrait,
    QueryFilter,
    Set,
};
use tracing::info;
use validator::Validate;

use crate::{
    dto::repairs::{
        CreateRepairRequest,
        NextIndexQuery,
        NextIndexResponse,
        PhaseSubmissionRequest,
        RepairListQuery,
        RepairListResponse,
        RepairResponse,
        ReviewRepairRequest,
    },
    handlers::projects::ensure_project_visible,
    middleware::auth::AuthenticatedUser,
    phases::{self, Actor, PhaseSubmission},
    repair_query,
    utils::prefixed_id,
    AppState,
};

/// Load a live project or fail with not-found.
async fn load_project(state: &AppState, project_id: &str) -> Result<entity::projects::Model> {
    let project = ProjectsEntity::find_by_id(project_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Project not found"))?;

    if project.deleted_at.is_some() {
        return Err(AppError::not_found("Project not found"));
    }

    Ok(project)
}

/// Repairs at one (project, elevation, drop, level) location.
async fn repairs_at_location(
    state: &AppState,
    project_id: &str,
    elevation_name: &str,
    drop: i32,
    level: i32,
) -> Result<Vec<entity::repairs::Model>> {
    RepairsEntity::find()
        .filter(RepairColumn::ProjectId.eq(project_id))
        .filter(RepairColumn::ElevationName.eq(elevation_name))
        .filter(RepairColumn::Drop.eq(drop))
        .filter(RepairColumn::Level.eq(level))
        .all(&state.db)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch repairs: {}", e)))
}

/// Create a new repair from a survey submission (requires repairs:create)
///
/// The new repair receives the next free index in its location+type group.
/// A caller-supplied `repair_index` is checked against that computation: an
/// index belonging to an existing repair means "resume that repair through
/// its phase endpoints", so creation is rejected with a conflict.
///
/// # Returns
///
/// The created repair, status `pending`, with the survey phase populated and
/// the progress vector sized from the catalog.
#[with_permission(Permission::Repairs(RepairAction::Create))]
pub async fn create_repair_handler(
    state: &AppState,
    user: AuthenticatedUser,
    req: CreateRepairRequest,
) -> Result<(StatusCode, Json<RepairResponse>)> {
    // Validate request
    req.validate().map_err(|e| {
        AppError::Validation {
            message: e.to_string(),
        }
    })?;

    let project = load_project(state, &req.project_id).await?;
    ensure_project_visible(&user, &project)?;

    let existing = repairs_at_location(state, &req.project_id, &req.elevation_name, req.drop, req.level).await?;
    let next_index = phases::next_repair_index(&existing, &req.repair_type);

    if let Some(requested) = req.repair_index {
        if requested != next_index {
            return Err(AppError::conflict(format!(
                "Repair index {} is not the next free index ({}); existing indices resume through the phase \
                 endpoints",
                requested, next_index
            )));
        }
    }

    let actor = Actor {
        user_id:   user.id.clone(),
        user_name: user.full_name.clone(),
    };
    let submission = PhaseSubmission {
        measurements: req.measurements,
        comments:     req.comments,
        photos:       req.photos,
    };

    let now = Utc::now();
    let phase_doc = phases::build_survey(
        &project,
        &req.elevation_name,
        req.drop,
        req.level,
        &req.repair_type,
        submission,
        &actor,
        now,
    )?;

    let repair = entity::repairs::ActiveModel {
        id:                   Set(prefixed_id("rep")),
        project_id:           Set(project.id.clone()),
        project_name:         Set(project.name.clone()),
        elevation_name:       Set(req.elevation_name),
        drop:                 Set(req.drop),
        level:                Set(req.level),
        repair_index:         Set(next_index),
        status:               Set(RepairStatus::Pending),
        phases:               Set(phase_doc),
        created_by_user_id:   Set(user.id.clone()),
        created_by_user_name: Set(user.full_name.clone()),
        created_at:           Set(now),
        updated_at:           Set(now),
    };

    let created = repair
        .insert(&state.db)
        .await
        .map_err(|e| AppError::database(format!("Failed to create repair: {}", e)))?;

    info!(
        repair_id = %created.id,
        project_id = %created.project_id,
        repair_index = %created.repair_index,
        user_id = %user.id,
        "Repair created"
    );

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Compute the next repair index for a location+type (requires repairs:read)
#[with_permission(Permission::Repairs(RepairAction::Read))]
pub async fn next_index_handler(
    state: &AppState,
    user: AuthenticatedUser,
    query: NextIndexQuery,
) -> Result<Json<NextIndexResponse>> {
    // Validate request
    query.validate().map_err(|e| {
        AppError::Validation {
            message: e.to_string(),
        }
    })?;

    let project = load_project(state, &query.project_id).await?;
    ensure_project_visible(&user, &project)?;

    let existing = repairs_at_location(state, &query.project_id, &query.elevation_name, query.drop, query.level).await?;
    let next = phases::next_repair_index(&existing, &query.repair_type);

    Ok(Json(NextIndexResponse {
        success:           true,
        next_repair_index: next,
    }))
}

/// Get a single repair by ID (requires repairs:read)
#[with_permission(Permission::Repairs(RepairAction::Read))]
pub async fn get_repair_handler(
    state: &AppState,
    user: AuthenticatedUser,
    repair_id: &str,
) -> Result<Json<RepairResponse>> {
    let repair = RepairsEntity::find_by_id(repair_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Repair not found"))?;

    let project = load_project(state, &repair.project_id).await?;
    ensure_project_visible(&user, &project)?;

    Ok(Json(repair.into()))
}

/// List repairs with role scoping, filters and pagination (requires
/// repairs:read)
///
/// Delegates to the query engine: admins and managers are unrestricted,
/// clients and technicians see only their projects' repairs, and
/// repair-type/technician filters switch to the in-memory path.
#[with_permission(Permission::Repairs(RepairAction::Read))]
pub async fn list_repairs_handler(
    state: &AppState,
    user: AuthenticatedUser,
    query: RepairListQuery,
) -> Result<Json<RepairListResponse>> {
    let parsed = query.into_query()?;

    let (items, pagination) = repair_query::list_repairs(&state.db, &user, &parsed).await?;

    Ok(Json(RepairListResponse {
        success:    true,
        repairs:    items.into_iter().map(RepairResponse::from).collect(),
        pagination: pagination.into(),
    }))
}

/// Submit a progress phase (requires repairs:submit_phase)
///
/// `slot` is the 1-based progress step number.
#[with_permission(Permission::Repairs(RepairAction::SubmitPhase))]
pub async fn submit_progress_handler(
    state: &AppState,
    user: AuthenticatedUser,
    repair_id: &str,
    slot: usize,
    req: PhaseSubmissionRequest,
) -> Result<Json<RepairResponse>> {
    let repair = RepairsEntity::find_by_id(repair_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Repair not found"))?;

    let project = load_project(state, &repair.project_id).await?;
    ensure_project_visible(&user, &project)?;

    let actor = Actor {
        user_id:   user.id.clone(),
        user_name: user.full_name.clone(),
    };
    let submission = PhaseSubmission {
        measurements: req.measurements,
        comments:     req.comments,
        photos:       req.photos,
    };

    let mut phase_doc = repair.phases.clone();
    phases::apply_progress(&mut phase_doc, slot, submission, &actor, Utc::now(), state.phase_config)?;

    let updated = write_phases(state, &repair, phase_doc).await?;

    info!(repair_id = %repair_id, slot = %slot, user_id = %user.id, "Progress phase submitted");

    Ok(Json(updated.into()))
}

/// Submit the finish phase (requires repairs:submit_phase)
#[with_permission(Permission::Repairs(RepairAction::SubmitPhase))]
pub async fn submit_finish_handler(
    state: &AppState,
    user: AuthenticatedUser,
    repair_id: &str,
    req: PhaseSubmissionRequest,
) -> Result<Json<RepairResponse>> {
    let repair = RepairsEntity::find_by_id(repair_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Repair not found"))?;

    let project = load_project(state, &repair.project_id).await?;
    ensure_project_visible(&user, &project)?;

    let actor = Actor {
        user_id:   user.id.clone(),
        user_name: user.full_name.clone(),
    };
    let submission = PhaseSubmission {
        measurements: req.measurements,
        comments:     req.comments,
        photos:       req.photos,
    };

    let mut phase_doc = repair.phases.clone();
    phases::apply_finish(&mut phase_doc, submission, &actor, Utc::now(), state.phase_config)?;

    let updated = write_phases(state, &repair, phase_doc).await?;

    info!(repair_id = %repair_id, user_id = %user.id, "Finish phase submitted");

    Ok(Json(updated.into()))
}

/// Review a repair: approve or reject (requires repairs:review)
#[with_permission(Permission::Repairs(RepairAction::Review))]
pub async fn review_repair_handler(
    state: &AppState,
    user: AuthenticatedUser,
    repair_id: &str,
    req: ReviewRepairRequest,
) -> Result<Json<RepairResponse>> {
    // Validate request
    req.validate().map_err(|e| {
        AppError::Validation {
            message: e.to_string(),
        }
    })?;

    let status = match req.status.as_str() {
        "approved" => RepairStatus::Approved,
        "rejected" => RepairStatus::Rejected,
        other => {
            return Err(AppError::validation(format!(
                "Review status must be 'approved' or 'rejected', got '{}'",
                other
            )));
        },
    };

    let repair = RepairsEntity::find_by_id(repair_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Repair not found"))?;

    let mut active_model: entity::repairs::ActiveModel = repair.into();
    active_model.status = Set(status);
    active_model.updated_at = Set(Utc::now());

    let updated = active_model
        .update(&state.db)
        .await
        .map_err(|e| AppError::database(format!("Failed to update repair status: {}", e)))?;

    info!(repair_id = %repair_id, status = %status, reviewed_by = %user.id, "Repair reviewed");

    Ok(Json(updated.into()))
}

/// Write an updated phase document with an optimistic concurrency check.
///
/// Only the `phases` and `updated_at` columns are touched, guarded on the
/// row still carrying the `updated_at` we read. Zero affected rows means a
/// concurrent submission won the race; the caller gets a conflict instead of
/// silently clobbering the other write.
async fn write_phases(
    state: &AppState,
    repair: &entity::repairs::Model,
    phase_doc: entity::phases::RepairPhases,
) -> Result<entity::repairs::Model> {
    let now = Utc::now();

    let result = RepairsEntity::update_many()
        .col_expr(RepairColumn::Phases, Expr::value(sea_orm::Value::from(phase_doc)))
        .col_expr(RepairColumn::UpdatedAt, Expr::value(sea_orm::Value::from(now)))
        .filter(RepairColumn::Id.eq(&repair.id))
        .filter(RepairColumn::UpdatedAt.eq(repair.updated_at))
        .exec(&state.db)
        .await
        .map_err(|e| AppError::database(format!("Failed to write phase update: {}", e)))?;

    if result.rows_affected == 0 {
        return Err(AppError::conflict(
            "Repair was modified concurrently, reload and retry",
        ));
    }

    RepairsEntity::find_by_id(&repair.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Repair not found"))
}
