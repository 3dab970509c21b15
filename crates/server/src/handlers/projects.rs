//! # Project Handlers
//!
//! HTTP request handlers for project configuration endpoints. Projects carry
//! the elevation grids, repair-type catalog and technician roster the repair
//! lifecycle validates against; only managers and admins may mutate them.

use auth::permissions::{Permission, ProjectAction};
use axum::{http::StatusCode, Json};
use chrono::Utc;
use entity::{
    projects::{
        Column as ProjectColumn,
        ElevationList,
        Entity as ProjectsEntity,
        ProjectStatus,
        RepairTypeList,
        TechnicianList,
    },
    users::{Column as UserColumn, Entity as UsersEntity, UserRole},
};
use error::{AppError, Result};
use permissions_macro::with_permission;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use validator::Validate;

use crate::{
    dto::{
        projects::{
            CreateProjectRequest,
            ElevationInput,
            ProjectListQuery,
            ProjectListResponse,
            ProjectResponse,
            RepairTypeInput,
            TechnicianInput,
            UpdateProjectRequest,
        },
        users::PaginationInfo,
    },
    middleware::auth::AuthenticatedUser,
    repair_query::paginate_slice,
    utils::{escape_like_wildcards, prefixed_id},
    AppState,
};

/// Check that a caller may see a project.
///
/// Staff see everything; clients see their own projects; technicians see
/// projects they are assigned to.
pub fn ensure_project_visible(caller: &AuthenticatedUser, project: &entity::projects::Model) -> Result<()> {
    let visible = match caller.role {
        UserRole::Admin | UserRole::Manager => true,
        UserRole::Client => project.client_id == caller.id,
        UserRole::Technician => project.has_technician(&caller.id),
        UserRole::Guest => false,
    };

    if visible {
        Ok(())
    }
    else {
        Err(AppError::forbidden("You do not have access to this project"))
    }
}

/// Create a new project (requires projects:create permission)
///
/// # Returns
///
/// The created project response
#[with_permission(Permission::Projects(ProjectAction::Create))]
pub async fn create_project_handler(
    state: &AppState,
    user: AuthenticatedUser,
    req: CreateProjectRequest,
) -> Result<(StatusCode, Json<ProjectResponse>)> {
    // Validate request
    req.validate().map_err(|e| {
        AppError::Validation {
            message: e.to_string(),
        }
    })?;

    // The client must be an existing, active user
    let client = UsersEntity::find_by_id(&req.client_id)
        .filter(UserColumn::DeletedAt.is_null())
        .one(&state.db)
        .await?;
    if client.is_none() {
        return Err(AppError::not_found("Client user not found"));
    }

    let now = Utc::now();
    let project = entity::projects::ActiveModel {
        id:                 Set(prefixed_id("prj")),
        name:               Set(req.name.clone()),
        client_name:        Set(req.client_name),
        client_id:          Set(req.client_id),
        status:             Set(ProjectStatus::Pending),
        elevations:         Set(elevations_from_inputs(req.elevations)),
        repair_types:       Set(repair_types_from_inputs(req.repair_types)),
        technicians:        Set(technicians_from_inputs(req.technicians)),
        created_by_user_id: Set(user.id.clone()),
        created_at:         Set(now),
        updated_at:         Set(now),
        deleted_at:         Set(None),
    };

    let created = project
        .insert(&state.db)
        .await
        .map_err(|e| AppError::database(format!("Failed to create project: {}", e)))?;

    info!(project_id = %created.id, user_id = %user.id, "Project created");

    Ok((StatusCode::CREATED, Json(project_model_to_response(&created))))
}

/// Get a single project by ID
///
/// # Returns
///
/// The project response
#[with_permission(Permission::Projects(ProjectAction::Read))]
pub async fn get_project_handler(
    state: &AppState,
    user: AuthenticatedUser,
    project_id: &str,
) -> Result<Json<ProjectResponse>> {
    let project = ProjectsEntity::find_by_id(project_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Project not found"))?;

    if project.deleted_at.is_some() {
        return Err(AppError::not_found("Project not found"));
    }

    ensure_project_visible(&user, &project)?;

    Ok(Json(project_model_to_response(&project)))
}

/// List projects with pagination and search
///
/// Staff see all projects; clients and technicians see their scoped subset.
/// The technician roster lives in the project JSON, so technician scoping is
/// applied in memory after the column filters.
#[with_permission(Permission::Projects(ProjectAction::Read))]
pub async fn list_projects_handler(
    state: &AppState,
    user: AuthenticatedUser,
    query: ProjectListQuery,
) -> Result<Json<ProjectListResponse>> {
    let page = query.page();
    let per_page = query.per_page();

    let mut base_query = ProjectsEntity::find().filter(ProjectColumn::DeletedAt.is_null());

    if let Some(ref search) = query.search {
        let pattern = format!("%{}%", escape_like_wildcards(search));
        base_query = base_query.filter(
            Condition::any()
                .add(ProjectColumn::Name.like(&pattern))
                .add(ProjectColumn::ClientName.like(&pattern)),
        );
    }

    if let Some(ref status) = query.status {
        if let Some(status) = ProjectStatus::from_string(status) {
            base_query = base_query.filter(ProjectColumn::Status.eq(status));
        }
    }

    base_query = base_query.order_by_asc(ProjectColumn::Name);

    let (projects, total) = match user.role {
        UserRole::Client => {
            let base_query = base_query.filter(ProjectColumn::ClientId.eq(&user.id));
            let total = base_query
                .clone()
                .count(&state.db)
                .await
                .map_err(|e| AppError::database(format!("Failed to count projects: {}", e)))?;
            let projects = base_query
                .paginate(&state.db, per_page)
                .fetch_page(page.saturating_sub(1))
                .await
                .map_err(|e| AppError::database(format!("Failed to fetch projects: {}", e)))?;
            (projects, total)
        },
        UserRole::Technician => {
            let all = base_query
                .all(&state.db)
                .await
                .map_err(|e| AppError::database(format!("Failed to fetch projects: {}", e)))?;
            let assigned: Vec<_> = all.into_iter().filter(|p| p.has_technician(&user.id)).collect();
            paginate_slice(assigned, page, per_page)
        },
        _ => {
            let total = base_query
                .clone()
                .count(&state.db)
                .await
                .map_err(|e| AppError::database(format!("Failed to count projects: {}", e)))?;
            let projects = base_query
                .paginate(&state.db, per_page)
                .fetch_page(page.saturating_sub(1))
                .await
                .map_err(|e| AppError::database(format!("Failed to fetch projects: {}", e)))?;
            (projects, total)
        },
    };

    let total_pages = if total == 0 {
        0
    }
    else {
        total.div_ceil(per_page)
    };

    let project_responses: Vec<ProjectResponse> = projects.iter().map(project_model_to_response).collect();

    Ok(Json(ProjectListResponse {
        success:    true,
        projects:   project_responses,
        pagination: PaginationInfo {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

/// Update a project (requires projects:update permission)
///
/// # Returns
///
/// Updated project response
#[with_permission(Permission::Projects(ProjectAction::Update))]
pub async fn update_project_handler(
    state: &AppState,
    user: AuthenticatedUser,
    project_id: &str,
    req: UpdateProjectRequest,
) -> Result<Json<ProjectResponse>> {
    // Validate request
    req.validate().map_err(|e| {
        AppError::Validation {
            message: e.to_string(),
        }
    })?;

    let project = ProjectsEntity::find_by_id(project_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Project not found"))?;

    if project.deleted_at.is_some() {
        return Err(AppError::not_found("Project not found"));
    }

    let mut active_model: entity::projects::ActiveModel = project.into();

    if let Some(name) = req.name {
        active_model.name = Set(name);
    }
    if let Some(ref status) = req.status {
        let status = ProjectStatus::from_string(status)
            .ok_or_else(|| AppError::validation(format!("Unknown status '{}'", status)))?;
        active_model.status = Set(status);
    }
    if let Some(elevations) = req.elevations {
        active_model.elevations = Set(elevations_from_inputs(elevations));
    }
    if let Some(repair_types) = req.repair_types {
        active_model.repair_types = Set(repair_types_from_inputs(repair_types));
    }
    if let Some(technicians) = req.technicians {
        active_model.technicians = Set(technicians_from_inputs(technicians));
    }
    active_model.updated_at = Set(Utc::now());

    let updated = active_model
        .update(&state.db)
        .await
        .map_err(|e| AppError::database(format!("Failed to update project: {}", e)))?;

    info!(project_id = %updated.id, user_id = %user.id, "Project updated");

    Ok(Json(project_model_to_response(&updated)))
}

/// Soft-delete a project (requires projects:delete permission)
#[with_permission(Permission::Projects(ProjectAction::Delete))]
pub async fn delete_project_handler(
    state: &AppState,
    user: AuthenticatedUser,
    project_id: &str,
) -> Result<StatusCode> {
    let project = ProjectsEntity::find_by_id(project_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Project not found"))?;

    if project.deleted_at.is_some() {
        return Err(AppError::not_found("Project not found"));
    }

    let mut active_model: entity::projects::ActiveModel = project.into();
    active_model.deleted_at = Set(Some(Utc::now()));
    active_model.updated_at = Set(Utc::now());

    active_model
        .update(&state.db)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete project: {}", e)))?;

    info!(project_id = %project_id, user_id = %user.id, "Project deleted");

    Ok(StatusCode::NO_CONTENT)
}

fn elevations_from_inputs(inputs: Vec<ElevationInput>) -> ElevationList {
    ElevationList(
        inputs
            .into_iter()
            .map(|e| {
                entity::projects::Elevation {
                    name:   e.name,
                    drops:  e.drops,
                    levels: e.levels,
                }
            })
            .collect(),
    )
}

fn repair_types_from_inputs(inputs: Vec<RepairTypeInput>) -> RepairTypeList {
    RepairTypeList(
        inputs
            .into_iter()
            .map(|rt| {
                entity::projects::RepairTypeSpec {
                    repair_type_id: rt.repair_type_id.unwrap_or_else(|| prefixed_id("rt")),
                    repair_type:    rt.repair_type,
                    phases:         rt.phases,
                    price:          rt.price,
                    unit_to_charge: rt.unit_to_charge,
                }
            })
            .collect(),
    )
}

fn technicians_from_inputs(inputs: Vec<TechnicianInput>) -> TechnicianList {
    TechnicianList(
        inputs
            .into_iter()
            .map(|t| {
                entity::projects::TechnicianRef {
                    technician_id:     t.technician_id,
                    technician_name:   t.technician_name,
                    technician_avatar: t.technician_avatar,
                }
            })
            .collect(),
    )
}

/// Convert a project entity model to a response DTO
fn project_model_to_response(project: &entity::projects::Model) -> ProjectResponse {
    ProjectResponse {
        id:           project.id.clone(),
        name:         project.name.clone(),
        client_name:  project.client_name.clone(),
        client_id:    project.client_id.clone(),
        status:       project.status.to_string(),
        elevations:   project
            .elevations
            .0
            .iter()
            .map(|e| {
                ElevationInput {
                    name:   e.name.clone(),
                    drops:  e.drops,
                    levels: e.levels,
                }
            })
            .collect(),
        repair_types: project
            .repair_types
            .0
            .iter()
            .map(|rt| {
                RepairTypeInput {
                    repair_type_id: Some(rt.repair_type_id.clone()),
                    repair_type:    rt.repair_type.clone(),
                    phases:         rt.phases,
                    price:          rt.price,
                    unit_to_charge: rt.unit_to_charge.clone(),
                }
            })
            .collect(),
        technicians:  project
            .technicians
            .0
            .iter()
            .map(|t| {
                TechnicianInput {
                    technician_id:     t.technician_id.clone(),
                    technician_name:   t.technician_name.clone(),
                    technician_avatar: t.technician_avatar.clone(),
                }
            })
            .collect(),
        created_at:   project.created_at.to_rfc3339(),
        updated_at:   project.updated_at.to_rfc3339(),
    }
}
