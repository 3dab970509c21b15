//! # API Router Configuration
//!
//! Configures API routes for the Plumbline application.

use axum::{
    extract::{Extension, Path, Query, State as AxumState},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json,
    Router,
};
use error::Result;

use crate::{
    dto::{
        projects::{
            CreateProjectRequest,
            ProjectListQuery,
            ProjectListResponse,
            ProjectResponse,
            UpdateProjectRequest,
        },
        repairs::{
            CreateRepairRequest,
            NextIndexQuery,
            NextIndexResponse,
            PhaseSubmissionRequest,
            RepairListQuery,
            RepairListResponse,
            RepairResponse,
            ReviewRepairRequest,
        },
        users::{CreateUserRequest, UpdateUserRequest, UserListQuery, UserListResponse, UserResponse},
    },
    middleware::auth::AuthenticatedUser,
    AppState,
};

/// Creates the API router with all routes
///
/// # Arguments
///
/// * `state` - Application state containing DB pool and config
///
/// # Returns
///
/// Configured Axum router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/users", post(create_user).get(list_users))
        .route("/api/v1/users/me", get(get_my_profile))
        .route("/api/v1/users/:id", put(update_user).delete(delete_user))
        .route("/api/v1/projects", post(create_project).get(list_projects))
        .route(
            "/api/v1/projects/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/api/v1/repairs", post(create_repair).get(list_repairs))
        .route("/api/v1/repairs/next-index", get(next_index))
        .route("/api/v1/repairs/:id", get(get_repair))
        .route("/api/v1/repairs/:id/progress/:slot", post(submit_progress))
        .route("/api/v1/repairs/:id/finish", post(submit_finish))
        .route("/api/v1/repairs/:id/status", put(review_repair))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::auth_middleware,
        ))
        .with_state(state)
}

/// Wrapper handler for user creation that uses State extractor
async fn create_user(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    crate::handlers::users::create_user_handler(&state, user, req).await
}

/// Wrapper handler for the user list
async fn list_users(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<UserListResponse>> {
    crate::handlers::users::list_users_handler(&state, user, query).await
}

/// Wrapper handler for the caller's own profile
async fn get_my_profile(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<UserResponse>> {
    crate::handlers::users::get_my_profile_handler(&state, user).await
}

/// Wrapper handler for user updates
async fn update_user(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>> {
    crate::handlers::users::update_user_handler(&state, user, &user_id, req).await
}

/// Wrapper handler for user deletion
async fn delete_user(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
) -> Result<StatusCode> {
    crate::handlers::users::delete_user_handler(&state, user, &user_id).await
}

/// Wrapper handler for project creation
async fn create_project(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>)> {
    crate::handlers::projects::create_project_handler(&state, user, req).await
}

/// Wrapper handler for the project list
async fn list_projects(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<ProjectListQuery>,
) -> Result<Json<ProjectListResponse>> {
    crate::handlers::projects::list_projects_handler(&state, user, query).await
}

/// Wrapper handler for a single project
async fn get_project(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(project_id): Path<String>,
) -> Result<Json<ProjectResponse>> {
    crate::handlers::projects::get_project_handler(&state, user, &project_id).await
}

/// Wrapper handler for project updates
async fn update_project(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(project_id): Path<String>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>> {
    crate::handlers::projects::update_project_handler(&state, user, &project_id, req).await
}

/// Wrapper handler for project deletion
async fn delete_project(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(project_id): Path<String>,
) -> Result<StatusCode> {
    crate::handlers::projects::delete_project_handler(&state, user, &project_id).await
}

/// Wrapper handler for repair creation (survey submission)
async fn create_repair(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<CreateRepairRequest>,
) -> Result<(StatusCode, Json<RepairResponse>)> {
    crate::handlers::repairs::create_repair_handler(&state, user, req).await
}

/// Wrapper handler for the repair list
async fn list_repairs(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<RepairListQuery>,
) -> Result<Json<RepairListResponse>> {
    crate::handlers::repairs::list_repairs_handler(&state, user, query).await
}

/// Wrapper handler for the next-index lookup
async fn next_index(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<NextIndexQuery>,
) -> Result<Json<NextIndexResponse>> {
    crate::handlers::repairs::next_index_handler(&state, user, query).await
}

/// Wrapper handler for a single repair
async fn get_repair(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(repair_id): Path<String>,
) -> Result<Json<RepairResponse>> {
    crate::handlers::repairs::get_repair_handler(&state, user, &repair_id).await
}

/// Wrapper handler for progress submissions
async fn submit_progress(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((repair_id, slot)): Path<(String, usize)>,
    Json(req): Json<PhaseSubmissionRequest>,
) -> Result<Json<RepairResponse>> {
    crate::handlers::repairs::submit_progress_handler(&state, user, &repair_id, slot, req).await
}

/// Wrapper handler for finish submissions
async fn submit_finish(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(repair_id): Path<String>,
    Json(req): Json<PhaseSubmissionRequest>,
) -> Result<Json<RepairResponse>> {
    crate::handlers::repairs::submit_finish_handler(&state, user, &repair_id, req).await
}

/// Wrapper handler for repair review
async fn review_repair(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(repair_id): Path<String>,
    Json(req): Json<ReviewRepairRequest>,
) -> Result<Json<RepairResponse>> {
    crate::handlers::repairs::review_repair_handler(&state, user, &repair_id, req).await
}

/// Creates the health check router
pub fn create_health_router() -> Router { Router::new().route("/health", get(|| async { "OK" })) }

/// Creates the main application router
///
/// # Arguments
///
/// * `state` - Application state containing DB pool and config
///
/// # Returns
///
/// Main router with health checks and API routes
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .merge(create_health_router())
        .merge(create_router(state))
        .layer(middleware::from_fn(
            crate::middleware::request_id::request_id_middleware,
        ))
}
