//! # User Handlers
//!
//! HTTP request handlers for user management endpoints.

use auth::permissions::{Permission, PermissionService, UserAction};
use axum::{http::StatusCode, Json};
use chrono::Utc;
use entity::users::{Column as UserColumn, Entity as UsersEntity, UserRole, UserStatus};
use error::{AppError, Result};
use permissions_macro::with_permission;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use validator::Validate;

use crate::{
    dto::users::{CreateUserRequest, PaginationInfo, UpdateUserRequest, UserListQuery, UserListResponse, UserResponse},
    middleware::auth::AuthenticatedUser,
    utils::{escape_like_wildcards, prefixed_id},
    AppState,
};

/// Get the authenticated user's profile
///
/// # Arguments
///
/// * `state` - Application state
/// * `user` - Authenticated user from middleware
///
/// # Returns
///
/// User profile response with role, permissions and account details
pub async fn get_my_profile_handler(state: &AppState, user: AuthenticatedUser) -> Result<Json<UserResponse>> {
    let db_user = UsersEntity::find_by_id(&user.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(user_model_to_response(&db_user)))
}

/// Create a new user (requires users:create permission)
///
/// # Arguments
///
/// * `state` - Application state
/// * `user` - Authenticated user from middleware
/// * `req` - Request body with user details
///
/// # Returns
///
/// Created user profile response
#[with_permission(Permission::Users(UserAction::Create))]
pub async fn create_user_handler(
    state: &AppState,
    user: AuthenticatedUser,
    req: CreateUserRequest,
) -> Result<(StatusCode, Json<UserResponse>)> {
    // Validate request
    req.validate().map_err(|e| {
        AppError::Validation {
            message: e.to_string(),
        }
    })?;

    let role = UserRole::from_string(&req.role)
        .ok_or_else(|| AppError::validation(format!("Unknown role '{}'", req.role)))?;

    // Check if user already exists
    let existing = UsersEntity::find()
        .filter(
            Condition::any()
                .add(UserColumn::Email.eq(&req.email))
                .add(UserColumn::AuthUid.eq(&req.auth_uid)),
        )
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::conflict(
            "User with this email or auth uid already exists",
        ));
    }

    let now = Utc::now();
    let new_user = entity::users::ActiveModel {
        id:         Set(prefixed_id("usr")),
        auth_uid:   Set(req.auth_uid),
        email:      Set(req.email.clone()),
        full_name:  Set(req.full_name),
        avatar_url: Set(req.avatar_url),
        role:       Set(role),
        status:     Set(UserStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    };

    let created = new_user
        .insert(&state.db)
        .await
        .map_err(|e| AppError::database(format!("Failed to create user: {}", e)))?;

    info!(user_id = %created.id, email = %req.email, created_by = %user.id, "User created");

    Ok((StatusCode::CREATED, Json(user_model_to_response(&created))))
}

/// List all users with pagination and filtering
///
/// # Returns
///
/// Paginated user list response
#[with_permission(Permission::Users(UserAction::Read))]
pub async fn list_users_handler(
    state: &AppState,
    user: AuthenticatedUser,
    query: UserListQuery,
) -> Result<Json<UserListResponse>> {
    let page = query.page();
    let per_page = query.per_page();

    let mut base_query = UsersEntity::find().filter(UserColumn::DeletedAt.is_null());

    if let Some(ref search) = query.search {
        let pattern = format!("%{}%", escape_like_wildcards(search));
        base_query = base_query.filter(
            Condition::any()
                .add(UserColumn::Email.like(&pattern))
                .add(UserColumn::FullName.like(&pattern)),
        );
    }

    if let Some(ref role) = query.role {
        if let Some(role) = UserRole::from_string(role) {
            base_query = base_query.filter(UserColumn::Role.eq(role));
        }
    }

    if let Some(ref status) = query.status {
        let status = match status.as_str() {
            "active" => Some(UserStatus::Active),
            "inactive" => Some(UserStatus::Inactive),
            _ => None,
        };
        if let Some(s) = status {
            base_query = base_query.filter(UserColumn::Status.eq(s));
        }
    }

    let total = base_query
        .clone()
        .count(&state.db)
        .await
        .map_err(|e| AppError::database(format!("Failed to count users: {}", e)))?;

    let total_pages = if total == 0 {
        0
    }
    else {
        total.div_ceil(per_page)
    };

    let users = base_query
        .order_by_asc(UserColumn::CreatedAt)
        .paginate(&state.db, per_page)
        .fetch_page(page.saturating_sub(1))
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch users: {}", e)))?;

    let user_responses: Vec<UserResponse> = users.iter().map(user_model_to_response).collect();

    Ok(Json(UserListResponse {
        success:    true,
        users:      user_responses,
        pagination: PaginationInfo {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

/// Update a user (requires users:update permission)
///
/// # Returns
///
/// Updated user profile response
#[with_permission(Permission::Users(UserAction::Update))]
pub async fn update_user_handler(
    state: &AppState,
    user: AuthenticatedUser,
    user_id: &str,
    req: UpdateUserRequest,
) -> Result<Json<UserResponse>> {
    // Validate request
    req.validate().map_err(|e| {
        AppError::Validation {
            message: e.to_string(),
        }
    })?;

    let db_user = UsersEntity::find_by_id(user_id)
        .filter(UserColumn::DeletedAt.is_null())
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let mut active_model: entity::users::ActiveModel = db_user.into();

    if let Some(full_name) = req.full_name {
        active_model.full_name = Set(full_name);
    }
    if let Some(ref role) = req.role {
        let role = UserRole::from_string(role)
            .ok_or_else(|| AppError::validation(format!("Unknown role '{}'", role)))?;
        active_model.role = Set(role);
    }
    if let Some(ref status) = req.status {
        let status = match status.as_str() {
            "active" => UserStatus::Active,
            "inactive" => UserStatus::Inactive,
            other => return Err(AppError::validation(format!("Unknown status '{}'", other))),
        };
        active_model.status = Set(status);
    }
    if let Some(avatar_url) = req.avatar_url {
        active_model.avatar_url = Set(Some(avatar_url));
    }
    active_model.updated_at = Set(Utc::now());

    let updated = active_model
        .update(&state.db)
        .await
        .map_err(|e| AppError::database(format!("Failed to update user: {}", e)))?;

    info!(user_id = %updated.id, updated_by = %user.id, "User updated");

    Ok(Json(user_model_to_response(&updated)))
}

/// Soft-delete a user (requires users:delete permission)
#[with_permission(Permission::Users(UserAction::Delete))]
pub async fn delete_user_handler(state: &AppState, user: AuthenticatedUser, user_id: &str) -> Result<StatusCode> {
    if user.id == user_id {
        return Err(AppError::bad_request("You cannot delete your own account"));
    }

    let db_user = UsersEntity::find_by_id(user_id)
        .filter(UserColumn::DeletedAt.is_null())
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let mut active_model: entity::users::ActiveModel = db_user.into();
    active_model.status = Set(UserStatus::Inactive);
    active_model.deleted_at = Set(Some(Utc::now()));
    active_model.updated_at = Set(Utc::now());

    active_model
        .update(&state.db)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete user: {}", e)))?;

    info!(user_id = %user_id, deleted_by = %user.id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Convert a user entity model to a profile response DTO
fn user_model_to_response(user: &entity::users::Model) -> UserResponse {
    UserResponse {
        id:          user.id.clone(),
        email:       user.email.clone(),
        full_name:   user.full_name.clone(),
        avatar_url:  user.avatar_url.clone(),
        role:        user.role.to_string(),
        status:      user.status.to_string(),
        permissions: PermissionService::permissions_for_role(user.role),
        created_at:  user.created_at.to_rfc3339(),
        updated_at:  user.updated_at.to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to create a test user model
    fn make_test_user(id: &str, email: &str, role: UserRole, status: UserStatus) -> entity::users::Model {
        entity::users::Model {
            id:         id.to_string(),
            auth_uid:   format!("ext-{}", id),
            email:      email.to_string(),
            full_name:  "Test User".to_string(),
            avatar_url: None,
            role,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_user_model_to_response() {
        let user = make_test_user("usr_test123", "test@example.com", UserRole::Manager, UserStatus::Active);
        let response = user_model_to_response(&user);

        assert_eq!(response.id, "usr_test123");
        assert_eq!(response.email, "test@example.com");
        assert_eq!(response.role, "manager");
        assert_eq!(response.status, "active");
        assert!(response.permissions.contains(&"repairs:review".to_string()));
    }

    #[test]
    fn test_user_model_to_response_guest_has_no_permissions() {
        let user = make_test_user("usr_guest", "guest@example.com", UserRole::Guest, UserStatus::Active);
        let response = user_model_to_response(&user);

        assert!(response.permissions.is_empty());
    }

    #[test]
    fn test_user_model_to_response_inactive_status() {
        let user = make_test_user("usr_x", "x@example.com", UserRole::Client, UserStatus::Inactive);
        let response = user_model_to_response(&user);

        assert_eq!(response.status, "inactive");
    }
}
