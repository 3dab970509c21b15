//! # Role Lookups
//!
//! Helpers for resolving a user's role from the users table.

use entity::users::{Column as UserColumn, Entity as UsersEntity, UserRole};
use error::{AppError, Result};
use sea_orm::{ColumnTrait, DbConn, EntityTrait, QueryFilter};

/// Fetch the role of a user by internal id.
///
/// Soft-deleted users resolve to no role.
pub async fn get_user_role(db: &DbConn, user_id: &str) -> Result<UserRole> {
    let user = UsersEntity::find_by_id(user_id)
        .filter(UserColumn::DeletedAt.is_null())
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(user.role)
}

/// Whether a role belongs to staff (admin or manager).
///
/// Staff bypass the project-scoped visibility pre-filter in list queries.
#[must_use]
pub fn is_staff(role: UserRole) -> bool { matches!(role, UserRole::Admin | UserRole::Manager) }
