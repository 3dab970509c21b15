//! # User Data Transfer Objects
//!
//! Request and response types for user management endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Response for a user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    /// User's unique identifier
    pub id:          String,
    /// User's email address
    pub email:       String,
    /// User's full name
    pub full_name:   String,
    /// User's avatar URL
    pub avatar_url:  Option<String>,
    /// User's role
    pub role:        String,
    /// User's account status
    pub status:      String,
    /// Permissions granted by the role, in `resource:action` form
    pub permissions: Vec<String>,
    /// Account creation timestamp
    pub created_at:  String,
    /// Last update timestamp
    pub updated_at:  String,
}

/// Request to create a new user
#[derive(Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// The identity provider's uid for this user
    #[validate(length(min = 1, max = 255, message = "auth_uid is required"))]
    pub auth_uid:   String,
    /// User's email address
    #[validate(email(message = "Invalid email format"))]
    pub email:      String,
    /// User's full name (required)
    #[validate(length(
        min = 1,
        max = 255,
        message = "Full name must be between 1 and 255 characters"
    ))]
    pub full_name:  String,
    /// Role to assign (admin, manager, technician, client, guest)
    pub role:       String,
    /// Avatar URL
    #[validate(url(message = "Invalid avatar URL"))]
    pub avatar_url: Option<String>,
}

/// Request to update a user (admin operation)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New full name
    #[validate(length(max = 255, message = "Full name must not exceed 255 characters"))]
    pub full_name:  Option<String>,
    /// New role to assign
    pub role:       Option<String>,
    /// User status (active, inactive)
    pub status:     Option<String>,
    /// New avatar URL
    #[validate(url(message = "Invalid avatar URL"))]
    pub avatar_url: Option<String>,
}

/// Response for user list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserListResponse {
    /// Whether the operation was successful
    pub success:    bool,
    /// List of users
    pub users:      Vec<UserResponse>,
    /// Pagination info
    pub pagination: PaginationInfo,
}

/// Pagination information
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    /// Current page number (1-based)
    pub page:        u64,
    /// Items per page
    pub per_page:    u64,
    /// Total number of items
    pub total:       u64,
    /// Total number of pages
    pub total_pages: u64,
}

impl From<error::PaginationMeta> for PaginationInfo {
    fn from(meta: error::PaginationMeta) -> Self {
        Self {
            page:        meta.page,
            per_page:    meta.per_page,
            total:       meta.total,
            total_pages: meta.total_pages,
        }
    }
}

/// Query parameters for user list
#[derive(Debug, Clone, Deserialize)]
pub struct UserListQuery {
    /// Page number (1-based, default: 1)
    pub page:     Option<u64>,
    /// Items per page (default: 20, max: 100)
    pub per_page: Option<u64>,
    /// Search term for email/full_name
    pub search:   Option<String>,
    /// Filter by role
    pub role:     Option<String>,
    /// Filter by status
    pub status:   Option<String>,
}

impl UserListQuery {
    /// Get page number (1-based, default: 1)
    pub fn page(&self) -> u64 { self.page.unwrap_or(1).max(1) }

    /// Get items per page (default: 20, max: 100)
    pub fn per_page(&self) -> u64 { self.per_page.unwrap_or(20).clamp(1, 100) }
}
