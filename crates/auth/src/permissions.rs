//! # Permission Service
//!
//! Role-based permission checks. Roles are a column on the user record, so
//! the role → permission mapping is a static matrix rather than a lookup
//! against role tables.

use entity::users::UserRole;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Represents a single permission
///
/// Permissions follow a hierarchical naming convention:
/// - Format: `resource:action`
/// - Examples: `repairs:create`, `projects:update`, `users:delete`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    /// User-related permissions
    Users(UserAction),
    /// Project-related permissions
    Projects(ProjectAction),
    /// Repair-related permissions
    Repairs(RepairAction),
}

/// Actions available for user resources
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserAction {
    /// Create new users
    Create,
    /// Read user information
    Read,
    /// Update user information
    Update,
    /// Delete (deactivate) users
    Delete,
}

/// Actions available for project resources
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectAction {
    /// Create new projects
    Create,
    /// Read project information
    Read,
    /// Update project configuration
    Update,
    /// Delete projects
    Delete,
}

/// Actions available for repair resources
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepairAction {
    /// Create new repairs (survey submission)
    Create,
    /// Read repair information
    Read,
    /// Submit progress/finish phases
    SubmitPhase,
    /// Approve or reject repairs
    Review,
}

impl Permission {
    /// Parse a permission string into a Permission enum
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        let (resource, action) = s.split_once(':')?;
        match resource {
            "users" => UserAction::from_string(action).map(Permission::Users),
            "projects" => ProjectAction::from_string(action).map(Permission::Projects),
            "repairs" => RepairAction::from_string(action).map(Permission::Repairs),
            _ => None,
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Permission::Users(action) => write!(f, "users:{}", action),
            Permission::Projects(action) => write!(f, "projects:{}", action),
            Permission::Repairs(action) => write!(f, "repairs:{}", action),
        }
    }
}

impl std::fmt::Display for UserAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserAction::Create => write!(f, "create"),
            UserAction::Read => write!(f, "read"),
            UserAction::Update => write!(f, "update"),
            UserAction::Delete => write!(f, "delete"),
        }
    }
}

impl UserAction {
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "create" => Some(UserAction::Create),
            "read" => Some(UserAction::Read),
            "update" => Some(UserAction::Update),
            "delete" => Some(UserAction::Delete),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProjectAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectAction::Create => write!(f, "create"),
            ProjectAction::Read => write!(f, "read"),
            ProjectAction::Update => write!(f, "update"),
            ProjectAction::Delete => write!(f, "delete"),
        }
    }
}

impl ProjectAction {
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "create" => Some(ProjectAction::Create),
            "read" => Some(ProjectAction::Read),
            "update" => Some(ProjectAction::Update),
            "delete" => Some(ProjectAction::Delete),
            _ => None,
        }
    }
}

impl std::fmt::Display for RepairAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepairAction::Create => write!(f, "create"),
            RepairAction::Read => write!(f, "read"),
            RepairAction::SubmitPhase => write!(f, "submit_phase"),
            RepairAction::Review => write!(f, "review"),
        }
    }
}

impl RepairAction {
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "create" => Some(RepairAction::Create),
            "read" => Some(RepairAction::Read),
            "submit_phase" => Some(RepairAction::SubmitPhase),
            "review" => Some(RepairAction::Review),
            _ => None,
        }
    }
}

/// Static role → permission matrix.
///
/// Note that this matrix only answers "may this role perform this action at
/// all" — project-scoped visibility (clients see their own projects,
/// technicians see assigned projects) is enforced by the query engine on top
/// of it.
pub struct PermissionService;

impl PermissionService {
    /// Check whether a role grants a permission.
    #[must_use]
    pub fn role_allows(role: UserRole, permission: &Permission) -> bool {
        let allowed = match role {
            UserRole::Admin => true,
            UserRole::Manager => {
                matches!(
                    permission,
                    Permission::Users(UserAction::Read)
                        | Permission::Projects(_)
                        | Permission::Repairs(RepairAction::Read)
                        | Permission::Repairs(RepairAction::Review)
                )
            },
            UserRole::Technician => {
                matches!(
                    permission,
                    Permission::Projects(ProjectAction::Read)
                        | Permission::Repairs(RepairAction::Create)
                        | Permission::Repairs(RepairAction::Read)
                        | Permission::Repairs(RepairAction::SubmitPhase)
                )
            },
            UserRole::Client => {
                matches!(
                    permission,
                    Permission::Projects(ProjectAction::Read) | Permission::Repairs(RepairAction::Read)
                )
            },
            UserRole::Guest => false,
        };

        if !allowed {
            debug!(role = %role, permission = %permission, "Permission denied by role matrix");
        }

        allowed
    }

    /// All permissions a role grants, in wire format. Used by the user
    /// profile endpoint so the UI can hide actions up front.
    #[must_use]
    pub fn permissions_for_role(role: UserRole) -> Vec<String> {
        let all = [
            Permission::Users(UserAction::Create),
            Permission::Users(UserAction::Read),
            Permission::Users(UserAction::Update),
            Permission::Users(UserAction::Delete),
            Permission::Projects(ProjectAction::Create),
            Permission::Projects(ProjectAction::Read),
            Permission::Projects(ProjectAction::Update),
            Permission::Projects(ProjectAction::Delete),
            Permission::Repairs(RepairAction::Create),
            Permission::Repairs(RepairAction::Read),
            Permission::Repairs(RepairAction::SubmitPhase),
            Permission::Repairs(RepairAction::Review),
        ];

        all.into_iter()
            .filter(|p| Self::role_allows(role, p))
            .map(|p| p.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_display() {
        assert_eq!(
            Permission::Repairs(RepairAction::SubmitPhase).to_string(),
            "repairs:submit_phase"
        );
        assert_eq!(
            Permission::Projects(ProjectAction::Update).to_string(),
            "projects:update"
        );
    }

    #[test]
    fn test_permission_from_string() {
        assert_eq!(
            Permission::from_string("repairs:review"),
            Some(Permission::Repairs(RepairAction::Review))
        );
        assert_eq!(
            Permission::from_string("users:create"),
            Some(Permission::Users(UserAction::Create))
        );
        assert_eq!(Permission::from_string("repairs"), None);
        assert_eq!(Permission::from_string("assets:read"), None);
        assert_eq!(Permission::from_string("repairs:destroy"), None);
    }

    #[test]
    fn test_admin_allows_everything() {
        assert!(PermissionService::role_allows(
            UserRole::Admin,
            &Permission::Users(UserAction::Delete)
        ));
        assert!(PermissionService::role_allows(
            UserRole::Admin,
            &Permission::Repairs(RepairAction::Review)
        ));
    }

    #[test]
    fn test_manager_matrix() {
        assert!(PermissionService::role_allows(
            UserRole::Manager,
            &Permission::Projects(ProjectAction::Create)
        ));
        assert!(PermissionService::role_allows(
            UserRole::Manager,
            &Permission::Repairs(RepairAction::Review)
        ));
        assert!(!PermissionService::role_allows(
            UserRole::Manager,
            &Permission::Users(UserAction::Create)
        ));
        assert!(!PermissionService::role_allows(
            UserRole::Manager,
            &Permission::Repairs(RepairAction::SubmitPhase)
        ));
    }

    #[test]
    fn test_technician_matrix() {
        assert!(PermissionService::role_allows(
            UserRole::Technician,
            &Permission::Repairs(RepairAction::Create)
        ));
        assert!(PermissionService::role_allows(
            UserRole::Technician,
            &Permission::Repairs(RepairAction::SubmitPhase)
        ));
        assert!(!PermissionService::role_allows(
            UserRole::Technician,
            &Permission::Repairs(RepairAction::Review)
        ));
        assert!(!PermissionService::role_allows(
            UserRole::Technician,
            &Permission::Projects(ProjectAction::Update)
        ));
    }

    #[test]
    fn test_client_matrix() {
        assert!(PermissionService::role_allows(
            UserRole::Client,
            &Permission::Repairs(RepairAction::Read)
        ));
        assert!(!PermissionService::role_allows(
            UserRole::Client,
            &Permission::Repairs(RepairAction::Create)
        ));
    }

    #[test]
    fn test_guest_denied_everything() {
        assert!(PermissionService::permissions_for_role(UserRole::Guest).is_empty());
    }

    #[test]
    fn test_permissions_for_role_wire_format() {
        let perms = PermissionService::permissions_for_role(UserRole::Client);
        assert_eq!(perms, vec!["projects:read", "repairs:read"]);
    }
}
