//! # Authorization Service
//!
//! Role and permission handling for Plumbline:
//! - Static role → permission matrix
//! - Role lookups against the users table
//! - The [`IdentityResolver`] port mapping external auth uids to internal users
//!
//! Authentication itself (token issuance and validation) lives with the
//! external identity provider; only JWT validation and uid resolution are
//! handled inside this application.

pub mod identity;
pub mod permissions;
pub mod roles;

// Re-export commonly used types
pub use identity::{IdentityResolver, ResolvedIdentity, SeaOrmIdentityResolver, StaticIdentityResolver};
pub use permissions::{Permission, PermissionService, ProjectAction, RepairAction, UserAction};
pub use roles::{get_user_role, is_staff};
