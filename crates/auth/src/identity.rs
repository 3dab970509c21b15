//! # Identity Resolution
//!
//! The external identity provider authenticates requests and hands us an
//! opaque auth uid inside the JWT. Every role-scoped query needs the internal
//! user id and role behind that uid, so the mapping is modeled as an explicit
//! port rather than an inline lookup in each handler.

use std::collections::HashMap;

use async_trait::async_trait;
use entity::users::{Column as UserColumn, Entity as UsersEntity, UserRole, UserStatus};
use error::Result;
use sea_orm::{ColumnTrait, DbConn, EntityTrait, QueryFilter};

/// The internal identity behind an external auth uid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    /// Internal user id (`usr_` prefixed).
    pub user_id:   String,
    /// User email.
    pub email:     String,
    /// Display name, denormalized onto phase submissions.
    pub full_name: String,
    /// Role driving the permission matrix and visibility scoping.
    pub role:      UserRole,
}

/// Maps an external auth uid to an internal user.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve an auth uid. `Ok(None)` means the uid is authenticated but has
    /// no active internal user, which callers must treat as unauthorized.
    async fn resolve(&self, auth_uid: &str) -> Result<Option<ResolvedIdentity>>;
}

/// Database-backed resolver over the users table.
///
/// Inactive and soft-deleted users do not resolve.
#[derive(Clone)]
pub struct SeaOrmIdentityResolver {
    db: DbConn,
}

impl SeaOrmIdentityResolver {
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
        }
    }
}

#[async_trait]
impl IdentityResolver for SeaOrmIdentityResolver {
    async fn resolve(&self, auth_uid: &str) -> Result<Option<ResolvedIdentity>> {
        let user = UsersEntity::find()
            .filter(UserColumn::AuthUid.eq(auth_uid))
            .filter(UserColumn::DeletedAt.is_null())
            .filter(UserColumn::Status.eq(UserStatus::Active))
            .one(&self.db)
            .await?;

        Ok(user.map(|u| {
            ResolvedIdentity {
                user_id:   u.id,
                email:     u.email,
                full_name: u.full_name,
                role:      u.role,
            }
        }))
    }
}

/// In-memory resolver for tests.
#[derive(Default, Clone)]
pub struct StaticIdentityResolver {
    identities: HashMap<String, ResolvedIdentity>,
}

impl StaticIdentityResolver {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Register an identity under an auth uid.
    #[must_use]
    pub fn with_identity(mut self, auth_uid: &str, identity: ResolvedIdentity) -> Self {
        self.identities.insert(auth_uid.to_string(), identity);
        self
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentityResolver {
    async fn resolve(&self, auth_uid: &str) -> Result<Option<ResolvedIdentity>> {
        Ok(self.identities.get(auth_uid).cloned())
    }
}
