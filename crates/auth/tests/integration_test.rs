//! Integration tests for the auth crate public surface.

use auth::{IdentityResolver, Permission, PermissionService, RepairAction, ResolvedIdentity, StaticIdentityResolver};
use entity::users::UserRole;

#[test]
fn test_review_is_staff_only() {
    let review = Permission::Repairs(RepairAction::Review);
    assert!(PermissionService::role_allows(UserRole::Admin, &review));
    assert!(PermissionService::role_allows(UserRole::Manager, &review));
    assert!(!PermissionService::role_allows(UserRole::Technician, &review));
    assert!(!PermissionService::role_allows(UserRole::Client, &review));
    assert!(!PermissionService::role_allows(UserRole::Guest, &review));
}

#[test]
fn test_wire_format_round_trip() {
    for role in [UserRole::Admin, UserRole::Manager, UserRole::Technician, UserRole::Client] {
        for perm in PermissionService::permissions_for_role(role) {
            let parsed = Permission::from_string(&perm).expect("wire format should parse back");
            assert_eq!(parsed.to_string(), perm);
        }
    }
}

#[tokio::test]
async fn test_resolver_drives_permission_check() {
    let resolver = StaticIdentityResolver::new().with_identity(
        "ext-uid-77",
        ResolvedIdentity {
            user_id:   "usr_tech".to_string(),
            email:     "tech@example.com".to_string(),
            full_name: "Sam Rigger".to_string(),
            role:      UserRole::Technician,
        },
    );

    let identity = resolver.resolve("ext-uid-77").await.unwrap().unwrap();
    assert!(PermissionService::role_allows(
        identity.role,
        &Permission::Repairs(RepairAction::SubmitPhase)
    ));
    assert!(!PermissionService::role_allows(
        identity.role,
        &Permission::Repairs(RepairAction::Review)
    ));
}
