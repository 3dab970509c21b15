//! Role-scoping and filter-engine tests over a mock database.

mod common;

use common::{caller, init_test_env, project_fixture, repair_fixture};
use entity::{repairs::RepairStatus, users::UserRole};
use sea_orm::{DatabaseBackend, MockDatabase};
use server::repair_query::{
    filter_embedded,
    list_repairs,
    matches_repair_types,
    paginate_slice,
    visible_project_ids,
    ProjectScope,
    RepairQuery,
};

#[tokio::test]
async fn test_scenario_d_client_with_no_projects_short_circuits() {
    // A client owning no projects gets an explicit empty page, and no repair
    // query is ever issued against the backend.
    init_test_env();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<entity::projects::Model>::new()])
        .into_connection();

    let client = caller("usr_c9", UserRole::Client);
    let query = RepairQuery {
        page: 1,
        per_page: 20,
        ..Default::default()
    };

    let (items, pagination) = list_repairs(&db, &client, &query).await.unwrap();

    assert!(items.is_empty());
    assert_eq!(pagination.total, 0);
    assert_eq!(pagination.page, 1);
    assert_eq!(pagination.per_page, 20);
    assert_eq!(pagination.total_pages, 0);

    // Only the owned-projects lookup hit the store.
    let log = db.into_transaction_log();
    assert_eq!(log.len(), 1);
}

#[tokio::test]
async fn test_scenario_c_in_memory_filter_counts_filtered_set() {
    // A manager filters status=pending, repair_types=[Crack]: the reported
    // total is the in-memory filtered count, not the raw backend count.
    init_test_env();

    // The backend-filtered, sorted candidate set (status already pending).
    let candidates = vec![
        repair_fixture("rep_1", 1, RepairStatus::Pending, "Crack", "usr_t1"),
        repair_fixture("rep_2", 2, RepairStatus::Pending, "Spalling", "usr_t1"),
        repair_fixture("rep_3", 3, RepairStatus::Pending, "Crack", "usr_t2"),
    ];

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([candidates])
        .into_connection();

    let manager = caller("usr_m1", UserRole::Manager);
    let query = RepairQuery {
        status: Some(RepairStatus::Pending),
        repair_types: vec!["Crack".to_string()],
        page: 1,
        per_page: 20,
        ..Default::default()
    };

    let (items, pagination) = list_repairs(&db, &manager, &query).await.unwrap();

    assert_eq!(pagination.total, 2);
    assert_eq!(pagination.total_pages, 1);
    assert_eq!(items.len(), 2);
    for item in &items {
        assert_eq!(item.status, RepairStatus::Pending);
        assert!(matches_repair_types(&item.phases, &["Crack".to_string()]));
    }
}

#[tokio::test]
async fn test_list_is_idempotent_against_unchanged_store() {
    init_test_env();
    let rows = || {
        vec![
            repair_fixture("rep_1", 1, RepairStatus::Pending, "Crack", "usr_t1"),
            repair_fixture("rep_2", 2, RepairStatus::Pending, "Crack", "usr_t1"),
        ]
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([rows()])
        .append_query_results([rows()])
        .into_connection();

    let manager = caller("usr_m1", UserRole::Manager);
    let query = RepairQuery {
        repair_types: vec!["Crack".to_string()],
        page: 1,
        per_page: 20,
        ..Default::default()
    };

    let (first_items, first_meta) = list_repairs(&db, &manager, &query).await.unwrap();
    let (second_items, second_meta) = list_repairs(&db, &manager, &query).await.unwrap();

    assert_eq!(first_items, second_items);
    assert_eq!(first_meta, second_meta);
}

#[tokio::test]
async fn test_technician_scope_resolved_from_roster() {
    init_test_env();
    let assigned = project_fixture("prj_1", "usr_c1", "usr_t1");
    let unassigned = project_fixture("prj_2", "usr_c1", "usr_other");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![assigned, unassigned]])
        .into_connection();

    let technician = caller("usr_t1", UserRole::Technician);
    let scope = visible_project_ids(&db, &technician).await.unwrap();

    assert_eq!(scope, ProjectScope::Restricted(vec!["prj_1".to_string()]));
}

#[tokio::test]
async fn test_staff_scope_is_unrestricted() {
    init_test_env();
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    for role in [UserRole::Admin, UserRole::Manager] {
        let scope = visible_project_ids(&db, &caller("usr_s", role)).await.unwrap();
        assert_eq!(scope, ProjectScope::Unrestricted);
    }
}

#[tokio::test]
async fn test_guest_scope_is_empty() {
    init_test_env();
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let scope = visible_project_ids(&db, &caller("usr_g", UserRole::Guest)).await.unwrap();
    assert_eq!(scope, ProjectScope::Restricted(vec![]));
}

#[test]
fn test_pagination_invariant_over_filtered_sets() {
    // len(items) == min(per_page, total - (page-1)*per_page) clamped to 0.
    init_test_env();
    let rows: Vec<entity::repairs::Model> = (1 ..= 45)
        .map(|i| repair_fixture(&format!("rep_{}", i), i, RepairStatus::Pending, "Crack", "usr_t1"))
        .collect();

    let query = RepairQuery {
        repair_types: vec!["Crack".to_string()],
        ..Default::default()
    };
    let filtered = filter_embedded(rows, &query);

    for (page, expected_len) in [(1u64, 20usize), (2, 20), (3, 5), (4, 0)] {
        let (items, total) = paginate_slice(filtered.clone(), page, 20);
        assert_eq!(total, 45);
        assert_eq!(items.len(), expected_len, "page {}", page);
    }
}

#[test]
fn test_technician_filter_matches_any_phase_attribution() {
    init_test_env();
    let mut finished = repair_fixture("rep_f", 1, RepairStatus::Pending, "Crack", "usr_a");
    finished.phases.finish = Some(entity::phases::FinishPhase {
        comments:             String::new(),
        photos:               Vec::new(),
        created_by_user_id:   "usr_b".to_string(),
        created_by_user_name: "Other Tech".to_string(),
        created_at:           "2026-03-03T08:00:00Z".to_string(),
    });

    let rows = vec![
        finished,
        repair_fixture("rep_s", 2, RepairStatus::Pending, "Crack", "usr_a"),
    ];

    let query = RepairQuery {
        technician_id: Some("usr_b".to_string()),
        ..Default::default()
    };

    let matched = filter_embedded(rows, &query);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].id, "rep_f");
}
