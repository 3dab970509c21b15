//! # Role-Scoped Repair Query Engine
//!
//! Computes the paginated, ordered, role-visible set of repairs for a
//! request.
//!
//! Two execution paths exist, selected by whether any filter targets data
//! embedded inside the phases JSON:
//!
//! 1. **Backend path** — every filter maps to a queryable column, so
//!    pagination, ordering and the exact count are pushed to the database.
//! 2. **In-memory path** — a `repair_types` or `technician_id` filter is
//!    present. Those values live inside the phases document, so the engine
//!    fetches up to [`IN_MEMORY_SCAN_CAP`] role-and-column-filtered, sorted
//!    rows and applies the embedded predicates here. The reported total is
//!    the filtered count, and the result order is the backend order with
//!    non-matching rows removed (no re-sort).

use entity::{
    phases::RepairPhases,
    projects::{Column as ProjectColumn, Entity as ProjectsEntity},
    repairs::{Column as RepairColumn, Entity as RepairsEntity, RepairStatus},
    users::UserRole,
};
use error::{AppError, PaginationMeta, Result};
use sea_orm::{ColumnTrait, DbConn, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use tracing::debug;

use crate::{middleware::auth::AuthenticatedUser, utils::escape_like_wildcards};

/// Safety cap on rows fetched for in-memory filtering.
pub const IN_MEMORY_SCAN_CAP: u64 = 10_000;

/// Sort keys accepted by the list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    CreatedAt,
    UpdatedAt,
    Id,
    Status,
    Project,
}

impl SortBy {
    /// Parse a sort key; unknown values fall back to `created_at`.
    #[must_use]
    pub fn from_string(s: &str) -> Self {
        match s {
            "updated_at" => SortBy::UpdatedAt,
            "id" => SortBy::Id,
            "status" => SortBy::Status,
            "project" => SortBy::Project,
            _ => SortBy::CreatedAt,
        }
    }

    fn column(self) -> RepairColumn {
        match self {
            SortBy::CreatedAt => RepairColumn::CreatedAt,
            SortBy::UpdatedAt => RepairColumn::UpdatedAt,
            SortBy::Id => RepairColumn::Id,
            SortBy::Status => RepairColumn::Status,
            SortBy::Project => RepairColumn::ProjectName,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Parse a sort direction; unknown values fall back to `desc`.
    #[must_use]
    pub fn from_string(s: &str) -> Self {
        match s {
            "asc" => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    fn order(self) -> Order {
        match self {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        }
    }
}

/// Parsed and validated inputs for one list call.
#[derive(Debug, Clone, Default)]
pub struct RepairQuery {
    pub project_id:     Option<String>,
    pub status:         Option<RepairStatus>,
    pub elevation_name: Option<String>,
    pub drop:           Option<i32>,
    pub level:          Option<i32>,
    pub repair_types:   Vec<String>,
    pub technician_id:  Option<String>,
    pub page:           u64,
    pub per_page:       u64,
    pub sort_by:        SortBy,
    pub sort_order:     SortOrder,
}

impl RepairQuery {
    /// Whether any filter targets data embedded in the phases JSON.
    #[must_use]
    pub fn needs_in_memory_path(&self) -> bool {
        !self.repair_types.is_empty() || self.technician_id.is_some()
    }
}

/// The set of projects a caller may see repairs for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectScope {
    /// Admins and managers: no project-based filtering.
    Unrestricted,
    /// Clients and technicians: only these project ids.
    Restricted(Vec<String>),
}

/// Resolve the caller's project scope.
///
/// Clients own projects through `client_id`; technicians are assigned
/// through the roster embedded in the project configuration, so their scope
/// is resolved by scanning the (small) project set.
pub async fn visible_project_ids(db: &DbConn, caller: &AuthenticatedUser) -> Result<ProjectScope> {
    match caller.role {
        UserRole::Admin | UserRole::Manager => Ok(ProjectScope::Unrestricted),
        UserRole::Client => {
            let ids: Vec<String> = ProjectsEntity::find()
                .filter(ProjectColumn::DeletedAt.is_null())
                .filter(ProjectColumn::ClientId.eq(&caller.id))
                .all(db)
                .await
                .map_err(|e| AppError::database(format!("Failed to fetch client projects: {}", e)))?
                .into_iter()
                .map(|p| p.id)
                .collect();
            Ok(ProjectScope::Restricted(ids))
        },
        UserRole::Technician => {
            let ids: Vec<String> = ProjectsEntity::find()
                .filter(ProjectColumn::DeletedAt.is_null())
                .all(db)
                .await
                .map_err(|e| AppError::database(format!("Failed to fetch projects: {}", e)))?
                .into_iter()
                .filter(|p| p.has_technician(&caller.id))
                .map(|p| p.id)
                .collect();
            Ok(ProjectScope::Restricted(ids))
        },
        UserRole::Guest => Ok(ProjectScope::Restricted(Vec::new())),
    }
}

/// True if the repair's survey or any progress phase carries one of the
/// wanted repair types.
#[must_use]
pub fn matches_repair_types(phases: &RepairPhases, wanted: &[String]) -> bool {
    if let Some(survey) = &phases.survey {
        if wanted.iter().any(|w| *w == survey.repair_type) {
            return true;
        }
    }
    phases.progress.iter().flatten().any(|p| {
        p.repair_type
            .as_ref()
            .is_some_and(|rt| wanted.iter().any(|w| w == rt))
    })
}

/// True if any phase of the repair was submitted by the given technician.
#[must_use]
pub fn matches_technician(phases: &RepairPhases, technician_id: &str) -> bool {
    if phases
        .survey
        .as_ref()
        .is_some_and(|s| s.created_by_user_id == technician_id)
    {
        return true;
    }
    if phases
        .progress
        .iter()
        .flatten()
        .any(|p| p.created_by_user_id == technician_id)
    {
        return true;
    }
    phases
        .finish
        .as_ref()
        .is_some_and(|f| f.created_by_user_id == technician_id)
}

/// Apply the JSON-embedded predicates to an already column-filtered row set.
#[must_use]
pub fn filter_embedded(rows: Vec<entity::repairs::Model>, query: &RepairQuery) -> Vec<entity::repairs::Model> {
    rows.into_iter()
        .filter(|r| query.repair_types.is_empty() || matches_repair_types(&r.phases, &query.repair_types))
        .filter(|r| {
            query
                .technician_id
                .as_ref()
                .is_none_or(|t| matches_technician(&r.phases, t))
        })
        .collect()
}

/// Slice one page out of an in-memory filtered set.
///
/// Returns the page items and the total (filtered) count.
#[must_use]
pub fn paginate_slice<T>(items: Vec<T>, page: u64, per_page: u64) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let offset = page.saturating_sub(1).saturating_mul(per_page) as usize;

    let page_items = items
        .into_iter()
        .skip(offset)
        .take(per_page as usize)
        .collect();

    (page_items, total)
}

/// List the repairs visible to `caller` under `query`.
///
/// An empty restricted scope short-circuits to an explicit empty page before
/// any repair query is issued.
pub async fn list_repairs(
    db: &DbConn,
    caller: &AuthenticatedUser,
    query: &RepairQuery,
) -> Result<(Vec<entity::repairs::Model>, PaginationMeta)> {
    let scope = visible_project_ids(db, caller).await?;

    let mut base_query = RepairsEntity::find();

    match &scope {
        ProjectScope::Unrestricted => {},
        ProjectScope::Restricted(ids) if ids.is_empty() => {
            debug!(user_id = %caller.id, role = %caller.role, "Empty project scope, returning empty page");
            return Ok((Vec::new(), PaginationMeta::empty(query.page, query.per_page)));
        },
        ProjectScope::Restricted(ids) => {
            base_query = base_query.filter(RepairColumn::ProjectId.is_in(ids.clone()));
        },
    }

    if let Some(ref project_id) = query.project_id {
        base_query = base_query.filter(RepairColumn::ProjectId.eq(project_id));
    }
    if let Some(status) = query.status {
        base_query = base_query.filter(RepairColumn::Status.eq(status));
    }
    if let Some(ref elevation) = query.elevation_name {
        let pattern = format!("%{}%", escape_like_wildcards(elevation));
        base_query = base_query.filter(RepairColumn::ElevationName.like(&pattern));
    }
    if let Some(drop) = query.drop {
        base_query = base_query.filter(RepairColumn::Drop.eq(drop));
    }
    if let Some(level) = query.level {
        base_query = base_query.filter(RepairColumn::Level.eq(level));
    }

    base_query = base_query.order_by(query.sort_by.column(), query.sort_order.order());

    if query.needs_in_memory_path() {
        // Embedded-field filters cannot be pushed to the backend: fetch the
        // capped candidate set and filter here. Total reflects the filtered
        // count, not the backend count.
        let rows = base_query
            .limit(IN_MEMORY_SCAN_CAP)
            .all(db)
            .await
            .map_err(|e| AppError::database(format!("Failed to fetch repairs: {}", e)))?;

        let filtered = filter_embedded(rows, query);
        let (items, total) = paginate_slice(filtered, query.page, query.per_page);

        Ok((items, PaginationMeta::new(query.page, query.per_page, total)))
    }
    else {
        let total = base_query
            .clone()
            .count(db)
            .await
            .map_err(|e| AppError::database(format!("Failed to count repairs: {}", e)))?;

        let items = base_query
            .paginate(db, query.per_page)
            .fetch_page(query.page.saturating_sub(1))
            .await
            .map_err(|e| AppError::database(format!("Failed to fetch repairs: {}", e)))?;

        Ok((items, PaginationMeta::new(query.page, query.per_page, total)))
    }
}
