//! Integration tests for the error crate public surface.

use error::{ApiResponse, AppError, ErrorHandler, PaginationMeta, Result, ResultExt};

#[test]
fn test_result_alias_defaults_to_app_error() {
    fn lookup(found: bool) -> Result<&'static str> {
        if found {
            Ok("rep_1")
        }
        else {
            Err(AppError::not_found("Repair not found"))
        }
    }

    assert_eq!(lookup(true).unwrap(), "rep_1");
    assert_eq!(lookup(false).unwrap_err().code(), "NOT_FOUND");
}

#[test]
fn test_status_mapping_covers_review_flow() {
    // The statuses a repair review round-trip can produce.
    assert_eq!(AppError::unauthorized("no token").status().as_u16(), 401);
    assert_eq!(AppError::forbidden("technicians cannot review").status().as_u16(), 403);
    assert_eq!(AppError::not_found("repair").status().as_u16(), 404);
    assert_eq!(AppError::conflict("concurrent phase write").status().as_u16(), 409);
    assert_eq!(AppError::validation("unknown elevation").status().as_u16(), 422);
    assert_eq!(AppError::database("connection lost").status().as_u16(), 500);
}

#[test]
fn test_error_envelope_shape() {
    let response: ApiResponse<()> = ApiResponse::error("VALIDATION_ERROR", "phases must be between 3 and 10");
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["success"], serde_json::json!(false));
    assert_eq!(json["code"], serde_json::json!("VALIDATION_ERROR"));
    assert!(json["message"].as_str().unwrap().contains("3 and 10"));
}

#[test]
fn test_handler_strips_database_detail() {
    let handler = ErrorHandler::new(false);
    let response = handler.to_response(&AppError::database("dsn=postgres://secret"));
    assert_eq!(response.status().as_u16(), 500);
}

#[test]
fn test_context_chains_through_results() {
    let base: std::result::Result<(), sea_orm::DbErr> = Err(sea_orm::DbErr::Custom("deadlock".to_string()));
    let err = base.context("Failed to fetch repairs").unwrap_err();

    assert_eq!(err.code(), "DATABASE_ERROR");
    assert!(err.message().starts_with("Failed to fetch repairs"));
}

#[test]
fn test_pagination_invariant() {
    // total_pages == ceil(total / per_page) for a spread of values
    for (total, per_page, expected) in [(0u64, 20u64, 0u64), (1, 20, 1), (20, 20, 1), (21, 20, 2), (45, 20, 3)] {
        let meta = PaginationMeta::new(1, per_page, total);
        assert_eq!(meta.total_pages, expected, "total={} per_page={}", total, per_page);
    }
}
