use crate::application::PlanError;
use crate::domain::UserType;
use axum::http::StatusCode;

/// Not-found and validation messages go back verbatim; store failures are
/// logged by the service and reported generically.
pub(super) fn map_plan_error(err: &PlanError) -> (StatusCode, serde_json::Value) {
    match err {
        PlanError::NotFound(msg) => (StatusCode::NOT_FOUND, serde_json::json!({ "error": msg })),
        PlanError::InvalidPlan(_) => (
            StatusCode::BAD_REQUEST,
            serde_json::json!({
                "error": err.to_string(),
                "allowed": UserType::allowed_names(),
            }),
        ),
        PlanError::InvalidAmount(_) => (
            StatusCode::BAD_REQUEST,
            serde_json::json!({ "error": err.to_string() }),
        ),
        PlanError::Persistence(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({ "error": format!("Failed to update agent: {}", e) }),
        ),
    }
}
