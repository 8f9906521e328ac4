use super::http_auth::is_admin_authorized;
use super::http_errors::map_plan_error;
use super::http_types::{
    AddCreditsRequest, AgentSummary, BlacklistRequest, ChangePlanRequest, ChangeResponse,
    HealthResponse, LookupParams, PlanResponse,
};
use super::state::AppState;
use crate::domain::UserType;
use axum::{
    extract::{Query, State},
    http::{header::HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use validator::Validate;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/plans", get(list_plans))
        .route("/agents/lookup", get(lookup_agent))
        .route("/agents/plan", post(change_plan))
        .route("/agents/credits", post(add_credits))
        .route("/agents/blacklist", post(toggle_blacklist))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        list_plans,
        lookup_agent,
        change_plan,
        add_credits,
        toggle_blacklist,
    ),
    components(
        schemas(
            HealthResponse,
            PlanResponse,
            AgentSummary,
            ChangePlanRequest,
            AddCreditsRequest,
            BlacklistRequest,
            ChangeResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Plans", description = "Subscription plan catalog"),
        (name = "Agents", description = "Agent plan, credit and blacklist management"),
    ),
    info(
        title = "Agent Plans API",
        version = "0.1.0",
        description = "Operator API for agent subscription plans, credits and blacklisting",
        license(name = "MIT")
    )
)]
struct ApiDoc;

fn unauthorized() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "error": "Unauthorized" })),
    )
}

fn invalid_request(e: validator::ValidationErrors) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": "Invalid request", "details": e.to_string() })),
    )
}

/// Health check endpoint
///
/// Verifies database connectivity.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse)
    )
)]
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match sqlx::query("SELECT 1").fetch_one(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                error: None,
            }),
        ),
        Err(e) => {
            error!(error = %e, "Health check failed: DB connectivity issue");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unhealthy".to_string(),
                    error: Some("Database connectivity failed".to_string()),
                }),
            )
        }
    }
}

#[utoipa::path(
    get,
    path = "/plans",
    tag = "Plans",
    responses((status = 200, description = "Available plans", body = [PlanResponse]))
)]
async fn list_plans() -> impl IntoResponse {
    let plans: Vec<PlanResponse> = UserType::catalog().into_iter().map(Into::into).collect();
    Json(plans)
}

#[utoipa::path(
    get,
    path = "/agents/lookup",
    tag = "Agents",
    params(LookupParams),
    responses(
        (status = 200, description = "Agent found", body = AgentSummary),
        (status = 404, description = "No agent with that phone number", body = Object),
        (status = 500, description = "Lookup failed", body = Object)
    )
)]
async fn lookup_agent(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> impl IntoResponse {
    match state.admin.lookup_agent_by_phone(&params.phone).await {
        Ok(agent) => (
            StatusCode::OK,
            Json(serde_json::json!(AgentSummary::new(
                agent,
                state.admin.display_zone()
            ))),
        ),
        Err(e) => {
            let (status, body) = map_plan_error(&e);
            (status, Json(body))
        }
    }
}

#[utoipa::path(
    post,
    path = "/agents/plan",
    tag = "Agents",
    request_body = ChangePlanRequest,
    responses(
        (status = 200, description = "Plan updated", body = ChangeResponse),
        (status = 400, description = "Invalid plan", body = Object),
        (status = 401, description = "Missing or wrong admin token", body = Object),
        (status = 404, description = "No agent with that phone number", body = Object),
        (status = 500, description = "Failed to update agent", body = Object)
    )
)]
async fn change_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ChangePlanRequest>,
) -> impl IntoResponse {
    if !is_admin_authorized(&headers, &state.admin_token) {
        warn!("Rejected unauthorized plan change");
        return unauthorized();
    }
    if let Err(e) = req.validate() {
        return invalid_request(e);
    }

    match state
        .admin
        .change_plan(&req.phone_number, &req.plan, Utc::now())
        .await
    {
        Ok(change) => (
            StatusCode::OK,
            Json(serde_json::json!(ChangeResponse::from(change))),
        ),
        Err(e) => {
            let (status, body) = map_plan_error(&e);
            (status, Json(body))
        }
    }
}

#[utoipa::path(
    post,
    path = "/agents/credits",
    tag = "Agents",
    request_body = AddCreditsRequest,
    responses(
        (status = 200, description = "Credits added", body = ChangeResponse),
        (status = 400, description = "Invalid amount", body = Object),
        (status = 401, description = "Missing or wrong admin token", body = Object),
        (status = 404, description = "No agent with that phone number", body = Object),
        (status = 500, description = "Failed to update agent", body = Object)
    )
)]
async fn add_credits(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<AddCreditsRequest>,
) -> impl IntoResponse {
    if !is_admin_authorized(&headers, &state.admin_token) {
        warn!("Rejected unauthorized credit addition");
        return unauthorized();
    }
    if let Err(e) = req.validate() {
        return invalid_request(e);
    }

    match state
        .admin
        .add_credits(&req.phone_number, req.amount, Utc::now())
        .await
    {
        Ok(change) => (
            StatusCode::OK,
            Json(serde_json::json!(ChangeResponse::from(change))),
        ),
        Err(e) => {
            let (status, body) = map_plan_error(&e);
            (status, Json(body))
        }
    }
}

#[utoipa::path(
    post,
    path = "/agents/blacklist",
    tag = "Agents",
    request_body = BlacklistRequest,
    responses(
        (status = 200, description = "Blacklist flag toggled", body = ChangeResponse),
        (status = 401, description = "Missing or wrong admin token", body = Object),
        (status = 404, description = "No agent with that phone number", body = Object),
        (status = 500, description = "Failed to update agent", body = Object)
    )
)]
async fn toggle_blacklist(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<BlacklistRequest>,
) -> impl IntoResponse {
    if !is_admin_authorized(&headers, &state.admin_token) {
        warn!("Rejected unauthorized blacklist toggle");
        return unauthorized();
    }
    if let Err(e) = req.validate() {
        return invalid_request(e);
    }

    match state
        .admin
        .toggle_blacklist(&req.phone_number, Utc::now())
        .await
    {
        Ok(change) => (
            StatusCode::OK,
            Json(serde_json::json!(ChangeResponse::from(change))),
        ),
        Err(e) => {
            let (status, body) = map_plan_error(&e);
            (status, Json(body))
        }
    }
}
