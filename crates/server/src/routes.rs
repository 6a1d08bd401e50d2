use axum::{
    routing::{get, post},
    Json, Router,
};
use models::{Department, Service, User};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod admin;
pub mod public;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/departments", get(admin::list::<Department>).post(admin::create::<Department>))
        .route(
            "/admin/departments/:id",
            get(admin::get_one::<Department>).put(admin::update::<Department>).delete(admin::delete::<Department>),
        )
        .route("/admin/services", get(admin::list::<Service>).post(admin::create::<Service>))
        .route(
            "/admin/services/:id",
            get(admin::get_one::<Service>).put(admin::update::<Service>).delete(admin::delete::<Service>),
        )
        .route("/admin/users", get(admin::list::<User>).post(admin::create::<User>))
        .route(
            "/admin/users/:id",
            get(admin::get_one::<User>).put(admin::update::<User>).delete(admin::delete::<User>),
        )
}

/// Build the full application router: health, public site endpoints, admin editors.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/api/services", get(public::services))
        .route("/api/contact", post(public::contact))
        .route("/api/forgot-password", post(public::forgot_password))
        .route("/api/suggestions", post(public::suggestions));

    // 每次请求创建 span；响应时记录状态码与耗时，失败以 ERROR 记录
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
        .on_failure(DefaultOnFailure::new().level(Level::ERROR));

    public
        .merge(admin_routes())
        .with_state(state)
        .layer(ServiceBuilder::new().layer(trace).layer(cors))
}
