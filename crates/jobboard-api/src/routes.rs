//! API routes.

use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

use crate::auth::{authenticate, require_roles, RoleGuard};
use crate::handlers::applications::{
    apply_for_job, job_applications, my_applications, update_application_status,
};
use crate::handlers::auth::{change_password, login, me, register, update_account};
use crate::handlers::jobs::{create_job, delete_job, get_job, list_jobs, my_jobs, update_job};
use crate::handlers::profiles::{my_profile, public_profile, upsert_profile};
use crate::handlers::users::list_users;
use crate::handlers::{health, ready};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, rate_limit_middleware, request_id, request_logging, security_headers,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    // Role guards sit inside authentication: route layers added later run first.
    let auth_routes = Router::new()
        .route("/me", get(me))
        .route("/profile", put(update_account))
        .route("/change-password", put(change_password))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .route("/register", post(register))
        .route("/login", post(login))
        .layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit_middleware,
        ));

    let job_routes = Router::new()
        .route("/my/jobs", get(my_jobs))
        .route("/", post(create_job))
        .route("/:id", put(update_job).delete(delete_job))
        .route_layer(middleware::from_fn_with_state(RoleGuard::EMPLOYER, require_roles))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
        // Public reads
        .merge(
            Router::new()
                .route("/", get(list_jobs))
                .route("/:id", get(get_job)),
        );

    let seeker_routes = Router::new()
        .route("/my", get(my_applications))
        .route("/jobs/:job_id/apply", post(apply_for_job))
        .route_layer(middleware::from_fn_with_state(RoleGuard::JOBSEEKER, require_roles));

    let reviewer_routes = Router::new()
        .route("/jobs/:job_id", get(job_applications))
        .route("/:id/status", put(update_application_status))
        .route_layer(middleware::from_fn_with_state(RoleGuard::EMPLOYER, require_roles));

    let application_routes = seeker_routes
        .merge(reviewer_routes)
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let profile_routes = Router::new()
        .route("/me", get(my_profile).put(upsert_profile))
        .route("/", post(upsert_profile).put(upsert_profile))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .route("/:user_id", get(public_profile));

    let user_routes = Router::new()
        .route("/", get(list_users))
        .route_layer(middleware::from_fn_with_state(RoleGuard::ADMIN, require_roles))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/jobs", job_routes)
        .nest("/applications", application_routes)
        .nest("/profiles", profile_routes)
        .nest("/users", user_routes);

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(TimeoutLayer::new(state.config.request_timeout))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
