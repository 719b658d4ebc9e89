use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put, MethodRouter},
    Router,
};
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    trace::TraceLayer,
};

use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::{enforce_rate_limit, error_boundary, panic_response, require_auth, FixedWindowLimiter};
use crate::state::AppState;

/// Multipart framing allowance on top of the largest accepted CV.
const UPLOAD_OVERHEAD_BYTES: usize = 64 * 1024;

/// Builds the complete router with all layers applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(public::system::root))
        .route("/health", get(public::system::health))
        .nest("/auth", auth_routes(&state))
        .nest("/api/auth", auth_routes(&state))
        .merge(article_routes(&state))
        .merge(project_routes(&state))
        .merge(job_history_routes(&state))
        .merge(cv_routes(&state))
        .fallback(not_found)
        // Global middleware, outermost last
        .layer(DefaultBodyLimit::max(state.config.server.max_request_size_bytes))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors_layer(&state.config.security.cors_origins))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn_with_state(state.clone(), error_boundary))
        .with_state(state)
}

fn limited(route: MethodRouter<AppState>, limiter: &Arc<FixedWindowLimiter>) -> MethodRouter<AppState> {
    route.route_layer(from_fn_with_state(limiter.clone(), enforce_rate_limit))
}

fn protected_route(route: MethodRouter<AppState>, state: &AppState) -> MethodRouter<AppState> {
    route.route_layer(from_fn_with_state(state.clone(), require_auth))
}

fn auth_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/login",
            limited(post(public::auth::login_post), &state.limiters.login),
        )
        .route("/logout", protected_route(post(protected::auth::logout_post), state))
        .route("/me", protected_route(get(protected::auth::me_get), state))
}

fn article_routes(state: &AppState) -> Router<AppState> {
    let public_limiter = &state.limiters.public;

    Router::new()
        .route(
            "/api/articles",
            limited(get(public::articles::list_published), public_limiter)
                .merge(protected_route(post(protected::articles::create), state)),
        )
        .route("/api/articles/all", protected_route(get(protected::articles::list_all), state))
        // GET resolves by slug, PUT/DELETE by numeric id
        .route(
            "/api/articles/:article",
            limited(get(public::articles::get_by_slug), public_limiter).merge(protected_route(
                put(protected::articles::update).delete(protected::articles::delete),
                state,
            )),
        )
}

fn project_routes(state: &AppState) -> Router<AppState> {
    let public_limiter = &state.limiters.public;

    Router::new()
        .route(
            "/api/projects",
            limited(get(public::projects::list), public_limiter)
                .merge(protected_route(post(protected::projects::create), state)),
        )
        .route(
            "/api/projects/:id",
            limited(get(public::projects::get_by_id), public_limiter).merge(protected_route(
                put(protected::projects::update).delete(protected::projects::delete),
                state,
            )),
        )
}

fn job_history_routes(state: &AppState) -> Router<AppState> {
    let public_limiter = &state.limiters.public;

    Router::new()
        .route(
            "/api/jobhistory",
            limited(get(public::job_history::list), public_limiter)
                .merge(protected_route(post(protected::job_history::create), state)),
        )
        .route(
            "/api/jobhistory/:id",
            limited(get(public::job_history::get_by_id), public_limiter).merge(protected_route(
                put(protected::job_history::update).delete(protected::job_history::delete),
                state,
            )),
        )
}

fn cv_routes(state: &AppState) -> Router<AppState> {
    let public_limiter = &state.limiters.public;
    let upload = post(protected::cv::upload)
        .layer(DefaultBodyLimit::max(protected::cv::MAX_CV_BYTES + UPLOAD_OVERHEAD_BYTES));

    Router::new()
        .route(
            "/api/cv",
            limited(get(public::cv::info), public_limiter).merge(protected_route(upload, state)),
        )
        .route("/api/cv/download", limited(get(public::cv::download), public_limiter))
        .route("/api/cv/:id", protected_route(delete(protected::cv::delete), state))
}

/// Credentialed CORS for the configured frontend origins.
///
/// Headers and methods are mirrored from the preflight because wildcards are
/// not allowed together with credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_credentials(true)
        .allow_headers(AllowHeaders::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
}

async fn not_found() -> ApiError {
    ApiError::not_found("The requested resource was not found.")
}
