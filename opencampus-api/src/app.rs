/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with all
/// routes and middleware.
///
/// # Example
///
/// ```no_run
/// use opencampus_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = opencampus_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use opencampus_shared::access::{ExecutionContext, RoleResolver};
use opencampus_shared::auth::jwt;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Uses Arc
/// internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                                  # Health check (public)
/// ├── /v1/
/// │   ├── /auth/                               # register, login, refresh (public)
/// │   ├── /projects|courses|lessons|tasks      # Scoped content (authenticated)
/// │   ├── /usage                               # Own usage counters (authenticated)
/// │   └── /admin/                              # Admin-only
/// │       ├── /users/:id/usage[/recount]
/// │       ├── /users/:id/roles, /permissions
/// │       └── /analytics/*
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Execution context (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    // Content routes (authenticated; scoping comes from the execution context)
    let content_routes = Router::new()
        .route("/projects", get(routes::content::list_projects))
        .route("/projects", post(routes::content::create_project))
        .route("/courses", get(routes::content::list_courses))
        .route("/courses", post(routes::content::create_course))
        .route("/lessons", get(routes::content::list_lessons))
        .route("/lessons", post(routes::content::create_lesson))
        .route("/tasks", get(routes::content::list_tasks))
        .route("/tasks", post(routes::content::create_task))
        .route("/usage", get(routes::usage::my_usage));

    // Admin routes (authenticated + admin check in handlers)
    let admin_routes = Router::new()
        .route("/users/:id/usage", get(routes::usage::user_usage))
        .route("/users/:id/usage/recount", post(routes::usage::recount))
        .route("/users/:id/roles", get(routes::roles::list_user_roles))
        .route("/users/:id/roles", post(routes::roles::assign_role))
        .route("/users/:id/roles", put(routes::roles::sync_roles))
        .route("/users/:id/roles/:role", delete(routes::roles::remove_role))
        .route("/users/:id/permissions", get(routes::roles::list_permissions))
        .route("/analytics/summary", get(routes::analytics::summary))
        .route("/analytics/trends", get(routes::analytics::trends))
        .route("/analytics/funnel", get(routes::analytics::funnel))
        .route("/analytics/churn", get(routes::analytics::churn))
        .route("/analytics/engagement", get(routes::analytics::engagement))
        .route("/analytics/daily-active", get(routes::analytics::daily_active))
        .route("/analytics/cohorts", get(routes::analytics::cohorts))
        .route("/analytics/export", get(routes::analytics::export));

    let authenticated = Router::new()
        .merge(content_routes)
        .nest("/admin", admin_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            context_layer,
        ));

    let v1_routes = Router::new().nest("/auth", auth_routes).merge(authenticated);

    let cors = cors_layer(&state.config.api.cors_origins);

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// CORS policy from configuration
///
/// The single origin "*" selects the permissive development policy;
/// anything else is an explicit allow list with credentials enabled.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Execution context middleware
///
/// Validates the bearer token and injects an [`ExecutionContext`] into
/// request extensions. Admin status is resolved from role assignments here,
/// once per request; handlers never consult ambient state.
async fn context_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| crate::error::ApiError::BadRequest("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    let resolver = RoleResolver::new(state.db.clone());
    let is_admin = resolver.is_admin(claims.sub).await?;

    let ctx = ExecutionContext::principal(claims.sub, is_admin);
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}
