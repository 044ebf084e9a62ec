/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tickoff_api::{app::{build_router, AppState}, config::Config};
/// use tickoff_shared::store::memory::MemoryStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(MemoryStore::new()), config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, patch, post},
    Router,
};
use chrono::Duration;
use std::sync::Arc;
use tickoff_shared::{
    auth::{
        cookie::CookieConfig,
        jwt::TokenSigner,
        middleware::{cookie_auth, AuthGate},
    },
    store::Store,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Everything inside is behind an `Arc` and read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Users and todos
    pub store: Arc<dyn Store>,

    /// Application configuration
    pub config: Arc<Config>,

    /// Issues and verifies identity tokens
    pub tokens: Arc<TokenSigner>,

    /// Attributes of the credential cookie
    pub cookie: CookieConfig,
}

impl AppState {
    /// Creates new application state
    ///
    /// The token signer and the cookie attributes are both derived from
    /// `config.auth`, so a configured TTL bounds the token and the cookie alike.
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        let ttl = config.auth.token_ttl_seconds;
        let tokens = TokenSigner::new(&config.auth.secret, ttl.map(Duration::seconds));

        let cookie = CookieConfig {
            secure: config.api.cookie_secure,
            max_age_secs: ttl,
            ..CookieConfig::default()
        };

        Self {
            store,
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            cookie,
        }
    }

    /// Auth gate reading this app's credential cookie
    pub fn auth_gate(&self) -> AuthGate {
        AuthGate::new(self.tokens.clone()).with_cookie_name(self.cookie.name.clone())
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /api
/// ├── GET    /test               # Liveness text (public)
/// ├── GET    /health             # Store connectivity (public)
/// ├── POST   /register           # Create account (public)
/// ├── POST   /login              # Mint token, set cookie (public)
/// ├── POST   /logout             # Clear cookie (public)
/// ├── PATCH  /update             # Update own profile (cookie)
/// ├── DELETE /update             # Delete own account (cookie)
/// ├── POST   /todos              # Create todo (cookie)
/// ├── GET    /todos              # List own todos (cookie)
/// ├── PATCH  /todos/:todo_id     # Update owned todo (cookie)
/// └── DELETE /todos/:todo_id     # Delete owned todo (cookie)
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Cookie authentication (protected routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/test", get(routes::health::test))
        .route("/health", get(routes::health::health_check))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout));

    // Everything below requires a valid `token` cookie
    let protected_routes = Router::new()
        .route(
            "/update",
            patch(routes::users::update_user).delete(routes::users::delete_user),
        )
        .route(
            "/todos",
            post(routes::todos::create_todo).get(routes::todos::list_todos),
        )
        .route(
            "/todos/:todo_id",
            patch(routes::todos::update_todo).delete(routes::todos::delete_todo),
        )
        .route_layer(middleware::from_fn_with_state(
            state.auth_gate(),
            cookie_auth,
        ));

    let cors = cors_layer(&state.config.api.cors_origins);

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// CORS policy for the configured origins
///
/// `*` is the development mode: any origin, no credentials. Explicit origins
/// may send the credential cookie.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
