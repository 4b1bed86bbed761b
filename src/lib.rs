//! Account registration, email verification and bearer-token login.
//!
//! Accounts are created unverified with a single-use, time-boxed token that is mailed
//! out through a dispatcher; login checks the stored Argon2 hash and issues a signed,
//! stateless access credential that protected routes validate on every request.

pub mod auth;
pub mod clock;
pub mod config;
pub mod db;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult, ErrorKind};
pub use handlers::http::AppState;
pub use services::{AccountPolicy, AccountService};

use axum::routing::{get, post};
use handlers::http;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the API router (register, verify, login, protected, health).
/// Used by main and by integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    let protected_routes = axum::Router::new()
        .route("/protected", get(http::protected))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_access,
        ));

    axum::Router::new()
        .route("/register", post(auth::register))
        .route("/verify_email/:token", get(auth::verify_email))
        .route("/login", post(auth::login))
        .route("/health", get(http::health))
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
