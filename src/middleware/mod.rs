//! Middleware guarding protected routes.

pub mod auth;

pub use auth::require_access;
