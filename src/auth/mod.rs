//! Authentication: password and token primitives, access credentials, HTTP handlers.

mod handlers;
mod jwt;
mod service;

pub use handlers::{login, register, verify_email};
pub use jwt::{Claims, JwtSecret};
pub use service::{normalize_email, AuthAppService};
