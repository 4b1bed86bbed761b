//! Access gate: validates the bearer credential before the wrapped handler runs.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tracing::debug;

use crate::error::AppError;
use crate::handlers::http::AppState;

/// Middleware: run the authorization check and hand the bound `Identity` to the handler
/// through request extensions. Use with `axum::middleware::from_fn_with_state`.
pub async fn require_access(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = request.into_parts();
    let credential =
        match TypedHeader::<Authorization<Bearer>>::from_request_parts(&mut parts, &state).await {
            Ok(TypedHeader(auth)) => Some(auth.token().to_string()),
            Err(rejection) if rejection.is_missing() => None,
            Err(_) => {
                debug!("rejected request: malformed Authorization header");
                return Err(AppError::InvalidCredential);
            }
        };

    let identity = state.accounts().authorize(credential.as_deref())?;
    parts.extensions.insert(identity);
    Ok(next.run(Request::from_parts(parts, body)).await)
}
