//! Access credential issue and validation (HS256 JWT).

use crate::clock::Clock;
use crate::error::{AppError, AppResult};
use crate::models::{AccessCredential, Identity};
use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,   // account email
    pub exp: i64,
    pub iat: i64,
}

#[derive(Clone)]
pub struct JwtSecret {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtSecret {
    pub fn new(secret: &str, lifetime: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
            clock,
        }
    }

    pub fn issue(&self, email: &str) -> AppResult<AccessCredential> {
        let now = self.clock.now();
        let expires_at = now + self.lifetime;
        let claims = Claims {
            sub: email.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("sign credential: {}", e)))?;
        Ok(AccessCredential {
            token,
            issued_at: now,
            expires_at,
        })
    }

    /// Checks signature and shape, then expiry against the injected clock.
    pub fn validate(&self, token: &str) -> AppResult<Identity> {
        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is judged below, against our clock rather than the library's
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            debug!(error = %e, "credential rejected");
            AppError::InvalidCredential
        })?;

        if data.claims.exp <= self.clock.now().timestamp() {
            return Err(AppError::ExpiredCredential);
        }
        Ok(Identity {
            email: data.claims.sub,
        })
    }
}
