use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::user_models::AuthUser;
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub id: String,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

/// Issues and verifies HS256 bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    secret: Option<String>,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(secret: Option<String>, lifetime: Duration) -> Self {
        Self { secret, lifetime }
    }

    fn secret(&self) -> AppResult<&[u8]> {
        self.secret
            .as_deref()
            .map(str::as_bytes)
            .ok_or_else(|| AppError::ConfigurationError("JWT secret missing. Check .env setup".to_string()))
    }

    pub fn create_token(&self, user_id: &ObjectId, email: &str) -> AppResult<String> {
        let secret = self.secret()?;

        let issued_at = Utc::now().timestamp();
        let claims = Claims {
            id: user_id.to_hex(),
            email: email.to_string(),
            iat: issued_at as usize,
            exp: (issued_at as u64).saturating_add(self.lifetime.as_secs()) as usize,
        };

        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
            .map_err(|e| AppError::InternalError(format!("Failed to create token: {e}")))
    }

    pub fn verify_token(&self, token: &str) -> AppResult<AuthUser> {
        let secret = self.secret()?;

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("JWT verify error: {e}");
            AppError::AuthenticationError("Invalid or expired token".to_string())
        })?;

        let id = ObjectId::parse_str(&claims.id)
            .map_err(|_| AppError::AuthenticationError("Invalid or expired token".to_string()))?;

        Ok(AuthUser {
            id,
            email: claims.email,
        })
    }
}
