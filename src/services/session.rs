//! Session management: admin login and JWT access tokens

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AdminIdentity;
use crate::constants::ACCESS_TOKEN_EXPIRY_HOURS;

/// JWT claims for admin access tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub exp: i64, // expiry timestamp
    pub iat: i64, // issued at
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    Expired,
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Check submitted credentials against the admin identity and issue a token on match.
pub fn login(
    admin: &AdminIdentity,
    email: &str,
    password: &str,
    secret: &[u8],
) -> Result<String, SessionError> {
    if !admin.matches(email, password) {
        return Err(SessionError::InvalidCredentials);
    }
    create_access_token(email, secret, Utc::now())
}

/// Create a JWT access token valid for 24 hours from `issued_at`
pub fn create_access_token(
    email: &str,
    secret: &[u8],
    issued_at: DateTime<Utc>,
) -> Result<String, SessionError> {
    let exp = issued_at + Duration::hours(ACCESS_TOKEN_EXPIRY_HOURS);

    let claims = Claims {
        email: email.to_string(),
        exp: exp.timestamp(),
        iat: issued_at.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| SessionError::Signing(e.to_string()))
}

/// Validate a JWT access token and return its claims
pub fn validate_access_token(token: &str, secret: &[u8]) -> Result<Claims, SessionError> {
    // HS256 only, so a token cannot pick its own algorithm
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["exp", "iat"]);

    let token_data = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
            _ => SessionError::InvalidToken,
        })?;

    Ok(token_data.claims)
}
