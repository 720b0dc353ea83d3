use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;
use crate::types::EntityId;

/// Claims carried by an administrator's bearer token.
/// Tokens are issued elsewhere; this crate only verifies them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Administrator account id or username
    pub sub: String,
    pub role: String,
    #[serde(default)]
    pub municipality_id: Option<EntityId>,
    #[serde(default)]
    pub barangay_id: Option<EntityId>,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing credential")]
    Missing,

    #[error("Credential verification is not configured")]
    NotConfigured,

    #[error("Invalid credential: {0}")]
    Invalid(String),
}

/// Turns a raw credential into verified claims
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}

/// HS256 bearer-token verifier
pub struct JwtVerifier {
    decoding_key: Option<DecodingKey>,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str, issuer: Option<&str>) -> Self {
        let decoding_key = if secret.is_empty() {
            None
        } else {
            Some(DecodingKey::from_secret(secret.as_bytes()))
        };

        let mut validation = Validation::default();
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            decoding_key,
            validation,
        }
    }

    /// Verifier configured from `JWT_SECRET` / `JWT_ISSUER`
    pub fn from_config() -> Self {
        let security = &config::config().security;
        Self::new(&security.jwt_secret, security.jwt_issuer.as_deref())
    }
}

impl CredentialVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let key = self.decoding_key.as_ref().ok_or(AuthError::NotConfigured)?;

        let token_data = decode::<Claims>(token, key, &self.validation)
            .map_err(|e| AuthError::Invalid(e.to_string()))?;

        Ok(token_data.claims)
    }
}
