//! JWT utilities for authentication
//!
//! Tokens are signed with RS256. The subject of every token is the id of the
//! token record created at login, not the user id, so deleting the record
//! revokes both halves of the pair.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Token type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (token record ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    pub token_type: TokenType,
}

impl Claims {
    /// Parse the subject as a token record ID
    ///
    /// # Errors
    /// Returns `AppError::InvalidToken` if the subject is not a UUID
    pub fn token_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::InvalidToken)
    }

    #[must_use]
    pub fn is_access_token(&self) -> bool {
        self.token_type == TokenType::Access
    }

    #[must_use]
    pub fn is_refresh_token(&self) -> bool {
        self.token_type == TokenType::Refresh
    }
}

/// Access and refresh tokens minted from the same token record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// RS256 token codec
///
/// A codec built with [`JwtService::verifier`] can only validate.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: Option<EncodingKey>,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    /// Create a codec that can both sign and verify
    ///
    /// # Errors
    /// Returns `AppError::Config` if either PEM cannot be parsed as an RSA key
    pub fn new(private_pem: &str, public_pem: &str) -> Result<Self, AppError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_pem.as_bytes())
            .map_err(|e| AppError::Config(format!("invalid JWT private key: {e}")))?;

        let mut service = Self::verifier(public_pem)?;
        service.encoding_key = Some(encoding_key);
        Ok(service)
    }

    /// Create a verify-only codec
    ///
    /// # Errors
    /// Returns `AppError::Config` if the PEM cannot be parsed as an RSA public key
    pub fn verifier(public_pem: &str) -> Result<Self, AppError> {
        let decoding_key = DecodingKey::from_rsa_pem(public_pem.as_bytes())
            .map_err(|e| AppError::Config(format!("invalid JWT public key: {e}")))?;

        // Expiry is checked against an injectable clock in `validate_token_at`
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: None,
            decoding_key,
            validation,
        })
    }

    /// Mint an access/refresh pair for `subject`
    ///
    /// # Errors
    /// Returns `AppError::Signing` if no private key is loaded or signing fails
    pub fn generate_pair_token(
        &self,
        subject: Uuid,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<TokenPair, AppError> {
        let now = Utc::now();
        let access_token = self.encode_claims(&Self::claims(subject, TokenType::Access, now, access_ttl))?;
        let refresh_token =
            self.encode_claims(&Self::claims(subject, TokenType::Refresh, now, refresh_ttl))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    fn claims(subject: Uuid, token_type: TokenType, now: DateTime<Utc>, ttl: Duration) -> Claims {
        Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: now
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
                .timestamp(),
            token_type,
        }
    }

    /// Sign arbitrary claims
    ///
    /// # Errors
    /// Returns `AppError::Signing` if no private key is loaded or signing fails
    pub fn encode_claims(&self, claims: &Claims) -> Result<String, AppError> {
        let key = self
            .encoding_key
            .as_ref()
            .ok_or_else(|| AppError::Signing("no private key loaded".to_string()))?;

        encode(&Header::new(Algorithm::RS256), claims, key)
            .map_err(|e| AppError::Signing(e.to_string()))
    }

    /// Verify a token against the current clock
    ///
    /// # Errors
    /// `AppError::TokenExpired` past `exp`, `AppError::InvalidToken` for anything else
    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        self.validate_token_at(token, Utc::now())
    }

    /// Verify a token as of `now`
    ///
    /// # Errors
    /// `AppError::TokenExpired` when `now` is past `exp`, `AppError::InvalidToken`
    /// for a bad signature, structure or algorithm
    pub fn validate_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                AppError::InvalidToken
            })?
            .claims;

        if now.timestamp() > claims.exp {
            return Err(AppError::TokenExpired);
        }

        Ok(claims)
    }

    #[must_use]
    pub fn can_sign(&self) -> bool {
        self.encoding_key.is_some()
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("can_sign", &self.can_sign())
            .finish_non_exhaustive()
    }
}
