//! HMAC-SHA256 signed bearer tokens.
//!
//! Tokens use the compact JWS layout `header.claims.signature`, each segment
//! base64url without padding. The header is fixed to `{"alg":"HS256","typ":"JWT"}`;
//! the signature is HMAC-SHA256 over `header.claims` and is checked in
//! constant time via the hmac crate's `verify_slice`.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::Sha256;

use parley_core::identity::token::TokenIssuer;
use parley_types::error::AuthError;
use parley_types::identity::{Claims, User};

type HmacSha256 = Hmac<Sha256>;

/// Default token lifetime: one day.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

const HEADER_JSON: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

#[derive(Deserialize)]
struct Header {
    alg: String,
}

/// Issues and verifies HS256 bearer tokens with a shared secret.
pub struct HmacTokenIssuer {
    secret: SecretString,
    ttl_secs: i64,
}

impl HmacTokenIssuer {
    /// Create an issuer with the default one-day lifetime.
    pub fn new(secret: SecretString) -> Self {
        Self {
            secret,
            ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    /// Override the token lifetime in seconds.
    pub fn with_ttl(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    fn issue_at(&self, user: &User, now: i64) -> Result<String, AuthError> {
        let claims = Claims {
            id: user.id,
            username: user.username.clone(),
            iat: now,
            exp: now + self.ttl_secs,
        };
        let claims_json =
            serde_json::to_vec(&claims).map_err(|e| AuthError::Signing(e.to_string()))?;

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(HEADER_JSON),
            URL_SAFE_NO_PAD.encode(claims_json)
        );

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{signing_input}.{signature}"))
    }

    fn verify_at(&self, token: &str, now: i64) -> Result<Claims, AuthError> {
        let invalid = |reason: &str| AuthError::InvalidToken(reason.to_string());

        let mut segments = token.split('.');
        let (Some(header_seg), Some(claims_seg), Some(signature_seg), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(invalid("expected three segments"));
        };

        let header_bytes = URL_SAFE_NO_PAD
            .decode(header_seg)
            .map_err(|_| invalid("header is not base64url"))?;
        let header: Header =
            serde_json::from_slice(&header_bytes).map_err(|_| invalid("header is not JSON"))?;
        if header.alg != "HS256" {
            return Err(invalid("unsupported algorithm"));
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature_seg)
            .map_err(|_| invalid("signature is not base64url"))?;
        let mut mac = self.mac()?;
        mac.update(header_seg.as_bytes());
        mac.update(b".");
        mac.update(claims_seg.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| invalid("signature mismatch"))?;

        let claims_bytes = URL_SAFE_NO_PAD
            .decode(claims_seg)
            .map_err(|_| invalid("claims are not base64url"))?;
        let claims: Claims =
            serde_json::from_slice(&claims_bytes).map_err(|_| invalid("claims are not JSON"))?;

        if claims.exp <= now {
            return Err(invalid("expired"));
        }

        Ok(claims)
    }
}

impl TokenIssuer for HmacTokenIssuer {
    fn issue(&self, user: &User) -> Result<String, AuthError> {
        self.issue_at(user, Utc::now().timestamp())
    }

    fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }
}

/// Generate a fresh 32-byte signing secret, hex encoded.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
