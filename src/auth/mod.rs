//! Session authentication.
//!
//! Bearer tokens are issued at register/login and kept in memory with a
//! configurable lifetime. Password digests use SHA-256 hex.

mod middleware;

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::{AuthError, Result};

pub use middleware::{AuthLayer, AuthMiddleware};

/// Authentication context from a validated request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// User ID (if authenticated).
    pub user_id: Option<String>,
    /// The presented session token, kept for revocation at logout.
    pub token: Option<String>,
    /// Whether this is an anonymous/unauthenticated request.
    pub anonymous: bool,
}

impl AuthContext {
    /// Create an anonymous auth context.
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            token: None,
            anonymous: true,
        }
    }

    /// Create an authenticated context.
    pub fn authenticated(user_id: String, token: String) -> Self {
        Self {
            user_id: Some(user_id),
            token: Some(token),
            anonymous: false,
        }
    }
}

struct Session {
    user_id: String,
    expires_at: Option<DateTime<Utc>>,
}

/// Issues and validates session tokens.
pub struct Authenticator {
    config: AuthConfig,
    sessions: RwLock<HashMap<String, Session>>,
}

impl Authenticator {
    /// Create a new authenticator from config.
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Digest a password for storage.
    pub fn hash_password(password: &str) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Verify a password against a stored digest.
    pub fn verify_password(password: &str, digest: &str) -> bool {
        Self::hash_password(password) == digest
    }

    /// Issue a fresh session token for a user.
    pub fn issue_token(&self, user_id: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let expires_at = if self.config.session_ttl_secs > 0 {
            Some(Utc::now() + Duration::seconds(self.config.session_ttl_secs as i64))
        } else {
            None
        };

        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(
            token.clone(),
            Session {
                user_id: user_id.to_string(),
                expires_at,
            },
        );
        token
    }

    /// Revoke a session token.
    pub fn revoke(&self, token: &str) {
        let mut sessions = self.sessions.write().unwrap();
        sessions.remove(token);
    }

    /// Authenticate a request from its Authorization header.
    ///
    /// No header yields an anonymous context; protected handlers reject
    /// those. A malformed header or unknown/expired token is an error.
    pub fn authenticate(&self, auth_header: Option<&str>) -> Result<AuthContext> {
        let Some(header) = auth_header else {
            return Ok(AuthContext::anonymous());
        };

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidCredentials)?;
        self.validate_token(token)
    }

    fn validate_token(&self, token: &str) -> Result<AuthContext> {
        let expired = {
            let sessions = self.sessions.read().unwrap();
            match sessions.get(token) {
                None => return Err(AuthError::InvalidToken.into()),
                Some(session) => match session.expires_at {
                    Some(expires_at) if expires_at <= Utc::now() => true,
                    _ => {
                        return Ok(AuthContext::authenticated(
                            session.user_id.clone(),
                            token.to_string(),
                        ))
                    }
                },
            }
        };

        if expired {
            self.revoke(token);
        }
        Err(AuthError::InvalidToken.into())
    }
}

/// Simple hex encoding (to avoid adding another dependency).
mod hex {
    pub fn encode(data: impl AsRef<[u8]>) -> String {
        data.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}
