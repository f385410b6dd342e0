//! Operator session.
//!
//! The credential pair comes from configuration and is compared locally; there is no
//! server-side verification and no expiry. An [`AdminSession`] can only be obtained
//! through [`StaticCredentials::authenticate`], so holding one proves the check passed.

use chrono::{DateTime, Utc};
use mpi_core::{AdminCredentials, ClientConfig, ClientError};
use subtle::ConstantTimeEq;

const INVALID_CREDENTIALS: &str = "Invalid credentials. Access restricted to authorized officers.";

/// Proof that an operator passed the credential check.
#[derive(Debug, Clone)]
pub struct AdminSession {
    email: String,
    authenticated_at: DateTime<Utc>,
}

impl AdminSession {
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn authenticated_at(&self) -> DateTime<Utc> {
        self.authenticated_at
    }
}

/// Credential store holding a single configured operator.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    credentials: Option<AdminCredentials>,
}

impl StaticCredentials {
    pub fn new(credentials: Option<AdminCredentials>) -> Self {
        Self { credentials }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.admin_credentials.clone())
    }

    pub fn authenticate(&self, email: &str, password: &str) -> Result<AdminSession, ClientError> {
        let Some(expected) = &self.credentials else {
            return Err(ClientError::Unauthorized(
                "Operator credentials are not configured".to_string(),
            ));
        };

        let email = email.trim();
        let email_ok: bool = email
            .to_lowercase()
            .as_bytes()
            .ct_eq(expected.email.to_lowercase().as_bytes())
            .into();
        let password_ok: bool = password.as_bytes().ct_eq(expected.password.as_bytes()).into();

        if !(email_ok && password_ok) {
            tracing::warn!(%email, "Operator login rejected");
            return Err(ClientError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        tracing::info!(%email, "Operator session opened");
        Ok(AdminSession {
            email: email.to_string(),
            authenticated_at: Utc::now(),
        })
    }
}
