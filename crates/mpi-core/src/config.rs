//! Configuration module
//!
//! Client settings are read from the environment (optionally seeded from a `.env`
//! file): backend base URL, request timeout, the simulated upload progress signal,
//! the settle delay applied after an upload batch, and the operator credential pair.

use std::env;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const PROGRESS_INTERVAL_MS: u64 = 300;
const PROGRESS_CAP: f64 = 95.0;
const PROGRESS_MAX_STEP: f64 = 30.0;
const SETTLE_DELAY_MS: u64 = 2000;

/// Parameters of the simulated progress signal.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressSettings {
    /// Time between two simulated increments.
    pub interval: Duration,
    /// Highest percentage a ticking entry may report. Always below 100.
    pub cap: f64,
    /// Upper bound of a single random increment.
    pub max_step: f64,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(PROGRESS_INTERVAL_MS),
            cap: PROGRESS_CAP,
            max_step: PROGRESS_MAX_STEP,
        }
    }
}

/// Operator credential pair used to open an admin session.
#[derive(Clone)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Client configuration
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    /// `None` leaves requests without a client-side timeout.
    pub request_timeout: Option<Duration>,
    pub progress: ProgressSettings,
    /// Grace period between the end of an upload batch and the reset of its state.
    pub settle_delay: Duration,
    pub admin_credentials: Option<AdminCredentials>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: None,
            progress: ProgressSettings::default(),
            settle_delay: Duration::from_millis(SETTLE_DELAY_MS),
            admin_credentials: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from the process environment, reading `.env` first.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from an arbitrary key lookup. Unparseable values fall back
    /// to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("MPI_API_URL")
            .or_else(|| lookup("API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let request_timeout = lookup("MPI_REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let interval_ms = lookup("MPI_PROGRESS_INTERVAL_MS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(PROGRESS_INTERVAL_MS);

        let cap = lookup("MPI_PROGRESS_CAP")
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or(PROGRESS_CAP);

        let max_step = lookup("MPI_PROGRESS_MAX_STEP")
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or(PROGRESS_MAX_STEP);

        let settle_delay_ms = lookup("MPI_SETTLE_DELAY_MS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(SETTLE_DELAY_MS);

        let admin_credentials = match (lookup("MPI_ADMIN_EMAIL"), lookup("MPI_ADMIN_PASSWORD")) {
            (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
                Some(AdminCredentials {
                    email: email.trim().to_string(),
                    password,
                })
            }
            _ => None,
        };

        Self {
            api_url: api_url.trim().trim_end_matches('/').to_string(),
            request_timeout,
            progress: ProgressSettings {
                interval: Duration::from_millis(interval_ms),
                cap,
                max_step,
            },
            settle_delay: Duration::from_millis(settle_delay_ms),
            admin_credentials,
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.api_url.is_empty() {
            return Err(anyhow::anyhow!("MPI_API_URL cannot be empty"));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "MPI_API_URL must start with http:// or https://, got {}",
                self.api_url
            ));
        }
        if self.progress.interval.is_zero() {
            return Err(anyhow::anyhow!("MPI_PROGRESS_INTERVAL_MS must be greater than 0"));
        }
        if !(self.progress.cap > 0.0 && self.progress.cap < 100.0) {
            return Err(anyhow::anyhow!(
                "MPI_PROGRESS_CAP must be between 0 and 100 (exclusive), got {}",
                self.progress.cap
            ));
        }
        if self.progress.max_step <= 0.0 || !self.progress.max_step.is_finite() {
            return Err(anyhow::anyhow!(
                "MPI_PROGRESS_MAX_STEP must be a positive number, got {}",
                self.progress.max_step
            ));
        }
        if self.admin_credentials.is_none() {
            tracing::debug!("No operator credentials configured; admin commands are disabled");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = ClientConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.progress, ProgressSettings::default());
        assert_eq!(config.settle_delay, Duration::from_millis(2000));
        assert!(config.admin_credentials.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reads_overrides_and_trims_url() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("MPI_API_URL", "https://mpi.example.gov/ "),
            ("MPI_REQUEST_TIMEOUT_SECS", "45"),
            ("MPI_PROGRESS_INTERVAL_MS", "100"),
            ("MPI_PROGRESS_CAP", "90"),
            ("MPI_SETTLE_DELAY_MS", "0"),
            ("MPI_ADMIN_EMAIL", "officer@example.gov"),
            ("MPI_ADMIN_PASSWORD", "s3cret"),
        ]));
        assert_eq!(config.api_url, "https://mpi.example.gov");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(45)));
        assert_eq!(config.progress.interval, Duration::from_millis(100));
        assert_eq!(config.progress.cap, 90.0);
        assert!(config.settle_delay.is_zero());
        let creds = config.admin_credentials.as_ref().unwrap();
        assert_eq!(creds.email, "officer@example.gov");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_url_alias() {
        let config = ClientConfig::from_lookup(lookup_from(&[("API_URL", "http://10.0.0.5:8000")]));
        assert_eq!(config.api_url, "http://10.0.0.5:8000");
    }

    #[test]
    fn test_invalid_numbers_fall_back_to_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("MPI_PROGRESS_INTERVAL_MS", "fast"),
            ("MPI_REQUEST_TIMEOUT_SECS", "0"),
        ]));
        assert_eq!(config.progress.interval, Duration::from_millis(300));
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn test_validate_rejects_cap_at_or_above_100() {
        let config = ClientConfig::from_lookup(lookup_from(&[("MPI_PROGRESS_CAP", "100")]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_scheme() {
        let config = ClientConfig::from_lookup(lookup_from(&[("MPI_API_URL", "ftp://host")]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_credentials_are_ignored() {
        let config =
            ClientConfig::from_lookup(lookup_from(&[("MPI_ADMIN_EMAIL", "officer@example.gov")]));
        assert!(config.admin_credentials.is_none());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = AdminCredentials {
            email: "a@b.c".to_string(),
            password: "hunter2".to_string(),
        };
        let printed = format!("{:?}", creds);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("a@b.c"));
    }
}
