//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the session signing secret, session lifetime, the shared health passphrase,
//! and optional SMTP credentials for verification email.

use anyhow::{Context, Result};
use chrono::Duration;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Secret used to sign session tokens. Required.
    pub session_secret: String,
    /// Session time-to-live in seconds. Sliding: refreshed on each
    /// successful authorization.
    pub session_ttl_seconds: u64,
    /// Shared passphrase gating the family health area. Compared by exact
    /// match, not hashed.
    pub health_password: String,
    /// SMTP settings. `None` means verification email is disabled and users
    /// must be verified manually.
    pub email: Option<EmailConfig>,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_name: String,
    pub from_email: String,
    /// Public URL of the dashboard, used to build verification links.
    pub base_url: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let session_secret = env::var("SESSION_SECRET").context("SESSION_SECRET not set")?;

        let session_ttl_seconds = env::var("SESSION_TTL_SECONDS")
            .unwrap_or_else(|_| "21600".to_string())
            .parse::<u64>()
            .context("SESSION_TTL_SECONDS must be a valid number")?;

        let health_password =
            env::var("HEALTH_PASSWORD").unwrap_or_else(|_| "family2026".to_string());

        Ok(Config {
            session_secret,
            session_ttl_seconds,
            health_password,
            email: Self::email_from_env()?,
        })
    }

    /// Loads the optional SMTP block. Missing credentials are a valid state:
    /// registration still works, verification just has to be done manually.
    fn email_from_env() -> Result<Option<EmailConfig>> {
        let (Ok(smtp_username), Ok(smtp_password)) =
            (env::var("SMTP_USERNAME"), env::var("SMTP_PASSWORD"))
        else {
            return Ok(None);
        };

        let smtp_host = env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string());

        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse::<u16>()
            .context("SMTP_PORT must be a valid number")?;

        let from_name = env::var("SMTP_FROM_NAME").unwrap_or_else(|_| "LedgerDesk".to_string());
        let from_email = env::var("SMTP_FROM_EMAIL").unwrap_or_else(|_| smtp_username.clone());
        let base_url =
            env::var("APP_BASE_URL").unwrap_or_else(|_| "http://localhost:8501".to_string());

        Ok(Some(EmailConfig {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            from_name,
            from_email,
            base_url,
        }))
    }

    /// Returns the SMTP settings if email is configured.
    pub fn email_config(&self) -> Option<&EmailConfig> {
        self.email.as_ref()
    }

    /// Session TTL as a chrono duration.
    pub fn session_ttl(&self) -> Duration {
        Duration::seconds(self.session_ttl_seconds as i64)
    }
}
