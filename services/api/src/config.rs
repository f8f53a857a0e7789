//! Service configuration loaded from the environment

use anyhow::{Context, Result, bail};
use axum_extra::extract::cookie::SameSite;
use common::database::DatabaseConfig;
use serde::Deserialize;

use crate::cookie::{CookiePolicy, parse_same_site};

/// Runtime configuration
///
/// Every field maps to the upper-cased environment variable of the same name,
/// e.g. `access_token_secret` ← `ACCESS_TOKEN_SECRET`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_name")]
    pub database_name: String,
    /// HMAC secret for signing tokens
    pub access_token_secret: String,
    /// `production` tightens the cookie policy
    #[serde(default = "default_app_env")]
    pub app_env: String,
    #[serde(default)]
    pub cookie_secure: Option<bool>,
    #[serde(default)]
    pub cookie_same_site: Option<String>,
    /// Comma separated list of front-end origins allowed to send credentials
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_database_url() -> String {
    DatabaseConfig::default().database_url
}

fn default_database_name() -> String {
    DatabaseConfig::default().database_name
}

fn default_app_env() -> String {
    "development".to_string()
}

fn default_cors_allowed_origins() -> String {
    "http://localhost:5173,https://dishdynamo-c649f.web.app".to_string()
}

impl AppConfig {
    /// Load configuration from `.env` (if present) and the process environment
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::load_from(None)
    }

    /// Load configuration from an explicit variable map instead of the process
    /// environment when `source` is set
    pub fn load_from(source: Option<config::Map<String, String>>) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::default().source(source))
            .build()
            .context("Failed to read configuration")?;

        let config: AppConfig = settings
            .try_deserialize()
            .context("Invalid configuration (is ACCESS_TOKEN_SECRET set?)")?;

        if config.access_token_secret.trim().is_empty() {
            bail!("ACCESS_TOKEN_SECRET must not be empty");
        }

        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    pub fn database(&self) -> DatabaseConfig {
        DatabaseConfig {
            database_url: self.database_url.clone(),
            database_name: self.database_name.clone(),
        }
    }

    /// Environment default, with explicit overrides applied on top
    pub fn cookie_policy(&self) -> Result<CookiePolicy> {
        let mut policy = CookiePolicy::for_environment(self.is_production());

        if let Some(secure) = self.cookie_secure {
            policy.secure = secure;
        }

        if let Some(same_site) = &self.cookie_same_site {
            policy.same_site = parse_same_site(same_site)
                .with_context(|| format!("Invalid COOKIE_SAME_SITE value: {}", same_site))?;
        }

        if policy.same_site == SameSite::None && !policy.secure {
            bail!("COOKIE_SAME_SITE=none requires a secure cookie");
        }

        Ok(policy)
    }

    pub fn allowed_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(vars: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(
            vars.iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::load_from(source(&[("ACCESS_TOKEN_SECRET", "s3cr3t")])).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.database().database_name, "dishDynamoDB");
        assert!(!config.is_production());
        assert_eq!(
            config.cookie_policy().unwrap(),
            CookiePolicy::for_environment(false)
        );
        assert_eq!(
            config.allowed_origins(),
            vec![
                "http://localhost:5173".to_string(),
                "https://dishdynamo-c649f.web.app".to_string()
            ]
        );
    }

    #[test]
    fn test_secret_is_required() {
        assert!(AppConfig::load_from(source(&[("PORT", "8080")])).is_err());
        assert!(AppConfig::load_from(source(&[("ACCESS_TOKEN_SECRET", "  ")])).is_err());
    }

    #[test]
    fn test_production_and_overrides() {
        let config = AppConfig::load_from(source(&[
            ("ACCESS_TOKEN_SECRET", "s3cr3t"),
            ("APP_ENV", "production"),
            ("PORT", "8080"),
            ("DATABASE_URL", "memory://"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert!(config.database().is_memory());
        assert_eq!(
            config.cookie_policy().unwrap(),
            CookiePolicy::for_environment(true)
        );
        assert_eq!(config.allowed_origins().len(), 2);

        let relaxed = AppConfig::load_from(source(&[
            ("ACCESS_TOKEN_SECRET", "s3cr3t"),
            ("APP_ENV", "production"),
            ("COOKIE_SAME_SITE", "lax"),
        ]))
        .unwrap();
        let policy = relaxed.cookie_policy().unwrap();
        assert!(policy.secure);
        assert_eq!(policy.same_site, SameSite::Lax);
    }

    #[test]
    fn test_invalid_cookie_overrides() {
        let config = AppConfig::load_from(source(&[
            ("ACCESS_TOKEN_SECRET", "s3cr3t"),
            ("COOKIE_SAME_SITE", "sideways"),
        ]))
        .unwrap();
        assert!(config.cookie_policy().is_err());

        let insecure = AppConfig::load_from(source(&[
            ("ACCESS_TOKEN_SECRET", "s3cr3t"),
            ("COOKIE_SAME_SITE", "none"),
            ("COOKIE_SECURE", "false"),
        ]))
        .unwrap();
        assert!(insecure.cookie_policy().is_err());
    }
}
