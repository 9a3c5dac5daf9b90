use std::fmt;
use std::time::Duration;

use crate::adapters::ClientSettings;
use crate::adapters::easee_http::DEFAULT_BASE_URL;
use crate::app::AppError;

#[derive(Clone)]
pub struct AppConfig {
    pub username: String,
    pub password: String,
    pub base_url: String,
    pub http_timeout_secs: u64,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded environment file");
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = required(&lookup, "EASEE_USERNAME")?;
        let password = required(&lookup, "EASEE_PASSWORD")?;

        Ok(Self {
            username,
            password,
            base_url: lookup("EASEE_BASE_URL")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            http_timeout_secs: parse_or_default(&lookup, "EASEE_HTTP_TIMEOUT_SECS", 30_u64)?,
        })
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            timeout: Duration::from_secs(self.http_timeout_secs),
        }
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::config(format!("{key} is required")))
}

fn parse_or_default<T, F>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr + Copy,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::config(format!("{key} must be a valid number"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::AppConfig;

    #[test]
    fn rejects_missing_username() {
        let result = AppConfig::from_lookup(|_| None);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "invalid configuration: EASEE_USERNAME is required"
        );
    }

    #[test]
    fn rejects_blank_password() {
        let result = AppConfig::from_lookup(|key| match key {
            "EASEE_USERNAME" => Some("owner@example.com".to_string()),
            "EASEE_PASSWORD" => Some("   ".to_string()),
            _ => None,
        });

        assert_eq!(
            result.unwrap_err().to_string(),
            "invalid configuration: EASEE_PASSWORD is required"
        );
    }

    #[test]
    fn applies_defaults_for_optional_fields() {
        let result = AppConfig::from_lookup(|key| match key {
            "EASEE_USERNAME" => Some("owner@example.com".to_string()),
            "EASEE_PASSWORD" => Some("secret".to_string()),
            _ => None,
        })
        .expect("config should be valid");

        assert_eq!(result.username, "owner@example.com");
        assert_eq!(result.base_url, "https://api.easee.cloud");
        assert_eq!(result.http_timeout_secs, 30);
        assert_eq!(result.client_settings().timeout, Duration::from_secs(30));
        assert!(!format!("{result:?}").contains("secret"));
    }

    #[test]
    fn rejects_invalid_numeric_values() {
        let result = AppConfig::from_lookup(|key| match key {
            "EASEE_USERNAME" => Some("owner@example.com".to_string()),
            "EASEE_PASSWORD" => Some("secret".to_string()),
            "EASEE_HTTP_TIMEOUT_SECS" => Some("soon".to_string()),
            _ => None,
        });

        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "invalid configuration: EASEE_HTTP_TIMEOUT_SECS must be a valid number"
        );
    }
}
