use crate::i18n::Language;
use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Intake server
    pub port: u16,
    pub admin_api_key: Option<String>,

    // Telegram staff notifications
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub telegram_api_url: String,

    // Desk client
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub storage_path: String,
    pub default_locale: Language,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let default_locale = std::env::var("DEFAULT_LOCALE").unwrap_or_else(|_| "en".to_string());

        Ok(Self {
            // Intake server
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8001),
            admin_api_key: optional_var("FIXNET_ADMIN_API_KEY"),

            // Telegram
            telegram_bot_token: optional_var("TELEGRAM_BOT_TOKEN"),
            telegram_chat_id: optional_var("TELEGRAM_CHAT_ID"),
            telegram_api_url: std::env::var("TELEGRAM_API_URL")
                .unwrap_or_else(|_| "https://api.telegram.org".to_string()),

            // Desk client
            api_url: std::env::var("FIXNET_API_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            request_timeout_secs: std::env::var("FIXNET_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            storage_path: std::env::var("FIXNET_STORAGE_PATH")
                .unwrap_or_else(|_| "fixnet_storage.json".to_string()),
            default_locale: Language::from_code(&default_locale)
                .context("DEFAULT_LOCALE must name a supported locale")?,
        })
    }

    /// Bot token and chat ID, when both are configured.
    pub fn telegram_credentials(&self) -> Option<(&str, &str)> {
        match (&self.telegram_bot_token, &self.telegram_chat_id) {
            (Some(token), Some(chat_id)) => Some((token, chat_id)),
            _ => None,
        }
    }
}

/// Unset and blank values both count as absent.
fn optional_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "PORT",
        "FIXNET_ADMIN_API_KEY",
        "TELEGRAM_BOT_TOKEN",
        "TELEGRAM_CHAT_ID",
        "TELEGRAM_API_URL",
        "FIXNET_API_URL",
        "FIXNET_REQUEST_TIMEOUT_SECS",
        "FIXNET_STORAGE_PATH",
        "DEFAULT_LOCALE",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().expect("Defaults should load");

        assert_eq!(config.port, 8001);
        assert!(config.admin_api_key.is_none());
        assert!(config.telegram_credentials().is_none());
        assert_eq!(config.telegram_api_url, "https://api.telegram.org");
        assert_eq!(config.api_url, "http://localhost:8001");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.storage_path, "fixnet_storage.json");
        assert_eq!(config.default_locale, Language::ENGLISH);
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        std::env::set_var("PORT", "9000");
        std::env::set_var("FIXNET_ADMIN_API_KEY", "admin-key");
        std::env::set_var("TELEGRAM_BOT_TOKEN", "bot-token");
        std::env::set_var("TELEGRAM_CHAT_ID", "12345");
        std::env::set_var("DEFAULT_LOCALE", "ru");

        let config = Config::from_env().expect("Config should load");
        clear_env();

        assert_eq!(config.port, 9000);
        assert_eq!(config.admin_api_key.as_deref(), Some("admin-key"));
        assert_eq!(config.telegram_credentials(), Some(("bot-token", "12345")));
        assert_eq!(config.default_locale, Language::RUSSIAN);
    }

    #[test]
    #[serial]
    fn test_invalid_numbers_fall_back() {
        clear_env();
        std::env::set_var("PORT", "not-a-port");
        std::env::set_var("FIXNET_REQUEST_TIMEOUT_SECS", "-1");

        let config = Config::from_env().expect("Config should load");
        clear_env();

        assert_eq!(config.port, 8001);
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    #[serial]
    fn test_blank_optional_values_are_absent() {
        clear_env();
        std::env::set_var("FIXNET_ADMIN_API_KEY", "   ");
        std::env::set_var("TELEGRAM_BOT_TOKEN", "bot-token");

        let config = Config::from_env().expect("Config should load");
        clear_env();

        assert!(config.admin_api_key.is_none());
        assert!(config.telegram_credentials().is_none(), "Chat ID is missing");
    }

    #[test]
    #[serial]
    fn test_unsupported_default_locale_is_error() {
        clear_env();
        std::env::set_var("DEFAULT_LOCALE", "xx");

        let result = Config::from_env();
        clear_env();

        let err = result.expect_err("Unknown locale should fail");
        assert!(err.to_string().contains("DEFAULT_LOCALE"));
    }
}
