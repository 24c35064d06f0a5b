use crate::i18n::LocaleRegistry;
use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_url: String,
    pub max_connections: u32,

    // Locales
    pub default_locale: String,
    pub fallback_locale: String,
    pub supported_locales: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            database_url: lookup("DATABASE_URL").context("DATABASE_URL not set")?,
            max_connections: match lookup("DATABASE_MAX_CONNECTIONS") {
                Some(value) => value
                    .trim()
                    .parse()
                    .with_context(|| format!("DATABASE_MAX_CONNECTIONS is not a number: {}", value))?,
                None => 5,
            },

            default_locale: lookup("APP_LOCALE").unwrap_or_else(|| "en".to_string()),
            fallback_locale: lookup("APP_FALLBACK_LOCALE").unwrap_or_else(|| "en".to_string()),
            supported_locales: lookup("SUPPORTED_LOCALES")
                .map(|list| parse_locale_list(&list))
                .unwrap_or_else(|| vec!["en".to_string()]),
        };

        // Fail at startup rather than on the first request
        config.locale_registry()?;

        Ok(config)
    }

    pub fn locale_registry(&self) -> Result<LocaleRegistry> {
        LocaleRegistry::new(
            &self.supported_locales,
            &self.default_locale,
            &self.fallback_locale,
        )
        .context("Invalid locale configuration")
    }
}

/// Split a comma-separated locale list, dropping blanks.
fn parse_locale_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}
