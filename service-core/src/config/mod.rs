use crate::error::ApiError;
use config::{Config as Cfg, Environment, File};
use secrecy::{ExposeSecret, Secret};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_EMBED_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Layered key/value view over `configuration.*` and the process environment.
///
/// Keys are looked up by their environment name (`OPENAI_API_KEY`), case
/// insensitively. Values come back cleaned: surrounding whitespace and quote
/// characters are stripped, and a value that is empty afterwards is unset.
#[derive(Debug, Clone)]
pub struct Settings {
    inner: Cfg,
}

impl Settings {
    pub fn load() -> Result<Self, ApiError> {
        dotenvy::dotenv().ok();

        let inner = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(Environment::default())
            .build()?;

        Ok(Self { inner })
    }

    /// Wrap an already-built configuration (tests, embedding).
    pub fn from_config(inner: Cfg) -> Self {
        Self { inner }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner
            .get_string(&key.to_lowercase())
            .ok()
            .map(|v| clean_value(&v).to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }
}

/// Strip surrounding whitespace, then stray `"` and `'` wrappers left by
/// copy-pasted `.env` files.
pub fn clean_value(raw: &str) -> &str {
    raw.trim().trim_matches('"').trim_matches('\'')
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl ServerConfig {
    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        let port = match settings.get("PORT") {
            Some(raw) => raw.parse().map_err(|e| {
                ApiError::ConfigError(anyhow::anyhow!("PORT must be a port number, got {raw:?}: {e}"))
            })?,
            None => DEFAULT_PORT,
        };
        Ok(Self { port })
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: String,
    pub otlp_endpoint: Option<String>,
}

impl LogConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            level: settings.get_or("LOG_LEVEL", "info"),
            otlp_endpoint: settings.get("OTLP_ENDPOINT"),
        }
    }
}

/// Credentials and model names for the OpenAI-compatible API.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<Secret<String>>,
    pub chat_model: String,
    pub embed_model: String,
    pub base_url: String,
}

impl OpenAiConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            api_key: settings.get("OPENAI_API_KEY").map(Secret::new),
            chat_model: settings.get_or("OPENAI_MODEL", DEFAULT_CHAT_MODEL),
            embed_model: settings.get_or("OPENAI_EMBED_MODEL", DEFAULT_EMBED_MODEL),
            base_url: settings.get_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
        }
    }

    pub fn has_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<Secret<String>>,
    pub model: String,
    pub base_url: String,
}

impl GeminiConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            api_key: settings.get("GEMINI_API_KEY").map(Secret::new),
            model: settings.get_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            base_url: settings.get_or("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let mut builder = Cfg::builder();
        for (key, value) in pairs {
            builder = builder.set_override(*key, *value).unwrap();
        }
        Settings::from_config(builder.build().unwrap())
    }

    #[test]
    fn test_clean_value_strips_quotes() {
        assert_eq!(clean_value("\"sk-abc\""), "sk-abc");
        assert_eq!(clean_value("  'gpt-4o'  "), "gpt-4o");
        assert_eq!(clean_value("plain"), "plain");
        assert_eq!(clean_value("\"\""), "");
    }

    #[test]
    fn test_openai_defaults() {
        let config = OpenAiConfig::from_settings(&settings(&[]));
        assert!(config.api_key.is_none());
        assert!(!config.has_key());
        assert_eq!(config.chat_model, DEFAULT_CHAT_MODEL);
        assert_eq!(config.embed_model, DEFAULT_EMBED_MODEL);
        assert_eq!(config.base_url, DEFAULT_OPENAI_BASE_URL);
    }

    #[test]
    fn test_quoted_values_are_cleaned() {
        let config = OpenAiConfig::from_settings(&settings(&[
            ("openai_api_key", "\"sk-test\""),
            ("openai_model", "'gpt-4.1'"),
        ]));
        assert!(config.has_key());
        assert_eq!(config.api_key.unwrap().expose_secret(), "sk-test");
        assert_eq!(config.chat_model, "gpt-4.1");
    }

    #[test]
    fn test_empty_quoted_key_counts_as_unset() {
        let config = OpenAiConfig::from_settings(&settings(&[("openai_api_key", "''")]));
        assert!(!config.has_key());
    }

    #[test]
    fn test_port_parsing() {
        assert_eq!(ServerConfig::from_settings(&settings(&[])).unwrap().port, DEFAULT_PORT);
        assert_eq!(
            ServerConfig::from_settings(&settings(&[("port", "\"8080\"")]))
                .unwrap()
                .port,
            8080
        );
        assert!(matches!(
            ServerConfig::from_settings(&settings(&[("port", "eighty")])),
            Err(ApiError::ConfigError(_))
        ));
    }
}
