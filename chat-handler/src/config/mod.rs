use service_core::config::{LogConfig, OpenAiConfig, ServerConfig, Settings};
use service_core::error::ApiError;

#[derive(Debug, Clone)]
pub struct HandlerConfig {
    pub server: ServerConfig,
    pub log: LogConfig,
    pub openai: OpenAiConfig,
}

impl HandlerConfig {
    pub fn load() -> Result<Self, ApiError> {
        Self::from_settings(&Settings::load()?)
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        Ok(Self {
            server: ServerConfig::from_settings(settings)?,
            log: LogConfig::from_settings(settings),
            openai: OpenAiConfig::from_settings(settings),
        })
    }
}
