use service_core::config::{
    GeminiConfig, LogConfig, OpenAiConfig, ServerConfig, Settings,
};
use service_core::error::ApiError;
use std::path::PathBuf;

pub const DEFAULT_VECTORSTORE_DIR: &str = "./service/vectorstore";
pub const DEFAULT_COLLECTION: &str = "default";
pub const DEFAULT_TOP_K: usize = 3;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub log: LogConfig,
    pub openai: OpenAiConfig,
    pub gemini: GeminiConfig,
    pub vectorstore: VectorStoreConfig,
}

#[derive(Debug, Clone)]
pub struct VectorStoreConfig {
    pub dir: PathBuf,
    pub collection: String,
    /// Nearest neighbours requested per retrieval.
    pub top_k: usize,
}

impl VectorStoreConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            dir: PathBuf::from(settings.get_or("VECTORSTORE_DIR", DEFAULT_VECTORSTORE_DIR)),
            collection: settings
                .get("CHROMA_COLLECTION")
                .or_else(|| settings.get("VECTORSTORE_COLLECTION"))
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            top_k: settings
                .get("TOP_K")
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(DEFAULT_TOP_K),
        }
    }
}

impl ServiceConfig {
    pub fn load() -> Result<Self, ApiError> {
        Self::from_settings(&Settings::load()?)
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        Ok(Self {
            server: ServerConfig::from_settings(settings)?,
            log: LogConfig::from_settings(settings),
            openai: OpenAiConfig::from_settings(settings),
            gemini: GeminiConfig::from_settings(settings),
            vectorstore: VectorStoreConfig::from_settings(settings),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let mut builder = config::Config::builder();
        for (key, value) in pairs {
            builder = builder.set_override(*key, *value).unwrap();
        }
        Settings::from_config(builder.build().unwrap())
    }

    #[test]
    fn test_vectorstore_defaults() {
        let config = VectorStoreConfig::from_settings(&settings(&[]));
        assert_eq!(config.dir, PathBuf::from(DEFAULT_VECTORSTORE_DIR));
        assert_eq!(config.collection, DEFAULT_COLLECTION);
        assert_eq!(config.top_k, DEFAULT_TOP_K);
    }

    #[test]
    fn test_vectorstore_overrides() {
        let config = VectorStoreConfig::from_settings(&settings(&[
            ("vectorstore_dir", "\"/var/lib/rag\""),
            ("vectorstore_collection", "'bairros'"),
            ("top_k", "7"),
        ]));
        assert_eq!(config.dir, PathBuf::from("/var/lib/rag"));
        assert_eq!(config.collection, "bairros");
        assert_eq!(config.top_k, 7);
    }

    #[test]
    fn test_collection_variable_names() {
        let config = VectorStoreConfig::from_settings(&settings(&[("chroma_collection", "bairros")]));
        assert_eq!(config.collection, "bairros");

        let config = VectorStoreConfig::from_settings(&settings(&[
            ("chroma_collection", "bairros"),
            ("vectorstore_collection", "outra"),
        ]));
        assert_eq!(config.collection, "bairros");

        let config =
            VectorStoreConfig::from_settings(&settings(&[("vectorstore_collection", "outra")]));
        assert_eq!(config.collection, "outra");
    }

    #[test]
    fn test_unparseable_top_k_falls_back() {
        let config = VectorStoreConfig::from_settings(&settings(&[("top_k", "many")]));
        assert_eq!(config.top_k, DEFAULT_TOP_K);
    }
}
