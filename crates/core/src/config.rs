//! Layered application configuration.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::types::DEFAULT_PAGE_SIZE;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub router: RouterConfig,
    pub search: SearchConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    pub enable_tracing: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RouterConfig {
    /// When false, unresolved messages go straight to a clarification reply.
    pub classifier_enabled: bool,
    pub provider: String,
    pub model: String,
    /// Number of trailing history turns forwarded to the classifier.
    pub max_history: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub page_size: usize,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// Directory holding restaurant menu JSON documents.
    pub data_dir: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    pub json: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("MEALROUTE_ENV").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000_i64)?
            .set_default("server.enable_cors", true)?
            .set_default("server.enable_tracing", true)?
            .set_default("router.classifier_enabled", true)?
            .set_default("router.provider", "openai")?
            .set_default("router.model", "gpt-4o-mini")?
            .set_default("router.max_history", 6_i64)?
            .set_default("search.page_size", DEFAULT_PAGE_SIZE as i64)?
            .set_default("logging.json", false)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Map MEALROUTE__SERVER__PORT=3000 to server.port
            .add_source(
                Environment::with_prefix("MEALROUTE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 3000,
                enable_cors: true,
                enable_tracing: true,
            },
            router: RouterConfig {
                classifier_enabled: true,
                provider: "openai".into(),
                model: "gpt-4o-mini".into(),
                max_history: 6,
            },
            search: SearchConfig {
                page_size: DEFAULT_PAGE_SIZE,
            },
            catalog: CatalogConfig { data_dir: None },
            logging: LoggingConfig { json: false },
        }
    }
}
