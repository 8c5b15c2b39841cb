use std::sync::Arc;

use anyhow::Context;

use crate::config::AppConfig;
use crate::store::{JsonFileStore, Kv, MemoryStore, Store};

/// Application context handed to every handler: the key-value
/// repository, configuration, and the outbound HTTP client. Replaces
/// what used to be implicit module-level globals.
#[derive(Clone)]
pub struct AppState {
    pub kv: Kv,
    pub config: Arc<AppConfig>,
    pub http: reqwest::Client,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let backend = JsonFileStore::new(&config.data_dir)?;
        Self::from_parts(Arc::new(backend), config)
    }

    pub fn from_parts(backend: Arc<dyn Store>, config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.translate.timeout_secs))
            .build()
            .context("build http client")?;
        Ok(Self {
            kv: Kv::new(backend),
            config,
            http,
        })
    }

    /// Empty in-memory state with a fixed test configuration.
    pub fn in_memory() -> Self {
        use crate::config::{JwtConfig, TranslateConfig};

        let config = Arc::new(AppConfig {
            data_dir: "unused".into(),
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
                refresh_ttl_minutes: 60,
            },
            translate: TranslateConfig {
                // Unroutable on purpose so the fallback dictionary kicks in.
                endpoint: "http://127.0.0.1:9/get".into(),
                timeout_secs: 1,
            },
        });
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(1))
            .build()
            .expect("test http client");
        Self {
            kv: Kv::new(Arc::new(MemoryStore::default())),
            config,
            http,
        }
    }
}
