use busline_seating::AdjacencyRule;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub seating: SeatingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
    #[serde(default)]
    pub tickets: TicketConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    pub data_path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { data_path: PathBuf::from("data/buses.json") }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    #[default]
    File,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(".busline/local-storage.json")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SeatingConfig {
    #[serde(default)]
    pub adjacency: AdjacencyRule,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub max_advance_days: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { max_advance_days: busline_core::search::DEFAULT_MAX_ADVANCE_DAYS }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { min_password_length: busline_core::auth::DEFAULT_MIN_PASSWORD_LENGTH }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaymentConfig {
    pub merchant_upi_id: String,
    #[serde(default = "default_processing_delay")]
    pub processing_delay_ms: u64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_processing_delay() -> u64 { 2000 }

fn default_currency() -> String { "INR".to_string() }

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            merchant_upi_id: "merchant@upi".to_string(),
            processing_delay_ms: default_processing_delay(),
            currency: default_currency(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TicketConfig {
    pub output_dir: PathBuf,
}

impl Default for TicketConfig {
    fn default() -> Self {
        Self { output_dir: PathBuf::from(".") }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Layer `<dir>/default`, `<dir>/<RUN_MODE>`, `<dir>/local` and `BUSLINE__*` variables
    pub fn load_from(dir: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        let dir = dir.as_ref();
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let file = |name: &str| {
            config::File::with_name(&dir.join(name).to_string_lossy()).required(false)
        };

        let s = config::Config::builder()
            .add_source(file("default"))
            .add_source(file(&run_mode))
            // Not checked in
            .add_source(file("local"))
            // e.g. `BUSLINE__PAYMENT__PROCESSING_DELAY_MS=0`
            .add_source(
                config::Environment::with_prefix("BUSLINE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}
