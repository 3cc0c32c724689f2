mod utils;

pub mod advisor;
pub mod chat;
pub mod cli;
pub mod config;
pub mod db;
pub mod kpi;
pub mod metrics;
pub mod rng;
pub mod settings;
pub mod store;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use advisor::{Advisor, AdvisorOptions, Persona, RuleLibrary};
use chat::ChatHistoryStore;
use config::{AppConfig, StorageBackend};
use db::Database;
use kpi::KpiBook;
use metrics::Dataset;
use settings::Settings;
use store::{JsonFileStore, KeyedStore, MemoryStore};

const ENABLE_LOGS: bool = true;

/// Everything a command needs, built once per process. The dataset and rule
/// tables are read-only after construction.
pub struct AppState {
    pub config: AppConfig,
    pub dataset: Arc<Dataset>,
    pub rules: RuleLibrary,
    pub store: Arc<dyn KeyedStore>,
    pub settings: Settings,
    pub kpi: KpiBook,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let store = open_store(&config)?;
        Self::with_store(config, store)
    }

    pub fn with_store(config: AppConfig, store: Arc<dyn KeyedStore>) -> Result<Self> {
        let rules = RuleLibrary::bundled().context("failed to load advisor rule tables")?;
        let dataset = Arc::new(Dataset::generate(&config.seeds));

        Ok(Self {
            settings: Settings::new(Arc::clone(&store)),
            kpi: KpiBook::new(Arc::clone(&store)),
            config,
            dataset,
            rules,
            store,
        })
    }

    pub fn advisor_options(&self) -> AdvisorOptions {
        AdvisorOptions {
            early_turn_threshold: self.config.early_turn_threshold,
            typing_delay: self.config.typing_delay(),
        }
    }

    pub fn advisor(&self, persona: &Persona) -> Result<Advisor> {
        let options = self.advisor_options();
        Ok(match persona {
            Persona::Sales => Advisor::sales(&self.rules, options),
            Persona::Marketing => Advisor::marketing(&self.rules, options),
            Persona::Custom(id) => {
                let config = self.settings.custom_chat(id)?;
                Advisor::custom(&self.rules, &config, options)
            }
        })
    }

    pub fn history(&self, persona: &Persona) -> ChatHistoryStore {
        ChatHistoryStore::new(Arc::clone(&self.store), persona.history_key())
    }
}

pub fn open_store(config: &AppConfig) -> Result<Arc<dyn KeyedStore>> {
    let path = config.store_path();
    let store: Arc<dyn KeyedStore> = match config.backend {
        StorageBackend::Json => Arc::new(JsonFileStore::new(path)?),
        StorageBackend::Sqlite => Arc::new(Database::new(path)?),
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
    };
    log_debug!("Using {} store under {}", config.backend, config.data_dir.display());
    Ok(store)
}

pub fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.log_level());

    log_info!("LotPulse starting up...");

    let config = cli.resolve_config()?;
    let state = AppState::new(config)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(cli::dispatch(&state, cli.command))
}
