pub mod cli;
pub mod core;
pub mod orchestrator;
pub mod providers;
pub mod store;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::core::cache::RatesCache;
use crate::core::config::AppConfig;
use crate::core::online::OnlineMonitor;
use crate::orchestrator::RatesOrchestrator;
use crate::store::{DiskStorage, KvStorage};

/// Wired-up application: config, storage, and the rates pipeline.
pub struct App {
    pub config: AppConfig,
    pub storage: Arc<dyn KvStorage>,
    pub cache: RatesCache,
    pub online: Arc<OnlineMonitor>,
    pub orchestrator: Arc<RatesOrchestrator>,
}

pub enum AppCommand {
    Convert {
        amount: String,
        from: String,
        to: String,
    },
    Rates {
        base: Option<String>,
    },
    Currencies {
        query: Option<String>,
    },
    Interactive,
    ClearCache,
}

#[derive(Default)]
pub struct RunOptions {
    pub config_path: Option<String>,
    /// Treat the network as unavailable; only cached rates are served.
    pub offline: bool,
}

pub async fn run_command(command: AppCommand, options: RunOptions) -> Result<()> {
    info!("Currency converter starting...");

    let config = match &options.config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let app = build_app(config, options.offline)?;

    match command {
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(&app, &amount, &from, &to).await
        }
        AppCommand::Rates { base } => cli::rates::run(&app, base.as_deref()).await,
        AppCommand::Currencies { query } => cli::currencies::run(query.as_deref()),
        AppCommand::Interactive => cli::interactive::run(&app).await,
        AppCommand::ClearCache => {
            if app.cache.clear() {
                println!("Cached rates cleared");
                Ok(())
            } else {
                bail!("Could not clear cached rates")
            }
        }
    }
}

fn build_app(config: AppConfig, offline: bool) -> Result<App> {
    let data_path = config.data_path()?;
    std::fs::create_dir_all(&data_path)
        .with_context(|| format!("Failed to create data directory: {}", data_path.display()))?;

    let storage: Arc<dyn KvStorage> = Arc::new(DiskStorage::open(&data_path.join("cache")));
    let cache = RatesCache::new(Arc::clone(&storage), config.cache_ttl());
    let online = Arc::new(OnlineMonitor::new(!offline));
    let provider = providers::build_provider(&config)?;
    let orchestrator = Arc::new(RatesOrchestrator::new(
        provider,
        cache.clone(),
        Arc::clone(&online),
    ));

    Ok(App {
        config,
        storage,
        cache,
        online,
        orchestrator,
    })
}
