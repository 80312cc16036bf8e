//! Sitewright - assembles static websites from template fragments.

mod assembler;
mod build;
mod cli;
mod config;
mod export;
mod fragment;
mod init;
mod logger;
mod preview;
mod serve;
mod spec;
mod store;
mod template;
mod utils;

use anyhow::{Result, bail};
use build::build_site;
use clap::Parser;
use cli::{Cli, Commands};
use config::{SiteConfig, cfg, init_config};
use fragment::FragmentStore;
use init::new_project;
use serve::serve_site;
use std::path::Path;
use store::SiteStore;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_config(load_config(&cli)?);

    match &cli.command {
        Commands::Init { prompt, .. } => new_project(&cfg(), prompt.as_deref()),
        Commands::Build { spec, .. } => build_site(&cfg(), spec),
        Commands::Serve { .. } => serve_site(),
        Commands::Components => list_components(),
        Commands::Sites => list_sites(&cfg()),
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        SiteConfig::from_path(&config_path)?
    } else {
        SiteConfig::default()
    };
    config.update_with_cli(cli);

    // `components` needs no project, everything else but `init` does
    let config_exists = config.config_path.exists();
    match (&cli.command, config_exists) {
        (Commands::Init { .. }, true) => {
            bail!("Config file already exists. Remove it manually or init in a different path.")
        }
        (Commands::Init { .. } | Commands::Components, _) => {}
        (_, false) => bail!("Config file not found."),
        _ => {}
    }

    if !cli.is_init() {
        config.validate()?;
    }

    Ok(config)
}

fn list_components() -> Result<()> {
    let fragments = FragmentStore::builtin();
    for category in fragments.categories() {
        for info in fragments.by_category(category) {
            let variants: Vec<_> = fragments
                .variants(info.id)
                .into_iter()
                .map(|fragment| fragment.variant)
                .collect();
            log!(category; "{} ({}) - {}", info.id, variants.join(", "), info.description);
        }
    }
    Ok(())
}

fn list_sites(config: &SiteConfig) -> Result<()> {
    let sites = SiteStore::open(&config.store.dir)?.list()?;
    if sites.is_empty() {
        log!("store"; "no sites in {}", config.store.dir.display());
    }
    for site in sites {
        log!("store"; "{} {} [{}] {}", site.id, site.name, site.status.as_str(), site.created_at);
    }
    Ok(())
}
