//! `sumwise` — command-line host for the Sumwise fact store.
//!
//! Every invocation opens the store and performs first-run seeding before
//! dispatching the subcommand, so the starter facts exist from the very first
//! run and are never generated twice for the same store.
//!
//! # Usage
//!
//! ```text
//! sumwise list --op subtract --band 6
//! sumwise attempt 6+8 --seconds 2.4
//! sumwise --store /tmp/demo.db history 6+8
//! ```

mod commands;
mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use commands::Command;
use settings::Settings;
use sumwise_core::seeding::{SeedOutcome, seed_if_needed};
use sumwise_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Arithmetic fact practice store")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "sumwise.toml")]
  config: PathBuf,

  /// Store file; overrides the configuration.
  #[arg(long, value_name = "PATH")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing; stdout is reserved for command output.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config, cli.store.as_deref())?;

  if let Some(parent) = settings.store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }

  let store = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;

  match seed_if_needed(&store).await.context("first-run seeding failed")? {
    SeedOutcome::Seeded { inserted } => {
      tracing::info!("Seeded {inserted} facts on first launch");
    }
    SeedOutcome::AlreadySeeded => {}
  }

  commands::run(&store, cli.command.unwrap_or(Command::Seed)).await
}
