//! Host configuration.
//!
//! Layered, lowest precedence first: built-in defaults, the TOML file
//! (optional), `SUMWISE_*` environment variables, then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Where the store lives when nothing else says otherwise.
pub const DEFAULT_STORE_PATH: &str = "~/.local/share/sumwise/sumwise.db";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
  pub store_path: PathBuf,
}

impl Settings {
  /// Read `config_path` (if it exists) and the environment, then apply a
  /// command-line store override.
  pub fn load(
    config_path: &Path,
    store_override: Option<&Path>,
  ) -> anyhow::Result<Self> {
    let raw = config::Config::builder()
      .set_default("store_path", DEFAULT_STORE_PATH)?
      .add_source(config::File::from(config_path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("SUMWISE"))
      .build()
      .context("failed to read config file")?;

    let mut settings: Settings = raw
      .try_deserialize()
      .context("failed to deserialise Settings")?;

    if let Some(path) = store_override {
      settings.store_path = path.to_path_buf();
    }
    settings.store_path = expand_tilde(&settings.store_path);
    Ok(settings)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  #[test]
  fn file_value_and_override() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "store_path = \"/tmp/from-file.db\"").unwrap();

    let from_file = Settings::load(file.path(), None).unwrap();
    assert_eq!(from_file.store_path, PathBuf::from("/tmp/from-file.db"));

    let overridden =
      Settings::load(file.path(), Some(Path::new("/tmp/flag.db"))).unwrap();
    assert_eq!(overridden.store_path, PathBuf::from("/tmp/flag.db"));
  }

  #[test]
  fn missing_file_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let settings =
      Settings::load(&dir.path().join("absent.toml"), None).unwrap();
    assert!(settings.store_path.ends_with("sumwise/sumwise.db"));
  }

  #[test]
  fn tilde_expands_only_as_prefix() {
    let plain = Path::new("/var/lib/sumwise.db");
    assert_eq!(expand_tilde(plain), plain);
    let odd = Path::new("data/~/x.db");
    assert_eq!(expand_tilde(odd), odd);
  }
}
