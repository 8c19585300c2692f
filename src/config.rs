use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::constants::constants;

/// User preferences persisted in `<config dir>/reel/prefs.toml`.
#[derive(Serialize, Deserialize, Default, Debug, PartialEq, Eq)]
pub struct Config {
  pub catalog: Option<String>,
  pub theme_name: Option<String>,
}

impl Config {
  pub fn load() -> Self {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "reel") {
      let config_file = proj_dirs.config_dir().join("prefs.toml");
      if let Ok(content) = std::fs::read_to_string(config_file)
        && let Ok(config) = toml::from_str(&content)
      {
        return config;
      }
    }
    Self::default()
  }

  pub fn save(&self) {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "reel") {
      let config_dir = proj_dirs.config_dir();
      if std::fs::create_dir_all(config_dir).is_ok() {
        let config_file = config_dir.join("prefs.toml");
        if let Ok(content) = toml::to_string(self) {
          let _ = std::fs::write(config_file, content);
        }
      }
    }
  }

  /// Pick the catalog source: command line first, then preferences, then the embedded default.
  pub fn catalog_source(&self, cli: Option<&str>) -> String {
    cli
      .filter(|s| !s.trim().is_empty())
      .map(str::to_string)
      .or_else(|| self.catalog.clone().filter(|s| !s.trim().is_empty()))
      .unwrap_or_else(|| constants().default_catalog.clone())
  }
}
