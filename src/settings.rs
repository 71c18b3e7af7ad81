use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Environment variable for an optional Mapbox tile key. When unset, the
/// frontend falls back to OpenStreetMap tiles.
pub const TILE_KEY_ENV: &str = "WANDERPIXIE_TILE_KEY";

pub const DEFAULT_WIKI_API_BASE: &str = "https://en.wikipedia.org/w/api.php";

#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub auto_open_browser: bool,
    /// Optional JSON file overriding the bundled curated dataset.
    pub dataset_path: Option<String>,
    pub wiki_api_base: String,
    pub wiki_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 5000,
            auto_open_browser: false,
            dataset_path: None,
            wiki_api_base: DEFAULT_WIKI_API_BASE.to_string(),
            wiki_timeout_secs: 10,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut settings = Settings::default();
        if !config_path.exists() {
            return Ok(settings);
        }

        let file = File::open(config_path).context("Failed to open config file")?;
        let reader = BufReader::new(file);
        let mut config_map = HashMap::new();

        for line in reader.lines() {
            let line = line.context("Failed to read line from config")?;
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                config_map.insert(key.trim().to_string(), value.trim().to_string());
            }
        }

        if let Some(port_str) = config_map.get("port") {
            if let Ok(port) = port_str.parse::<u16>() {
                settings.port = port;
            }
        }
        if let Some(auto_open_str) = config_map.get("auto_open_browser") {
            if let Ok(auto_open) = auto_open_str.parse::<bool>() {
                settings.auto_open_browser = auto_open;
            }
        }
        if let Some(dataset_path) = config_map.get("dataset_path") {
            let trimmed = dataset_path.trim_matches('"');
            if !trimmed.is_empty() {
                settings.dataset_path = Some(trimmed.to_string());
            }
        }
        if let Some(api_base) = config_map.get("wiki_api_base") {
            let trimmed = api_base.trim_matches('"');
            if !trimmed.is_empty() {
                settings.wiki_api_base = trimmed.to_string();
            }
        }
        if let Some(timeout_str) = config_map.get("wiki_timeout_secs") {
            if let Ok(timeout) = timeout_str.parse::<u64>() {
                settings.wiki_timeout_secs = timeout;
            }
        }

        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Creating config directory")?;
        }

        let mut content = String::new();
        content.push_str("# WanderPixie Configuration File\n");
        content.push_str(&format!("port = {}\n", self.port));
        content.push_str(&format!("auto_open_browser = {}\n", self.auto_open_browser));
        if let Some(ref dataset_path) = self.dataset_path {
            content.push_str(&format!("dataset_path = \"{}\"\n", dataset_path));
        }
        content.push_str(&format!("wiki_api_base = \"{}\"\n", self.wiki_api_base));
        content.push_str(&format!("wiki_timeout_secs = {}\n", self.wiki_timeout_secs));

        std::fs::write(config_path, content).context("Failed to write to config file")?;
        Ok(())
    }

    /// Mapbox tile key from the environment, if any.
    pub fn tile_key(&self) -> Option<String> {
        std::env::var(TILE_KEY_ENV).ok().filter(|k| !k.is_empty())
    }

    pub fn config_path() -> PathBuf {
        let mut path = std::env::current_exe()
            .unwrap_or_default()
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        if path.ends_with("target/debug") || path.ends_with("target/release") {
            path.pop();
            path.pop();
        }
        path.push("wanderpixie.ini");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("absent.ini")).unwrap();
        assert_eq!(settings.port, 5000);
        assert!(!settings.auto_open_browser);
        assert_eq!(settings.wiki_api_base, DEFAULT_WIKI_API_BASE);
        assert!(settings.dataset_path.is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wanderpixie.ini");

        let settings = Settings {
            port: 8080,
            auto_open_browser: true,
            dataset_path: Some("/tmp/places.json".to_string()),
            wiki_api_base: "http://localhost:9999/w/api.php".to_string(),
            wiki_timeout_secs: 3,
        };
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.port, 8080);
        assert!(loaded.auto_open_browser);
        assert_eq!(loaded.dataset_path.as_deref(), Some("/tmp/places.json"));
        assert_eq!(loaded.wiki_api_base, "http://localhost:9999/w/api.php");
        assert_eq!(loaded.wiki_timeout_secs, 3);
    }

    #[test]
    fn unknown_keys_and_comments_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wanderpixie.ini");
        std::fs::write(&path, "# comment\nsomething_else = 42\nport = 7000\n").unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.port, 7000);
        assert!(!loaded.auto_open_browser);
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wanderpixie.ini");
        std::fs::write(&path, "port = not-a-number\nauto_open_browser = maybe\n").unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.port, 5000);
        assert!(!loaded.auto_open_browser);
    }
}
