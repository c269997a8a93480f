use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 1000;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PhasekeeperConfig {
    pub project: ProjectConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ProjectConfig {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LifecycleConfig {
    /// Pause between marking a unit `transitioning` and writing its new phase.
    pub settle_delay_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
        }
    }
}

impl Default for PhasekeeperConfig {
    fn default() -> Self {
        Self::named("phasekeeper")
    }
}

impl PhasekeeperConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            project: ProjectConfig { name: name.into() },
            server: ServerConfig::default(),
            lifecycle: LifecycleConfig::default(),
        }
    }

    /// Reads `path`, falling back to defaults when the file does not exist.
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        tokio::fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = PhasekeeperConfig::named("rede-sul");
        config.server.port = 4000;
        config.save(&path).await.unwrap();

        let loaded = PhasekeeperConfig::load(&path).await.unwrap();
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = PhasekeeperConfig::load(&dir.path().join("absent.toml"))
            .await
            .unwrap();
        assert_eq!(loaded.server.port, DEFAULT_PORT);
        assert_eq!(loaded.lifecycle.settle_delay_ms, DEFAULT_SETTLE_DELAY_MS);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: PhasekeeperConfig = toml::from_str("[project]\nname = \"x\"\n").unwrap();
        assert_eq!(config.project.name, "x");
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.lifecycle.settle_delay_ms, DEFAULT_SETTLE_DELAY_MS);
    }

    #[test]
    fn test_settle_delay_override() {
        let config: PhasekeeperConfig =
            toml::from_str("[project]\nname = \"x\"\n[lifecycle]\nsettle_delay_ms = 0\n").unwrap();
        assert_eq!(config.lifecycle.settle_delay_ms, 0);
    }
}
