use std::path::{Path, PathBuf};

use overlord_game::{Catalog, DataLoader, EngineConfig, LoadError};

/// Bundled catalog plus an optional balance override read from disk.
#[derive(Debug, Clone, Default)]
pub struct TesterContent {
    config_path: Option<PathBuf>,
}

impl TesterContent {
    #[must_use]
    pub const fn new(config_path: Option<PathBuf>) -> Self {
        Self { config_path }
    }

    #[must_use]
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

impl DataLoader for TesterContent {
    type Error = LoadError;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        Ok(Catalog::bundled()?)
    }

    fn load_config(&self) -> Result<EngineConfig, Self::Error> {
        let Some(path) = self.config_path.as_ref() else {
            return Ok(EngineConfig::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        log::debug!("balance override loaded from {}", path.display());
        Ok(EngineConfig::from_json(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlord_game::Engine;

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "overlord-content-{label}-{}.json",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn defaults_without_override() {
        let engine = Engine::from_loader(&TesterContent::default()).unwrap();
        assert_eq!(engine.config(), &EngineConfig::default());
    }

    #[test]
    fn reads_partial_override_from_disk() {
        let path = temp_path("override");
        std::fs::write(&path, r#"{ "start": { "coins": 300 } }"#).unwrap();
        let content = TesterContent::new(Some(path.clone()));
        let engine = Engine::from_loader(&content).unwrap();
        assert_eq!(engine.initial_state().player.coins, 300);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_file_reports_its_path() {
        let path = temp_path("missing");
        let err = Engine::from_loader(&TesterContent::new(Some(path.clone()))).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains(&path.display().to_string()));
    }
}
