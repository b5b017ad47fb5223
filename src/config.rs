use std::{fmt, fs, io, path::Path};

use crate::{assets::AssetRule, global};

#[derive(serde::Deserialize, serde::Serialize, PartialEq, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_asset_extension")]
    pub asset_extension: String,
    #[serde(default = "default_legacy_architectures")]
    pub legacy_architectures: Vec<String>,
}

fn default_asset_extension() -> String {
    global::DEFAULT_ASSET_EXTENSION.to_string()
}

fn default_legacy_architectures() -> Vec<String> {
    global::DEFAULT_LEGACY_ARCHITECTURES
        .iter()
        .map(|arch| arch.to_string())
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asset_extension: default_asset_extension(),
            legacy_architectures: default_legacy_architectures(),
        }
    }
}

impl Config {
    pub fn asset_rule(&self) -> AssetRule {
        AssetRule {
            extension: self.asset_extension.clone(),
            architectures: self.legacy_architectures.clone(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read { path: String, source: io::Error },
    Parse { path: String, source: serde_json::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Could not read config '{}': {}", path, source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Could not parse config '{}': {}", path, source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

/// Built-in defaults when no path is given, otherwise the file must exist and parse.
pub fn load(config_path: Option<&Path>) -> Result<Config, ConfigError> {
    let Some(config_path) = config_path else {
        log::debug!("No config file given, using defaults");
        return Ok(Config::default());
    };

    log::debug!("Loading config from: {}", config_path.display());
    let cfg_str = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
        path: config_path.display().to_string(),
        source,
    })?;
    let cfg: Config = serde_json::from_str(&cfg_str).map_err(|source| ConfigError::Parse {
        path: config_path.display().to_string(),
        source,
    })?;

    log::debug!("Loaded config: {:?}", cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_no_path_gives_defaults() {
        let cfg = load(None).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.asset_rule(), AssetRule::default());
    }

    #[test]
    fn test_missing_fields_are_defaulted() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"legacy_architectures": ["riscv64"]}}"#).unwrap();

        let cfg = load(Some(file.path())).unwrap();
        assert_eq!(cfg.asset_extension, ".AppImage");
        assert_eq!(cfg.legacy_architectures, vec!["riscv64".to_string()]);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
