use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "restcapture.json";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CaptureProfileConfig {
    #[serde(rename = "baseUrl")]
    pub base_url: Option<String>,
    #[serde(rename = "defaultHeaders")]
    pub default_headers: BTreeMap<String, String>,
    #[serde(rename = "outputDir")]
    pub output_dir: Option<String>,
    #[serde(flatten)]
    pub extras: HashMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CaptureConfig {
    pub profiles: BTreeMap<String, CaptureProfileConfig>,
    #[serde(rename = "defaultProfile")]
    pub default_profile: Option<String>,
    #[serde(rename = "defaultHeaders")]
    pub default_headers: BTreeMap<String, String>,
    #[serde(rename = "outputDir")]
    pub output_dir: Option<String>,
    #[serde(flatten)]
    pub extras: HashMap<String, Value>,
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: CaptureConfig,
    pub path: PathBuf,
    pub dir: PathBuf,
}

pub fn load_config(target: &Path) -> Result<Option<LoadedConfig>> {
    let resolved = if target.is_absolute() {
        target.to_path_buf()
    } else {
        std::env::current_dir()?.join(target)
    };

    let (file_path, dir) = if resolved.is_dir() {
        (resolved.join(CONFIG_FILE_NAME), resolved)
    } else {
        let dir = match resolved.parent() {
            Some(parent) => parent.to_path_buf(),
            None => std::env::current_dir()?,
        };
        (resolved, dir)
    };

    if !file_path.exists() {
        debug!(path = %file_path.display(), "no config file found");
        return Ok(None);
    }

    let contents = fs::read_to_string(&file_path)
        .with_context(|| format!("reading config {}", file_path.display()))?;

    let config: CaptureConfig = serde_json::from_str(&contents)
        .with_context(|| format!("parsing config {}", file_path.display()))?;

    if !config.extras.is_empty() {
        let keys: Vec<_> = config.extras.keys().map(String::as_str).collect();
        debug!(?keys, "ignoring unknown config keys");
    }

    Ok(Some(LoadedConfig {
        config,
        path: file_path,
        dir,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn returns_none_when_config_missing() -> Result<()> {
        let temp = tempdir()?;
        let result = load_config(temp.path())?;
        assert!(result.is_none());
        Ok(())
    }

    #[test]
    fn loads_config_from_directory() -> Result<()> {
        let temp = tempdir()?;
        let config_path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &config_path,
            r#"{"profiles":{"local":{"baseUrl":"http://localhost:8080","outputDir":"docs"}}}"#,
        )?;

        let result = load_config(temp.path())?.expect("config should load");
        assert_eq!(result.path, config_path);
        assert_eq!(result.dir, temp.path());
        let profile = &result.config.profiles["local"];
        assert_eq!(profile.base_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(profile.output_dir.as_deref(), Some("docs"));
        Ok(())
    }

    #[test]
    fn loads_config_from_explicit_file() -> Result<()> {
        let temp = tempdir()?;
        let config_path = temp.path().join("custom.json");
        std::fs::write(
            &config_path,
            r#"{"defaultHeaders":{"Accept":"application/json"},"color":"blue"}"#,
        )?;

        let result = load_config(&config_path)?.expect("config should load");
        assert_eq!(result.dir, temp.path());
        assert_eq!(
            result.config.default_headers.get("Accept").map(String::as_str),
            Some("application/json")
        );
        assert!(result.config.extras.contains_key("color"));
        Ok(())
    }

    #[test]
    fn reports_invalid_json() -> Result<()> {
        let temp = tempdir()?;
        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "{ not json")?;
        let err = load_config(temp.path()).unwrap_err();
        assert!(err.to_string().contains("parsing config"));
        Ok(())
    }
}
