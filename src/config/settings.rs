use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use super::loader::{CaptureConfig, CaptureProfileConfig, LoadedConfig};

fn resolve_relative(base: &Path, value: &str) -> PathBuf {
    let candidate = Path::new(value);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base.join(candidate)
    }
}

/// Everything a capture run needs once config, profile and flags are merged.
#[derive(Debug, Clone)]
pub struct CaptureSettings {
    pub profile_name: Option<String>,
    pub base_url: Option<String>,
    pub default_headers: Vec<(String, String)>,
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct SettingsBuilder {
    base_dir: PathBuf,
    config_dir: PathBuf,
    config: Option<LoadedConfig>,
    requested_profile: Option<String>,
    explicit_output_dir: Option<PathBuf>,
}

impl SettingsBuilder {
    pub fn new(
        base_dir: PathBuf,
        config_dir: PathBuf,
        config: Option<LoadedConfig>,
        requested_profile: Option<String>,
        explicit_output_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            base_dir,
            config_dir,
            config,
            requested_profile,
            explicit_output_dir,
        }
    }

    pub fn build(&self) -> Result<CaptureSettings> {
        let mut profile_name = None;
        let mut base_url = None;
        let mut default_headers: Vec<(String, String)> = Vec::new();
        let mut output_dir = self
            .explicit_output_dir
            .as_ref()
            .map(|dir| resolve_relative(&self.base_dir, &dir.to_string_lossy()));

        match &self.config {
            Some(cfg) => {
                let profile = resolve_profile(&cfg.config, self.requested_profile.as_deref())?;

                for (name, value) in &cfg.config.default_headers {
                    merge_header(&mut default_headers, name, value);
                }

                if let Some(profile) = &profile {
                    profile_name = Some(profile.name.clone());
                    base_url = profile.config.base_url.clone();
                    for (name, value) in &profile.config.default_headers {
                        merge_header(&mut default_headers, name, value);
                    }
                    if output_dir.is_none() {
                        output_dir = profile
                            .config
                            .output_dir
                            .as_deref()
                            .map(|dir| resolve_relative(&self.config_dir, dir));
                    }
                }

                if output_dir.is_none() {
                    output_dir = cfg
                        .config
                        .output_dir
                        .as_deref()
                        .map(|dir| resolve_relative(&self.config_dir, dir));
                }
            }
            None => {
                if let Some(name) = &self.requested_profile {
                    bail!("Unknown profile: {} (no configuration found)", name);
                }
            }
        }

        Ok(CaptureSettings {
            profile_name,
            base_url,
            default_headers,
            output_dir,
        })
    }
}

fn merge_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers
        .iter_mut()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
    {
        Some(entry) => entry.1 = value.to_string(),
        None => headers.push((name.to_string(), value.to_string())),
    }
}

struct ResolvedProfile<'a> {
    name: String,
    config: &'a CaptureProfileConfig,
}

fn resolve_profile<'a>(
    config: &'a CaptureConfig,
    requested: Option<&str>,
) -> Result<Option<ResolvedProfile<'a>>> {
    if let Some(name) = requested {
        if let Some(profile) = config.profiles.get(name) {
            return Ok(Some(ResolvedProfile {
                name: name.to_string(),
                config: profile,
            }));
        }
        bail!("Unknown profile: {}", name);
    }

    if let Some(default) = &config.default_profile {
        if let Some(profile) = config.profiles.get(default) {
            return Ok(Some(ResolvedProfile {
                name: default.to_string(),
                config: profile,
            }));
        }
    }

    Ok(config
        .profiles
        .iter()
        .next()
        .map(|(name, profile)| ResolvedProfile {
            name: name.to_string(),
            config: profile,
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use anyhow::Result;
    use tempfile::tempdir;

    fn write_file(path: &Path, contents: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    const CONFIG: &str = r#"{
  "defaultHeaders": {"Accept": "application/json", "X-Client": "root"},
  "outputDir": "root-captures",
  "defaultProfile": "dev",
  "profiles": {
    "dev": {
      "baseUrl": "http://localhost:8080",
      "defaultHeaders": {"x-client": "dev"},
      "outputDir": "dev-captures"
    },
    "staging": {
      "baseUrl": "https://staging.example.com"
    }
  }
}
"#;

    #[test]
    fn profile_values_override_root_values() -> Result<()> {
        let temp = tempdir()?;
        let config_dir = temp.path().join("config");
        write_file(&config_dir.join("restcapture.json"), CONFIG);

        let loaded = load_config(&config_dir)?;
        let settings = SettingsBuilder::new(
            temp.path().to_path_buf(),
            config_dir.clone(),
            loaded,
            None,
            None,
        )
        .build()?;

        assert_eq!(settings.profile_name.as_deref(), Some("dev"));
        assert_eq!(settings.base_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(
            settings.default_headers,
            vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("X-Client".to_string(), "dev".to_string()),
            ]
        );
        assert_eq!(settings.output_dir, Some(config_dir.join("dev-captures")));
        Ok(())
    }

    #[test]
    fn falls_back_to_root_output_and_explicit_flag_wins() -> Result<()> {
        let temp = tempdir()?;
        let config_dir = temp.path().join("config");
        write_file(&config_dir.join("restcapture.json"), CONFIG);
        let loaded = load_config(&config_dir)?;

        let staging = SettingsBuilder::new(
            temp.path().to_path_buf(),
            config_dir.clone(),
            loaded.clone(),
            Some("staging".to_string()),
            None,
        )
        .build()?;
        assert_eq!(staging.output_dir, Some(config_dir.join("root-captures")));

        let explicit = SettingsBuilder::new(
            temp.path().to_path_buf(),
            config_dir.clone(),
            loaded,
            Some("staging".to_string()),
            Some(PathBuf::from("out")),
        )
        .build()?;
        assert_eq!(explicit.output_dir, Some(temp.path().join("out")));
        Ok(())
    }

    #[test]
    fn unknown_profile_is_an_error() -> Result<()> {
        let temp = tempdir()?;
        write_file(&temp.path().join("restcapture.json"), CONFIG);
        let loaded = load_config(temp.path())?;

        let err = SettingsBuilder::new(
            temp.path().to_path_buf(),
            temp.path().to_path_buf(),
            loaded,
            Some("prod".to_string()),
            None,
        )
        .build()
        .unwrap_err();
        assert!(err.to_string().contains("Unknown profile: prod"));
        Ok(())
    }

    #[test]
    fn works_without_config() -> Result<()> {
        let temp = tempdir()?;
        let settings = SettingsBuilder::new(
            temp.path().to_path_buf(),
            temp.path().to_path_buf(),
            None,
            None,
            None,
        )
        .build()?;
        assert!(settings.profile_name.is_none());
        assert!(settings.base_url.is_none());
        assert!(settings.default_headers.is_empty());
        assert!(settings.output_dir.is_none());
        Ok(())
    }
}
