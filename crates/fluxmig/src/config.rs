use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::app::AppRef;

/// Default config file name, looked up in the current directory
pub const DEFAULT_CONFIG_FILE: &str = "fluxmig.toml";

/// Migration settings loaded from `fluxmig.toml`
///
/// ```toml
/// apps-dir = "kubernetes/apps"
/// app-template-version = "4.4.0"
/// oci-url = "oci://ghcr.io/bjw-s-labs/helm/app-template"
/// apps = ["media/sonarr/app"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct MigrateConfig {
    /// Root directory holding `<namespace>/<name>/app` directories.
    /// Relative paths are resolved against the config file's directory.
    pub apps_dir: PathBuf,

    /// Chart tag written into every generated OCIRepository
    pub app_template_version: String,

    /// OCI source url written into every generated OCIRepository
    pub oci_url: String,

    /// Applications to migrate, in order
    #[serde(default)]
    pub apps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("app-template-version must be a non-empty tag without whitespace, got '{0}'")]
    InvalidVersion(String),

    #[error("oci-url must start with oci://, got '{0}'")]
    InvalidOciUrl(String),

    #[error("no applications to migrate: list them under `apps` or pass them on the command line")]
    NoApps,
}

impl MigrateConfig {
    /// Parse from TOML string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config: {e}"))
    }

    /// Read, parse and validate a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut config =
            Self::parse(&content).with_context(|| format!("failed to parse {}", path.display()))?;

        if config.apps_dir.is_relative() {
            let base = path.parent().unwrap_or_else(|| Path::new(""));
            config.apps_dir = base.join(&config.apps_dir);
        }

        config
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let version = &self.app_template_version;
        if version.is_empty() || version.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidVersion(version.clone()));
        }
        if !self.oci_url.starts_with("oci://") || self.oci_url.len() == "oci://".len() {
            return Err(ConfigError::InvalidOciUrl(self.oci_url.clone()));
        }
        Ok(())
    }

    /// Applications to process: `overrides` when given, the configured list otherwise
    pub fn select_apps(&self, overrides: &[String]) -> Result<Vec<String>, ConfigError> {
        let apps = if overrides.is_empty() {
            self.apps.clone()
        } else {
            overrides.to_vec()
        };
        if apps.is_empty() {
            return Err(ConfigError::NoApps);
        }
        Ok(apps)
    }

    /// Directory of a single application
    pub fn app_dir(&self, app: &AppRef) -> PathBuf {
        self.apps_dir.join(&app.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CONFIG: &str = r#"
apps-dir = "kubernetes/apps"
app-template-version = "4.4.0"
oci-url = "oci://ghcr.io/bjw-s-labs/helm/app-template"
apps = ["media/sonarr/app", "ai/ollama/app"]
"#;

    #[test]
    fn test_parse_config() -> Result<()> {
        let config = MigrateConfig::parse(CONFIG)?;
        assert_eq!(config.apps_dir, PathBuf::from("kubernetes/apps"));
        assert_eq!(config.app_template_version, "4.4.0");
        assert_eq!(config.apps, vec!["media/sonarr/app", "ai/ollama/app"]);
        config.validate()?;
        Ok(())
    }

    #[test]
    fn test_example_config_is_valid() -> Result<()> {
        let config = MigrateConfig::parse(include_str!("../../../fluxmig.example.toml"))?;
        config.validate()?;
        assert_eq!(config.apps.len(), 27);
        for app in &config.apps {
            app.parse::<AppRef>()?;
        }
        Ok(())
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let content = format!("{CONFIG}\ndry-run = true\n");
        assert!(MigrateConfig::parse(&content).is_err());
    }

    #[test]
    fn test_missing_required_key() {
        let err = MigrateConfig::parse("apps-dir = \"apps\"\n").unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_relative_apps_dir_resolves_against_config() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("fluxmig.toml");
        fs::write(&path, CONFIG)?;

        let config = MigrateConfig::from_file(&path)?;
        assert_eq!(config.apps_dir, temp.path().join("kubernetes/apps"));

        let app: AppRef = "media/sonarr/app".parse()?;
        assert_eq!(
            config.app_dir(&app),
            temp.path().join("kubernetes/apps/media/sonarr/app")
        );
        Ok(())
    }

    #[test]
    fn test_validation() -> Result<()> {
        let mut config = MigrateConfig::parse(CONFIG)?;
        config.app_template_version = "4.4 .0".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidVersion("4.4 .0".to_string()))
        );

        let mut config = MigrateConfig::parse(CONFIG)?;
        config.oci_url = "https://ghcr.io/bjw-s-labs".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidOciUrl(_))
        ));
        Ok(())
    }

    #[test]
    fn test_select_apps() -> Result<()> {
        let mut config = MigrateConfig::parse(CONFIG)?;
        assert_eq!(config.select_apps(&[])?.len(), 2);
        assert_eq!(
            config.select_apps(&["home/evcc/app".to_string()])?,
            vec!["home/evcc/app"]
        );

        config.apps.clear();
        assert_eq!(config.select_apps(&[]), Err(ConfigError::NoApps));
        Ok(())
    }
}
