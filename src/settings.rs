use miette::{IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::loader::PolicyFormat;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub policy: PolicySource,
    /// Mount prefix stripped before resource extraction, e.g. "/ApiV1".
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicySource {
    /// Path to the policy document. Default: policy.json
    pub path: PathBuf,
    /// Explicit document format; inferred from the file extension when
    /// unset.
    #[serde(default)]
    pub format: Option<PolicyFormat>,
}

impl Default for PolicySource {
    fn default() -> Self {
        Self {
            path: PathBuf::from("policy.json"),
            format: None,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> Result<Self> {
        let mut builder = config::Config::builder().set_default(
            "policy.path",
            PolicySource::default().path.to_string_lossy().to_string(),
        )
        .into_diagnostic()?;

        // Optional file
        if Path::new(path).exists() {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment overrides: TURNPIKE__POLICY__PATH=/etc/acl.yml, etc.
        builder = builder.add_source(config::Environment::with_prefix("TURNPIKE").separator("__"));

        let cfg = builder.build().into_diagnostic()?;
        let mut s: Settings = cfg.try_deserialize().into_diagnostic()?;

        // Normalize the policy path to be relative to the current dir
        if s.policy.path.is_relative() {
            s.policy.path = std::env::current_dir()
                .into_diagnostic()?
                .join(&s.policy.path);
        }

        Ok(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_settings_load_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nonexistent.toml");

        let settings =
            Settings::load(config_path.to_str().unwrap()).expect("Failed to load settings");

        assert!(settings.policy.path.ends_with("policy.json"));
        assert!(settings.policy.format.is_none());
        assert!(settings.base_url.is_none());
    }

    #[test]
    fn test_settings_load_from_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("test_config.toml");

        let config_content = r#"
base_url = "/ApiV1"

[policy]
path = "/etc/turnpike/acl.conf"
format = "yaml"
"#;
        fs::write(&config_path, config_content).expect("Failed to write config");

        let settings =
            Settings::load(config_path.to_str().unwrap()).expect("Failed to load settings");

        assert_eq!(settings.policy.path, PathBuf::from("/etc/turnpike/acl.conf"));
        assert_eq!(settings.policy.format, Some(PolicyFormat::Yaml));
        assert_eq!(settings.base_url.as_deref(), Some("/ApiV1"));
    }

    #[test]
    fn test_settings_env_override() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("test_config.toml");

        fs::write(&config_path, "[policy]\npath = \"/from/file.json\"\n")
            .expect("Failed to write config");

        env::set_var("TURNPIKE__POLICY__PATH", "/from/env.yml");

        let settings =
            Settings::load(config_path.to_str().unwrap()).expect("Failed to load settings");

        assert_eq!(settings.policy.path, PathBuf::from("/from/env.yml"));

        env::remove_var("TURNPIKE__POLICY__PATH");
    }

    #[test]
    fn test_settings_path_normalization() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("test_config.toml");

        fs::write(&config_path, "[policy]\npath = \"relative/acl.json\"\n")
            .expect("Failed to write config");

        let settings =
            Settings::load(config_path.to_str().unwrap()).expect("Failed to load settings");

        assert!(settings.policy.path.is_absolute());
        assert!(settings.policy.path.ends_with("relative/acl.json"));
    }
}
