use crate::core::ConfigProvider;
use crate::utils::error::{BundleError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub bundle: BundleSection,
    pub output: Option<OutputConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleSection {
    pub root: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub out_dir: Option<String>,
    pub dry_run: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| BundleError::ConfigValidation {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SRC_ROOT})；未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        let re = Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid");

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("bundle.root", &self.bundle.root)?;

        if let Some(out_dir) = self.out_dir() {
            validation::validate_path("output.out_dir", out_dir)?;
            validation::validate_distinct_paths("output.out_dir", &self.bundle.root, out_dir)?;
        }

        if let Some(level) = self.log_level() {
            validation::validate_log_level("monitoring.log_level", level)?;
        }

        Ok(())
    }

    pub fn name(&self) -> &str {
        self.bundle.name.as_deref().unwrap_or("bundle")
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }

    pub fn set_dry_run(&mut self, dry_run: bool) {
        self.output.get_or_insert_with(OutputConfig::default).dry_run = Some(dry_run);
    }
}

impl ConfigProvider for TomlConfig {
    fn root(&self) -> &str {
        &self.bundle.root
    }

    fn out_dir(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.out_dir.as_deref())
    }

    fn dry_run(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.dry_run)
            .unwrap_or(false)
    }

    fn monitor(&self) -> bool {
        self.monitoring_enabled()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config() {
        let config = TomlConfig::from_toml_str(
            r#"
[bundle]
root = "./templates"
"#,
        )
        .unwrap();

        assert_eq!(config.root(), "./templates");
        assert_eq!(config.name(), "bundle");
        assert!(config.out_dir().is_none());
        assert!(!config.dry_run());
        assert!(!config.monitor());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let config = TomlConfig::from_toml_str(
            r#"
[bundle]
name = "site"
root = "./templates"

[output]
out_dir = "./dist"
dry_run = true

[monitoring]
enabled = true
log_level = "debug"
"#,
        )
        .unwrap();

        assert_eq!(config.name(), "site");
        assert_eq!(config.out_dir(), Some("./dist"));
        assert!(config.dry_run());
        assert!(config.monitor());
        assert_eq!(config.log_level(), Some("debug"));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("REQUIRE_BUNDLER_TEST_ROOT", "/srv/tree");

        let config = TomlConfig::from_toml_str(
            r#"
[bundle]
root = "${REQUIRE_BUNDLER_TEST_ROOT}/src"
"#,
        )
        .unwrap();
        assert_eq!(config.root(), "/srv/tree/src");

        std::env::remove_var("REQUIRE_BUNDLER_TEST_ROOT");
    }

    #[test]
    fn test_unset_env_var_left_verbatim() {
        let config = TomlConfig::from_toml_str(
            r#"
[bundle]
root = "${REQUIRE_BUNDLER_SURELY_UNSET}"
"#,
        )
        .unwrap();
        assert_eq!(config.root(), "${REQUIRE_BUNDLER_SURELY_UNSET}");
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let config = TomlConfig::from_toml_str(
            r#"
[bundle]
root = "src"

[monitoring]
enabled = false
log_level = "chatty"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_bundle_section_is_parse_error() {
        let err = TomlConfig::from_toml_str("[output]\ndry_run = true\n").unwrap_err();
        assert!(matches!(err, BundleError::ConfigValidation { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[bundle]\nroot = \"from-file\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.root(), "from-file");
    }
}
