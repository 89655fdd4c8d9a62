use crate::utils::error::{BundleError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(BundleError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(BundleError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Rejects an output directory that would make the bundle overwrite its own input tree.
pub fn validate_distinct_paths(field_name: &str, root: &str, out_dir: &str) -> Result<()> {
    if Path::new(root) == Path::new(out_dir) {
        return Err(BundleError::InvalidConfigValue {
            field: field_name.to_string(),
            value: out_dir.to_string(),
            reason: "Output directory must differ from the root; omit it to write in place"
                .to_string(),
        });
    }
    Ok(())
}

pub fn validate_log_level(field_name: &str, level: &str) -> Result<()> {
    if !LOG_LEVELS.contains(&level) {
        return Err(BundleError::InvalidConfigValue {
            field: field_name.to_string(),
            value: level.to_string(),
            reason: format!("Valid levels: {}", LOG_LEVELS.join(", ")),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| BundleError::MissingConfig {
        field: field_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("root", "./src").is_ok());
        assert!(validate_path("root", "").is_err());
        assert!(validate_path("root", "  ").is_err());
        assert!(validate_path("root", "a\0b").is_err());
    }

    #[test]
    fn test_validate_distinct_paths() {
        assert!(validate_distinct_paths("out_dir", "src", "dist").is_ok());
        assert!(validate_distinct_paths("out_dir", "src", "src").is_err());
        assert!(validate_distinct_paths("out_dir", "src/", "src").is_err());
    }

    #[test]
    fn test_validate_log_level() {
        assert!(validate_log_level("monitoring.log_level", "debug").is_ok());
        assert!(validate_log_level("monitoring.log_level", "loud").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let missing: Option<String> = None;
        assert!(matches!(
            validate_required_field("bundle.root", &missing),
            Err(BundleError::MissingConfig { .. })
        ));
        assert_eq!(validate_required_field("x", &Some(3)).unwrap(), &3);
    }
}
