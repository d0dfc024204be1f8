//! Codegen settings file.
//!
//! ```toml
//! [type_map]
//! MONEY = "rust_decimal::Decimal"
//! DATETIMEOFFSET = "String"
//! ```

use crate::error::{CodegenError, Result};
use crate::type_mapping::TypeMap;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CodegenSettings {
    /// SQL type name to Rust type path, merged over the built-in map
    pub type_map: BTreeMap<String, String>,
}

impl CodegenSettings {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| CodegenError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| CodegenError::Settings {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Settings from `path` if given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn type_map(&self) -> Result<TypeMap> {
        let mut type_map = TypeMap::default();
        for (sql_type, rust_type) in &self.type_map {
            type_map.insert(sql_type, rust_type)?;
        }
        Ok(type_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_overrides_merge_over_builtin_map() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("codegen.toml");
        fs::write(
            &path,
            "[type_map]\nmoney = \"rust_decimal::Decimal\"\nGEOGRAPHY = \"Vec<u8>\"\n",
        )
        .unwrap();

        let settings = CodegenSettings::from_file(&path).unwrap();
        let type_map = settings.type_map().unwrap();

        assert_eq!(type_map.rust_type_name("MONEY"), "rust_decimal::Decimal");
        assert_eq!(type_map.rust_type_name("geography"), "Vec<u8>");
        assert_eq!(type_map.rust_type_name("INT"), "i32");
    }

    #[test]
    fn test_invalid_rust_type_is_rejected() {
        let settings = CodegenSettings {
            type_map: BTreeMap::from([("INT".to_string(), "not a type!".to_string())]),
        };
        assert!(matches!(
            settings.type_map(),
            Err(CodegenError::InvalidType { .. })
        ));
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[type_map\n").unwrap();

        let err = CodegenSettings::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_missing_settings_path_means_defaults() {
        let settings = CodegenSettings::load(None).unwrap();
        assert!(settings.type_map.is_empty());
    }
}
