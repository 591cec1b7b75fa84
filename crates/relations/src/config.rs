use crate::error::{RelationError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Hard cap on relationships kept per function
pub const MAX_RELATIONSHIPS: usize = 10;

/// How a function name is located inside snippet text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Plain case-sensitive substring search; `map` also matches inside `flatmap`
    #[default]
    Substring,

    /// Name must not be flanked by identifier characters
    WordBoundary,
}

/// Tunables for one engine run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,

    pub match_mode: MatchMode,

    /// Cumulative co-occurrence weight at which strength saturates to 1.0
    pub cooccurrence_saturation: f32,

    /// Proximity weight is `max(1, base - distance / scale)`
    pub proximity_base: f32,
    pub proximity_scale: f32,

    pub name_similarity_threshold: f32,

    /// Lines above the first call that are searched for prerequisites
    pub prerequisite_window: usize,

    /// Max characters of a snippet quoted as an example
    pub example_char_limit: usize,

    /// Max alternative lines annotated onto a consolidated workflow step
    pub max_alternative_examples: usize,

    /// Emit an empty map plus a warning instead of aborting when one function fails
    pub isolate_failures: bool,
}

impl Default for RelationConfig {
    fn default() -> Self {
        Self {
            schema_version: None,
            match_mode: MatchMode::Substring,
            cooccurrence_saturation: 10.0,
            proximity_base: 3.0,
            proximity_scale: 100.0,
            name_similarity_threshold: 0.6,
            prerequisite_window: 3,
            example_char_limit: 200,
            max_alternative_examples: 3,
            isolate_failures: false,
        }
    }
}

impl RelationConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            RelationError::Config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        Self::from_bytes(&bytes)
    }

    /// Parse JSON or TOML configuration
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let config: Self = match serde_json::from_slice(bytes) {
            Ok(config) => config,
            Err(json_err) => {
                let text = std::str::from_utf8(bytes).map_err(|e| {
                    RelationError::Config(format!("Config is not valid UTF-8: {e}"))
                })?;
                toml::from_str(text).map_err(|toml_err| {
                    RelationError::Config(format!(
                        "Config is not valid JSON ({json_err}) or TOML ({toml_err})"
                    ))
                })?
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(version) = self.schema_version {
            if version != CONFIG_SCHEMA_VERSION {
                return Err(RelationError::Config(format!(
                    "schema_version {version} is not supported (expected {CONFIG_SCHEMA_VERSION})"
                )));
            }
        }

        let positive = [
            ("cooccurrence_saturation", self.cooccurrence_saturation),
            ("proximity_base", self.proximity_base),
            ("proximity_scale", self.proximity_scale),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(RelationError::Config(format!(
                    "{field} must be a positive number, got {value}"
                )));
            }
        }

        if !self.name_similarity_threshold.is_finite()
            || !(0.0..=1.0).contains(&self.name_similarity_threshold)
        {
            return Err(RelationError::Config(format!(
                "name_similarity_threshold must be within [0, 1], got {}",
                self.name_similarity_threshold
            )));
        }

        if self.prerequisite_window == 0 {
            return Err(RelationError::Config(
                "prerequisite_window must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_toml_with_defaults() {
        let config = RelationConfig::from_bytes(
            b"match_mode = \"word_boundary\"\nprerequisite_window = 5\n",
        )
        .unwrap();

        assert_eq!(config.match_mode, MatchMode::WordBoundary);
        assert_eq!(config.prerequisite_window, 5);
        assert_eq!(config.example_char_limit, 200);
        assert!((config.name_similarity_threshold - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn parses_json() {
        let config =
            RelationConfig::from_bytes(br#"{"cooccurrence_saturation": 5.0}"#).unwrap();
        assert!((config.cooccurrence_saturation - 5.0).abs() < f32::EPSILON);
        assert_eq!(config.match_mode, MatchMode::Substring);
    }

    #[test]
    fn rejects_unknown_schema_version() {
        let err = RelationConfig::from_bytes(b"schema_version = 7").unwrap_err();
        assert!(err.to_string().contains("schema_version"));
    }

    #[test]
    fn rejects_zero_window() {
        let err = RelationConfig::from_bytes(b"prerequisite_window = 0").unwrap_err();
        assert!(matches!(err, RelationError::Config(_)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(RelationConfig::from_bytes(b"{{ not config").is_err());
    }
}
