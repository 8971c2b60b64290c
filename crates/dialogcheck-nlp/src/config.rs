//! Tagger configuration: patterns, known companies and lexicon extensions.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::patterns::{FAREWELL_PATTERN, GREETING_PATTERN};

/// Everything a [`DialogueTagger`](crate::DialogueTagger) is built from.
///
/// Missing fields in a config file fall back to the defaults, so a file
/// containing only `{"known_companies": ["ромашка"]}` is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaggerConfig {
    /// Case-insensitive regex for greetings.
    pub greeting_pattern: String,
    /// Case-insensitive regex for farewells.
    pub farewell_pattern: String,
    /// Literal company names; checked before the company grammar.
    pub known_companies: Vec<String>,
    /// Extra first names for the morphology lexicon.
    pub names: Vec<String>,
    /// Extra organization names for the morphology lexicon.
    pub organizations: Vec<String>,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            greeting_pattern: GREETING_PATTERN.to_string(),
            farewell_pattern: FAREWELL_PATTERN.to_string(),
            known_companies: Vec::new(),
            names: Vec::new(),
            organizations: Vec::new(),
        }
    }
}

impl TaggerConfig {
    /// Load a config from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_use_builtin_patterns() {
        let config = TaggerConfig::default();
        assert_eq!(config.greeting_pattern, GREETING_PATTERN);
        assert_eq!(config.farewell_pattern, FAREWELL_PATTERN);
        assert!(config.known_companies.is_empty());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"known_companies": ["Ромашка"], "names": ["Аристарх"]}}"#).unwrap();

        let config = TaggerConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.known_companies, ["Ромашка"]);
        assert_eq!(config.names, ["Аристарх"]);
        assert_eq!(config.greeting_pattern, GREETING_PATTERN);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"greeting": "привет"}}"#).unwrap();

        let err = TaggerConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = TaggerConfig::from_json_file(Path::new("/nonexistent/dialogcheck.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
