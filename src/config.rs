// Tue Jan 13 2026 - Alex

use crate::graph::DEFAULT_IGNORED_PREFIXES;
use crate::memory::DEFAULT_REGION_SIZE_LIMIT;
use crate::rtti::{ParseLimits, DEFAULT_MAX_BASE_COUNT, DEFAULT_MAX_NAME_LENGTH};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GraphFormat {
    #[default]
    Dot,
    Json,
}

impl GraphFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            GraphFormat::Dot => "dot",
            GraphFormat::Json => "json",
        }
    }
}

impl fmt::Display for GraphFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub generate_graph: bool,
    pub ignored_prefixes: Vec<String>,
    pub output_path: Option<PathBuf>,
    pub format: GraphFormat,
    pub region_size_limit: u64,
    pub max_name_length: usize,
    pub max_base_count: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generate_graph: true,
            ignored_prefixes: DEFAULT_IGNORED_PREFIXES.iter().map(|p| p.to_string()).collect(),
            output_path: None,
            format: GraphFormat::Dot,
            region_size_limit: DEFAULT_REGION_SIZE_LIMIT,
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
            max_base_count: DEFAULT_MAX_BASE_COUNT,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn with_output_path(mut self, output: PathBuf) -> Self {
        self.output_path = Some(output);
        self
    }

    pub fn with_format(mut self, format: GraphFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_ignored_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.ignored_prefixes = prefixes;
        self
    }

    pub fn with_generate_graph(mut self, generate: bool) -> Self {
        self.generate_graph = generate;
        self
    }

    pub fn parse_limits(&self) -> ParseLimits {
        ParseLimits {
            max_name_length: self.max_name_length,
            max_base_count: self.max_base_count,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.region_size_limit == 0 {
            return Err(ConfigError::Invalid("region_size_limit must be greater than 0".to_string()));
        }
        if self.max_name_length == 0 {
            return Err(ConfigError::Invalid("max_name_length must be greater than 0".to_string()));
        }
        if self.max_base_count == 0 {
            return Err(ConfigError::Invalid("max_base_count must be greater than 0".to_string()));
        }
        if self.generate_graph && self.output_path.is_none() {
            return Err(ConfigError::Invalid("output_path must be set to generate a graph".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.generate_graph);
        assert_eq!(config.ignored_prefixes, vec!["std", "type_info"]);
        assert_eq!(config.format, GraphFormat::Dot);
        assert_eq!(config.region_size_limit, 100 * 1024 * 1024);
        assert_eq!(config.parse_limits(), ParseLimits::default());
    }

    #[test]
    fn test_validate() {
        assert!(matches!(Config::default().validate(), Err(ConfigError::Invalid(_))));
        assert!(Config::default().with_generate_graph(false).validate().is_ok());

        let config = Config::default().with_output_path(PathBuf::from("classes.dot"));
        assert!(config.validate().is_ok());

        let mut zero = config.clone();
        zero.max_base_count = 0;
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_from_file_with_partial_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"format": "json", "ignored_prefixes": ["boost"], "max_base_count": 32}}"#).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.format, GraphFormat::Json);
        assert_eq!(config.ignored_prefixes, vec!["boost"]);
        assert_eq!(config.max_base_count, 32);
        assert_eq!(config.max_name_length, 1000);
        assert!(config.generate_graph);
    }

    #[test]
    fn test_from_file_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(Config::from_file(file.path()), Err(ConfigError::Parse(_))));
        assert!(matches!(
            Config::from_file("/nonexistent/class-informer.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
