//! Logging configuration
//!
//! Per-component log levels and output destinations for the alignment system.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Global log level (trace, debug, info, warn, error)
    pub global_level: String,

    /// Enable console output
    pub console_output: bool,

    /// Directory for JSON log files (None = no file logging)
    pub log_directory: Option<PathBuf>,

    /// Include file location in logs
    pub include_file_location: bool,

    /// Level for the alignment core (pair trials, orchestrator passes)
    pub alignment_level: String,

    /// Level for summaries and benchmarks
    pub analysis_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            global_level: "info".to_string(),
            console_output: true,
            log_directory: None,
            include_file_location: false,
            alignment_level: "info".to_string(),
            analysis_level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Verbose logging including every accepted anchor
    pub fn development() -> Self {
        Self {
            global_level: "debug".to_string(),
            console_output: true,
            log_directory: Some(PathBuf::from("logs")),
            include_file_location: true,
            alignment_level: "trace".to_string(),
            analysis_level: "debug".to_string(),
        }
    }

    /// Warnings and errors only
    pub fn quiet() -> Self {
        Self {
            global_level: "warn".to_string(),
            alignment_level: "warn".to_string(),
            analysis_level: "warn".to_string(),
            ..Self::default()
        }
    }

    /// Same configuration with every level set to `level`
    pub fn with_level(mut self, level: &str) -> Self {
        self.global_level = level.to_string();
        self.alignment_level = level.to_string();
        self.analysis_level = level.to_string();
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, level) in [
            ("global_level", &self.global_level),
            ("alignment_level", &self.alignment_level),
            ("analysis_level", &self.analysis_level),
        ] {
            if !VALID_LEVELS.contains(&level.as_str()) {
                return Err(format!(
                    "Invalid {}: {}. Must be one of: {:?}",
                    name, level, VALID_LEVELS
                ));
            }
        }

        if let Some(ref log_dir) = self.log_directory {
            if let Some(parent) = log_dir.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(format!("Log directory parent does not exist: {:?}", parent));
                }
            }
        }

        Ok(())
    }

    /// Effective level for a component
    pub fn get_component_level(&self, component: &str) -> &str {
        match component {
            "alignment" | "geometry" => &self.alignment_level,
            "analysis" => &self.analysis_level,
            _ => &self.global_level,
        }
    }

    /// `EnvFilter` directives for this configuration
    pub fn filter_directives(&self) -> String {
        let crate_name = env!("CARGO_PKG_NAME").replace('-', "_");
        format!(
            "{krate}={global},{krate}::alignment={alignment},{krate}::geometry={alignment},{krate}::analysis={analysis}",
            krate = crate_name,
            global = self.global_level,
            alignment = self.alignment_level,
            analysis = self.analysis_level,
        )
    }
}
