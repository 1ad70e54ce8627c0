use crate::logging::LoggingConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub alignment: AlignmentConfig,
    pub generator: GeneratorConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Coinciding beacons needed before two scanners count as overlapping
    pub overlap_threshold: usize,
    /// Evaluate rotations and scanner pairs on the rayon pool
    pub parallel: bool,
    /// Remember pairs that failed so later passes skip them
    pub cache_failed_pairs: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub scanner_count: usize,
    /// Beacons seen by the root scanner
    pub base_beacons: usize,
    /// Root beacons each further scanner also sees
    pub shared_beacons: usize,
    /// Extra beacons only a single non-root scanner sees
    pub noise_beacons: usize,
    /// Beacon coordinates are drawn from `-coordinate_range..=coordinate_range`
    pub coordinate_range: i32,
    /// Scanner offsets are drawn from `-translation_range..=translation_range`
    pub translation_range: i32,
    pub seed: u64,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            overlap_threshold: crate::alignment::DEFAULT_OVERLAP_THRESHOLD,
            parallel: true,
            cache_failed_pairs: true,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            scanner_count: 5,
            base_beacons: 30,
            shared_beacons: 12,
            noise_beacons: 10,
            coordinate_range: 1000,
            translation_range: 1200,
            seed: 19,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;

        if content.trim_start().starts_with('{') {
            serde_json::from_str(&content).with_context(|| format!("Invalid JSON config {:?}", path))
        } else {
            toml::from_str(&content).with_context(|| format!("Invalid TOML config {:?}", path))
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P, format: ConfigFormat) -> anyhow::Result<()> {
        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.alignment.overlap_threshold == 0 {
            errors.push("Alignment overlap_threshold must be at least 1".to_string());
        }

        if self.generator.scanner_count == 0 {
            errors.push("Generator scanner_count must be positive".to_string());
        }

        if self.generator.shared_beacons > self.generator.base_beacons {
            errors.push("Generator shared_beacons cannot exceed base_beacons".to_string());
        }

        if self.generator.shared_beacons < self.alignment.overlap_threshold {
            errors.push(format!(
                "Generator shared_beacons ({}) is below the overlap threshold ({}); generated scanners could never align",
                self.generator.shared_beacons, self.alignment.overlap_threshold
            ));
        }

        if self.generator.coordinate_range <= 0 || self.generator.translation_range < 0 {
            errors.push("Generator coordinate ranges must be positive".to_string());
        }

        let side = 2 * self.generator.coordinate_range as i64 + 1;
        let needed = self.generator.base_beacons as i64
            + self.generator.noise_beacons as i64 * self.generator.scanner_count.saturating_sub(1) as i64;
        if side > 0 && side.saturating_mul(side).saturating_mul(side) < needed {
            errors.push("Generator coordinate_range is too small for the requested beacon count".to_string());
        }

        if let Err(message) = self.logging.validate() {
            errors.push(message);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ConfigFormat {
    Json,
    Toml,
}

pub fn load_config_or_default(config_path: Option<&Path>) -> Config {
    match config_path {
        Some(path) => match Config::load_from_file(path) {
            Ok(config) => {
                if let Err(errors) = config.validate() {
                    eprintln!("Configuration validation errors:");
                    for error in errors {
                        eprintln!("  - {}", error);
                    }
                    eprintln!("Using default configuration instead.");
                    Config::default()
                } else {
                    config
                }
            }
            Err(e) => {
                eprintln!("Failed to load config from {:?}: {:#}", path, e);
                eprintln!("Using default configuration.");
                Config::default()
            }
        },
        None => Config::default(),
    }
}
