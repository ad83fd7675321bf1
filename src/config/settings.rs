//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ConfigError;

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Directory generated `.scad` files are written to.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Enclosure parameter file used when none is given on the command line.
    #[serde(default)]
    pub params_path: Option<PathBuf>,

    /// OpenSCAD output settings.
    #[serde(default)]
    pub render: RenderConfig,

    /// Laser-cutting layout settings.
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render.segments < 3 {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Invalid render segment count {}. Must be at least 3",
                    self.render.segments
                ),
            });
        }

        for (name, value) in [
            ("box_spacing_factor", self.layout.box_spacing_factor),
            ("part_spacing_factor", self.layout.part_spacing_factor),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::ValidationError {
                    message: format!("Invalid layout {name} {value}. Must not be negative"),
                });
            }
        }
        Ok(())
    }

    /// Returns the path for a generated file named `file_name`.
    #[must_use]
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir
            .as_ref()
            .map_or_else(|| PathBuf::from(file_name), |dir| dir.join(file_name))
    }
}

/// OpenSCAD output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    /// Circle segment count (`$fn`).
    /// Default: 50
    #[serde(default = "default_segments")]
    pub segments: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            segments: default_segments(),
        }
    }
}

const fn default_segments() -> u32 {
    50
}

/// Laser-cutting layout configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutConfig {
    /// Gap between box panels, in wall thicknesses.
    #[serde(default = "default_box_spacing")]
    pub box_spacing_factor: f64,

    /// Gap between guide plates, diffuser and array bottom parts, in wall thicknesses.
    #[serde(default = "default_part_spacing")]
    pub part_spacing_factor: f64,

    /// Add a one inch reference cube to every layout.
    #[serde(default = "default_true")]
    pub show_ref_cube: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            box_spacing_factor: default_box_spacing(),
            part_spacing_factor: default_part_spacing(),
            show_ref_cube: default_true(),
        }
    }
}

const fn default_box_spacing() -> f64 {
    4.0
}

const fn default_part_spacing() -> f64 {
    2.0
}

const fn default_true() -> bool {
    true
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let json = r"{}";
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.render.segments, 50);
    }

    #[test]
    fn parse_full_config() {
        let json = r#"{
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "_comment": "Test config",
            "output_dir": "/path/to/output",
            "params_path": "/path/to/params.json",
            "render": {
                "segments": 100
            },
            "layout": {
                "box_spacing_factor": 3.0,
                "part_spacing_factor": 1.5,
                "show_ref_cube": false
            },
            "logging": {
                "level": "debug"
            }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.output_dir, Some(PathBuf::from("/path/to/output")));
        assert_eq!(
            config.params_path,
            Some(PathBuf::from("/path/to/params.json"))
        );
        assert_eq!(config.render.segments, 100);
        assert!((config.layout.box_spacing_factor - 3.0).abs() < f64::EPSILON);
        assert!((config.layout.part_spacing_factor - 1.5).abs() < f64::EPSILON);
        assert!(!config.layout.show_ref_cube);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn layout_config_defaults() {
        let config = LayoutConfig::default();
        assert!((config.box_spacing_factor - 4.0).abs() < f64::EPSILON);
        assert!((config.part_spacing_factor - 2.0).abs() < f64::EPSILON);
        assert!(config.show_ref_cube);
    }

    #[test]
    fn logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "warn");
    }

    #[test]
    fn output_path_uses_output_dir() {
        let mut config = Config::default();
        assert_eq!(config.output_path("a.scad"), PathBuf::from("a.scad"));

        config.output_dir = Some(PathBuf::from("/tmp/out"));
        assert_eq!(
            config.output_path("a.scad"),
            PathBuf::from("/tmp/out/a.scad")
        );
    }

    #[test]
    fn reject_low_segment_count() {
        let json = r#"{
            "render": {
                "segments": 2
            }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_negative_spacing() {
        let json = r#"{
            "layout": {
                "part_spacing_factor": -1.0
            }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_unknown_fields() {
        let json = r#"{
            "unknown_field": "value"
        }"#;

        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
