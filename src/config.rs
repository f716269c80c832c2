//! Application configuration — read-only after startup.
//!
//! Defaults cover the whole surface; an optional JSON file (passed with
//! `--config`) overrides individual fields. Field names are camelCase in
//! the file:
//!
//! ```json
//! {
//!     "headerHeight": 50,
//!     "magnifier": { "size": 100, "gridSize": 9, "defaultZoomFactor": 2 }
//! }
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Height of the header toolbar in points. The magnifier's vertical
    /// position correction keys off this value.
    pub header_height: f32,
    /// Fill color of the picker toggle button while the picker is active.
    pub active_button_color: String,
    pub magnifier: MagnifierConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MagnifierConfig {
    /// Side length of the square preview, in device pixels.
    pub size: u32,
    /// Side length of one grid cell in the preview.
    pub grid_size: u32,
    pub min_zoom_factor: u32,
    pub max_zoom_factor: u32,
    pub default_zoom_factor: u32,
    pub grid_color: String,
    pub central_grid_color: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            header_height: 50.0,
            active_button_color: "#0d6efd".to_string(),
            magnifier: MagnifierConfig::default(),
        }
    }
}

impl Default for MagnifierConfig {
    fn default() -> Self {
        Self {
            size: 100,
            grid_size: 9,
            min_zoom_factor: 1,
            max_zoom_factor: 5,
            default_zoom_factor: 2,
            grid_color: "#808080".to_string(),
            central_grid_color: "#fff".to_string(),
        }
    }
}

impl Config {
    /// Load the configuration: defaults when `path` is `None`, otherwise
    /// defaults overridden by the JSON file. A missing, unreadable or
    /// malformed file is a startup error — a half-configured widget is
    /// worse than failing early.
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        match path {
            None => Ok(Self::default()),
            Some(p) => {
                let text = fs::read_to_string(p)
                    .map_err(|e| format!("cannot read config {}: {}", p.display(), e))?;
                Self::from_json(&text)
            }
        }
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json(text: &str) -> Result<Self, String> {
        let config: Config =
            serde_json::from_str(text).map_err(|e| format!("invalid config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        let m = &self.magnifier;
        if m.size == 0 || m.grid_size == 0 {
            return Err("magnifier size and gridSize must be positive".to_string());
        }
        if m.min_zoom_factor == 0 {
            return Err("minZoomFactor must be at least 1".to_string());
        }
        if !(m.min_zoom_factor..=m.max_zoom_factor).contains(&m.default_zoom_factor) {
            return Err(format!(
                "defaultZoomFactor {} outside [{}, {}]",
                m.default_zoom_factor, m.min_zoom_factor, m.max_zoom_factor
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = Config::default();
        assert_eq!(c.header_height, 50.0);
        assert_eq!(c.magnifier.size, 100);
        assert_eq!(c.magnifier.grid_size, 9);
        assert_eq!(c.magnifier.min_zoom_factor, 1);
        assert_eq!(c.magnifier.max_zoom_factor, 5);
        assert_eq!(c.magnifier.default_zoom_factor, 2);
        assert_eq!(c.magnifier.grid_color, "#808080");
        assert_eq!(c.magnifier.central_grid_color, "#fff");
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let c = Config::from_json(r#"{ "headerHeight": 64, "magnifier": { "size": 150 } }"#)
            .expect("valid override");
        assert_eq!(c.header_height, 64.0);
        assert_eq!(c.magnifier.size, 150);
        assert_eq!(c.magnifier.grid_size, 9);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Config::from_json("{ nope").is_err());
    }

    #[test]
    fn inconsistent_zoom_bounds_are_rejected() {
        let err = Config::from_json(r#"{ "magnifier": { "defaultZoomFactor": 9 } }"#)
            .expect_err("out-of-range default zoom");
        assert!(err.contains("defaultZoomFactor"));
    }

    #[test]
    fn zero_grid_size_is_rejected() {
        assert!(Config::from_json(r#"{ "magnifier": { "gridSize": 0 } }"#).is_err());
    }
}
