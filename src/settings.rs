//! Game settings
//!
//! Arena, entity sizes and loop timing. Loaded from an optional JSON file;
//! every field falls back to its default when missing.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Reasons a settings file could not be used
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings file")]
    Io(#[from] std::io::Error),
    #[error("malformed settings file")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Ball ===
    pub ball_radius: f32,
    /// Speed along each axis, per simulation step
    pub ball_speed: f32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,
    /// Distance from the bottom edge to the paddle center
    pub paddle_offset: f32,

    // === Bricks ===
    pub brick_width: f32,
    pub brick_height: f32,
    pub brick_columns: u32,
    pub brick_rows: u32,
    /// Space between neighbouring bricks
    pub brick_gap: f32,
    /// Extra horizontal offset of the whole grid
    pub brick_margin: f32,

    // === Timing ===
    /// Simulated time per step
    pub ft_step: f32,
    /// Real time (ms) consumed per step
    pub ft_slice: f32,
    pub framerate_limit: u32,
    /// Cap on steps per rendered frame; leftover time stays accumulated
    pub max_substeps: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: 800.0,
            arena_height: 600.0,

            ball_radius: 10.0,
            ball_speed: 8.0,

            paddle_width: 60.0,
            paddle_height: 20.0,
            paddle_speed: 6.0,
            paddle_offset: 50.0,

            brick_width: 60.0,
            brick_height: 20.0,
            brick_columns: 11,
            brick_rows: 4,
            brick_gap: 3.0,
            brick_margin: 22.0,

            ft_step: 1.0,
            ft_slice: 1.0,
            framerate_limit: 60,
            max_substeps: None,
        }
    }
}

impl Settings {
    pub fn arena(&self) -> Vec2 {
        Vec2::new(self.arena_width, self.arena_height)
    }

    /// Center of the brick at grid cell (`column`, `row`)
    pub fn brick_center(&self, column: u32, row: u32) -> Vec2 {
        Vec2::new(
            (column + 1) as f32 * (self.brick_width + self.brick_gap) + self.brick_margin,
            (row + 1) as f32 * (self.brick_height + self.brick_gap),
        )
    }

    /// Reject values the loop or the physics cannot work with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("ball_radius", self.ball_radius),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("brick_width", self.brick_width),
            ("brick_height", self.brick_height),
            ("ft_step", self.ft_step),
            ("ft_slice", self.ft_slice),
        ];
        for (field, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(SettingsError::Invalid {
                    field,
                    reason: "must be a positive number",
                });
            }
        }
        if self.max_substeps == Some(0) {
            return Err(SettingsError::Invalid {
                field: "max_substeps",
                reason: "must be at least 1 when set",
            });
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate a settings file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load a settings file, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Using default settings ({}: {err})", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.arena(), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "brick_rows": 2, "max_substeps": 8 }"#).unwrap();
        assert_eq!(settings.brick_rows, 2);
        assert_eq!(settings.max_substeps, Some(8));
        assert_eq!(settings.brick_columns, 11);
        assert_eq!(settings.ball_speed, 8.0);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = Settings::from_json(r#"{ "ft_slice": 0.0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "ft_slice", .. }));

        let err = Settings::from_json(r#"{ "max_substeps": 0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "max_substeps", .. }));

        let err = Settings::from_json("not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let settings = Settings::load_or_default(Path::new("/definitely/not/here.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_brick_grid_layout() {
        let settings = Settings::default();
        assert_eq!(settings.brick_center(0, 0), Vec2::new(85.0, 23.0));
        assert_eq!(settings.brick_center(10, 3), Vec2::new(715.0, 92.0));
    }
}
