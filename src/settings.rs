//! Simulation configuration
//!
//! One immutable value handed to the scene at construction. Replaces
//! compile-time debug toggles with plain fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SceneError;

/// Runtime configuration for one scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the scene RNG (spawn jitter, species choice, collection points)
    pub seed: u64,

    // === Debug toggles ===
    /// Spawn a single refuse per route (quick stage clears while testing)
    pub single_refuse: bool,
    /// Run the fish/refuse collision pass
    pub auto_trap: bool,

    // === Timing (seconds) ===
    /// How long the cleaned banner is shown
    pub cleaned_banner_secs: f32,
    /// Move-to-collection-point animation length
    pub capture_secs: f32,
    /// Weak fish sink animation length
    pub sink_secs: f32,

    // === Collection point ===
    /// Collection height above the stage origin (m)
    pub collection_height: f32,
    /// Random X/Z spread around the collection point (m, +/-)
    pub collection_jitter_xz: f32,

    // === Refuse bobbing ===
    pub moving_rate_base: f32,
    pub moving_rate_spread: f32,

    /// Overrides every fish group's position jitter when set (m)
    pub fish_jitter_max: Option<f32>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,

            single_refuse: false,
            auto_trap: true,

            cleaned_banner_secs: CLEANED_BANNER_SECS,
            capture_secs: CAPTURE_SECS,
            sink_secs: SINK_SECS,

            collection_height: COLLECTING_Y,
            collection_jitter_xz: GAZE_XZ,

            moving_rate_base: MOVING_RATE_BASE,
            moving_rate_spread: MOVING_RATE_SPREAD,

            fish_jitter_max: None,
        }
    }
}

impl SimulationConfig {
    /// Default config with the given seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse from JSON. Missing keys fall back to defaults.
    pub fn from_json_str(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded simulation config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Refuse bob multiplier range, never below zero
    pub fn moving_rate_range(&self) -> (f32, f32) {
        let spread = self.moving_rate_spread.abs();
        (
            (self.moving_rate_base - spread).max(0.0),
            self.moving_rate_base + spread,
        )
    }
}
