//! Plastic Ocean - scene simulation core for an AR ocean cleanup game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, collisions, refuse/fish lifecycles, stage state)
//! - `catalog`: Static stage, route, fish and refuse data
//! - `platform`: Entity placement collaborator (implemented by the host renderer)
//! - `audio`: Sound cue collaborator
//! - `settings`: Runtime simulation configuration

pub mod audio;
pub mod catalog;
pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;

pub use audio::{MutedSound, SoundCue, SoundLog, SoundPlayer};
pub use catalog::SceneCatalog;
pub use error::{SceneError, TransitionError};
pub use platform::{EntityId, EntityKind, HeadlessPlacement, Placement};
pub use settings::SimulationConfig;
pub use sim::{Scene, StageState};

use glam::Vec3;

/// Scene configuration constants
pub mod consts {
    use glam::Vec3;

    /// Nominal frame time of the host's AR loop (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Stage origin relative to the AR anchor
    pub const SCENE_ORIGIN: Vec3 = Vec3::new(0.0, 0.0, -0.75);

    /// Tapped refuse land within +/- this range on X and Z around the boat (m)
    pub const GAZE_XZ: f32 = 0.15;
    /// Height of the collection point above the stage origin (m)
    pub const COLLECTING_Y: f32 = 1.6;
    /// Duration of the move-to-collection-point animation (s)
    pub const CAPTURE_SECS: f32 = 1.0;

    /// How long the "cleaned" banner stays up (s)
    pub const CLEANED_BANNER_SECS: f32 = 5.0;
    /// Duration of a weakened fish sinking to the floor (s)
    pub const SINK_SECS: f32 = 10.0;

    /// Vertical bob frequency multiplier of a refuse is BASE +/- SPREAD
    pub const MOVING_RATE_BASE: f32 = 4.0;
    pub const MOVING_RATE_SPREAD: f32 = 2.0;

    /// Below this |z| the ellipse tangent is treated as vertical (0.1 mm)
    pub const ELLIPSE_Z_EPSILON: f32 = 0.0001;
}

/// Rotate a point about the Y axis on the X-Z plane.
#[inline]
pub fn rotate_xz(point: Vec3, angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(
        point.x * cos - point.z * sin,
        point.y,
        point.x * sin + point.z * cos,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_rotate_xz_quarter_turn() {
        let p = rotate_xz(Vec3::new(1.0, 0.5, 0.0), FRAC_PI_2);
        assert!(p.x.abs() < 1e-6);
        assert!((p.y - 0.5).abs() < 1e-6);
        assert!((p.z - 1.0).abs() < 1e-6);
    }
}
