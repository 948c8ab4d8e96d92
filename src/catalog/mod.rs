//! Static scene data
//!
//! Everything here is fixed at stage-setup time: refuse kinds and their
//! routes, fish species and their routes, and the stage table that ties
//! them together. The host may ship its own catalog (it is serde
//! serializable); [`SceneCatalog::standard`] is the one the game ships.

mod standard;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// One kind of floating refuse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefuseKindSpec {
    pub name: String,
    pub model: String,
    /// Visual and collision radius (m)
    pub volume_radius: f32,
    // Physics material, consumed by the host's physics engine only
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Relative weight when drawing kinds for a stage
    #[serde(default = "default_weight")]
    pub weight: f32,
}

fn default_weight() -> f32 {
    1.0
}

/// A circular route refuse orbit on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteSpec {
    pub origin: Vec3,
    /// Orbit radius (m)
    pub radius: f32,
    /// Signed angular velocity on the X-Z plane (rad/s)
    pub angular_velocity: f32,
    /// Spawn jitter on Y (m, +/-)
    pub init_y_range: f32,
    /// Spawn jitter on the orbit radius (m, +/-)
    pub init_xz_range: f32,
    /// Vertical bob amplitude while orbiting (m)
    pub moving_y_range: f32,
}

/// A fish species: asset geometry plus gameplay properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishSpeciesSpec {
    pub name: String,
    pub model: String,
    /// Bounding volume (width, height, depth)
    pub volume: Vec3,
    /// Radius of the collision sphere (m)
    pub collision_radius: f32,
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Tilt about X once weakened (rad)
    pub weak_angle_x: f32,
    /// Chance this species wins its turn in the sequential draw [0, 1]
    pub select_probability: f32,
    /// Refuse carried before the fish turns weak
    pub trap_capacity: u32,
}

/// An elliptical route fish swim on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FishRouteSpec {
    pub radius_x: f32,
    pub radius_y: f32,
    pub radius_z: f32,
    /// Centre height of the vertical bob (m)
    pub origin_y: f32,
    /// Vertical bob runs this many times slower than the orbit
    pub cycle_rate_y: f32,
    /// Whole-route precession = orbit angle * mul / div
    pub cycle_div_rate_xz: f32,
    pub cycle_mul_rate_xz: f32,
}

/// A group of fish sharing one species, route and speed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishGroupSpec {
    /// Species indexes tried in order by the sequential draw
    pub species_candidates: Vec<usize>,
    pub fish_count: usize,
    /// Index into [`SceneCatalog::fish_routes`]
    pub route: usize,
    /// Signed angular velocity (rad/s)
    pub velocity: f32,
    /// Phase gap between consecutive fish (rad)
    pub angle_gap_min: f32,
    pub angle_gap_max: f32,
    /// Position jitter per axis (m, +/-)
    pub jitter_max: f32,
}

/// One playable stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSpec {
    pub name: String,
    pub model: String,
    pub boat_model: String,
    pub boat_position: Vec3,
    /// Background track while collecting
    pub first_sound: String,
    /// Background track after the cleaned banner
    pub second_sound: String,
    /// Indexes into [`SceneCatalog::refuse_kinds`]
    pub refuse_kinds: Vec<usize>,
    /// Refuse count per refuse route (same length as the route table)
    pub refuse_numbers: Vec<usize>,
    pub fish_groups: Vec<FishGroupSpec>,
    /// Height weakened fish sink to (m, stage space)
    pub floor_y: f32,
}

/// The full static data set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneCatalog {
    pub refuse_kinds: Vec<RefuseKindSpec>,
    pub refuse_routes: Vec<RouteSpec>,
    pub fish_species: Vec<FishSpeciesSpec>,
    pub fish_routes: Vec<FishRouteSpec>,
    pub stages: Vec<StageSpec>,
}

impl Default for SceneCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl SceneCatalog {
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Stage to play after `cleanup_count` stages have been cleaned
    pub fn stage_index_for(&self, cleanup_count: usize) -> usize {
        if self.stages.is_empty() {
            0
        } else {
            cleanup_count % self.stages.len()
        }
    }

    pub fn stage(&self, index: usize) -> Result<&StageSpec, SceneError> {
        self.stages.get(index).ok_or(SceneError::UnknownStage {
            index,
            stage_count: self.stages.len(),
        })
    }

    /// Check every cross reference
    pub fn validate(&self) -> Result<(), SceneError> {
        for (i, stage) in self.stages.iter().enumerate() {
            self.validate_stage(i, stage)?;
        }
        Ok(())
    }

    pub(crate) fn validate_stage(&self, i: usize, stage: &StageSpec) -> Result<(), SceneError> {
        let invalid = |reason: String| Err(SceneError::InvalidCatalog(format!("stage {i}: {reason}")));

        if stage.refuse_numbers.len() != self.refuse_routes.len() {
            return invalid(format!(
                "{} refuse numbers for {} routes",
                stage.refuse_numbers.len(),
                self.refuse_routes.len()
            ));
        }
        if stage.refuse_kinds.is_empty() {
            return invalid("no refuse kinds".into());
        }
        if let Some(&k) = stage.refuse_kinds.iter().find(|&&k| k >= self.refuse_kinds.len()) {
            return invalid(format!("refuse kind {k} out of range"));
        }
        if stage
            .refuse_kinds
            .iter()
            .all(|&k| self.refuse_kinds[k].weight <= 0.0)
        {
            return invalid("refuse kind weights are all zero".into());
        }
        for (r, route) in self.refuse_routes.iter().enumerate() {
            if route.init_xz_range < 0.0 || route.init_y_range < 0.0 {
                return invalid(format!("refuse route {r}: negative spawn range"));
            }
        }
        for (g, group) in stage.fish_groups.iter().enumerate() {
            if group.route >= self.fish_routes.len() {
                return invalid(format!("fish group {g}: route {} out of range", group.route));
            }
            if group.species_candidates.is_empty() {
                return invalid(format!("fish group {g}: no species candidates"));
            }
            if let Some(&s) = group
                .species_candidates
                .iter()
                .find(|&&s| s >= self.fish_species.len())
            {
                return invalid(format!("fish group {g}: species {s} out of range"));
            }
            if group.angle_gap_min > group.angle_gap_max {
                return invalid(format!("fish group {g}: angle gap min > max"));
            }
        }
        for (r, route) in self.fish_routes.iter().enumerate() {
            if route.cycle_rate_y == 0.0 || route.cycle_div_rate_xz == 0.0 {
                return invalid(format!("fish route {r}: zero cycle divisor"));
            }
        }
        Ok(())
    }
}
