//! Deterministic scene simulation
//!
//! Everything the scene decides lives here:
//! - Seeded RNG only, drawn in a fixed order
//! - Positions are closed-form functions of elapsed time
//! - Stable iteration order (group, refuse, fish index)
//! - No rendering; all visual effects go through `Placement`

pub mod collision;
pub mod fish;
pub mod fish_group;
pub mod motion;
pub mod refuse;
pub mod scene;
pub mod stage;
mod tick;

pub use collision::{Collision, detect, spheres_overlap};
pub use fish::{Fish, FishId, FishState};
pub use fish_group::{FishGroup, choose_species};
pub use motion::{EllipsePoint, angle_delta, ellipse_position, fish_target_position, refuse_position};
pub use refuse::{Refuse, RefuseState};
pub use scene::{Capture, Scene};
pub use stage::{Stage, StageState};
