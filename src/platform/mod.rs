//! Platform abstraction layer
//!
//! The host's AR/3D engine owns the renderable entities. The scene only
//! holds [`EntityId`]s and drives them through [`Placement`]:
//! - Spawning and kind lookup
//! - Position/orientation writes
//! - Scene-graph reparenting and visibility
//! - Physics mode switches
//! - Host-driven move animations

pub mod headless;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

pub use headless::HeadlessPlacement;

/// Opaque handle to a host entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// What a spawned entity is. Decided once at spawn time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Stage,
    Boat,
    Fish,
    Refuse,
    Other,
}

/// How the host physics engine treats an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhysicsMode {
    /// Collides but never moves under physics
    Static,
    /// Falls and bounces under physics
    Dynamic,
    /// No collision shape, not hit-testable
    Disabled,
}

/// Collision sphere and material handed to the host physics engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsBody {
    pub radius: f32,
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
    pub mode: PhysicsMode,
}

/// Target of a move animation, relative to the entity's parent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Handle to an in-flight host animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationHandle(pub u32);

/// Entity placement service implemented by the host.
///
/// Every call is made from the tick thread. Ids the host no longer knows
/// should be ignored, not treated as errors.
pub trait Placement {
    /// Load and place a new entity. `None` when the asset could not be
    /// loaded; the scene keeps simulating without a visual.
    fn spawn(&mut self, kind: EntityKind, model: &str) -> Option<EntityId>;

    fn kind_of(&self, id: EntityId) -> EntityKind;

    fn set_position(&mut self, id: EntityId, position: Vec3);

    fn set_orientation(&mut self, id: EntityId, orientation: Quat);

    /// Move `id` under `parent` in the scene graph, keeping its world transform
    fn reparent(&mut self, id: EntityId, parent: EntityId);

    fn set_enabled(&mut self, id: EntityId, enabled: bool);

    fn attach_body(&mut self, id: EntityId, body: PhysicsBody);

    fn set_physics_mode(&mut self, id: EntityId, mode: PhysicsMode);

    fn begin_move_animation(
        &mut self,
        id: EntityId,
        target: Transform,
        duration: f32,
    ) -> AnimationHandle;

    fn is_animation_complete(&self, handle: AnimationHandle) -> bool;
}
