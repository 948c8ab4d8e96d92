//! In-memory placement service
//!
//! Keeps a flat scene graph and a list of linear move animations. Used by
//! the demo runner and by tests; a real host would forward the same calls
//! to its engine.

use glam::{Quat, Vec3};

use super::{AnimationHandle, EntityId, EntityKind, PhysicsBody, PhysicsMode, Placement, Transform};

/// One entity in the headless scene graph
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: EntityKind,
    pub model: String,
    pub position: Vec3,
    pub orientation: Quat,
    pub parent: Option<EntityId>,
    pub enabled: bool,
    pub body: Option<PhysicsBody>,
    /// Number of position/orientation writes received
    pub writes: u32,
}

#[derive(Debug, Clone)]
struct Animation {
    entity: EntityId,
    from: Transform,
    target: Transform,
    duration: f32,
    elapsed: f32,
}

impl Animation {
    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Headless [`Placement`] implementation
#[derive(Debug, Clone, Default)]
pub struct HeadlessPlacement {
    nodes: Vec<Node>,
    animations: Vec<Animation>,
    /// Kinds whose spawns fail, to simulate missing assets
    missing: Vec<EntityKind>,
}

impl HeadlessPlacement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every spawn of `kind` fail
    pub fn with_missing(mut self, kind: EntityKind) -> Self {
        self.missing.push(kind);
        self
    }

    /// Advance every running animation by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        for anim in self.animations.iter_mut().filter(|a| !a.is_complete()) {
            anim.elapsed += dt;
            let t = if anim.duration > 0.0 {
                (anim.elapsed / anim.duration).min(1.0)
            } else {
                1.0
            };
            if let Some(node) = self.nodes.get_mut(anim.entity.0 as usize) {
                node.position = anim.from.translation.lerp(anim.target.translation, t);
                node.orientation = anim.from.rotation.slerp(anim.target.rotation, t);
            }
        }
    }

    pub fn node(&self, id: EntityId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids of every entity of `kind`, in spawn order
    pub fn ids_of(&self, kind: EntityKind) -> Vec<EntityId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.kind == kind)
            .map(|(i, _)| EntityId(i as u32))
            .collect()
    }

    pub fn running_animations(&self) -> usize {
        self.animations.iter().filter(|a| !a.is_complete()).count()
    }

    fn node_mut(&mut self, id: EntityId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }
}

impl Placement for HeadlessPlacement {
    fn spawn(&mut self, kind: EntityKind, model: &str) -> Option<EntityId> {
        if self.missing.contains(&kind) {
            return None;
        }
        let id = EntityId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            model: model.to_string(),
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            parent: None,
            enabled: true,
            body: None,
            writes: 0,
        });
        Some(id)
    }

    fn kind_of(&self, id: EntityId) -> EntityKind {
        self.node(id).map_or(EntityKind::Other, |n| n.kind)
    }

    fn set_position(&mut self, id: EntityId, position: Vec3) {
        if let Some(node) = self.node_mut(id) {
            node.position = position;
            node.writes += 1;
        }
    }

    fn set_orientation(&mut self, id: EntityId, orientation: Quat) {
        if let Some(node) = self.node_mut(id) {
            node.orientation = orientation;
            node.writes += 1;
        }
    }

    fn reparent(&mut self, id: EntityId, parent: EntityId) {
        if self.node(parent).is_none() {
            return;
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = Some(parent);
        }
    }

    fn set_enabled(&mut self, id: EntityId, enabled: bool) {
        if let Some(node) = self.node_mut(id) {
            node.enabled = enabled;
        }
    }

    fn attach_body(&mut self, id: EntityId, body: PhysicsBody) {
        if let Some(node) = self.node_mut(id) {
            node.body = Some(body);
        }
    }

    fn set_physics_mode(&mut self, id: EntityId, mode: PhysicsMode) {
        if let Some(body) = self.node_mut(id).and_then(|n| n.body.as_mut()) {
            body.mode = mode;
        }
    }

    fn begin_move_animation(
        &mut self,
        id: EntityId,
        target: Transform,
        duration: f32,
    ) -> AnimationHandle {
        let from = self.node(id).map_or(target, |n| Transform {
            translation: n.position,
            rotation: n.orientation,
        });
        if duration <= 0.0 {
            if let Some(node) = self.node_mut(id) {
                node.position = target.translation;
                node.orientation = target.rotation;
            }
        }
        let handle = AnimationHandle(self.animations.len() as u32);
        self.animations.push(Animation {
            entity: id,
            from,
            target,
            duration: duration.max(0.0),
            elapsed: 0.0,
        });
        handle
    }

    fn is_animation_complete(&self, handle: AnimationHandle) -> bool {
        self.animations
            .get(handle.0 as usize)
            .is_none_or(Animation::is_complete)
    }
}
