//! A single fish swimming on its group's route

use glam::{Quat, Vec3};
use rand::Rng;

use super::collision::spheres_overlap;
use super::motion::fish_target_position;
use super::refuse::Refuse;
use crate::catalog::{FishRouteSpec, FishSpeciesSpec};
use crate::platform::{AnimationHandle, EntityId, PhysicsBody, PhysicsMode, Placement, Transform};

/// Fish lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FishState {
    /// Swimming, catches refuse
    Fine,
    /// Carrying its full load, sinking to the floor
    Weak,
    /// Swimming again after the stage was cleaned; never catches refuse
    Recovery,
}

/// Flat address of a fish: group index, then index within the group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FishId {
    pub group: usize,
    pub fish: usize,
}

#[derive(Debug, Clone)]
pub struct Fish {
    species: usize,
    collision_radius: f32,
    trap_capacity: u32,
    weak_angle_x: f32,
    /// Phase on the shared route (rad)
    angle_offset: f32,
    /// Fixed de-clumping offset added to every target position
    position_diff: Vec3,
    /// Seconds since the fish was put on its route
    time: f32,
    position: Vec3,
    /// Rotation about Y (rad)
    facing: f32,
    trapping_refuse_count: u32,
    state: FishState,
    entity: Option<EntityId>,
}

impl Fish {
    /// `position_diff` is drawn uniformly from `[-jitter_max, jitter_max]`
    /// per axis.
    pub fn new<R: Rng>(
        species: usize,
        spec: &FishSpeciesSpec,
        angle_offset: f32,
        jitter_max: f32,
        rng: &mut R,
    ) -> Self {
        let jitter_max = jitter_max.abs();
        let mut jitter = || {
            if jitter_max > 0.0 {
                rng.random_range(-jitter_max..=jitter_max)
            } else {
                0.0
            }
        };
        let position_diff = Vec3::new(jitter(), jitter(), jitter());

        Self {
            species,
            collision_radius: spec.collision_radius,
            trap_capacity: spec.trap_capacity,
            weak_angle_x: spec.weak_angle_x,
            angle_offset,
            position_diff,
            time: 0.0,
            position: Vec3::ZERO,
            facing: 0.0,
            trapping_refuse_count: 0,
            state: FishState::Fine,
            entity: None,
        }
    }

    /// Bind the host entity and give it a collision body
    pub fn attach<P: Placement>(&mut self, entity: EntityId, spec: &FishSpeciesSpec, placement: &mut P) {
        self.entity = Some(entity);
        placement.attach_body(
            entity,
            PhysicsBody {
                radius: spec.collision_radius,
                mass: spec.mass,
                friction: spec.friction,
                restitution: spec.restitution,
                mode: PhysicsMode::Static,
            },
        );
    }

    /// Place the fish at the start of its route without animating
    pub fn set_initial_position<P: Placement>(&mut self, position: Vec3, angle: f32, placement: &mut P) {
        self.time = 0.0;
        self.position = position;
        self.facing = angle;
        self.write_transform(placement);
    }

    /// Advance route time and follow the route unless weak
    pub fn tick<P: Placement>(&mut self, dt: f32, route: &FishRouteSpec, velocity: f32, placement: &mut P) {
        self.time += dt;
        if self.state == FishState::Weak {
            return;
        }
        let (position, facing) =
            fish_target_position(route, velocity, self.angle_offset, self.position_diff, self.time);
        self.position = position;
        self.facing = facing;
        self.write_transform(placement);
    }

    fn write_transform<P: Placement>(&self, placement: &mut P) {
        if let Some(entity) = self.entity {
            placement.set_position(entity, self.position);
            placement.set_orientation(entity, Quat::from_rotation_y(self.facing));
        }
    }

    /// Only fine fish catch refuse
    pub fn is_colliding(&self, refuse: &Refuse) -> bool {
        self.state == FishState::Fine
            && spheres_overlap(
                self.position,
                self.collision_radius,
                refuse.position(),
                refuse.volume_radius(),
            )
    }

    /// Count one more caught refuse. Returns true when this catch made the
    /// fish weak.
    pub fn trapped(&mut self) -> bool {
        self.trapping_refuse_count += 1;
        if self.trapping_refuse_count >= self.trap_capacity && self.state != FishState::Weak {
            self.state = FishState::Weak;
            return true;
        }
        false
    }

    /// Where a weakened fish sinks to: straight down to `floor_y`, tilted
    /// about X by the species' weak angle
    pub fn sink_target(&self, floor_y: f32) -> Transform {
        Transform {
            translation: Vec3::new(self.position.x, floor_y, self.position.z),
            rotation: Quat::from_rotation_y(self.facing) * Quat::from_rotation_x(self.weak_angle_x),
        }
    }

    /// Start the sink animation. `None` without a host entity.
    pub fn begin_sink<P: Placement>(&self, floor_y: f32, duration: f32, placement: &mut P) -> Option<AnimationHandle> {
        let entity = self.entity?;
        Some(placement.begin_move_animation(entity, self.sink_target(floor_y), duration))
    }

    /// Weak -> Recovery, undoing the tilt. Other states are left alone.
    ///
    /// The caught count is kept.
    pub fn recover<P: Placement>(&mut self, placement: &mut P) -> bool {
        if self.state != FishState::Weak {
            return false;
        }
        self.state = FishState::Recovery;
        if let Some(entity) = self.entity {
            placement.set_orientation(entity, Quat::from_rotation_y(self.facing));
        }
        true
    }

    pub fn state(&self) -> FishState {
        self.state
    }

    pub fn species(&self) -> usize {
        self.species
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn angle_offset(&self) -> f32 {
        self.angle_offset
    }

    pub fn position_diff(&self) -> Vec3 {
        self.position_diff
    }

    pub fn trapping_refuse_count(&self) -> u32 {
        self.trapping_refuse_count
    }

    pub fn trap_capacity(&self) -> u32 {
        self.trap_capacity
    }

    pub fn entity(&self) -> Option<EntityId> {
        self.entity
    }

    #[cfg(test)]
    pub(crate) fn set_position_for_test(&mut self, position: Vec3) {
        self.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SceneCatalog;
    use crate::platform::{EntityKind, HeadlessPlacement};
    use crate::sim::refuse::tests::make_refuse;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn species_with_capacity(capacity: u32) -> FishSpeciesSpec {
        FishSpeciesSpec {
            trap_capacity: capacity,
            ..SceneCatalog::standard().fish_species[1].clone()
        }
    }

    fn make_fish(capacity: u32) -> Fish {
        let mut rng = Pcg32::seed_from_u64(11);
        Fish::new(1, &species_with_capacity(capacity), 0.0, 0.1, &mut rng)
    }

    #[test]
    fn test_jitter_bounds() {
        let spec = species_with_capacity(2);
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..50 {
            let fish = Fish::new(1, &spec, 0.0, 0.1, &mut rng);
            let d = fish.position_diff();
            assert!(d.x.abs() <= 0.1 && d.y.abs() <= 0.1 && d.z.abs() <= 0.1);
        }
        let still = Fish::new(1, &spec, 0.0, 0.0, &mut rng);
        assert_eq!(still.position_diff(), Vec3::ZERO);
    }

    #[test]
    fn test_tick_follows_route() {
        let catalog = SceneCatalog::standard();
        let route = catalog.fish_routes[0];
        let mut placement = HeadlessPlacement::new();
        let id = placement.spawn(EntityKind::Fish, "bonito.usdz").unwrap();
        let mut fish = make_fish(2);
        fish.attach(id, &species_with_capacity(2), &mut placement);

        fish.tick(1.5, &route, 0.3, &mut placement);
        let (expected, facing) =
            fish_target_position(&route, 0.3, fish.angle_offset(), fish.position_diff(), 1.5);
        assert_eq!(fish.position(), expected);
        assert_eq!(fish.facing(), facing);
        assert_eq!(placement.node(id).unwrap().position, expected);
    }

    #[test]
    fn test_weak_fish_stops_but_keeps_time() {
        let route = SceneCatalog::standard().fish_routes[0];
        let mut placement = HeadlessPlacement::new();
        let mut fish = make_fish(1);
        fish.tick(1.0, &route, 0.3, &mut placement);
        let parked = fish.position();

        assert!(fish.trapped());
        fish.tick(1.0, &route, 0.3, &mut placement);
        assert_eq!(fish.position(), parked);
        assert!((fish.time() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_collision_radius_sum() {
        let mut fish = make_fish(2);
        let refuse = make_refuse(0, 20, 1);
        // bonito 0.05 + refuse 0.075
        fish.set_position_for_test(refuse.position() + Vec3::new(0.12, 0.0, 0.0));
        assert!(fish.is_colliding(&refuse));
        fish.set_position_for_test(refuse.position() + Vec3::new(0.0, 0.13, 0.0));
        assert!(!fish.is_colliding(&refuse));
    }

    #[test]
    fn test_only_fine_fish_collide() {
        let mut placement = HeadlessPlacement::new();
        let mut fish = make_fish(1);
        let refuse = make_refuse(0, 20, 1);
        fish.set_position_for_test(refuse.position());
        assert!(fish.is_colliding(&refuse));

        fish.trapped();
        assert!(!fish.is_colliding(&refuse));
        fish.recover(&mut placement);
        assert_eq!(fish.state(), FishState::Recovery);
        assert!(!fish.is_colliding(&refuse));
    }

    #[test]
    fn test_sink_target() {
        let mut fish = make_fish(2);
        fish.set_position_for_test(Vec3::new(0.4, 0.2, -0.3));
        let target = fish.sink_target(-0.75);
        assert_eq!(target.translation, Vec3::new(0.4, -0.75, -0.3));

        let mut placement = HeadlessPlacement::new();
        assert!(fish.begin_sink(-0.75, 10.0, &mut placement).is_none());
        let id = placement.spawn(EntityKind::Fish, "bonito.usdz").unwrap();
        fish.entity = Some(id);
        let handle = fish.begin_sink(-0.75, 10.0, &mut placement).unwrap();
        assert!(!placement.is_animation_complete(handle));
    }

    #[test]
    fn test_recover_only_from_weak() {
        let mut placement = HeadlessPlacement::new();
        let mut fish = make_fish(2);
        assert!(!fish.recover(&mut placement));
        assert_eq!(fish.state(), FishState::Fine);
    }

    #[test]
    fn test_recovery_keeps_trapped_count() {
        // The caught count is not reset by recovery, so a recovering fish
        // that is counted again goes straight back to weak.
        let mut placement = HeadlessPlacement::new();
        let mut fish = make_fish(2);
        fish.trapped();
        assert!(fish.trapped());
        assert!(fish.recover(&mut placement));
        assert_eq!(fish.trapping_refuse_count(), 2);

        assert!(fish.trapped());
        assert_eq!(fish.state(), FishState::Weak);
        assert_eq!(fish.trapping_refuse_count(), 3);
    }

    proptest! {
        #[test]
        fn prop_weak_exactly_at_capacity(capacity in 1u32..8) {
            let mut fish = make_fish(capacity);
            for _ in 1..capacity {
                prop_assert!(!fish.trapped());
                prop_assert_eq!(fish.state(), FishState::Fine);
            }
            prop_assert!(fish.trapped());
            prop_assert_eq!(fish.state(), FishState::Weak);
            // only the first crossing reports weakening
            prop_assert!(!fish.trapped());
        }
    }
}
