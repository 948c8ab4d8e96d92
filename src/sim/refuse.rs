//! Floating refuse
//!
//! A refuse orbits its route while `Free`. From there it is either caught
//! by a fish (`Trapped`, later `Disappear` once the stage is cleaned) or
//! tapped by the player (`Collected`). No state ever returns to `Free`.

use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use rand::Rng;

use super::fish::FishId;
use super::motion::refuse_position;
use crate::catalog::{RefuseKindSpec, RouteSpec};
use crate::error::TransitionError;
use crate::platform::{EntityId, PhysicsBody, PhysicsMode, Placement};

/// Refuse lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefuseState {
    /// Orbiting its route, tappable, catchable
    Free,
    /// Riding on a fish
    Trapped,
    /// Was trapped, hidden after the stage was cleaned
    Disappear,
    /// Tapped by the player
    Collected,
}

impl RefuseState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefuseState::Free => "free",
            RefuseState::Trapped => "trapped",
            RefuseState::Disappear => "disappear",
            RefuseState::Collected => "collected",
        }
    }
}

/// One piece of floating refuse
#[derive(Debug, Clone)]
pub struct Refuse {
    kind: usize,
    volume_radius: f32,
    route: RouteSpec,
    initial_position: Vec3,
    initial_orientation: Quat,
    position: Vec3,
    /// Seconds spent free; frozen once the refuse leaves `Free`
    accumulated_time: f32,
    /// Vertical bob frequency relative to the orbit angle
    moving_rate: f32,
    state: RefuseState,
    entity: Option<EntityId>,
    carried_by: Option<FishId>,
}

impl Refuse {
    /// Spawn a refuse in slot `slot` of `total_slots` equal sectors of `route`.
    ///
    /// The slot angle is jittered radially by `init_xz_range` and
    /// vertically by `init_y_range`; the model gets a random tumble about
    /// X or Z.
    pub fn new<R: Rng>(
        kind: usize,
        spec: &RefuseKindSpec,
        route: RouteSpec,
        slot: usize,
        total_slots: usize,
        moving_rate_range: (f32, f32),
        rng: &mut R,
    ) -> Self {
        let theta = TAU * slot as f32 / total_slots.max(1) as f32;
        let radius = route.radius + rng.random_range(-route.init_xz_range..=route.init_xz_range);
        let initial_position = route.origin
            + Vec3::new(
                radius * theta.cos(),
                rng.random_range(-route.init_y_range..=route.init_y_range),
                radius * theta.sin(),
            );

        let axis = if rng.random_bool(0.5) { Vec3::X } else { Vec3::Z };
        let initial_orientation = Quat::from_axis_angle(axis, rng.random_range(0.0..TAU));

        let (rate_min, rate_max) = moving_rate_range;
        let moving_rate = rng.random_range(rate_min..=rate_max.max(rate_min));

        Self {
            kind,
            volume_radius: spec.volume_radius,
            route,
            initial_position,
            initial_orientation,
            position: initial_position,
            accumulated_time: 0.0,
            moving_rate,
            state: RefuseState::Free,
            entity: None,
            carried_by: None,
        }
    }

    /// Bind the host entity and place it at the spawn transform
    pub fn attach<P: Placement>(&mut self, entity: EntityId, spec: &RefuseKindSpec, placement: &mut P) {
        self.entity = Some(entity);
        placement.set_position(entity, self.position);
        placement.set_orientation(entity, self.initial_orientation);
        placement.attach_body(
            entity,
            PhysicsBody {
                radius: spec.volume_radius,
                mass: spec.mass,
                friction: spec.friction,
                restitution: spec.restitution,
                mode: PhysicsMode::Static,
            },
        );
    }

    /// Advance along the route. No-op unless free.
    pub fn tick<P: Placement>(&mut self, dt: f32, placement: &mut P) {
        if self.state != RefuseState::Free {
            return;
        }
        self.accumulated_time += dt;
        self.position = refuse_position(
            self.initial_position,
            self.route.angular_velocity,
            self.moving_rate,
            self.route.moving_y_range,
            self.accumulated_time,
        );
        if let Some(entity) = self.entity {
            placement.set_position(entity, self.position);
        }
    }

    /// Free -> Trapped, carried by `carrier`
    pub fn trapped(&mut self, carrier: FishId) -> Result<(), TransitionError> {
        self.transition(RefuseState::Free, RefuseState::Trapped)?;
        self.carried_by = Some(carrier);
        Ok(())
    }

    /// Trapped -> Disappear, hides the visual
    pub fn disappear<P: Placement>(&mut self, placement: &mut P) -> Result<(), TransitionError> {
        self.transition(RefuseState::Trapped, RefuseState::Disappear)?;
        if let Some(entity) = self.entity {
            placement.set_enabled(entity, false);
        }
        Ok(())
    }

    /// Free -> Collected (tapped by the player)
    pub fn collected(&mut self) -> Result<(), TransitionError> {
        self.transition(RefuseState::Free, RefuseState::Collected)
    }

    fn transition(&mut self, from: RefuseState, to: RefuseState) -> Result<(), TransitionError> {
        if self.state != from {
            return Err(TransitionError {
                entity: "refuse",
                from: self.state.as_str(),
                to: to.as_str(),
            }
            .raise());
        }
        self.state = to;
        Ok(())
    }

    /// Number of refuse still free: the "stage is dirty" predicate
    pub fn free_count(refuses: &[Refuse]) -> usize {
        Self::count(refuses, RefuseState::Free)
    }

    pub fn count(refuses: &[Refuse], state: RefuseState) -> usize {
        refuses.iter().filter(|r| r.state == state).count()
    }

    pub fn state(&self) -> RefuseState {
        self.state
    }

    pub fn kind(&self) -> usize {
        self.kind
    }

    pub fn volume_radius(&self) -> f32 {
        self.volume_radius
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn initial_position(&self) -> Vec3 {
        self.initial_position
    }

    pub fn accumulated_time(&self) -> f32 {
        self.accumulated_time
    }

    pub fn moving_rate(&self) -> f32 {
        self.moving_rate
    }

    pub fn entity(&self) -> Option<EntityId> {
        self.entity
    }

    pub fn carried_by(&self) -> Option<FishId> {
        self.carried_by
    }

    #[cfg(test)]
    pub(crate) fn set_position_for_test(&mut self, position: Vec3) {
        self.position = position;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::SceneCatalog;
    use crate::platform::{EntityKind, HeadlessPlacement};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    pub(crate) fn make_refuse(slot: usize, total: usize, seed: u64) -> Refuse {
        let catalog = SceneCatalog::standard();
        let mut rng = Pcg32::seed_from_u64(seed);
        Refuse::new(
            0,
            &catalog.refuse_kinds[0],
            catalog.refuse_routes[0],
            slot,
            total,
            (2.0, 6.0),
            &mut rng,
        )
    }

    fn carrier() -> FishId {
        FishId { group: 0, fish: 0 }
    }

    #[test]
    fn test_spawn_within_jitter_bounds() {
        let catalog = SceneCatalog::standard();
        let route = catalog.refuse_routes[0];
        for slot in 0..20 {
            let r = make_refuse(slot, 20, slot as u64);
            let p = r.initial_position() - route.origin;
            let radial = (p.x * p.x + p.z * p.z).sqrt();
            assert!((radial - route.radius).abs() <= route.init_xz_range + 1e-5);
            assert!(p.y.abs() <= route.init_y_range + 1e-5);
            assert!((2.0..=6.0).contains(&r.moving_rate()));
            assert_eq!(r.state(), RefuseState::Free);
        }
    }

    #[test]
    fn test_slots_are_spread_round_the_route() {
        let quarter = make_refuse(1, 4, 3);
        let p = quarter.initial_position();
        // slot 1 of 4 sits at +z, radial jitter only
        assert!(p.x.abs() < 1e-5);
        assert!(p.z > 0.7);
    }

    #[test]
    fn test_same_seed_same_refuse() {
        let a = make_refuse(5, 20, 77);
        let b = make_refuse(5, 20, 77);
        assert_eq!(a.initial_position(), b.initial_position());
        assert_eq!(a.moving_rate(), b.moving_rate());
    }

    #[test]
    fn test_tick_moves_only_when_free() {
        let mut placement = HeadlessPlacement::new();
        let mut r = make_refuse(0, 20, 1);
        let start = r.position();

        r.tick(1.0, &mut placement);
        assert!((r.accumulated_time() - 1.0).abs() < 1e-6);
        assert_ne!(r.position(), start);

        r.collected().unwrap();
        let frozen = r.position();
        r.tick(1.0, &mut placement);
        assert!((r.accumulated_time() - 1.0).abs() < 1e-6);
        assert_eq!(r.position(), frozen);
    }

    #[test]
    fn test_tick_writes_placement() {
        let catalog = SceneCatalog::standard();
        let mut placement = HeadlessPlacement::new();
        let id = placement.spawn(EntityKind::Refuse, "bag.usdz").unwrap();
        let mut r = make_refuse(0, 20, 1);
        r.attach(id, &catalog.refuse_kinds[0], &mut placement);
        r.tick(0.5, &mut placement);
        assert_eq!(placement.node(id).unwrap().position, r.position());
        assert_eq!(
            placement.node(id).unwrap().body.unwrap().mode,
            PhysicsMode::Static
        );
    }

    #[test]
    fn test_tick_without_entity_still_simulates() {
        let mut placement = HeadlessPlacement::new();
        let mut r = make_refuse(3, 20, 9);
        r.tick(2.0, &mut placement);
        assert!(r.entity().is_none());
        assert!((r.accumulated_time() - 2.0).abs() < 1e-6);
        assert!(placement.is_empty());
    }

    #[test]
    fn test_trapped_then_disappear() {
        let mut placement = HeadlessPlacement::new();
        let id = placement.spawn(EntityKind::Refuse, "net.usdz").unwrap();
        let mut r = make_refuse(0, 20, 2);
        r.entity = Some(id);

        r.trapped(carrier()).unwrap();
        assert_eq!(r.state(), RefuseState::Trapped);
        assert_eq!(r.carried_by(), Some(carrier()));

        r.disappear(&mut placement).unwrap();
        assert_eq!(r.state(), RefuseState::Disappear);
        assert!(!placement.node(id).unwrap().enabled);
    }

    #[test]
    fn test_free_count() {
        let mut refuses: Vec<Refuse> = (0..5).map(|i| make_refuse(i, 5, i as u64)).collect();
        assert_eq!(Refuse::free_count(&refuses), 5);
        refuses[0].collected().unwrap();
        refuses[3].trapped(carrier()).unwrap();
        assert_eq!(Refuse::free_count(&refuses), 3);
        assert_eq!(Refuse::count(&refuses, RefuseState::Trapped), 1);
    }

    #[test]
    #[cfg_attr(
        debug_assertions,
        should_panic(expected = "illegal refuse transition: trapped -> collected")
    )]
    fn test_collect_trapped_refuse_is_rejected() {
        let mut r = make_refuse(0, 20, 4);
        r.trapped(carrier()).unwrap();
        let result = r.collected();
        assert!(result.is_err());
        assert_eq!(r.state(), RefuseState::Trapped);
    }

    #[test]
    #[cfg_attr(
        debug_assertions,
        should_panic(expected = "illegal refuse transition: free -> disappear")
    )]
    fn test_disappear_requires_trapped() {
        let mut placement = HeadlessPlacement::new();
        let mut r = make_refuse(0, 20, 4);
        assert!(r.disappear(&mut placement).is_err());
        assert_eq!(r.state(), RefuseState::Free);
    }

    #[test]
    #[cfg_attr(
        debug_assertions,
        should_panic(expected = "illegal refuse transition: trapped -> trapped")
    )]
    fn test_double_trap_is_rejected() {
        let mut r = make_refuse(0, 20, 4);
        r.trapped(carrier()).unwrap();
        assert!(r.trapped(FishId { group: 1, fish: 2 }).is_err());
        assert_eq!(r.carried_by(), Some(carrier()));
    }
}
