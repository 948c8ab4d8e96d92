//! Scene coordinator
//!
//! Owns every refuse, fish group and the stage record for the stage being
//! played, plus the injected placement and sound collaborators. The host
//! drives it from one thread:
//! 1. [`Scene::prepare`] once, to spawn and place everything
//! 2. [`Scene::start_session`] / [`Scene::stop_session`] around the frame loop
//! 3. [`Scene::tick`] every frame (see `tick.rs`)
//! 4. [`Scene::tapped`] for user taps, applied between ticks

use glam::Vec3;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::fish_group::FishGroup;
use super::refuse::{Refuse, RefuseState};
use super::stage::{Stage, StageState};
use crate::audio::{SoundCue, SoundPlayer};
use crate::catalog::{SceneCatalog, StageSpec};
use crate::consts::SCENE_ORIGIN;
use crate::error::SceneError;
use crate::platform::{AnimationHandle, EntityId, EntityKind, Placement, Transform};
use crate::settings::SimulationConfig;

/// A tapped refuse on its way to the collection point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture {
    /// Index into [`Scene::refuses`]
    pub refuse: usize,
    pub handle: AnimationHandle,
    /// Animation finished and counted
    pub done: bool,
}

pub struct Scene<P: Placement, S: SoundPlayer> {
    pub(super) catalog: SceneCatalog,
    pub(super) config: SimulationConfig,
    pub(super) placement: P,
    pub(super) sound: S,
    pub(super) rng: Pcg32,

    /// Set by `prepare`
    pub(super) spec: Option<StageSpec>,
    pub(super) stage: Stage,
    pub(super) stage_entity: Option<EntityId>,
    pub(super) boat_entity: Option<EntityId>,

    pub(super) refuses: Vec<Refuse>,
    pub(super) fish_groups: Vec<FishGroup>,
    pub(super) captures: Vec<Capture>,

    /// Seconds the cleaned banner has been up
    pub(super) banner: Option<f32>,
    pub(super) running: bool,
}

impl<P: Placement, S: SoundPlayer> Scene<P, S> {
    pub fn new(catalog: SceneCatalog, config: SimulationConfig, placement: P, sound: S) -> Self {
        let rng = Pcg32::seed_from_u64(config.seed);
        Self {
            catalog,
            config,
            placement,
            sound,
            rng,
            spec: None,
            stage: Stage::new(0),
            stage_entity: None,
            boat_entity: None,
            refuses: Vec::new(),
            fish_groups: Vec::new(),
            captures: Vec::new(),
            banner: None,
            running: false,
        }
    }

    /// Spawn and place the stage, the boat, every refuse and every fish
    pub fn prepare(&mut self, stage_index: usize) -> Result<(), SceneError> {
        if self.spec.is_some() {
            return Err(SceneError::AlreadyPrepared);
        }
        let spec = self.catalog.stage(stage_index)?.clone();
        self.catalog.validate_stage(stage_index, &spec)?;

        self.stage_entity = self.spawn_static(EntityKind::Stage, &spec.model, None, SCENE_ORIGIN);
        self.boat_entity =
            self.spawn_static(EntityKind::Boat, &spec.boat_model, self.stage_entity, spec.boat_position);

        self.refuses = self.spawn_refuses(&spec)?;

        self.fish_groups = Vec::with_capacity(spec.fish_groups.len());
        for group_spec in &spec.fish_groups {
            let mut group =
                FishGroup::spawn(group_spec, &self.catalog, self.config.fish_jitter_max, &mut self.rng)?;
            let species = &self.catalog.fish_species[group.species()];
            group.place(species, &mut self.placement);
            if let Some(parent) = self.stage_entity {
                for entity in group.fishes().iter().filter_map(|f| f.entity()) {
                    self.placement.reparent(entity, parent);
                }
            }
            self.fish_groups.push(group);
        }

        log::info!(
            "Prepared stage {} ({}): {} refuse, {} fish",
            stage_index,
            spec.name,
            self.refuses.len(),
            self.fish_groups.iter().map(|g| g.fishes().len()).sum::<usize>()
        );

        self.stage = Stage::new(stage_index);
        self.spec = Some(spec);
        Ok(())
    }

    fn spawn_static(
        &mut self,
        kind: EntityKind,
        model: &str,
        parent: Option<EntityId>,
        position: Vec3,
    ) -> Option<EntityId> {
        let Some(entity) = self.placement.spawn(kind, model) else {
            log::warn!("Could not place {kind:?} model {model}");
            return None;
        };
        if let Some(parent) = parent {
            self.placement.reparent(entity, parent);
        }
        self.placement.set_position(entity, position);
        Some(entity)
    }

    /// One refuse per slot on every route, kinds drawn by weight
    fn spawn_refuses(&mut self, spec: &StageSpec) -> Result<Vec<Refuse>, SceneError> {
        let rate_range = self.config.moving_rate_range();
        let mut refuses = Vec::new();

        for (route, &number) in self.catalog.refuse_routes.iter().zip(&spec.refuse_numbers) {
            let slots = if self.config.single_refuse { number.min(1) } else { number };
            for slot in 0..slots {
                let kind = *spec
                    .refuse_kinds
                    .choose_weighted(&mut self.rng, |&k| self.catalog.refuse_kinds[k].weight)
                    .map_err(|e| SceneError::InvalidCatalog(format!("refuse kind weights: {e}")))?;
                let kind_spec = &self.catalog.refuse_kinds[kind];

                let mut refuse =
                    Refuse::new(kind, kind_spec, *route, slot, slots, rate_range, &mut self.rng);
                match self.placement.spawn(EntityKind::Refuse, &kind_spec.model) {
                    Some(entity) => {
                        if let Some(parent) = self.stage_entity {
                            self.placement.reparent(entity, parent);
                        }
                        refuse.attach(entity, kind_spec, &mut self.placement);
                    }
                    None => log::warn!("Could not place refuse model {}", kind_spec.model),
                }
                refuses.push(refuse);
            }
        }
        Ok(refuses)
    }

    /// Start the frame loop and the stage's background track
    pub fn start_session(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        if let Some(spec) = &self.spec {
            self.sound.play_background(&spec.first_sound);
        }
        log::info!("Session started");
    }

    pub fn stop_session(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.sound.stop_background();
        log::info!("Session stopped");
    }

    /// Handle a tap on `entity`.
    ///
    /// A free refuse is collected and sent flying to the collection point
    /// above the stage; its count lands when the animation completes.
    /// Returns false for anything else.
    pub fn tapped(&mut self, entity: EntityId) -> bool {
        if !self.running {
            log::debug!("Tap on {entity:?} ignored, session not running");
            return false;
        }
        if self.placement.kind_of(entity) != EntityKind::Refuse {
            return false;
        }
        let Some(index) = self.refuses.iter().position(|r| r.entity() == Some(entity)) else {
            log::warn!("Tap on unknown refuse entity {entity:?}");
            return false;
        };
        let refuse = &mut self.refuses[index];
        if refuse.state() != RefuseState::Free {
            log::warn!("Tap on refuse {index} in state {}", refuse.state().as_str());
            return false;
        }
        if refuse.collected().is_err() {
            return false;
        }

        if let Some(parent) = self.stage_entity {
            self.placement.reparent(entity, parent);
        }
        let jitter = self.config.collection_jitter_xz.abs();
        let (dx, dz) = if jitter > 0.0 {
            (
                self.rng.random_range(-jitter..=jitter),
                self.rng.random_range(-jitter..=jitter),
            )
        } else {
            (0.0, 0.0)
        };
        let target = Transform::from_translation(Vec3::new(dx, self.config.collection_height, dz));
        let handle = self
            .placement
            .begin_move_animation(entity, target, self.config.capture_secs);
        self.sound.play_effect(SoundCue::Collect);
        self.captures.push(Capture {
            refuse: index,
            handle,
            done: false,
        });
        log::debug!("Capture of refuse {index} started");
        true
    }

    // === Observers ===

    pub fn state(&self) -> StageState {
        self.stage.state()
    }

    pub fn is_cleaned(&self) -> bool {
        self.stage.state() == StageState::Cleaned
    }

    pub fn is_prepared(&self) -> bool {
        self.spec.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_showing_cleaned_banner(&self) -> bool {
        self.banner.is_some()
    }

    pub fn free_refuse_count(&self) -> usize {
        Refuse::free_count(&self.refuses)
    }

    pub fn collected_refuse_count(&self) -> usize {
        self.stage.collected_refuse_count()
    }

    pub fn refuses(&self) -> &[Refuse] {
        &self.refuses
    }

    pub fn fish_groups(&self) -> &[FishGroup] {
        &self.fish_groups
    }

    pub fn captures_in_flight(&self) -> usize {
        self.captures.len()
    }

    pub fn stage_index(&self) -> usize {
        self.stage.index()
    }

    pub fn stage_spec(&self) -> Option<&StageSpec> {
        self.spec.as_ref()
    }

    pub fn stage_entity(&self) -> Option<EntityId> {
        self.stage_entity
    }

    pub fn boat_entity(&self) -> Option<EntityId> {
        self.boat_entity
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn placement(&self) -> &P {
        &self.placement
    }

    /// The host advances its animations through this
    pub fn placement_mut(&mut self) -> &mut P {
        &mut self.placement
    }

    pub fn sound(&self) -> &S {
        &self.sound
    }
}
