//! A school of fish sharing one species, route and speed

use rand::Rng;

use super::fish::Fish;
use super::motion::fish_target_position;
use super::refuse::Refuse;
use crate::catalog::{FishGroupSpec, FishRouteSpec, FishSpeciesSpec, SceneCatalog};
use crate::error::SceneError;
use crate::platform::{EntityKind, Placement};

/// Pick the group's species.
///
/// Candidates are tried in order, each winning with its own
/// `select_probability`; the first hit is taken and the first candidate is
/// the fallback. Earlier candidates are therefore favoured beyond their
/// nominal probability.
pub fn choose_species<R: Rng>(candidates: &[usize], species: &[FishSpeciesSpec], rng: &mut R) -> usize {
    for &index in candidates {
        let probability = species.get(index).map_or(0.0, |s| s.select_probability);
        if probability > rng.random::<f32>() {
            return index;
        }
    }
    candidates.first().copied().unwrap_or(0)
}

#[derive(Debug, Clone)]
pub struct FishGroup {
    spec: FishGroupSpec,
    route: FishRouteSpec,
    species: usize,
    fishes: Vec<Fish>,
}

impl FishGroup {
    /// Choose a species and line `fish_count` fish up along the route.
    ///
    /// Each fish sits a random gap from `[angle_gap_min, angle_gap_max]`
    /// ahead of the previous one, in the swimming direction.
    pub fn spawn<R: Rng>(
        spec: &FishGroupSpec,
        catalog: &SceneCatalog,
        jitter_override: Option<f32>,
        rng: &mut R,
    ) -> Result<Self, SceneError> {
        let route = *catalog.fish_routes.get(spec.route).ok_or_else(|| {
            SceneError::InvalidCatalog(format!("fish route {} out of range", spec.route))
        })?;
        let species = choose_species(&spec.species_candidates, &catalog.fish_species, rng);
        let species_spec = catalog.fish_species.get(species).ok_or_else(|| {
            SceneError::InvalidCatalog(format!("fish species {species} out of range"))
        })?;

        let jitter_max = jitter_override.unwrap_or(spec.jitter_max);
        let direction = if spec.velocity >= 0.0 { 1.0 } else { -1.0 };
        let mut angle = 0.0;
        let mut fishes = Vec::with_capacity(spec.fish_count);
        for _ in 0..spec.fish_count {
            fishes.push(Fish::new(species, species_spec, angle, jitter_max, rng));
            angle += direction * rng.random_range(spec.angle_gap_min..=spec.angle_gap_max);
        }

        log::debug!(
            "Fish group: {} x {} on route {}",
            spec.fish_count,
            species_spec.name,
            spec.route
        );

        Ok(Self {
            spec: spec.clone(),
            route,
            species,
            fishes,
        })
    }

    /// Spawn a host entity per fish and put each at its route start.
    /// Fish whose entity fails to spawn keep swimming without a visual.
    pub fn place<P: Placement>(&mut self, species: &FishSpeciesSpec, placement: &mut P) {
        for fish in &mut self.fishes {
            match placement.spawn(EntityKind::Fish, &species.model) {
                Some(entity) => fish.attach(entity, species, placement),
                None => log::warn!("Could not place fish model {}", species.model),
            }
            let (position, angle) = fish_target_position(
                &self.route,
                self.spec.velocity,
                fish.angle_offset(),
                fish.position_diff(),
                0.0,
            );
            fish.set_initial_position(position, angle, placement);
        }
    }

    pub fn tick<P: Placement>(&mut self, dt: f32, placement: &mut P) {
        for fish in &mut self.fishes {
            fish.tick(dt, &self.route, self.spec.velocity, placement);
        }
    }

    /// Indexes of every fine fish touching `refuse`
    pub fn collisions(&self, refuse: &Refuse) -> Vec<usize> {
        self.fishes
            .iter()
            .enumerate()
            .filter(|(_, fish)| fish.is_colliding(refuse))
            .map(|(i, _)| i)
            .collect()
    }

    /// Recover every weak fish. Returns how many recovered.
    pub fn recover_all<P: Placement>(&mut self, placement: &mut P) -> usize {
        self.fishes
            .iter_mut()
            .map(|fish| fish.recover(placement))
            .filter(|&recovered| recovered)
            .count()
    }

    pub fn fishes(&self) -> &[Fish] {
        &self.fishes
    }

    pub(crate) fn fish_mut(&mut self, index: usize) -> Option<&mut Fish> {
        self.fishes.get_mut(index)
    }

    pub fn species(&self) -> usize {
        self.species
    }

    pub fn velocity(&self) -> f32 {
        self.spec.velocity
    }

    pub fn route(&self) -> &FishRouteSpec {
        &self.route
    }
}
