//! Per-frame scene update
//!
//! One call advances, in order:
//! 1. fish along their routes
//! 2. free refuse along theirs
//! 3. the fish/refuse collision pass
//! 4. capture animation bookkeeping and the cleaned check
//! 5. the cleaned banner timer

use super::collision;
use super::fish::{FishId, FishState};
use super::refuse::{Refuse, RefuseState};
use super::scene::Scene;
use super::stage::StageState;
use crate::audio::{SoundCue, SoundPlayer};
use crate::platform::{PhysicsMode, Placement};

impl<P: Placement, S: SoundPlayer> Scene<P, S> {
    /// Advance the scene by `dt` seconds. No-op outside a session.
    pub fn tick(&mut self, dt: f32) {
        if !self.running || self.spec.is_none() {
            return;
        }

        for group in &mut self.fish_groups {
            group.tick(dt, &mut self.placement);
        }
        for refuse in &mut self.refuses {
            refuse.tick(dt, &mut self.placement);
        }

        if self.config.auto_trap {
            self.collision_pass();
        }
        self.update_captures();
        self.update_banner(dt);
    }

    /// Let fine fish catch the free refuse they touch.
    ///
    /// The last free refuse is never caught; it is left for the player.
    pub(super) fn collision_pass(&mut self) {
        let mut free = Refuse::free_count(&self.refuses);
        if free <= 1 {
            return;
        }

        let mut weakened = Vec::new();
        for hit in collision::detect(&self.fish_groups, &self.refuses) {
            if free <= 1 {
                break;
            }
            let refuse = &mut self.refuses[hit.refuse];
            if refuse.state() != RefuseState::Free {
                continue;
            }
            let Some(fish) = self
                .fish_groups
                .get_mut(hit.group)
                .and_then(|g| g.fish_mut(hit.fish))
            else {
                continue;
            };
            if fish.state() != FishState::Fine {
                continue;
            }

            let carrier = FishId {
                group: hit.group,
                fish: hit.fish,
            };
            if refuse.trapped(carrier).is_err() {
                continue;
            }
            free -= 1;

            if let Some(entity) = refuse.entity() {
                if let Some(parent) = fish.entity() {
                    self.placement.reparent(entity, parent);
                }
                self.placement.set_physics_mode(entity, PhysicsMode::Disabled);
            }
            log::debug!(
                "Refuse {} trapped by fish {}/{}",
                hit.refuse,
                hit.group,
                hit.fish
            );

            if fish.trapped() {
                weakened.push(carrier);
            }
        }

        let floor_y = self.spec.as_ref().map_or(0.0, |s| s.floor_y);
        for id in weakened {
            if let Some(fish) = self.fish_groups[id.group].fishes().get(id.fish) {
                fish.begin_sink(floor_y, self.config.sink_secs, &mut self.placement);
                log::debug!(
                    "Fish {}/{} weakened after {} refuse",
                    id.group,
                    id.fish,
                    fish.trapping_refuse_count()
                );
            }
        }
    }

    /// Count finished captures and clean the stage once nothing is left
    fn update_captures(&mut self) {
        if self.captures.is_empty() {
            return;
        }

        for capture in self.captures.iter_mut().filter(|c| !c.done) {
            if !self.placement.is_animation_complete(capture.handle) {
                continue;
            }
            capture.done = true;
            if let Some(entity) = self.refuses.get(capture.refuse).and_then(Refuse::entity) {
                self.placement.set_physics_mode(entity, PhysicsMode::Dynamic);
            }
            self.stage.record_collected();
            log::debug!("Capture of refuse {} finished", capture.refuse);
        }

        if self.captures.iter().all(|c| c.done) && self.remaining_refuse() == 0 {
            self.clean_stage();
        }
        self.captures.retain(|c| !c.done);
    }

    /// Refuse still to be dealt with: free ones plus tapped ones whose
    /// capture has not landed yet
    fn remaining_refuse(&self) -> usize {
        let untrapped = Refuse::free_count(&self.refuses)
            + Refuse::count(&self.refuses, RefuseState::Collected);
        untrapped.saturating_sub(self.stage.collected_refuse_count())
    }

    fn clean_stage(&mut self) {
        if self.stage.state() != StageState::Collecting {
            return;
        }
        if self.stage.mark_cleaned().is_err() {
            return;
        }
        self.banner = Some(0.0);
        self.sound.play_effect(SoundCue::Cleaned);
        log::info!(
            "Stage {} cleaned: {} collected, {} trapped",
            self.stage.index(),
            self.stage.collected_refuse_count(),
            Refuse::count(&self.refuses, RefuseState::Trapped)
        );
    }

    /// Hide the banner after its time is up, release what the fish carried
    /// and let them recover
    fn update_banner(&mut self, dt: f32) {
        let Some(elapsed) = self.banner else {
            return;
        };
        let elapsed = elapsed + dt;
        if elapsed <= self.config.cleaned_banner_secs {
            self.banner = Some(elapsed);
            return;
        }
        self.banner = None;

        if let Some(spec) = &self.spec {
            self.sound.play_background(&spec.second_sound);
        }

        let mut released = 0;
        for refuse in self
            .refuses
            .iter_mut()
            .filter(|r| r.state() == RefuseState::Trapped)
        {
            if refuse.disappear(&mut self.placement).is_ok() {
                released += 1;
            }
        }
        let recovered: usize = self
            .fish_groups
            .iter_mut()
            .map(|g| g.recover_all(&mut self.placement))
            .sum();
        log::info!("Cleaned banner done: {released} refuse released, {recovered} fish recovered");
    }
}
