//! Fish/refuse proximity detection
//!
//! Both populations are small (about ten fish, fifty refuse), so a
//! detection pass is a plain scan over every (fish group, free refuse)
//! pair with sphere overlap tests. No spatial index.

use glam::Vec3;

use super::fish_group::FishGroup;
use super::refuse::{Refuse, RefuseState};

/// One fish touching one free refuse, found by a detection pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub group: usize,
    pub fish: usize,
    pub refuse: usize,
}

/// True when two spheres overlap (touching does not count)
#[inline]
pub fn spheres_overlap(a: Vec3, radius_a: f32, b: Vec3, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) < reach * reach
}

/// Every (group, fish, refuse) contact, ordered by group, then refuse,
/// then fish.
///
/// A refuse may show up once per fish touching it; resolving that is the
/// caller's job.
pub fn detect(groups: &[FishGroup], refuses: &[Refuse]) -> Vec<Collision> {
    let mut hits = Vec::new();
    for (group_index, group) in groups.iter().enumerate() {
        for (refuse_index, refuse) in refuses.iter().enumerate() {
            if refuse.state() != RefuseState::Free {
                continue;
            }
            for fish in group.collisions(refuse) {
                hits.push(Collision {
                    group: group_index,
                    fish,
                    refuse: refuse_index,
                });
            }
        }
    }
    hits
}
