//! The catalog the game ships with

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;

use super::*;

/// Stage dome radius and sea-centre offset; weak fish sink to the rock at
/// the bottom of the dome.
const DOME_RADIUS: f32 = 1.5;
const DOME_OFFSET: f32 = 0.75;
const FLOOR_Y: f32 = -(DOME_RADIUS - DOME_OFFSET);

const BOAT_MODEL: &str = "boat1.usdz";

// Refuse kind indexes
const BAG: usize = 0;
const BOTTLE: usize = 1;
const NET: usize = 2;
const DEBRIS1: usize = 3;
const DEBRIS2: usize = 4;

// Fish species indexes
const UMEIROMODOKI: usize = 0;
const BONITO: usize = 1;
const OCELLATUS: usize = 2;
const TURTLE: usize = 3;
const DOLPHIN: usize = 4;
const MACKEREL: usize = 5;
const SALMON: usize = 6;
const NARWHAL: usize = 7;
const BELUGA: usize = 8;
const GRAY_WHALE: usize = 9;

// Fish route indexes
const SMALL_ROUTE: usize = 0;
const MIDDLE_ROUTE: usize = 1;
const LARGE_ROUTE: usize = 2;

impl SceneCatalog {
    /// Seven stages, two refuse routes, ten species
    pub fn standard() -> Self {
        Self {
            refuse_kinds: ["bag", "bottle", "net", "debris1", "debris2"]
                .into_iter()
                .map(refuse_kind)
                .collect(),
            refuse_routes: vec![
                RouteSpec {
                    origin: Vec3::new(0.0, -0.225, 0.0),
                    radius: 1.0,
                    angular_velocity: 2.0 * PI / 40.0,
                    init_y_range: 0.15,
                    init_xz_range: 0.2,
                    moving_y_range: 0.15,
                },
                RouteSpec {
                    origin: Vec3::new(0.0, 0.225, 0.0),
                    radius: 1.2,
                    angular_velocity: -2.0 * PI / 50.0,
                    init_y_range: 0.15,
                    init_xz_range: 0.2,
                    moving_y_range: 0.15,
                },
            ],
            fish_species: vec![
                species("Umeiromodoki", Vec3::new(0.2, 0.04, 0.03), 0.02, FRAC_PI_2, 1.0, 2),
                species("Bonito", Vec3::new(0.3, 0.1, 0.06), 0.05, FRAC_PI_2, 1.0, 2),
                species("Ocellatus", Vec3::new(0.37, 0.06, 0.5), 0.1, 0.0, 0.5, 3),
                species("Turtle", Vec3::new(0.4, 0.128, 0.461), 0.1, 0.0, 0.5, 3),
                species("Dolphin", Vec3::new(0.48, 0.151, 0.195), 0.1, FRAC_PI_2, 1.0, 3),
                species("Mackerel", Vec3::new(0.241, 0.0593, 0.0457), 0.025, FRAC_PI_2, 1.0, 2),
                species("Salmon", Vec3::new(0.357, 0.0766, 0.091), 0.05, FRAC_PI_2, 1.0, 2),
                species("Narwhal", Vec3::new(0.58, 0.129, 0.195), 0.06, 0.0, 0.5, 3),
                species("Beluga", Vec3::new(0.457, 0.15, 0.195), 0.1, 0.0, 0.5, 3),
                species("Gray Whale", Vec3::new(0.747, 0.175, 0.185), 0.1, 0.0, 1.0, 3),
            ],
            fish_routes: vec![
                // small fish
                fish_route(0.9, 0.6, 1.0),
                // middle fish
                fish_route(1.0, 1.0, 1.0),
                // large fish
                fish_route(2.0, 1.0, 1.0),
                // large fish, no precession
                fish_route(2.0, 1.0, 0.0),
            ],
            stages: vec![
                stage("Daytime", "stage1.usdz", "nukumori", [UMEIROMODOKI, BONITO], 1.0, &[OCELLATUS, TURTLE, DOLPHIN], 2),
                stage("Evening", "stage1.usdz", "aomuke", [UMEIROMODOKI, BONITO], 1.0, &[DOLPHIN, OCELLATUS, TURTLE], 2),
                stage("Night", "stage1.usdz", "hidamari", [UMEIROMODOKI, BONITO], 1.0, &[TURTLE, DOLPHIN, OCELLATUS], 2),
                stage("Room", "stage1.usdz", "needbetter", [UMEIROMODOKI, BONITO], -1.0, &[DOLPHIN, TURTLE, OCELLATUS], 2),
                stage("Daytime North Pole", "stage2.usdz", "inthewater", [MACKEREL, SALMON], 1.0, &[NARWHAL, BELUGA, GRAY_WHALE], 1),
                stage("Night North Pole", "stage2.usdz", "uminomori", [MACKEREL, SALMON], 1.0, &[NARWHAL, BELUGA, GRAY_WHALE], 1),
                stage("Room North Pole", "stage2.usdz", "ushinawareta", [MACKEREL, SALMON], 1.0, &[NARWHAL, BELUGA, GRAY_WHALE], 1),
            ],
        }
    }
}

fn refuse_kind(name: &str) -> RefuseKindSpec {
    RefuseKindSpec {
        name: name.to_string(),
        model: format!("{name}.usdz"),
        volume_radius: 0.075,
        mass: 1.0,
        friction: 0.1,
        restitution: 0.1,
        weight: 1.0,
    }
}

fn species(
    name: &str,
    volume: Vec3,
    collision_radius: f32,
    weak_angle_x: f32,
    select_probability: f32,
    trap_capacity: u32,
) -> FishSpeciesSpec {
    FishSpeciesSpec {
        name: name.to_string(),
        model: format!("{}.usdz", name.to_lowercase().replace(' ', "")),
        volume,
        collision_radius,
        mass: 1.0,
        friction: 0.1,
        restitution: 0.1,
        weak_angle_x,
        select_probability,
        trap_capacity,
    }
}

fn fish_route(radius_x: f32, radius_z: f32, cycle_mul_rate_xz: f32) -> FishRouteSpec {
    FishRouteSpec {
        radius_x,
        radius_y: 0.3,
        radius_z,
        origin_y: 0.0,
        cycle_rate_y: 2.0,
        cycle_div_rate_xz: 2.0,
        cycle_mul_rate_xz,
    }
}

fn fish_group(species_candidates: &[usize], fish_count: usize, route: usize, velocity: f32) -> FishGroupSpec {
    FishGroupSpec {
        species_candidates: species_candidates.to_vec(),
        fish_count,
        route,
        velocity,
        angle_gap_min: PI / 8.0,
        angle_gap_max: PI / 6.0,
        jitter_max: 0.1,
    }
}

/// Every stage has the same refuse layout and three fish groups:
/// a small school, a middle school and one or two large animals.
/// `small_direction` flips the small school's swimming direction.
fn stage(
    name: &str,
    model: &str,
    second_sound: &str,
    [small, middle]: [usize; 2],
    small_direction: f32,
    large: &[usize],
    large_count: usize,
) -> StageSpec {
    StageSpec {
        name: name.to_string(),
        model: model.to_string(),
        boat_model: BOAT_MODEL.to_string(),
        boat_position: Vec3::ZERO,
        first_sound: "wave1".to_string(),
        second_sound: second_sound.to_string(),
        refuse_kinds: vec![BAG, BOTTLE, NET, DEBRIS1, DEBRIS2],
        refuse_numbers: vec![20, 25],
        fish_groups: vec![
            fish_group(&[small], 6, SMALL_ROUTE, small_direction * 2.0 * PI / 40.0),
            fish_group(&[middle], 3, MIDDLE_ROUTE, 2.0 * PI / 20.0),
            fish_group(large, large_count, LARGE_ROUTE, PI / 50.0),
        ],
        floor_y: FLOOR_Y,
    }
}
