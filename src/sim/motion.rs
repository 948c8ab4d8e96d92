//! Parametric motion on ellipses and circular routes
//!
//! Pure functions of (route, phase, elapsed time). Nothing here integrates
//! velocities, so positions never drift and identical inputs always give
//! identical outputs.
//!
//! Axis conventions follow the host engine: Y is up, and the engine's Z
//! axis points the other way from the math-textbook Z, so ellipse Z values
//! and refuse angles are sign-inverted.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec3;

use crate::catalog::FishRouteSpec;
use crate::consts::ELLIPSE_Z_EPSILON;
use crate::rotate_xz;

/// A point on an ellipse plus the facing angle of a fish swimming there
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipsePoint {
    pub x: f32,
    pub z: f32,
    /// Rotation about Y (rad)
    pub angle: f32,
}

/// Point on the ellipse `(radius_x cos a, radius_z sin a)` and the
/// inclination of its tangent.
///
/// `angle` outside (-2π, 2π) is reduced by remainder. The tangent angle
/// gets +π past ±π so it stays continuous over a whole lap in either
/// direction, then another +π because fish models face backwards.
pub fn ellipse_position(radius_x: f32, radius_z: f32, angle: f32) -> EllipsePoint {
    let angle = if angle >= TAU || angle <= -TAU {
        angle % TAU
    } else {
        angle
    };

    let x = radius_x * angle.cos();
    let z = radius_z * angle.sin();

    let mut tangent = if z.abs() > ELLIPSE_Z_EPSILON {
        let inclination = -(radius_z * radius_z / (radius_x * radius_x)) * x / z;
        inclination.atan()
    } else if (x >= 0.0) == (z >= 0.0) {
        // limit of atan(-k * x / z) as z -> 0
        -FRAC_PI_2
    } else {
        FRAC_PI_2
    };

    if angle >= PI {
        tangent += PI;
    } else if angle <= -PI {
        tangent -= PI;
    }
    tangent += PI;

    EllipsePoint {
        x,
        z: -z,
        angle: tangent,
    }
}

/// Position of a refuse `elapsed` seconds after it started orbiting.
///
/// Rotates `initial` about the Y axis by `-angular_velocity * elapsed` and
/// bobs it vertically `moving_rate` times per orbit radian.
pub fn refuse_position(
    initial: Vec3,
    angular_velocity: f32,
    moving_rate: f32,
    moving_y_range: f32,
    elapsed: f32,
) -> Vec3 {
    let angle = -angular_velocity * elapsed;
    let mut position = rotate_xz(initial, angle);
    position.y = initial.y + (angle * moving_rate).sin() * moving_y_range;
    position
}

/// Target position and facing angle of a fish on its route.
///
/// The ellipse is traced at `velocity`, bobbed vertically at a slower
/// cycle, and the whole ellipse precesses about Y by
/// `angle * cycle_mul_rate_xz / cycle_div_rate_xz`.
pub fn fish_target_position(
    route: &FishRouteSpec,
    velocity: f32,
    angle_offset: f32,
    position_diff: Vec3,
    time: f32,
) -> (Vec3, f32) {
    let angle = velocity * time + angle_offset;
    let on_ellipse = ellipse_position(route.radius_x, route.radius_z, angle);

    let bob_angle = velocity * time / route.cycle_rate_y + angle_offset;
    let y = route.radius_y * bob_angle.sin() + route.origin_y;

    let precession = angle * route.cycle_mul_rate_xz / route.cycle_div_rate_xz;
    let position = rotate_xz(Vec3::new(on_ellipse.x, y, on_ellipse.z), -precession);

    (position + position_diff, on_ellipse.angle + precession)
}

/// Wrap an angle difference into [-π, π]
#[inline]
pub fn angle_delta(a: f32, b: f32) -> f32 {
    let d = (b - a) % TAU;
    if d > PI {
        d - TAU
    } else if d < -PI {
        d + TAU
    } else {
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn route() -> FishRouteSpec {
        FishRouteSpec {
            radius_x: 0.9,
            radius_y: 0.3,
            radius_z: 0.6,
            origin_y: 0.0,
            cycle_rate_y: 2.0,
            cycle_div_rate_xz: 2.0,
            cycle_mul_rate_xz: 1.0,
        }
    }

    #[test]
    fn test_ellipse_axis_points() {
        let p = ellipse_position(2.0, 1.0, 0.0);
        assert!((p.x - 2.0).abs() < 1e-6);
        assert!(p.z.abs() < 1e-6);
        // tangent vertical (-π/2), then flipped for the model
        assert!((p.angle - FRAC_PI_2).abs() < 1e-6);

        let p = ellipse_position(2.0, 1.0, FRAC_PI_2);
        assert!(p.x.abs() < 1e-6);
        // z is inverted
        assert!((p.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ellipse_degenerate_z_branches() {
        // angle exactly π: sin(π) is a tiny negative in f32
        let at_pi = ellipse_position(0.9, 0.6, PI);
        let before = ellipse_position(0.9, 0.6, PI - 0.01);
        let after = ellipse_position(0.9, 0.6, PI + 0.01);
        assert!(angle_delta(before.angle, at_pi.angle).abs() < 0.05);
        assert!(angle_delta(at_pi.angle, after.angle).abs() < 0.05);

        let at_zero = ellipse_position(0.9, 0.6, 0.0);
        let just_after = ellipse_position(0.9, 0.6, 0.01);
        assert!(angle_delta(at_zero.angle, just_after.angle).abs() < 0.05);
    }

    #[test]
    fn test_ellipse_tangent_continuous_over_lap() {
        for (rx, rz) in [(0.9, 0.6), (1.0, 1.0), (2.0, 1.0)] {
            let steps = 20_000;
            let mut prev = ellipse_position(rx, rz, 0.0).angle;
            for i in 1..steps {
                let angle = TAU * i as f32 / steps as f32;
                let next = ellipse_position(rx, rz, angle).angle;
                assert!(
                    (next - prev).abs() < 0.05,
                    "jump at {angle}: {prev} -> {next} (rx={rx}, rz={rz})"
                );
                prev = next;
            }
        }
    }

    #[test]
    fn test_ellipse_tangent_continuous_negative_lap() {
        let steps = 20_000;
        let mut prev = ellipse_position(2.0, 1.0, -1e-3).angle;
        for i in 2..steps {
            let angle = -TAU * i as f32 / steps as f32;
            let next = ellipse_position(2.0, 1.0, angle).angle;
            assert!((next - prev).abs() < 0.05, "jump at {angle}");
            prev = next;
        }
    }

    #[test]
    fn test_ellipse_wrap_keeps_orientation() {
        // crossing 2π jumps the raw angle by 2π, the facing is unchanged
        let before = ellipse_position(2.0, 1.0, TAU - 1e-3);
        let after = ellipse_position(2.0, 1.0, TAU + 1e-3);
        assert!(angle_delta(before.angle, after.angle).abs() < 0.01);
    }

    #[test]
    fn test_refuse_position_at_start() {
        let initial = Vec3::new(1.0, -0.2, 0.0);
        let p = refuse_position(initial, 0.5, 4.0, 0.15, 0.0);
        assert_eq!(p, initial);
    }

    #[test]
    fn test_refuse_rotates_against_angular_velocity() {
        // positive angular velocity turns towards -z in engine space
        let p = refuse_position(Vec3::new(1.0, 0.0, 0.0), FRAC_PI_2, 4.0, 0.0, 1.0);
        assert!(p.x.abs() < 1e-5);
        assert!((p.z + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_fish_target_no_precession() {
        let route = FishRouteSpec {
            cycle_mul_rate_xz: 0.0,
            ..route()
        };
        let (pos, angle) = fish_target_position(&route, 0.5, 0.3, Vec3::ZERO, 2.0);
        let e = ellipse_position(route.radius_x, route.radius_z, 1.3);
        assert!((pos.x - e.x).abs() < 1e-6);
        assert!((pos.z - e.z).abs() < 1e-6);
        assert!((angle - e.angle).abs() < 1e-6);
        let expected_y = 0.3 * (0.5 * 2.0 / 2.0 + 0.3_f32).sin();
        assert!((pos.y - expected_y).abs() < 1e-6);
    }

    #[test]
    fn test_fish_target_adds_jitter() {
        let diff = Vec3::new(0.05, -0.02, 0.1);
        let (plain, a) = fish_target_position(&route(), 0.3, 0.0, Vec3::ZERO, 5.0);
        let (shifted, b) = fish_target_position(&route(), 0.3, 0.0, diff, 5.0);
        assert!((shifted - plain - diff).length() < 1e-6);
        assert_eq!(a, b);
    }

    #[test]
    fn test_fish_target_precession_rotates_facing() {
        let (_, with) = fish_target_position(&route(), 0.4, 0.0, Vec3::ZERO, 3.0);
        let flat = FishRouteSpec {
            cycle_mul_rate_xz: 0.0,
            ..route()
        };
        let (_, without) = fish_target_position(&flat, 0.4, 0.0, Vec3::ZERO, 3.0);
        // precession = 1.2 * 1 / 2
        assert!((with - without - 0.6).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_ellipse_periodic(angle in -6.0f32..6.0, k in -3i32..=3, rx in 0.5f32..2.0, rz in 0.5f32..2.0) {
            let a = ellipse_position(rx, rz, angle);
            let b = ellipse_position(rx, rz, angle + TAU * k as f32);
            prop_assert!((a.x - b.x).abs() < 1e-3);
            prop_assert!((a.z - b.z).abs() < 1e-3);
        }

        #[test]
        fn prop_ellipse_stays_on_curve(angle in -20.0f32..20.0, rx in 0.5f32..2.0, rz in 0.5f32..2.0) {
            let p = ellipse_position(rx, rz, angle);
            let r = (p.x / rx).powi(2) + (p.z / rz).powi(2);
            prop_assert!((r - 1.0).abs() < 1e-4);
        }

        #[test]
        fn prop_refuse_orbit_periodic(
            t in 0.0f32..60.0,
            omega in prop_oneof![0.05f32..1.0, -1.0f32..-0.05],
            rate in 1u32..6,
        ) {
            let initial = Vec3::new(1.1, 0.2, -0.15);
            let period = TAU / omega.abs();
            let a = refuse_position(initial, omega, rate as f32, 0.15, t);
            let b = refuse_position(initial, omega, rate as f32, 0.15, t + period);
            prop_assert!((a.x - b.x).abs() < 1e-3);
            prop_assert!((a.z - b.z).abs() < 1e-3);
            // integral bob rate: angle * rate moves by a multiple of 2π
            prop_assert!((a.y - b.y).abs() < 1e-3);
        }

        #[test]
        fn prop_refuse_keeps_orbit_radius(t in 0.0f32..120.0, omega in -1.0f32..1.0) {
            let initial = Vec3::new(0.8, 0.0, 0.6);
            let p = refuse_position(initial, omega, 4.0, 0.15, t);
            let r = (p.x * p.x + p.z * p.z).sqrt();
            prop_assert!((r - 1.0).abs() < 1e-4);
            prop_assert!(p.y.abs() <= 0.15 + 1e-6);
        }

        #[test]
        fn prop_fish_target_deterministic(t in 0.0f32..200.0, v in -1.0f32..1.0, offset in -3.0f32..3.0) {
            let a = fish_target_position(&route(), v, offset, Vec3::splat(0.01), t);
            let b = fish_target_position(&route(), v, offset, Vec3::splat(0.01), t);
            prop_assert_eq!(a, b);
        }
    }
}
