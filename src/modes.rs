//! Per-gesture target math.
//!
//! Every gesture maps to a [`ModeDescriptor`]: which shape to follow, how
//! particle indices map onto it, and which procedural motion to layer on top.

use glam::Vec3;
use std::f64::consts::TAU;

use crate::gesture::GestureState;
use crate::shape_library::{planar_angle, planar_radius, ShapeKey};

pub const TREE_SPIN_SPEED: f32 = 0.3;
pub const IMPLOSION_SPIN_SPEED: f32 = 2.0;
pub const REVEAL_DURATION: f32 = 1.5;
pub const REVEAL_START_RADIUS: f32 = 20.0;
pub const REVEAL_START_SPIN: f32 = 2.0;
pub const REVEAL_END_SPIN: f32 = 0.5;
pub const SCATTER_EXTENT: f32 = 500.0;
pub const SCATTER_DEPTH: f32 = -500.0;

/// How particle `i` picks its shape point when the shape length `L` differs
/// from the particle count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillPolicy {
    /// Point `i mod L`
    CyclicFill,
    /// Point `i` for `i < L`; the rest are scattered far behind every tick
    DirectFillWithScatter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Slow spin about the vertical axis plus a twinkle on x
    TreeSpin,
    /// Tight spiral around the origin, no shape
    Implosion,
    /// Global bob on y, per-particle sparkle
    FramePulse,
    /// Eased expansion from a small ring, spin slowing down
    RevealVortex,
    /// Tiny wobble on x and y
    TextWobble,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeDescriptor {
    pub shape: Option<ShapeKey>,
    pub policy: FillPolicy,
    pub motion: Motion,
}

impl ModeDescriptor {
    pub fn for_gesture(gesture: GestureState) -> Self {
        use FillPolicy::*;
        use Motion::*;

        let (shape, policy, motion) = match gesture {
            GestureState::Idle => (Some(ShapeKey::ChristmasTree), CyclicFill, TreeSpin),
            GestureState::Fist => (None, CyclicFill, Implosion),
            GestureState::Pinch => (Some(ShapeKey::PhotoFrame), CyclicFill, FramePulse),
            GestureState::FaceReveal => (Some(ShapeKey::Vortex), CyclicFill, RevealVortex),
            GestureState::DoubleLove => {
                (Some(ShapeKey::SpecialLove), DirectFillWithScatter, TextWobble)
            }
            GestureState::Finger(n) => {
                (Some(ShapeKey::Finger(n)), DirectFillWithScatter, TextWobble)
            }
        };

        Self {
            shape,
            policy,
            motion,
        }
    }
}

/// Everything a motion needs besides the shape point
#[derive(Debug, Clone, Copy)]
pub struct MotionInput {
    pub index: usize,
    pub time: f64,
    pub reveal_start: f64,
    /// Immutable per-particle jitter in 0..1
    pub offset: Vec3,
}

impl Motion {
    /// Target for one particle. `point` is the mapped shape point; the
    /// implosion ignores it.
    pub fn target(&self, point: Vec3, input: &MotionInput) -> Vec3 {
        let t = input.time;
        let i = input.index as f32;

        match self {
            Motion::TreeSpin => {
                let rotated = rotate_y(point, phase(t, TREE_SPIN_SPEED));
                let twinkle = (phase(t, 3.0) + i * 0.1).sin() * 0.5;
                Vec3::new(rotated.x + twinkle, point.y, rotated.z)
            }
            Motion::Implosion => {
                let angle = i * 0.1 + phase(t, IMPLOSION_SPIN_SPEED);
                let radius = 2.0 + input.offset.x * 3.0;
                Vec3::new(
                    angle.cos() * radius,
                    angle.sin() * radius,
                    (input.offset.z - 0.5) * 5.0,
                )
            }
            Motion::FramePulse => {
                let pulse = phase(t, 4.0).sin() * 2.0;
                let sparkle = (phase(t, 8.0) + i * 0.3).sin() * 1.5;
                Vec3::new(
                    point.x + sparkle,
                    point.y + pulse * 0.3,
                    point.z + (phase(t, 2.0) + i * 0.1).sin() * 3.0,
                )
            }
            Motion::RevealVortex => {
                let progress = reveal_progress((t - input.reveal_start) as f32);
                let angle = planar_angle(point) + phase(t, reveal_spin_speed(progress));
                let radius = reveal_radius(planar_radius(point), progress);
                let fade = 1.0 - progress;
                let sparkle = (phase(t, 8.0) + i * 0.5).sin() * fade * 15.0;

                Vec3::new(
                    angle.cos() * (radius + sparkle),
                    angle.sin() * (radius + sparkle),
                    point.z + (phase(t, 3.0) + i).sin() * 20.0 * fade,
                )
            }
            Motion::TextWobble => Vec3::new(
                point.x + (phase(t, 2.0) + i).sin() * 0.05,
                point.y + (phase(t, 1.5) + i).cos() * 0.05,
                point.z,
            ),
        }
    }
}

/// `t * rate` reduced to one turn, so the f32 trig stays precise however
/// long the clock has run
pub fn phase(t: f64, rate: f32) -> f32 {
    (t * rate as f64).rem_euclid(TAU) as f32
}

/// Rotation about the vertical axis
pub fn rotate_y(p: Vec3, angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(p.x * cos - p.z * sin, p.y, p.x * sin + p.z * cos)
}

/// Linear progress through the reveal, clamped to 0..=1
pub fn reveal_progress(elapsed: f32) -> f32 {
    (elapsed / REVEAL_DURATION).clamp(0.0, 1.0)
}

/// Cubic ease-out
pub fn ease_out_cubic(p: f32) -> f32 {
    1.0 - (1.0 - p).powi(3)
}

/// Radius grows from the start ring to the shape's own radius
pub fn reveal_radius(end_radius: f32, progress: f32) -> f32 {
    let eased = ease_out_cubic(progress);
    if eased >= 1.0 {
        return end_radius;
    }
    REVEAL_START_RADIUS + (end_radius - REVEAL_START_RADIUS) * eased
}

/// Spin decays linearly from 2.0 to 0.5 rad/s
pub fn reveal_spin_speed(progress: f32) -> f32 {
    REVEAL_START_SPIN - progress * (REVEAL_START_SPIN - REVEAL_END_SPIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(index: usize, time: f64, reveal_start: f64) -> MotionInput {
        MotionInput {
            index,
            time,
            reveal_start,
            offset: Vec3::splat(0.5),
        }
    }

    #[test]
    fn test_descriptor_policies() {
        assert_eq!(
            ModeDescriptor::for_gesture(GestureState::Idle).policy,
            FillPolicy::CyclicFill
        );
        assert_eq!(ModeDescriptor::for_gesture(GestureState::Fist).shape, None);
        let finger = ModeDescriptor::for_gesture(GestureState::Finger(4));
        assert_eq!(finger.shape, Some(ShapeKey::Finger(4)));
        assert_eq!(finger.policy, FillPolicy::DirectFillWithScatter);
        assert_eq!(
            ModeDescriptor::for_gesture(GestureState::DoubleLove).policy,
            FillPolicy::DirectFillWithScatter
        );
    }

    #[test]
    fn test_reveal_starts_at_small_ring() {
        assert_eq!(reveal_progress(0.0), 0.0);
        assert_eq!(reveal_radius(230.0, 0.0), REVEAL_START_RADIUS);
        assert_eq!(reveal_spin_speed(0.0), 2.0);
    }

    #[test]
    fn test_reveal_ends_on_shape_radius() {
        for elapsed in [1.5, 2.0, 100.0] {
            let p = reveal_progress(elapsed);
            assert_eq!(p, 1.0);
            assert_eq!(reveal_radius(231.25, p), 231.25);
            assert_eq!(reveal_spin_speed(p), 0.5);
        }
    }

    #[test]
    fn test_reveal_target_settles_on_shape() {
        let point = Vec3::new(120.0, -160.0, 7.0);
        let target = Motion::RevealVortex.target(point, &input(42, 3.0, 1.0));
        assert!((planar_radius(target) - 200.0).abs() < 1e-3);
        assert!((target.z - 7.0).abs() < 1e-6);
    }

    #[test]
    fn test_reveal_target_at_entry() {
        let point = Vec3::new(200.0, 0.0, 0.0);
        // index 0 at t = 0: no sparkle phase, radius is the start ring
        let target = Motion::RevealVortex.target(point, &input(0, 0.0, 0.0));
        assert!((planar_radius(target) - REVEAL_START_RADIUS).abs() < 1e-4);
    }

    #[test]
    fn test_ease_is_monotonic() {
        let mut last = 0.0;
        for step in 1..=100 {
            let e = ease_out_cubic(step as f32 / 100.0);
            assert!(e > last);
            last = e;
        }
        assert_eq!(ease_out_cubic(1.0), 1.0);
    }

    #[test]
    fn test_tree_spin_preserves_height_and_radius() {
        let point = Vec3::new(10.0, 5.0, 0.0);
        let target = Motion::TreeSpin.target(point, &input(0, 2.0, 0.0));
        assert_eq!(target.y, 5.0);
        let untwinkled = Vec3::new(target.x - (6.0f32).sin() * 0.5, 0.0, target.z);
        assert!((untwinkled.length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_implosion_stays_tight() {
        for i in 0..100 {
            let mut inp = input(i, i as f64 * 0.37, 0.0);
            inp.offset = Vec3::new(i as f32 / 100.0, 0.0, 1.0);
            let target = Motion::Implosion.target(Vec3::splat(999.0), &inp);
            let r = planar_radius(target);
            assert!((2.0 - 1e-4..=5.0 + 1e-4).contains(&r));
            assert!((target.z - 2.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_pinch_frame_pulse() {
        let point = Vec3::new(40.0, -10.0, 0.0);
        let (i, t) = (7usize, 1.25f64);
        let target = Motion::FramePulse.target(point, &input(i, t, 0.0));

        let tf = t as f32;
        let fi = i as f32;
        let expected = Vec3::new(
            40.0 + (tf * 8.0 + fi * 0.3).sin() * 1.5,
            -10.0 + (tf * 4.0).sin() * 2.0 * 0.3,
            (tf * 2.0 + fi * 0.1).sin() * 3.0,
        );
        assert!((target - expected).length() < 1e-4, "{:?} vs {:?}", target, expected);

        // the pulse keeps the frame within a few units of its shape point
        for step in 0..200 {
            let target = Motion::FramePulse.target(point, &input(step, step as f64 * 0.05, 0.0));
            assert!((target.x - point.x).abs() <= 1.5 + 1e-4);
            assert!((target.y - point.y).abs() <= 0.6 + 1e-4);
            assert!(target.z.abs() <= 3.0 + 1e-4);
        }
    }

    #[test]
    fn test_phase_is_precise_at_large_times() {
        let start = 262_144.0f64;
        let a = phase(start, 3.0);
        let b = phase(start + 0.01, 3.0);
        let step = (b - a).rem_euclid(std::f32::consts::TAU);
        assert!((step - 0.03).abs() < 1e-4, "step {}", step);

        // twinkle keeps moving tick to tick
        let point = Vec3::new(10.0, 5.0, 0.0);
        let first = Motion::TreeSpin.target(point, &input(3, start, 0.0));
        let next = Motion::TreeSpin.target(point, &input(3, start + 0.01, 0.0));
        assert_ne!(first, next);
    }
}
