use glam::Vec3;
use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::ColorConfig;
use crate::modes::{FillPolicy, ModeDescriptor, MotionInput, SCATTER_DEPTH, SCATTER_EXTENT};
use crate::shape_library::ShapeSet;

/// Side of the cube particles start in
const START_EXTENT: f32 = 200.0;

fn random_unit_vec(rng: &mut StdRng) -> Vec3 {
    Vec3::new(rng.gen(), rng.gen(), rng.gen())
}

/// One step of exponential smoothing toward `target`
pub fn smooth_toward(current: Vec3, target: Vec3, alpha: f32) -> Vec3 {
    current + (target - current) * alpha
}

/// The swarm: parallel arrays of length N, fixed for the life of the field.
/// Positions and colors are laid out flat (x, y, z per particle) so they can
/// go straight to a renderer.
pub struct ParticleField {
    positions: Vec<Vec3>,
    targets: Vec<Vec3>,
    offsets: Vec<Vec3>,
    colors: Vec<Vec3>,
    smoothing: f32,
    needs_redraw: bool,
    rng: StdRng,
}

impl ParticleField {
    /// Create a field with chaotic start positions and gradient colors
    pub fn new(count: usize, colors: &ColorConfig, smoothing: f32) -> Self {
        Self::with_rng(count, colors, smoothing, StdRng::from_entropy())
    }

    pub fn with_rng(count: usize, colors: &ColorConfig, smoothing: f32, mut rng: StdRng) -> Self {
        let positions: Vec<Vec3> = (0..count)
            .map(|_| (random_unit_vec(&mut rng) - 0.5) * START_EXTENT)
            .collect();
        let offsets = (0..count).map(|_| random_unit_vec(&mut rng)).collect();
        let particle_colors = (0..count)
            .map(|_| colors.sample(rng.gen::<f32>()))
            .collect();

        Self {
            targets: positions.clone(),
            positions,
            offsets,
            colors: particle_colors,
            smoothing,
            needs_redraw: true,
            rng,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn targets(&self) -> &[Vec3] {
        &self.targets
    }

    /// Flat position buffer of length 3N
    pub fn position_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Flat color buffer of length 3N, written once at creation
    pub fn color_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Positions as a byte slice for GPU upload (zero-copy)
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Returns whether positions changed since the last call, and clears it
    pub fn take_needs_redraw(&mut self) -> bool {
        std::mem::replace(&mut self.needs_redraw, false)
    }

    /// Recompute every target for the active mode. A missing or empty shape
    /// leaves the previous targets in place.
    pub fn update_targets(
        &mut self,
        mode: &ModeDescriptor,
        shapes: &ShapeSet,
        time: f64,
        reveal_start: f64,
    ) {
        let shape = match mode.shape {
            None => None,
            Some(key) => match shapes.get(key) {
                Some(shape) if !shape.is_empty() => Some(shape),
                _ => {
                    warn!("Shape {} unavailable, keeping previous targets", key);
                    return;
                }
            },
        };

        for i in 0..self.targets.len() {
            let input = MotionInput {
                index: i,
                time,
                reveal_start,
                offset: self.offsets[i],
            };

            let point = match (shape, mode.policy) {
                (None, _) => Vec3::ZERO,
                (Some(shape), FillPolicy::CyclicFill) => match shape.cyclic(i) {
                    Some(point) => point,
                    None => continue,
                },
                (Some(shape), FillPolicy::DirectFillWithScatter) => match shape.get(i) {
                    Some(point) => point,
                    None => {
                        self.targets[i] = self.scatter_point();
                        continue;
                    }
                },
            };

            self.targets[i] = mode.motion.target(point, &input);
        }
    }

    /// Random spot in the far background; recomputed each tick so overflow
    /// particles never settle
    fn scatter_point(&mut self) -> Vec3 {
        Vec3::new(
            (self.rng.gen::<f32>() - 0.5) * SCATTER_EXTENT,
            (self.rng.gen::<f32>() - 0.5) * SCATTER_EXTENT,
            SCATTER_DEPTH,
        )
    }

    /// Move every particle a fixed fraction of the way to its target.
    /// Not scaled by frame time: tuned for a steady tick rate.
    pub fn smooth(&mut self) {
        for (position, target) in self.positions.iter_mut().zip(&self.targets) {
            *position = smooth_toward(*position, *target, self.smoothing);
        }
        self.needs_redraw = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::GestureState;
    use crate::shape_library::{Shape, ShapeKey};

    fn field(count: usize) -> ParticleField {
        ParticleField::with_rng(count, &ColorConfig::default(), 0.05, StdRng::seed_from_u64(1))
    }

    fn text_like_set(len: usize) -> ShapeSet {
        let mut set = ShapeSet::default();
        let points = (0..len).map(|i| Vec3::new(i as f32, 1.0, 0.0)).collect();
        set.insert(ShapeKey::Finger(3), Shape::new(points));
        set
    }

    #[test]
    fn test_buffers_are_flat_3n() {
        let f = field(100);
        assert_eq!(f.position_buffer().len(), 300);
        assert_eq!(f.color_buffer().len(), 300);
        assert_eq!(f.position_bytes().len(), 1200);
        assert!(f.color_buffer().iter().all(|c| (0.0..=1.0).contains(c)));
        assert!(f
            .positions()
            .iter()
            .all(|p| p.abs().max_element() <= START_EXTENT / 2.0));
    }

    #[test]
    fn test_smoothing_converges() {
        for alpha in [0.01, 0.05, 0.5, 0.99] {
            let target = Vec3::new(3.0, -7.0, 11.0);
            let mut current = Vec3::new(-50.0, 20.0, 0.0);
            let mut last = current.distance(target);
            for _ in 0..200 {
                current = smooth_toward(current, target, alpha);
                let d = current.distance(target);
                if last > 1e-3 {
                    assert!(d < last, "alpha {} stalled at {}", alpha, d);
                }
                last = d;
            }
            if alpha >= 0.05 {
                assert!(last < 1e-2);
            }
        }
    }

    #[test]
    fn test_cyclic_fill_wraps_index() {
        let mut f = field(10);
        let mut set = ShapeSet::default();
        set.insert(
            ShapeKey::Vortex,
            Shape::new(vec![
                Vec3::new(100.0, 0.0, 1.0),
                Vec3::new(0.0, 100.0, 2.0),
                Vec3::new(-100.0, 0.0, 3.0),
            ]),
        );
        let mode = ModeDescriptor::for_gesture(GestureState::FaceReveal);
        // long after the reveal started: targets sit exactly on the shape depth
        f.update_targets(&mode, &set, 10.0, 0.0);
        for (i, t) in f.targets().iter().enumerate() {
            let expected_z = (i % 3) as f32 + 1.0;
            assert!((t.z - expected_z).abs() < 1e-4, "particle {}", i);
        }
    }

    #[test]
    fn test_overflow_particles_are_scattered() {
        let mut f = field(50);
        let set = text_like_set(20);
        let mode = ModeDescriptor::for_gesture(GestureState::Finger(3));
        f.update_targets(&mode, &set, 1.0, 0.0);

        for (i, t) in f.targets().iter().enumerate() {
            if i < 20 {
                assert!((t.x - i as f32).abs() <= 0.05 + 1e-6);
                assert!((t.y - 1.0).abs() <= 0.05 + 1e-6);
                assert_eq!(t.z, 0.0);
            } else {
                assert_eq!(t.z, SCATTER_DEPTH);
                assert!(t.x.abs() <= SCATTER_EXTENT / 2.0);
                assert!(t.y.abs() <= SCATTER_EXTENT / 2.0);
            }
        }
    }

    #[test]
    fn test_overflow_scatter_is_recomputed_each_tick() {
        let mut f = field(50);
        let set = text_like_set(20);
        let mode = ModeDescriptor::for_gesture(GestureState::Finger(3));
        f.update_targets(&mode, &set, 1.0, 0.0);
        let first = f.targets()[20..].to_vec();
        f.update_targets(&mode, &set, 1.0, 0.0);
        assert_ne!(first, f.targets()[20..].to_vec());
    }

    #[test]
    fn test_double_love_scatters_overflow() {
        let mut f = field(60);
        let mut set = ShapeSet::default();
        let points = (0..25).map(|i| Vec3::new(i as f32, -2.0, 0.0)).collect();
        set.insert(ShapeKey::SpecialLove, Shape::new(points));

        let mode = ModeDescriptor::for_gesture(GestureState::DoubleLove);
        f.update_targets(&mode, &set, 2.0, 0.0);

        for (i, t) in f.targets().iter().enumerate() {
            if i < 25 {
                assert!((t.x - i as f32).abs() <= 0.05 + 1e-6);
                assert!((t.y + 2.0).abs() <= 0.05 + 1e-6);
            } else {
                assert_eq!(t.z, SCATTER_DEPTH);
            }
        }
    }

    #[test]
    fn test_pinch_follows_photo_frame_cyclically() {
        let mut f = field(9);
        let mut set = ShapeSet::default();
        set.insert(
            ShapeKey::PhotoFrame,
            Shape::new(vec![Vec3::new(40.0, 40.0, 0.0), Vec3::new(-40.0, -40.0, 0.0)]),
        );

        let mode = ModeDescriptor::for_gesture(GestureState::Pinch);
        f.update_targets(&mode, &set, 0.75, 0.0);

        // no particle is scattered; each stays within the pulse of its frame point
        for (i, t) in f.targets().iter().enumerate() {
            let corner = if i % 2 == 0 { 40.0 } else { -40.0 };
            assert!((t.x - corner).abs() <= 1.5 + 1e-4, "particle {}", i);
            assert!((t.y - corner).abs() <= 0.6 + 1e-4, "particle {}", i);
            assert!(t.z.abs() <= 3.0 + 1e-4);
        }
    }

    #[test]
    fn test_missing_shape_is_a_no_op() {
        let mut f = field(30);
        let before = f.targets().to_vec();
        let mode = ModeDescriptor::for_gesture(GestureState::Finger(9));
        f.update_targets(&mode, &text_like_set(5), 1.0, 0.0);
        assert_eq!(before, f.targets());

        let mut empty = ShapeSet::default();
        empty.insert(ShapeKey::Finger(9), Shape::new(vec![]));
        f.update_targets(&mode, &empty, 1.0, 0.0);
        assert_eq!(before, f.targets());
    }

    #[test]
    fn test_fist_needs_no_shape() {
        let mut f = field(30);
        let mode = ModeDescriptor::for_gesture(GestureState::Fist);
        f.update_targets(&mode, &ShapeSet::default(), 0.5, 0.0);
        assert!(f.targets().iter().all(|t| t.truncate().length() <= 5.0 + 1e-4));
    }

    #[test]
    fn test_colors_survive_updates() {
        let mut f = field(40);
        let colors = f.color_buffer().to_vec();
        let mode = ModeDescriptor::for_gesture(GestureState::Fist);
        for _ in 0..5 {
            f.update_targets(&mode, &ShapeSet::default(), 0.5, 0.0);
            f.smooth();
        }
        assert_eq!(colors, f.color_buffer());
    }

    #[test]
    fn test_redraw_flag() {
        let mut f = field(5);
        assert!(f.take_needs_redraw());
        assert!(!f.take_needs_redraw());
        f.smooth();
        assert!(f.take_needs_redraw());
    }
}
