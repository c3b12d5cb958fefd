use glam::Vec3;
use log::info;
use rand::Rng;
use std::collections::HashMap;
use std::f32::consts::TAU;
use std::fmt;

use crate::messages::{FingerMessage, FINGER_MESSAGES, SPECIAL_LOVE};
use crate::text_canvas;

// Vortex
const VORTEX_TURNS: f32 = 10.0;
const VORTEX_MIN_RADIUS: f32 = 160.0;
const VORTEX_RADIUS_SPAN: f32 = 100.0;
const VORTEX_DEPTH: f32 = 50.0;

// Christmas tree
const TREE_HEIGHT: f32 = 80.0;
const TREE_BASE_WIDTH: f32 = 50.0;
const TREE_LAYERS: u32 = 5;
const TREE_TAPER: f32 = 0.7;
const TRUNK_POINTS: usize = 500;
const STAR_POINTS: usize = 300;

// Photo frame
const FRAME_SIZE: f32 = 40.0;
const FRAME_THICKNESS: f32 = 8.0;
const FRAME_EDGE_SHARE: f32 = 0.7;

/// Stable identifier of a generated shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKey {
    Vortex,
    ChristmasTree,
    PhotoFrame,
    SpecialLove,
    Finger(u8),
}

impl fmt::Display for ShapeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vortex => f.write_str("vortex"),
            Self::ChristmasTree => f.write_str("christmasTree"),
            Self::PhotoFrame => f.write_str("photoFrame"),
            Self::SpecialLove => f.write_str("specialLove"),
            Self::Finger(n) => write!(f, "finger_{}", n),
        }
    }
}

/// Named, ordered point cloud. Immutable once generated.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    points: Vec<Vec3>,
}

impl Shape {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.points.get(index).copied()
    }

    /// Point for particle `i`, wrapping with `i mod len`
    pub fn cyclic(&self, i: usize) -> Option<Vec3> {
        if self.points.is_empty() {
            return None;
        }
        Some(self.points[i % self.points.len()])
    }
}

/// Every shape the swarm can form, keyed by [`ShapeKey`]
#[derive(Debug, Clone, Default)]
pub struct ShapeSet {
    shapes: HashMap<ShapeKey, Shape>,
}

impl ShapeSet {
    pub fn insert(&mut self, key: ShapeKey, shape: Shape) {
        self.shapes.insert(key, shape);
    }

    pub fn get(&self, key: ShapeKey) -> Option<&Shape> {
        self.shapes.get(&key)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ShapeKey, &Shape)> {
        self.shapes.iter()
    }
}

/// Generates the target point clouds
pub struct ShapeLibrary {
    point_count: usize,
    text_stride: usize,
}

impl ShapeLibrary {
    pub fn new(point_count: usize, text_stride: usize) -> Self {
        Self {
            point_count,
            text_stride,
        }
    }

    /// Build every procedural shape plus one text shape per message
    pub fn generate_all<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeSet {
        let mut set = ShapeSet::default();
        let n = self.point_count;

        set.insert(ShapeKey::Vortex, vortex_shape(n, rng));
        set.insert(ShapeKey::ChristmasTree, christmas_tree_shape(n, rng));
        set.insert(ShapeKey::PhotoFrame, photo_frame_shape(n, rng));
        set.insert(ShapeKey::SpecialLove, self.message_shape(&SPECIAL_LOVE));

        for (i, message) in FINGER_MESSAGES.iter().enumerate() {
            set.insert(ShapeKey::Finger(i as u8 + 1), self.message_shape(message));
        }

        for (key, shape) in set.iter() {
            info!("🎨 Shape {} ready: {} points", key, shape.len());
        }
        set
    }

    pub fn message_shape(&self, message: &FingerMessage) -> Shape {
        text_shape(message.lines, message.font_size, self.text_stride)
    }
}

/// Rasterized text as a flat point cloud at z = 0, in raster order
pub fn text_shape<S: AsRef<str>>(lines: &[S], font_size: u32, stride: usize) -> Shape {
    Shape::new(text_canvas::rasterize(lines, font_size, stride))
}

/// 10-turn spiral with random radius and depth per point
pub fn vortex_shape<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Shape {
    let points = (0..count)
        .map(|i| {
            let angle = (i as f32 / count as f32) * TAU * VORTEX_TURNS;
            let radius = VORTEX_MIN_RADIUS + rng.gen::<f32>() * VORTEX_RADIUS_SPAN;
            Vec3::new(
                angle.cos() * radius,
                angle.sin() * radius,
                (rng.gen::<f32>() - 0.5) * VORTEX_DEPTH,
            )
        })
        .collect();

    Shape::new(points)
}

/// Layered cone with branch noise. The first 500 points are the trunk and
/// the next 300 the star above the apex.
pub fn christmas_tree_shape<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Shape {
    let layers = TREE_LAYERS as f32;

    let mut points: Vec<Vec3> = (0..count)
        .map(|_| {
            let layer = rng.gen_range(0..TREE_LAYERS) as f32;
            let layer_y = TREE_HEIGHT / 2.0 - (layer / layers) * TREE_HEIGHT;
            let layer_width = TREE_BASE_WIDTH * (1.0 - layer / layers * TREE_TAPER);

            let angle = rng.gen::<f32>() * TAU;
            let r = rng.gen::<f32>() * layer_width;
            let branch_noise = (angle * 8.0 + layer * 2.0).sin() * 5.0;

            Vec3::new(
                angle.cos() * (r + branch_noise),
                layer_y + (rng.gen::<f32>() - 0.5) * 10.0,
                angle.sin() * (r + branch_noise),
            )
        })
        .collect();

    for p in points.iter_mut().take(TRUNK_POINTS) {
        *p = Vec3::new(
            (rng.gen::<f32>() - 0.5) * 8.0,
            -TREE_HEIGHT / 2.0 - rng.gen::<f32>() * 15.0,
            (rng.gen::<f32>() - 0.5) * 8.0,
        );
    }

    for (i, p) in points
        .iter_mut()
        .enumerate()
        .skip(TRUNK_POINTS)
        .take(STAR_POINTS)
    {
        let angle = (i as f32 / 50.0) * TAU;
        let r = 3.0 + (angle * 5.0).sin() * 2.0;
        *p = Vec3::new(angle.cos() * r, TREE_HEIGHT / 2.0 + 8.0, angle.sin() * r);
    }

    Shape::new(points)
}

/// Square frame (70% of points) with a loose halo around it
pub fn photo_frame_shape<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Shape {
    let edge_points = count as f32 * FRAME_EDGE_SHARE;

    let points = (0..count)
        .map(|i| {
            let t = i as f32 / count as f32;

            if (i as f32) < edge_points {
                let side = (t * 4.0).floor() as u32 % 4;
                let pos = (t * 4.0) % 1.0;
                let span = pos * FRAME_SIZE * 2.0;

                let (x, y) = match side {
                    0 => (-FRAME_SIZE + span, -FRAME_SIZE),
                    1 => (FRAME_SIZE, -FRAME_SIZE + span),
                    2 => (FRAME_SIZE - span, FRAME_SIZE),
                    _ => (-FRAME_SIZE, FRAME_SIZE - span),
                };

                let sparkle = (i as f32 * 0.5).sin() * 3.0;
                Vec3::new(
                    x + (rng.gen::<f32>() - 0.5) * FRAME_THICKNESS,
                    y + (rng.gen::<f32>() - 0.5) * FRAME_THICKNESS,
                    (rng.gen::<f32>() - 0.5) * 10.0 + sparkle,
                )
            } else {
                let angle = rng.gen::<f32>() * TAU;
                let r = FRAME_SIZE + 20.0 + rng.gen::<f32>() * 40.0;
                Vec3::new(
                    angle.cos() * r,
                    angle.sin() * r,
                    (rng.gen::<f32>() - 0.5) * 30.0,
                )
            }
        })
        .collect();

    Shape::new(points)
}

/// Radius of a point in the xy plane
pub fn planar_radius(p: Vec3) -> f32 {
    p.x.hypot(p.y)
}

/// Angle of a point in the xy plane
pub fn planar_angle(p: Vec3) -> f32 {
    p.y.atan2(p.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn assert_finite(shape: &Shape) {
        assert!(!shape.is_empty());
        assert!(shape.points().iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_all_shapes_are_non_empty_and_finite() {
        let set = ShapeLibrary::new(2_000, 3).generate_all(&mut rng());
        assert_eq!(set.len(), 14);
        for (key, shape) in set.iter() {
            assert!(!shape.is_empty(), "{} is empty", key);
            assert_finite(shape);
        }
    }

    #[test]
    fn test_text_shape_is_deterministic() {
        let a = text_shape(&["HAII", "SAYANGGG"], 180, 3);
        let b = text_shape(&["HAII", "SAYANGGG"], 180, 3);
        assert_eq!(a, b);
        let c = text_shape(&["HAIL", "SAYANGGG"], 180, 3);
        assert_ne!(a, c);
    }

    #[test]
    fn test_vortex_ring_bounds() {
        let shape = vortex_shape(5_000, &mut rng());
        assert_eq!(shape.len(), 5_000);
        for p in shape.points() {
            let r = planar_radius(*p);
            assert!(r >= 159.99 && r < 260.01, "radius {}", r);
            assert!(p.z >= -25.0 && p.z < 25.0);
        }
    }

    #[test]
    fn test_tree_reserves_trunk_and_star() {
        let shape = christmas_tree_shape(3_000, &mut rng());
        let pts = shape.points();
        for p in &pts[..TRUNK_POINTS] {
            assert!(p.y <= -TREE_HEIGHT / 2.0);
            assert!(p.x.abs() <= 4.0 && p.z.abs() <= 4.0);
        }
        for p in &pts[TRUNK_POINTS..TRUNK_POINTS + STAR_POINTS] {
            assert_eq!(p.y, TREE_HEIGHT / 2.0 + 8.0);
            assert!(p.x.hypot(p.z) <= 5.0 + 1e-4);
        }
        // cone points sit between the trunk and the star
        for p in &pts[TRUNK_POINTS + STAR_POINTS..] {
            assert!(p.y > -TREE_HEIGHT / 2.0 - 5.0 && p.y < TREE_HEIGHT / 2.0 + 5.0 + 1e-4);
        }
    }

    #[test]
    fn test_small_tree_keeps_length() {
        let shape = christmas_tree_shape(100, &mut rng());
        assert_eq!(shape.len(), 100);
        assert_finite(&shape);
    }

    #[test]
    fn test_photo_frame_split() {
        let count = 1_000;
        let shape = photo_frame_shape(count, &mut rng());
        for (i, p) in shape.points().iter().enumerate() {
            if i < 700 {
                // on one of the four edges, within thickness
                let edge = (p.x.abs() - FRAME_SIZE).abs().min((p.y.abs() - FRAME_SIZE).abs());
                assert!(edge <= FRAME_THICKNESS / 2.0 + 1e-3, "point {} off frame", i);
            } else {
                let r = planar_radius(*p);
                assert!(r >= FRAME_SIZE + 20.0 - 1e-3 && r <= FRAME_SIZE + 60.0 + 1e-3);
            }
        }
    }

    #[test]
    fn test_cyclic_lookup() {
        let shape = Shape::new(vec![Vec3::X, Vec3::Y, Vec3::Z]);
        assert_eq!(shape.cyclic(4), Some(Vec3::Y));
        assert_eq!(Shape::new(vec![]).cyclic(0), None);
    }

    #[test]
    fn test_shape_names() {
        assert_eq!(ShapeKey::Finger(7).to_string(), "finger_7");
        assert_eq!(ShapeKey::ChristmasTree.to_string(), "christmasTree");
    }
}
