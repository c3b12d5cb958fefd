//! Hand landmark storage
//!
//! A tracked hand arrives as 21 normalized keypoints in the usual anatomical
//! order (wrist, then four joints per digit from base to tip). x and y are in
//! 0..1 with y growing downwards; z is a relative depth.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::{DEPTH_SCALE, VIDEO_HEIGHT, VIDEO_WIDTH};
use crate::error::ObservationError;

// ============================================================================
// HAND LANDMARK INDICES
// ============================================================================

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

pub const LANDMARK_COUNT: usize = 21;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Image-plane position, depth dropped
    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// One tracked hand for one update. Only constructible with exactly 21
/// finite landmarks.
#[derive(Debug, Clone, PartialEq)]
pub struct HandObservation {
    landmarks: [Landmark; LANDMARK_COUNT],
}

impl HandObservation {
    pub fn get(&self, index: usize) -> Landmark {
        self.landmarks[index]
    }

    /// Landmarks rescaled to the 640x480 pixel space template matchers work in
    pub fn to_pixel_space(&self) -> [Vec3; LANDMARK_COUNT] {
        self.landmarks
            .map(|lm| Vec3::new(lm.x * VIDEO_WIDTH, lm.y * VIDEO_HEIGHT, lm.z * DEPTH_SCALE))
    }
}

impl TryFrom<&[Landmark]> for HandObservation {
    type Error = ObservationError;

    fn try_from(raw: &[Landmark]) -> Result<Self, Self::Error> {
        let landmarks: [Landmark; LANDMARK_COUNT] = raw
            .try_into()
            .map_err(|_| ObservationError::LandmarkCount(raw.len()))?;

        if let Some(index) = landmarks.iter().position(|lm| !lm.is_finite()) {
            return Err(ObservationError::NonFinite { index });
        }

        Ok(Self { landmarks })
    }
}
