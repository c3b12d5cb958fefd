//! Curl-based template matcher.
//!
//! Estimates how bent each digit is from the angle at its middle joint and
//! which way it points, then scores a fixed set of gesture descriptions
//! against those observations.

use glam::Vec3;

use crate::gesture::{TemplateMatch, TemplateMatcher};
use crate::landmarks::*;

/// Joint angle (degrees) above which a digit is straight
const NO_CURL_START_LIMIT: f32 = 130.0;
/// Joint angle (degrees) above which a digit is half bent
const HALF_CURL_START_LIMIT: f32 = 60.0;
/// Minimum score for a description to be reported at all
pub const MIN_SCORE: f32 = 7.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// (base, middle, tip) landmarks the curl angle is measured on
    fn joints(&self) -> (usize, usize, usize) {
        match self {
            Finger::Thumb => (THUMB_MCP, THUMB_IP, THUMB_TIP),
            Finger::Index => (INDEX_MCP, INDEX_PIP, INDEX_TIP),
            Finger::Middle => (MIDDLE_MCP, MIDDLE_PIP, MIDDLE_TIP),
            Finger::Ring => (RING_MCP, RING_PIP, RING_TIP),
            Finger::Pinky => (PINKY_MCP, PINKY_PIP, PINKY_TIP),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curl {
    NoCurl,
    HalfCurl,
    FullCurl,
}

/// Curl of one digit from the angle between its two segments at the middle
/// joint; a straight digit measures 180°.
pub fn estimate_curl(landmarks: &[Vec3; LANDMARK_COUNT], finger: Finger) -> Curl {
    let (base, mid, tip) = finger.joints();
    let to_base = landmarks[base] - landmarks[mid];
    let to_tip = landmarks[tip] - landmarks[mid];

    let angle = to_base.angle_between(to_tip).to_degrees();
    if angle.is_nan() || angle > NO_CURL_START_LIMIT {
        Curl::NoCurl
    } else if angle > HALF_CURL_START_LIMIT {
        Curl::HalfCurl
    } else {
        Curl::FullCurl
    }
}

/// Coarse pointing direction of a digit in image space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    VerticalUp,
    VerticalDown,
    HorizontalLeft,
    HorizontalRight,
}

/// Direction from the digit's base to its tip, snapped to the nearest axis
pub fn estimate_direction(landmarks: &[Vec3; LANDMARK_COUNT], finger: Finger) -> Direction {
    let (base, _, tip) = finger.joints();
    let d = landmarks[tip] - landmarks[base];

    if d.y.abs() >= d.x.abs() {
        if d.y < 0.0 {
            Direction::VerticalUp
        } else {
            Direction::VerticalDown
        }
    } else if d.x < 0.0 {
        Direction::HorizontalLeft
    } else {
        Direction::HorizontalRight
    }
}

/// A named set of expected curls and directions with their weights
#[derive(Debug, Clone)]
pub struct GestureDescription {
    pub name: &'static str,
    pub curls: Vec<(Finger, Curl, f32)>,
    pub directions: Vec<(Finger, Direction, f32)>,
}

impl GestureDescription {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            curls: Vec::new(),
            directions: Vec::new(),
        }
    }

    pub fn add_curl(mut self, finger: Finger, curl: Curl, weight: f32) -> Self {
        self.curls.push((finger, curl, weight));
        self
    }

    pub fn add_direction(mut self, finger: Finger, direction: Direction, weight: f32) -> Self {
        self.directions.push((finger, direction, weight));
        self
    }

    /// 0..10: share of the total weight whose expectation was observed
    pub fn score(&self, curls: &[Curl; 5], directions: &[Direction; 5]) -> f32 {
        let total: f32 = self.curls.iter().map(|(_, _, w)| w).sum::<f32>()
            + self.directions.iter().map(|(_, _, w)| w).sum::<f32>();
        if total <= 0.0 {
            return 0.0;
        }
        let curl_matched: f32 = self
            .curls
            .iter()
            .filter(|(finger, curl, _)| curls[*finger as usize] == *curl)
            .map(|(_, _, w)| w)
            .sum();
        let direction_matched: f32 = self
            .directions
            .iter()
            .filter(|(finger, direction, _)| directions[*finger as usize] == *direction)
            .map(|(_, _, w)| w)
            .sum();
        (curl_matched + direction_matched) / total * 10.0
    }
}

/// Descriptions for one to five fingers, fist and pinch
pub fn default_descriptions() -> Vec<GestureDescription> {
    use Curl::*;
    use Direction::*;
    use Finger::*;

    vec![
        GestureDescription::new("one_finger")
            .add_curl(Index, NoCurl, 1.0)
            .add_direction(Index, VerticalUp, 0.7)
            .add_curl(Middle, FullCurl, 1.0)
            .add_curl(Ring, FullCurl, 1.0)
            .add_curl(Pinky, FullCurl, 1.0),
        GestureDescription::new("two_finger")
            .add_curl(Index, NoCurl, 1.0)
            .add_curl(Middle, NoCurl, 1.0)
            .add_curl(Ring, FullCurl, 1.0)
            .add_curl(Pinky, FullCurl, 1.0),
        GestureDescription::new("three_finger")
            .add_curl(Index, NoCurl, 1.0)
            .add_curl(Middle, NoCurl, 1.0)
            .add_curl(Ring, NoCurl, 1.0)
            .add_curl(Pinky, FullCurl, 1.0),
        GestureDescription::new("four_finger")
            .add_curl(Index, NoCurl, 1.0)
            .add_curl(Middle, NoCurl, 1.0)
            .add_curl(Ring, NoCurl, 1.0)
            .add_curl(Pinky, NoCurl, 1.0)
            .add_curl(Thumb, HalfCurl, 0.5),
        GestureDescription::new("five_finger")
            .add_curl(Thumb, NoCurl, 1.0)
            .add_curl(Index, NoCurl, 1.0)
            .add_curl(Middle, NoCurl, 1.0)
            .add_curl(Ring, NoCurl, 1.0)
            .add_curl(Pinky, NoCurl, 1.0),
        GestureDescription::new("fist")
            .add_curl(Thumb, FullCurl, 1.0)
            .add_curl(Index, FullCurl, 1.0)
            .add_curl(Middle, FullCurl, 1.0)
            .add_curl(Ring, FullCurl, 1.0)
            .add_curl(Pinky, FullCurl, 1.0),
        GestureDescription::new("pinch")
            .add_curl(Thumb, NoCurl, 0.8)
            .add_curl(Index, HalfCurl, 0.8)
            .add_curl(Middle, FullCurl, 1.0)
            .add_curl(Ring, FullCurl, 1.0)
            .add_curl(Pinky, FullCurl, 1.0),
    ]
}

pub struct CurlTemplateMatcher {
    descriptions: Vec<GestureDescription>,
    min_score: f32,
}

impl Default for CurlTemplateMatcher {
    fn default() -> Self {
        Self {
            descriptions: default_descriptions(),
            min_score: MIN_SCORE,
        }
    }
}

impl CurlTemplateMatcher {
    pub fn new(descriptions: Vec<GestureDescription>, min_score: f32) -> Self {
        Self {
            descriptions,
            min_score,
        }
    }
}

impl TemplateMatcher for CurlTemplateMatcher {
    fn try_classify(&self, landmarks: &[Vec3; LANDMARK_COUNT]) -> Option<TemplateMatch> {
        let curls = Finger::ALL.map(|finger| estimate_curl(landmarks, finger));
        let directions = Finger::ALL.map(|finger| estimate_direction(landmarks, finger));

        self.descriptions
            .iter()
            .map(|d| (d.name, d.score(&curls, &directions)))
            .filter(|&(_, score)| score >= self.min_score)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(name, score)| TemplateMatch {
                name: name.to_string(),
                score,
            })
    }
}
