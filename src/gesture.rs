//! Gesture recognition from hand landmarks.
//!
//! Turns the hands seen in one tracking update into a single
//! [`GestureState`]. Two-hand composites are checked before single-hand
//! gestures, and those before the generic finger count, so a heart or a pair
//! of peace signs is never swallowed by the count.

use glam::Vec3;
use log::{debug, warn};
use std::fmt;

use crate::config::TEMPLATE_ACCEPTANCE;
use crate::landmarks::*;

/// Thumb-to-index tip distance below which a hand is pinching
pub const PINCH_THRESHOLD: f32 = 0.08;
/// Both tip pairs must be closer than this for a two-hand heart
pub const HEART_THRESHOLD: f32 = 0.15;
/// Thumb counts as extended when its tip is this much further out than the IP joint
pub const THUMB_EXTENSION_RATIO: f32 = 1.1;
pub const MAX_FINGERS: u8 = 10;

// ── Gesture states ─────────────────────────────────────────

/// The discrete state driving which shape the swarm forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Fist,
    Pinch,
    FaceReveal,
    DoubleLove,
    /// 1..=10 extended fingers
    Finger(u8),
}

impl GestureState {
    /// Finger-count state, `None` outside 1..=10
    pub fn finger(count: u8) -> Option<Self> {
        (1..=MAX_FINGERS).contains(&count).then_some(Self::Finger(count))
    }

    /// Stable name, e.g. `finger_7`
    pub fn name(&self) -> String {
        match self {
            Self::Idle => "idle".to_string(),
            Self::Fist => "fist".to_string(),
            Self::Pinch => "pinch".to_string(),
            Self::FaceReveal => "face_reveal".to_string(),
            Self::DoubleLove => "double_love".to_string(),
            Self::Finger(n) => format!("finger_{}", n),
        }
    }
}

impl fmt::Display for GestureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

// ── Per-hand heuristics ────────────────────────────────────

/// Which digits of one hand are extended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerState {
    pub count: u8,
    pub thumb_up: bool,
    pub index_up: bool,
    pub middle_up: bool,
    pub ring_up: bool,
    pub pinky_up: bool,
}

impl FingerState {
    pub fn flags(&self) -> [bool; 5] {
        [
            self.thumb_up,
            self.index_up,
            self.middle_up,
            self.ring_up,
            self.pinky_up,
        ]
    }
}

/// Tip above (smaller y than) the PIP joint
fn is_up(hand: &HandObservation, tip: usize, base: usize) -> bool {
    hand.get(tip).y < hand.get(base).y
}

/// Count extended digits. Fingers are "up" when the tip is above the PIP
/// joint; the thumb moves sideways, so it is "up" when its tip sits further
/// from the wrist horizontally than the IP joint does, by a 10% margin.
pub fn finger_state(hand: &HandObservation) -> FingerState {
    let wrist = hand.get(WRIST);
    let thumb_tip_dist = (hand.get(THUMB_TIP).x - wrist.x).abs();
    let thumb_ip_dist = (hand.get(THUMB_IP).x - wrist.x).abs();

    let mut state = FingerState {
        count: 0,
        thumb_up: thumb_tip_dist > thumb_ip_dist * THUMB_EXTENSION_RATIO,
        index_up: is_up(hand, INDEX_TIP, INDEX_PIP),
        middle_up: is_up(hand, MIDDLE_TIP, MIDDLE_PIP),
        ring_up: is_up(hand, RING_TIP, RING_PIP),
        pinky_up: is_up(hand, PINKY_TIP, PINKY_PIP),
    };
    state.count = state.flags().iter().filter(|&&up| up).count() as u8;
    state
}

/// Thumb and index tips touching with the other three fingers curled
pub fn is_pinch(hand: &HandObservation) -> bool {
    let pinch_dist = hand.get(THUMB_TIP).xy().distance(hand.get(INDEX_TIP).xy());

    let others_down = [(MIDDLE_TIP, MIDDLE_PIP), (RING_TIP, RING_PIP), (PINKY_TIP, PINKY_PIP)]
        .iter()
        .all(|&(tip, base)| hand.get(tip).y > hand.get(base).y);

    pinch_dist < PINCH_THRESHOLD && others_down
}

/// Two hands with thumb tips together and index tips together
pub fn is_heart_shape(a: &HandObservation, b: &HandObservation) -> bool {
    let thumb_dist = a.get(THUMB_TIP).xy().distance(b.get(THUMB_TIP).xy());
    let index_dist = a.get(INDEX_TIP).xy().distance(b.get(INDEX_TIP).xy());

    thumb_dist < HEART_THRESHOLD && index_dist < HEART_THRESHOLD
}

/// Two peace signs
pub fn is_face_reveal(count_a: u8, count_b: u8) -> bool {
    count_a == 2 && count_b == 2
}

// ── Template matcher capability ────────────────────────────

/// Result of an external template match
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateMatch {
    pub name: String,
    /// 0..10, higher is more confident
    pub score: f32,
}

/// Higher-precision classifier consulted for single-hand frames. Receives the
/// landmarks already rescaled to pixel space.
pub trait TemplateMatcher {
    fn try_classify(&self, landmarks: &[Vec3; LANDMARK_COUNT]) -> Option<TemplateMatch>;
}

/// Stand-in used when no template matcher is available
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTemplateMatcher;

impl TemplateMatcher for NoTemplateMatcher {
    fn try_classify(&self, _landmarks: &[Vec3; LANDMARK_COUNT]) -> Option<TemplateMatch> {
        None
    }
}

/// Map matcher gesture names onto swarm states
pub fn map_template_name(name: &str) -> Option<GestureState> {
    match name {
        "one_finger" => Some(GestureState::Finger(1)),
        "two_finger" => Some(GestureState::Finger(2)),
        "three_finger" => Some(GestureState::Finger(3)),
        "four_finger" => Some(GestureState::Finger(4)),
        "five_finger" => Some(GestureState::Finger(5)),
        "fist" => Some(GestureState::Fist),
        "pinch" => Some(GestureState::Pinch),
        _ => None,
    }
}

// ── Classifier ─────────────────────────────────────────────

pub struct GestureClassifier {
    matcher: Box<dyn TemplateMatcher>,
    acceptance: f32,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(Box::new(NoTemplateMatcher), TEMPLATE_ACCEPTANCE)
    }
}

impl GestureClassifier {
    pub fn new(matcher: Box<dyn TemplateMatcher>, acceptance: f32) -> Self {
        Self {
            matcher,
            acceptance,
        }
    }

    pub fn set_matcher(&mut self, matcher: Box<dyn TemplateMatcher>) {
        self.matcher = matcher;
    }

    /// Classify the raw hands of one tracking update. Any malformed hand makes
    /// the whole update classify as idle.
    pub fn classify(&self, raw_hands: &[Vec<Landmark>]) -> GestureState {
        let hands: Result<Vec<HandObservation>, _> = raw_hands
            .iter()
            .map(|raw| HandObservation::try_from(raw.as_slice()))
            .collect();

        match hands {
            Ok(hands) => self.classify_hands(&hands),
            Err(e) => {
                warn!("Rejecting hand observation: {}", e);
                GestureState::Idle
            }
        }
    }

    /// Priority order, first match wins: two peace signs, heart, pinch,
    /// template match, summed finger count, and idle when nothing is tracked.
    pub fn classify_hands(&self, hands: &[HandObservation]) -> GestureState {
        if hands.is_empty() {
            return GestureState::Idle;
        }

        let states: Vec<FingerState> = hands.iter().map(finger_state).collect();

        if let [a, b, ..] = hands {
            if is_face_reveal(states[0].count, states[1].count) {
                return GestureState::FaceReveal;
            }
            if is_heart_shape(a, b) {
                return GestureState::DoubleLove;
            }
        }

        if let [hand] = hands {
            if is_pinch(hand) {
                return GestureState::Pinch;
            }

            if let Some(gesture) = self.template_gesture(hand) {
                return gesture;
            }
        }

        let total: u32 = states.iter().map(|s| s.count as u32).sum();
        let total = total.min(MAX_FINGERS as u32) as u8;
        debug!("{} hand(s), {} finger(s) up", hands.len(), total);

        GestureState::finger(total).unwrap_or(GestureState::Fist)
    }

    fn template_gesture(&self, hand: &HandObservation) -> Option<GestureState> {
        let found = self.matcher.try_classify(&hand.to_pixel_space())?;
        if found.score <= self.acceptance {
            debug!(
                "Template match '{}' ({:.2}) below acceptance",
                found.name, found.score
            );
            return None;
        }
        map_template_name(&found.name)
    }
}
