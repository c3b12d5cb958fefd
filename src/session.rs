//! Animation state machine and the session that owns everything a frame touches.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SwarmConfig;
use crate::gesture::{GestureClassifier, GestureState, NoTemplateMatcher, TemplateMatcher};
use crate::landmarks::Landmark;
use crate::messages::label_for;
use crate::modes::ModeDescriptor;
use crate::particle_system::ParticleField;
use crate::shape_library::{ShapeLibrary, ShapeSet};

/// Current gesture plus the animation clock. The clock counts ticks and
/// derives time as `ticks * tick_increment`, so it never stalls.
#[derive(Debug, Clone)]
pub struct AnimationStateMachine {
    state: GestureState,
    ticks: u64,
    reveal_tick: u64,
    ticks_in_state: u64,
    tick_increment: f64,
    min_dwell_ticks: u32,
}

impl AnimationStateMachine {
    pub fn new(tick_increment: f64, min_dwell_ticks: u32) -> Self {
        Self {
            state: GestureState::Idle,
            ticks: 0,
            reveal_tick: 0,
            ticks_in_state: 0,
            tick_increment,
            min_dwell_ticks,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn time(&self) -> f64 {
        self.ticks as f64 * self.tick_increment
    }

    pub fn reveal_start(&self) -> f64 {
        self.reveal_tick as f64 * self.tick_increment
    }

    pub fn advance(&mut self) {
        self.ticks += 1;
        self.ticks_in_state += 1;
    }

    /// Switch to `next`. Entering the face reveal stamps the reveal start.
    /// Returns true when the state changed.
    pub fn apply(&mut self, next: GestureState) -> bool {
        if next == self.state {
            return false;
        }
        if self.ticks_in_state < self.min_dwell_ticks as u64 {
            debug!("Holding {} (dwell), ignoring {}", self.state, next);
            return false;
        }

        if next == GestureState::FaceReveal {
            self.reveal_tick = self.ticks;
        }
        self.state = next;
        self.ticks_in_state = 0;
        true
    }
}

/// The one owned object a host drives: shapes, particles, gesture state and
/// classifier. Both host callbacks take `&mut self` and run to completion.
pub struct AnimationSession {
    shapes: ShapeSet,
    field: ParticleField,
    machine: AnimationStateMachine,
    classifier: GestureClassifier,
}

impl AnimationSession {
    /// Generate all shapes and the particle field. Blocking, done once.
    pub fn new(config: &SwarmConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_rng(config: &SwarmConfig, mut rng: StdRng) -> Self {
        let shapes = ShapeLibrary::new(config.particle_count, config.text_sample_stride)
            .generate_all(&mut rng);
        Self::with_shapes(config, shapes, rng)
    }

    /// Session over a prebuilt shape set
    pub fn with_shapes(config: &SwarmConfig, shapes: ShapeSet, rng: StdRng) -> Self {
        let field =
            ParticleField::with_rng(config.particle_count, &config.colors, config.smoothing, rng);
        info!("✨ Swarm ready: {} particles", field.len());

        Self {
            shapes,
            field,
            machine: AnimationStateMachine::new(config.tick_increment, config.min_dwell_ticks),
            classifier: GestureClassifier::new(
                Box::new(NoTemplateMatcher),
                config.template_acceptance,
            ),
        }
    }

    pub fn set_template_matcher(&mut self, matcher: Box<dyn TemplateMatcher>) {
        self.classifier.set_matcher(matcher);
    }

    /// Tracking callback: classify the hands and update the gesture state
    pub fn on_tracking_update(&mut self, hands: &[Vec<Landmark>]) -> GestureState {
        let gesture = self.classifier.classify(hands);
        if self.machine.apply(gesture) {
            info!("👋 {} ({})", gesture, label_for(gesture));
        }
        self.machine.state()
    }

    /// Render callback: advance the clock, retarget and smooth every particle
    pub fn tick(&mut self) {
        self.machine.advance();
        let mode = ModeDescriptor::for_gesture(self.machine.state());
        self.field.update_targets(
            &mode,
            &self.shapes,
            self.machine.time(),
            self.machine.reveal_start(),
        );
        self.field.smooth();
    }

    pub fn gesture(&self) -> GestureState {
        self.machine.state()
    }

    pub fn machine(&self) -> &AnimationStateMachine {
        &self.machine
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn shapes(&self) -> &ShapeSet {
        &self.shapes
    }

    pub fn positions(&self) -> &[f32] {
        self.field.position_buffer()
    }

    pub fn colors(&self) -> &[f32] {
        self.field.color_buffer()
    }

    pub fn take_needs_redraw(&mut self) -> bool {
        self.field.take_needs_redraw()
    }

    /// Mean distance between particles and their targets
    pub fn mean_target_distance(&self) -> f32 {
        let field = &self.field;
        if field.is_empty() {
            return 0.0;
        }
        let total: f32 = field
            .positions()
            .iter()
            .zip(field.targets())
            .map(|(p, t)| p.distance(*t))
            .sum();
        total / field.len() as f32
    }
}
