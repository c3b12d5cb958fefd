// Library exports for the gesture-driven particle swarm
pub mod config;
pub mod error;
pub mod gesture;
pub mod landmarks;
pub mod messages;
pub mod modes;
pub mod particle_system;
pub mod script;
pub mod session;
pub mod shape_library;
pub mod template;
pub mod text_canvas;

// Re-export main types
pub use config::SwarmConfig;
pub use error::{Result, SwarmError};
pub use gesture::{GestureClassifier, GestureState, TemplateMatcher};
pub use landmarks::{HandObservation, Landmark};
pub use particle_system::ParticleField;
pub use session::{AnimationSession, AnimationStateMachine};
pub use shape_library::{Shape, ShapeKey, ShapeLibrary, ShapeSet};
pub use template::CurlTemplateMatcher;
