//! Recorded tracking updates for replaying a session without a camera.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ScriptError, SwarmError};
use crate::landmarks::Landmark;

fn one_tick() -> u32 {
    1
}

/// One tracking update followed by `ticks` render ticks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackingFrame {
    #[serde(default)]
    pub hands: Vec<Vec<Landmark>>,
    #[serde(default = "one_tick")]
    pub ticks: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct TrackingScript {
    pub frames: Vec<TrackingFrame>,
}

impl TrackingScript {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SwarmError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ScriptError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self, SwarmError> {
        serde_json::from_str(json).map_err(|e| ScriptError::Parse(e.to_string()).into())
    }

    /// A script of `ticks` render ticks with nobody in front of the camera
    pub fn idle(ticks: u32) -> Self {
        Self {
            frames: vec![TrackingFrame {
                hands: Vec::new(),
                ticks,
            }],
        }
    }

    pub fn total_ticks(&self) -> u64 {
        self.frames.iter().map(|f| f.ticks as u64).sum()
    }
}
