//! # lipsync-rs
//!
//! A Rust library that turns text into timed mouth-shape ("viseme") animation.
//!
//! ## Features
//!
//! - **Viseme table**: fixed letter-to-pose mapping, or a custom one loaded from JSON
//! - **Sequence builder**: collapses repeated poses and inserts an idle reset between them
//! - **Threaded player**: plays a sequence in strict order, newest request wins
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! lipsync-rs = "2026.10"
//! ```
//!
//! ```rust
//! use lipsync_rs::engines::lipsync::{LipSyncEngine, PlaybackRequest};
//!
//! let engine = LipSyncEngine::new();
//! let sequence = engine.animate(&PlaybackRequest::new("Hello"));
//! assert_eq!(sequence.len(), 6);
//! println!("{:.2}s of animation", sequence.total_duration_secs());
//! ```

pub mod engines;

use std::path::Path;

use serde::{Deserialize, Serialize};

use engines::lipsync::{LipSyncError, IDLE_VISEME};

/// A single timed display event: show `viseme_id` for `duration` seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationEvent {
    /// Pose identifier, resolved to an image by the renderer
    pub viseme_id: String,
    /// Display time in seconds
    pub duration: f64,
}

impl AnimationEvent {
    pub fn new(viseme_id: impl Into<String>, duration: f64) -> Self {
        Self {
            viseme_id: viseme_id.into(),
            duration,
        }
    }

    /// Whether this event shows the neutral rest pose.
    pub fn is_idle(&self) -> bool {
        self.viseme_id == IDLE_VISEME
    }
}

/// The result of sequencing a piece of text.
///
/// Events are ordered and must be played back one after another.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimationSequence {
    events: Vec<AnimationEvent>,
}

impl AnimationSequence {
    pub fn new(events: Vec<AnimationEvent>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[AnimationEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<AnimationEvent> {
        self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// An empty sequence means there is nothing to animate.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Total playback time in seconds.
    pub fn total_duration_secs(&self) -> f64 {
        self.events.iter().map(|e| e.duration).sum()
    }

    /// Start offset (in seconds from the beginning) of every event.
    ///
    /// Useful for renderers that schedule poses on an absolute clock rather
    /// than waiting between them.
    pub fn keyframes(&self) -> Vec<(f64, &str)> {
        let mut offset = 0.0;
        self.events
            .iter()
            .map(|e| {
                let start = offset;
                offset += e.duration;
                (start, e.viseme_id.as_str())
            })
            .collect()
    }

    /// Serialize the events as a JSON array.
    pub fn to_json(&self) -> Result<String, LipSyncError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the events to a JSON file for an external renderer.
    pub fn write_json(&self, path: &Path) -> Result<(), LipSyncError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Common interface for anything that turns an [`AnimationSequence`] into
/// visible pose changes.
///
/// Implementations must show events strictly in order, never starting an
/// event before the previous one's duration has elapsed. Calling `play`
/// while a sequence is still running replaces it.
pub trait PlaybackDriver {
    /// Start playing `sequence`, cancelling whatever is currently playing.
    fn play(&mut self, sequence: &AnimationSequence);

    /// Cancel the current sequence, if any.
    fn stop(&mut self);
}
