//! Lip-sync engines.
//!
//! This module contains the text-to-viseme sequencing engine.
//!
//! # Features
//!
//! - `player` (default) - threaded playback driver for built sequences
pub mod lipsync;
