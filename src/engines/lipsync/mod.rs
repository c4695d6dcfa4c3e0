//! Text-to-viseme lip-sync sequencing.
//!
//! Each recognized letter maps to a mouth pose ("viseme") with an intrinsic
//! display time. Building a sequence walks the uppercased text one grapheme
//! cluster at a time, drops clusters the table does not know (including
//! letters carrying combining marks), collapses consecutive letters that
//! resolve to the same pose, and follows every emitted pose with a short idle
//! reset.
//!
//! # Standard Table
//!
//! | Letters | Viseme | Seconds |
//! |---|---|---|
//! | `A` | `WideOpen` | 0.15 |
//! | `E`, `I`, `Y` | `Open` | 0.12 |
//! | `O` / `R` | `Rounded` | 0.15 / 0.12 |
//! | `U` / `W` | `Pucker` | 0.15 / 0.12 |
//! | `M`, `N` / `B`, `P` | `Closed` | 0.08 / 0.06 |
//! | `L` | `LTongue` | 0.10 |
//! | `F`, `V` | `TeethOnLip` | 0.12 |
//! | `S` / `T` | `Clenched` | 0.10 / 0.08 |
//! | `H` | `Idle` | 0.08 |
//!
//! The idle reset after each pose lasts 0.04 seconds. All durations are
//! scaled by the request's duration multiplier.
//!
//! # Custom Tables
//!
//! ```text
//! {
//!   "visemes": {
//!     "A": { "viseme": "WideOpen", "duration": 0.15 },
//!     "M": { "viseme": "Closed",   "duration": 0.08 }
//!   }
//! }
//! ```
//!
//! # Examples
//!
//! ## Emphasizing a single letter
//!
//! ```rust
//! use lipsync_rs::engines::lipsync::{LipSyncEngine, PlaybackRequest};
//!
//! let engine = LipSyncEngine::new();
//! let sequence = engine.animate(&PlaybackRequest::emphasized("a"));
//! assert_eq!(sequence.events()[0].viseme_id, "WideOpen");
//! ```
//!
//! ## Loading a custom table
//!
//! ```rust,no_run
//! use lipsync_rs::engines::lipsync::{LipSyncEngine, LipSyncParams};
//! use std::path::PathBuf;
//!
//! let engine = LipSyncEngine::with_params(LipSyncParams {
//!     table_path: Some(PathBuf::from("visemes.json")),
//! })?;
//! # Ok::<(), lipsync_rs::engines::lipsync::LipSyncError>(())
//! ```

pub mod engine;
#[cfg(feature = "player")]
pub mod player;
pub mod sequencer;
pub mod table;

pub use engine::{LipSyncEngine, LipSyncParams, PlaybackRequest, PlaybackRequestBuilder};
#[cfg(feature = "player")]
pub use player::{PoseRenderer, ThreadedPlayer};
pub use sequencer::{build, IDLE_RESET_SECS, IDLE_VISEME};
pub use table::{LipSyncError, VisemeEntry, VisemeTable};
