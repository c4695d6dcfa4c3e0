use std::borrow::Cow;
use std::path::{Path, PathBuf};

use derive_builder::Builder;
use unicode_segmentation::UnicodeSegmentation;

use crate::AnimationSequence;

use super::sequencer::build;
use super::table::{load_table, LipSyncError, VisemeTable};

/// Multiplier applied to one-character requests by [`PlaybackRequest::emphasized`].
pub const SINGLE_LETTER_EMPHASIS: f64 = 3.0;

/// Parameters for configuring the engine's viseme table.
#[derive(Debug, Clone, Default)]
pub struct LipSyncParams {
    /// JSON table to use instead of the built-in one.
    /// `None` keeps the standard table.
    pub table_path: Option<PathBuf>,
}

/// A single animation trigger.
///
/// ```rust
/// use lipsync_rs::engines::lipsync::PlaybackRequestBuilder;
///
/// let request = PlaybackRequestBuilder::default()
///     .text("Lip reading")
///     .duration_multiplier(1.5)
///     .build()?;
/// assert_eq!(request.duration_multiplier, 1.5);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(setter(into))]
pub struct PlaybackRequest {
    /// Text to animate, in any case.
    pub text: String,
    /// Scale for every event duration. Should be positive, default 1.0.
    #[builder(default = "1.0")]
    pub duration_multiplier: f64,
}

impl PlaybackRequest {
    /// Request at normal speed.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            duration_multiplier: 1.0,
        }
    }

    /// Request that slows a lone letter down so its pose is easy to see.
    ///
    /// Text of exactly one user-perceived character (grapheme cluster) plays
    /// at [`SINGLE_LETTER_EMPHASIS`]; anything longer plays at normal speed.
    pub fn emphasized(text: impl Into<String>) -> Self {
        let text = text.into();
        let duration_multiplier = if text.graphemes(true).count() == 1 {
            SINGLE_LETTER_EMPHASIS
        } else {
            1.0
        };
        Self {
            text,
            duration_multiplier,
        }
    }
}

/// Lip-sync sequencing engine.
///
/// Holds the viseme table and turns [`PlaybackRequest`]s into
/// [`AnimationSequence`]s. Sequencing is pure, so one engine can serve any
/// number of callers.
///
/// ```rust
/// use lipsync_rs::engines::lipsync::{LipSyncEngine, PlaybackRequest};
///
/// let engine = LipSyncEngine::new();
/// let sequence = engine.animate(&PlaybackRequest::new("mama"));
/// assert_eq!(sequence.len(), 8);
/// ```
#[derive(Debug, Clone)]
pub struct LipSyncEngine {
    table: Cow<'static, VisemeTable>,
}

impl Default for LipSyncEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LipSyncEngine {
    /// Create an engine backed by the standard table.
    pub fn new() -> Self {
        Self {
            table: Cow::Borrowed(VisemeTable::standard()),
        }
    }

    /// Create an engine from explicit parameters.
    pub fn with_params(params: LipSyncParams) -> Result<Self, LipSyncError> {
        let mut engine = Self::new();
        if let Some(path) = params.table_path {
            engine.load_table(&path)?;
        }
        Ok(engine)
    }

    /// Create an engine around an already built table.
    pub fn with_table(table: VisemeTable) -> Self {
        Self {
            table: Cow::Owned(table),
        }
    }

    /// Replace the current table with one loaded from a JSON file.
    ///
    /// On error the current table is kept.
    pub fn load_table(&mut self, path: &Path) -> Result<(), LipSyncError> {
        self.table = Cow::Owned(load_table(path)?);
        Ok(())
    }

    /// Go back to the standard table.
    pub fn reset_table(&mut self) {
        self.table = Cow::Borrowed(VisemeTable::standard());
    }

    pub fn table(&self) -> &VisemeTable {
        &self.table
    }

    /// Sequence the request's text.
    pub fn animate(&self, request: &PlaybackRequest) -> AnimationSequence {
        AnimationSequence::new(build(
            &request.text,
            request.duration_multiplier,
            &self.table,
        ))
    }
}
