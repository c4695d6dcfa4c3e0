use unicode_segmentation::UnicodeSegmentation;

use crate::AnimationEvent;

use super::table::VisemeTable;

/// Reserved identifier of the neutral rest pose.
pub const IDLE_VISEME: &str = "Idle";

/// Idle reset shown after every pose, before scaling.
pub const IDLE_RESET_SECS: f64 = 0.04;

/// Convert text into an ordered list of timed pose events.
///
/// # Arguments
/// - `text`: The input text; case does not matter
/// - `duration_multiplier`: Scale applied to every duration. Expected to be
///   positive; zero or negative values produce non-positive durations.
/// - `table`: Letter-to-pose mapping
///
/// # Returns
/// Pose/idle pairs, one per change of pose. Letters missing from the table are
/// silently dropped and a letter that resolves to the pose currently shown
/// emits nothing, so text with no recognized letters yields an empty list.
/// Text is split into grapheme clusters after uppercasing; a cluster is only
/// looked up when it is a single `char`, so letters with combining marks are
/// dropped too.
pub fn build(text: &str, duration_multiplier: f64, table: &VisemeTable) -> Vec<AnimationEvent> {
    let mut events = Vec::new();
    let mut previous = IDLE_VISEME;

    let upper = text.to_uppercase();
    for grapheme in upper.graphemes(true) {
        let Some(entry) = single_char(grapheme).and_then(|ch| table.lookup(ch)) else {
            log::trace!("No viseme for {grapheme:?}, skipping");
            continue;
        };

        if entry.viseme_id == previous {
            continue;
        }

        events.push(AnimationEvent::new(
            entry.viseme_id.as_str(),
            entry.base_duration * duration_multiplier,
        ));
        events.push(AnimationEvent::new(
            IDLE_VISEME,
            IDLE_RESET_SECS * duration_multiplier,
        ));

        previous = entry.viseme_id.as_str();
    }

    if events.is_empty() {
        log::debug!("No visemes produced for text: {text:?}");
    } else {
        log::debug!(
            "Built {} events for {} chars (x{duration_multiplier})",
            events.len(),
            text.chars().count()
        );
    }

    events
}

fn single_char(grapheme: &str) -> Option<char> {
    let mut chars = grapheme.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}
