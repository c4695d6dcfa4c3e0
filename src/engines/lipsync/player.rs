use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};

use crate::{AnimationEvent, AnimationSequence, PlaybackDriver};

/// Something that can put a pose on screen.
///
/// Any `FnMut(&str) + Send` closure is a renderer.
pub trait PoseRenderer: Send + 'static {
    /// Display the pose named `viseme_id` until told otherwise.
    fn show(&mut self, viseme_id: &str);
}

impl<F> PoseRenderer for F
where
    F: FnMut(&str) + Send + 'static,
{
    fn show(&mut self, viseme_id: &str) {
        self(viseme_id)
    }
}

struct Shared<R> {
    /// Bumped on every play/stop; workers from older generations stop rendering.
    generation: u64,
    renderer: R,
}

/// Plays sequences on a background thread, one at a time.
///
/// Each event's pose is shown and then held for the event's duration before
/// the next one starts. Calling [`play`](PlaybackDriver::play) while a
/// sequence is running cancels it immediately; the old sequence never
/// renders another pose.
///
/// ```rust
/// use lipsync_rs::engines::lipsync::{LipSyncEngine, PlaybackRequestBuilder, ThreadedPlayer};
/// use lipsync_rs::PlaybackDriver;
///
/// let engine = LipSyncEngine::new();
/// let request = PlaybackRequestBuilder::default()
///     .text("hi")
///     .duration_multiplier(0.01)
///     .build()?;
///
/// let mut player = ThreadedPlayer::new(|pose: &str| println!("{pose}"));
/// player.play(&engine.animate(&request));
/// player.wait();
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ThreadedPlayer<R: PoseRenderer> {
    shared: Arc<Mutex<Shared<R>>>,
    cancel: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl<R: PoseRenderer> ThreadedPlayer<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                generation: 0,
                renderer,
            })),
            cancel: None,
            worker: None,
        }
    }

    /// Whether a sequence is still being played.
    pub fn is_playing(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }

    /// Block until the current sequence has finished.
    pub fn wait(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("Playback worker panicked");
            }
        }
        self.cancel = None;
    }

    /// Invalidate the running worker and wait for it to exit.
    ///
    /// Returns the new generation.
    fn cancel_current(&mut self) -> u64 {
        let generation = {
            let mut shared = lock(&self.shared);
            shared.generation += 1;
            shared.generation
        };

        // Dropping the sender wakes a worker that is holding a pose.
        if self.cancel.take().is_some() && self.is_playing() {
            log::debug!("Cancelling in-flight playback");
        }
        self.wait();
        generation
    }
}

impl<R: PoseRenderer> PlaybackDriver for ThreadedPlayer<R> {
    fn play(&mut self, sequence: &AnimationSequence) {
        let generation = self.cancel_current();
        if sequence.is_empty() {
            return;
        }

        log::debug!(
            "Playing {} events ({:.2}s)",
            sequence.len(),
            sequence.total_duration_secs()
        );

        let (cancel_tx, cancel_rx) = bounded(0);
        let shared = Arc::clone(&self.shared);
        let events = sequence.events().to_vec();
        self.cancel = Some(cancel_tx);
        self.worker = Some(thread::spawn(move || {
            run_sequence(&shared, &events, generation, &cancel_rx)
        }));
    }

    fn stop(&mut self) {
        self.cancel_current();
    }
}

impl<R: PoseRenderer> Drop for ThreadedPlayer<R> {
    fn drop(&mut self) {
        self.cancel_current();
    }
}

fn lock<R>(shared: &Mutex<Shared<R>>) -> MutexGuard<'_, Shared<R>> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

fn run_sequence<R: PoseRenderer>(
    shared: &Mutex<Shared<R>>,
    events: &[AnimationEvent],
    generation: u64,
    cancel: &Receiver<()>,
) {
    for event in events {
        {
            let mut shared = lock(shared);
            if shared.generation != generation {
                return;
            }
            shared.renderer.show(&event.viseme_id);
        }

        match cancel.recv_timeout(hold_for(event.duration)) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }
    }
    log::debug!("Playback finished");
}

/// How long to hold a pose of `secs` seconds.
///
/// Non-positive and NaN durations advance immediately; durations too large
/// for a `Duration` hold until cancelled.
fn hold_for(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::{hold_for, PoseRenderer, ThreadedPlayer};
    use crate::engines::lipsync::{LipSyncEngine, PlaybackRequest, PlaybackRequestBuilder};
    use crate::{AnimationEvent, AnimationSequence, PlaybackDriver};
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    type Shown = Arc<Mutex<Vec<String>>>;

    fn recording_player() -> (ThreadedPlayer<impl PoseRenderer>, Shown) {
        let shown: Shown = Arc::default();
        let sink = Arc::clone(&shown);
        let player = ThreadedPlayer::new(move |pose: &str| {
            sink.lock().unwrap().push(pose.to_string());
        });
        (player, shown)
    }

    fn request(text: &str, duration_multiplier: f64) -> PlaybackRequest {
        PlaybackRequestBuilder::default()
            .text(text)
            .duration_multiplier(duration_multiplier)
            .build()
            .unwrap()
    }

    #[test]
    fn shows_every_pose_in_order() {
        let engine = LipSyncEngine::new();
        let sequence = engine.animate(&request("HELLO", 0.01));
        let (mut player, shown) = recording_player();

        player.play(&sequence);
        player.wait();

        let expected: Vec<String> = sequence
            .events()
            .iter()
            .map(|e| e.viseme_id.clone())
            .collect();
        assert_eq!(*shown.lock().unwrap(), expected);
        assert!(!player.is_playing());
    }

    #[test]
    fn holds_each_pose_for_its_duration() {
        let sequence = AnimationSequence::new(vec![
            AnimationEvent::new("Open", 0.02),
            AnimationEvent::new("Idle", 0.02),
        ]);
        let (mut player, shown) = recording_player();

        let start = Instant::now();
        player.play(&sequence);
        player.wait();

        assert!(start.elapsed() >= Duration::from_millis(35));
        assert_eq!(shown.lock().unwrap().len(), 2);
    }

    #[test]
    fn hold_maps_out_of_range_durations() {
        assert_eq!(hold_for(0.0), Duration::ZERO);
        assert_eq!(hold_for(-1.0), Duration::ZERO);
        assert_eq!(hold_for(f64::NAN), Duration::ZERO);
        assert_eq!(hold_for(0.5), Duration::from_millis(500));
        assert_eq!(hold_for(1e20), Duration::MAX);
        assert_eq!(hold_for(f64::INFINITY), Duration::MAX);
    }

    #[test]
    fn huge_duration_keeps_pose_until_stopped() {
        let sequence = AnimationSequence::new(vec![
            AnimationEvent::new("Open", 1e20),
            AnimationEvent::new("Idle", 0.04),
        ]);
        let (mut player, shown) = recording_player();

        player.play(&sequence);
        std::thread::sleep(Duration::from_millis(50));
        assert!(player.is_playing());

        let start = Instant::now();
        player.stop();
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(*shown.lock().unwrap(), vec!["Open".to_string()]);
    }

    #[test]
    fn new_request_replaces_running_sequence() {
        let engine = LipSyncEngine::new();
        let (mut player, shown) = recording_player();

        let start = Instant::now();
        player.play(&engine.animate(&request("AO", 100.0)));
        player.play(&engine.animate(&request("L", 0.01)));
        player.wait();

        assert!(start.elapsed() < Duration::from_secs(5));
        let shown = shown.lock().unwrap();
        assert!(!shown.contains(&"Rounded".to_string()), "{shown:?}");
        assert!(shown.ends_with(&["LTongue".to_string(), "Idle".to_string()]));
        assert!(shown.len() <= 3, "{shown:?}");
    }

    #[test]
    fn stop_cancels_playback() {
        let engine = LipSyncEngine::new();
        let (mut player, shown) = recording_player();

        player.play(&engine.animate(&request("AO", 100.0)));
        player.stop();

        assert!(!player.is_playing());
        assert!(shown.lock().unwrap().iter().all(|p| p == "WideOpen"));
    }

    #[test]
    fn empty_sequence_is_a_no_op() {
        let (mut player, shown) = recording_player();
        player.play(&AnimationSequence::default());
        player.wait();

        assert!(!player.is_playing());
        assert!(shown.lock().unwrap().is_empty());
    }

    #[test]
    fn dropping_player_does_not_block_on_long_sequence() {
        let engine = LipSyncEngine::new();
        let (mut player, _shown) = recording_player();

        let start = Instant::now();
        player.play(&engine.animate(&request("AEIOU", 100.0)));
        drop(player);

        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
