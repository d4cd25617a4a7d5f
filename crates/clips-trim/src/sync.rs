//! Playback synchronization against the selected trim range.
//!
//! Enforces that preview playback never proceeds outside the selected
//! range: every time-update tick past the range end seeks back to the
//! start, keeping the play state so the loop is seamless.

use clips_models::{PlaybackState, TimeRange};
use thiserror::Error;
use tracing::debug;

use crate::controller::Seek;

/// Playback synchronization errors.
#[derive(Debug, Error, PartialEq)]
pub enum SyncError {
    /// Certain containers/streams report a non-finite duration; such a
    /// source is unusable and intake must abort.
    #[error("Could not determine video duration")]
    NonFiniteDuration,
}

/// Keeps the playback surface consistent with the selected range.
#[derive(Debug, Clone)]
pub struct PlaybackSync {
    state: PlaybackState,
    range: TimeRange,
    duration: f64,
}

impl Default for PlaybackSync {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackSync {
    /// Create a sync layer with no source loaded yet.
    pub fn new() -> Self {
        Self {
            state: PlaybackState::default(),
            range: TimeRange {
                start: 0.0,
                end: 0.0,
            },
            duration: 0.0,
        }
    }

    /// Current mirrored playback state, for UI display.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Loop boundaries currently enforced.
    pub fn range(&self) -> TimeRange {
        self.range
    }

    /// Source metadata has loaded; the duration must be finite.
    pub fn load_metadata(&mut self, duration: f64) -> Result<f64, SyncError> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(SyncError::NonFiniteDuration);
        }
        self.duration = duration;
        self.range = TimeRange::full(duration);
        debug!(duration, "source metadata loaded");
        Ok(duration)
    }

    /// Mirror the controller's selection into the loop boundaries.
    pub fn set_range(&mut self, range: TimeRange) {
        self.range = range;
    }

    /// Playback time-update tick from the media element.
    ///
    /// Returns a seek command when the playhead crossed the range end;
    /// `is_playing` is left untouched so an active loop keeps playing
    /// from the range start.
    pub fn on_time_update(&mut self, current_time: f64) -> Option<Seek> {
        if self.range.end > 0.0 && current_time >= self.range.end {
            self.state.current_time = self.range.start;
            debug!(
                current_time,
                loop_to = self.range.start,
                "loop boundary reached"
            );
            return Some(Seek(self.range.start));
        }
        self.state.current_time = current_time;
        None
    }

    /// Explicit seek (scrub or handle drag), mirrored into state.
    pub fn seek(&mut self, time: f64) {
        self.state.current_time = time.clamp(0.0, self.duration);
    }

    /// Toggle play/pause; returns the new playing state for the host
    /// to pass through to the media element.
    pub fn toggle_play(&mut self) -> bool {
        self.state.is_playing = !self.state.is_playing;
        self.state.is_playing
    }

    /// Volume pass-through, clamped to `[0, 1]`.
    pub fn set_volume(&mut self, volume: f64) {
        self.state.set_volume(volume);
    }

    /// Mute pass-through.
    pub fn set_muted(&mut self, muted: bool) {
        self.state.is_muted = muted;
    }

    /// Reset for a new session.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
