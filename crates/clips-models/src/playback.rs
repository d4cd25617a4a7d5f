//! Playback state mirrored from the playback surface.

use serde::{Deserialize, Serialize};

/// Snapshot of the preview player, owned by the playback sync layer.
///
/// Ephemeral per session; reset whenever the pipeline resets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// Current playhead position in seconds.
    pub current_time: f64,
    /// Whether playback is active.
    pub is_playing: bool,
    /// Volume in `[0, 1]`.
    pub volume: f64,
    /// Whether audio is muted.
    pub is_muted: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            is_playing: false,
            volume: 1.0,
            is_muted: false,
        }
    }
}

impl PlaybackState {
    /// Set the volume, clamped to `[0, 1]`.
    pub fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = PlaybackState::default();
        assert_eq!(state.current_time, 0.0);
        assert!(!state.is_playing);
        assert_eq!(state.volume, 1.0);
        assert!(!state.is_muted);
    }

    #[test]
    fn test_volume_clamped() {
        let mut state = PlaybackState::default();
        state.set_volume(1.5);
        assert_eq!(state.volume, 1.0);
        state.set_volume(-0.2);
        assert_eq!(state.volume, 0.0);
    }
}
