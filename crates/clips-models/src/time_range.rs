//! Trim range over a media duration.
//!
//! Interactive dragging produces a continuous stream of candidate
//! values, many transiently invalid, so every setter is a total
//! function: out-of-range inputs clamp to the nearest valid value and
//! nothing ever rejects or panics.

use serde::{Deserialize, Serialize};

/// Minimum width of a trim range, in seconds.
///
/// Dragging one handle past the other clamps at this distance instead
/// of crossing.
pub const MIN_SPAN: f64 = 0.1;

/// Selected `[start, end]` sub-interval of a source video.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start of the selection in seconds.
    pub start: f64,
    /// End of the selection in seconds.
    pub end: f64,
}

impl TimeRange {
    /// Full-duration range, created when the source duration becomes known.
    pub fn full(duration: f64) -> Self {
        Self {
            start: 0.0,
            end: duration.max(0.0),
        }
    }

    /// Selected span in seconds.
    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `t` falls inside the selection.
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t < self.end
    }

    /// Move the start handle, clamping to `[0, end - MIN_SPAN]`.
    pub fn set_start(&mut self, t: f64) {
        self.start = t.clamp(0.0, (self.end - MIN_SPAN).max(0.0));
    }

    /// Move the end handle, clamping to `[start + MIN_SPAN, duration]`.
    pub fn set_end(&mut self, t: f64, duration: f64) {
        let floor = self.start + MIN_SPAN;
        self.end = t.clamp(floor, duration.max(floor));
    }

    /// Replace both edges, end first so the start clamp sees the new end.
    pub fn set_range(&mut self, start: f64, end: f64, duration: f64) {
        self.set_end(end, duration);
        self.set_start(start);
    }

    /// Re-clamp both edges against a (possibly smaller) duration.
    pub fn clamp_to_duration(&mut self, duration: f64) {
        let duration = duration.max(MIN_SPAN);
        self.end = self.end.clamp(MIN_SPAN, duration);
        self.start = self.start.clamp(0.0, self.end - MIN_SPAN);
    }
}
