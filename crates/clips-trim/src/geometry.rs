//! Pixel/time mapping for the timeline widget.

use serde::{Deserialize, Serialize};

/// Maps between pixel positions on a timeline widget and media time.
///
/// The widget's width changes with layout, so it is observed
/// continuously: `set_width` may be called at any point and later
/// conversions use the new width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineGeometry {
    width_px: f64,
    duration: f64,
}

impl TimelineGeometry {
    /// Create a geometry for a widget of `width_px` over `duration` seconds.
    pub fn new(width_px: f64, duration: f64) -> Self {
        Self {
            width_px: width_px.max(0.0),
            duration: duration.max(0.0),
        }
    }

    /// Current widget width in pixels.
    pub fn width_px(&self) -> f64 {
        self.width_px
    }

    /// Media duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Record a layout resize.
    pub fn set_width(&mut self, width_px: f64) {
        self.width_px = width_px.max(0.0);
    }

    /// Replace the duration (a new source was loaded).
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration.max(0.0);
    }

    /// Convert a time to its pixel position, clamped to the widget.
    pub fn time_to_px(&self, time: f64) -> f64 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        ((time / self.duration) * self.width_px).clamp(0.0, self.width_px)
    }

    /// Convert a pixel position to media time, clamped to the duration.
    ///
    /// Pointer tracking is window-scoped, so `px` may fall outside
    /// `[0, width]` during a fast drag; such samples pin to the edge.
    pub fn px_to_time(&self, px: f64) -> f64 {
        if self.width_px <= 0.0 {
            return 0.0;
        }
        ((px / self.width_px) * self.duration).clamp(0.0, self.duration)
    }
}
