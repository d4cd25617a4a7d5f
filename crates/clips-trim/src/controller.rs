//! Drag/scrub interaction over the timeline widget.
//!
//! Pointer tracking is window-scoped: once a drag starts, every move
//! sample is accepted no matter where the pointer is, and a global
//! pointer-up always ends the drag. A fast drag past the widget
//! boundary therefore never gets lost.

use clips_models::{TimeRange, MIN_SPAN};
use tracing::debug;

use crate::geometry::TimelineGeometry;

/// Command for the host to seek the preview player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seek(pub f64);

/// What the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    LeftHandle,
    RightHandle,
    /// The timeline body outside either handle.
    Body,
}

/// Active drag mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragMode {
    #[default]
    Idle,
    DraggingLeftHandle,
    DraggingRightHandle,
    Scrubbing,
}

/// Translates pointer gestures over the timeline into range and
/// playhead updates.
#[derive(Debug, Clone)]
pub struct TrimController {
    geometry: TimelineGeometry,
    range: TimeRange,
    mode: DragMode,
}

impl TrimController {
    /// Create a controller for a widget of `width_px` over a source of
    /// `duration` seconds, selecting the full duration.
    pub fn new(width_px: f64, duration: f64) -> Self {
        Self {
            geometry: TimelineGeometry::new(width_px, duration),
            range: TimeRange::full(duration),
            mode: DragMode::Idle,
        }
    }

    /// Current selection.
    pub fn range(&self) -> TimeRange {
        self.range
    }

    /// Active drag mode.
    pub fn mode(&self) -> DragMode {
        self.mode
    }

    /// Widget geometry, for rendering handle positions.
    pub fn geometry(&self) -> TimelineGeometry {
        self.geometry
    }

    /// Record a layout resize of the host widget.
    pub fn resize(&mut self, width_px: f64) {
        self.geometry.set_width(width_px);
    }

    /// Pointer-down over the widget enters the matching drag mode.
    ///
    /// Going down on the body seeks immediately; going down on a
    /// handle waits for the first move.
    pub fn pointer_down(&mut self, target: PointerTarget, x_px: f64) -> Option<Seek> {
        self.mode = match target {
            PointerTarget::LeftHandle => DragMode::DraggingLeftHandle,
            PointerTarget::RightHandle => DragMode::DraggingRightHandle,
            PointerTarget::Body => DragMode::Scrubbing,
        };
        debug!(mode = ?self.mode, x_px, "drag started");
        match self.mode {
            DragMode::Scrubbing => Some(Seek(self.geometry.px_to_time(x_px))),
            _ => None,
        }
    }

    /// Pointer-move sample; coordinates outside the widget are legal.
    pub fn pointer_move(&mut self, x_px: f64) -> Option<Seek> {
        let t = self.geometry.px_to_time(x_px);
        match self.mode {
            DragMode::Idle => None,
            DragMode::DraggingLeftHandle => {
                self.range.set_start(t);
                Some(Seek(self.range.start))
            }
            DragMode::DraggingRightHandle => {
                self.range.set_end(t, self.geometry.duration());
                Some(Seek(self.range.end))
            }
            // Scrubbing moves the playhead only, never the range.
            DragMode::Scrubbing => Some(Seek(t)),
        }
    }

    /// Global pointer-up always returns to `Idle`, wherever the
    /// pointer currently is.
    pub fn pointer_up(&mut self) {
        if self.mode != DragMode::Idle {
            debug!(mode = ?self.mode, range = ?self.range, "drag ended");
        }
        self.mode = DragMode::Idle;
    }

    /// Manual `mm:ss` entry for the start edge.
    ///
    /// Applied only when the text parses and `0 <= t < end`; anything
    /// else is silently ignored and the previous value stays.
    pub fn enter_start_text(&mut self, text: &str) -> Option<Seek> {
        let t = clips_models::parse_timecode(text).ok()?;
        if t >= self.range.end {
            debug!(t, end = self.range.end, "start entry ignored");
            return None;
        }
        self.range.start = t.min(self.range.end - MIN_SPAN).max(0.0);
        Some(Seek(self.range.start))
    }

    /// Manual `mm:ss` entry for the end edge.
    ///
    /// Applied only when the text parses and `start < t <= duration`.
    pub fn enter_end_text(&mut self, text: &str) -> Option<Seek> {
        let t = clips_models::parse_timecode(text).ok()?;
        if t <= self.range.start || t > self.geometry.duration() {
            debug!(t, start = self.range.start, "end entry ignored");
            return None;
        }
        self.range.end = t.max(self.range.start + MIN_SPAN);
        Some(Seek(self.range.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> TrimController {
        // 100px over 100s: 1px == 1s.
        let mut c = TrimController::new(100.0, 100.0);
        c.range = TimeRange {
            start: 10.0,
            end: 20.0,
        };
        c
    }

    #[test]
    fn test_left_handle_clamps_at_right_handle() {
        let mut c = controller();
        c.pointer_down(PointerTarget::LeftHandle, 10.0);
        let seek = c.pointer_move(25.0).unwrap();
        assert!((c.range().start - (20.0 - MIN_SPAN)).abs() < 1e-9);
        assert_eq!(c.range().end, 20.0);
        assert_eq!(seek, Seek(c.range().start));
    }

    #[test]
    fn test_right_handle_drag_seeks_to_end() {
        let mut c = controller();
        c.pointer_down(PointerTarget::RightHandle, 20.0);
        let seek = c.pointer_move(35.0).unwrap();
        assert_eq!(c.range().end, 35.0);
        assert_eq!(seek, Seek(35.0));
    }

    #[test]
    fn test_scrub_never_mutates_range() {
        let mut c = controller();
        let before = c.range();
        let seek = c.pointer_down(PointerTarget::Body, 50.0).unwrap();
        assert_eq!(seek, Seek(50.0));
        c.pointer_move(70.0);
        c.pointer_move(5.0);
        c.pointer_up();
        assert_eq!(c.range(), before);
    }

    #[test]
    fn test_drag_past_widget_boundary_clamps() {
        let mut c = controller();
        c.pointer_down(PointerTarget::RightHandle, 20.0);
        c.pointer_move(500.0);
        assert_eq!(c.range().end, 100.0);
        c.pointer_move(-50.0);
        assert!((c.range().end - (10.0 + MIN_SPAN)).abs() < 1e-9);
    }

    #[test]
    fn test_pointer_up_always_returns_to_idle() {
        let mut c = controller();
        c.pointer_down(PointerTarget::LeftHandle, 10.0);
        c.pointer_up();
        assert_eq!(c.mode(), DragMode::Idle);
        // Moves after release are ignored.
        assert!(c.pointer_move(60.0).is_none());
        assert_eq!(c.range().start, 10.0);
    }

    #[test]
    fn test_resize_recomputes_mapping() {
        let mut c = controller();
        c.resize(200.0); // now 2px == 1s
        c.pointer_down(PointerTarget::RightHandle, 40.0);
        c.pointer_move(60.0);
        assert_eq!(c.range().end, 30.0);
    }

    #[test]
    fn test_manual_entry_applies_valid_values() {
        let mut c = controller();
        let seek = c.enter_start_text("0:05").unwrap();
        assert_eq!(c.range().start, 5.0);
        assert_eq!(seek, Seek(5.0));

        c.enter_end_text("0:45").unwrap();
        assert_eq!(c.range().end, 45.0);
    }

    #[test]
    fn test_manual_entry_ignores_invalid_values() {
        let mut c = controller();
        assert!(c.enter_start_text("garbage").is_none());
        assert!(c.enter_start_text("0:25").is_none()); // past end
        assert!(c.enter_end_text("0:05").is_none()); // before start
        assert!(c.enter_end_text("3:00").is_none()); // past duration
        assert_eq!(
            c.range(),
            TimeRange {
                start: 10.0,
                end: 20.0
            }
        );
    }
}
