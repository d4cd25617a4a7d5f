//! Trim-range interaction and playback synchronization.
//!
//! Toolkit-agnostic logic behind the trim stage: the widget feeds
//! pointer samples and playback ticks in, and gets back range updates
//! and seek commands to forward to the player. Nothing in here touches
//! a real UI or media element.

pub mod controller;
pub mod geometry;
pub mod sync;

pub use controller::{DragMode, PointerTarget, Seek, TrimController};
pub use geometry::TimelineGeometry;
pub use sync::{PlaybackSync, SyncError};
