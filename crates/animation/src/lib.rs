//! Breathing-color icon animation.
//!
//! A fixed-rate ticker advances a monotonic phase counter and maps it onto a
//! precomputed brightness ramp. The current status only selects the color
//! family (yellow while working, green on standby); it never touches the
//! phase, so status flips cannot make the icon jump.

mod engine;
mod frames;
mod raster;

pub use engine::{AnimationEngine, DEFAULT_PERIOD, DisplaySurface};
pub use frames::{CYCLE_LEN, FrameSet, LEVELS, Rgb, cycle_position, frame_level};
pub use raster::{ICON_SIZE, render_icon};

use pulsetray_protocol::Status;

/// One rendered animation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Phase counter value this frame was rendered for.
    pub phase: u64,
    pub status: Status,
    /// Brightness level, `0..LEVELS`.
    pub level: usize,
    pub color: Rgb,
    pub tooltip: &'static str,
}

impl Frame {
    /// Rasterizes this frame as a square RGBA icon.
    pub fn to_rgba(&self, size: u32) -> Vec<u8> {
        render_icon(self.color, size)
    }
}

/// Tooltip shown for each status.
pub fn tooltip(status: Status) -> &'static str {
    match status {
        Status::Working => "Working...",
        Status::Standby => "Ready",
    }
}
