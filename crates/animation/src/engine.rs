//! Fixed-rate animation ticker.

use std::sync::Arc;
use std::time::Duration;

use pulsetray_protocol::Status;
use pulsetray_status::StatusStore;
use tokio_util::sync::CancellationToken;

use crate::{Frame, FrameSet, frame_level, tooltip};

/// Tick period of the breathing animation.
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(100);

/// Something that can show a rendered frame (the tray icon).
pub trait DisplaySurface: Send + Sync {
    fn show(&self, frame: &Frame);
}

/// Maps a monotonic phase counter onto breathing frames.
///
/// Rendering is a pure function of `(phase, status)`; wall-clock time only
/// decides when the next tick happens.
#[derive(Debug, Clone)]
pub struct AnimationEngine {
    frames: FrameSet,
    phase: u64,
}

impl Default for AnimationEngine {
    fn default() -> Self {
        Self::new(FrameSet::breathing())
    }
}

impl AnimationEngine {
    pub fn new(frames: FrameSet) -> Self {
        Self { frames, phase: 0 }
    }

    /// Number of ticks rendered so far.
    pub fn phase(&self) -> u64 {
        self.phase
    }

    /// Frame for the current phase without advancing.
    pub fn peek(&self, status: Status) -> Frame {
        let level = frame_level(self.phase);
        Frame {
            phase: self.phase,
            status,
            level,
            color: self.frames.color(status, level),
            tooltip: tooltip(status),
        }
    }

    /// Renders the current phase in `status`'s colors, then advances.
    pub fn tick(&mut self, status: Status) -> Frame {
        let frame = self.peek(status);
        self.phase = self.phase.wrapping_add(1);
        frame
    }

    /// Pushes one frame per `period` to `surface` until cancelled.
    ///
    /// Every tick reads the store afresh, so the shown color is never more
    /// than one period stale. Returns the engine so its phase survives.
    pub async fn run<S>(
        mut self,
        store: Arc<StatusStore>,
        surface: Arc<S>,
        period: Duration,
        cancel: CancellationToken,
    ) -> Self
    where
        S: DisplaySurface + ?Sized,
    {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        tracing::info!(period_ms = period.as_millis() as u64, "animation started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let frame = self.tick(store.status());
                    surface.show(&frame);
                }
            }
        }

        tracing::info!(ticks = self.phase, "animation stopped");
        self
    }
}
