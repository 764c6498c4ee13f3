//! Precomputed brightness ramps.

use pulsetray_protocol::Status;

/// Brightness levels per color family.
pub const LEVELS: usize = 8;

/// Steps in one breath: up through every level, back down to the first,
/// visiting the peak once.
pub const CYCLE_LEN: usize = 2 * LEVELS - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Adds `amount` to every channel, saturating at 255.
    pub fn lighten(self, amount: u8) -> Rgb {
        Rgb(
            self.0.saturating_add(amount),
            self.1.saturating_add(amount),
            self.2.saturating_add(amount),
        )
    }
}

/// Position of `phase` within the breathing cycle, `0..CYCLE_LEN`.
pub fn cycle_position(phase: u64) -> usize {
    (phase % CYCLE_LEN as u64) as usize
}

/// Brightness level shown at `phase`.
pub fn frame_level(phase: u64) -> usize {
    let step = cycle_position(phase);
    if step < LEVELS {
        step
    } else {
        CYCLE_LEN - 1 - step
    }
}

/// Color ramps for both status families, dimmest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSet {
    working: [Rgb; LEVELS],
    standby: [Rgb; LEVELS],
}

impl Default for FrameSet {
    fn default() -> Self {
        Self::breathing()
    }
}

impl FrameSet {
    /// Yellow 180→255 while working, green 120→255 on standby.
    pub fn breathing() -> Self {
        Self {
            working: ramp(180, |b| Rgb(b, b, 0)),
            standby: ramp(120, |b| Rgb(0, b, 0)),
        }
    }

    pub fn family(&self, status: Status) -> &[Rgb; LEVELS] {
        match status {
            Status::Working => &self.working,
            Status::Standby => &self.standby,
        }
    }

    pub fn color(&self, status: Status, level: usize) -> Rgb {
        self.family(status)[level.min(LEVELS - 1)]
    }
}

/// Linear ramp from `low` to 255 over [`LEVELS`] steps.
fn ramp(low: u8, paint: impl Fn(u8) -> Rgb) -> [Rgb; LEVELS] {
    let low = u32::from(low);
    let span = 255 - low;
    std::array::from_fn(|i| {
        let b = low + span * i as u32 / (LEVELS as u32 - 1);
        paint(b as u8)
    })
}
