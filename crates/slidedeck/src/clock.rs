/// Fixed-rate clock for the deck's elapsed time. Frames arrive at whatever
/// rate the window repaints; the deck only moves in whole steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock {
    step: f64,
    pending: f64,
}

/// Rate at which the deck's elapsed time advances.
pub const TICK_RATE: f64 = 30.0;

impl Default for FixedClock {
    fn default() -> Self {
        Self::new(TICK_RATE)
    }
}

impl FixedClock {
    pub fn new(rate: f64) -> Self {
        Self {
            step: 1.0 / rate,
            pending: 0.0,
        }
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Add `dt` seconds of wall time and return how many whole steps fell due.
    /// Negative input is ignored.
    pub fn tick(&mut self, dt: f64) -> u32 {
        self.pending += dt.max(0.0);
        let steps = (self.pending / self.step).floor();
        self.pending -= steps * self.step;
        steps as u32
    }
}
