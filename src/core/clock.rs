use std::time::Instant;

/// Measures wall-clock time between frames
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    last_tick: Instant,
}

impl FrameClock {
    /// Creates a clock started now
    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    /// Creates a clock started at `now`
    pub fn started_at(now: Instant) -> Self {
        Self { last_tick: now }
    }

    /// Returns seconds since the previous tick and restarts the interval
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Like [`tick`](Self::tick) but measured against `now`
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let delta = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        delta.as_secs_f32()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
