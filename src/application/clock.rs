/// Clock schedules generation ticks against wall time.
///
/// At most one tick is reported per `advance` call and the accumulator
/// is cleared when a tick fires, so a stalled frame never triggers a
/// catch-up burst of generations.
pub struct Clock {
    tickrate: f32,
    elapsed: f32,
}

impl Clock {
    pub fn new(tickrate: f32) -> Self {
        Self { tickrate, elapsed: 0.0 }
    }

    pub const fn tickrate(&self) -> f32 {
        self.tickrate
    }

    /// Accumulate frame time; returns true when a tick is due
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed >= 1.0 / self.tickrate {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }
}
