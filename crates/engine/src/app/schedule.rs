use serde::Serialize;

/// Sequence number of a scheduler tick. Advances by exactly one per `Chapter::update`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Tick(pub u64);

impl Tick {
    pub fn next(self) -> Tick {
        Tick(self.0.saturating_add(1))
    }
}

/// Result of resuming a cooperative process for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Running,
    Finished,
}

impl StepOutcome {
    pub fn is_finished(self) -> bool {
        matches!(self, StepOutcome::Finished)
    }
}

/// Linear progress `0 -> 1` at a fixed rate per second, the shape shared by
/// the drop, pickup and shuffle animations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    t: f32,
    rate_per_second: f32,
}

impl Progress {
    pub fn new(rate_per_second: f32) -> Self {
        Self {
            t: 0.0,
            rate_per_second,
        }
    }

    pub fn advance(&mut self, dt_seconds: f32) -> StepOutcome {
        self.t = (self.t + dt_seconds.max(0.0) * self.rate_per_second).min(1.0);
        if self.t >= 1.0 {
            StepOutcome::Finished
        } else {
            StepOutcome::Running
        }
    }

    pub fn value(&self) -> f32 {
        self.t
    }
}
