/// Values this close to a bound snap onto it, so that frame slicing never
/// leaves the timer a hair short of full or empty.
const SNAP_EPSILON: f64 = 1e-6;

/// Hold-to-answer timer, in milliseconds. Fills while the pose is held,
/// drains `decay` times faster while it is not, and stays in `[0, threshold]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseChargeTimer {
    value: f64,
    threshold: f64,
    decay: f64,
}

impl PoseChargeTimer {
    pub fn new(threshold_ms: f64, decay: f64) -> Self {
        Self {
            value: 0.0,
            threshold: threshold_ms.max(SNAP_EPSILON),
            decay: decay.max(0.0),
        }
    }

    /// Add held time. Returns true once the threshold is reached.
    pub fn charge(&mut self, dt_ms: f64) -> bool {
        self.value = (self.value + dt_ms.max(0.0)).min(self.threshold);
        if self.threshold - self.value < SNAP_EPSILON {
            self.value = self.threshold;
        }
        self.is_full()
    }

    /// Drain for time spent out of pose.
    pub fn decay(&mut self, dt_ms: f64) {
        self.value = (self.value - dt_ms.max(0.0) * self.decay).max(0.0);
        if self.value < SNAP_EPSILON {
            self.value = 0.0;
        }
    }

    pub fn is_full(&self) -> bool {
        self.value >= self.threshold
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Fill level in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        (self.value / self.threshold) as f32
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}
