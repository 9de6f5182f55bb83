/// Converts the host's animation-frame timestamps into frame deltas.
///
/// XR frame callbacks hand out absolute timestamps in milliseconds; the game
/// wants seconds since the previous frame. The first frame yields zero and
/// long stalls (tab switch, headset removed) are capped.
pub struct FrameClock {
    last_ms: Option<f64>,
    max_dt: f32,
    elapsed: f64,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_ms: None,
            max_dt,
            elapsed: 0.0,
        }
    }

    /// Feed the next frame timestamp (ms). Returns the frame delta in seconds.
    pub fn advance(&mut self, timestamp_ms: f64) -> f32 {
        let dt = match self.last_ms {
            None => 0.0,
            Some(last) => ((timestamp_ms - last) / 1000.0).max(0.0) as f32,
        };
        self.last_ms = Some(timestamp_ms);
        let dt = dt.min(self.max_dt);
        self.elapsed += dt as f64;
        dt
    }

    /// Forget the previous timestamp (new XR session, clock origin changes).
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    /// Total seconds advanced since creation.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn max_dt(&self) -> f32 {
        self.max_dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(0.25)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_is_zero() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.advance(12_345.0), 0.0);
    }

    #[test]
    fn converts_ms_to_seconds() {
        let mut clock = FrameClock::default();
        clock.advance(1000.0);
        let dt = clock.advance(1016.0);
        assert!((dt - 0.016).abs() < 1e-6, "dt was {}", dt);
    }

    #[test]
    fn caps_long_stalls() {
        let mut clock = FrameClock::new(0.25);
        clock.advance(0.0);
        assert_eq!(clock.advance(5000.0), 0.25);
    }

    #[test]
    fn backwards_timestamp_is_zero() {
        let mut clock = FrameClock::default();
        clock.advance(500.0);
        assert_eq!(clock.advance(400.0), 0.0);
    }

    #[test]
    fn reset_restarts_from_zero() {
        let mut clock = FrameClock::default();
        clock.advance(0.0);
        clock.advance(100.0);
        clock.reset();
        assert_eq!(clock.advance(90_000.0), 0.0);
        assert!((clock.elapsed() - 0.1).abs() < 1e-6);
    }
}
