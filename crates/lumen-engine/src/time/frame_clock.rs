use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Wall-clock seconds since the clock was created or last reset.
    ///
    /// Animations are driven from this value, not from accumulated `dt`, so a
    /// clamped stall does not drift them.
    pub elapsed: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Delta time is clamped to avoid pathological values when the application is paused
/// by the debugger, minimized, or stalls. Elapsed time is never clamped.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a new clock with default clamps (0.1 ms .. 250 ms).
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Creates a clock whose origin is `start`.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            last: start,
            frame_index: 0,
            dt_min: Duration::from_micros(100),
            dt_max: Duration::from_millis(250),
        }
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            dt_min,
            dt_max,
            ..Self::new()
        }
    }

    /// Restarts the clock: elapsed time, delta baseline and frame counter.
    pub fn reset(&mut self) {
        self.reset_at(Instant::now());
    }

    pub fn reset_at(&mut self, now: Instant) {
        self.start = now;
        self.last = now;
        self.frame_index = 0;
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock as if the current time were `now`.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_tracks_wall_clock() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);

        let a = clock.tick_at(t0 + Duration::from_millis(16));
        let b = clock.tick_at(t0 + Duration::from_secs(2));

        assert!((a.elapsed - 0.016).abs() < 1e-4);
        assert!((b.elapsed - 2.0).abs() < 1e-4);
        assert_eq!(a.frame_index, 0);
        assert_eq!(b.frame_index, 1);
    }

    #[test]
    fn dt_is_clamped_but_elapsed_is_not() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);

        let stalled = clock.tick_at(t0 + Duration::from_secs(5));
        assert!((stalled.dt - 0.25).abs() < 1e-6);
        assert!((stalled.elapsed - 5.0).abs() < 1e-4);

        let same = clock.tick_at(t0 + Duration::from_secs(5));
        assert!((same.dt - 0.0001).abs() < 1e-6);
    }

    #[test]
    fn reset_moves_the_elapsed_origin() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        clock.tick_at(t0 + Duration::from_millis(16));

        let setup_done = t0 + Duration::from_secs(3);
        clock.reset_at(setup_done);

        let first = clock.tick_at(setup_done + Duration::from_millis(20));
        assert!((first.elapsed - 0.020).abs() < 1e-4);
        assert!((first.dt - 0.020).abs() < 1e-4);
        assert_eq!(first.frame_index, 0);
    }
}
