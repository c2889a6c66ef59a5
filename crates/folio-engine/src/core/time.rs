/// Nominal frame delta the damping constants are tuned against (60 Hz).
pub const REFERENCE_DELTA_MS: f64 = 1000.0 / 60.0;

/// Elapsed time between two ticks, raw and relative to the reference delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameDelta {
    /// Milliseconds since the previous tick, after lag smoothing.
    pub elapsed_ms: f64,
    /// `elapsed_ms / reference`. 1.0 on a nominal 60 Hz frame.
    pub ratio: f32,
}

/// Tracks the time between consecutive ticks.
///
/// Every subsystem owns one of these and derives its own delta from the
/// shared timestamp. Gaps longer than `lag_threshold_ms` (a backgrounded tab,
/// a debugger pause) are treated as `lag_adjusted_ms` so damped values don't
/// leap across the screen on resume.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    reference_ms: f64,
    lag_threshold_ms: f64,
    lag_adjusted_ms: f64,
    last_ms: Option<f64>,
}

impl FrameTimer {
    pub fn new(reference_ms: f64) -> Self {
        Self {
            reference_ms: if reference_ms > 0.0 { reference_ms } else { REFERENCE_DELTA_MS },
            lag_threshold_ms: 500.0,
            lag_adjusted_ms: 33.0,
            last_ms: None,
        }
    }

    pub fn with_lag_smoothing(mut self, threshold_ms: f64, adjusted_ms: f64) -> Self {
        self.lag_threshold_ms = threshold_ms;
        self.lag_adjusted_ms = adjusted_ms;
        self
    }

    /// Record a tick. The first tick counts as one nominal frame.
    pub fn advance(&mut self, timestamp_ms: f64) -> FrameDelta {
        let elapsed_ms = match self.last_ms {
            None => self.reference_ms,
            Some(last) => {
                let elapsed = (timestamp_ms - last).max(0.0);
                if elapsed > self.lag_threshold_ms {
                    self.lag_adjusted_ms
                } else {
                    elapsed
                }
            }
        };
        self.last_ms = Some(timestamp_ms);
        FrameDelta {
            elapsed_ms,
            ratio: (elapsed_ms / self.reference_ms) as f32,
        }
    }

    /// Shorthand for `advance(..).ratio`.
    pub fn delta_ratio(&mut self, timestamp_ms: f64) -> f32 {
        self.advance(timestamp_ms).ratio
    }

    pub fn reference_ms(&self) -> f64 {
        self.reference_ms
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(REFERENCE_DELTA_MS)
    }
}

/// Repeating timer with a fixed period, fed by variable frame deltas.
/// Once cancelled it never fires again, even for time already accumulated.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    /// The period between fires.
    period_ms: f64,
    /// Accumulated time not yet converted into fires.
    accumulator: f64,
    cancelled: bool,
}

impl IntervalTimer {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms: period_ms.max(1.0),
            accumulator: 0.0,
            cancelled: false,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fires due.
    pub fn accumulate(&mut self, elapsed_ms: f64) -> u32 {
        if self.cancelled {
            return 0;
        }
        self.accumulator += elapsed_ms.max(0.0);
        // Cap a long stall at ten fires rather than flooding the caller
        self.accumulator = self.accumulator.min(self.period_ms * 10.0);
        let fires = (self.accumulator / self.period_ms) as u32;
        self.accumulator -= fires as f64 * self.period_ms;
        fires
    }

    /// Stop the timer and discard any pending time.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.accumulator = 0.0;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }
}
