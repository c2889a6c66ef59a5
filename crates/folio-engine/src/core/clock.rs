//! The single per-frame clock every animator hangs off.
//!
//! The host calls [`FrameClock::frame`] once per display refresh. Subscribers
//! are invoked in subscription order, each exactly once, with the same
//! [`ClockTick`]. Nothing else in the page keeps its own timer, so scroll,
//! cursor and particles can never drift apart.

/// One rendered frame. Produced by the clock, consumed synchronously, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockTick {
    /// Host timestamp in milliseconds (`requestAnimationFrame` time).
    pub timestamp_ms: f64,
    /// Frames delivered since the clock started, starting at 0.
    pub frame: u64,
}

/// A per-frame listener. `C` is the shared context handed to every subscriber.
pub trait FrameSubscriber<C> {
    /// Short name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    fn on_frame(&mut self, tick: ClockTick, ctx: &mut C);
}

/// Adapter so plain closures can subscribe.
pub struct FnSubscriber<F> {
    name: &'static str,
    f: F,
}

impl<C, F> FrameSubscriber<C> for FnSubscriber<F>
where
    F: FnMut(ClockTick, &mut C),
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_frame(&mut self, tick: ClockTick, ctx: &mut C) {
        (self.f)(tick, ctx)
    }
}

/// Ordered fan-out of frame ticks.
pub struct FrameClock<C> {
    subscribers: Vec<Box<dyn FrameSubscriber<C>>>,
    running: bool,
    frames: u64,
    last_timestamp: Option<f64>,
}

impl<C> FrameClock<C> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            running: false,
            frames: 0,
            last_timestamp: None,
        }
    }

    /// Register a listener. It runs after every listener registered before it.
    pub fn subscribe(&mut self, subscriber: Box<dyn FrameSubscriber<C>>) {
        log::debug!("clock: subscribed '{}'", subscriber.name());
        self.subscribers.push(subscriber);
    }

    /// Register a closure as a listener.
    pub fn subscribe_fn<F>(&mut self, name: &'static str, f: F)
    where
        F: FnMut(ClockTick, &mut C) + 'static,
        C: 'static,
    {
        self.subscribe(Box::new(FnSubscriber { name, f }));
    }

    /// Begin delivering frames. Returns false if the clock was already running;
    /// a second start never creates a second loop.
    pub fn start(&mut self) -> bool {
        if self.running {
            log::warn!("clock: start() called while already running");
            return false;
        }
        self.running = true;
        true
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Deliver one frame to every subscriber.
    ///
    /// Returns `None` without invoking anyone if the clock is stopped or the
    /// timestamp does not move forward (a duplicate callback for a frame that
    /// was already delivered).
    pub fn frame(&mut self, timestamp_ms: f64, ctx: &mut C) -> Option<ClockTick> {
        if !self.running {
            return None;
        }
        if let Some(last) = self.last_timestamp {
            if timestamp_ms <= last {
                return None;
            }
        }
        self.last_timestamp = Some(timestamp_ms);

        let tick = ClockTick {
            timestamp_ms,
            frame: self.frames,
        };
        for subscriber in self.subscribers.iter_mut() {
            subscriber.on_frame(tick, ctx);
        }
        self.frames += 1;
        Some(tick)
    }

    /// Subscriber names in delivery order.
    pub fn subscriber_names(&self) -> Vec<&'static str> {
        self.subscribers.iter().map(|s| s.name()).collect()
    }

    pub fn frames_delivered(&self) -> u64 {
        self.frames
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl<C> Default for FrameClock<C> {
    fn default() -> Self {
        Self::new()
    }
}
