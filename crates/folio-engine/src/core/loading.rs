//! Loading gate: the simulated 0-100 % preloader and the single doorway into
//! the interactive page.
//!
//! ```text
//! Idle ──start(cold)──> Loading ──progress == 100──> EnteringTransition ──entrance done──> Interactive
//!   └─────────────────────────start(warm)─────────────────────────────────────────────────────┘
//! ```
//!
//! Both paths end in the same private transition, which consumes the
//! registered initialization hook. The hook is an `FnOnce` held in an
//! `Option`, so it can run at most once no matter which path fires.

use super::rng::Rng;
use super::time::IntervalTimer;

/// Gate state. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LoadState {
    Idle,
    Loading,
    EnteringTransition,
    Interactive,
}

impl LoadState {
    /// Numeric code written into the host protocol header.
    pub fn code(self) -> u8 {
        match self {
            LoadState::Idle => 0,
            LoadState::Loading => 1,
            LoadState::EnteringTransition => 2,
            LoadState::Interactive => 3,
        }
    }
}

/// Whether the document had already finished loading when the gate started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Fresh navigation: run the preloader.
    Cold,
    /// Already complete (refresh, back/forward restore): skip straight in.
    Warm,
}

/// Something observable the gate did during a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateEvent {
    /// The counter moved to this value.
    Progress(u8),
    /// Progress hit 100 and the timer was cancelled; play the entrance now.
    EntranceRequested,
    /// The page is interactive and initialization has run.
    Interactive,
}

/// Tuning for the simulated preloader.
#[derive(Debug, Clone, Copy)]
pub struct LoadingConfig {
    pub interval_ms: f64,
    pub increment_min: u32,
    pub increment_max: u32,
    pub seed: u64,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 40.0,
            increment_min: 1,
            increment_max: 10,
            seed: 42,
        }
    }
}

type InitHook<C> = Box<dyn FnOnce(&mut C)>;

/// The preloader state machine. `C` is whatever the initialization hook mutates.
pub struct LoadingGate<C> {
    state: LoadState,
    progress: u8,
    timer: IntervalTimer,
    rng: Rng,
    increment_min: u32,
    increment_max: u32,
    preloader_hidden: bool,
    on_interactive: Option<InitHook<C>>,
}

impl<C> LoadingGate<C> {
    pub fn new(config: &LoadingConfig) -> Self {
        Self {
            state: LoadState::Idle,
            progress: 0,
            timer: IntervalTimer::new(config.interval_ms),
            rng: Rng::new(config.seed),
            increment_min: config.increment_min.max(1),
            increment_max: config.increment_max.max(config.increment_min.max(1)),
            preloader_hidden: false,
            on_interactive: None,
        }
    }

    /// Register the initialization entry point. Replaces any earlier hook
    /// that has not run yet.
    pub fn on_interactive(&mut self, hook: impl FnOnce(&mut C) + 'static) {
        if self.state == LoadState::Interactive {
            log::warn!("loading: hook registered after the page became interactive; ignored");
            return;
        }
        self.on_interactive = Some(Box::new(hook));
    }

    /// Leave `Idle`. Cold starts begin counting; warm starts hide the
    /// preloader and initialize immediately. No-op outside `Idle`.
    pub fn start(&mut self, readiness: Readiness, target: &mut C) -> Option<GateEvent> {
        if self.state != LoadState::Idle {
            log::warn!("loading: start() ignored in state {:?}", self.state);
            return None;
        }
        match readiness {
            Readiness::Cold => {
                self.progress = 0;
                self.state = LoadState::Loading;
                log::info!("loading: started");
                Some(GateEvent::Progress(0))
            }
            Readiness::Warm => {
                self.timer.cancel();
                self.preloader_hidden = true;
                self.progress = 100;
                log::info!("loading: document already complete, skipping preloader");
                self.enter_interactive(target);
                Some(GateEvent::Interactive)
            }
        }
    }

    /// Feed elapsed host time into the interval timer and run every due step
    /// with a random increment. Stops at the first step that reaches 100.
    pub fn advance(&mut self, elapsed_ms: f64) -> Vec<GateEvent> {
        let mut events = Vec::new();
        if self.state != LoadState::Loading {
            return events;
        }
        let fires = self.timer.accumulate(elapsed_ms);
        for _ in 0..fires {
            if self.timer.is_cancelled() {
                break;
            }
            let increment = self.rng.range_inclusive(self.increment_min, self.increment_max);
            if let Some(event) = self.step(increment) {
                events.push(event);
            }
        }
        events
    }

    /// One timer fire with an explicit increment. The counter is clamped to
    /// 100; reaching it cancels the timer and requests the entrance. Fires
    /// after cancellation are ignored.
    pub fn step(&mut self, increment: u32) -> Option<GateEvent> {
        if self.state != LoadState::Loading || self.timer.is_cancelled() {
            return None;
        }
        let next = (self.progress as u32).saturating_add(increment).min(100) as u8;
        self.progress = next;
        if next == 100 {
            self.timer.cancel();
            self.state = LoadState::EnteringTransition;
            log::info!("loading: complete, entering");
            Some(GateEvent::EntranceRequested)
        } else {
            Some(GateEvent::Progress(next))
        }
    }

    /// The entrance sequence finished. Returns true if this call made the
    /// page interactive.
    pub fn finish_entrance(&mut self, target: &mut C) -> bool {
        if self.state != LoadState::EnteringTransition {
            return false;
        }
        self.preloader_hidden = true;
        self.enter_interactive(target);
        true
    }

    fn enter_interactive(&mut self, target: &mut C) {
        self.state = LoadState::Interactive;
        log::info!("loading: interactive");
        if let Some(hook) = self.on_interactive.take() {
            hook(target);
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Counter text, e.g. `"42%"`.
    pub fn counter_label(&self) -> String {
        format!("{}%", self.progress)
    }

    /// Explicit flag replacing any inference from the preloader's styling.
    pub fn preloader_hidden(&self) -> bool {
        self.preloader_hidden
    }

    pub fn timer_cancelled(&self) -> bool {
        self.timer.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Target {
        inits: u32,
    }

    fn gate() -> LoadingGate<Target> {
        let mut gate = LoadingGate::new(&LoadingConfig::default());
        gate.on_interactive(|t: &mut Target| t.inits += 1);
        gate
    }

    #[test]
    fn scripted_increments_reach_entrance() {
        let mut target = Target::default();
        let mut g = gate();
        g.start(Readiness::Cold, &mut target);
        assert_eq!(g.step(30), Some(GateEvent::Progress(30)));
        assert_eq!(g.step(40), Some(GateEvent::Progress(70)));
        assert_eq!(g.step(40), Some(GateEvent::EntranceRequested));
        assert_eq!(g.progress(), 100);
        assert_eq!(g.state(), LoadState::EnteringTransition);
        assert!(g.timer_cancelled());
        // Already-scheduled fires are swallowed
        assert_eq!(g.step(5), None);
        assert!(g.advance(1000.0).is_empty());
        assert_eq!(target.inits, 0);
    }

    #[test]
    fn oversized_increments_clamp_at_one_hundred() {
        let mut target = Target::default();
        let mut g = gate();
        g.start(Readiness::Cold, &mut target);
        assert_eq!(g.step(5), Some(GateEvent::Progress(5)));
        assert_eq!(g.step(u32::MAX), Some(GateEvent::EntranceRequested));
        assert_eq!(g.progress(), 100);

        let config = LoadingConfig {
            increment_min: u32::MAX - 1,
            increment_max: u32::MAX,
            ..LoadingConfig::default()
        };
        let mut g: LoadingGate<Target> = LoadingGate::new(&config);
        g.start(Readiness::Cold, &mut target);
        assert_eq!(g.advance(40.0), vec![GateEvent::EntranceRequested]);
    }

    #[test]
    fn finish_entrance_initializes_once() {
        let mut target = Target::default();
        let mut g = gate();
        g.start(Readiness::Cold, &mut target);
        g.step(100);
        assert!(g.finish_entrance(&mut target));
        assert!(!g.finish_entrance(&mut target));
        assert_eq!(g.state(), LoadState::Interactive);
        assert_eq!(target.inits, 1);
        assert!(g.preloader_hidden());
    }

    #[test]
    fn warm_start_skips_loading() {
        let mut target = Target::default();
        let mut g = gate();
        assert_eq!(g.start(Readiness::Warm, &mut target), Some(GateEvent::Interactive));
        assert_eq!(g.state(), LoadState::Interactive);
        assert_eq!(target.inits, 1);
        // Neither path can run the hook again
        assert_eq!(g.start(Readiness::Cold, &mut target), None);
        assert!(!g.finish_entrance(&mut target));
        assert_eq!(g.step(100), None);
        assert_eq!(target.inits, 1);
        assert!(g.preloader_hidden());
    }

    #[test]
    fn random_runs_are_monotonic_and_clamped() {
        for seed in 1..200u64 {
            let mut target = Target::default();
            let mut g = LoadingGate::new(&LoadingConfig { seed, ..LoadingConfig::default() });
            g.on_interactive(|t: &mut Target| t.inits += 1);
            g.start(Readiness::Cold, &mut target);

            let mut last = 0u8;
            let mut entrances = 0;
            for _ in 0..200 {
                for event in g.advance(16.7) {
                    match event {
                        GateEvent::Progress(p) => {
                            assert!(p >= last, "seed {}: {} after {}", seed, p, last);
                            assert!(p <= 100);
                            last = p;
                        }
                        GateEvent::EntranceRequested => entrances += 1,
                        GateEvent::Interactive => unreachable!(),
                    }
                }
                assert!(g.progress() >= last);
                assert!(g.progress() <= 100);
            }
            assert_eq!(entrances, 1, "seed {}", seed);
            assert_eq!(g.progress(), 100);
        }
    }

    #[test]
    fn each_fire_adds_between_one_and_ten() {
        let mut target = Target::default();
        let mut g = gate();
        g.start(Readiness::Cold, &mut target);
        let mut last = 0u8;
        while g.state() == LoadState::Loading {
            for event in g.advance(40.0) {
                if let GateEvent::Progress(p) = event {
                    let step = p - last;
                    assert!((1..=10).contains(&step), "step {}", step);
                    last = p;
                }
            }
        }
    }

    #[test]
    fn counter_label_formats_percent() {
        let mut target = Target::default();
        let mut g = gate();
        g.start(Readiness::Cold, &mut target);
        g.step(42);
        assert_eq!(g.counter_label(), "42%");
    }
}
