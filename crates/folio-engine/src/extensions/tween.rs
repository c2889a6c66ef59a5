// extensions/tween.rs
//
// Tween engine: animated property transitions on page elements.
// Decoupled from the choreography: subsystems talk to the `Tweener` trait,
// `TweenState` owns the running tweens and applies them to the element store.
//
// Usage:
//   let mut tweens = TweenState::new();
//   tweens.add(id, &[(Property::X, 40.0)], TweenSpec::new(0.5, Easing::CubicOut));
//   tweens.tick(dt, &mut elements);  // Advances all tweens, writes transforms

use std::collections::HashMap;

use super::easing::{ease, Easing};
use super::timeline::Timeline;
use crate::api::types::ElementId;
use crate::core::elements::{ElementStore, Property};

/// What happens when a tween completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenLoop {
    /// Stop and remove the tween.
    #[default]
    Once,
    /// Restart from the beginning, forever.
    Loop,
    /// Reverse direction (ping-pong), forever.
    PingPong,
}

/// Timing of a tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSpec {
    /// Duration in seconds.
    pub duration: f32,
    pub easing: Easing,
    /// Seconds to wait before starting.
    pub delay: f32,
    pub loop_mode: TweenLoop,
}

impl TweenSpec {
    pub fn new(duration: f32, easing: Easing) -> Self {
        Self {
            duration,
            easing,
            delay: 0.0,
            loop_mode: TweenLoop::Once,
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn with_loop(mut self, mode: TweenLoop) -> Self {
        self.loop_mode = mode;
        self
    }
}

/// Handle to a tween for later reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(pub u32);

/// Handle to a playing timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimelineId(pub u32);

/// One property animated by a tween. `from` is captured when the tween
/// actually starts, so delayed tweens pick up whatever came before them.
#[derive(Debug, Clone, Copy)]
struct Track {
    property: Property,
    from: Option<f32>,
    to: f32,
}

/// A single tween animation.
#[derive(Debug, Clone)]
pub struct Tween {
    pub element: ElementId,
    tracks: Vec<Track>,
    pub spec: TweenSpec,
    /// Time since the tween was added, including the delay.
    pub elapsed: f32,
    /// For ping-pong: current direction (true = forward).
    forward: bool,
}

impl Tween {
    fn new(element: ElementId, props: &[(Property, f32)], spec: TweenSpec) -> Self {
        Self {
            element,
            tracks: props
                .iter()
                .map(|&(property, to)| Track { property, from: None, to })
                .collect(),
            spec,
            elapsed: 0.0,
            forward: true,
        }
    }

    /// Normalized progress [0, 1], ignoring the delay.
    pub fn progress(&self) -> f32 {
        if self.spec.duration <= 0.0 {
            if self.elapsed >= self.spec.delay { 1.0 } else { 0.0 }
        } else {
            ((self.elapsed - self.spec.delay) / self.spec.duration).clamp(0.0, 1.0)
        }
    }

    /// Properties this tween writes.
    pub fn properties(&self) -> impl Iterator<Item = Property> + '_ {
        self.tracks.iter().map(|t| t.property)
    }

    /// Destination value for `property`, if this tween animates it.
    pub fn target_of(&self, property: Property) -> Option<f32> {
        self.tracks.iter().find(|t| t.property == property).map(|t| t.to)
    }

    fn apply(&mut self, t: f32, elements: &mut ElementStore) {
        let Some(element) = elements.get_mut(self.element) else {
            return;
        };
        for track in self.tracks.iter_mut() {
            let from = *track.from.get_or_insert_with(|| element.transform.get(track.property));
            let value = if t >= 1.0 {
                // Land exactly on the destination; no residue from the curve
                track.to
            } else {
                ease(from, track.to, t, self.spec.easing)
            };
            element.transform.set(track.property, value);
        }
    }
}

/// The tween-engine surface the choreography consumes.
pub trait Tweener {
    /// Write property values now, cancelling any tween of those properties.
    fn set_immediate(&mut self, target: ElementId, props: &[(Property, f32)]);

    /// Animate properties from their current values. A new tween takes the
    /// listed properties over from any earlier tween on the same element.
    fn animate_to(&mut self, target: ElementId, props: &[(Property, f32)], spec: TweenSpec) -> TweenId;

    /// Play a sequenced timeline. Its completion event is reported through
    /// [`TweenState::drain_completed`].
    fn play(&mut self, timeline: Timeline) -> TimelineId;
}

#[derive(Debug)]
struct TimelineRun {
    id: TimelineId,
    elapsed: f32,
    duration: f32,
    members: Vec<TweenId>,
    on_complete: Option<u32>,
}

/// Manages all active tweens and timelines.
#[derive(Debug, Default)]
pub struct TweenState {
    tweens: HashMap<TweenId, Tween>,
    /// Insertion order, so ticks are deterministic.
    order: Vec<TweenId>,
    timelines: Vec<TimelineRun>,
    next_id: u32,
    /// Completed timeline events to be polled.
    completed_events: Vec<u32>,
}

impl TweenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tween for an element. Returns a handle for later control.
    pub fn add(&mut self, element: ElementId, props: &[(Property, f32)], spec: TweenSpec) -> TweenId {
        for &(property, _) in props {
            self.kill_property(element, property);
        }
        self.insert(element, props, spec)
    }

    fn insert(&mut self, element: ElementId, props: &[(Property, f32)], spec: TweenSpec) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens.insert(id, Tween::new(element, props, spec));
        self.order.push(id);
        id
    }

    /// Stop animating `property` on `element`. Tweens left with nothing to
    /// animate are removed.
    pub fn kill_property(&mut self, element: ElementId, property: Property) {
        let mut emptied = Vec::new();
        for (&id, tween) in self.tweens.iter_mut() {
            if tween.element != element {
                continue;
            }
            tween.tracks.retain(|t| t.property != property);
            if tween.tracks.is_empty() {
                emptied.push(id);
            }
        }
        for id in emptied {
            self.remove(id);
        }
    }

    /// Remove a tween by handle.
    pub fn remove(&mut self, id: TweenId) -> bool {
        self.order.retain(|o| *o != id);
        self.tweens.remove(&id).is_some()
    }

    /// Remove all tweens for an element.
    pub fn remove_element(&mut self, element: ElementId) {
        let ids: Vec<TweenId> = self
            .tweens
            .iter()
            .filter(|(_, t)| t.element == element)
            .map(|(id, _)| *id)
            .collect();
        for id in ids {
            self.remove(id);
        }
    }

    /// Get a tween by handle.
    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.tweens.get(&id)
    }

    /// The tween currently driving `property` on `element`, if any.
    pub fn active_for(&self, element: ElementId, property: Property) -> Option<&Tween> {
        self.order
            .iter()
            .filter_map(|id| self.tweens.get(id))
            .find(|t| t.element == element && t.target_of(property).is_some())
    }

    /// Schedule every step of a timeline as a delayed tween.
    pub fn play(&mut self, timeline: Timeline) -> TimelineId {
        let id = TimelineId(self.next_id);
        self.next_id += 1;

        let duration = timeline.duration();
        let on_complete = timeline.completion_event();
        let steps = timeline.into_steps();

        // The timeline takes its properties over from outside tweens, but its
        // own steps may animate the same property one after another.
        for step in &steps {
            for &target in &step.targets {
                for &(property, _) in &step.props {
                    self.kill_property(target, property);
                }
            }
        }

        let mut members = Vec::new();
        for step in steps {
            for (i, &target) in step.targets.iter().enumerate() {
                let spec = TweenSpec::new(step.duration, step.easing)
                    .with_delay(step.start + step.stagger * i as f32);
                members.push(self.insert(target, &step.props, spec));
            }
        }
        self.timelines.push(TimelineRun {
            id,
            elapsed: 0.0,
            duration,
            members,
            on_complete,
        });
        id
    }

    /// Whether a timeline is still running.
    pub fn is_playing(&self, id: TimelineId) -> bool {
        self.timelines.iter().any(|run| run.id == id)
    }

    /// Advance all tweens and timelines, writing results into `elements`.
    /// Returns the number of tweens that completed this tick.
    pub fn tick(&mut self, dt: f32, elements: &mut ElementStore) -> usize {
        let mut completed = Vec::new();

        for &id in self.order.iter() {
            let Some(tween) = self.tweens.get_mut(&id) else {
                continue;
            };

            let was_waiting = tween.elapsed < tween.spec.delay;
            tween.elapsed += dt;
            if tween.elapsed < tween.spec.delay {
                continue;
            }
            if was_waiting && tween.spec.duration > 0.0 {
                // First frame past the delay: capture start values
                tween.apply(0.0, elements);
            }

            let raw_t = tween.progress();
            let t = if tween.forward { raw_t } else { 1.0 - raw_t };
            tween.apply(t, elements);

            // Handle completion
            if raw_t >= 1.0 {
                match tween.spec.loop_mode {
                    TweenLoop::Once => completed.push(id),
                    TweenLoop::Loop => {
                        // Overshoot carries into the next cycle so loops keep wall-clock pace
                        let over = tween.elapsed - tween.spec.delay - tween.spec.duration;
                        let carried = if tween.spec.duration > 0.0 {
                            over.max(0.0) % tween.spec.duration
                        } else {
                            0.0
                        };
                        tween.elapsed = tween.spec.delay + carried;
                        let t = tween.progress();
                        tween.apply(t, elements);
                    }
                    TweenLoop::PingPong => {
                        tween.elapsed = tween.spec.delay;
                        tween.forward = !tween.forward;
                    }
                }
            }
        }

        let count = completed.len();
        for id in completed {
            self.remove(id);
        }

        self.tick_timelines(dt, elements);
        count
    }

    fn tick_timelines(&mut self, dt: f32, elements: &mut ElementStore) {
        let mut finished = Vec::new();
        for run in self.timelines.iter_mut() {
            run.elapsed += dt;
            if run.elapsed >= run.duration {
                finished.push(run.id);
            }
        }
        for id in finished {
            let Some(pos) = self.timelines.iter().position(|r| r.id == id) else {
                continue;
            };
            let run = self.timelines.remove(pos);
            // Members still running by a rounding hair are snapped to their end
            for member in run.members {
                if let Some(mut tween) = self.tweens.get(&member).cloned() {
                    tween.apply(1.0, elements);
                    self.remove(member);
                }
            }
            if let Some(event_id) = run.on_complete {
                self.completed_events.push(event_id);
            }
        }
    }

    /// Drain completed timeline events.
    pub fn drain_completed(&mut self) -> impl Iterator<Item = u32> + '_ {
        self.completed_events.drain(..)
    }

    /// Number of active tweens.
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    /// Whether there are no active tweens.
    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Clear all tweens and timelines.
    pub fn clear(&mut self) {
        self.tweens.clear();
        self.order.clear();
        self.timelines.clear();
        self.completed_events.clear();
    }
}

/// A [`Tweener`] bound to the element store it writes into.
pub struct Animator<'a> {
    pub tweens: &'a mut TweenState,
    pub elements: &'a mut ElementStore,
}

impl<'a> Animator<'a> {
    pub fn new(tweens: &'a mut TweenState, elements: &'a mut ElementStore) -> Self {
        Self { tweens, elements }
    }
}

impl Tweener for Animator<'_> {
    fn set_immediate(&mut self, target: ElementId, props: &[(Property, f32)]) {
        for &(property, _) in props {
            self.tweens.kill_property(target, property);
        }
        if let Some(element) = self.elements.get_mut(target) {
            for &(property, value) in props {
                element.transform.set(property, value);
            }
        }
    }

    fn animate_to(&mut self, target: ElementId, props: &[(Property, f32)], spec: TweenSpec) -> TweenId {
        self.tweens.add(target, props, spec)
    }

    fn play(&mut self, timeline: Timeline) -> TimelineId {
        self.tweens.play(timeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::elements::Element;
    use crate::extensions::timeline::Position;

    fn store_with(id: ElementId) -> ElementStore {
        let mut store = ElementStore::new();
        store.insert(Element::new(id));
        store
    }

    #[test]
    fn tween_position() {
        let mut tweens = TweenState::new();
        let id = ElementId(1);
        let mut store = store_with(id);

        tweens.add(id, &[(Property::X, 100.0)], TweenSpec::new(1.0, Easing::Linear));

        // Tick halfway
        tweens.tick(0.5, &mut store);
        assert!((store.get(id).unwrap().transform.x - 50.0).abs() < 0.01);

        // Tick to completion
        tweens.tick(0.5, &mut store);
        assert_eq!(store.get(id).unwrap().transform.x, 100.0);

        // Tween should be removed
        assert!(tweens.is_empty());
    }

    #[test]
    fn tween_loop() {
        let mut tweens = TweenState::new();
        let id = ElementId(1);
        let mut store = store_with(id);

        tweens.add(
            id,
            &[(Property::XPercent, -50.0)],
            TweenSpec::new(1.0, Easing::Linear).with_loop(TweenLoop::Loop),
        );

        // Complete one cycle
        tweens.tick(1.0, &mut store);

        // Tween should still exist and restart from the captured start
        assert_eq!(tweens.len(), 1);
        assert_eq!(store.get(id).unwrap().transform.x_percent, 0.0);
        tweens.tick(0.5, &mut store);
        assert!((store.get(id).unwrap().transform.x_percent + 25.0).abs() < 0.01);
    }

    #[test]
    fn tween_loop_carries_overshoot() {
        let mut tweens = TweenState::new();
        let id = ElementId(1);
        let mut store = store_with(id);

        tweens.add(
            id,
            &[(Property::XPercent, -50.0)],
            TweenSpec::new(1.0, Easing::Linear).with_loop(TweenLoop::Loop),
        );

        // A quarter cycle past the end lands a quarter into the next cycle
        tweens.tick(1.25, &mut store);
        assert!((store.get(id).unwrap().transform.x_percent + 12.5).abs() < 1e-4);
        tweens.tick(0.25, &mut store);
        assert!((store.get(id).unwrap().transform.x_percent + 25.0).abs() < 1e-4);
    }

    #[test]
    fn tween_ping_pong() {
        let mut tweens = TweenState::new();
        let id = ElementId(1);
        let mut store = store_with(id);

        tweens.add(
            id,
            &[(Property::X, 100.0)],
            TweenSpec::new(1.0, Easing::Linear).with_loop(TweenLoop::PingPong),
        );

        // Go to end
        tweens.tick(1.0, &mut store);
        assert!((store.get(id).unwrap().transform.x - 100.0).abs() < 0.01);

        // Go back to start
        tweens.tick(1.0, &mut store);
        assert!((store.get(id).unwrap().transform.x - 0.0).abs() < 0.01);
    }

    #[test]
    fn delay_defers_start_value_capture() {
        let mut tweens = TweenState::new();
        let id = ElementId(1);
        let mut store = store_with(id);

        tweens.add(id, &[(Property::Y, 10.0)], TweenSpec::new(1.0, Easing::Linear).with_delay(1.0));
        tweens.tick(0.5, &mut store);
        assert_eq!(store.get(id).unwrap().transform.y, 0.0);

        // Something else moves y before the delayed tween starts
        store.get_mut(id).unwrap().transform.y = 4.0;
        tweens.tick(0.5, &mut store);
        tweens.tick(0.5, &mut store);
        assert!((store.get(id).unwrap().transform.y - 7.0).abs() < 0.01);
    }

    #[test]
    fn later_tween_takes_over_property() {
        let mut tweens = TweenState::new();
        let id = ElementId(1);
        let mut store = store_with(id);

        tweens.add(id, &[(Property::X, 100.0), (Property::Scale, 2.0)], TweenSpec::new(1.0, Easing::Linear));
        tweens.tick(0.5, &mut store);
        tweens.add(id, &[(Property::X, 0.0)], TweenSpec::new(0.5, Easing::Linear));
        assert_eq!(tweens.len(), 2);

        tweens.tick(0.5, &mut store);
        let t = store.get(id).unwrap().transform;
        assert_eq!(t.x, 0.0);
        assert_eq!(t.scale, 2.0);
        assert!(tweens.is_empty());
    }

    #[test]
    fn set_immediate_cancels_tween() {
        let mut tweens = TweenState::new();
        let id = ElementId(1);
        let mut store = store_with(id);

        tweens.add(id, &[(Property::Opacity, 0.0)], TweenSpec::new(1.0, Easing::Linear));
        Animator::new(&mut tweens, &mut store).set_immediate(id, &[(Property::Opacity, 0.25)]);
        assert!(tweens.is_empty());
        tweens.tick(1.0, &mut store);
        assert_eq!(store.get(id).unwrap().transform.opacity, 0.25);
    }

    #[test]
    fn timeline_reports_completion_once() {
        let mut tweens = TweenState::new();
        let a = ElementId(1);
        let mut store = store_with(a);

        let timeline = Timeline::new()
            .to(&[a], &[(Property::Y, -50.0)], 0.5, Easing::CubicIn, Position::End)
            .to(&[a], &[(Property::Opacity, 0.0)], 0.5, Easing::Linear, Position::End)
            .on_complete(7);
        let tl = tweens.play(timeline);
        assert!(tweens.is_playing(tl));

        tweens.tick(0.6, &mut store);
        assert_eq!(tweens.drain_completed().count(), 0);
        tweens.tick(0.6, &mut store);
        let events: Vec<u32> = tweens.drain_completed().collect();
        assert_eq!(events, vec![7]);
        assert!(!tweens.is_playing(tl));

        let t = store.get(a).unwrap().transform;
        assert_eq!(t.y, -50.0);
        assert_eq!(t.opacity, 0.0);

        tweens.tick(1.0, &mut store);
        assert_eq!(tweens.drain_completed().count(), 0);
    }

    #[test]
    fn timeline_steps_on_same_property_run_in_sequence() {
        let mut tweens = TweenState::new();
        let a = ElementId(1);
        let mut store = store_with(a);

        let timeline = Timeline::new()
            .to(&[a], &[(Property::X, 10.0)], 1.0, Easing::Linear, Position::End)
            .to(&[a], &[(Property::X, 0.0)], 1.0, Easing::Linear, Position::End);
        tweens.play(timeline);
        assert_eq!(tweens.len(), 2);

        tweens.tick(1.0, &mut store);
        assert_eq!(store.get(a).unwrap().transform.x, 10.0);
        tweens.tick(0.5, &mut store);
        assert!((store.get(a).unwrap().transform.x - 5.0).abs() < 0.01);
    }

    #[test]
    fn remove_element_tweens() {
        let mut tweens = TweenState::new();
        let id = ElementId(1);

        tweens.add(id, &[(Property::X, 1.0)], TweenSpec::new(1.0, Easing::Linear));
        tweens.add(id, &[(Property::Opacity, 0.0)], TweenSpec::new(1.0, Easing::Linear));

        assert_eq!(tweens.len(), 2);
        tweens.remove_element(id);
        assert!(tweens.is_empty());
    }
}
