// extensions/timeline.rs
//
// Sequenced tweens. Each step is placed relative to the end of what came
// before it, the way a choreographer writes "start this 0.5 s before the
// previous one ends".
//
// Usage:
//   let tl = Timeline::new()
//       .to(&[counter], &[(Property::Opacity, 0.0)], 0.5, Easing::CubicIn, Position::End)
//       .to(&[title], &[(Property::YPercent, 0.0)], 1.0, Easing::QuartOut, Position::Relative(-0.5))
//       .on_complete(ENTRANCE_DONE);
//   tweens.play(tl);

use super::easing::Easing;
use crate::api::types::ElementId;
use crate::core::elements::Property;

/// Where a step starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    /// At the current end of the timeline.
    End,
    /// Offset from the current end; negative values overlap (`"-=0.5"`).
    Relative(f32),
    /// At an absolute time in seconds.
    At(f32),
}

/// One scheduled step.
#[derive(Debug, Clone)]
pub struct TimelineStep {
    pub targets: Vec<ElementId>,
    pub props: Vec<(Property, f32)>,
    pub duration: f32,
    pub easing: Easing,
    /// Start time in seconds from the beginning of the timeline.
    pub start: f32,
    /// Extra delay added per target index.
    pub stagger: f32,
}

impl TimelineStep {
    /// Time at which the last staggered target finishes.
    pub fn end(&self) -> f32 {
        let extra = self.stagger * self.targets.len().saturating_sub(1) as f32;
        self.start + self.duration + extra
    }
}

/// An ordered set of steps with an optional completion event.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    steps: Vec<TimelineStep>,
    end: f32,
    on_complete: Option<u32>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step animating `props` on every target.
    pub fn to(
        self,
        targets: &[ElementId],
        props: &[(Property, f32)],
        duration: f32,
        easing: Easing,
        position: Position,
    ) -> Self {
        self.to_staggered(targets, props, duration, easing, 0.0, position)
    }

    /// Like [`Timeline::to`], each successive target starting `stagger`
    /// seconds after the previous one.
    pub fn to_staggered(
        mut self,
        targets: &[ElementId],
        props: &[(Property, f32)],
        duration: f32,
        easing: Easing,
        stagger: f32,
        position: Position,
    ) -> Self {
        let start = match position {
            Position::End => self.end,
            Position::Relative(offset) => self.end + offset,
            Position::At(time) => time,
        }
        .max(0.0);

        let step = TimelineStep {
            targets: targets.to_vec(),
            props: props.to_vec(),
            duration: duration.max(0.0),
            easing,
            start,
            stagger: stagger.max(0.0),
        };
        // A step with no targets still occupies its slot, so the rest of the
        // sequence keeps its timing when an optional element is missing.
        self.end = self.end.max(step.end());
        self.steps.push(step);
        self
    }

    /// Event id reported when the whole timeline has played.
    pub fn on_complete(mut self, event_id: u32) -> Self {
        self.on_complete = Some(event_id);
        self
    }

    /// Total length in seconds.
    pub fn duration(&self) -> f32 {
        self.end
    }

    pub fn completion_event(&self) -> Option<u32> {
        self.on_complete
    }

    pub fn steps(&self) -> &[TimelineStep] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<TimelineStep> {
        self.steps
    }
}
