use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::{ElementId, Viewport};
use crate::assets::manifest::PageManifest;
use crate::bridge::protocol::FrameSummary;
use crate::core::clock::FrameClock;
use crate::core::elements::{ElementStore, HoverSkin, Property, Role};
use crate::core::loading::{GateEvent, LoadState, LoadingConfig, LoadingGate, Readiness};
use crate::core::rng::Rng;
use crate::core::time::FrameTimer;
use crate::extensions::tween::{Animator, TimelineId, TweenState, Tweener};
use crate::input::pointer::{PointerSnapshot, PointerTracker};
use crate::input::queue::InputEvent;
use crate::motion::follower::CursorFollower;
use crate::motion::magnetic::{HoverSkinToggle, MagneticConfig, MagneticController};
use crate::particles::camera::PerspectiveCamera;
use crate::particles::field::{ParticleCloud, ParticleField, SceneStats, WaveParams};
use crate::renderer::traits::SceneRenderer;
use crate::scroll::reveal::{RevealConfig, RevealTriggers};
use crate::scroll::sync::{handle_anchor_click, AnchorOutcome, ScrollSync};
use crate::scroll::virtualizer::{MomentumScroll, ScrollVirtualizer};
use crate::systems::entrance::{entrance_timeline, prime_entrance, ENTRANCE_COMPLETE_EVENT};
use crate::systems::marquee::start_marquee;

/// Tuning constants for the page. Every field has a default, so a manifest
/// only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Preloader step period (default: 40 ms).
    pub loading_interval_ms: f64,
    /// Inclusive range of each preloader increment (default: 1..=10).
    pub increment_min: u32,
    pub increment_max: u32,
    /// Seed for preloader increments and the particle layout.
    pub seed: u64,
    /// Follower smoothing per reference frame (default: 0.15).
    pub follower_smoothing: f32,
    /// Half the inner dot's size in pixels (default: 3).
    pub inner_cursor_offset: f32,
    /// Half the follower ring's size in pixels (default: 20).
    pub outer_cursor_offset: f32,
    /// Nominal frame length the damping constants assume (default: 1000/60 ms).
    pub reference_delta_ms: f64,
    /// Gaps longer than this count as `lag_adjusted_ms`.
    pub lag_threshold_ms: f64,
    pub lag_adjusted_ms: f64,
    pub magnetic_strength: f32,
    pub magnetic_follow_duration: f32,
    pub magnetic_return_duration: f32,
    pub hover_ring_scale: f32,
    pub hover_ring_opacity: f32,
    pub hover_ring_duration: f32,
    pub particle_count: usize,
    pub particle_half_width: f32,
    pub wave_time_step: f32,
    pub rotation_step: f32,
    pub wave_amplitude: f32,
    pub wave_frequency: f32,
    pub camera_damping: f32,
    pub camera_fov: f32,
    pub camera_near: f32,
    pub camera_far: f32,
    pub camera_z: f32,
    pub scroll_duration: f32,
    /// Clock milliseconds to scroller time units.
    pub scroll_time_scale: f64,
    pub reveal_threshold: f32,
    pub reveal_distance: f32,
    pub reveal_duration: f32,
    pub marquee_shift_percent: f32,
    pub marquee_period: f32,
    /// Capacity of the host element buffer (default: 256).
    pub max_elements: usize,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            loading_interval_ms: 40.0,
            increment_min: 1,
            increment_max: 10,
            seed: 42,
            follower_smoothing: 0.15,
            inner_cursor_offset: 3.0,
            outer_cursor_offset: 20.0,
            reference_delta_ms: 1000.0 / 60.0,
            lag_threshold_ms: 500.0,
            lag_adjusted_ms: 33.0,
            magnetic_strength: 0.3,
            magnetic_follow_duration: 0.5,
            magnetic_return_duration: 0.8,
            hover_ring_scale: 1.5,
            hover_ring_opacity: 0.5,
            hover_ring_duration: 0.3,
            particle_count: 3000,
            particle_half_width: 7.5,
            wave_time_step: 0.001,
            rotation_step: 0.0005,
            wave_amplitude: 0.002,
            wave_frequency: 0.5,
            camera_damping: 0.05,
            camera_fov: 75.0,
            camera_near: 0.1,
            camera_far: 1000.0,
            camera_z: 3.0,
            scroll_duration: 1.2,
            scroll_time_scale: 1.0,
            reveal_threshold: 0.85,
            reveal_distance: 50.0,
            reveal_duration: 1.2,
            marquee_shift_percent: -50.0,
            marquee_period: 20.0,
            max_elements: 256,
        }
    }
}

impl PageConfig {
    pub fn loading(&self) -> LoadingConfig {
        LoadingConfig {
            interval_ms: self.loading_interval_ms,
            increment_min: self.increment_min,
            increment_max: self.increment_max,
            seed: self.seed,
        }
    }

    /// A fresh frame timer. Each subsystem owns one.
    pub fn frame_timer(&self) -> FrameTimer {
        FrameTimer::new(self.reference_delta_ms)
            .with_lag_smoothing(self.lag_threshold_ms, self.lag_adjusted_ms)
    }

    pub fn magnetic(&self) -> MagneticConfig {
        MagneticConfig {
            strength: self.magnetic_strength,
            follow_duration: self.magnetic_follow_duration,
            return_duration: self.magnetic_return_duration,
            ring_scale: self.hover_ring_scale,
            ring_opacity: self.hover_ring_opacity,
            ring_duration: self.hover_ring_duration,
        }
    }

    pub fn wave(&self) -> WaveParams {
        WaveParams {
            time_step: self.wave_time_step,
            rotation_step: self.rotation_step,
            amplitude: self.wave_amplitude,
            frequency: self.wave_frequency,
        }
    }

    pub fn reveal(&self) -> RevealConfig {
        RevealConfig {
            threshold: self.reveal_threshold,
            distance: self.reveal_distance,
            duration: self.reveal_duration,
        }
    }
}

/// Shared state handed to every clock subscriber.
///
/// The pointer is a read-only snapshot refreshed once per frame by the page;
/// subscribers can read it but have no way to write it.
pub struct PageContext {
    pub elements: ElementStore,
    pub tweens: TweenState,
    pub scroll: Box<dyn ScrollVirtualizer>,
    pub viewport: Viewport,
    /// Written by the particle field after each render.
    pub scene: Option<SceneStats>,
    pointer: PointerSnapshot,
}

impl PageContext {
    pub fn new(elements: ElementStore, scroll: Box<dyn ScrollVirtualizer>, viewport: Viewport) -> Self {
        Self {
            elements,
            tweens: TweenState::new(),
            scroll,
            viewport,
            scene: None,
            pointer: PointerSnapshot {
                position: Vec2::ZERO,
                viewport,
            },
        }
    }

    pub fn pointer(&self) -> PointerSnapshot {
        self.pointer
    }

    /// Tween requests that write into this page's elements.
    pub fn animator(&mut self) -> Animator<'_> {
        Animator::new(&mut self.tweens, &mut self.elements)
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll.offset()
    }

    fn refresh_scroll_limit(&mut self) {
        let limit = self.elements.content_height() - self.viewport.height;
        self.scroll.set_limit(limit.max(0.0));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CursorRig {
    ring: ElementId,
    dot: ElementId,
}

/// Everything the initialization hook touches.
pub struct PageState {
    pub ctx: PageContext,
    clock: FrameClock<PageContext>,
    config: PageConfig,
    renderer: Option<Box<dyn SceneRenderer>>,
    cursor: Option<CursorRig>,
    magnetic: Option<MagneticController>,
    hover_skin: Option<HoverSkinToggle>,
    rng: Rng,
    init_count: u32,
}

impl PageState {
    /// The single initialization entry point, reached from either the warm
    /// start or the end of the entrance. Each optional feature is checked on
    /// its own so a missing element only disables that feature.
    fn initialize(&mut self) {
        self.init_count += 1;
        let config = self.config.clone();
        let elements = &self.ctx.elements;

        self.clock
            .subscribe(Box::new(ScrollSync::new(config.scroll_time_scale)));

        let ring = elements.first_with_role(Role::CursorOuter);
        let dot = elements.first_with_role(Role::CursorInner);
        match (ring, dot) {
            (Some(ring), Some(dot)) => {
                self.cursor = Some(CursorRig { ring, dot });
                self.clock.subscribe(Box::new(CursorFollower::new(
                    ring,
                    config.follower_smoothing,
                    config.outer_cursor_offset,
                    config.frame_timer(),
                )));
                self.hover_skin = Some(HoverSkinToggle::new(ring, dot));

                let magnetic = elements.ids_with_role(Role::Magnetic);
                if magnetic.is_empty() {
                    log::info!("init: no magnetic elements");
                } else {
                    log::info!("init: {} magnetic elements", magnetic.len());
                    self.magnetic = Some(MagneticController::new(&magnetic, ring, config.magnetic()));
                }
            }
            _ => log::warn!("init: cursor elements missing, follower and hover effects disabled"),
        }

        let container = elements.first_with_role(Role::ParticleContainer);
        match (container, self.renderer.take()) {
            (Some(_), Some(renderer)) => {
                let cloud = ParticleCloud::random(config.particle_count, config.particle_half_width, &mut self.rng);
                let camera = PerspectiveCamera::new(
                    config.camera_fov,
                    self.ctx.viewport.aspect(),
                    config.camera_near,
                    config.camera_far,
                    config.camera_z,
                );
                log::info!("init: particle field, {} points on {}", cloud.len(), renderer.backend());
                self.clock.subscribe(Box::new(ParticleField::new(
                    cloud,
                    config.wave(),
                    camera,
                    config.camera_damping,
                    renderer,
                    config.frame_timer(),
                    self.ctx.viewport,
                )));
            }
            (None, _) => log::info!("init: no particle container"),
            (Some(_), None) => log::warn!("init: particle container present but no renderer"),
        }

        if let Some(marquee) = self.ctx.elements.first_with_role(Role::Marquee) {
            start_marquee(
                &mut self.ctx.animator(),
                marquee,
                config.marquee_shift_percent,
                config.marquee_period,
            );
        }

        let reveals = self.ctx.elements.ids_with_role(Role::Reveal);
        if !reveals.is_empty() {
            let triggers = RevealTriggers::new(reveals, config.reveal());
            triggers.prime(&mut self.ctx.elements);
            self.clock.subscribe(Box::new(triggers));
        }

        self.clock.start();
        log::info!("init: clock running with {:?}", self.clock.subscriber_names());
    }
}

/// A page: loading gate, shared context and the frame clock, driven by the
/// host one animation frame at a time.
pub struct Page {
    gate: LoadingGate<PageState>,
    state: PageState,
    pointer: PointerTracker,
    timer: FrameTimer,
    entrance: Option<TimelineId>,
    frames: u64,
}

impl Page {
    pub fn new(
        config: PageConfig,
        elements: ElementStore,
        viewport: Viewport,
        renderer: Option<Box<dyn SceneRenderer>>,
    ) -> Self {
        let mut gate = LoadingGate::new(&config.loading());
        gate.on_interactive(PageState::initialize);

        let scroll = Box::new(MomentumScroll::new(config.scroll_duration));
        let mut ctx = PageContext::new(elements, scroll, viewport);
        ctx.refresh_scroll_limit();

        Self {
            gate,
            timer: config.frame_timer(),
            state: PageState {
                ctx,
                clock: FrameClock::new(),
                rng: Rng::new(config.seed ^ 0x9e37_79b9_7f4a_7c15),
                config,
                renderer,
                cursor: None,
                magnetic: None,
                hover_skin: None,
                init_count: 0,
            },
            pointer: PointerTracker::new(),
            entrance: None,
            frames: 0,
        }
    }

    /// Build from a manifest, using its config overrides if present.
    pub fn from_manifest(
        manifest: &PageManifest,
        viewport: Viewport,
        renderer: Option<Box<dyn SceneRenderer>>,
    ) -> Self {
        let config = manifest.config.clone().unwrap_or_default();
        Self::new(config, manifest.build_store(), viewport, renderer)
    }

    /// Start the gate. `document_complete` selects the warm path.
    pub fn boot(&mut self, document_complete: bool) -> Option<GateEvent> {
        let readiness = if document_complete { Readiness::Warm } else { Readiness::Cold };
        let event = self.gate.start(readiness, &mut self.state);
        self.sync_preloader();
        event
    }

    /// Mirror the gate's preloader flag onto the Preloader elements.
    fn sync_preloader(&mut self) {
        if !self.gate.preloader_hidden() {
            return;
        }
        for element in self.state.ctx.elements.iter_mut() {
            if element.has_role(Role::Preloader) {
                element.hidden = true;
            }
        }
    }

    pub fn apply_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMove { x, y } => {
                self.pointer.record(x, y);
                if let Some(rig) = self.state.cursor {
                    let offset = self.state.config.inner_cursor_offset;
                    self.state
                        .ctx
                        .animator()
                        .set_immediate(rig.dot, &[(Property::X, x - offset), (Property::Y, y - offset)]);
                }
            }
            InputEvent::ElementEnter { element } => {
                let is_trigger = self.has_role(element, Role::HoverTrigger);
                if let (true, Some(toggle)) = (is_trigger, self.state.hover_skin.as_mut()) {
                    toggle.enter(&mut self.state.ctx.elements);
                }
            }
            InputEvent::ElementHover { element, x, y } => {
                let Some(magnetic) = self.state.magnetic.as_mut() else {
                    return;
                };
                let offset = self.state.ctx.scroll_offset();
                // The rendered box: layout plus the live translation, in viewport space
                let Some(rect) = self
                    .state
                    .ctx
                    .elements
                    .get(element)
                    .map(|e| e.rect.translated(e.transform.x, e.transform.y - offset))
                else {
                    return;
                };
                magnetic.hover_move(element, Vec2::new(x, y), rect, &mut self.state.ctx.animator());
            }
            InputEvent::ElementLeave { element } => {
                if let Some(magnetic) = self.state.magnetic.as_mut() {
                    magnetic.hover_leave(element, &mut self.state.ctx.animator());
                }
                let is_trigger = self.has_role(element, Role::HoverTrigger);
                if let (true, Some(toggle)) = (is_trigger, self.state.hover_skin.as_mut()) {
                    toggle.leave(&mut self.state.ctx.elements);
                }
            }
            InputEvent::ElementRect { element, rect } => {
                if let Some(e) = self.state.ctx.elements.get_mut(element) {
                    e.rect = rect;
                    self.state.ctx.refresh_scroll_limit();
                }
            }
            InputEvent::Resize { width, height } => {
                self.state.ctx.viewport = Viewport::new(width, height);
                self.state.ctx.refresh_scroll_limit();
            }
            InputEvent::Wheel { delta_y } => {
                if self.is_interactive() {
                    self.state.ctx.scroll.scroll_by(delta_y);
                }
            }
        }
    }

    /// Click on a link. Same-page anchors are handled only once the page is
    /// interactive; the host suppresses navigation when the outcome says so.
    pub fn anchor_click(&mut self, href: &str) -> AnchorOutcome {
        if !self.is_interactive() {
            return AnchorOutcome::Ignored;
        }
        let ctx = &mut self.state.ctx;
        handle_anchor_click(href, &ctx.elements, ctx.scroll.as_mut())
    }

    /// One host animation frame.
    pub fn frame(&mut self, timestamp_ms: f64) {
        self.frames += 1;
        let delta = self.timer.advance(timestamp_ms);

        if self.gate.state() == LoadState::Loading {
            for event in self.gate.advance(delta.elapsed_ms) {
                if event == GateEvent::EntranceRequested {
                    self.play_entrance();
                }
            }
        }

        self.state.ctx.pointer = self.pointer.snapshot(self.state.ctx.viewport);
        self.state.clock.frame(timestamp_ms, &mut self.state.ctx);

        let ctx = &mut self.state.ctx;
        ctx.tweens.tick((delta.elapsed_ms / 1000.0) as f32, &mut ctx.elements);
        let completed: Vec<u32> = ctx.tweens.drain_completed().collect();
        for event in completed {
            if event == ENTRANCE_COMPLETE_EVENT {
                self.entrance = None;
                if self.gate.finish_entrance(&mut self.state) {
                    self.sync_preloader();
                }
            }
        }
    }

    fn play_entrance(&mut self) {
        let ctx = &mut self.state.ctx;
        prime_entrance(&mut ctx.elements);
        let timeline = entrance_timeline(&ctx.elements);
        log::info!("entrance: {:.2}s timeline", timeline.duration());
        self.entrance = Some(ctx.animator().play(timeline));
    }

    fn has_role(&self, element: ElementId, role: Role) -> bool {
        self.state
            .ctx
            .elements
            .get(element)
            .is_some_and(|e| e.has_role(role))
    }

    pub fn summary(&self) -> FrameSummary {
        let ctx = &self.state.ctx;
        let scene = ctx.scene.unwrap_or_default();
        FrameSummary {
            frame: self.frames,
            load_state: self.gate.state().code(),
            progress: self.gate.progress(),
            element_count: ctx.elements.len() as u32,
            particle_count: scene.particle_count,
            camera: scene.camera,
            aspect: scene.aspect,
            rotation_y: scene.rotation_y,
            positions_dirty: scene.positions_dirty,
            renders: scene.renders,
            scroll_offset: ctx.scroll_offset(),
            viewport: [ctx.viewport.width, ctx.viewport.height],
        }
    }

    pub fn load_state(&self) -> LoadState {
        self.gate.state()
    }

    pub fn is_interactive(&self) -> bool {
        self.gate.state() == LoadState::Interactive
    }

    pub fn progress(&self) -> u8 {
        self.gate.progress()
    }

    pub fn counter_label(&self) -> String {
        self.gate.counter_label()
    }

    pub fn preloader_hidden(&self) -> bool {
        self.gate.preloader_hidden()
    }

    pub fn context(&self) -> &PageContext {
        &self.state.ctx
    }

    pub fn config(&self) -> &PageConfig {
        &self.state.config
    }

    /// How many times initialization has run. Never more than one.
    pub fn init_count(&self) -> u32 {
        self.state.init_count
    }

    pub fn clock_running(&self) -> bool {
        self.state.clock.is_running()
    }

    pub fn clock_subscribers(&self) -> Vec<&'static str> {
        self.state.clock.subscriber_names()
    }

    pub fn entrance_playing(&self) -> bool {
        self.entrance.is_some()
    }

    pub fn magnetic(&self) -> Option<&MagneticController> {
        self.state.magnetic.as_ref()
    }

    pub fn hover_skin(&self) -> Option<HoverSkin> {
        self.state.hover_skin.map(|t| t.skin())
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }
}
