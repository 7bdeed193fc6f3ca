//! Recording platform doubles for controller tests

#![allow(dead_code)]

use async_trait::async_trait;
use marquee_core::{
    AdaptiveEngine, EmbedFrame, EngineFactory, MediaElement, PlatformError, PlatformResult,
    PlaybackController, PlayerConfig, PresentationSurface,
};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use tokio::sync::Notify;

/// Shared, ordered log of every platform call
#[derive(Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.borrow_mut().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn position(&self, event: &str) -> Option<usize> {
        self.0.borrow().iter().position(|e| e == event)
    }

    pub fn count(&self, event: &str) -> usize {
        self.0.borrow().iter().filter(|e| *e == event).count()
    }
}

// ============================================================================
// Native element
// ============================================================================

#[derive(Default)]
pub struct ElementState {
    pub visible: Cell<bool>,
    pub source: RefCell<Option<String>>,
    pub playing: Cell<bool>,
    play_results: RefCell<VecDeque<PlatformResult>>,
    play_gates: RefCell<VecDeque<Rc<Notify>>>,
}

#[derive(Clone)]
pub struct MockElement {
    pub state: Rc<ElementState>,
    log: EventLog,
}

impl MockElement {
    pub fn new(log: EventLog) -> Self {
        Self {
            state: Rc::default(),
            log,
        }
    }

    pub fn fail_next_play(&self, reason: &str) {
        self.state
            .play_results
            .borrow_mut()
            .push_back(Err(PlatformError::new(reason)));
    }

    /// The next `play` call waits until the returned gate is notified
    pub fn gate_next_play(&self) -> Rc<Notify> {
        let gate = Rc::new(Notify::new());
        self.state.play_gates.borrow_mut().push_back(Rc::clone(&gate));
        gate
    }

    pub fn source(&self) -> Option<String> {
        self.state.source.borrow().clone()
    }

    pub fn is_visible(&self) -> bool {
        self.state.visible.get()
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing.get()
    }
}

#[async_trait(?Send)]
impl MediaElement for MockElement {
    fn show(&self) {
        self.state.visible.set(true);
        self.log.push("element.show");
    }

    fn hide(&self) {
        self.state.visible.set(false);
        self.log.push("element.hide");
    }

    fn set_source(&self, url: &str) {
        *self.state.source.borrow_mut() = Some(url.to_string());
        self.log.push(format!("element.src {}", url));
    }

    fn detach(&self) {
        self.state.playing.set(false);
        *self.state.source.borrow_mut() = None;
        self.log.push("element.detach");
    }

    async fn play(&self) -> PlatformResult {
        self.log.push("element.play");

        let gate = self.state.play_gates.borrow_mut().pop_front();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let result = self.state.play_results.borrow_mut().pop_front().unwrap_or(Ok(()));
        if self.state.source.borrow().is_none() {
            return Err(PlatformError::new("AbortError: source removed"));
        }
        if result.is_ok() {
            self.state.playing.set(true);
            self.log.push("element.playing");
        }
        result
    }
}

// ============================================================================
// Embed frame
// ============================================================================

pub struct MockFrame {
    pub visible: Cell<bool>,
    pub source: RefCell<Option<String>>,
    log: EventLog,
}

impl MockFrame {
    pub fn new(log: EventLog) -> Self {
        Self {
            visible: Cell::new(false),
            source: RefCell::new(None),
            log,
        }
    }

    pub fn source(&self) -> Option<String> {
        self.source.borrow().clone()
    }
}

impl EmbedFrame for MockFrame {
    fn show(&self) {
        self.visible.set(true);
        self.log.push("frame.show");
    }

    fn hide(&self) {
        self.visible.set(false);
        self.log.push("frame.hide");
    }

    fn set_source(&self, url: &str) {
        *self.source.borrow_mut() = Some(url.to_string());
        self.log.push(format!("frame.src {}", url));
    }

    fn clear_source(&self) {
        *self.source.borrow_mut() = None;
        self.log.push("frame.clear");
    }
}

// ============================================================================
// Adaptive engine
// ============================================================================

#[derive(Default)]
pub struct EngineState {
    pub instances: Cell<usize>,
    pub loaded: RefCell<Option<String>>,
    /// Bumped by every unload; a load that resumes under a newer generation
    /// was interrupted
    generation: Cell<u64>,
    fail_construction: Cell<bool>,
    load_results: RefCell<VecDeque<PlatformResult>>,
    load_gates: RefCell<VecDeque<Rc<Notify>>>,
    unload_gates: RefCell<VecDeque<Rc<Notify>>>,
}

#[derive(Clone)]
pub struct MockEngineFactory {
    pub state: Rc<EngineState>,
    log: EventLog,
}

impl MockEngineFactory {
    pub fn new(log: EventLog) -> Self {
        Self {
            state: Rc::default(),
            log,
        }
    }

    pub fn instances(&self) -> usize {
        self.state.instances.get()
    }

    pub fn loaded(&self) -> Option<String> {
        self.state.loaded.borrow().clone()
    }

    pub fn fail_construction(&self) {
        self.state.fail_construction.set(true);
    }

    pub fn fail_next_load(&self, reason: &str) {
        self.state
            .load_results
            .borrow_mut()
            .push_back(Err(PlatformError::new(reason)));
    }

    /// The next `load` call waits until the returned gate is notified
    pub fn gate_next_load(&self) -> Rc<Notify> {
        let gate = Rc::new(Notify::new());
        self.state.load_gates.borrow_mut().push_back(Rc::clone(&gate));
        gate
    }

    /// The next `unload` takes effect at once but resolves only when the
    /// returned gate is notified
    pub fn gate_next_unload(&self) -> Rc<Notify> {
        let gate = Rc::new(Notify::new());
        self.state.unload_gates.borrow_mut().push_back(Rc::clone(&gate));
        gate
    }
}

impl EngineFactory<MockElement> for MockEngineFactory {
    fn create(&self, element: &MockElement) -> Result<Box<dyn AdaptiveEngine>, PlatformError> {
        if self.state.fail_construction.get() {
            return Err(PlatformError::new("streaming library not available"));
        }
        self.state.instances.set(self.state.instances.get() + 1);
        self.log.push("engine.new");

        Ok(Box::new(MockEngine {
            state: Rc::clone(&self.state),
            element: element.clone(),
            log: self.log.clone(),
        }))
    }
}

pub struct MockEngine {
    state: Rc<EngineState>,
    element: MockElement,
    log: EventLog,
}

#[async_trait(?Send)]
impl AdaptiveEngine for MockEngine {
    async fn load(&self, url: &str) -> PlatformResult {
        self.log.push(format!("engine.load {}", url));
        let generation = self.state.generation.get();

        let gate = self.state.load_gates.borrow_mut().pop_front();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.state.generation.get() != generation {
            return Err(PlatformError::new("load interrupted"));
        }
        let result = self.state.load_results.borrow_mut().pop_front().unwrap_or(Ok(()));
        if result.is_ok() {
            *self.state.loaded.borrow_mut() = Some(url.to_string());
            self.element.set_source(&format!("blob:{}", url));
        }
        result
    }

    async fn unload(&self) -> PlatformResult {
        self.log.push("engine.unload");
        self.state.generation.set(self.state.generation.get() + 1);
        if self.state.loaded.borrow_mut().take().is_some() {
            self.element.detach();
        }

        let gate = self.state.unload_gates.borrow_mut().pop_front();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(())
    }
}

// ============================================================================
// Surface
// ============================================================================

pub struct MockSurface {
    pub visible: Cell<bool>,
    pub fullscreen: Cell<bool>,
    pub errors: RefCell<Vec<String>>,
    log: EventLog,
}

impl MockSurface {
    pub fn new(log: EventLog) -> Self {
        Self {
            visible: Cell::new(false),
            fullscreen: Cell::new(false),
            errors: RefCell::new(Vec::new()),
            log,
        }
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }
}

impl PresentationSurface for MockSurface {
    fn show(&self) {
        self.visible.set(true);
        self.log.push("surface.show");
    }

    fn hide(&self) {
        self.visible.set(false);
        self.log.push("surface.hide");
    }

    fn request_fullscreen(&self) {
        self.fullscreen.set(true);
        self.log.push("surface.fullscreen");
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen.get()
    }

    fn exit_fullscreen(&self) {
        self.fullscreen.set(false);
        self.log.push("surface.exit_fullscreen");
    }

    fn close_overlays(&self) {
        self.log.push("surface.close_overlays");
    }

    fn report_error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
        self.log.push(format!("surface.error {}", message));
    }
}

// ============================================================================
// Rig
// ============================================================================

/// A controller wired to recording doubles
pub struct Rig {
    pub controller: PlaybackController,
    pub element: MockElement,
    pub frame: Rc<MockFrame>,
    pub engine: MockEngineFactory,
    pub surface: Rc<MockSurface>,
    pub log: EventLog,
}

impl Rig {
    pub fn new() -> Self {
        Self::with_config(PlayerConfig::default())
    }

    pub fn with_config(config: PlayerConfig) -> Self {
        let log = EventLog::default();
        let element = MockElement::new(log.clone());
        let frame = Rc::new(MockFrame::new(log.clone()));
        let engine = MockEngineFactory::new(log.clone());
        let surface = Rc::new(MockSurface::new(log.clone()));

        let controller = PlaybackController::new(
            config,
            surface.clone(),
            Rc::new(element.clone()),
            frame.clone(),
            engine.clone(),
        );

        Self {
            controller,
            element,
            frame,
            engine,
            surface,
            log,
        }
    }

    /// Backends currently visible with a source attached
    pub fn active_surfaces(&self) -> usize {
        let frame = self.frame.visible.get() && self.frame.source().is_some();
        let element = self.element.is_visible() && self.element.source().is_some();
        usize::from(frame) + usize::from(element)
    }
}
