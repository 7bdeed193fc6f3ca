//! Headless platform
//!
//! Stand-ins for the browser objects so the real controller can run from a
//! terminal: the element probes its source over HTTP instead of decoding
//! it, and the adaptive engine fetches and parses the HLS playlist.

use async_trait::async_trait;
use marquee_core::{
    ActiveBackend, AdaptiveEngine, EmbedFrame, EngineFactory, MediaElement, PlatformError,
    PlatformResult, PlaybackController, PlayerConfig, PresentationSurface,
};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Sources produced by the engine; they never leave the process
const BLOB_SCHEME: &str = "blob:";

#[derive(Default)]
struct ElementState {
    visible: Cell<bool>,
    playing: Cell<bool>,
    source: RefCell<Option<String>>,
}

/// Native element stand-in; clones share state
#[derive(Clone)]
pub struct HeadlessElement {
    client: reqwest::Client,
    state: Rc<ElementState>,
}

impl HeadlessElement {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            state: Rc::default(),
        }
    }

    pub fn source(&self) -> Option<String> {
        self.state.source.borrow().clone()
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing.get()
    }

    /// HEAD the source; a reachable file counts as playing
    async fn probe(&self, url: &str) -> PlatformResult {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| PlatformError::new(e.to_string()))?;

        let status = response.status();
        debug!(url, %status, "Probed source");
        if !status.is_success() {
            return Err(PlatformError::new(format!("HTTP {}", status)));
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl MediaElement for HeadlessElement {
    fn show(&self) {
        self.state.visible.set(true);
    }

    fn hide(&self) {
        self.state.visible.set(false);
    }

    fn set_source(&self, url: &str) {
        *self.state.source.borrow_mut() = Some(url.to_string());
    }

    fn detach(&self) {
        self.state.playing.set(false);
        self.state.source.borrow_mut().take();
    }

    async fn play(&self) -> PlatformResult {
        let source = self
            .source()
            .ok_or_else(|| PlatformError::new("no source attached"))?;

        if !source.starts_with(BLOB_SCHEME) {
            self.probe(&source).await?;
        }

        self.state.playing.set(true);
        Ok(())
    }
}

/// Provider frame stand-in
#[derive(Clone, Default)]
pub struct HeadlessFrame {
    visible: Rc<Cell<bool>>,
    source: Rc<RefCell<Option<String>>>,
}

impl HeadlessFrame {
    pub fn source(&self) -> Option<String> {
        self.source.borrow().clone()
    }
}

impl EmbedFrame for HeadlessFrame {
    fn show(&self) {
        self.visible.set(true);
    }

    fn hide(&self) {
        self.visible.set(false);
    }

    fn set_source(&self, url: &str) {
        *self.source.borrow_mut() = Some(url.to_string());
    }

    fn clear_source(&self) {
        self.source.borrow_mut().take();
    }
}

/// What the engine found in the last playlist it loaded
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "playlist", rename_all = "snake_case")]
pub enum PlaylistSummary {
    Master { variants: usize, max_bandwidth: u64 },
    Media { segments: usize, live: bool, duration_secs: Option<f32> },
}

/// Parse an HLS playlist into a summary
pub fn summarize_playlist(bytes: &[u8]) -> Result<PlaylistSummary, PlatformError> {
    match m3u8_rs::parse_playlist_res(bytes) {
        Ok(m3u8_rs::Playlist::MasterPlaylist(master)) => Ok(PlaylistSummary::Master {
            variants: master.variants.len(),
            max_bandwidth: master.variants.iter().map(|v| v.bandwidth).max().unwrap_or(0),
        }),
        Ok(m3u8_rs::Playlist::MediaPlaylist(media)) => Ok(PlaylistSummary::Media {
            segments: media.segments.len(),
            live: !media.end_list,
            duration_secs: media
                .end_list
                .then(|| media.segments.iter().map(|s| s.duration).sum()),
        }),
        Err(e) => Err(PlatformError::new(format!("invalid HLS playlist: {:?}", e))),
    }
}

/// HLS engine stand-in bound to one element
pub struct HeadlessEngine {
    client: reqwest::Client,
    element: HeadlessElement,
    last_playlist: Rc<RefCell<Option<PlaylistSummary>>>,
}

#[async_trait(?Send)]
impl AdaptiveEngine for HeadlessEngine {
    async fn load(&self, url: &str) -> PlatformResult {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PlatformError::new(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::new(format!("HTTP {} for playlist", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| PlatformError::new(e.to_string()))?;
        let summary = summarize_playlist(&body)?;
        info!(url, ?summary, "Playlist loaded");

        *self.last_playlist.borrow_mut() = Some(summary);
        self.element.set_source(&format!("{}{}", BLOB_SCHEME, url));
        Ok(())
    }

    async fn unload(&self) -> PlatformResult {
        self.last_playlist.borrow_mut().take();
        self.element.detach();
        Ok(())
    }
}

/// Builds [`HeadlessEngine`]s; remembers the last loaded playlist
#[derive(Clone)]
pub struct HeadlessEngineFactory {
    client: reqwest::Client,
    last_playlist: Rc<RefCell<Option<PlaylistSummary>>>,
}

impl HeadlessEngineFactory {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            last_playlist: Rc::default(),
        }
    }

    pub fn last_playlist(&self) -> Option<PlaylistSummary> {
        self.last_playlist.borrow().clone()
    }
}

impl EngineFactory<HeadlessElement> for HeadlessEngineFactory {
    fn create(&self, element: &HeadlessElement) -> Result<Box<dyn AdaptiveEngine>, PlatformError> {
        debug!("Creating headless HLS engine");
        Ok(Box::new(HeadlessEngine {
            client: self.client.clone(),
            element: element.clone(),
            last_playlist: Rc::clone(&self.last_playlist),
        }))
    }
}

/// Terminal surface: prints errors unless quiet, always records them
#[derive(Default)]
pub struct HeadlessSurface {
    quiet: bool,
    visible: Cell<bool>,
    fullscreen: Cell<bool>,
    errors: RefCell<Vec<String>>,
}

impl HeadlessSurface {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            ..Self::default()
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// Most recent reported error
    pub fn last_error(&self) -> Option<String> {
        self.errors.borrow().last().cloned()
    }
}

impl PresentationSurface for HeadlessSurface {
    fn show(&self) {
        self.visible.set(true);
    }

    fn hide(&self) {
        self.visible.set(false);
    }

    fn request_fullscreen(&self) {
        self.fullscreen.set(true);
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen.get()
    }

    fn exit_fullscreen(&self) {
        self.fullscreen.set(false);
    }

    fn report_error(&self, message: &str) {
        warn!(message, "Playback error");
        if !self.quiet {
            eprintln!("{}", console::style(message).red().bold());
        }
        self.errors.borrow_mut().push(message.to_string());
    }
}

/// A controller wired to the headless platform, with handles kept for
/// reporting
pub struct HeadlessPlayer {
    pub controller: PlaybackController,
    element: Rc<HeadlessElement>,
    frame: HeadlessFrame,
    engines: HeadlessEngineFactory,
    surface: Rc<HeadlessSurface>,
}

impl HeadlessPlayer {
    pub fn new(config: PlayerConfig, client: reqwest::Client, quiet: bool) -> Self {
        let element = Rc::new(HeadlessElement::new(client.clone()));
        let frame = HeadlessFrame::default();
        let engines = HeadlessEngineFactory::new(client);
        let surface = Rc::new(HeadlessSurface::new(quiet));

        let controller = PlaybackController::new(
            config,
            surface.clone(),
            Rc::clone(&element),
            Rc::new(frame.clone()),
            engines.clone(),
        );

        Self {
            controller,
            element,
            frame,
            engines,
            surface,
        }
    }

    /// Source of whichever backend is active
    pub fn current_source(&self) -> Option<String> {
        match self.controller.active_backend() {
            ActiveBackend::None => None,
            ActiveBackend::Embedded => self.frame.source(),
            ActiveBackend::Progressive | ActiveBackend::Adaptive => self.element.source(),
        }
    }

    /// Whether the active backend is visible and running
    pub fn is_playing(&self) -> bool {
        match self.controller.active_backend() {
            ActiveBackend::None => false,
            ActiveBackend::Embedded => self.frame.visible.get() && self.frame.source().is_some(),
            ActiveBackend::Progressive | ActiveBackend::Adaptive => {
                self.element.state.visible.get() && self.element.is_playing()
            }
        }
    }

    pub fn last_playlist(&self) -> Option<PlaylistSummary> {
        self.engines.last_playlist()
    }

    pub fn surface(&self) -> &HeadlessSurface {
        &self.surface
    }
}
