//! DOM-backed platform objects
//!
//! Implements the core's platform traits on the page's `<video>`,
//! `<iframe>` and player container.

use async_trait::async_trait;
use js_sys::{Function, Reflect};
use marquee_core::{EmbedFrame, MediaElement, PlatformError, PlatformResult, PresentationSurface};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlElement, HtmlIFrameElement, HtmlVideoElement, Window};

/// Element ids expected in the host page
pub mod ids {
    pub const VIDEO_CONTAINER: &str = "videoContainer";
    pub const VIDEO_PLAYER: &str = "videoPlayer";
    pub const EMBED_FRAME: &str = "ytFrame";
    pub const EPISODE_CONTAINER: &str = "episodeContainer";
    pub const EPISODE_LIST: &str = "episodeList";
    pub const CHANNEL_SECTIONS: &str = "channelSections";
}

/// Best-effort text for a thrown JS value
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Look up an element by id and cast it
pub fn element_by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{}", id)))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("element #{} has the wrong type", id)))
}

pub fn set_display(element: &HtmlElement, display: &str) {
    if let Err(e) = element.style().set_property("display", display) {
        web_sys::console::warn_1(&e);
    }
}

/// Request fullscreen, falling back to the WebKit-prefixed call
pub fn request_fullscreen(element: &Element) {
    if element.request_fullscreen().is_ok() {
        return;
    }
    let prefixed = Reflect::get(element, &JsValue::from_str("webkitRequestFullscreen"))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok());
    match prefixed {
        Some(f) => {
            if let Err(e) = f.call0(element) {
                web_sys::console::warn_2(&"[Marquee] fullscreen refused".into(), &e);
            }
        }
        None => web_sys::console::warn_1(&"[Marquee] fullscreen unavailable".into()),
    }
}

/// The page's `<video>` element
pub struct VideoElement {
    element: HtmlVideoElement,
}

impl VideoElement {
    pub fn new(element: HtmlVideoElement) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &HtmlVideoElement {
        &self.element
    }
}

#[async_trait(?Send)]
impl MediaElement for VideoElement {
    fn show(&self) {
        set_display(&self.element, "block");
    }

    fn hide(&self) {
        set_display(&self.element, "none");
    }

    fn set_source(&self, url: &str) {
        self.element.set_src(url);
    }

    fn detach(&self) {
        if let Err(e) = self.element.pause() {
            web_sys::console::warn_1(&e);
        }
        if let Err(e) = self.element.remove_attribute("src") {
            web_sys::console::warn_1(&e);
        }
        // Reloading without a source drops buffered media
        self.element.load();
    }

    async fn play(&self) -> PlatformResult {
        let promise = self
            .element
            .play()
            .map_err(|e| PlatformError::new(js_error_message(&e)))?;
        JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|e| PlatformError::new(js_error_message(&e)))
    }
}

/// The provider `<iframe>`
pub struct FrameElement {
    frame: HtmlIFrameElement,
}

impl FrameElement {
    pub fn new(frame: HtmlIFrameElement) -> Self {
        Self { frame }
    }
}

impl EmbedFrame for FrameElement {
    fn show(&self) {
        set_display(&self.frame, "block");
    }

    fn hide(&self) {
        set_display(&self.frame, "none");
    }

    fn set_source(&self, url: &str) {
        self.frame.set_src(url);
    }

    fn clear_source(&self) {
        self.frame.set_src("");
    }
}

/// The player container, plus the episode overlay it replaces
pub struct ContainerSurface {
    window: Window,
    document: Document,
    container: HtmlElement,
    overlay: Option<HtmlElement>,
}

impl ContainerSurface {
    pub fn new(
        window: Window,
        document: Document,
        container: HtmlElement,
        overlay: Option<HtmlElement>,
    ) -> Self {
        Self {
            window,
            document,
            container,
            overlay,
        }
    }
}

impl PresentationSurface for ContainerSurface {
    fn show(&self) {
        set_display(&self.container, "block");
    }

    fn hide(&self) {
        set_display(&self.container, "none");
    }

    fn request_fullscreen(&self) {
        request_fullscreen(&self.container);
    }

    fn is_fullscreen(&self) -> bool {
        self.document.fullscreen_element().is_some()
    }

    fn exit_fullscreen(&self) {
        self.document.exit_fullscreen();
    }

    fn close_overlays(&self) {
        if let Some(overlay) = &self.overlay {
            set_display(overlay, "none");
        }
    }

    fn report_error(&self, message: &str) {
        web_sys::console::error_1(&format!("[Marquee] {}", message).into());
        if let Err(e) = self.window.alert_with_message(message) {
            web_sys::console::warn_1(&e);
        }
    }
}
