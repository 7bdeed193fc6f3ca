//! shaka-player bindings
//!
//! The page loads shaka-player (`window.shaka`) before this module starts.

use crate::dom::{js_error_message, VideoElement};
use async_trait::async_trait;
use js_sys::Promise;
use marquee_core::{AdaptiveEngine, EngineFactory, PlatformError, PlatformResult};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlMediaElement;

#[wasm_bindgen(js_namespace = shaka)]
extern "C" {
    #[wasm_bindgen(js_name = Player)]
    type ShakaPlayer;

    #[wasm_bindgen(constructor, js_class = "Player", catch)]
    fn new(media: &HtmlMediaElement) -> Result<ShakaPlayer, JsValue>;

    #[wasm_bindgen(static_method_of = ShakaPlayer, js_class = "Player", js_name = isBrowserSupported, catch)]
    fn is_browser_supported() -> Result<bool, JsValue>;

    #[wasm_bindgen(method)]
    fn load(this: &ShakaPlayer, uri: &str) -> Promise;

    #[wasm_bindgen(method)]
    fn unload(this: &ShakaPlayer) -> Promise;
}

async fn settle(promise: Promise) -> PlatformResult {
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| PlatformError::new(js_error_message(&e)))
}

/// A shaka `Player` bound to the page's video element
pub struct ShakaEngine {
    player: ShakaPlayer,
}

#[async_trait(?Send)]
impl AdaptiveEngine for ShakaEngine {
    async fn load(&self, url: &str) -> PlatformResult {
        settle(self.player.load(url)).await
    }

    async fn unload(&self) -> PlatformResult {
        settle(self.player.unload()).await
    }
}

/// Builds the shaka player on first adaptive playback
pub struct ShakaFactory;

impl EngineFactory<VideoElement> for ShakaFactory {
    fn create(&self, element: &VideoElement) -> Result<Box<dyn AdaptiveEngine>, PlatformError> {
        let supported = ShakaPlayer::is_browser_supported()
            .map_err(|e| PlatformError::new(format!("shaka-player not loaded: {}", js_error_message(&e))))?;
        if !supported {
            return Err(PlatformError::new("browser lacks Media Source Extensions"));
        }

        let player = ShakaPlayer::new(element.element())
            .map_err(|e| PlatformError::new(js_error_message(&e)))?;
        web_sys::console::log_1(&"[Marquee] shaka player attached".into());

        Ok(Box::new(ShakaEngine { player }))
    }
}
