//! Marquee WASM - Browser Catalog Player
//!
//! Wires the core playback controller to the page:
//! - `<video>` for progressive files and shaka-player streams
//! - `<iframe>` for embedded provider videos
//! - the player container for visibility, fullscreen and alerts
//! - catalog rows and episode lists rendered from the catalog document
//!
//! ## Integration
//!
//! ```javascript
//! import init, { start } from '@marquee/wasm';
//!
//! await init();
//! const player = await start({ catalog_url: 'chn.json' });
//! document.getElementById('closeButton').onclick = () => player.close();
//! ```

use marquee_core::{Error, PlaybackController, PlayerConfig, StreamDescriptor};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

mod catalog_view;
mod dom;
mod shaka;

pub use catalog_view::CatalogView;
pub use dom::{ContainerSurface, FrameElement, VideoElement};
pub use shaka::{ShakaEngine, ShakaFactory};

use dom::{element_by_id, ids};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"[Marquee WASM] Initialized".into());
}

/// Library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Convert a core error into a JS `Error` carrying a `code` property
fn to_js_error(err: &Error) -> JsValue {
    let js_err = js_sys::Error::new(&err.to_string());
    // Setting a property on a fresh Error object cannot fail
    let _ = js_sys::Reflect::set(&js_err, &"code".into(), &err.error_code().into());
    js_err.into()
}

fn parse_config(config: JsValue) -> Result<PlayerConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(PlayerConfig::default());
    }
    let config: PlayerConfig = serde_wasm_bindgen::from_value(config)?;
    config.validate().map_err(|e| to_js_error(&e))?;
    Ok(config)
}

/// Player bound to the page's player elements
#[wasm_bindgen]
pub struct MarqueePlayer {
    controller: Rc<PlaybackController>,
    view: Option<Rc<CatalogView>>,
}

#[wasm_bindgen]
impl MarqueePlayer {
    /// Create a player; `config` may be omitted
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<MarqueePlayer, JsValue> {
        let config = parse_config(config)?;
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

        let video = Rc::new(VideoElement::new(element_by_id(&document, ids::VIDEO_PLAYER)?));
        let frame = Rc::new(FrameElement::new(element_by_id(&document, ids::EMBED_FRAME)?));
        let overlay = element_by_id(&document, ids::EPISODE_CONTAINER).ok();
        let surface = Rc::new(ContainerSurface::new(
            window,
            document.clone(),
            element_by_id(&document, ids::VIDEO_CONTAINER)?,
            overlay,
        ));

        let controller = PlaybackController::new(config, surface, video, frame, ShakaFactory);

        Ok(Self {
            controller: Rc::new(controller),
            view: None,
        })
    }

    /// Play a `{ type, url }` descriptor. Resolves with the outcome, rejects
    /// with an `Error` whose `code` names the failure.
    pub fn play(&self, descriptor: JsValue) -> js_sys::Promise {
        let controller = Rc::clone(&self.controller);
        future_to_promise(async move {
            let descriptor: StreamDescriptor = serde_wasm_bindgen::from_value(descriptor)?;
            let outcome = controller.play(&descriptor).await.map_err(|e| to_js_error(&e))?;
            Ok(serde_wasm_bindgen::to_value(&outcome)?)
        })
    }

    /// Close the player
    pub fn close(&self) {
        self.controller.close();
    }

    /// Hide the episode list, if the catalog was rendered
    pub fn close_episodes(&self) {
        if let Some(view) = &self.view {
            view.close_episodes();
        }
    }

    #[wasm_bindgen(getter)]
    pub fn active_backend(&self) -> String {
        self.controller.active_backend().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn surface_visible(&self) -> bool {
        self.controller.surface_visible()
    }

    /// Current session state as a plain object
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.controller.snapshot())?)
    }
}

/// Create the player, load the catalog and render it.
///
/// A catalog failure is shown in place of the catalog and rejects the
/// returned promise; it is not retried.
#[wasm_bindgen]
pub async fn start(config: JsValue) -> Result<MarqueePlayer, JsValue> {
    let mut player = MarqueePlayer::new(config)?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

    let view = CatalogView::new(document, Rc::clone(&player.controller))?;
    let catalog_url = player.controller.config().catalog_url.clone();

    match catalog_view::fetch_catalog(&window, &catalog_url).await {
        Ok(catalog) => {
            web_sys::console::log_1(&format!("[Marquee] {} catalog items", catalog.len()).into());
            view.render(&catalog)?;
        }
        Err(err) => {
            web_sys::console::error_1(&format!("[Marquee] catalog: {}", err).into());
            view.render_error(&err);
            return Err(to_js_error(&err));
        }
    }

    player.view = Some(view);
    Ok(player)
}
