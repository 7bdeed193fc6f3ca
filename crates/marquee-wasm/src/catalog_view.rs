//! Catalog rendering
//!
//! Category rows of cards; series open an episode list on top of the page.

use crate::dom::{element_by_id, ids, js_error_message, request_fullscreen, set_display};
use marquee_core::{Catalog, CatalogEntry, CatalogItem, Error, PlaybackController, StreamDescriptor};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Document, Element, HtmlElement, HtmlImageElement, RequestCache, RequestInit, Response, Window,
};

/// Fetch the catalog document, bypassing the HTTP cache
pub async fn fetch_catalog(window: &Window, url: &str) -> marquee_core::Result<Catalog> {
    let load_err = |e: JsValue| Error::CatalogLoad(js_error_message(&e));

    let init = RequestInit::new();
    init.set_method("GET");
    init.set_cache(RequestCache::NoStore);

    let response: Response = JsFuture::from(window.fetch_with_str_and_init(url, &init))
        .await
        .map_err(load_err)?
        .dyn_into()
        .map_err(load_err)?;

    if !response.ok() {
        return Err(Error::CatalogLoad(format!("HTTP {} for {}", response.status(), url)));
    }

    let body = JsFuture::from(response.text().map_err(load_err)?)
        .await
        .map_err(load_err)?
        .as_string()
        .ok_or_else(|| Error::CatalogLoad("response body is not text".to_string()))?;

    Catalog::from_json(&body)
}

/// Renders the catalog and routes selections to the controller
pub struct CatalogView {
    document: Document,
    controller: Rc<PlaybackController>,
    sections: Element,
    episode_container: HtmlElement,
    episode_list: Element,
    /// Click handlers of the current episode list, dropped on rebuild
    episode_handlers: RefCell<Vec<Closure<dyn FnMut()>>>,
}

impl CatalogView {
    pub fn new(document: Document, controller: Rc<PlaybackController>) -> Result<Rc<Self>, JsValue> {
        let sections = element_by_id(&document, ids::CHANNEL_SECTIONS)?;
        let episode_container = element_by_id(&document, ids::EPISODE_CONTAINER)?;
        let episode_list = element_by_id(&document, ids::EPISODE_LIST)?;

        Ok(Rc::new(Self {
            document,
            controller,
            sections,
            episode_container,
            episode_list,
            episode_handlers: RefCell::new(Vec::new()),
        }))
    }

    /// Replace the catalog area with a fatal load message
    pub fn render_error(&self, err: &Error) {
        self.sections.set_inner_html("");
        let render = || -> Result<(), JsValue> {
            let heading: HtmlElement = self.document.create_element("h2")?.dyn_into()?;
            heading.set_text_content(Some(err.user_message()));
            heading.style().set_property("color", "red")?;
            self.sections.append_child(&heading)?;
            Ok(())
        };
        if let Err(e) = render() {
            web_sys::console::error_1(&e);
        }
    }

    /// One heading and one horizontal row per category
    pub fn render(self: &Rc<Self>, catalog: &Catalog) -> Result<(), JsValue> {
        self.sections.set_inner_html("");

        for group in catalog.group_by_category() {
            let heading = self.document.create_element("h2")?;
            heading.set_text_content(Some(group.name));
            self.sections.append_child(&heading)?;

            let row = self.document.create_element("div")?;
            row.set_class_name("horizontal-scroll");
            for item in group.items {
                row.append_child(&self.card(item)?)?;
            }
            self.sections.append_child(&row)?;
        }

        Ok(())
    }

    fn card(self: &Rc<Self>, item: &CatalogItem) -> Result<Element, JsValue> {
        let card: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        card.set_class_name("card-item");
        card.set_tab_index(0);

        let logo: HtmlImageElement = self.document.create_element("img")?.dyn_into()?;
        logo.set_src(&item.logo);
        logo.set_alt(&item.name);
        card.append_child(&logo)?;

        let name = self.document.create_element("p")?;
        name.set_text_content(Some(&item.name));
        card.append_child(&name)?;

        let view = Rc::clone(self);
        let item = item.clone();
        let handler = listen(&card, move || match item.entry() {
            Some(CatalogEntry::Series(_)) => {
                if let Err(e) = view.open_series(&item) {
                    web_sys::console::error_1(&e);
                }
            }
            Some(CatalogEntry::Stream(descriptor)) => view.play(descriptor.clone()),
            None => web_sys::console::warn_1(
                &format!("[Marquee] '{}' has no stream", item.name).into(),
            ),
        })?;
        // Cards stay for the whole page
        handler.forget();

        Ok(card.into())
    }

    /// Show the episode list of a series
    pub fn open_series(self: &Rc<Self>, series: &CatalogItem) -> Result<(), JsValue> {
        self.episode_list.set_inner_html("");
        self.episode_handlers.borrow_mut().clear();

        let title = self.document.create_element("h2")?;
        title.set_text_content(Some(&series.name));
        self.episode_list.append_child(&title)?;

        for season in &series.seasons {
            let heading = self.document.create_element("h3")?;
            heading.set_text_content(Some(&season.heading()));
            self.episode_list.append_child(&heading)?;

            for episode in &season.episodes {
                let entry: HtmlElement = self.document.create_element("div")?.dyn_into()?;
                entry.set_class_name("episode");
                entry.set_tab_index(0);
                entry.set_text_content(Some(&episode.title));

                let view = Rc::clone(self);
                let descriptor = episode.stream.clone();
                let title = episode.title.clone();
                let handler = listen(&entry, move || match &descriptor {
                    Some(descriptor) => view.play(descriptor.clone()),
                    None => web_sys::console::warn_1(
                        &format!("[Marquee] episode '{}' has no stream", title).into(),
                    ),
                })?;
                self.episode_handlers.borrow_mut().push(handler);

                self.episode_list.append_child(&entry)?;
            }
        }

        set_display(&self.episode_container, "block");
        request_fullscreen(&self.episode_container);
        Ok(())
    }

    /// Live click handlers of the episode list
    pub fn episode_handlers(&self) -> usize {
        self.episode_handlers.borrow().len()
    }

    /// Hide the episode list
    pub fn close_episodes(&self) {
        set_display(&self.episode_container, "none");
    }

    fn play(&self, descriptor: StreamDescriptor) {
        let controller = Rc::clone(&self.controller);
        spawn_local(async move {
            // Failures were already shown to the user by the surface
            if let Err(err) = controller.play(&descriptor).await {
                web_sys::console::warn_1(&format!("[Marquee] {}: {}", err.error_code(), err).into());
            }
        });
    }
}

/// Attach a click handler; it stays callable while the returned closure lives
fn listen(
    target: &HtmlElement,
    handler: impl FnMut() + 'static,
) -> Result<Closure<dyn FnMut()>, JsValue> {
    let closure = Closure::<dyn FnMut()>::new(handler);
    target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    Ok(closure)
}
