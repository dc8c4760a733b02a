//! DOM side of the page chrome: header fade on scroll, project modals, the
//! show-more toggle and the carousel's panel classes.

use js_sys::Array;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, Window,
};

use super::render;
use crate::error::{Result, VizError};
use crate::page::{self, HeaderFade, Panel};

const VIZ_AREA: &str = "unified-viz";

fn set_style(element: &Element, property: &str, value: &str) -> Result<()> {
    if let Some(element) = element.dyn_ref::<HtmlElement>() {
        element.style().set_property(property, value)?;
    }
    Ok(())
}

fn set_class(element: &Element, class: &str, on: bool) -> Result<()> {
    element.class_list().toggle_with_force(class, on)?;
    Ok(())
}

#[derive(Clone)]
pub struct Chrome {
    window: Window,
    document: Document,
}

impl Chrome {
    pub fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }

    fn body_scroll(&self, locked: bool) -> Result<()> {
        if let Some(body) = self.document.body() {
            let value = if locked { "hidden" } else { "auto" };
            body.style().set_property("overflow", value)?;
        }
        Ok(())
    }

    /// Applies the header fade for the current scroll position.
    pub fn update_header(&self) -> Result<()> {
        let scroll = self.window.scroll_y()? as f32;
        let height = self.window.inner_height()?.as_f64().unwrap_or(0.0) as f32;
        let fade = HeaderFade::at(scroll, height);

        if let Some(content) = self.document.query_selector(".header-content")? {
            set_style(&content, "opacity", &fade.header_opacity.to_string())?;
            set_style(&content, "transform", &fade.header_transform())?;
        }
        if let Some(about) = self.document.get_element_by_id("aboutContent") {
            set_style(&about, "opacity", &fade.about_opacity.to_string())?;
            set_style(&about, "transform", &fade.about_transform())?;
            set_class(&about, "active", fade.active)?;
        }
        if let Some(header) = self.document.query_selector("header")? {
            set_class(&header, "scrolled", fade.active)?;
        }
        Ok(())
    }

    pub fn wire_scroll(&self) -> Result<()> {
        let chrome = self.clone();
        render::listen(&self.window, "scroll", move |_: web_sys::Event| {
            if let Err(err) = chrome.update_header() {
                log::warn!("header fade: {err}");
            }
        })?;
        Ok(())
    }

    pub fn open_modal(&self, project: &str) -> Result<()> {
        if let Some(modal) = self.document.get_element_by_id(&page::modal_id(project)) {
            set_class(&modal, "active", true)?;
            self.body_scroll(true)?;
        }
        Ok(())
    }

    pub fn close_modal(&self, project: &str) -> Result<()> {
        if let Some(modal) = self.document.get_element_by_id(&page::modal_id(project)) {
            set_class(&modal, "active", false)?;
            self.body_scroll(false)?;
        }
        Ok(())
    }

    pub fn close_all_modals(&self) -> Result<()> {
        let open = self.document.query_selector_all(".modal.active")?;
        for i in 0..open.length() {
            if let Some(modal) = open.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                set_class(&modal, "active", false)?;
                self.body_scroll(false)?;
            }
        }
        Ok(())
    }

    pub fn toggle_more_projects(&self) -> Result<()> {
        let hidden = self.document.query_selector_all(".project-hidden")?;
        for i in 0..hidden.length() {
            if let Some(project) = hidden.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                project.class_list().toggle("show")?;
            }
        }
        if let Some(button) = self.document.get_element_by_id("showMoreBtn") {
            button.class_list().toggle("expanded")?;
        }
        Ok(())
    }

    /// Marks `panel`'s canvas and caption as shown or hidden.
    pub fn show_panel(&self, panel: Panel, shown: bool) -> Result<()> {
        if let Some(canvas) = self.document.get_element_by_id(&panel.canvas_id()) {
            set_class(&canvas, "active", shown)?;
        }
        let selector = format!(".viz-panel[data-viz=\"{}\"]", panel.key());
        if let Some(caption) = self.document.query_selector(&selector)? {
            set_class(&caption, "active", shown)?;
        }
        Ok(())
    }

    /// Whether the visualization area overlaps the viewport.
    pub fn viz_in_view(&self) -> bool {
        let Some(area) = self.document.get_element_by_id(VIZ_AREA) else {
            return false;
        };
        let rect = area.get_bounding_client_rect();
        let height = self
            .window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0);
        page::in_view(rect.top(), rect.bottom(), height)
    }

    /// Runs `callback` once, the first time the visualization area is at
    /// least 30% visible.
    pub fn when_viz_visible<F>(&self, callback: F) -> Result<()>
    where
        F: FnMut() + 'static,
    {
        let Some(area) = self.document.get_element_by_id(VIZ_AREA) else {
            return Err(VizError::MissingElement(VIZ_AREA.into()));
        };
        let mut callback = callback;
        let on_change = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if entry.is_intersecting() {
                    callback();
                    observer.unobserve(&entry.target());
                }
            }
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(0.3));
        let observer =
            IntersectionObserver::new_with_options(on_change.as_ref().unchecked_ref(), &options)?;
        observer.observe(&area);
        on_change.forget();
        Ok(())
    }
}
