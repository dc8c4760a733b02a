use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use log::error;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, CanvasRenderingContext2d, EventTarget, HtmlCanvasElement, HtmlElement, MouseEvent,
};

use crate::error::{Result, VizError};

type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Calls `frame` on every animation frame with the timestamp in seconds.
pub fn animate<F>(mut frame: F) -> Result<(), JsValue>
where
    F: FnMut(f64) + 'static,
{
    // `f` holds the animation-frame closure so it can re-arm itself. The
    // `Option` lets us build the closure first and store it afterwards.
    let f: FrameSlot = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
        frame(timestamp / 1000.0);

        // schedule next
        if let Err(err) = request_frame(&f) {
            error!("animation loop stopped: {err:?}");
        }
    }) as Box<dyn FnMut(f64)>));

    request_frame(&g)
}

fn request_frame(slot: &FrameSlot) -> Result<(), JsValue> {
    let window = window().ok_or("no window")?;
    if let Some(callback) = slot.borrow().as_ref() {
        window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    }
    Ok(())
}

/// Attaches `handler` to `event` on `target` for the lifetime of the page.
pub fn listen<E, F>(target: &EventTarget, event: &str, handler: F) -> Result<(), JsValue>
where
    E: FromWasmAbi + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Runs `handler` whenever the window is resized.
pub fn on_resize<F>(handler: F) -> Result<(), JsValue>
where
    F: FnMut() + 'static,
{
    let mut handler = handler;
    let window = window().ok_or("no window")?;
    listen(&window, "resize", move |_: web_sys::Event| handler())
}

/// Matches the canvas backing store to its container's layout size, scaled
/// by `pixel_ratio`. Returns the new size in device pixels.
pub fn fit_canvas(canvas: &HtmlCanvasElement, pixel_ratio: f64) -> (u32, u32) {
    let container = canvas
        .parent_element()
        .and_then(|parent| parent.dyn_into::<HtmlElement>().ok());
    let (w, h) = match container {
        Some(parent) => (parent.offset_width(), parent.offset_height()),
        None => (canvas.offset_width(), canvas.offset_height()),
    };
    let width = (f64::from(w.max(0)) * pixel_ratio) as u32;
    let height = (f64::from(h.max(0)) * pixel_ratio) as u32;
    canvas.set_width(width);
    canvas.set_height(height);
    (width, height)
}

/// Pointer position relative to the canvas' top-left corner.
pub fn pointer(canvas: &HtmlCanvasElement, event: &MouseEvent) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(
        (f64::from(event.client_x()) - rect.left()) as f32,
        (f64::from(event.client_y()) - rect.top()) as f32,
    )
}

pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")?
        .ok_or(VizError::ContextUnavailable("2d"))?
        .dyn_into()
        .map_err(|_| VizError::ContextUnavailable("2d"))
}

/// `devicePixelRatio`, capped at 2.
pub fn pixel_ratio() -> f64 {
    window().map_or(1.0, |w| w.device_pixel_ratio().min(2.0))
}
