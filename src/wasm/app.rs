//! Page bootstrap and the state behind the exported JS functions.

use std::cell::RefCell;
use std::rc::Rc;

use log::{info, warn, Level};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

use super::chrome::Chrome;
use super::gl::LimitlessView;
use super::neural::NeuralView;
use super::quantum::QuantumView;
use super::render;
use crate::config::VizConfig;
use crate::error::{Result, VizError};
use crate::page::{self, Carousel, Panel};
use crate::quantum::Qubit;

const CONFIG_ID: &str = "viz-config";

thread_local! {
    static APP: RefCell<Option<Rc<App>>> = const { RefCell::new(None) };
}

/// Runs `f` against the started page, logging any failure. Calls made
/// before `start` are ignored.
pub fn with_app<F>(f: F)
where
    F: FnOnce(&App) -> Result<()>,
{
    let app = APP.with(|slot| slot.borrow().clone());
    match app {
        Some(app) => {
            if let Err(err) = f(&app) {
                warn!("{err}");
            }
        }
        None => warn!("visualizations not started"),
    }
}

fn canvas(document: &Document, panel: Panel) -> Result<HtmlCanvasElement> {
    let id = panel.canvas_id();
    document
        .get_element_by_id(&id)
        .ok_or_else(|| VizError::MissingElement(id.clone()))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| VizError::MissingElement(id))
}

/// Builds a presenter, logging and skipping it if its canvas or context is
/// unavailable.
fn presenter<T>(panel: Panel, build: impl FnOnce() -> Result<T>) -> Option<Rc<RefCell<T>>> {
    match build() {
        Ok(view) => Some(Rc::new(RefCell::new(view))),
        Err(err) => {
            warn!("skipping {} visualization: {err}", panel.key());
            None
        }
    }
}

fn load_config(document: &Document) -> VizConfig {
    let Some(text) = document
        .get_element_by_id(CONFIG_ID)
        .and_then(|script| script.text_content())
    else {
        return VizConfig::default();
    };
    VizConfig::from_json(&text).unwrap_or_else(|err| {
        warn!("ignoring #{CONFIG_ID}: {err}");
        VizConfig::default()
    })
}

pub struct App {
    chrome: Chrome,
    carousel: RefCell<Carousel>,
    neural: Option<Rc<RefCell<NeuralView>>>,
    quantum: Option<Rc<RefCell<QuantumView>>>,
    limitless: Option<Rc<RefCell<LimitlessView>>>,
}

impl App {
    pub fn chrome(&self) -> &Chrome {
        &self.chrome
    }

    fn start_panel(&self, panel: Panel) -> Result<()> {
        match panel {
            Panel::Neural => self.neural.clone().map(NeuralView::start),
            Panel::Quantum => self.quantum.clone().map(QuantumView::start),
            Panel::Limitless => self.limitless.clone().map(LimitlessView::start),
        }
        .unwrap_or(Ok(()))
    }

    /// Starts `panel`'s animation the first time it becomes visible.
    fn reveal(&self, panel: Panel) -> Result<()> {
        let first = self.carousel.borrow_mut().mark_shown(panel);
        if first {
            self.start_panel(panel)?;
        }
        Ok(())
    }

    pub fn switch_panel(&self, direction: i32) -> Result<()> {
        let switch = self.carousel.borrow_mut().step(direction);
        self.chrome.show_panel(switch.from, false)?;
        self.chrome.show_panel(switch.to, true)?;

        if let Some(limitless) = &self.limitless {
            if switch.from == Panel::Limitless {
                limitless.borrow_mut().set_active(false);
            }
            if switch.to == Panel::Limitless {
                limitless.borrow_mut().set_active(true);
            }
        }
        if switch.first_show {
            self.start_panel(switch.to)?;
        }
        Ok(())
    }

    pub fn switch_technique(&self, direction: i32) -> Result<()> {
        if let Some(limitless) = &self.limitless {
            limitless.borrow_mut().step_technique(direction);
        }
        Ok(())
    }

    pub fn gate(&self, gate: impl FnOnce(&mut Qubit)) -> Result<()> {
        if let Some(quantum) = &self.quantum {
            quantum.borrow_mut().apply(gate);
        }
        Ok(())
    }

    fn on_key(&self, event: &KeyboardEvent) -> Result<()> {
        let key = event.key();
        if key == "Escape" {
            return self.chrome.close_all_modals();
        }
        if let Some(direction) = page::arrow_direction(&key) {
            if self.chrome.viz_in_view() {
                event.prevent_default();
                self.switch_panel(direction)?;
            }
        }
        Ok(())
    }
}

pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(Level::Debug).ok();

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let config = load_config(&document);
    let seed = config
        .seed
        .unwrap_or_else(|| (js_sys::Math::random() * u64::MAX as f64) as u64);

    let app = Rc::new(App {
        chrome: Chrome::new(window, document.clone()),
        carousel: RefCell::new(Carousel::new()),
        neural: presenter(Panel::Neural, || {
            NeuralView::new(canvas(&document, Panel::Neural)?, config.neural.clone(), seed)
        }),
        quantum: presenter(Panel::Quantum, || {
            QuantumView::new(
                canvas(&document, Panel::Quantum)?,
                config.quantum.clone(),
                seed.wrapping_add(1),
            )
        }),
        limitless: presenter(Panel::Limitless, || {
            LimitlessView::new(
                canvas(&document, Panel::Limitless)?,
                config.limitless.clone(),
                seed.wrapping_add(2),
            )
        }),
    });
    APP.with(|slot| *slot.borrow_mut() = Some(app.clone()));

    app.chrome.wire_scroll()?;
    app.chrome.update_header()?;
    render::listen(&document, "keydown", |event: KeyboardEvent| {
        with_app(|app| app.on_key(&event));
    })?;
    let visible = app.chrome.when_viz_visible(|| {
        with_app(|app| {
            let current = app.carousel.borrow().current();
            app.reveal(current)
        });
    });
    if let Err(err) = visible {
        warn!("{err}; starting the first panel now");
        let current = app.carousel.borrow().current();
        app.reveal(current)?;
    }

    info!("visualizations ready (seed {seed})");
    Ok(())
}
