#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Portfolio page visualizations compiled to WebAssembly.
//!
//! The simulation modules are plain Rust and run (and are tested) on the
//! host. Only `wasm` touches the DOM.

pub mod clock;
pub mod config;
pub mod error;
pub mod limitless;
pub mod neural;
pub mod page;
pub mod particles;
pub mod projection;
pub mod quantum;

pub use config::VizConfig;
pub use error::{Result, VizError};

// Only compile wasm-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod app;
    mod chrome;
    mod gl;
    mod neural;
    mod quantum;
    mod render;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        app::start()
    }

    #[wasm_bindgen(js_name = switchViz)]
    pub fn switch_viz(direction: i32) {
        app::with_app(|app| app.switch_panel(direction));
    }

    #[wasm_bindgen(js_name = switchLimitlessTechnique)]
    pub fn switch_limitless_technique(direction: i32) {
        app::with_app(|app| app.switch_technique(direction));
    }

    #[wasm_bindgen(js_name = applyHadamard)]
    pub fn apply_hadamard() {
        app::with_app(|app| app.gate(|q| q.hadamard()));
    }

    #[wasm_bindgen(js_name = applyPauliX)]
    pub fn apply_pauli_x() {
        app::with_app(|app| app.gate(|q| q.pauli_x()));
    }

    #[wasm_bindgen(js_name = applyPhase)]
    pub fn apply_phase() {
        app::with_app(|app| app.gate(|q| q.phase()));
    }

    #[wasm_bindgen(js_name = resetQuantum)]
    pub fn reset_quantum() {
        app::with_app(|app| app.gate(|q| q.reset()));
    }

    #[wasm_bindgen(js_name = openModal)]
    pub fn open_modal(project: &str) {
        app::with_app(|app| app.chrome().open_modal(project));
    }

    #[wasm_bindgen(js_name = closeModal)]
    pub fn close_modal(project: &str) {
        app::with_app(|app| app.chrome().close_modal(project));
    }

    #[wasm_bindgen(js_name = toggleMoreProjects)]
    pub fn toggle_more_projects() {
        app::with_app(|app| app.chrome().toggle_more_projects());
    }
}
