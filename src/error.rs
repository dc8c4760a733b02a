//! Error type shared by the presenters and the config loader.
//!
//! Nothing in the simulation itself can fail. Errors only come from the host
//! page (missing canvas, no WebGL2) or from a malformed config document, and
//! in both cases the affected visualization is skipped rather than aborting
//! the rest of the page.

use thiserror::Error;

/// Errors raised while wiring a visualization to the page.
#[derive(Error, Debug)]
pub enum VizError {
    /// A required DOM element was not found.
    #[error("element not found: #{0}")]
    MissingElement(String),

    /// The canvas refused to hand out the requested drawing context.
    #[error("{0} context not supported")]
    ContextUnavailable(&'static str),

    /// Shader compilation or program linking failed.
    #[error("shader error: {0}")]
    Shader(String),

    /// The embedded config document could not be parsed.
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    /// A JavaScript call threw.
    #[error("javascript error: {0}")]
    Js(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for VizError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<VizError> for wasm_bindgen::JsValue {
    fn from(err: VizError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

pub type Result<T, E = VizError> = std::result::Result<T, E>;
