// error.rs - Engine error type
//
// Everything here is non-fatal to the page: callers log and carry on.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum FlyupError {
    #[error("no global window")]
    NoWindow,

    #[error("element #{0} not found")]
    MissingElement(String),

    #[error("canvas has no 2d context")]
    NoContext,

    #[error("javascript error: {0}")]
    Js(String),

    #[error("failed to load {path}: {reason}")]
    Asset { path: String, reason: String },

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid config: `{field}` = {value}")]
    InvalidConfig { field: &'static str, value: f64 },

    #[error("unknown mode `{0}` (expected `single` or `multi`)")]
    UnknownMode(String),

    #[cfg(not(target_arch = "wasm32"))]
    #[error("image: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, FlyupError>;

impl From<JsValue> for FlyupError {
    fn from(v: JsValue) -> Self {
        FlyupError::Js(v.as_string().unwrap_or_else(|| format!("{v:?}")))
    }
}

impl From<FlyupError> for JsValue {
    fn from(e: FlyupError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}
