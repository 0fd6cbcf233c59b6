// ============================================================================
// FLYUP - Tap to fold a paper airplane, watch it loop, crumple and fall
// ============================================================================
//
// Everything but `web` is plain Rust and runs natively (tests, replay tool).

pub mod color;
pub mod config;
pub mod error;
pub mod input;
pub mod render;
pub mod sim;
pub mod skin;

#[cfg(target_arch = "wasm32")]
mod web;

pub use config::{Config, Mode};
pub use error::{FlyupError, Result};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn boot() {
    console_error_panic_hook::set_once();
    // Only fails if a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
}

#[cfg(target_arch = "wasm32")]
const DEFAULT_CANVAS_ID: &str = "drawingCanvas";
#[cfg(target_arch = "wasm32")]
const DEFAULT_SPLASH_ID: &str = "splashScreen";

/// Start on the page with default settings. Ids default to
/// `drawingCanvas` and `splashScreen`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn run(canvas_id: Option<String>, splash_id: Option<String>) {
    launch(canvas_id, splash_id, Config::default());
}

/// Start with overrides from a plain JS object (see `Config`).
/// Throws on a malformed config.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn run_with_config(
    canvas_id: Option<String>,
    splash_id: Option<String>,
    config: JsValue,
) -> std::result::Result<(), JsValue> {
    let json: String = js_sys::JSON::stringify(&config)?.into();
    let config = Config::from_json(&json)?;
    launch(canvas_id, splash_id, config);
    Ok(())
}

/// Missing elements are logged, not thrown: the page just stays static.
#[cfg(target_arch = "wasm32")]
fn launch(canvas_id: Option<String>, splash_id: Option<String>, config: Config) {
    let canvas_id = canvas_id.as_deref().unwrap_or(DEFAULT_CANVAS_ID);
    let splash_id = splash_id.as_deref().unwrap_or(DEFAULT_SPLASH_ID);
    if let Err(err) = web::start(canvas_id, splash_id, config) {
        log::error!("flyup not started: {err}");
    }
}
