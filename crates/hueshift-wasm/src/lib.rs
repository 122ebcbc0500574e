//! # hueshift-wasm
//!
//! Browser glue for the `hueshift` engine, compiled to WebAssembly.
//!
//! Loading the module (with the default `autostart` feature) waits for the
//! conversation view, detects the light or dark theme and recolours the
//! outgoing message bubbles to match the selected conversation's avatar.
//!
//! ## Manual start (JavaScript)
//!
//! Build without `autostart` to pass a config:
//!
//! ```javascript
//! import init, { runWithConfig } from 'hueshift-wasm';
//!
//! await init();
//! await runWithConfig(JSON.stringify({ opacity: 0.4, gradient: true }));
//! ```

#![forbid(unsafe_code)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod app;
pub mod dom;
pub mod error;
pub mod logging;
pub mod observe;
pub mod trusted;

use hueshift::EngineConfig;
use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

pub use error::WebError;

fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Module entry point: runs the engine with the default config.
#[cfg(feature = "autostart")]
#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
    let config = EngineConfig::default();
    logging::init(&config.log_filter);
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(err) = app::run(config).await {
            tracing::error!(error = %err, "Recolouring stopped");
        }
    });
}

/// Runs the engine with a JSON config; omitted fields keep their defaults.
///
/// The returned promise resolves once the initial colour is applied and
/// rejects if that first colouring fails.
#[wasm_bindgen(js_name = "runWithConfig")]
pub fn run_with_config(json: &str) -> Result<Promise, JsValue> {
    set_panic_hook();
    let config = EngineConfig::from_json(json).map_err(WebError::from)?;
    logging::init(&config.log_filter);
    Ok(future_to_promise(async move {
        app::run(config).await?;
        Ok(JsValue::UNDEFINED)
    }))
}

/// Module version information.
#[wasm_bindgen(js_name = "version")]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
