use thiserror::Error;
use wasm_bindgen::JsValue;

/// Error type produced by the browser glue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WebError {
    /// The DOM APIs are not accessible (e.g., when executed outside of a browser).
    #[error("DOM is not available")]
    DomUnavailable,
    /// The page went away before an awaited element showed up.
    #[error("Stopped waiting for `{0}`")]
    Abandoned(String),
    /// The config passed in from JavaScript could not be used.
    #[error("Invalid configuration: {0}")]
    Config(String),
    /// Selecting or writing the conversation colour failed.
    #[error("Could not apply conversation colour: {0}")]
    Apply(#[from] hueshift::EngineError),
    /// Wrapper around JavaScript exceptions.
    #[error("JavaScript error: {0}")]
    Js(String),
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        Self::Js(js_message(&value))
    }
}

impl From<WebError> for JsValue {
    fn from(value: WebError) -> Self {
        Self::from(value.to_string())
    }
}

impl From<hueshift::ConfigError> for WebError {
    fn from(value: hueshift::ConfigError) -> Self {
        Self::Config(value.to_string())
    }
}

/// Best-effort text of a thrown JavaScript value.
pub fn js_message(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    js_sys::Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}
