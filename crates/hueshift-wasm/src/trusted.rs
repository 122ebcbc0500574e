//! Stylesheet write-back through a Trusted Types policy.
//!
//! Pages that enforce `require-trusted-types-for 'script'` reject plain
//! strings assigned to `innerHTML`. When `window.trustedTypes` exists we
//! register an identity `createHTML` policy and assign its output instead.

use hueshift::TrustedCss;
use js_sys::{Function, Object, Reflect};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Window};

use crate::error::{WebError, js_message};

/// Name the policy is registered under.
pub const POLICY_NAME: &str = "forceInner";

#[derive(Debug, Clone)]
struct Policy {
    policy: JsValue,
    create_html: Function,
}

/// Writes patched CSS into style elements.
#[derive(Debug, Clone, Default)]
pub struct CssWriter {
    policy: Option<Policy>,
}

impl CssWriter {
    /// Writer that assigns plain strings.
    pub fn plain() -> Self {
        Self::default()
    }

    /// Registers the policy on `window` when Trusted Types are available,
    /// otherwise returns a plain writer.
    pub fn install(window: &Window) -> Self {
        match create_policy(window) {
            Ok(Some(policy)) => {
                debug!(trusted.policy = POLICY_NAME, "Trusted Types policy registered");
                Self { policy: Some(policy) }
            }
            Ok(None) => Self::plain(),
            Err(err) => {
                warn!(error = %err, "Could not register Trusted Types policy, writing plain strings");
                Self::plain()
            }
        }
    }

    pub const fn is_trusted(&self) -> bool {
        self.policy.is_some()
    }

    /// Replaces the element's markup with `css`.
    ///
    /// # Errors
    /// Returns [`WebError::Js`] if the policy or the assignment throws.
    pub fn write(&self, element: &Element, css: &TrustedCss) -> Result<(), WebError> {
        let Some(policy) = &self.policy else {
            element.set_inner_html(css.as_str());
            return Ok(());
        };
        let html = policy
            .create_html
            .call1(&policy.policy, &JsValue::from_str(css.as_str()))?;
        Reflect::set(element, &JsValue::from_str("innerHTML"), &html)?;
        Ok(())
    }
}

fn create_policy(window: &Window) -> Result<Option<Policy>, WebError> {
    let factory = Reflect::get(window, &JsValue::from_str("trustedTypes"))?;
    if factory.is_undefined() || factory.is_null() {
        return Ok(None);
    }

    let create_policy: Function = Reflect::get(&factory, &JsValue::from_str("createPolicy"))?
        .dyn_into()
        .map_err(|value| WebError::Js(js_message(&value)))?;

    let rules = Object::new();
    let identity = Closure::<dyn Fn(String) -> String>::new(|html: String| html).into_js_value();
    Reflect::set(&rules, &JsValue::from_str("createHTML"), &identity)?;

    let policy = create_policy.call2(&factory, &JsValue::from_str(POLICY_NAME), &rules)?;
    let create_html: Function = Reflect::get(&policy, &JsValue::from_str("createHTML"))?
        .dyn_into()
        .map_err(|value| WebError::Js(js_message(&value)))?;

    Ok(Some(Policy { policy, create_html }))
}
