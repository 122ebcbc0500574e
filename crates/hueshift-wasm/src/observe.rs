//! Waiting for page elements with a `MutationObserver`.

use std::cell::RefCell;
use std::rc::Rc;

use hueshift::ready::wait_for;
use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, MutationObserver, MutationObserverInit};

use crate::error::WebError;

/// Resolves with the first element matching `selector`, waiting for it to
/// be inserted if it is not there yet. There is no timeout.
///
/// # Errors
/// Returns [`WebError::Js`] if the observer cannot be set up.
pub async fn wait_for_element(document: &Document, selector: &str) -> Result<Element, WebError> {
    let probe_document = document.clone();
    let probe_selector = selector.to_string();
    let (readiness, ready) = wait_for(move || {
        probe_document
            .query_selector(&probe_selector)
            .ok()
            .flatten()
    });

    if readiness.is_resolved() {
        return ready
            .await
            .ok_or_else(|| WebError::Abandoned(selector.to_string()));
    }

    debug!(observe.selector = selector, "Waiting for element");
    let readiness = Rc::new(RefCell::new(readiness));
    let callback = {
        let readiness = Rc::clone(&readiness);
        Closure::<dyn FnMut()>::new(move || {
            readiness.borrow_mut().poke();
        })
    };

    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let options = MutationObserverInit::new();
    options.set_child_list(true);
    options.set_subtree(true);
    let root = document
        .document_element()
        .ok_or(WebError::DomUnavailable)?;
    observer.observe_with_options(&root, &options)?;

    let found = ready.await;
    observer.disconnect();
    drop(callback);

    found.ok_or_else(|| WebError::Abandoned(selector.to_string()))
}
