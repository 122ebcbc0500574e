//! Start-up sequence and click wiring.

use std::cell::RefCell;
use std::rc::Rc;

use hueshift::{EngineConfig, Recolourer};
use tracing::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Event;

use crate::dom::{self, ConversationRow, DomDocument, DomStyle};
use crate::error::WebError;
use crate::observe::wait_for_element;
use crate::trusted::CssWriter;

/// The engine shared by every click listener of a page.
pub type SharedEngine = Rc<RefCell<Recolourer<DomStyle>>>;

/// Waits for the conversation view, then recolours it for the selected
/// conversation and for every row clicked afterwards.
///
/// # Errors
/// Returns [`WebError`] when the page cannot be reached, a listener cannot
/// be attached, or the initial colouring fails. Listeners stay attached in
/// the last case, so later clicks still recolour.
pub async fn run(config: EngineConfig) -> Result<(), WebError> {
    let (window, document) = dom::page()?;
    wait_for_element(&document, &config.selectors.message_content).await?;

    let theme = dom::detect_theme(&window, &document, &config.theme_probe);
    let writer = Rc::new(CssWriter::install(&window));
    let styles = DomDocument::new(document.clone(), config.selectors.style_tag.clone(), writer);
    let rows = dom::conversation_rows(&document, &config.selectors)?;
    let selected_class = config.selectors.selected_class.clone();

    let engine: SharedEngine = Rc::new(RefCell::new(Recolourer::new(config, theme)));
    for row in &rows {
        attach(RowClick::new(row.clone(), Rc::clone(&engine), styles.clone()))?;
    }
    info!(app.rows = rows.len(), "Click listeners attached");

    match dom::initial_row(&rows, &selected_class) {
        Some(row) => {
            engine.borrow_mut().apply(&styles, row)?;
        }
        None => warn!(app.selector = "list_item", "No conversation rows found"),
    }
    Ok(())
}

/// Recolours the page for one conversation row.
#[derive(Debug, Clone)]
pub struct RowClick {
    row: ConversationRow,
    engine: SharedEngine,
    styles: DomDocument,
}

impl RowClick {
    pub fn new(row: ConversationRow, engine: SharedEngine, styles: DomDocument) -> Self {
        Self { row, engine, styles }
    }

    pub const fn row(&self) -> &ConversationRow {
        &self.row
    }

    /// Runs one interaction. A click that arrives while another is being
    /// handled is ignored.
    ///
    /// # Errors
    /// Returns the engine error as a JavaScript exception value.
    pub fn handle(&self) -> Result<(), JsValue> {
        let Ok(mut engine) = self.engine.try_borrow_mut() else {
            warn!("Engine busy, click ignored");
            return Ok(());
        };
        engine
            .apply(&self.styles, &self.row)
            .map(drop)
            .map_err(|err| JsValue::from(WebError::from(err)))
    }
}

/// Registers `click` as the row's click listener. Errors returned by the
/// listener are thrown back to the page.
///
/// # Errors
/// Returns [`WebError::Js`] if the listener cannot be added.
pub fn attach(click: RowClick) -> Result<(), WebError> {
    let element = click.row().element().clone();
    let handler = Closure::<dyn FnMut(Event) -> Result<(), JsValue>>::new(move |_event: Event| click.handle());
    element.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())?;
    // the listener lives as long as the row
    handler.forget();
    Ok(())
}
