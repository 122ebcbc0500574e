//! The engine's collaborator traits on top of the live DOM.

use std::rc::Rc;

use hueshift::config::{Selectors, ThemeProbe};
use hueshift::{AvatarSource, PixelSurface, StyleContainer, StyleSource, SurfaceError, Theme, TrustedCss};
use js_sys::{Object, Reflect};
use tracing::{debug, error};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, Window};

use crate::error::{WebError, js_message};
use crate::trusted::CssWriter;

/// Returns the browser window and its document.
///
/// # Errors
/// Returns [`WebError::DomUnavailable`] outside a browser.
pub fn page() -> Result<(Window, Document), WebError> {
    let window = web_sys::window().ok_or(WebError::DomUnavailable)?;
    let document = window.document().ok_or(WebError::DomUnavailable)?;
    Ok((window, document))
}

/// One `<style>` element.
#[derive(Debug, Clone)]
pub struct DomStyle {
    element: Element,
    writer: Rc<CssWriter>,
}

impl DomStyle {
    pub fn new(element: Element, writer: Rc<CssWriter>) -> Self {
        Self { element, writer }
    }

    pub const fn element(&self) -> &Element {
        &self.element
    }
}

impl StyleContainer for DomStyle {
    fn text(&self) -> String {
        self.element.inner_html()
    }

    fn write(&self, css: &TrustedCss) {
        if let Err(err) = self.writer.write(&self.element, css) {
            error!(error = %err, "Failed to write stylesheet");
        }
    }
}

/// Every style element of a document, looked up by tag name on each scan.
#[derive(Debug, Clone)]
pub struct DomDocument {
    document: Document,
    tag: String,
    writer: Rc<CssWriter>,
}

impl DomDocument {
    pub fn new(document: Document, tag: impl Into<String>, writer: Rc<CssWriter>) -> Self {
        Self {
            document,
            tag: tag.into(),
            writer,
        }
    }
}

impl StyleSource for DomDocument {
    type Container = DomStyle;

    fn containers(&self) -> Vec<DomStyle> {
        let collection = self.document.get_elements_by_tag_name(&self.tag);
        (0..collection.length())
            .filter_map(|i| collection.item(i))
            .map(|element| DomStyle::new(element, Rc::clone(&self.writer)))
            .collect()
    }
}

/// A conversation list row whose avatar is drawn into a canvas.
#[derive(Debug, Clone)]
pub struct ConversationRow {
    element: Element,
    avatar: String,
}

impl ConversationRow {
    pub fn new(element: Element, avatar_selector: impl Into<String>) -> Self {
        Self {
            element,
            avatar: avatar_selector.into(),
        }
    }

    pub const fn element(&self) -> &Element {
        &self.element
    }

    /// True when the row's first child carries exactly `selected_class`.
    pub fn is_selected(&self, selected_class: &str) -> bool {
        self.element
            .first_child()
            .and_then(|child| child.dyn_into::<Element>().ok())
            .is_some_and(|child| child.class_name() == selected_class)
    }
}

impl AvatarSource for ConversationRow {
    fn avatar(&self) -> Result<Box<dyn PixelSurface + '_>, SurfaceError> {
        let canvas = self
            .element
            .query_selector(&self.avatar)
            .map_err(|err| SurfaceError::Unavailable(js_message(&err)))?
            .ok_or(SurfaceError::MissingAvatar)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| SurfaceError::Unavailable("avatar is not a canvas".to_string()))?;
        Ok(Box::new(CanvasSurface::new(&canvas)?))
    }
}

/// Pixel access to a canvas through its 2D context.
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    context: CanvasRenderingContext2d,
    width: u32,
    height: u32,
}

impl CanvasSurface {
    /// Opens a 2D context tuned for repeated read-back.
    ///
    /// # Errors
    /// Returns [`SurfaceError::Unavailable`] when no 2D context can be had.
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, SurfaceError> {
        let unavailable = |err: JsValue| SurfaceError::Unavailable(js_message(&err));

        let options = Object::new();
        Reflect::set(&options, &JsValue::from_str("willReadFrequently"), &JsValue::TRUE)
            .map_err(unavailable)?;
        let context = canvas
            .get_context_with_context_options("2d", &options)
            .map_err(unavailable)?
            .ok_or_else(|| SurfaceError::Unavailable("no 2d context".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SurfaceError::Unavailable("not a 2d context".to_string()))?;

        Ok(Self {
            context,
            width: canvas.width(),
            height: canvas.height(),
        })
    }
}

impl PixelSurface for CanvasSurface {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn image_data(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Vec<u8>, SurfaceError> {
        if width == 0 || height == 0 {
            return Ok(Vec::new());
        }
        let data = self
            .context
            .get_image_data(f64::from(x), f64::from(y), f64::from(width), f64::from(height))
            .map_err(|err| SurfaceError::Read(js_message(&err)))?;
        Ok(data.data().0)
    }
}

/// All conversation rows currently in the list.
///
/// # Errors
/// Returns [`WebError::Js`] if the selector is rejected.
pub fn conversation_rows(document: &Document, selectors: &Selectors) -> Result<Vec<ConversationRow>, WebError> {
    let nodes = document.query_selector_all(&selectors.list_item)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .map(|element| ConversationRow::new(element, selectors.avatar.clone()))
        .collect())
}

/// The row to colour for on start-up: the selected one, else the first.
pub fn initial_row<'a>(rows: &'a [ConversationRow], selected_class: &str) -> Option<&'a ConversationRow> {
    rows.iter()
        .find(|row| row.is_selected(selected_class))
        .or_else(|| rows.first())
}

/// Reads the probe property from the computed style and classifies it.
///
/// Anything missing along the way counts as light.
pub fn detect_theme(window: &Window, document: &Document, probe: &ThemeProbe) -> Theme {
    let computed = document
        .query_selector(&probe.selector)
        .ok()
        .flatten()
        .and_then(|element| window.get_computed_style(&element).ok().flatten())
        .and_then(|style| style.get_property_value(&probe.property).ok());

    match computed {
        Some(value) => Theme::classify(&value, &probe.dark_marker),
        None => {
            debug!(theme.selector = %probe.selector, "Theme probe not found, assuming light");
            Theme::Light
        }
    }
}
