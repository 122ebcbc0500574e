//! Browser-based WASM tests.
//!
//! Run with: wasm-pack test --headless --chrome crates/hueshift-wasm

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use hueshift::config::{Selectors, ThemeProbe};
use hueshift::memory::{MemoryDocument, MemoryStyle};
use hueshift::{
    AvatarSource, EngineConfig, EngineError, PixelSurface, Recolourer, StyleSource, SurfaceError, Theme,
};
use hueshift_wasm::WebError;
use hueshift_wasm::app::{self, RowClick};
use hueshift_wasm::dom::{self, CanvasSurface, ConversationRow, DomDocument};
use hueshift_wasm::observe::wait_for_element;
use hueshift_wasm::trusted::CssWriter;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    dom::page().unwrap().1
}

fn style(css: &str) -> Element {
    let doc = document();
    let element = doc.create_element("style").unwrap();
    element.set_inner_html(css);
    doc.body().unwrap().append_child(&element).unwrap();
    element
}

/// A conversation row with a solid-colour avatar canvas.
fn row(fill: &str, first_child_class: &str) -> Element {
    row_in("mws-conversation-list-item", fill, first_child_class)
}

fn row_in(tag: &str, fill: &str, first_child_class: &str) -> Element {
    let doc = document();
    let row = doc.create_element(tag).unwrap();
    let inner = doc.create_element("div").unwrap();
    inner.set_class_name(first_child_class);
    row.append_child(&inner).unwrap();

    let canvas: HtmlCanvasElement = doc.create_element("canvas").unwrap().dyn_into().unwrap();
    canvas.set_width(4);
    canvas.set_height(4);
    inner.append_child(&canvas).unwrap();
    paint(&row, fill);

    doc.body().unwrap().append_child(&row).unwrap();
    row
}

fn paint(row: &Element, fill: &str) {
    let canvas: HtmlCanvasElement = row.query_selector("canvas").unwrap().unwrap().dyn_into().unwrap();
    let context: CanvasRenderingContext2d = canvas.get_context("2d").unwrap().unwrap().dyn_into().unwrap();
    context.set_fill_style_str(fill);
    context.fill_rect(0.0, 0.0, 4.0, 4.0);
}

/// Default config with page selectors of its own, so tests never match the
/// real conversation view.
fn run_config(prefix: &str) -> EngineConfig {
    EngineConfig {
        selectors: Selectors {
            message_content: format!("{prefix}-ready"),
            list_item: format!("{prefix}-row"),
            ..Selectors::default()
        },
        ..EngineConfig::default()
    }
}

fn mark_ready(prefix: &str) -> Element {
    let doc = document();
    let ready = doc.create_element(&format!("{prefix}-ready")).unwrap();
    doc.body().unwrap().append_child(&ready).unwrap();
    ready
}

#[wasm_bindgen_test]
fn test_version() {
    let version = hueshift_wasm::version();
    assert!(version.contains('.'));
}

#[wasm_bindgen_test]
fn test_canvas_surface_reads_pixels() {
    let element = row("rgb(16, 32, 48)", "list-item");
    let canvas: HtmlCanvasElement = element.query_selector("canvas").unwrap().unwrap().dyn_into().unwrap();
    let surface = CanvasSurface::new(&canvas).unwrap();

    assert_eq!(surface.dimensions(), (4, 4));
    let pixels = surface.read_all().unwrap();
    assert_eq!(pixels.len(), 64);
    assert_eq!(&pixels[..4], &[16, 32, 48, 255]);
    element.remove();
}

#[wasm_bindgen_test]
fn test_row_without_canvas_has_no_avatar() {
    let doc = document();
    let element = doc.create_element("mws-conversation-list-item").unwrap();
    let row = ConversationRow::new(element, "canvas");

    assert_eq!(row.avatar().err(), Some(SurfaceError::MissingAvatar));
}

#[wasm_bindgen_test]
async fn test_run_colours_selected_row_then_follows_clicks() {
    let sheet = style(".hs-click{--xms-outgoing-bg-color:#ecf3fe;}");
    let ready = mark_ready("hs-click");
    let element = row_in("hs-click-row", "rgb(16, 32, 48)", "list-item selected");

    app::run(run_config("hs-click")).await.unwrap();
    assert_eq!(sheet.inner_html(), ".hs-click{--xms-outgoing-bg-color:#74849440;}");

    paint(&element, "rgb(0, 0, 0)");
    element.dyn_ref::<HtmlElement>().unwrap().click();
    assert_eq!(sheet.inner_html(), ".hs-click{--xms-outgoing-bg-color:#64646440;}");

    sheet.remove();
    ready.remove();
    element.remove();
}

#[wasm_bindgen_test]
async fn test_run_rejects_when_initial_avatar_missing() {
    let ready = mark_ready("hs-bare");
    let doc = document();
    let bare = doc.create_element("hs-bare-row").unwrap();
    doc.body().unwrap().append_child(&bare).unwrap();

    let err = app::run(run_config("hs-bare")).await.unwrap_err();
    assert_eq!(err, WebError::Apply(EngineError::Surface(SurfaceError::MissingAvatar)));

    ready.remove();
    bare.remove();
}

#[wasm_bindgen_test]
fn test_row_click_throws_engine_error() {
    let doc = document();
    let bare = doc.create_element("hs-throw-row").unwrap();
    let styles = DomDocument::new(doc, "style", Rc::new(CssWriter::plain()));
    let engine = Rc::new(RefCell::new(Recolourer::new(EngineConfig::default(), Theme::Light)));
    let click = RowClick::new(ConversationRow::new(bare, "canvas"), engine, styles);

    let thrown = click.handle().unwrap_err();
    assert_eq!(
        thrown.as_string().as_deref(),
        Some("Could not apply conversation colour: Conversation has no avatar surface")
    );
}

#[wasm_bindgen_test]
fn test_row_click_patches_live_style() {
    let sheet = style(".hs-apply{--xms-outgoing-bg-color:#ecf3fe;}");
    let element = row("rgb(16, 32, 48)", "list-item");
    let styles = DomDocument::new(document(), "style", Rc::new(CssWriter::plain()));
    let engine = Rc::new(RefCell::new(Recolourer::new(EngineConfig::default(), Theme::Light)));

    let click = RowClick::new(ConversationRow::new(element.clone(), "canvas"), engine, styles);
    click.handle().unwrap();
    assert_eq!(sheet.inner_html(), ".hs-apply{--xms-outgoing-bg-color:#74849440;}");

    sheet.remove();
    element.remove();
}

#[wasm_bindgen_test]
fn test_dom_document_lists_style_elements() {
    let sheet = style(".hs-list{}");
    let styles = DomDocument::new(document(), "style", Rc::new(CssWriter::plain()));
    assert!(styles.containers().iter().any(|c| c.element() == &sheet));
    sheet.remove();
}

#[wasm_bindgen_test]
fn test_initial_row_prefers_selected() {
    let first = row("rgb(0, 0, 0)", "list-item");
    let second = row("rgb(0, 0, 0)", "list-item selected");
    let selectors = Selectors::default();
    let rows = vec![
        ConversationRow::new(first.clone(), "canvas"),
        ConversationRow::new(second.clone(), "canvas"),
    ];

    let chosen = dom::initial_row(&rows, &selectors.selected_class).unwrap();
    assert_eq!(chosen.element(), &second);
    let fallback = dom::initial_row(&rows[..1], &selectors.selected_class).unwrap();
    assert_eq!(fallback.element(), &first);

    first.remove();
    second.remove();
}

#[wasm_bindgen_test]
fn test_detect_theme_dark() {
    let doc = document();
    let probe = ThemeProbe::default();
    let container = doc.create_element(&probe.selector).unwrap();
    container
        .set_attribute("style", "--conv-container-host-bg-color: #202124")
        .unwrap();
    doc.body().unwrap().append_child(&container).unwrap();

    let window = web_sys::window().unwrap();
    assert_eq!(dom::detect_theme(&window, &doc, &probe), Theme::Dark);

    container.remove();
    assert_eq!(dom::detect_theme(&window, &doc, &probe), Theme::Light);
}

#[wasm_bindgen_test]
async fn test_wait_for_element_sees_late_insertion() {
    let doc = document();
    let late = doc.create_element("hs-late-element").unwrap();
    let body = doc.body().unwrap();
    let inserted = late.clone();
    wasm_bindgen_futures::spawn_local(async move {
        body.append_child(&inserted).unwrap();
    });

    let found = wait_for_element(&doc, "hs-late-element").await.unwrap();
    assert_eq!(found, late);
    late.remove();
}

#[wasm_bindgen_test]
fn test_memory_and_dom_engines_agree() {
    let sheet = style(".hs-agree{--xms-outgoing-bg-color:#ecf3fe;}");
    let element = row("rgb(40, 20, 10)", "list-item");
    let conversation = ConversationRow::new(element.clone(), "canvas");

    let memory = MemoryDocument::new([".hs-agree{--xms-outgoing-bg-color:#ecf3fe;}"]);
    let mut native: Recolourer<MemoryStyle> = Recolourer::new(EngineConfig::default(), Theme::Light);
    native.apply(&memory, &conversation).unwrap();

    let styles = DomDocument::new(document(), "style", Rc::new(CssWriter::plain()));
    let mut browser = Recolourer::new(EngineConfig::default(), Theme::Light);
    browser.apply(&styles, &conversation).unwrap();

    assert_eq!(sheet.inner_html(), memory.text(0));
    sheet.remove();
    element.remove();
}
