//! In-memory style containers.
//!
//! Useful for native hosts that hold stylesheet text themselves, and for
//! exercising the patcher without a browser.

use std::cell::RefCell;
use std::rc::Rc;

use crate::patch::{StyleContainer, StyleSource, TrustedCss};

/// A shared, mutable block of stylesheet text.
#[derive(Debug, Clone, Default)]
pub struct MemoryStyle(Rc<RefCell<String>>);

impl MemoryStyle {
    pub fn new(text: impl Into<String>) -> Self {
        Self(Rc::new(RefCell::new(text.into())))
    }

    pub fn set(&self, text: impl Into<String>) {
        *self.0.borrow_mut() = text.into();
    }
}

impl StyleContainer for MemoryStyle {
    fn text(&self) -> String {
        self.0.borrow().clone()
    }

    fn write(&self, css: &TrustedCss) {
        self.set(css.as_str());
    }
}

/// An ordered collection of [`MemoryStyle`] containers.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    styles: RefCell<Vec<MemoryStyle>>,
}

impl MemoryDocument {
    pub fn new<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            styles: RefCell::new(texts.into_iter().map(MemoryStyle::new).collect()),
        }
    }

    /// Appends a container, as a page does when it injects a `<style>`.
    pub fn push(&self, text: impl Into<String>) {
        self.styles.borrow_mut().push(MemoryStyle::new(text));
    }

    /// Inserts a container in front of the others.
    pub fn prepend(&self, text: impl Into<String>) {
        self.styles.borrow_mut().insert(0, MemoryStyle::new(text));
    }

    pub fn len(&self) -> usize {
        self.styles.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.borrow().is_empty()
    }

    /// Text of container `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn text(&self, index: usize) -> String {
        self.styles.borrow()[index].text()
    }

    /// Replaces the text of container `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn set_text(&self, index: usize, text: impl Into<String>) {
        self.styles.borrow()[index].set(text);
    }
}

impl StyleSource for MemoryDocument {
    type Container = MemoryStyle;

    fn containers(&self) -> Vec<MemoryStyle> {
        self.styles.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_containers_share_text() {
        let doc = MemoryDocument::new(["a", "b"]);
        let containers = doc.containers();
        containers[1].set("c");
        assert_eq!(doc.text(1), "c");
    }

    #[test]
    fn test_prepend_and_push() {
        let doc = MemoryDocument::new(["b"]);
        doc.prepend("a");
        doc.push("c");
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.text(0), "a");
        assert_eq!(doc.text(2), "c");
    }
}
