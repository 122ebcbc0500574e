//! In-place rewriting of custom-property declarations inside live style
//! containers.
//!
//! The patcher never parses CSS. It searches for the exact literal
//! `name:value;` it last wrote (ASCII case-insensitive), records where the
//! literal sits, and splices a freshly rendered literal over those byte
//! ranges, leaving every other byte of the container untouched.
//!
//! Recorded offsets go stale whenever anything rewrites the same container,
//! including the patcher itself while handling a sibling property. Every
//! update therefore re-checks the literal at each recorded offset and rescans
//! the document when any of them no longer matches.
//!
//! # Example
//!
//! ```rust
//! use hueshift::color::Colour;
//! use hueshift::memory::MemoryDocument;
//! use hueshift::patch::StylesheetPatcher;
//! use hueshift::payload::PropertyPayload;
//! use hueshift::transform::Accent;
//!
//! let doc = MemoryDocument::new(["body{--a:#111111;--b:#222222;}"]);
//! let mut patcher = StylesheetPatcher::multi([PropertyPayload::new("--a", "#111111")]);
//!
//! let report = patcher.update(&doc, &Accent::Solid(Colour::rgb(0x33, 0x33, 0x33)));
//! assert!(report.is_complete());
//! assert_eq!(doc.text(0), "body{--a:#333333;--b:#222222;}");
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, trace};

use crate::error::PatchError;
use crate::payload::{Location, PropertyPayload, declaration};
use crate::transform::Accent;

/// Stylesheet text produced by the patcher.
///
/// Only the patcher can create one; every substring it splices in is a
/// declaration it rendered itself from hex or gradient values. Hosts that
/// gate markup writes (for example behind a Trusted Types policy) can pass
/// it through as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedCss(String);

impl TrustedCss {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// A style element whose text content can be read and replaced.
pub trait StyleContainer {
    /// Current text content.
    fn text(&self) -> String;

    /// Replaces the text content.
    fn write(&self, css: &TrustedCss);
}

/// The set of style containers in a document.
pub trait StyleSource {
    type Container: StyleContainer + Clone;

    /// All style containers, in document order.
    fn containers(&self) -> Vec<Self::Container>;
}

/// How many occurrences of a literal a scan records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchMode {
    /// First occurrence in the first container that has one.
    Single,
    /// Every occurrence in every container.
    #[default]
    Multi,
}

/// Outcome of one [`StylesheetPatcher::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    /// Properties that were rewritten.
    pub patched: Vec<String>,
    /// Properties whose recorded locations were stale and got rescanned.
    pub rescanned: Vec<String>,
    /// Properties that could not be found.
    pub missing: Vec<PatchError>,
}

impl PatchReport {
    /// True when no property was missing.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Byte offsets of every non-overlapping, ASCII case-insensitive occurrence
/// of `needle` in `haystack`.
pub fn find_all(haystack: &str, needle: &str) -> Vec<usize> {
    let (hay, pat) = (haystack.as_bytes(), needle.as_bytes());
    let mut found = Vec::new();
    if pat.is_empty() {
        return found;
    }

    let mut i = 0;
    while i + pat.len() <= hay.len() {
        if hay[i..i + pat.len()].eq_ignore_ascii_case(pat) {
            found.push(i);
            i += pat.len();
        } else {
            i += 1;
        }
    }
    found
}

fn matches_at(haystack: &str, offset: usize, needle: &str) -> bool {
    haystack
        .as_bytes()
        .get(offset..offset + needle.len())
        .is_some_and(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Replaces `old_len` bytes at each ascending offset with `replacement` in
/// one left-to-right pass, so earlier splices never shift later offsets.
fn splice_all(text: &str, offsets: &[usize], old_len: usize, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len() + offsets.len() * replacement.len());
    let mut cursor = 0;
    for &offset in offsets {
        out.push_str(&text[cursor..offset]);
        out.push_str(replacement);
        cursor = offset + old_len;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Offsets of the replacements inside the spliced text.
fn shifted(offsets: &[usize], old_len: usize, new_len: usize) -> Vec<usize> {
    offsets
        .iter()
        .enumerate()
        .map(|(i, &offset)| offset + i * new_len - i * old_len)
        .collect()
}

/// Keeps a set of custom-property payloads in sync with the selected accent.
#[derive(Debug, Clone)]
pub struct StylesheetPatcher<C> {
    mode: PatchMode,
    payloads: Vec<PropertyPayload<C>>,
}

impl<C: StyleContainer + Clone> StylesheetPatcher<C> {
    pub fn new(mode: PatchMode, payloads: impl IntoIterator<Item = PropertyPayload<C>>) -> Self {
        Self {
            mode,
            payloads: payloads.into_iter().collect(),
        }
    }

    /// Tracks exactly one property at its first occurrence.
    pub fn single(payload: PropertyPayload<C>) -> Self {
        Self::new(PatchMode::Single, [payload])
    }

    /// Tracks every occurrence of every property.
    pub fn multi(payloads: impl IntoIterator<Item = PropertyPayload<C>>) -> Self {
        Self::new(PatchMode::Multi, payloads)
    }

    pub const fn mode(&self) -> PatchMode {
        self.mode
    }

    pub fn payloads(&self) -> &[PropertyPayload<C>] {
        &self.payloads
    }

    pub fn payload(&self, name: &str) -> Option<&PropertyPayload<C>> {
        self.payloads.iter().find(|p| p.name() == name)
    }

    /// Forgets every recorded location; the next update rescans.
    pub fn invalidate(&mut self) {
        for payload in &mut self.payloads {
            payload.invalidate();
        }
    }

    /// Rewrites every tracked property for `accent`.
    ///
    /// A property that cannot be found is logged and listed in
    /// [`PatchReport::missing`]; the others are still patched.
    pub fn update<S>(&mut self, source: &S, accent: &Accent) -> PatchReport
    where
        S: StyleSource<Container = C>,
    {
        let mut report = PatchReport::default();
        let mode = self.mode;

        for payload in &mut self.payloads {
            if payload.is_located() && !locations_hold(payload) {
                debug!(payload.name = payload.name(), "Payload locations stale, rescanning");
                report.rescanned.push(payload.name().to_string());
                payload.invalidate();
            }
            if !payload.is_located() {
                locate(payload, source, mode);
            }
            if !payload.is_located() {
                error!(payload.name = payload.name(), "Can't find payload for {}", payload.name());
                report
                    .missing
                    .push(PatchError::PayloadNotFound(payload.name().to_string()));
                continue;
            }

            let value = payload.resolve(accent);
            rewrite(payload, &value);
            payload.commit(value);
            report.patched.push(payload.name().to_string());
        }

        report
    }
}

fn locations_hold<C: StyleContainer>(payload: &PropertyPayload<C>) -> bool {
    let Some(literal) = payload.cached_literal() else {
        return false;
    };
    payload.locations().iter().all(|location| {
        let text = location.container.text();
        location
            .offsets
            .iter()
            .all(|&offset| matches_at(&text, offset, literal))
    })
}

fn locate<S: StyleSource>(payload: &mut PropertyPayload<S::Container>, source: &S, mode: PatchMode) {
    let literal = payload.literal().to_string();
    let mut locations = Vec::new();

    for container in source.containers() {
        let offsets = find_all(&container.text(), &literal);
        if offsets.is_empty() {
            continue;
        }
        match mode {
            PatchMode::Single => {
                locations.push(Location {
                    container,
                    offsets: vec![offsets[0]],
                });
                break;
            }
            PatchMode::Multi => locations.push(Location { container, offsets }),
        }
    }

    if !locations.is_empty() {
        info!(
            payload.name = payload.name(),
            payload.containers = locations.len(),
            "Payload for {} stored",
            payload.name()
        );
    }
    payload.set_locations(locations);
}

fn rewrite<C: StyleContainer>(payload: &mut PropertyPayload<C>, value: &str) {
    let old_len = payload.literal().len();
    let replacement = declaration(payload.name(), value);

    for location in payload.locations_mut() {
        let text = location.container.text();
        let spliced = splice_all(&text, &location.offsets, old_len, &replacement);
        location.container.write(&TrustedCss(spliced));
        location.offsets = shifted(&location.offsets, old_len, replacement.len());
        trace!(
            patch.occurrences = location.offsets.len(),
            patch.literal = %replacement,
            "Container rewritten"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Colour;
    use crate::memory::MemoryDocument;
    use crate::payload::ChannelMode;

    fn solid(r: u8, g: u8, b: u8) -> Accent {
        Accent::Solid(Colour::rgb(r, g, b))
    }

    #[test]
    fn test_find_all_non_overlapping_case_insensitive() {
        assert_eq!(find_all("aaaa", "aa"), vec![0, 2]);
        assert_eq!(find_all("--A:#FFF; --a:#fff;", "--a:#fff;"), vec![0, 10]);
        assert!(find_all("abc", "").is_empty());
        assert!(find_all("ab", "abc").is_empty());
    }

    #[test]
    fn test_splice_all_and_shift() {
        let text = "x--a:1;y--a:1;z";
        let offsets = find_all(text, "--a:1;");
        let out = splice_all(text, &offsets, 6, "--a:123;");
        assert_eq!(out, "x--a:123;y--a:123;z");
        let moved = shifted(&offsets, 6, 8);
        assert_eq!(find_all(&out, "--a:123;"), moved);
    }

    #[test]
    fn test_sibling_declaration_untouched() {
        let doc = MemoryDocument::new(["--a:#111111;--b:#222222;"]);
        let mut patcher = StylesheetPatcher::multi([
            PropertyPayload::new("--a", "#111111"),
            PropertyPayload::new("--b", "#222222").with_fixed("#222222"),
        ]);
        let report = patcher.update(&doc, &solid(0x33, 0x33, 0x33));
        assert!(report.is_complete());
        assert_eq!(doc.text(0), "--a:#333333;--b:#222222;");
    }

    #[test]
    fn test_multiple_occurrences_with_length_change() {
        let doc = MemoryDocument::new([":root{--a:#111111;} .x{--a:#111111;} .y{--a:#111111;}"]);
        let mut patcher = StylesheetPatcher::multi([PropertyPayload::new("--a", "#111111")]);
        patcher.update(&doc, &Accent::Solid(Colour::rgba(0x12, 0x34, 0x56, 0x40)));
        assert_eq!(
            doc.text(0),
            ":root{--a:#12345640;} .x{--a:#12345640;} .y{--a:#12345640;}"
        );
        assert_eq!(patcher.payloads()[0].locations()[0].offsets, vec![6, 25, 44]);
    }

    #[test]
    fn test_single_mode_patches_first_occurrence_only() {
        let doc = MemoryDocument::new(["p{}", "--a:#111111;--a:#111111;", "--a:#111111;"]);
        let mut patcher = StylesheetPatcher::single(PropertyPayload::new("--a", "#111111"));
        patcher.update(&doc, &solid(0xab, 0xcd, 0xef));
        assert_eq!(doc.text(1), "--a:#abcdef;--a:#111111;");
        assert_eq!(doc.text(2), "--a:#111111;");
        assert_eq!(patcher.payloads()[0].locations().len(), 1);
    }

    #[test]
    fn test_multi_mode_spans_containers() {
        let doc = MemoryDocument::new(["--a:#111111;", "q{}", "x{--a:#111111;}"]);
        let mut patcher = StylesheetPatcher::multi([PropertyPayload::new("--a", "#111111")]);
        patcher.update(&doc, &solid(0, 0, 0));
        assert_eq!(doc.text(0), "--a:#000000;");
        assert_eq!(doc.text(1), "q{}");
        assert_eq!(doc.text(2), "x{--a:#000000;}");
    }

    #[test]
    fn test_missing_payload_reported_and_siblings_patched() {
        let doc = MemoryDocument::new(["--b:#222222;"]);
        let mut patcher = StylesheetPatcher::multi([
            PropertyPayload::new("--a", "#111111"),
            PropertyPayload::new("--b", "#222222"),
        ]);
        let report = patcher.update(&doc, &solid(1, 1, 1));
        assert_eq!(report.missing, vec![PatchError::PayloadNotFound("--a".into())]);
        assert_eq!(report.patched, vec!["--b".to_string()]);
        assert!(!patcher.payload("--a").unwrap().is_located());
        assert_eq!(doc.text(0), "--b:#010101;");
    }

    #[test]
    fn test_stale_offsets_trigger_rescan() {
        let doc = MemoryDocument::new(["--a:#111111;"]);
        let mut patcher = StylesheetPatcher::multi([PropertyPayload::new("--a", "#111111")]);
        patcher.update(&doc, &solid(2, 2, 2));

        // the host inserts rules in front of the declaration
        doc.set_text(0, "body{margin:0} --a:#020202;");
        let report = patcher.update(&doc, &solid(3, 3, 3));
        assert_eq!(report.rescanned, vec!["--a".to_string()]);
        assert_eq!(doc.text(0), "body{margin:0} --a:#030303;");
    }

    #[test]
    fn test_siblings_sharing_a_container_with_length_change() {
        let doc = MemoryDocument::new(["--button-c:#111111;--bg:#111111;--t:#222222;"]);
        let mut patcher = StylesheetPatcher::multi([
            PropertyPayload::new("--bg", "#111111"),
            PropertyPayload::new("--button-c", "#111111").with_channel(ChannelMode::Rgb),
            PropertyPayload::new("--t", "#222222").with_fixed("#ffffffd6"),
        ]);
        let accent = Accent::Solid(Colour::rgba(0xaa, 0xbb, 0xcc, 0x40));

        patcher.update(&doc, &accent);
        assert_eq!(doc.text(0), "--button-c:#aabbcc;--bg:#aabbcc40;--t:#ffffffd6;");

        let report = patcher.update(&doc, &accent);
        assert!(report.is_complete());
        assert_eq!(doc.text(0), "--button-c:#aabbcc;--bg:#aabbcc40;--t:#ffffffd6;");
    }

    #[test]
    fn test_update_is_idempotent() {
        let doc = MemoryDocument::new(["a{--a:#111111;} b{--a:#111111;}"]);
        let mut patcher = StylesheetPatcher::multi([PropertyPayload::new("--a", "#111111")]);
        let accent = Accent::Solid(Colour::rgba(9, 9, 9, 0xff));
        patcher.update(&doc, &accent);
        let once = doc.text(0);
        let report = patcher.update(&doc, &accent);
        assert!(report.rescanned.is_empty());
        assert_eq!(doc.text(0), once);
    }

    #[test]
    fn test_gradient_value_is_written_verbatim() {
        let doc = MemoryDocument::new(["--a:#111111;"]);
        let mut patcher = StylesheetPatcher::multi([PropertyPayload::new("--a", "#111111")]);
        let accent = Accent::Gradient {
            top: Colour::rgb(0x78, 0x3c, 0xf0),
            bottom: Colour::rgb(0x64, 0x32, 0xc8),
        };
        patcher.update(&doc, &accent);
        assert_eq!(
            doc.text(0),
            "--a:linear-gradient(to bottom, #783cf0 0%, #6432c8 100%);"
        );
    }

    #[test]
    fn test_uppercase_page_literal_is_found() {
        let doc = MemoryDocument::new(["--A:#1A73E8;"]);
        let mut patcher = StylesheetPatcher::multi([PropertyPayload::new("--a", "#1a73e8")]);
        assert!(patcher.update(&doc, &solid(0, 0, 1)).is_complete());
        assert_eq!(doc.text(0), "--a:#000001;");
    }
}
