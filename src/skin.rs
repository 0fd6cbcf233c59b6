// skin.rs - Plane images per (fold, tint)
//
// Image loading is asynchronous. Each skin is an explicit slot the
// encoder can query every frame: Pending until the loader resolves it,
// then Ready or Failed. The handle type is whatever the backend draws
// with (HtmlImageElement in the browser).

use std::collections::HashMap;

use crate::color::Rgb;
use crate::sim::FoldKind;

pub const SVG_DATA_URI: &str = "data:image/svg+xml;base64,";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SkinKey {
    pub kind: FoldKind,
    /// None = asset as shipped
    pub tint: Option<Rgb>,
}

impl SkinKey {
    pub fn new(kind: FoldKind, tint: Option<Rgb>) -> Self {
        Self { kind, tint }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Slot<H> {
    Pending,
    Ready(H),
    Failed,
}

pub struct Skins<H> {
    slots: HashMap<SkinKey, Slot<H>>,
    queued: Vec<SkinKey>,
}

impl<H> Default for Skins<H> {
    fn default() -> Self {
        Self { slots: HashMap::new(), queued: Vec::new() }
    }
}

impl<H> Skins<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ready(&self, key: SkinKey) -> Option<&H> {
        match self.slots.get(&key) {
            Some(Slot::Ready(h)) => Some(h),
            _ => None,
        }
    }

    /// Ask for a skin. Only the first request for a key queues a load.
    pub fn request(&mut self, key: SkinKey) -> bool {
        if self.slots.contains_key(&key) { return false; }
        self.slots.insert(key, Slot::Pending);
        self.queued.push(key);
        true
    }

    /// Loads the backend should start now
    pub fn take_requests(&mut self) -> Vec<SkinKey> {
        std::mem::take(&mut self.queued)
    }

    /// Resolve a load. Keys dropped by `clear` since the request are ignored.
    pub fn finish(&mut self, key: SkinKey, image: Option<H>) {
        let Some(slot) = self.slots.get_mut(&key) else { return; };
        *slot = match image {
            Some(h) => Slot::Ready(h),
            None => Slot::Failed,
        };
    }

    /// Forget every skin, e.g. when a session resets and its tints are gone.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.queued.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Relative URL of a fold's SVG
pub fn asset_path(base: &str, kind: FoldKind) -> String {
    if base.is_empty() || base.ends_with('/') {
        format!("{base}{}", kind.file_name())
    } else {
        format!("{base}/{}", kind.file_name())
    }
}

// ============================================================================
// SVG tinting
// ============================================================================

/// Force `fill` on every `<path>` element, replacing any existing fill
/// attribute. Everything else passes through untouched.
pub fn tint_svg(svg: &str, color: Rgb) -> String {
    let fill = format!(" fill=\"{color}\"");
    let mut out = String::with_capacity(svg.len() + 64);
    let mut rest = svg;

    while let Some(at) = find_path_tag(rest) {
        let (head, tag) = rest.split_at(at);
        out.push_str(head);

        let end = tag_end(tag);
        let (open, tail) = tag.split_at(end);
        out.push_str("<path");
        out.push_str(&fill);
        out.push_str(&strip_fill(&open["<path".len()..]));
        rest = tail;
    }

    out.push_str(rest);
    out
}

/// Offset of the next `<path` start tag (not `<pathology`, etc.)
fn find_path_tag(s: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(i) = s[from..].find("<path") {
        let at = from + i;
        match s.as_bytes().get(at + 5) {
            Some(b) if b.is_ascii_whitespace() || *b == b'/' || *b == b'>' => return Some(at),
            Some(_) => from = at + 5,
            None => return None,
        }
    }
    None
}

/// One past the `>` closing the tag, honoring quoted values
fn tag_end(tag: &str) -> usize {
    let mut quote = None;
    for (i, c) in tag.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '>' => return i + 1,
            None => {}
        }
    }
    tag.len()
}

/// Drop ` fill=...` attributes from the inside of a start tag
fn strip_fill(attrs: &str) -> String {
    let b = attrs.as_bytes();
    let mut out = String::with_capacity(attrs.len());
    let mut copied = 0;
    let mut i = 0;

    while i < b.len() {
        match b[i] {
            q @ (b'"' | b'\'') => {
                i = attrs[i + 1..].find(q as char).map_or(b.len(), |j| i + 1 + j + 1);
            }
            c if c.is_ascii_whitespace() => {
                let name = i + 1;
                match fill_attr_end(attrs, name) {
                    Some(end) => {
                        out.push_str(&attrs[copied..i]);
                        copied = end;
                        i = end;
                    }
                    None => i += 1,
                }
            }
            _ => i += 1,
        }
    }

    out.push_str(&attrs[copied..]);
    out
}

/// If a `fill` attribute starts at `at`, the offset just past its value
fn fill_attr_end(attrs: &str, at: usize) -> Option<usize> {
    let rest = attrs.get(at..)?.strip_prefix("fill")?;
    let after_name = rest.trim_start();
    let value = after_name.strip_prefix('=')?.trim_start();
    let value_at = attrs.len() - value.len();

    let len = match value.chars().next()? {
        q @ ('"' | '\'') => value[1..].find(q).map_or(value.len(), |j| j + 2),
        _ => value
            .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
            .unwrap_or(value.len()),
    };
    Some(value_at + len)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);

    #[test]
    fn replaces_existing_fill() {
        let svg = r##"<svg><path d="M0 0L1 1" fill="#000"/></svg>"##;
        assert_eq!(
            tint_svg(svg, RED),
            r#"<svg><path fill="rgb(255,0,0)" d="M0 0L1 1"/></svg>"#
        );
    }

    #[test]
    fn inserts_missing_fill() {
        let svg = "<svg>\n<path d='M0 0'></path>\n</svg>";
        assert_eq!(
            tint_svg(svg, RED),
            "<svg>\n<path fill=\"rgb(255,0,0)\" d='M0 0'></path>\n</svg>"
        );
    }

    #[test]
    fn every_path_and_nothing_else() {
        let svg = r#"<svg fill="none"><g fill="blue"><path fill="a"/><path
            fill = 'b' stroke="c"/></g><pathology fill="x"/></svg>"#;
        let out = tint_svg(svg, RED);
        assert_eq!(out.matches(r#"fill="rgb(255,0,0)""#).count(), 2);
        assert!(out.contains(r#"<svg fill="none">"#));
        assert!(out.contains(r#"<g fill="blue">"#));
        assert!(out.contains(r#"<pathology fill="x"/>"#));
        assert!(out.contains(r#"stroke="c""#));
        assert!(!out.contains("'b'"));
    }

    #[test]
    fn keeps_fill_rule_and_quoted_gt() {
        let svg = r##"<path fill-rule="evenodd" data-x="a>b" fill="#fff"/>"##;
        assert_eq!(
            tint_svg(svg, RED),
            r#"<path fill="rgb(255,0,0)" fill-rule="evenodd" data-x="a>b"/>"#
        );
    }

    #[test]
    fn unquoted_fill_value() {
        let svg = "<path fill=red d=\"M0\"/>";
        assert_eq!(tint_svg(svg, RED), "<path fill=\"rgb(255,0,0)\" d=\"M0\"/>");
    }

    #[test]
    fn no_paths_passthrough() {
        let svg = "<svg><circle r=\"1\"/></svg>";
        assert_eq!(tint_svg(svg, RED), svg);
    }

    #[test]
    fn request_queues_once() {
        let mut skins: Skins<u32> = Skins::new();
        let key = SkinKey::new(FoldKind::Paper, Some(RED));
        assert!(skins.request(key));
        assert!(!skins.request(key));
        assert_eq!(skins.take_requests(), vec![key]);
        assert!(skins.take_requests().is_empty());
        assert_eq!(skins.slots.get(&key), Some(&Slot::Pending));

        skins.finish(key, Some(7));
        assert_eq!(skins.ready(key), Some(&7));

        let other = SkinKey::new(FoldKind::Blank, None);
        skins.request(other);
        skins.finish(other, None);
        assert_eq!(skins.slots.get(&other), Some(&Slot::Failed));
        assert!(!skins.request(other));
    }

    #[test]
    fn clear_drops_slots_and_late_loads() {
        let mut skins: Skins<u32> = Skins::new();
        let key = SkinKey::new(FoldKind::Paper, Some(RED));
        skins.request(key);
        skins.request(SkinKey::new(FoldKind::Blank, Some(RED)));
        assert_eq!(skins.len(), 2);

        skins.clear();
        assert!(skins.is_empty());
        assert!(skins.take_requests().is_empty());

        // A load started before the clear resolves afterwards
        skins.finish(key, Some(3));
        assert!(skins.is_empty());
        assert_eq!(skins.ready(key), None);
    }

    #[test]
    fn asset_paths() {
        assert_eq!(asset_path("", FoldKind::Blank), "1blank.svg");
        assert_eq!(asset_path("assets", FoldKind::Paper), "assets/2paper.svg");
        assert_eq!(asset_path("assets/", FoldKind::Crumpled), "assets/3crump.svg");
    }
}
