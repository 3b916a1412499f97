//! GPX text output.
//!
//! Rendering walks an element subtree top-down and assembles the text
//! bottom-up: each element writes its opening tag, then its body (fields
//! and children in schema order), then its closing tag. The parent link is
//! consulted only for presentation: the indentation depth, the tag of a
//! waypoint (`wpt`, `rtept` or `trkpt`), and whether a namespace declared by
//! an extension is already bound by an ancestor.

mod format;
mod writer;

pub use format::{format_decimal, format_time, format_year, is_xml_char};
pub use writer::BodyWriter;

use std::io::Write;

use log::trace;

use crate::constants::{DEFAULT_INDENT, XML_DECLARATION};
use crate::element::{ElementInner, ElementKind, ElementRef, ElementType};
use crate::error::Result;
use format::escape_checked;

/// Options for rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Whether to put each element on its own line, indented by depth.
    ///
    /// An extension element with text content keeps its whole body on one
    /// line, since added whitespace would change its character data.
    pub pretty_print: bool,
    /// Indentation unit used when pretty printing.
    pub indent: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            pretty_print: false,
            indent: DEFAULT_INDENT.to_string(),
        }
    }
}

impl RenderOptions {
    /// Options for indented, one-element-per-line output.
    pub fn pretty() -> Self {
        RenderOptions {
            pretty_print: true,
            ..Self::default()
        }
    }

    fn indent_for(&self, depth: usize) -> String {
        if self.pretty_print {
            self.indent.repeat(depth)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &'static str {
        if self.pretty_print {
            "\n"
        } else {
            ""
        }
    }
}

/// Writes `node` and its subtree into `out` at the given depth.
///
/// Nothing is appended to `out` if any element in the subtree fails.
pub(crate) fn write_element(
    node: &ElementInner,
    out: &mut String,
    options: &RenderOptions,
    depth: usize,
) -> Result<()> {
    let kind = node.kind();
    let element_type = kind.element_type();
    let parent = node.parent();
    let parent_type = parent.as_ref().map(|p| p.borrow().element_type());
    let element = kind.as_element();

    let mut attributes = element.attributes()?;
    if let ElementKind::Extension(ext) = kind {
        let declarations: Vec<(String, String)> = ext
            .namespaces
            .iter()
            .filter(|ns| !bound_above(parent.as_ref(), &ns.prefix, &ns.uri))
            .map(|ns| (ns.attribute_name(), ns.uri.clone()))
            .collect();
        attributes.splice(0..0, declarations);
    }

    let mut escaped = Vec::with_capacity(attributes.len());
    for (name, value) in &attributes {
        escaped.push((name, escape_checked(element_type.name(), name, value)?));
    }

    // Mixed content is written without layout whitespace.
    let inline = options.pretty_print
        && matches!(kind, ElementKind::Extension(ext) if ext.text.is_some());
    let compact = RenderOptions::default();
    let body_options = if inline { &compact } else { options };

    let mut body = BodyWriter::new(element_type.name(), body_options, depth + 1, node.children());
    element.write_body(&mut body)?;
    let body = body.finish()?;

    let tag = kind.tag_name(parent_type);
    let indent = options.indent_for(depth);
    let newline = options.newline();

    if element_type == ElementType::Gpx {
        out.push_str(XML_DECLARATION);
        out.push('\n');
    }

    out.push_str(&indent);
    out.push('<');
    out.push_str(tag);
    for (name, value) in &escaped {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(value);
        out.push('"');
    }
    out.push('>');

    if body.markup.is_empty() || inline {
        if let Some(content) = &body.content {
            out.push_str(content);
        }
        out.push_str(&body.markup);
    } else {
        out.push_str(newline);
        if let Some(content) = &body.content {
            out.push_str(&options.indent_for(depth + 1));
            out.push_str(content);
            out.push_str(newline);
        }
        out.push_str(&body.markup);
        out.push_str(&indent);
    }

    out.push_str("</");
    out.push_str(tag);
    out.push('>');
    out.push_str(newline);
    Ok(())
}

/// Returns true if `prefix` is bound to `uri` by `start` or one of its ancestors.
fn bound_above(start: Option<&ElementRef>, prefix: &str, uri: &str) -> bool {
    let mut current = start.cloned();
    while let Some(node) = current {
        if node.borrow().kind().binds_namespace(prefix, uri) {
            return true;
        }
        current = node.borrow().parent();
    }
    false
}

/// Renders a tree to a compact string.
pub fn render_to_string(root: &ElementRef) -> Result<String> {
    trace!("rendering <{}>", root.borrow().element_type().name());
    root.borrow().render()
}

/// Renders a tree to a string with pretty printing.
pub fn render_to_string_pretty(root: &ElementRef) -> Result<String> {
    trace!("rendering <{}> (pretty)", root.borrow().element_type().name());
    root.borrow().render_with(&RenderOptions::pretty())
}

/// Renders a tree and writes the UTF-8 text to `writer`.
///
/// The whole document is rendered before the first byte is written, so a
/// contract violation never leaves a half-written document behind.
pub fn render_to_writer<W: Write>(
    root: &ElementRef,
    mut writer: W,
    options: &RenderOptions,
) -> Result<()> {
    let text = root.borrow().render_with(options)?;
    trace!("writing {} bytes", text.len());
    writer.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::new_element;
    use crate::gpx::{Extension, Extensions, Gpx, Namespace, Route, Track, TrackSegment, Waypoint};

    fn waypoint(lat: f64, lon: f64, name: &str) -> ElementRef {
        new_element(Waypoint {
            name: Some(name.to_string()),
            ..Waypoint::new(lat, lon)
        })
    }

    #[test]
    fn test_render_leaf() {
        let wpt = new_element(Waypoint::new(45.0, -93.0));
        assert_eq!(
            render_to_string(&wpt).unwrap(),
            r#"<wpt lat="45.0" lon="-93.0"></wpt>"#
        );
    }

    #[test]
    fn test_render_is_idempotent() {
        let gpx = new_element(Gpx::new("test"));
        ElementInner::append_child(&gpx, waypoint(1.0, 2.0, "a")).unwrap();
        let first = render_to_string_pretty(&gpx).unwrap();
        let second = render_to_string_pretty(&gpx).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_children_render_in_order() {
        let rte = new_element(Route::default());
        for name in ["first", "second", "third"] {
            ElementInner::append_child(&rte, waypoint(0.0, 0.0, name)).unwrap();
        }
        let out = render_to_string(&rte).unwrap();
        let a = out.find("first").unwrap();
        let b = out.find("second").unwrap();
        let c = out.find("third").unwrap();
        assert!(a < b && b < c);
        assert_eq!(out.matches("<rtept ").count(), 3);
    }

    #[test]
    fn test_pretty_indent_follows_depth() {
        let trk = new_element(Track::default());
        let seg = new_element(TrackSegment::default());
        let pt = waypoint(1.0, 2.0, "p");
        ElementInner::append_child(&trk, seg.clone()).unwrap();
        ElementInner::append_child(&seg, pt.clone()).unwrap();

        let out = render_to_string_pretty(&trk).unwrap();
        assert_eq!(
            out,
            "<trk>\n  <trkseg>\n    <trkpt lat=\"1.0\" lon=\"2.0\">\n      <name>p</name>\n    </trkpt>\n  </trkseg>\n</trk>\n"
        );

        // A subtree keeps the indentation of its position in the tree.
        let sub = pt.borrow().render_with(&RenderOptions::pretty()).unwrap();
        assert!(sub.starts_with("    <trkpt"));
    }

    #[test]
    fn test_custom_indent_unit() {
        let trk = new_element(Track::default());
        ElementInner::append_child(&trk, new_element(TrackSegment::default())).unwrap();
        let options = RenderOptions {
            pretty_print: true,
            indent: "\t".to_string(),
        };
        let out = trk.borrow().render_with(&options).unwrap();
        assert_eq!(out, "<trk>\n\t<trkseg></trkseg>\n</trk>\n");
    }

    #[test]
    fn test_gpx_root_writes_declaration() {
        let gpx = new_element(Gpx::new("unit test"));
        let out = render_to_string(&gpx).unwrap();
        assert!(out.starts_with(XML_DECLARATION));
        assert!(out.contains(r#"creator="unit test""#));
        assert!(out.trim_end().ends_with("</gpx>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let wpt = waypoint(1.0, 1.0, "Fish & <Chips>");
        let out = render_to_string(&wpt).unwrap();
        assert!(out.contains("<name>Fish &amp; &lt;Chips&gt;</name>"));
    }

    #[test]
    fn test_characters_outside_xml_are_refused() {
        let wpt = waypoint(1.0, 2.0, "a\u{1}b");
        let err = render_to_string(&wpt).unwrap_err();
        assert!(err.to_string().contains("`name`"), "{}", err);

        let gpx = new_element(Gpx::new("bad\u{FFFE}creator"));
        let err = render_to_string(&gpx).unwrap_err();
        assert!(err.is_contract_violation());
        assert!(err.to_string().contains("`creator`"), "{}", err);

        let ext = new_element(Extension::with_text("note", "x\u{0}"));
        assert!(render_to_string(&ext).unwrap_err().is_contract_violation());

        // Tabs and newlines are ordinary character data.
        let wpt = waypoint(1.0, 2.0, "a\tb\nc");
        assert!(render_to_string(&wpt).is_ok());
    }

    #[test]
    fn test_mixed_content_is_not_indented() {
        let exts = new_element(Extensions::default());
        let note = new_element(Extension::with_text("note", "keep"));
        ElementInner::append_child(&exts, note.clone()).unwrap();
        ElementInner::append_child(&note, new_element(Extension::with_text("b", "bold")))
            .unwrap();
        ElementInner::append_child(&note, new_element(Extension::new("br"))).unwrap();

        let out = render_to_string_pretty(&exts).unwrap();
        assert_eq!(
            out,
            "<extensions>\n  <note>keep<b>bold</b><br></br></note>\n</extensions>\n"
        );
    }

    #[test]
    fn test_contract_violation_produces_no_output() {
        let gpx = new_element(Gpx::new("test"));
        ElementInner::append_child(&gpx, waypoint(1.0, 1.0, "ok")).unwrap();
        let broken = new_element(Waypoint {
            latitude: None,
            ..Waypoint::new(0.0, 0.0)
        });
        ElementInner::append_child(&gpx, broken).unwrap();

        let err = render_to_string(&gpx).unwrap_err();
        assert!(err.is_contract_violation());

        let mut sink = Vec::new();
        let err = render_to_writer(&gpx, &mut sink, &RenderOptions::default()).unwrap_err();
        assert!(err.is_contract_violation());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_namespace_declared_by_root_is_elided() {
        let gpx = new_element(Gpx {
            namespaces: vec![Namespace::new("x", "urn:example:x")],
            ..Gpx::new("test")
        });
        let exts = new_element(Extensions::default());
        let outer = new_element(Extension {
            namespaces: vec![Namespace::new("x", "urn:example:x")],
            ..Extension::new("x:outer")
        });
        let inner = new_element(Extension {
            namespaces: vec![
                Namespace::new("x", "urn:example:x"),
                Namespace::new("y", "urn:example:y"),
            ],
            ..Extension::with_text("y:inner", "42")
        });
        ElementInner::append_child(&gpx, exts.clone()).unwrap();
        ElementInner::append_child(&exts, outer.clone()).unwrap();
        ElementInner::append_child(&outer, inner.clone()).unwrap();

        let out = render_to_string(&gpx).unwrap();
        assert_eq!(out.matches(r#"xmlns:x="urn:example:x""#).count(), 1);
        assert!(out.contains(r#"<x:outer><y:inner xmlns:y="urn:example:y">42</y:inner></x:outer>"#));

        // Detached, the extension declares its own namespaces again.
        ElementInner::detach(&outer);
        let out = render_to_string(&outer).unwrap();
        assert!(out.starts_with(r#"<x:outer xmlns:x="urn:example:x">"#));
    }

    #[test]
    fn test_render_to_writer() {
        let wpt = waypoint(1.5, 2.5, "w");
        let mut sink = Vec::new();
        render_to_writer(&wpt, &mut sink, &RenderOptions::pretty()).unwrap();
        let text = String::from_utf8(sink).unwrap();
        assert_eq!(
            text,
            "<wpt lat=\"1.5\" lon=\"2.5\">\n  <name>w</name>\n</wpt>\n"
        );
    }
}
