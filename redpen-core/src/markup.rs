//! HTML fragment parsing and serialization
//!
//! Fragments are parsed with html5ever, so malformed markup is repaired the
//! same way a browser would repair it, and then copied out of the RcDom into
//! the owned [`Node`] tree the engines work on.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::model::{Element, Node};

/// Elements that never have children or a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements rendered on their own lines
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "figure", "footer",
    "h1", "h2", "h3", "h4", "h5", "h6", "header", "li", "ol", "p", "pre", "section", "table",
    "tr", "ul",
];

/// Elements whose text content is serialized without escaping
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Elements whose first newline is dropped by the parser
const NEWLINE_STRIPPING_ELEMENTS: &[&str] = &["pre", "textarea", "listing"];

/// Parse an HTML fragment into a list of root nodes.
pub fn parse_fragment(html: &str) -> Vec<Node> {
    if html.is_empty() {
        return Vec::new();
    }

    // Opening an explicit body keeps leading whitespace in the fragment, which
    // the parser would otherwise drop before the implied <body>.
    let wrapped = format!("<!DOCTYPE html><html><head></head><body>{html}");
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(wrapped);

    match find_element(&dom.document, "body") {
        Some(body) => convert_children(&body),
        None => vec![Node::Text(html.to_string())],
    }
}

fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    for child in handle.children.borrow().iter() {
        if let NodeData::Element { ref name, .. } = child.data {
            if &*name.local == tag {
                return Some(child.clone());
            }
        }
        if let Some(found) = find_element(child, tag) {
            return Some(found);
        }
    }
    None
}

fn convert_children(handle: &Handle) -> Vec<Node> {
    let mut nodes: Vec<Node> = Vec::new();
    for child in handle.children.borrow().iter() {
        match child.data {
            NodeData::Text { ref contents } => {
                let text = contents.borrow();
                // The tree builder can leave adjacent text nodes; merge them so
                // each run of text is one leaf.
                if let Some(Node::Text(previous)) = nodes.last_mut() {
                    previous.push_str(&text);
                } else {
                    nodes.push(Node::Text(text.to_string()));
                }
            }
            NodeData::Element {
                ref name,
                ref attrs,
                ..
            } => {
                let attrs = attrs
                    .borrow()
                    .iter()
                    .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                    .collect();
                nodes.push(Node::Element(Element {
                    tag: name.local.to_string(),
                    attrs,
                    children: convert_children(child),
                }));
            }
            // Comments, doctypes and processing instructions carry no text
            _ => {}
        }
    }
    nodes
}

/// Serialize nodes back to HTML
pub fn serialize(nodes: &[Node]) -> String {
    let mut out = String::new();
    write_nodes(nodes, false, &mut out);
    out
}

fn write_nodes(nodes: &[Node], raw_text: bool, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) if raw_text => out.push_str(text),
            Node::Text(text) => out.push_str(&html_escape::encode_text(text)),
            Node::Element(element) => write_element(element, out),
        }
    }
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);
    for (name, value) in &element.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(value));
        out.push('"');
    }
    out.push('>');

    if is_void(&element.tag) {
        return;
    }

    // Re-emit the newline the parser will strip, so a leading one in the text survives
    if NEWLINE_STRIPPING_ELEMENTS.contains(&element.tag.as_str()) {
        if let Some(Node::Text(text)) = element.children.first() {
            if text.starts_with('\n') {
                out.push('\n');
            }
        }
    }

    let raw_text = RAW_TEXT_ELEMENTS.contains(&element.tag.as_str());
    write_nodes(&element.children, raw_text, out);

    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
}

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub fn is_block(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_parse_nested_markup() {
        let nodes = parse_fragment("<p>Hello <b>bold</b> world</p>");
        assert_eq!(
            nodes,
            vec![Node::Element(Element {
                tag: "p".to_string(),
                attrs: vec![],
                children: vec![
                    Node::Text("Hello ".to_string()),
                    Node::Element(Element {
                        tag: "b".to_string(),
                        attrs: vec![],
                        children: vec![Node::Text("bold".to_string())],
                    }),
                    Node::Text(" world".to_string()),
                ],
            })]
        );
    }

    #[test]
    fn test_parse_plain_text_keeps_surrounding_whitespace() {
        assert_eq!(
            parse_fragment("  plain text \n"),
            vec![Node::Text("  plain text \n".to_string())]
        );
    }

    #[test]
    fn test_parse_decodes_entities_and_drops_comments() {
        assert_eq!(
            parse_fragment("a &amp; b<!-- note -->&lt;c&gt;"),
            vec![Node::Text("a & b<c>".to_string())]
        );
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_fragment("").is_empty());
    }

    #[rstest]
    #[case("<p>Hello <b>bold</b> world</p>")]
    #[case("<ul><li>one</li><li>two</li></ul>")]
    #[case("line one<br>line two")]
    #[case("<a href=\"https://example.com/?a=1&amp;b=2\">link</a>")]
    #[case("Fish &amp; chips &lt;3")]
    #[case("<p class=\"lead\"><i>nested <u>deeply</u></i></p>")]
    #[case("<pre>\n\nindented\n</pre>")]
    #[case("<textarea>\n\nnote</textarea>")]
    #[case("<xmp>a & b <i></xmp>")]
    #[case("<noframes>x &amp; y</noframes>")]
    fn test_serialize_reproduces_well_formed_markup(#[case] html: &str) {
        assert_eq!(serialize(&parse_fragment(html)), html);
    }

    #[test]
    fn test_serialize_repairs_unclosed_tags() {
        assert_eq!(serialize(&parse_fragment("<p>one<p>two")), "<p>one</p><p>two</p>");
        assert_eq!(serialize(&parse_fragment("<b>bold")), "<b>bold</b>");
    }

    #[test]
    fn test_pre_keeps_leading_newline_across_round_trips() {
        let nodes = parse_fragment("<pre>\n\ncode</pre>");
        let reparsed = parse_fragment(&serialize(&nodes));
        assert_eq!(reparsed, nodes);

        // A single leading newline is dropped on parse and not re-added
        assert_eq!(serialize(&parse_fragment("<pre>\ncode</pre>")), "<pre>code</pre>");
    }

    #[test]
    fn test_raw_text_elements_are_not_escaped() {
        let html = "<iframe>a &amp; b</iframe>";
        let nodes = parse_fragment(html);
        assert_eq!(serialize(&nodes), html);
        assert_eq!(parse_fragment(&serialize(&nodes)), nodes);
    }

    #[test]
    fn test_serialize_escapes_attribute_quotes() {
        let nodes = vec![Node::Element(Element {
            tag: "span".to_string(),
            attrs: vec![("title".to_string(), "say \"hi\"".to_string())],
            children: vec![Node::Text("x".to_string())],
        })];
        assert_eq!(serialize(&nodes), "<span title=\"say &quot;hi&quot;\">x</span>");
    }
}
