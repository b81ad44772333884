use std::fmt;

use serde::{Deserialize, Serialize};

use crate::markup;

/// A node in a markup tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    Text(String),
    Element(Element),
}

/// An element with its attributes and owned children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.push((name.to_string(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// A markup document: an ordered list of root nodes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Parse an HTML fragment. Never fails; broken markup is repaired.
    pub fn parse(html: &str) -> Self {
        Self {
            nodes: markup::parse_fragment(html),
        }
    }

    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Concatenation of every text leaf in document order
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.collect_text(&mut out);
        }
        out
    }

    pub fn to_html(&self) -> String {
        markup::serialize(&self.nodes)
    }

    pub fn word_count(&self) -> usize {
        self.plain_text().split_whitespace().count()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_concatenates_leaves() {
        let doc = Document::parse("<p>Their <b>are</b> to</p><p> many cats.</p>");
        assert_eq!(doc.plain_text(), "Their are to many cats.");
        assert_eq!(doc.word_count(), 5);
    }

    #[test]
    fn test_line_breaks_do_not_add_text() {
        let doc = Document::parse("one<br>two");
        assert_eq!(doc.plain_text(), "onetwo");
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::parse("");
        assert!(doc.is_empty());
        assert_eq!(doc.plain_text(), "");
        assert_eq!(doc.to_html(), "");
    }

    #[test]
    fn test_element_attr_lookup() {
        let element = Element::new("span")
            .with_attr("data-x", "1")
            .with_child(Node::text("x"));
        assert_eq!(element.attr("data-x"), Some("1"));
        assert_eq!(element.attr("data-y"), None);
        assert_eq!(
            Document::from_nodes(vec![Node::Element(element)]).to_string(),
            "<span data-x=\"1\">x</span>"
        );
    }
}
