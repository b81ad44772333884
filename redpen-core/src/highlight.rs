//! Inline highlighting of corrections inside a markup tree
//!
//! Each eligible correction is placed at most once: on the first
//! case-insensitive occurrence of its replacement text, in document order,
//! that is not already claimed by a higher-priority correction. Text leaves
//! are rewritten in place, so the surrounding markup keeps its shape.

use std::collections::HashSet;

use crate::markup;
use crate::model::{Category, Correction, Document, Element, Node, TextRange};
use crate::text::occurrences;

pub const MARKER_TAG: &str = "span";
pub const MARKER_CLASS: &str = "correction-highlight";
pub const INDEX_ATTR: &str = "data-correction-index";
pub const TYPE_ATTR: &str = "data-correction-type";
pub const ORIGINAL_ATTR: &str = "data-original";
pub const EXPLANATION_ATTR: &str = "data-explanation";

/// An eligible correction with its position in the caller's list
struct Candidate<'a> {
    index: usize,
    correction: &'a Correction,
    category: Category,
}

/// A claimed span in one text leaf; `candidate` indexes `Highlighter::candidates`
struct Match {
    range: TextRange,
    candidate: usize,
}

struct Highlighter<'a> {
    candidates: Vec<Candidate<'a>>,
    consumed: HashSet<usize>,
    /// Correction indices in the order their markers were emitted
    placed: Vec<usize>,
}

/// Return a copy of `document` with corrections wrapped in marker spans.
pub fn annotate(document: &Document, corrections: &[Correction]) -> Document {
    annotate_with_placements(document, corrections).0
}

/// Like [`annotate`], also returning the indices of the corrections that were
/// placed, in document order.
///
/// Prefer this over reading markers back with [`placed_corrections`] when the
/// input may already contain marker spans of its own.
pub fn annotate_with_placements(
    document: &Document,
    corrections: &[Correction],
) -> (Document, Vec<usize>) {
    let candidates: Vec<Candidate> = corrections
        .iter()
        .enumerate()
        .filter_map(|(index, correction)| {
            let category = correction.category()?;
            correction.is_eligible().then_some(Candidate {
                index,
                correction,
                category,
            })
        })
        .collect();

    if document.is_empty() || candidates.is_empty() {
        return (document.clone(), Vec::new());
    }

    let mut annotated = document.clone();
    let mut highlighter = Highlighter {
        candidates,
        consumed: HashSet::new(),
        placed: Vec::new(),
    };
    highlighter.visit(annotated.nodes_mut());

    log::debug!(
        "highlighted {} of {} eligible corrections",
        highlighter.consumed.len(),
        highlighter.candidates.len()
    );
    (annotated, highlighter.placed)
}

/// Highlight corrections in an HTML fragment and serialize the result.
///
/// Input without anything to place is returned as-is rather than
/// re-serialized.
pub fn highlight_corrections_in_html(html: &str, corrections: &[Correction]) -> String {
    if html.is_empty() {
        return String::new();
    }
    if !corrections.iter().any(Correction::is_eligible) {
        return html.to_string();
    }
    annotate(&Document::parse(html), corrections).to_html()
}

impl Highlighter<'_> {
    fn visit(&mut self, nodes: &mut Vec<Node>) {
        let mut i = 0;
        while i < nodes.len() {
            let replacement = match &mut nodes[i] {
                Node::Element(element) => {
                    self.visit(&mut element.children);
                    None
                }
                Node::Text(text) => self.decorate(text),
            };

            match replacement {
                Some(replacement) => {
                    let len = replacement.len();
                    nodes.splice(i..=i, replacement);
                    i += len;
                }
                None => i += 1,
            }
        }
    }

    /// Split one text leaf around its matches. `None` leaves it untouched.
    fn decorate(&mut self, text: &str) -> Option<Vec<Node>> {
        if text.trim().is_empty() {
            return None;
        }

        let matches = self.find_matches(text);
        if matches.is_empty() {
            return None;
        }

        let mut nodes = Vec::with_capacity(matches.len() * 2 + 1);
        let mut last = 0;
        for m in &matches {
            if m.range.start_offset > last {
                nodes.push(Node::text(&text[last..m.range.start_offset]));
            }

            let candidate = &self.candidates[m.candidate];
            log::debug!(
                "placing correction {} ({}) on {:?}",
                candidate.index,
                candidate.category.key(),
                m.range.slice(text)
            );
            nodes.push(marker_node(m.range.slice(text), candidate));
            self.consumed.insert(candidate.index);
            self.placed.push(candidate.index);
            last = m.range.end_offset;
        }
        if last < text.len() {
            nodes.push(Node::text(&text[last..]));
        }

        Some(nodes)
    }

    /// Claim at most one span per unconsumed candidate, in priority order,
    /// skipping occurrences that collide with an earlier claim.
    fn find_matches(&self, text: &str) -> Vec<Match> {
        let mut claimed: Vec<Match> = Vec::new();

        for (position, candidate) in self.candidates.iter().enumerate() {
            if self.consumed.contains(&candidate.index) {
                continue;
            }

            let free = occurrences(text, &candidate.correction.replacement)
                .find(|range| !claimed.iter().any(|m| m.range.overlaps(range)));

            match free {
                Some(range) => claimed.push(Match {
                    range,
                    candidate: position,
                }),
                None => log::trace!("correction {} not in leaf", candidate.index),
            }
        }

        claimed.sort_by_key(|m| m.range.start_offset);
        claimed
    }
}

fn marker_node(text: &str, candidate: &Candidate) -> Node {
    Node::Element(
        Element::new(MARKER_TAG)
            .with_attr(
                "class",
                format!("{MARKER_CLASS} {}", candidate.category.css_class()),
            )
            .with_attr(INDEX_ATTR, candidate.index.to_string())
            .with_attr(TYPE_ATTR, candidate.category.key())
            .with_attr(ORIGINAL_ATTR, candidate.correction.original.as_str())
            .with_attr(EXPLANATION_ATTR, candidate.correction.explanation.as_str())
            .with_child(Node::text(text)),
    )
}

/// Marker metadata read back from an annotated document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub index: usize,
    pub category: Category,
}

impl Marker {
    /// Read the marker carried by `element`, if it is one
    pub fn of(element: &Element) -> Option<Marker> {
        if element.tag != MARKER_TAG {
            return None;
        }
        let class = element.attr("class")?;
        if !class.split_whitespace().any(|c| c == MARKER_CLASS) {
            return None;
        }
        Some(Marker {
            index: element.attr(INDEX_ATTR)?.parse().ok()?,
            category: Category::parse(element.attr(TYPE_ATTR)?)?,
        })
    }
}

/// Indices of the markers found in `document`, in document order.
///
/// Markers nested inside another marker are not reported.
pub fn placed_corrections(document: &Document) -> Vec<usize> {
    fn walk(nodes: &[Node], out: &mut Vec<usize>) {
        for node in nodes {
            if let Node::Element(element) = node {
                match Marker::of(element) {
                    Some(marker) => out.push(marker.index),
                    None => walk(&element.children, out),
                }
            }
        }
    }

    let mut out = Vec::new();
    walk(document.nodes(), &mut out);
    out
}

/// A run of displayable text, tagged with the marker it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightRun {
    pub text: String,
    pub marker: Option<Marker>,
}

/// Flatten an annotated document into text runs for renderers.
///
/// Line breaks are inserted for `<br>` and after block elements so that
/// paragraphs stay apart on screen.
pub fn highlight_runs(document: &Document) -> Vec<HighlightRun> {
    let mut runs = Vec::new();
    collect_runs(document.nodes(), &mut runs);
    runs
}

fn collect_runs(nodes: &[Node], runs: &mut Vec<HighlightRun>) {
    for node in nodes {
        match node {
            Node::Text(text) => push_plain(runs, text),
            Node::Element(element) if element.tag == "br" => push_plain(runs, "\n"),
            Node::Element(element) => match Marker::of(element) {
                Some(marker) => {
                    let text = Document::from_nodes(element.children.clone()).plain_text();
                    runs.push(HighlightRun {
                        text,
                        marker: Some(marker),
                    });
                }
                None => {
                    collect_runs(&element.children, runs);
                    if markup::is_block(&element.tag) && !ends_with_newline(runs) {
                        push_plain(runs, "\n");
                    }
                }
            },
        }
    }
}

fn push_plain(runs: &mut Vec<HighlightRun>, text: &str) {
    match runs.last_mut() {
        Some(last) if last.marker.is_none() => last.text.push_str(text),
        _ => runs.push(HighlightRun {
            text: text.to_string(),
            marker: None,
        }),
    }
}

fn ends_with_newline(runs: &[HighlightRun]) -> bool {
    runs.last().map_or(true, |run| run.text.ends_with('\n'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn grammar(original: &str, replacement: &str) -> Correction {
        Correction::new(original, replacement, Category::Grammar, "")
    }

    fn marker_texts(doc: &Document) -> Vec<(usize, String)> {
        highlight_runs(doc)
            .into_iter()
            .filter_map(|run| run.marker.map(|m| (m.index, run.text)))
            .collect()
    }

    #[test]
    fn test_cats_scenario() {
        let doc = Document::parse("There are too many cats.");
        let corrections = vec![grammar("Their", "There"), grammar("to", "too")];

        let annotated = annotate(&doc, &corrections);

        assert_eq!(
            annotated.to_html(),
            "<span class=\"correction-highlight correction-grammar\" data-correction-index=\"0\" \
             data-correction-type=\"grammar\" data-original=\"Their\" data-explanation=\"\">There</span> \
             are <span class=\"correction-highlight correction-grammar\" data-correction-index=\"1\" \
             data-correction-type=\"grammar\" data-original=\"to\" data-explanation=\"\">too</span> many cats."
        );
        assert_eq!(annotated.plain_text(), doc.plain_text());
        assert_eq!(placed_corrections(&annotated), vec![0, 1]);
    }

    #[test]
    fn test_empty_corrections_return_input() {
        let doc = Document::parse("<p>Nothing <i>to</i> do</p>");
        assert_eq!(annotate(&doc, &[]), doc);
        assert_eq!(
            highlight_corrections_in_html("<p>Nothing <i>to</i> do</p>", &[]),
            "<p>Nothing <i>to</i> do</p>"
        );
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::parse("");
        assert!(annotate(&doc, &[grammar("a", "b")]).is_empty());
        assert_eq!(highlight_corrections_in_html("", &[grammar("a", "b")]), "");
    }

    #[test]
    fn test_marker_inside_nested_markup() {
        let doc = Document::parse("<ul><li>First <b>colour</b> item</li></ul>");
        let corrections = vec![Correction::new("color", "colour", Category::Spelling, "British")];

        let annotated = annotate(&doc, &corrections);

        assert_eq!(
            annotated.to_html(),
            "<ul><li>First <b><span class=\"correction-highlight correction-spelling\" \
             data-correction-index=\"0\" data-correction-type=\"spelling\" data-original=\"color\" \
             data-explanation=\"British\">colour</span></b> item</li></ul>"
        );
    }

    #[test]
    fn test_first_occurrence_in_document_order_wins() {
        let doc = Document::parse("<p>The cat.</p><p>The dog.</p>");
        let annotated = annotate(&doc, &[grammar("A", "the")]);

        assert_eq!(marker_texts(&annotated), vec![(0, "The".to_string())]);
        let html = annotated.to_html();
        assert!(html.ends_with("<p>The dog.</p>"));
    }

    #[test]
    fn test_consumed_correction_not_placed_again_in_later_leaf() {
        let doc = Document::parse("<p>too</p><p>too</p>");
        let annotated = annotate(&doc, &[grammar("to", "too")]);
        assert_eq!(placed_corrections(&annotated), vec![0]);
    }

    #[test]
    fn test_duplicate_replacement_takes_next_occurrence() {
        let doc = Document::parse("too many, too few");
        let corrections = vec![grammar("to", "too"), grammar("two", "too")];

        let annotated = annotate(&doc, &corrections);
        let runs = highlight_runs(&annotated);

        assert_eq!(runs[0].marker.map(|m| m.index), Some(0));
        assert_eq!(runs[0].text, "too");
        assert_eq!(runs[1].text, " many, ");
        assert_eq!(runs[2].marker.map(|m| m.index), Some(1));
        assert_eq!(runs[2].text, "too");
    }

    #[test]
    fn test_overlapping_candidates_never_overlap() {
        let doc = Document::parse("many cats");
        let corrections = vec![grammar("cat", "cats"), grammar("ats", "cat")];

        let annotated = annotate(&doc, &corrections);

        // "cat" overlaps the claimed "cats" and has no other occurrence
        assert_eq!(placed_corrections(&annotated), vec![0]);
        assert_eq!(annotated.plain_text(), "many cats");
    }

    #[test]
    fn test_matches_sorted_by_position_not_priority() {
        let doc = Document::parse("alpha beta");
        let corrections = vec![grammar("b", "beta"), grammar("a", "alpha")];

        let annotated = annotate(&doc, &corrections);
        assert_eq!(placed_corrections(&annotated), vec![1, 0]);
    }

    #[test]
    fn test_ineligible_corrections_keep_original_indices() {
        let doc = Document::parse("There are too many cats.");
        let mut unknown = grammar("x", "cats");
        unknown.kind = "style".to_string();
        let corrections = vec![
            grammar("", "   "),
            unknown,
            grammar("Their", "There"),
            grammar("to", "too"),
        ];

        let annotated = annotate(&doc, &corrections);
        assert_eq!(placed_corrections(&annotated), vec![2, 3]);
        assert!(!annotated.to_html().contains("cats</span>"));
    }

    #[test]
    fn test_match_keeps_document_case() {
        let doc = Document::parse("THERE it is");
        let annotated = annotate(&doc, &[grammar("their", "there")]);
        assert_eq!(marker_texts(&annotated), vec![(0, "THERE".to_string())]);
    }

    #[test]
    fn test_special_characters_match_literally() {
        let doc = Document::parse("Price (approx.) is $5.");
        let annotated = annotate(&doc, &[Correction::new("approx", "(approx.)", Category::Punctuation, "")]);
        assert_eq!(marker_texts(&annotated), vec![(0, "(approx.)".to_string())]);

        let doc = Document::parse("axb");
        assert_eq!(annotate(&doc, &[grammar("a", "a.b")]), doc);
    }

    #[test]
    fn test_whitespace_leaf_is_left_alone() {
        let doc = Document::parse("<b>a</b> <i>b</i>");
        let annotated = annotate(&doc, &[grammar("c", "b")]);

        assert_eq!(annotated.nodes()[1], Node::text(" "));
        assert_eq!(placed_corrections(&annotated), vec![0]);
    }

    #[test]
    fn test_attributes_are_escaped_in_html() {
        let html = highlight_corrections_in_html(
            "He said hello",
            &[Correction::new("\"hi\"", "hello", Category::Tone, "warmer & friendlier")],
        );
        assert!(html.contains("data-original=\"&quot;hi&quot;\""));
        assert!(html.contains("data-explanation=\"warmer &amp; friendlier\""));
    }

    #[test]
    fn test_marker_round_trips_through_html() {
        let html = highlight_corrections_in_html("There are", &[grammar("Their", "There")]);
        let reparsed = Document::parse(&html);
        assert_eq!(placed_corrections(&reparsed), vec![0]);
    }

    #[test]
    fn test_highlight_runs_break_blocks() {
        let doc = Document::parse("<p>one</p><p>two<br>three</p>");
        let runs = highlight_runs(&doc);
        assert_eq!(
            runs,
            vec![HighlightRun {
                text: "one\ntwo\nthree\n".to_string(),
                marker: None,
            }]
        );
    }

    #[test]
    fn test_placements_ignore_markers_already_in_input() {
        let doc = Document::parse(
            "<span class=\"correction-highlight\" data-correction-index=\"7\" \
             data-correction-type=\"grammar\">There</span> are",
        );

        let (annotated, placed) = annotate_with_placements(&doc, &[grammar("Their", "There")]);

        assert_eq!(placed, vec![0]);
        assert_eq!(annotated.plain_text(), "There are");
        // Reading markers back only sees the stale outer span
        assert_eq!(placed_corrections(&annotated), vec![7]);
    }

    #[test]
    fn test_placements_match_markers_in_document_order() {
        let doc = Document::parse("alpha beta");
        let corrections = vec![grammar("b", "beta"), grammar("a", "alpha")];

        let (annotated, placed) = annotate_with_placements(&doc, &corrections);
        assert_eq!(placed, placed_corrections(&annotated));
        assert_eq!(placed, vec![1, 0]);
    }

    #[test]
    fn test_pre_leading_newline_survives_highlighting() {
        let html = highlight_corrections_in_html("<pre>\n\nx</pre>", &[grammar("y", "x")]);
        assert_eq!(Document::parse(&html).plain_text(), "\nx");
    }

    #[test]
    fn test_marker_of_ignores_plain_spans() {
        let element = Element::new("span").with_attr(INDEX_ATTR, "3");
        assert_eq!(Marker::of(&element), None);
    }
}
