/*!
 * Inline-markup codec.
 *
 * Translation units in interchange files carry nested inline markup:
 * standalone placeholders (`<x id="1"/>`) and spans (`<g id="2">...</g>`).
 * The codec turns such a tree into one editable string where every
 * placeholder is rendered as a tag embedding its identifier, so nothing the
 * translator has to keep is silently dropped from view.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::formats::xml::XmlElement;

// @const: Rendered placeholder tags, captures the id
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<(?:x|bx|ex|ph|sc|ec|g|pc)\s+id="([^"]*)""#).unwrap()
});

/// Standalone placeholder element names (XLIFF 1.2 and 2.x)
const MARKER_TAGS: &[&str] = &["x", "bx", "ex", "ph", "sc", "ec"];

/// Span element names (XLIFF 1.2 and 2.x)
const SPAN_TAGS: &[&str] = &["g", "pc"];

/// A self-closing inline placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub tag: String,
    pub id: String,
}

/// An inline grouping element wrapping more markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub tag: String,
    pub id: String,
    pub content: MarkupNode,
}

/// Parsed inline markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Text(String),
    Sequence(Vec<MarkupNode>),
    Element {
        text: Option<String>,
        markers: Vec<Marker>,
        spans: Vec<Span>,
    },
}

impl Default for MarkupNode {
    fn default() -> Self {
        MarkupNode::Sequence(Vec::new())
    }
}

impl MarkupNode {
    /// Build a node from a content element such as `<source>` or `<target>`.
    ///
    /// Elements with neither attributes nor child elements are plain text.
    pub fn from_element(element: &XmlElement) -> Self {
        if element.attributes.is_empty() && !element.has_child_elements() {
            return MarkupNode::Text(element.direct_text());
        }

        let text = element.direct_text();
        let mut markers = Vec::new();
        let mut spans = Vec::new();

        for child in element.child_elements() {
            let tag = child.local_name();
            let id = child.attribute("id").unwrap_or_default();
            if MARKER_TAGS.contains(&tag) {
                markers.push(Marker { tag: tag.to_string(), id });
            } else if SPAN_TAGS.contains(&tag) {
                spans.push(Span {
                    tag: tag.to_string(),
                    id,
                    content: MarkupNode::from_element(child),
                });
            }
        }

        MarkupNode::Element {
            text: if text.is_empty() { None } else { Some(text) },
            markers,
            spans,
        }
    }

    /// Sequence built from several content elements
    pub fn from_elements<'a>(elements: impl IntoIterator<Item = &'a XmlElement>) -> Self {
        MarkupNode::Sequence(elements.into_iter().map(MarkupNode::from_element).collect())
    }

    /// Whether any placeholder or span appears anywhere in the tree
    pub fn has_inline_markup(&self) -> bool {
        match self {
            MarkupNode::Text(_) => false,
            MarkupNode::Sequence(nodes) => nodes.iter().any(MarkupNode::has_inline_markup),
            MarkupNode::Element { markers, spans, .. } => !markers.is_empty() || !spans.is_empty(),
        }
    }
}

/// Flatten a markup tree into a single editable string
pub fn extract(node: &MarkupNode) -> String {
    match node {
        MarkupNode::Text(text) => text.clone(),
        MarkupNode::Sequence(nodes) => nodes.iter().map(extract).collect::<Vec<_>>().join(" "),
        MarkupNode::Element { text, markers, spans } => {
            let mut out = text.clone().unwrap_or_default();
            for marker in markers {
                out.push_str(&render_marker(&marker.tag, &marker.id));
            }
            for span in spans {
                out.push_str(&render_span(&span.tag, &span.id, &extract(&span.content)));
            }
            out
        }
    }
}

/// `<x id="1"/>`
pub fn render_marker(tag: &str, id: &str) -> String {
    format!("<{} id=\"{}\"/>", tag, id)
}

/// `<g id="2">inner</g>`
pub fn render_span(tag: &str, id: &str, inner: &str) -> String {
    format!("<{tag} id=\"{id}\">{inner}</{tag}>", tag = tag, id = id, inner = inner)
}

/// Ids of the rendered placeholders in a string, in order of appearance
pub fn placeholders(text: &str) -> Vec<String> {
    PLACEHOLDER_REGEX
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect()
}

/// Placeholder ids present in `original` but absent from `translated`
pub fn missing_placeholders(original: &str, translated: &str) -> Vec<String> {
    let kept = placeholders(translated);
    placeholders(original)
        .into_iter()
        .filter(|id| !kept.contains(id))
        .collect()
}
