/*!
 * Single-block document formats (page documents, rich-text documents).
 *
 * Text extraction from the binary containers happens upstream; this adapter
 * receives the extracted UTF-8 text and models it as one segment keyed
 * `document`. Producing the output container is delegated to a
 * [`DocumentRenderer`].
 */

use crate::errors::{ParseError, RenderError, SerializeError};
use crate::formats::{decode_text, FormatKind, ParsedDocument, Serialized};
use crate::language_utils;
use crate::segment::{Segment, SegmentModel};

/// Key of the single implicit segment
pub const DOCUMENT_KEY: &str = "document";

/// Everything a renderer needs besides the text itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderHints {
    pub format: FormatKind,
    pub target_language: Option<String>,
    /// Font file able to display the target script
    pub font: &'static str,
}

impl RenderHints {
    pub fn new(format: FormatKind, target_language: Option<&str>) -> Self {
        RenderHints {
            format,
            target_language: target_language.map(str::to_string),
            font: language_utils::font_for_language(target_language.unwrap_or_default()),
        }
    }
}

/// Turns the finalized translation into the bytes of an output container
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, text: &str, hints: &RenderHints) -> Result<Vec<u8>, RenderError>;
}

/// Built-in renderer writing UTF-8 text
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRenderer;

impl DocumentRenderer for PlainTextRenderer {
    fn render(&self, text: &str, _hints: &RenderHints) -> Result<Vec<u8>, RenderError> {
        Ok(text.as_bytes().to_vec())
    }
}

pub fn parse(kind: FormatKind, source: &[u8], target: Option<&[u8]>) -> Result<ParsedDocument, ParseError> {
    let original = decode_text(source, kind)?;
    let translation = match target {
        Some(bytes) => decode_text(bytes, kind)?,
        None => "",
    };
    Ok(ParsedDocument {
        model: SegmentModel::from_segments(vec![Segment::new(DOCUMENT_KEY, original, translation)]),
        envelope: None,
    })
}

/// Final text handed to the renderer
pub fn finalize(model: &SegmentModel) -> String {
    model
        .iter()
        .map(|s| s.translation.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn serialize(
    model: &SegmentModel,
    renderer: &dyn DocumentRenderer,
    hints: &RenderHints,
) -> Result<Serialized, SerializeError> {
    let text = finalize(model);
    log::debug!(
        "Rendering {} ({} chars) with font {}",
        hints.format.display_name(),
        text.chars().count(),
        hints.font
    );
    let bytes = renderer.render(&text, hints)?;
    Ok(Serialized {
        bytes,
        warnings: Vec::new(),
    })
}
