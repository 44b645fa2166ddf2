/*!
 * Format adapters.
 *
 * Every supported container format is a pure `parse`/`serialize` pair that
 * converts between raw bytes and a [`SegmentModel`]:
 *
 * - `key_value`: flat JSON string maps
 * - `subtitle`: WebVTT/SRT cues keyed by their timing line
 * - `delimited`: plain text blocks introduced by `#KEY:` markers
 * - `xliff`: XLIFF 1.2 / 2.x, patched into the original tree on save
 * - `block`: single-segment page and rich-text documents
 *
 * The adapter is always chosen by an explicit [`FormatKind`].
 */

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::anyhow;

use crate::errors::{ParseError, SerializeError};
use crate::segment::SegmentModel;

pub mod block;
pub mod delimited;
pub mod key_value;
pub mod subtitle;
pub mod xliff;
pub mod xml;

pub use block::{DocumentRenderer, PlainTextRenderer, RenderHints};

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormatKind {
    #[default]
    KeyValue,
    Xliff,
    Subtitle,
    Delimited,
    PageDocument,
    RichTextDocument,
}

impl FormatKind {
    pub const ALL: [FormatKind; 6] = [
        FormatKind::KeyValue,
        FormatKind::Xliff,
        FormatKind::Subtitle,
        FormatKind::Delimited,
        FormatKind::PageDocument,
        FormatKind::RichTextDocument,
    ];

    // @returns: Canonical file extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::KeyValue => "json",
            Self::Xliff => "xlf",
            Self::Subtitle => "vtt",
            Self::Delimited => "txt",
            Self::PageDocument => "pdf",
            Self::RichTextDocument => "docx",
        }
    }

    // @returns: Human readable format name used in messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::KeyValue => "JSON",
            Self::Xliff => "XLIFF",
            Self::Subtitle => "WebVTT",
            Self::Delimited => "delimited text",
            Self::PageDocument => "PDF",
            Self::RichTextDocument => "Word document",
        }
    }

    /// Single-block formats have no addressable segments of their own
    pub fn is_block(&self) -> bool {
        matches!(self, Self::PageDocument | Self::RichTextDocument)
    }

    /// Guess the format from a file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_string_lossy().to_lowercase();
        extension.parse().ok()
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for FormatKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "json" | "key-value" | "keyvalue" => Ok(Self::KeyValue),
            "xlf" | "xliff" => Ok(Self::Xliff),
            "vtt" | "srt" | "subtitle" => Ok(Self::Subtitle),
            "txt" | "delimited" => Ok(Self::Delimited),
            "pdf" | "page" => Ok(Self::PageDocument),
            "docx" | "doc" | "rich-text" => Ok(Self::RichTextDocument),
            _ => Err(anyhow!("Unsupported format: {}", s)),
        }
    }
}

/// Format-specific structure retained for lossless reinsertion on save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    Xliff(xml::XmlDocument),
}

/// Result of parsing a source (and optional target) file
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub model: SegmentModel,
    pub envelope: Option<Envelope>,
}

/// Known, accepted lossiness of an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerializationWarning {
    /// Cue numbering, styling and preamble lines are not reproduced
    CueMetadataDropped { format: &'static str },
    /// Inline placeholders of a unit's source were not rebuilt in its target
    InlineMarkupFlattened { key: String },
}

impl fmt::Display for SerializationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CueMetadataDropped { format } => {
                write!(f, "{} export does not keep cue numbering, styling or notes", format)
            }
            Self::InlineMarkupFlattened { key } => {
                write!(f, "Inline markup of unit '{}' was written as plain text", key)
            }
        }
    }
}

/// Bytes of an exported file plus any lossiness warnings
#[derive(Debug, Clone)]
pub struct Serialized {
    pub bytes: Vec<u8>,
    pub warnings: Vec<SerializationWarning>,
}

/// Parse source bytes (and optional target bytes) with the adapter for `kind`
pub fn parse(kind: FormatKind, source: &[u8], target: Option<&[u8]>) -> Result<ParsedDocument, ParseError> {
    let parsed = match kind {
        FormatKind::KeyValue => key_value::parse(source, target)?,
        FormatKind::Xliff => xliff::parse(source, target)?,
        FormatKind::Subtitle => subtitle::parse(source, target)?,
        FormatKind::Delimited => delimited::parse(source, target)?,
        FormatKind::PageDocument | FormatKind::RichTextDocument => block::parse(kind, source, target)?,
    };
    log::debug!("Parsed {} document: {} segments", kind.display_name(), parsed.model.len());
    Ok(parsed)
}

/// Serialize with the built-in plain text renderer for block formats
pub fn serialize(kind: FormatKind, model: &SegmentModel, envelope: Option<&Envelope>) -> Result<Serialized, SerializeError> {
    serialize_with(kind, model, envelope, &PlainTextRenderer, None)
}

/// Serialize, handing block formats to the given renderer
pub fn serialize_with(
    kind: FormatKind,
    model: &SegmentModel,
    envelope: Option<&Envelope>,
    renderer: &dyn DocumentRenderer,
    target_language: Option<&str>,
) -> Result<Serialized, SerializeError> {
    match kind {
        FormatKind::KeyValue => key_value::serialize(model),
        FormatKind::Xliff => match envelope {
            Some(Envelope::Xliff(document)) => xliff::serialize(model, document),
            None => Err(SerializeError::MissingEnvelope(kind.display_name())),
        },
        FormatKind::Subtitle => Ok(subtitle::serialize(model)),
        FormatKind::Delimited => Ok(delimited::serialize(model)),
        FormatKind::PageDocument | FormatKind::RichTextDocument => {
            let hints = RenderHints::new(kind, target_language);
            block::serialize(model, renderer, &hints)
        }
    }
}

/// Decode input bytes as UTF-8, dropping a leading byte order mark
pub(crate) fn decode_text(bytes: &[u8], kind: FormatKind) -> Result<&str, ParseError> {
    let text = std::str::from_utf8(bytes).map_err(|_| ParseError::InvalidEncoding {
        format: kind.display_name(),
    })?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}
