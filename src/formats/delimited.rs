use std::collections::{HashMap, HashSet};

use crate::errors::ParseError;
use crate::formats::{decode_text, FormatKind, ParsedDocument, SerializationWarning, Serialized};
use crate::segment::{Segment, SegmentModel};

// @module: Plain text blocks introduced by `#KEY:` marker lines

const KEY_MARKER: &str = "#KEY:";
const FORMAT: &str = "delimited text";

pub fn parse(source: &[u8], target: Option<&[u8]>) -> Result<ParsedDocument, ParseError> {
    let blocks = read_blocks(decode_text(source, FormatKind::Delimited)?)?;

    let mut seen = HashSet::with_capacity(blocks.len());
    for (key, _) in &blocks {
        if !seen.insert(key.as_str()) {
            return Err(ParseError::DuplicateKey {
                format: FORMAT,
                key: key.clone(),
            });
        }
    }

    let translations: HashMap<String, String> = match target {
        Some(bytes) => {
            let mut map = HashMap::new();
            for (key, body) in read_blocks(decode_text(bytes, FormatKind::Delimited)?)? {
                map.entry(key).or_insert(body);
            }
            map
        }
        None => HashMap::new(),
    };

    let segments = blocks
        .into_iter()
        .map(|(key, body)| {
            let translation = translations.get(&key).cloned().unwrap_or_default();
            Segment::new(key, body, translation)
        })
        .collect();

    Ok(ParsedDocument {
        model: SegmentModel::from_segments(segments),
        envelope: None,
    })
}

pub fn serialize(model: &SegmentModel) -> Serialized {
    let mut out = String::new();
    for segment in model.iter() {
        out.push_str(KEY_MARKER);
        out.push_str(&segment.key);
        out.push('\n');
        out.push_str(&segment.translation);
        out.push_str("\n\n");
    }
    Serialized {
        bytes: out.into_bytes(),
        warnings: vec![SerializationWarning::CueMetadataDropped { format: FORMAT }],
    }
}

// Lines before the first marker are preamble and are skipped
fn read_blocks(text: &str) -> Result<Vec<(String, String)>, ParseError> {
    let mut blocks = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for (number, line) in text.lines().enumerate() {
        if let Some(rest) = line.strip_prefix(KEY_MARKER) {
            let key = rest.trim();
            if key.is_empty() {
                return Err(ParseError::Malformed {
                    format: FORMAT,
                    reason: format!("empty key on line {}", number + 1),
                });
            }
            if let Some((key, body)) = current.take() {
                blocks.push((key, body.join(" ")));
            }
            current = Some((key.to_string(), Vec::new()));
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some((_, body)) = current.as_mut() {
            body.push(trimmed);
        }
    }

    if let Some((key, body)) = current {
        blocks.push((key, body.join(" ")));
    }
    Ok(blocks)
}
