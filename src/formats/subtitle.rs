/*!
 * Subtitle cue adapter (WebVTT, SRT).
 *
 * Every cue is one segment keyed by its literal timing line
 * (`00:00:01.000 --> 00:00:02.000`). Every non-blank line after a timing line
 * joins that cue's body until the next timing line or the end of input.
 * Lines before the first timing line are skipped and nothing but timing
 * lines and bodies is written back.
 */

use std::collections::{HashMap, HashSet};

use crate::errors::ParseError;
use crate::formats::{decode_text, FormatKind, ParsedDocument, SerializationWarning, Serialized};
use crate::segment::{Segment, SegmentModel};

const TIMING_ARROW: &str = "-->";
const FORMAT: &str = "WebVTT";

/// One cue as read from the file
#[derive(Debug, Clone, PartialEq, Eq)]
struct Cue {
    timing: String,
    body: String,
}

pub fn parse(source: &[u8], target: Option<&[u8]>) -> Result<ParsedDocument, ParseError> {
    let cues = read_cues(decode_text(source, FormatKind::Subtitle)?);

    let mut seen = HashSet::with_capacity(cues.len());
    for cue in &cues {
        if !seen.insert(cue.timing.as_str()) {
            return Err(ParseError::DuplicateKey {
                format: FORMAT,
                key: cue.timing.clone(),
            });
        }
    }

    let translations: HashMap<String, String> = match target {
        Some(bytes) => {
            let mut map = HashMap::new();
            for cue in read_cues(decode_text(bytes, FormatKind::Subtitle)?) {
                map.entry(cue.timing).or_insert(cue.body);
            }
            map
        }
        None => HashMap::new(),
    };

    let segments = cues
        .into_iter()
        .map(|cue| {
            let translation = translations.get(&cue.timing).cloned().unwrap_or_default();
            Segment::new(cue.timing, cue.body, translation)
        })
        .collect();

    Ok(ParsedDocument {
        model: SegmentModel::from_segments(segments),
        envelope: None,
    })
}

/// Write a WebVTT file with one cue per segment
pub fn serialize(model: &SegmentModel) -> Serialized {
    let mut out = String::from("WEBVTT\n\n");
    for segment in model.iter() {
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

fn read_cues(text: &str) -> Vec<Cue> {
    let mut cues = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.contains(TIMING_ARROW) {
            if let Some((timing, body)) = current.take() {
                cues.push(Cue { timing, body: body.join(" ") });
            }
            current = Some((trimmed.to_string(), Vec::new()));
        } else if !trimmed.is_empty() {
            if let Some((_, body)) = current.as_mut() {
                body.push(trimmed);
            }
        }
    }

    if let Some((timing, body)) = current {
        cues.push(Cue { timing, body: body.join(" ") });
    }
    cues
}
