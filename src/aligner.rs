/*!
 * Batch-translation aligner.
 *
 * A batch request sends the originals of the selected segments (or all of
 * them) as one newline-separated payload. The reply is split back into lines
 * and line `i` is written to the segment at `entries[i]`, so a reply for a
 * filtered subset never shifts onto unrelated rows.
 */

use crate::markup;
use crate::segment::SegmentModel;

// @const: Written into segments the reply had no line for
pub const FAILURE_SENTINEL: &str = "[translation failed]";

/// Payload sent to the provider plus the index map needed to apply its reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    /// Model indices in payload order
    pub entries: Vec<usize>,
    /// Newline-joined originals, one line per entry
    pub payload: String,
    /// Whether the reply is one atomic block
    pub block_mode: bool,
}

impl BatchRequest {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Payload position of a model index
    pub fn position_of(&self, index: usize) -> Option<usize> {
        self.entries.iter().position(|e| *e == index)
    }
}

/// Outcome of applying a reply
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignmentReport {
    /// Model indices that received a reply line
    pub applied: Vec<usize>,
    /// Model indices that received [`FAILURE_SENTINEL`]
    pub shortfall: Vec<usize>,
    /// Reply lines beyond the number of entries
    pub surplus_lines: usize,
    /// Model index and placeholder ids the translation lost
    pub placeholder_warnings: Vec<(usize, Vec<String>)>,
}

impl AlignmentReport {
    pub fn is_complete(&self) -> bool {
        self.shortfall.is_empty() && self.surplus_lines == 0
    }
}

/// Build the request for the selected indices, or for every segment when
/// nothing is selected. Out-of-range indices are ignored.
pub fn build_request(model: &SegmentModel, selection: &[usize], block_mode: bool) -> BatchRequest {
    let mut entries: Vec<usize> = selection.iter().copied().filter(|i| *i < model.len()).collect();
    entries.sort_unstable();
    entries.dedup();
    if entries.is_empty() {
        entries = (0..model.len()).collect();
    }

    let payload = entries
        .iter()
        .filter_map(|i| model.get(*i))
        .map(|segment| {
            if block_mode {
                segment.original.clone()
            } else {
                flatten_line(&segment.original)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    BatchRequest {
        entries,
        payload,
        block_mode,
    }
}

/// Split a reply into one line per entry. Trailing empty lines are dropped
/// only while there are more lines than `expected`, so an entry whose
/// original is empty keeps its empty reply line.
pub fn split_reply(reply: &str, block_mode: bool, expected: usize) -> Vec<String> {
    let cleaned = reply.replace('\r', "");
    if block_mode {
        return vec![cleaned.trim_end_matches('\n').to_string()];
    }
    if cleaned.is_empty() {
        return Vec::new();
    }

    let mut lines: Vec<String> = cleaned.split('\n').map(str::to_string).collect();
    while lines.len() > expected && lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

/// Write reply lines onto the request's entries
pub fn apply_reply(model: &mut SegmentModel, request: &BatchRequest, reply: &str) -> AlignmentReport {
    let lines = split_reply(reply, request.block_mode, request.len());
    let mut report = AlignmentReport {
        surplus_lines: lines.len().saturating_sub(request.len()),
        ..Default::default()
    };

    for (position, index) in request.entries.iter().copied().enumerate() {
        match lines.get(position) {
            Some(line) => {
                if let Some(segment) = model.get(index) {
                    let missing = markup::missing_placeholders(&segment.original, line);
                    if !missing.is_empty() {
                        log::warn!("Translation of '{}' lost placeholders {:?}", segment.key, missing);
                        report.placeholder_warnings.push((index, missing));
                    }
                }
                if model.set_translation(index, line.as_str()) {
                    report.applied.push(index);
                }
            }
            None => {
                if model.set_translation(index, FAILURE_SENTINEL) {
                    report.shortfall.push(index);
                }
            }
        }
    }

    if !report.shortfall.is_empty() {
        log::warn!(
            "Reply had {} lines for {} segments; {} marked as failed",
            lines.len(),
            request.len(),
            report.shortfall.len()
        );
    }
    if report.surplus_lines > 0 {
        log::warn!("Ignored {} extra reply lines", report.surplus_lines);
    }
    report
}

fn flatten_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}
