/*!
 * Session-specific models.
 *
 * `DocumentState` groups everything that belongs to one loaded document so a
 * reload or format switch replaces it in a single assignment.
 */

use std::collections::BTreeSet;

use crate::aligner::BatchRequest;
use crate::formats::{Envelope, FormatKind, ParsedDocument};
use crate::segment::{SegmentFilter, SegmentModel};
use crate::translation::LoadingGuard;

/// Names of the files a document was loaded from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFiles {
    /// Original file name
    pub original: Option<String>,
    /// Target file name, when one was supplied
    pub target: Option<String>,
}

/// Per-document editing state
#[derive(Debug, Clone, Default)]
pub struct DocumentState {
    pub format: FormatKind,
    pub model: SegmentModel,
    pub envelope: Option<Envelope>,
    pub selection: BTreeSet<usize>,
    pub filter: SegmentFilter,
    pub files: SourceFiles,
}

impl DocumentState {
    /// Empty state for a format
    pub fn empty(format: FormatKind) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }

    pub fn from_parsed(format: FormatKind, parsed: ParsedDocument, files: SourceFiles) -> Self {
        Self {
            format,
            model: parsed.model,
            envelope: parsed.envelope,
            selection: BTreeSet::new(),
            filter: SegmentFilter::default(),
            files,
        }
    }
}

/// A batch request that was handed out and not yet applied.
///
/// Holds the loading guard: the session stays busy until this value is
/// applied, failed or dropped.
#[derive(Debug)]
pub struct PreparedBatch {
    pub request: BatchRequest,
    /// Document generation the request was built from
    pub generation: u64,
    pub(crate) guard: LoadingGuard,
}
