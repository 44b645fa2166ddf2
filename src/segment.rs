use serde::{Deserialize, Serialize};

// @module: Segment model shared by every format adapter

// @struct: One key/original/translation triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    // @field: Unique key within the document
    pub key: String,

    // @field: Source text
    pub original: String,

    // @field: Translated text, empty when untranslated
    pub translation: String,
}

impl Segment {
    pub fn new(key: impl Into<String>, original: impl Into<String>, translation: impl Into<String>) -> Self {
        Segment {
            key: key.into(),
            original: original.into(),
            translation: translation.into(),
        }
    }
}

/// Ordered list of segments in first-appearance order of the source file.
///
/// Order is the alignment contract with batch translation, so nothing in
/// this type ever reorders entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentModel {
    segments: Vec<Segment>,
    modified: Vec<bool>,
}

impl SegmentModel {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from parsed segments; nothing is marked modified
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        let modified = vec![false; segments.len()];
        SegmentModel { segments, modified }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// Find a segment by key
    pub fn find(&self, key: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.key == key)
    }

    /// Position of a key in document order
    pub fn position(&self, key: &str) -> Option<usize> {
        self.segments.iter().position(|s| s.key == key)
    }

    /// Replace the translation of one segment as a user edit.
    ///
    /// Returns false when the index is out of range.
    pub fn set_translation(&mut self, index: usize, translation: impl Into<String>) -> bool {
        match self.segments.get_mut(index) {
            Some(segment) => {
                segment.translation = translation.into();
                self.modified[index] = true;
                true
            }
            None => false,
        }
    }

    /// Same as [`set_translation`](Self::set_translation) but addressed by key
    pub fn set_translation_by_key(&mut self, key: &str, translation: impl Into<String>) -> bool {
        match self.position(key) {
            Some(index) => self.set_translation(index, translation),
            None => false,
        }
    }

    /// Whether a row was edited since load
    pub fn is_modified(&self, index: usize) -> bool {
        self.modified.get(index).copied().unwrap_or(false)
    }

    /// Number of edited rows
    pub fn modified_count(&self) -> usize {
        self.modified.iter().filter(|m| **m).count()
    }
}

/// Case-insensitive substring filter over the three columns.
///
/// Empty needles match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentFilter {
    pub key: String,
    pub original: String,
    pub translation: String,
}

impl SegmentFilter {
    pub fn is_empty(&self) -> bool {
        self.key.is_empty() && self.original.is_empty() && self.translation.is_empty()
    }

    pub fn matches(&self, segment: &Segment) -> bool {
        contains_ci(&segment.key, &self.key)
            && contains_ci(&segment.original, &self.original)
            && contains_ci(&segment.translation, &self.translation)
    }

    /// Indices (in the full model) of the rows that pass the filter
    pub fn apply(&self, model: &SegmentModel) -> Vec<usize> {
        model
            .iter()
            .enumerate()
            .filter(|(_, segment)| self.matches(segment))
            .map(|(index, _)| index)
            .collect()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}
