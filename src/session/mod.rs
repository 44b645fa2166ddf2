/*!
 * Editing session for one document at a time.
 *
 * This module provides:
 * - Loading a source (and optional target) file with an explicit format
 * - Edits, row selection and column filters
 * - Batch translation of all or the selected rows
 * - Export back into the original container format
 *
 * Loading a file or switching format replaces the whole document state at
 * once and bumps a generation counter; replies prepared for an older
 * generation are rejected.
 */

pub mod models;

use chrono::Local;

use crate::aligner::{self, AlignmentReport};
use crate::errors::{ParseError, SerializeError, TranslationError};
use crate::file_utils::FileManager;
use crate::formats::{self, DocumentRenderer, FormatKind, Serialized};
use crate::segment::{SegmentFilter, SegmentModel};
use crate::app_config::Profile;
use crate::translation::{TaskOutcome, TaskState, TranslationService, TranslationTask};

pub use models::{DocumentState, PreparedBatch, SourceFiles};

/// Editing session driven by a table front end or the CLI
#[derive(Debug, Default)]
pub struct EditorSession {
    state: DocumentState,
    task: TranslationTask,
    generation: u64,
    notice: Option<String>,
}

impl EditorSession {
    pub fn new(format: FormatKind) -> Self {
        Self {
            state: DocumentState::empty(format),
            ..Default::default()
        }
    }

    pub fn format(&self) -> FormatKind {
        self.state.format
    }

    /// Switch format; the current document is discarded
    pub fn set_format(&mut self, format: FormatKind) {
        self.reset(DocumentState::empty(format));
    }

    /// Parse and install a document with the current format.
    ///
    /// On failure the previous document stays loaded and a notice is set.
    pub fn load(&mut self, source: &[u8], target: Option<&[u8]>, files: SourceFiles) -> Result<usize, ParseError> {
        let format = self.state.format;
        match formats::parse(format, source, target) {
            Ok(parsed) => {
                let count = parsed.model.len();
                log::info!("Loaded {} segments from {} file", count, format.display_name());
                self.reset(DocumentState::from_parsed(format, parsed, files));
                Ok(count)
            }
            Err(e) => {
                log::warn!("Failed to load {} file: {}", format.display_name(), e);
                self.notice = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn reset(&mut self, state: DocumentState) {
        self.state = state;
        self.generation += 1;
        self.task.acknowledge();
        self.notice = None;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn model(&self) -> &SegmentModel {
        &self.state.model
    }

    pub fn files(&self) -> &SourceFiles {
        &self.state.files
    }

    /// Replace one translation as a user edit
    pub fn edit(&mut self, index: usize, translation: impl Into<String>) -> bool {
        self.state.model.set_translation(index, translation)
    }

    /// Flip selection of a row; returns whether it is now selected
    pub fn toggle_selection(&mut self, index: usize) -> bool {
        if index >= self.state.model.len() {
            return false;
        }
        if self.state.selection.remove(&index) {
            false
        } else {
            self.state.selection.insert(index);
            true
        }
    }

    /// Selected row indices in ascending order
    pub fn selection(&self) -> Vec<usize> {
        self.state.selection.iter().copied().collect()
    }

    pub fn clear_selection(&mut self) {
        self.state.selection.clear();
    }

    pub fn set_filter(&mut self, filter: SegmentFilter) {
        self.state.filter = filter;
    }

    pub fn filter(&self) -> &SegmentFilter {
        &self.state.filter
    }

    /// Indices of the rows passing the current filter
    pub fn visible_rows(&self) -> Vec<usize> {
        self.state.filter.apply(&self.state.model)
    }

    pub fn task_state(&self) -> TaskState {
        self.task.state()
    }

    pub fn is_loading(&self) -> bool {
        self.task.is_loading()
    }

    /// Return a settled translation task to idle
    pub fn acknowledge(&mut self) {
        self.task.acknowledge();
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Validate preconditions and build the request for the selection
    /// (or every row when nothing is selected)
    pub fn prepare_batch(&mut self, profile: &Profile) -> Result<PreparedBatch, TranslationError> {
        TranslationService::ensure_ready(profile)?;
        if self.state.model.is_empty() {
            return Err(TranslationError::NothingToTranslate);
        }

        let guard = self.task.begin()?;
        let selection = self.selection();
        let request = aligner::build_request(&self.state.model, &selection, self.state.format.is_block());
        log::debug!(
            "Prepared batch of {} segments (generation {})",
            request.len(),
            self.generation
        );
        Ok(PreparedBatch {
            request,
            generation: self.generation,
            guard,
        })
    }

    /// Apply a provider reply to the document the batch was prepared for
    pub fn apply_batch(&mut self, batch: PreparedBatch, reply: &str) -> Result<AlignmentReport, TranslationError> {
        let PreparedBatch { request, generation, guard } = batch;
        if generation != self.generation {
            log::warn!(
                "Discarding reply for generation {} (current {})",
                generation,
                self.generation
            );
            drop(guard);
            return Err(TranslationError::StaleDocument);
        }

        let report = aligner::apply_reply(&mut self.state.model, &request, reply);
        if !report.shortfall.is_empty() {
            self.notice = Some(format!(
                "{} of {} segments were not translated",
                report.shortfall.len(),
                request.len()
            ));
        }
        self.task.settle(guard, TaskOutcome::Completed(report.clone()));
        Ok(report)
    }

    /// Record a failed request
    pub fn fail_batch(&mut self, batch: PreparedBatch, error: &TranslationError) {
        let message = error.to_string();
        if batch.generation == self.generation {
            self.notice = Some(message.clone());
            self.task.settle(batch.guard, TaskOutcome::Failed(message));
        }
    }

    /// Prepare, send and apply one batch
    pub async fn translate(&mut self, service: &TranslationService) -> Result<AlignmentReport, TranslationError> {
        let batch = self.prepare_batch(service.profile())?;
        let block_mode = batch.request.block_mode;
        match service.translate(&batch.request.payload, block_mode).await {
            Ok(reply) => self.apply_batch(batch, &reply),
            Err(e) => {
                self.fail_batch(batch, &e);
                Err(e)
            }
        }
    }

    /// Serialize the document with the built-in renderer
    pub fn save(&mut self) -> Result<Serialized, SerializeError> {
        self.save_with(&formats::PlainTextRenderer, None)
    }

    /// Serialize the document, rendering block formats with `renderer`
    pub fn save_with(
        &mut self,
        renderer: &dyn DocumentRenderer,
        target_language: Option<&str>,
    ) -> Result<Serialized, SerializeError> {
        let result = formats::serialize_with(
            self.state.format,
            &self.state.model,
            self.state.envelope.as_ref(),
            renderer,
            target_language,
        );
        match &result {
            Ok(serialized) if !serialized.warnings.is_empty() => {
                let messages: Vec<String> = serialized.warnings.iter().map(ToString::to_string).collect();
                self.notice = Some(messages.join("; "));
            }
            Ok(_) => {}
            Err(e) => self.notice = Some(e.to_string()),
        }
        result
    }

    /// File name for the export of the current document
    pub fn output_file_name(&self) -> String {
        let original = self.state.files.original.as_deref().unwrap_or("document");
        FileManager::output_file_name(original, self.state.files.target.as_deref(), self.state.format, Local::now())
    }
}
