/*!
 * Batch translation through language-model providers.
 *
 * - `core`: provider selection, prompt building and reply normalization
 * - `task`: loading flag and request lifecycle state
 */

// Re-export main types for easier usage
pub use self::core::TranslationService;
pub use self::task::{LoadingFlag, LoadingGuard, TaskOutcome, TaskState, TranslationTask};

// Submodules
pub mod core;
pub mod task;
