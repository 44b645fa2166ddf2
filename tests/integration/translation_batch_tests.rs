/*!
 * Integration tests for batch translation through the session
 */

use polyedit::aligner::FAILURE_SENTINEL;
use polyedit::errors::TranslationError;
use polyedit::formats::FormatKind;
use polyedit::providers::mock::MockProvider;
use polyedit::session::{EditorSession, SourceFiles};
use polyedit::translation::{TaskOutcome, TaskState, TranslationService};
use crate::common;

/// Selecting two of five rows translates exactly those two
#[tokio::test]
async fn test_translate_withSelection_shouldOnlyTouchSelectedRows() {
    let mut session = common::key_value_session(5);
    session.toggle_selection(3);
    session.toggle_selection(1);

    let mock = MockProvider::working();
    let service = TranslationService::with_mock(common::ready_profile("French"), mock.clone());
    let report = session.translate(&service).await.unwrap();

    assert_eq!(report.applied, vec![1, 3]);
    assert!(report.is_complete());
    assert_eq!(mock.last_request().unwrap().text, "line 1\nline 3");

    let translations: Vec<&str> = session.model().iter().map(|s| s.translation.as_str()).collect();
    assert_eq!(translations, vec!["", "[French] line 1", "", "[French] line 3", ""]);
    assert!(matches!(session.task_state(), TaskState::Settled(TaskOutcome::Completed(_))));
    assert!(!session.is_loading());
}

/// Without a selection every row is sent
#[tokio::test]
async fn test_translate_withoutSelection_shouldTranslateAllRows() {
    let mut session = common::key_value_session(3);
    let service = TranslationService::with_mock(common::ready_profile("de"), MockProvider::working());
    let report = session.translate(&service).await.unwrap();

    assert_eq!(report.applied, vec![0, 1, 2]);
    assert_eq!(session.model().get(2).unwrap().translation, "[German] line 2");
}

/// A reply with too few lines marks the trailing rows as failed
#[tokio::test]
async fn test_translate_withTruncatedReply_shouldWriteSentinel() {
    let mut session = common::key_value_session(5);
    let service = TranslationService::with_mock(common::ready_profile("French"), MockProvider::truncated());
    let report = session.translate(&service).await.unwrap();

    assert_eq!(report.applied, vec![0, 1, 2, 3]);
    assert_eq!(report.shortfall, vec![4]);
    assert_eq!(session.model().get(4).unwrap().translation, FAILURE_SENTINEL);
    assert!(session.notice().is_some());
}

/// A provider failure clears the loading flag and reports the error
#[tokio::test]
async fn test_translate_withFailingProvider_shouldClearLoadingFlag() {
    let mut session = common::key_value_session(2);
    let service = TranslationService::with_mock(common::ready_profile("French"), MockProvider::failing());

    let result = session.translate(&service).await;
    assert!(matches!(result, Err(TranslationError::Provider(_))));
    assert!(!session.is_loading());
    assert!(matches!(session.task_state(), TaskState::Settled(TaskOutcome::Failed(_))));
    assert!(session.model().iter().all(|s| s.translation.is_empty()));

    session.acknowledge();
    assert_eq!(session.task_state(), TaskState::Idle);
}

/// Missing credentials stop the batch before any request is made
#[tokio::test]
async fn test_translate_withoutApiKey_shouldNotContactProvider() {
    let mut session = common::key_value_session(2);
    let mut profile = common::ready_profile("French");
    profile.api_key.clear();
    let mock = MockProvider::working();
    let service = TranslationService::with_mock(profile, mock.clone());

    let result = session.translate(&service).await;
    assert!(matches!(result, Err(TranslationError::MissingCredential(_))));
    assert_eq!(mock.request_count(), 0);
    assert_eq!(session.task_state(), TaskState::Idle);
}

#[test]
fn test_prepare_batch_withEmptyDocument_shouldReportNothingToTranslate() {
    let mut session = EditorSession::new(FormatKind::KeyValue);
    let result = session.prepare_batch(&common::ready_profile("French"));
    assert!(matches!(result, Err(TranslationError::NothingToTranslate)));
    assert!(!session.is_loading());
}

/// A second batch cannot start while one is outstanding
#[test]
fn test_prepare_batch_whileInFlight_shouldReturnBusy() {
    let mut session = common::key_value_session(2);
    let profile = common::ready_profile("French");

    let batch = session.prepare_batch(&profile).unwrap();
    assert!(session.is_loading());
    assert_eq!(session.task_state(), TaskState::InFlight);
    assert!(matches!(session.prepare_batch(&profile), Err(TranslationError::Busy)));

    drop(batch);
    assert!(!session.is_loading());
    assert!(session.prepare_batch(&profile).is_ok());
}

/// A reply prepared for a replaced document is discarded
#[test]
fn test_apply_batch_afterReload_shouldRejectStaleReply() {
    let mut session = common::key_value_session(2);
    let batch = session.prepare_batch(&common::ready_profile("French")).unwrap();

    session
        .load(br#"{"other": "text"}"#, None, SourceFiles::default())
        .unwrap();
    let result = session.apply_batch(batch, "[French] line 0\n[French] line 1");

    assert!(matches!(result, Err(TranslationError::StaleDocument)));
    assert!(!session.is_loading());
    assert_eq!(session.model().get(0).unwrap().translation, "");
}

/// Block documents go out as one payload and come back as one translation
#[test]
fn test_translate_withPageDocument_shouldKeepWholeBlock() {
    let mut session = EditorSession::new(FormatKind::PageDocument);
    session
        .load("First paragraph.\nSecond paragraph.".as_bytes(), None, SourceFiles::default())
        .unwrap();
    let mock = MockProvider::working();
    let service = TranslationService::with_mock(common::ready_profile("es"), mock.clone());

    let report = tokio_test::block_on(session.translate(&service)).unwrap();
    assert_eq!(report.applied, vec![0]);
    assert_eq!(mock.last_request().unwrap().text, "First paragraph.\nSecond paragraph.");
    assert_eq!(
        session.model().get(0).unwrap().translation,
        "[Spanish] First paragraph.\n[Spanish] Second paragraph."
    );

    let out = session.save_with(&polyedit::formats::PlainTextRenderer, Some("es")).unwrap();
    assert_eq!(out.bytes, "[Spanish] First paragraph.\n[Spanish] Second paragraph.".as_bytes());
}
