/*!
 * Integration tests for the load, edit and export workflow
 */

use anyhow::Result;

use polyedit::file_utils::FileManager;
use polyedit::formats::{FormatKind, SerializationWarning};
use polyedit::segment::SegmentFilter;
use polyedit::session::{EditorSession, SourceFiles};
use crate::common;

/// Edit one key of a JSON file and export it next to the source
#[test]
fn test_key_value_workflow_withSingleEdit_shouldExportAllKeys() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source_path = common::create_test_file(temp_dir.path(), "en.json", r#"{"a":"Hello","b":"World"}"#)?;

    let mut session = EditorSession::new(FormatKind::KeyValue);
    let files = SourceFiles {
        original: Some("en.json".to_string()),
        target: Some("fr.json".to_string()),
    };
    assert_eq!(session.load(&FileManager::read_bytes(&source_path)?, None, files)?, 2);

    assert!(session.edit(1, "Monde"));
    assert!(session.model().is_modified(1));
    assert!(!session.model().is_modified(0));

    let out = session.save()?;
    assert!(out.warnings.is_empty());
    let output_path = temp_dir.path().join(session.output_file_name());
    assert_eq!(output_path.file_name().unwrap(), "fr.json");
    FileManager::write_bytes(&output_path, &out.bytes)?;

    let written = String::from_utf8(FileManager::read_bytes(&output_path)?)?;
    assert_eq!(written, "{\n  \"a\": \"\",\n  \"b\": \"Monde\"\n}");
    Ok(())
}

/// Exporting an untouched XLIFF file gives back the same bytes
#[test]
fn test_xliff_workflow_withoutEdits_shouldBeByteIdentical() -> Result<()> {
    let mut session = EditorSession::new(FormatKind::Xliff);
    session.load(common::SAMPLE_XLIFF.as_bytes(), None, SourceFiles::default())?;
    assert_eq!(session.model().len(), 2);
    assert_eq!(session.model().find("farewell").unwrap().translation, "Au revoir");

    let out = session.save()?;
    assert_eq!(String::from_utf8(out.bytes)?, common::SAMPLE_XLIFF);
    assert!(session.notice().is_none());
    Ok(())
}

/// Only the edited unit changes; comments, attributes and layout stay
#[test]
fn test_xliff_workflow_withEdit_shouldOnlyTouchThatUnit() -> Result<()> {
    let mut session = EditorSession::new(FormatKind::Xliff);
    session.load(common::SAMPLE_XLIFF.as_bytes(), None, SourceFiles::default())?;
    let index = session.model().position("greeting").unwrap();
    session.edit(index, "Bonjour");

    let out = session.save()?;
    let text = String::from_utf8(out.bytes)?;
    let expected = common::SAMPLE_XLIFF.replace(
        "<source>Hello</source>",
        "<source>Hello</source><target>Bonjour</target>",
    );
    assert_eq!(text, expected);
    assert!(text.contains("<!-- exported by the app build -->"));
    assert!(text.contains(r#"<trans-unit id="farewell" approved="yes">"#));
    Ok(())
}

/// References in units that were not edited are written back as they were read
#[test]
fn test_xliff_workflow_withEntitiesInOtherUnit_shouldKeepThemVerbatim() -> Result<()> {
    let mut session = EditorSession::new(FormatKind::Xliff);
    session.load(common::SAMPLE_XLIFF_ENTITIES.as_bytes(), None, SourceFiles::default())?;
    let notice = session.model().find("notice").unwrap();
    assert_eq!(notice.original, "Say \"hi\" & read the terms \u{a9} 2024");
    assert_eq!(notice.translation, "Dites \"salut\" & lisez les conditions \u{a9} 2024");

    let index = session.model().position("button").unwrap();
    session.edit(index, "Accepter & continuer");

    let out = session.save()?;
    let text = String::from_utf8(out.bytes)?;
    let expected = common::SAMPLE_XLIFF_ENTITIES.replace(
        "<source>Accept &amp; continue</source>",
        "<source>Accept &amp; continue</source><target>Accepter &amp; continuer</target>",
    );
    assert_eq!(text, expected);
    assert!(text.starts_with("<?xml version='1.0' encoding='UTF-8'?>"));
    Ok(())
}

/// Subtitle exports report dropped cue metadata through the session notice
#[test]
fn test_subtitle_workflow_withExport_shouldSetNotice() -> Result<()> {
    let mut session = EditorSession::new(FormatKind::Subtitle);
    session.load(common::SAMPLE_VTT.as_bytes(), None, SourceFiles::default())?;
    let out = session.save()?;
    assert!(matches!(out.warnings[0], SerializationWarning::CueMetadataDropped { .. }));
    assert!(session.notice().is_some());
    assert!(session.take_notice().is_some());
    assert!(session.notice().is_none());
    Ok(())
}

/// Filters narrow the visible rows without touching the model
#[test]
fn test_filter_workflow_withOriginalNeedle_shouldListMatchingRows() {
    let mut session = common::key_value_session(12);
    session.set_filter(SegmentFilter {
        original: "LINE 1".to_string(),
        ..Default::default()
    });
    assert_eq!(session.visible_rows(), vec![1, 10, 11]);
    assert_eq!(session.model().len(), 12);

    session.set_filter(SegmentFilter::default());
    assert_eq!(session.visible_rows().len(), 12);
}

/// Loading a new file clears selection and filter
#[test]
fn test_reload_withNewFile_shouldResetDocumentState() -> Result<()> {
    let mut session = common::key_value_session(3);
    session.toggle_selection(2);
    session.set_filter(SegmentFilter {
        key: "k".to_string(),
        ..Default::default()
    });
    let generation = session.generation();

    session.load(br#"{"x":"y"}"#, None, SourceFiles::default())?;
    assert!(session.selection().is_empty());
    assert!(session.filter().is_empty());
    assert_eq!(session.model().len(), 1);
    assert!(session.generation() > generation);
    Ok(())
}
