/*!
 * Tests for the format adapters through the public parse/serialize dispatch
 */

use std::sync::Mutex;

use polyedit::errors::{ParseError, RenderError};
use polyedit::formats::{self, DocumentRenderer, FormatKind, RenderHints, SerializationWarning};
use crate::common;

#[test]
fn test_from_path_withKnownExtensions_shouldGuessFormat() {
    assert_eq!(FormatKind::from_path("strings/fr.JSON"), Some(FormatKind::KeyValue));
    assert_eq!(FormatKind::from_path("app.xliff"), Some(FormatKind::Xliff));
    assert_eq!(FormatKind::from_path("movie.srt"), Some(FormatKind::Subtitle));
    assert_eq!(FormatKind::from_path("report.docx"), Some(FormatKind::RichTextDocument));
    assert_eq!(FormatKind::from_path("archive.zip"), None);
    assert_eq!(FormatKind::from_path("README"), None);
}

#[test]
fn test_key_value_withTargetFile_shouldPairByKey() {
    let doc = formats::parse(
        FormatKind::KeyValue,
        br#"{"title": "Welcome", "count": 3, "empty": null}"#,
        Some(br#"{"count": "trois", "title": "Bienvenue", "extra": "ignored"}"#),
    )
    .unwrap();
    let rows: Vec<(&str, &str, &str)> = doc
        .model
        .iter()
        .map(|s| (s.key.as_str(), s.original.as_str(), s.translation.as_str()))
        .collect();
    assert_eq!(
        rows,
        vec![("title", "Welcome", "Bienvenue"), ("count", "3", "trois"), ("empty", "", "")]
    );
}

#[test]
fn test_key_value_withNestedObject_shouldReportKey() {
    let result = formats::parse(FormatKind::KeyValue, br#"{"menu": {"file": "File"}}"#, None);
    assert_eq!(
        result.unwrap_err(),
        ParseError::UnsupportedValue {
            key: "menu".to_string()
        }
    );
}

#[test]
fn test_parse_withInvalidUtf8_shouldReportEncoding() {
    let result = formats::parse(FormatKind::Subtitle, &[0xff, 0xfe, 0x00], None);
    assert!(matches!(result, Err(ParseError::InvalidEncoding { .. })));
}

#[test]
fn test_subtitle_serialize_shouldWriteTimingAndTranslation() {
    let mut doc = formats::parse(FormatKind::Subtitle, common::SAMPLE_VTT.as_bytes(), None).unwrap();
    assert_eq!(doc.model.len(), 3);
    doc.model.set_translation(0, "Ceci est un sous-titre de test.");

    let out = formats::serialize(FormatKind::Subtitle, &doc.model, None).unwrap();
    let text = String::from_utf8(out.bytes).unwrap();
    assert!(text.starts_with("WEBVTT\n\n00:00:01.000 --> 00:00:04.000\nCeci est un sous-titre de test.\n\n"));
    assert!(text.contains("00:00:05.000 --> 00:00:09.000\n\n\n"));
    assert_eq!(out.warnings.len(), 1);
    assert!(matches!(out.warnings[0], SerializationWarning::CueMetadataDropped { .. }));
}

#[test]
fn test_delimited_withTargetFile_shouldRestoreTranslations() {
    let source = "Exported strings\n#KEY: intro\nFirst line\nsecond line\n\n#KEY:outro\nBye\n";
    let target = "#KEY:outro\nSalut\n\n#KEY:intro\nBonjour\n";
    let doc = formats::parse(FormatKind::Delimited, source.as_bytes(), Some(target.as_bytes())).unwrap();
    assert_eq!(doc.model.get(0).unwrap().original, "First line second line");
    assert_eq!(doc.model.get(0).unwrap().translation, "Bonjour");

    let out = formats::serialize(FormatKind::Delimited, &doc.model, None).unwrap();
    assert_eq!(String::from_utf8(out.bytes).unwrap(), "#KEY:intro\nBonjour\n\n#KEY:outro\nSalut\n\n");
}

#[test]
fn test_xliff_serialize_withoutEnvelope_shouldFail() {
    let doc = formats::parse(FormatKind::KeyValue, br#"{"a": "b"}"#, None).unwrap();
    assert!(formats::serialize(FormatKind::Xliff, &doc.model, None).is_err());
}

/// Renderer that records the hints it was called with
struct RecordingRenderer {
    seen: Mutex<Vec<(String, RenderHints)>>,
}

impl DocumentRenderer for RecordingRenderer {
    fn render(&self, text: &str, hints: &RenderHints) -> Result<Vec<u8>, RenderError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push((text.to_string(), hints.clone()));
        }
        Ok(format!("<rendered>{}</rendered>", text).into_bytes())
    }
}

#[test]
fn test_block_serialize_withCustomRenderer_shouldPassFontForTargetLanguage() {
    let mut doc = formats::parse(FormatKind::PageDocument, "Annual report".as_bytes(), None).unwrap();
    assert_eq!(doc.model.len(), 1);
    doc.model.set_translation(0, "年次報告書");

    let renderer = RecordingRenderer { seen: Mutex::new(Vec::new()) };
    let out = formats::serialize_with(FormatKind::PageDocument, &doc.model, None, &renderer, Some("ja")).unwrap();
    assert_eq!(String::from_utf8(out.bytes).unwrap(), "<rendered>年次報告書</rendered>");

    let seen = renderer.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].1.font, "/fonts/NotoSansJP-Regular.otf");
    assert_eq!(seen[0].1.target_language.as_deref(), Some("ja"));
}

/// Copy originals into translations, export, then read the export back as the target file
#[test]
fn test_round_trip_withOriginalsAsTranslations_shouldRestoreEveryRow() {
    let delimited = "#KEY:one\nFirst\n\n#KEY:two\nSecond line\n";
    let samples: Vec<(FormatKind, &[u8])> = vec![
        (FormatKind::KeyValue, br#"{"title": "Welcome", "body": "Read <b>this</b> & that"}"#),
        (FormatKind::Xliff, common::SAMPLE_XLIFF.as_bytes()),
        (FormatKind::Subtitle, common::SAMPLE_VTT.as_bytes()),
        (FormatKind::Delimited, delimited.as_bytes()),
    ];

    for (kind, source) in samples {
        let mut doc = formats::parse(kind, source, None).unwrap();
        let originals: Vec<String> = doc.model.iter().map(|s| s.original.clone()).collect();
        for (index, original) in originals.iter().enumerate() {
            doc.model.set_translation(index, original.as_str());
        }

        let out = formats::serialize(kind, &doc.model, doc.envelope.as_ref()).unwrap();
        let reparsed = formats::parse(kind, source, Some(&out.bytes)).unwrap();
        let translations: Vec<String> = reparsed.model.iter().map(|s| s.translation.clone()).collect();
        assert_eq!(translations, originals, "round trip failed for {}", kind.display_name());
    }
}
