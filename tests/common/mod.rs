/*!
 * Common test utilities for the polyedit test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use polyedit::app_config::{Profile, ProviderKind};
use polyedit::formats::FormatKind;
use polyedit::session::{EditorSession, SourceFiles};

/// XLIFF 1.2 file with one untranslated and one translated unit
pub const SAMPLE_XLIFF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff version="1.2" xmlns="urn:oasis:names:tc:xliff:document:1.2">
  <!-- exported by the app build -->
  <file source-language="en" target-language="fr" datatype="plaintext" original="app">
    <body>
      <trans-unit id="greeting">
        <source>Hello</source>
      </trans-unit>
      <trans-unit id="farewell" approved="yes">
        <source>Goodbye</source>
        <target>Au revoir</target>
      </trans-unit>
    </body>
  </file>
</xliff>
"#;

/// XLIFF 1.2 file with entity and character references in a translated unit
pub const SAMPLE_XLIFF_ENTITIES: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<xliff version="1.2" xmlns="urn:oasis:names:tc:xliff:document:1.2">
  <file source-language="en" target-language="fr" datatype="plaintext" original="legal">
    <body>
      <trans-unit id="notice">
        <source>Say &quot;hi&quot; &amp; read the terms &#169; 2024</source>
        <target>Dites &quot;salut&quot; &amp; lisez les conditions &#xA9; 2024</target>
      </trans-unit>
      <trans-unit id="button">
        <source>Accept &amp; continue</source>
      </trans-unit>
    </body>
  </file>
</xliff>
"#;

/// WebVTT file with three cues
pub const SAMPLE_VTT: &str = "WEBVTT\n\n00:00:01.000 --> 00:00:04.000\nThis is a test subtitle.\n\n00:00:05.000 --> 00:00:09.000\nIt contains multiple entries.\n\n00:00:10.000 --> 00:00:14.000\nFor testing purposes.\n";

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Profile that passes every precondition
pub fn ready_profile(target_language: &str) -> Profile {
    let mut profile = Profile::new("Test", ProviderKind::OpenAI);
    profile.api_key = "sk-test".to_string();
    profile.target_language = target_language.to_string();
    profile
}

/// Session with a key/value document of `count` keys `k0..` and originals `line 0..`
pub fn key_value_session(count: usize) -> EditorSession {
    let entries: Vec<String> = (0..count).map(|i| format!("\"k{}\": \"line {}\"", i, i)).collect();
    let source = format!("{{{}}}", entries.join(", "));
    let mut session = EditorSession::new(FormatKind::KeyValue);
    session
        .load(source.as_bytes(), None, SourceFiles::default())
        .expect("sample document should parse");
    session
}
