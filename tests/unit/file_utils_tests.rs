/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use chrono::{Local, TimeZone};
use polyedit::file_utils::FileManager;
use polyedit::formats::FormatKind;
use crate::common;

fn fixed_time() -> chrono::DateTime<Local> {
    Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
}

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "exists.json", "{}")?;
    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

/// write_bytes creates missing parent directories
#[test]
fn test_write_bytes_withNestedPath_shouldCreateParents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out").join("nested").join("fr.json");
    FileManager::write_bytes(&path, b"{\"a\": \"b\"}")?;
    assert_eq!(FileManager::read_bytes(&path)?, b"{\"a\": \"b\"}");
    Ok(())
}

#[test]
fn test_read_bytes_withMissingFile_shouldFail() {
    assert!(FileManager::read_bytes("definitely_missing_file.json").is_err());
}

#[test]
fn test_output_file_name_withMatchingTarget_shouldReuseTargetName() {
    let name = FileManager::output_file_name("en.json", Some("fr.JSON"), FormatKind::KeyValue, fixed_time());
    assert_eq!(name, "fr.JSON");
}

#[test]
fn test_output_file_name_withoutTarget_shouldTimestampOriginalStem() {
    let name = FileManager::output_file_name("messages.en.xlf", None, FormatKind::Xliff, fixed_time());
    assert_eq!(name, "messages.en_20240309-140507.xlf");
}

#[test]
fn test_output_file_name_withMismatchedTarget_shouldFallBackToStem() {
    let name = FileManager::output_file_name("movie.vtt", Some("movie.srt"), FormatKind::Subtitle, fixed_time());
    assert_eq!(name, "movie_20240309-140507.vtt");

    let name = FileManager::output_file_name("", None, FormatKind::Delimited, fixed_time());
    assert_eq!(name, "document_20240309-140507.txt");
}
