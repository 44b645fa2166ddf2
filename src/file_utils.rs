use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;

use crate::formats::FormatKind;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path).with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Read a whole file as bytes
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
        fs::read(&path).with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write bytes to a file, creating parent directories
    pub fn write_bytes<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }

    // @generates: Name of the exported file
    // @params: original file name, optional target file name, format, timestamp
    //
    // A target name already carrying the canonical extension is reused;
    // otherwise `<original stem>_<YYYYMMDD-HHMMSS>.<ext>`.
    pub fn output_file_name(original: &str, target: Option<&str>, kind: FormatKind, now: DateTime<Local>) -> String {
        let extension = kind.extension();
        if let Some(target) = target.map(str::trim).filter(|t| !t.is_empty()) {
            let matches = Path::new(target)
                .extension()
                .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
                .unwrap_or(false);
            if matches {
                return target.to_string();
            }
        }

        let stem = Path::new(original)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "document".to_string());
        format!("{}_{}.{}", stem, now.format("%Y%m%d-%H%M%S"), extension)
    }
}
