//! Markdown export for daily lessons, task lists and review reports.

use std::fs;
use std::path::{Path, PathBuf};

use super::StoreError;
use crate::calendar;

/// Make a user-supplied name safe to use as a Markdown file name.
///
/// Blank names become `{today}.md`; a missing `.md` suffix is appended;
/// anything outside `[A-Za-z0-9._-]` turns into `-`, and runs of `-` collapse.
pub fn sanitize_markdown_file_name(file_name: &str) -> String {
    let fallback = || format!("{}.md", calendar::today());

    let trimmed = file_name.trim();
    let raw = if trimmed.is_empty() {
        fallback()
    } else if trimmed.ends_with(".md") {
        trimmed.to_string()
    } else {
        format!("{}.md", trimmed)
    };

    let mut safe = String::with_capacity(raw.len());
    for ch in raw.chars() {
        let ch = if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
            ch
        } else {
            '-'
        };
        if ch == '-' && safe.ends_with('-') {
            continue;
        }
        safe.push(ch);
    }

    if safe.is_empty() { fallback() } else { safe }
}

/// Destination for exported Markdown
pub trait ExportSink {
    /// Write `content` under a sanitized `file_name`; returns where it landed
    fn export_file(&self, file_name: &str, content: &str) -> Result<PathBuf, StoreError>;

    /// Previously exported content, if any
    fn read_file(&self, file_name: &str) -> Option<String>;
}

/// Writes exports into one directory
#[derive(Debug, Clone)]
pub struct DirExportSink {
    dir: PathBuf,
}

impl DirExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for DirExportSink {
    fn export_file(&self, file_name: &str, content: &str) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;
        let path = self.dir.join(sanitize_markdown_file_name(file_name));
        fs::write(&path, content).map_err(|e| StoreError::io(&path, e))?;
        tracing::info!("Exported {}", path.display());
        Ok(path)
    }

    fn read_file(&self, file_name: &str) -> Option<String> {
        let path = self.dir.join(sanitize_markdown_file_name(file_name));
        fs::read_to_string(path).ok()
    }
}
