//! Record extraction / 记录提取
//!
//! Scans an expanded archive directory for JSON record files and normalizes
//! their entries into [`ConversationRecord`]s. One malformed file never
//! aborts the batch: it is reported in the result and the remaining files
//! are still processed.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::ExtractError;
use crate::models::{ConversationRecord, FailedFile};

/// Records produced from one expanded archive / 单个压缩包产出的记录批次
#[derive(Debug, Default)]
pub struct ExtractBatch {
    pub records: Vec<ConversationRecord>,
    /// Entries dropped for missing id/content fields / 缺字段被跳过的条目数
    pub skipped_entries: u64,
    pub failed_files: Vec<FailedFile>,
}

/// Extract records from every JSON file in `dir` / 提取目录下所有JSON文件的记录
///
/// Files are visited in path order, so the output order is stable for a
/// given directory state. Fails only when the directory itself cannot be
/// listed.
pub fn extract_records(dir: &Path) -> Result<ExtractBatch, ExtractError> {
    let entries = std::fs::read_dir(dir).map_err(|e| ExtractError::ReadDir {
        dir: dir.to_path_buf(),
        source: e,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.eq_ignore_ascii_case("json"))
                    .unwrap_or(false)
        })
        .collect();
    files.sort();

    let mut batch = ExtractBatch::default();
    for file in &files {
        match parse_record_file(file) {
            Ok((records, skipped)) => {
                if skipped > 0 {
                    tracing::debug!("Skipped {} incomplete entries in {:?}", skipped, file);
                }
                batch.skipped_entries += skipped;
                batch.records.extend(records);
            }
            Err(reason) => {
                tracing::warn!("Failed to extract records from {:?}: {}", file, reason);
                batch.failed_files.push(FailedFile {
                    path: file.to_string_lossy().into_owned(),
                    reason,
                });
            }
        }
    }

    tracing::info!(
        "Extracted {} records from {:?} ({} skipped, {} failed files)",
        batch.records.len(),
        dir,
        batch.skipped_entries,
        batch.failed_files.len()
    );
    Ok(batch)
}

/// 解析单个记录文件，返回记录和被跳过的条目数
fn parse_record_file(path: &Path) -> Result<(Vec<ConversationRecord>, u64), String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("read failed: {}", e))?;
    let value: Value = serde_json::from_str(&text).map_err(|e| format!("invalid JSON: {}", e))?;

    let Value::Array(items) = value else {
        return Err("top-level structure is not an array".to_string());
    };

    let mut records = Vec::with_capacity(items.len());
    let mut skipped = 0u64;
    for item in &items {
        match normalize_entry(item) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }
    Ok((records, skipped))
}

/// Normalize one exported entry / 规范化单个导出条目
///
/// The export encodes entries as objects with an `id` and an arbitrarily
/// nested `content` payload. The payload is re-serialized to one canonical
/// string so search works over consistent text.
fn normalize_entry(entry: &Value) -> Option<ConversationRecord> {
    let obj = entry.as_object()?;

    let id = match obj.get("id")? {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let content = serde_json::to_string(obj.get("content")?).ok()?;

    Some(ConversationRecord { id, content })
}
