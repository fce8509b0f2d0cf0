//! Error types / 错误类型
//!
//! Per-file parse failures during extraction are not errors: they are
//! collected into the ingest report as [`crate::models::FailedFile`].

use std::path::PathBuf;
use thiserror::Error;

/// Archive expansion failure (fatal to the ingest call) / 压缩包展开失败
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive not found: {0}")]
    Missing(PathBuf),

    #[error("unsupported archive format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid archive: {0}")]
    Invalid(#[from] zip::result::ZipError),

    #[error("archive io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Directory-level extraction failure / 目录级提取失败
///
/// Raised only when the expanded directory itself cannot be listed.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to list directory {dir:?}: {source}")]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Persistence layer failure / 存储层失败
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("batch write failed after {retries} retries: {message}")]
    Busy { retries: u32, message: String },
}

/// Umbrella error for a whole ingest call / 摄入流程总错误
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
