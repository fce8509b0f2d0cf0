//! Ingestion pipeline / 摄入流程
//!
//! One call takes an exported bundle from archive file to persisted rows:
//! expand the container, extract and normalize the records, write the batch
//! to the store. File-level parse failures are absorbed into the report;
//! archive-level and store-level failures abort the call with the store
//! unchanged.

use std::path::Path;

use crate::archive::expand_archive;
use crate::config::AppConfig;
use crate::error::IngestError;
use crate::extract::extract_records;
use crate::models::IngestReport;
use crate::store::ConversationStore;

/// Ingest one exported archive / 摄入一个导出的压缩包
///
/// Re-running on the same archive is safe: expansion reuses the same
/// directory and records replace themselves by id.
pub async fn ingest_archive(
    store: &ConversationStore,
    archive_path: &Path,
    extract_root: &Path,
    filename_encoding: &str,
) -> Result<IngestReport, IngestError> {
    tracing::info!("Ingesting archive {:?}", archive_path);

    let expanded_dir = expand_archive(archive_path, extract_root, filename_encoding)?;
    let batch = extract_records(&expanded_dir)?;
    let inserted = store.upsert(&batch.records).await?;

    if !batch.failed_files.is_empty() {
        tracing::warn!(
            "Ingest of {:?} finished with {} unreadable record files",
            archive_path,
            batch.failed_files.len()
        );
    }
    tracing::info!(
        "Ingest finished: {} inserted, {} entries skipped, {} files failed",
        inserted,
        batch.skipped_entries,
        batch.failed_files.len()
    );

    Ok(IngestReport {
        inserted,
        skipped: batch.skipped_entries,
        failed_files: batch.failed_files,
    })
}

/// Ingest using paths from the application config / 按配置路径摄入
pub async fn ingest_with_config(
    store: &ConversationStore,
    config: &AppConfig,
    archive_path: &Path,
) -> Result<IngestReport, IngestError> {
    ingest_archive(
        store,
        archive_path,
        &config.get_extract_dir(),
        &config.archive.filename_encoding,
    )
    .await
}
