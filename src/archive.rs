//! Archive expansion / 压缩包展开
//!
//! Expands an exported chat bundle (ZIP) into a working directory whose name
//! is derived from the archive file stem, so re-ingesting the same bundle
//! reuses the same location.

use std::io::{BufReader, BufWriter};
use std::path::{Component, Path, PathBuf};

use crate::error::ArchiveError;
use crate::utils::decode_filename;

/// 判断文件名是否为支持的压缩格式
pub fn is_supported_archive(filename: &str) -> bool {
    filename.to_lowercase().ends_with(".zip")
}

/// Expand an archive below `extract_root` / 将压缩包解压到解压根目录下
///
/// Returns the directory the members were expanded into
/// (`<extract_root>/<stem>_extracted`). Existing files at that location are
/// overwritten.
pub fn expand_archive(
    archive_path: &Path,
    extract_root: &Path,
    encoding: &str,
) -> Result<PathBuf, ArchiveError> {
    if !archive_path.is_file() {
        return Err(ArchiveError::Missing(archive_path.to_path_buf()));
    }

    let file_name = archive_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    if !is_supported_archive(file_name) {
        return Err(ArchiveError::UnsupportedFormat(file_name.to_string()));
    }

    let stem = archive_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("archive");
    let output_dir = extract_root.join(format!("{}_extracted", stem));
    std::fs::create_dir_all(&output_dir)?;

    let file = std::fs::File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))?;
    let mut count = 0u64;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let path_str = decode_filename(entry.name_raw(), encoding);

        let rel = path_str.trim_start_matches('/');
        if rel.is_empty() {
            continue;
        }
        // 拒绝包含 .. 的成员路径，防止写出到解压目录之外
        let rel_path = Path::new(rel);
        if rel_path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            tracing::warn!("Skipping unsafe archive member path: {}", path_str);
            continue;
        }

        let target = output_dir.join(rel_path);
        if entry.is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let out = std::fs::File::create(&target)?;
            let mut writer = BufWriter::with_capacity(128 * 1024, out);
            std::io::copy(&mut entry, &mut writer)?;
            count += 1;
        }
    }

    tracing::info!(
        "Expanded {} members from {:?} into {:?}",
        count,
        archive_path,
        output_dir
    );
    Ok(output_dir)
}
