//! Writing template files into the target project

use crate::error::InstallError;
use crate::templates::store::{SharedCategory, TemplateStore};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files and bytes written by a copy step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files: usize,
    pub bytes: u64,
}

impl CopyStats {
    pub fn add(&mut self, other: CopyStats) {
        self.files += other.files;
        self.bytes += other.bytes;
    }
}

pub async fn ensure_dir(dir: &Path) -> Result<(), InstallError> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| InstallError::write(dir, e))
}

/// Write `content` to `path` through a temporary sibling that is renamed into
/// place. On failure the temporary is removed, so `path` is either the old
/// file, the new file, or absent.
pub async fn write_file(path: &Path, content: &[u8]) -> Result<u64, InstallError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }

    let tmp = temp_path(path);
    let result = async {
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, path).await
    }
    .await;

    match result {
        Ok(()) => {
            tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");
            Ok(content.len() as u64)
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp).await;
            Err(InstallError::write(path, e))
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.canopy-tmp", name))
}

/// Copy every file of a shared category verbatim into `<target>/<category>/`.
/// Existing files are overwritten.
pub async fn copy_shared_category(
    store: &TemplateStore,
    category: SharedCategory,
    target: &Path,
) -> Result<CopyStats, InstallError> {
    let target_dir = target.join(category.dir_name());
    ensure_dir(&target_dir).await?;

    let mut stats = CopyStats::default();
    for relative in store.shared_files(category)? {
        let content = store.read_shared(category, &relative).await?;
        stats.bytes += write_file(&target_dir.join(&relative), &content).await?;
        stats.files += 1;
    }

    tracing::debug!(%category, files = stats.files, "copied shared templates");
    Ok(stats)
}

/// Copy all shared categories
pub async fn copy_shared(store: &TemplateStore, target: &Path) -> Result<CopyStats, InstallError> {
    let mut stats = CopyStats::default();
    for category in SharedCategory::ALL {
        stats.add(copy_shared_category(store, category, target).await?);
    }
    Ok(stats)
}
