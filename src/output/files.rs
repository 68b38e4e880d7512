//! Run directories and artifact files

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::utils::{clean_filename, safe_truncate_chars};

const ARTICLE_TITLE_CHARS: usize = 30;

/// Directory holding every artifact of one research run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDirectory {
    root: PathBuf,
}

impl RunDirectory {
    /// Create `<base>/<prefix>_<clean_filename(name)>`
    pub async fn create(base: &Path, prefix: &str, name: &str) -> Result<Self> {
        let root = base.join(format!("{prefix}_{}", clean_filename(name)));
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("Failed to create run directory {}", root.display()))?;
        Ok(Self { root })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn join(&self, file_name: impl AsRef<Path>) -> PathBuf {
        self.root.join(file_name)
    }

    /// `article_<n>_<title>` for the candidate at zero-based `index`
    #[must_use]
    pub fn article_stem(index: usize, title: &str) -> String {
        let title = clean_filename(title);
        format!(
            "article_{}_{}",
            index + 1,
            safe_truncate_chars(&title, ARTICLE_TITLE_CHARS)
        )
    }

    #[must_use]
    pub fn article_text_path(&self, index: usize, title: &str) -> PathBuf {
        self.join(format!("{}.txt", Self::article_stem(index, title)))
    }

    #[must_use]
    pub fn article_screenshot_path(&self, index: usize, title: &str) -> PathBuf {
        self.join(format!("{}.png", Self::article_stem(index, title)))
    }
}

/// Write `contents` to `path`, creating parent directories
pub async fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Save PNG bytes; failures are logged and reported as `None`
pub async fn save_screenshot(png: &[u8], path: &Path) -> Option<PathBuf> {
    match write_file(path, png).await {
        Ok(()) => {
            info!("Saved screenshot to {}", path.display());
            Some(path.to_path_buf())
        }
        Err(e) => {
            error!("Error saving screenshot to {}: {e:#}", path.display());
            None
        }
    }
}

/// Save UTF-8 text; failures are logged and reported as `None`
pub async fn save_text(text: &str, path: &Path) -> Option<PathBuf> {
    match write_file(path, text).await {
        Ok(()) => {
            info!("Saved content to {}", path.display());
            Some(path.to_path_buf())
        }
        Err(e) => {
            error!("Error saving content to {}: {e:#}", path.display());
            None
        }
    }
}

/// Pretty-printed JSON
pub async fn save_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_file(path, json).await
}
