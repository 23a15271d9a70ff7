use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Filesystem-backed storage for uploaded files, rooted at the configured
/// upload directory.
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Creates the upload directory if it does not exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("failed to create upload dir {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// True iff the name stays inside the upload directory when joined.
    pub fn is_safe_name(disk_name: &str) -> bool {
        !disk_name.is_empty()
            && !disk_name.contains('/')
            && !disk_name.contains('\\')
            && !disk_name.contains("..")
    }

    /// Resolves a disk name to a path under the root. Rejects anything that
    /// could escape the upload directory.
    fn resolve(&self, disk_name: &str) -> Result<PathBuf> {
        if !Self::is_safe_name(disk_name) {
            return Err(anyhow!("invalid file name '{}'", disk_name));
        }
        Ok(self.root.join(disk_name))
    }

    /// Writes file bytes under the given disk name. The bytes go to a
    /// temporary name first and are renamed into place, so a failed write
    /// never leaves a partial file at the final path.
    pub async fn store(&self, disk_name: &str, bytes: &[u8]) -> Result<()> {
        let target = self.resolve(disk_name)?;
        let tmp = self.root.join(format!(".tmp-{}", Uuid::new_v4()));

        if let Err(e) = tokio::fs::write(&tmp, bytes).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e).with_context(|| format!("failed to write {}", tmp.display()));
        }

        if let Err(e) = tokio::fs::rename(&tmp, &target).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e).with_context(|| format!("failed to move into {}", target.display()));
        }

        Ok(())
    }

    /// Reads a stored file. `None` means the file does not exist.
    pub async fn read(&self, disk_name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.resolve(disk_name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    /// Removes a stored file. Returns false if it was already gone.
    pub async fn delete(&self, disk_name: &str) -> Result<bool> {
        let path = self.resolve(disk_name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("failed to remove {}", path.display())),
        }
    }
}
