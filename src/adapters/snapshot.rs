use crate::adapters::memory::Snapshot;
use crate::utils::error::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// 把 `Snapshot` 存成本機 JSON 檔
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty marketplace.
    pub async fn load(&self) -> Result<Snapshot> {
        if !tokio::fs::try_exists(&self.path).await? {
            tracing::debug!("No data file at {}, starting empty", self.path.display());
            return Ok(Snapshot::default());
        }

        let data = tokio::fs::read(&self.path).await?;
        let snapshot: Snapshot = serde_json::from_slice(&data)?;
        tracing::debug!(
            "Loaded {} users, {} listings, {} reservations from {}",
            snapshot.users.len(),
            snapshot.listings.len(),
            snapshot.reservations.len(),
            self.path.display()
        );
        Ok(snapshot)
    }

    /// Writes to a temporary file next to the target, then renames it over
    /// the target so readers never see a partial file.
    pub async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        tokio::fs::create_dir_all(&dir).await?;

        let json = serde_json::to_vec_pretty(snapshot)?;
        tracing::debug!("Writing data file ({} bytes) to {}", json.len(), self.path.display());

        let target = self.path.clone();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut temp = NamedTempFile::new_in(&dir)?;
            temp.write_all(&json)?;
            temp.as_file().sync_all()?;
            temp.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(std::io::Error::other)??;
        Ok(())
    }
}
