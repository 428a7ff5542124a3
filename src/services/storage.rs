use anyhow::{Result, anyhow};
use async_trait::async_trait;
use bytes::Bytes;
use rand::Rng;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Outcome of a blob deletion. A blob that is already gone is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobDeletion {
    Removed,
    AlreadyAbsent,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `data` under a freshly generated name and returns its path.
    async fn put(&self, field_name: &str, original_name: &str, data: Bytes) -> Result<String>;
    async fn exists(&self, path: &str) -> Result<bool>;
    async fn read(&self, path: &str) -> Result<Vec<u8>>;
    async fn delete(&self, path: &str) -> Result<BlobDeletion>;
}

/// Attachment files on the local filesystem, all directly under `root`.
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a stored path back under `root`. Only the file name is kept, so a
    /// tampered path cannot escape the upload directory.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let name = Path::new(path)
            .file_name()
            .ok_or_else(|| anyhow!("Invalid blob path: {}", path))?;
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, field_name: &str, original_name: &str, data: Bytes) -> Result<String> {
        fs::create_dir_all(&self.root).await?;

        let full_path = self.root.join(blob_name(field_name, original_name));
        tracing::debug!(
            path = %full_path.display(),
            size = data.len(),
            "blob_store: write"
        );
        fs::write(&full_path, &data).await?;

        Ok(full_path.to_string_lossy().into_owned())
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        Ok(fs::try_exists(self.resolve(path)?).await?)
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        Ok(fs::read(self.resolve(path)?).await?)
    }

    async fn delete(&self, path: &str) -> Result<BlobDeletion> {
        let full_path = self.resolve(path)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(BlobDeletion::Removed),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BlobDeletion::AlreadyAbsent),
            Err(e) => Err(e.into()),
        }
    }
}

/// `<field>-<epoch millis>-<random below 1e9><.ext>`. Unique within a process
/// with overwhelming probability, not cryptographically.
pub fn blob_name(field_name: &str, original_name: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    let extension = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();

    format!(
        "{}-{}-{}{}",
        field_name,
        chrono::Utc::now().timestamp_millis(),
        suffix,
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_blob_name_format() {
        let name = blob_name("attachment", "receipt.final.pdf");
        let parts: Vec<&str> = name.splitn(3, '-').collect();
        assert_eq!(parts[0], "attachment");
        assert!(parts[1].parse::<i64>().is_ok());
        let (random, ext) = parts[2].split_once('.').unwrap();
        assert!(random.parse::<u32>().unwrap() < 1_000_000_000);
        assert_eq!(ext, "pdf");
    }

    #[test]
    fn test_blob_name_without_extension() {
        let name = blob_name("attachment", "README");
        assert!(!name.contains('.'));
    }

    #[test]
    fn test_blob_names_are_unique() {
        let names: HashSet<String> = (0..500).map(|_| blob_name("attachment", "a.png")).collect();
        assert_eq!(names.len(), 500);
    }

    #[tokio::test]
    async fn test_local_store_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().join("uploads"));

        let path = store
            .put("attachment", "note.txt", Bytes::from_static(b"hello"))
            .await
            .unwrap();
        assert!(path.ends_with(".txt"));
        assert!(store.exists(&path).await.unwrap());
        assert_eq!(store.read(&path).await.unwrap(), b"hello");

        assert_eq!(store.delete(&path).await.unwrap(), BlobDeletion::Removed);
        assert!(!store.exists(&path).await.unwrap());
        assert_eq!(
            store.delete(&path).await.unwrap(),
            BlobDeletion::AlreadyAbsent
        );
    }

    #[tokio::test]
    async fn test_resolve_stays_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());
        let resolved = store.resolve("../../etc/passwd").unwrap();
        assert_eq!(resolved, dir.path().join("passwd"));
        assert!(store.resolve("..").is_err());
    }
}
