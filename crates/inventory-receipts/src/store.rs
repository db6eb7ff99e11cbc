//! # Receipt Store
//!
//! Filesystem-backed blob store. One file per receipt, directly under the
//! store root.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  save("scan.png", chunks)                                              │
//! │       │                                                                 │
//! │       ├── bad name?            ──► InvalidFilename   (nothing touched)  │
//! │       ├── total > max_bytes?   ──► PayloadTooLarge   (nothing touched)  │
//! │       ├── body stream error?   ──► Upload            (nothing touched)  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  File::create(<root>/scan.png)   truncates an existing receipt         │
//! │  write_all + flush               no staging file, no rename            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Concurrent saves of the same name are not serialized; the last writer's
//! bytes may interleave with an earlier one's.

use bytes::{Bytes, BytesMut};
use futures_util::{pin_mut, Stream, StreamExt};
use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tracing::{debug, info, warn};

use inventory_core::sniff::detect_content_type;
use inventory_core::validation::validate_receipt_filename;
use inventory_core::SNIFF_LEN;

use crate::error::{BoxError, ReceiptError, ReceiptResult};

// =============================================================================
// Download Handle
// =============================================================================

/// An opened receipt, positioned at its first byte.
#[derive(Debug)]
pub struct ReceiptDownload {
    /// Name the receipt is stored under.
    pub filename: String,

    /// Type sniffed from the leading bytes.
    pub content_type: &'static str,

    /// Size in bytes.
    pub size: u64,

    /// Open file handle, rewound to the start.
    pub file: File,
}

// =============================================================================
// Store
// =============================================================================

/// Receipt store rooted at one directory.
///
/// Cheap to clone; holds only the root path and the size cap.
#[derive(Debug, Clone)]
pub struct ReceiptStore {
    root: PathBuf,
    max_bytes: usize,
}

impl ReceiptStore {
    /// Opens the store, creating `root` if it doesn't exist.
    pub async fn new(root: impl Into<PathBuf>, max_bytes: usize) -> ReceiptResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;

        info!(root = %root.display(), max_bytes, "Receipt store ready");
        Ok(ReceiptStore { root, max_bytes })
    }

    /// Directory receipts are written to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Largest accepted upload, in bytes.
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Stores `body` under `filename`, replacing any receipt with that name.
    ///
    /// The whole body is read before the file is opened, so an oversized or
    /// broken upload never leaves anything on disk.
    ///
    /// ## Returns
    /// Number of bytes written.
    pub async fn save<S, E>(&self, filename: &str, body: S) -> ReceiptResult<u64>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Into<BoxError>,
    {
        validate_receipt_filename(filename)?;

        pin_mut!(body);
        let mut buf = BytesMut::new();

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| ReceiptError::Upload(e.into()))?;

            if buf.len() + chunk.len() > self.max_bytes {
                warn!(
                    filename = %filename,
                    limit = self.max_bytes,
                    "Rejected oversized receipt"
                );
                return Err(ReceiptError::PayloadTooLarge {
                    limit: self.max_bytes,
                });
            }

            buf.extend_from_slice(&chunk);
        }

        let path = self.root.join(filename);
        let mut file = File::create(&path).await?;
        file.write_all(&buf).await?;
        file.flush().await?;

        info!(filename = %filename, size = buf.len(), "Receipt stored");
        Ok(buf.len() as u64)
    }

    /// Lists stored receipt names, sorted. Subdirectories and names that
    /// aren't valid UTF-8 are skipped.
    pub async fn list(&self) -> ReceiptResult<Vec<String>> {
        let mut entries = fs::read_dir(&self.root).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        names.sort();
        debug!(count = names.len(), "Listed receipts");
        Ok(names)
    }

    /// Opens a receipt for download.
    ///
    /// ## Returns
    /// * `Ok(ReceiptDownload)` - handle at offset 0 with sniffed type and size
    /// * `Err(ReceiptError::NotFound)` - nothing stored under `filename`
    pub async fn open(&self, filename: &str) -> ReceiptResult<ReceiptDownload> {
        validate_receipt_filename(filename)?;

        let path = self.root.join(filename);
        let mut file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ReceiptError::NotFound(filename.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(ReceiptError::NotFound(filename.to_string()));
        }

        let mut head = Vec::with_capacity(SNIFF_LEN);
        (&mut file).take(SNIFF_LEN as u64).read_to_end(&mut head).await?;
        let content_type = detect_content_type(&head);
        file.seek(SeekFrom::Start(0)).await?;

        debug!(
            filename = %filename,
            content_type,
            size = metadata.len(),
            "Opened receipt"
        );

        Ok(ReceiptDownload {
            filename: filename.to_string(),
            content_type,
            size: metadata.len(),
            file,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use std::io;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";

    fn chunks(parts: &[&'static [u8]]) -> impl Stream<Item = Result<Bytes, io::Error>> {
        let parts: Vec<_> = parts.iter().map(|p| Ok(Bytes::from_static(p))).collect();
        stream::iter(parts)
    }

    async fn read_all(download: ReceiptDownload) -> Vec<u8> {
        let mut file = download.file;
        let mut out = Vec::new();
        file.read_to_end(&mut out).await.unwrap();
        out
    }

    #[tokio::test]
    async fn test_save_then_open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReceiptStore::new(dir.path(), 1024).await.unwrap();

        let written = store.save("scan.png", chunks(&[&PNG[..4], &PNG[4..]])).await.unwrap();
        assert_eq!(written, PNG.len() as u64);

        let download = store.open("scan.png").await.unwrap();
        assert_eq!(download.content_type, "image/png");
        assert_eq!(download.content_type, detect_content_type(PNG));
        assert_eq!(download.size, PNG.len() as u64);
        assert_eq!(read_all(download).await, PNG);
    }

    #[tokio::test]
    async fn test_save_overwrites_and_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReceiptStore::new(dir.path(), 1024).await.unwrap();

        store.save("r.txt", chunks(&[b"a much longer first receipt"])).await.unwrap();
        store.save("r.txt", chunks(&[b"short"])).await.unwrap();

        let download = store.open("r.txt").await.unwrap();
        assert_eq!(download.size, 5);
        assert_eq!(read_all(download).await, b"short");
    }

    #[tokio::test]
    async fn test_oversized_upload_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReceiptStore::new(dir.path(), 8).await.unwrap();

        let err = store
            .save("big.bin", chunks(&[b"12345", b"6789"]))
            .await
            .unwrap_err();

        assert!(matches!(err, ReceiptError::PayloadTooLarge { limit: 8 }));
        assert!(!dir.path().join("big.bin").exists());
    }

    #[tokio::test]
    async fn test_upload_exactly_at_limit_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReceiptStore::new(dir.path(), 8).await.unwrap();

        assert_eq!(store.save("ok.bin", chunks(&[b"12345678"])).await.unwrap(), 8);
    }

    #[tokio::test]
    async fn test_broken_body_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReceiptStore::new(dir.path(), 1024).await.unwrap();

        let body = stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(io::Error::new(ErrorKind::ConnectionReset, "client went away")),
        ]);
        let err = store.save("cut.txt", body).await.unwrap_err();

        let source = match err {
            ReceiptError::Upload(source) => source.downcast::<io::Error>().unwrap(),
            other => panic!("expected an upload error, got {other:?}"),
        };
        assert_eq!(source.kind(), ErrorKind::ConnectionReset);
        assert!(!dir.path().join("cut.txt").exists());
    }

    #[tokio::test]
    async fn test_invalid_names_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReceiptStore::new(dir.path(), 1024).await.unwrap();

        let err = store.save("../escape.txt", chunks(&[b"x"])).await.unwrap_err();
        assert!(matches!(err, ReceiptError::InvalidFilename(_)));

        let err = store.open("..").await.unwrap_err();
        assert!(matches!(err, ReceiptError::InvalidFilename(_)));
    }

    #[tokio::test]
    async fn test_open_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReceiptStore::new(dir.path(), 1024).await.unwrap();

        let err = store.open("nope.pdf").await.unwrap_err();
        assert!(matches!(err, ReceiptError::NotFound(name) if name == "nope.pdf"));
    }

    #[tokio::test]
    async fn test_list_sorted_files_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReceiptStore::new(dir.path(), 1024).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());

        store.save("b.txt", chunks(&[b"b"])).await.unwrap();
        store.save("a.txt", chunks(&[b"a"])).await.unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        assert_eq!(store.list().await.unwrap(), vec!["a.txt", "b.txt"]);

        let err = store.open("nested").await.unwrap_err();
        assert!(matches!(err, ReceiptError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_new_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("uploads").join("receipts");

        let store = ReceiptStore::new(&root, 1024).await.unwrap();
        assert!(store.root().is_dir());
        assert_eq!(store.max_bytes(), 1024);
    }
}
