//! Uploaded documents (prescriptions, test results, ...).
//!
//! Selected files are read once into a session-scoped blob store keyed by
//! their BLAKE3 content hash. The hash doubles as the document's local
//! reference, so identical files share one blob.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Record, RecordList};
use crate::error::{Error, Result};

/// Metadata for one uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Session-assigned identifier.
    pub id: u64,
    /// File name as selected, without directories.
    pub filename: String,
    /// Mime type guessed from the file name.
    pub mime_type: String,
    /// Size of the content in bytes.
    pub size_bytes: u64,
    /// `blake3:<hex>` reference into the session blob store.
    pub local_reference: String,
}

impl Document {
    /// Size formatted the way the documents view shows it, e.g. `12.5 KB`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn display_size(&self) -> String {
        format!("{:.1} KB", self.size_bytes as f64 / 1024.0)
    }
}

impl Record for Document {
    const KIND: &'static str = "document";

    fn id(&self) -> u64 {
        self.id
    }
}

/// Documents plus the bytes they reference.
pub struct DocumentStore {
    documents: RecordList<Document>,
    blobs: HashMap<String, Vec<u8>>,
    max_size_bytes: u64,
}

impl DocumentStore {
    /// An empty store accepting files up to `max_size_bytes` each.
    #[must_use]
    pub fn new(max_size_bytes: u64) -> Self {
        Self {
            documents: RecordList::new(),
            blobs: HashMap::new(),
            max_size_bytes,
        }
    }

    /// The uploaded documents, oldest first.
    #[must_use]
    pub fn documents(&self) -> &RecordList<Document> {
        &self.documents
    }

    /// The bytes behind a document's local reference.
    #[must_use]
    pub fn blob(&self, local_reference: &str) -> Option<&[u8]> {
        self.blobs.get(local_reference).map(Vec::as_slice)
    }

    /// Number of distinct blobs held.
    #[must_use]
    pub fn blob_count(&self) -> usize {
        self.blobs.len()
    }

    /// Add one document from in-memory content.
    ///
    /// # Errors
    ///
    /// Returns an error if the file name is blank or the content is over the
    /// size limit.
    pub fn import_bytes(&mut self, filename: &str, content: Vec<u8>) -> Result<&Document> {
        let selected = self.check(Path::new(filename), content)?;
        Ok(self.append(selected))
    }

    /// Add every file in one selection.
    ///
    /// All files are read and checked before any is added, so a failing file
    /// leaves the store unchanged. Returns the newly added documents.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be read or is over the size limit.
    pub fn import_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<&[Document]> {
        let selected = paths
            .iter()
            .map(|path| self.read(path.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let start = self.documents.len();
        for file in selected {
            self.append(file);
        }
        info!(count = self.documents.len() - start, "documents imported");
        Ok(&self.documents.as_slice()[start..])
    }

    fn read(&self, path: &Path) -> Result<SelectedFile> {
        let metadata = std::fs::metadata(path).map_err(|source| Error::DocumentRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.check_size(path, metadata.len())?;

        let content = std::fs::read(path).map_err(|source| Error::DocumentRead {
            path: path.to_path_buf(),
            source,
        })?;
        // The file may have grown since the metadata was read.
        self.check(path, content)
    }

    fn check(&self, path: &Path, content: Vec<u8>) -> Result<SelectedFile> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().trim().to_string())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::invalid_input("file", "a file name is required"))?;
        self.check_size(path, content.len() as u64)?;
        Ok(SelectedFile { filename, content })
    }

    fn check_size(&self, path: &Path, size: u64) -> Result<()> {
        if size > self.max_size_bytes {
            return Err(Error::DocumentTooLarge {
                path: PathBuf::from(path),
                size,
                limit: self.max_size_bytes,
            });
        }
        Ok(())
    }

    fn append(&mut self, file: SelectedFile) -> &Document {
        let local_reference = format!("blake3:{}", blake3::hash(&file.content).to_hex());
        let mime_type = mime_guess::from_path(&file.filename)
            .first_or_octet_stream()
            .to_string();
        let size_bytes = file.content.len() as u64;

        if self.blobs.contains_key(&local_reference) {
            debug!(reference = %local_reference, "reusing stored blob");
        } else {
            self.blobs.insert(local_reference.clone(), file.content);
        }

        self.documents.push_with(|id| Document {
            id,
            filename: file.filename,
            mime_type,
            size_bytes,
            local_reference,
        })
    }
}

impl fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentStore")
            .field("documents", &self.documents.len())
            .field("blobs", &self.blobs.len())
            .field("max_size_bytes", &self.max_size_bytes)
            .finish()
    }
}

/// A file that passed the selection checks.
struct SelectedFile {
    filename: String,
    content: Vec<u8>,
}
