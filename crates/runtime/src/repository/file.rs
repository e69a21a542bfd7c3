//! File-based [`AttributeStore`] implementation.
//!
//! Each owner and category is one pretty-printed JSON document mapping record
//! names to records:
//! ```text
//! {root}/
//!   owner_42/
//!     attributes.json
//!     resources.json
//! ```
//!
//! Writes rewrite the whole document through a temp file and an atomic rename.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use sheet_core::{AttributeStore, OwnerId, Record, StoreError};

use super::RepositoryError;
use super::error::Result;

type Document = BTreeMap<String, Record>;

pub struct FileAttributeStore {
    root: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileAttributeStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, owner: OwnerId, category: &str) -> PathBuf {
        self.root
            .join(format!("owner_{}", owner.0))
            .join(format!("{category}.json"))
    }

    fn read_document(&self, owner: OwnerId, category: &str) -> Result<Document> {
        let path = self.document_path(owner, category);
        if !path.exists() {
            return Ok(Document::new());
        }

        let json = fs::read_to_string(&path)?;
        serde_json::from_str(&json).map_err(|e| {
            RepositoryError::CorruptedData(format!("{}: {}", path.display(), e))
        })
    }

    fn write_document(&self, owner: OwnerId, category: &str, document: &Document) -> Result<()> {
        let path = self.document_path(owner, category);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let json = serde_json::to_string_pretty(document)
            .map_err(|e| RepositoryError::Json(format!("Failed to serialize records: {}", e)))?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(
            owner = %owner,
            category,
            records = document.len(),
            "wrote {}",
            path.display()
        );
        Ok(())
    }

    fn update<R>(
        &self,
        owner: OwnerId,
        category: &str,
        f: impl FnOnce(&mut Document) -> std::result::Result<R, StoreError>,
    ) -> std::result::Result<R, StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut document = self.read_document(owner, category)?;
        let output = f(&mut document)?;
        self.write_document(owner, category, &document)?;
        Ok(output)
    }
}

impl AttributeStore for FileAttributeStore {
    fn lookup(
        &self,
        owner: OwnerId,
        category: &str,
        name: &str,
    ) -> std::result::Result<Option<Record>, StoreError> {
        Ok(self.read_document(owner, category)?.remove(name))
    }

    fn fetch_all(&self, owner: OwnerId, category: &str) -> std::result::Result<Vec<Record>, StoreError> {
        Ok(self.read_document(owner, category)?.into_values().collect())
    }

    fn upsert(
        &self,
        owner: OwnerId,
        category: &str,
        name: &str,
        record: &Record,
    ) -> std::result::Result<(), StoreError> {
        self.update(owner, category, |document| {
            document.insert(name.to_owned(), record.clone());
            Ok(())
        })
    }

    fn delete(&self, owner: OwnerId, category: &str, name: &str) -> std::result::Result<(), StoreError> {
        self.update(owner, category, |document| {
            document
                .remove(name)
                .map(|_| ())
                .ok_or_else(|| StoreError::NotFound {
                    owner: owner.to_string(),
                    category: category.to_owned(),
                    name: name.to_owned(),
                })
        })
    }
}
