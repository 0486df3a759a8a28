use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};
use crate::memory::{CommitHook, MemoryDatabase, MemorySession};
use crate::tables::{Tables, TablesDocument};
use crate::traits::{Database, Session};

/// Database persisted as a single JSON document.
///
/// Tables are loaded once at open. Every commit that wrote something
/// rewrites the whole document through a temp file and an atomic rename, so
/// the file always holds the last committed state.
pub struct FileDatabase {
    inner: MemoryDatabase,
    writer: DocumentWriter,
}

struct DocumentWriter {
    path: PathBuf,
}

impl FileDatabase {
    /// Open the database at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let tables = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            let doc: TablesDocument = serde_json::from_str(&raw)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            Tables::from_document(doc)?
        } else {
            Tables::new()
        };
        tracing::info!(path = %path.display(), "opened blog database");
        Ok(Self {
            inner: MemoryDatabase::from_tables(tables),
            writer: DocumentWriter { path },
        })
    }
}

impl Database for FileDatabase {
    fn session(&self) -> StoreResult<Box<dyn Session + '_>> {
        Ok(Box::new(MemorySession::new(self.inner.lock()?, Some(&self.writer))))
    }
}

impl CommitHook for DocumentWriter {
    fn on_commit(&self, tables: &Tables) -> StoreResult<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        let bytes = serde_json::to_vec_pretty(&tables.to_document())
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "database written");
        Ok(())
    }
}

impl std::fmt::Debug for FileDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDatabase")
            .field("path", &self.writer.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_types::{NewPost, NewUser, PostId, Role};

    fn alice() -> NewUser {
        NewUser {
            username: "alice".into(),
            password_hash: "hash".into(),
            role: Role::Author,
        }
    }

    #[test]
    fn missing_file_opens_empty_and_is_not_created_by_reads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blog.json");
        let db = FileDatabase::open(&path).unwrap();
        {
            let s = db.session().unwrap();
            assert!(s.list_posts(0, 10).unwrap().is_empty());
            s.commit().unwrap();
        }
        assert!(!path.exists());
    }

    #[test]
    fn reopen_sees_committed_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("blog.json");
        {
            let db = FileDatabase::open(&path).unwrap();
            let mut s = db.session().unwrap();
            let user = s.insert_user(alice()).unwrap();
            s.insert_post(NewPost {
                title: "Hello".into(),
                content: "World".into(),
                owner_id: user.id,
            })
            .unwrap();
            s.commit().unwrap();
        }

        let db = FileDatabase::open(&path).unwrap();
        let s = db.session().unwrap();
        let post = s.get_post(PostId(1)).unwrap().expect("post persisted");
        assert_eq!(post.title, "Hello");
        assert!(s.find_user_by_username("alice").unwrap().is_some());
    }

    #[test]
    fn uncommitted_session_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blog.json");
        let db = FileDatabase::open(&path).unwrap();
        {
            let mut s = db.session().unwrap();
            s.insert_user(alice()).unwrap();
        }
        assert!(!path.exists());
        let s = db.session().unwrap();
        assert!(s.find_user_by_username("alice").unwrap().is_none());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blog.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(FileDatabase::open(&path), Err(StoreError::Serialization(_))));
    }
}
