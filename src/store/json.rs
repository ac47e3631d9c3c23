use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::{Collection, Event, Note, Project, Task, TaskStatus, TimelineItem};
use crate::store::{ItemStore, MemoryStore, StoreError};

/// File-backed store: a [`MemoryStore`] persisted to a JSON file after
/// every mutation, written atomically (temp file + rename).
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonStore {
    /// Open the data file at `path`, creating an empty store if it does
    /// not exist yet.
    pub fn open(path: &Path) -> Result<JsonStore, StoreError> {
        let inner = match fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => MemoryStore::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(JsonStore {
            path: path.to_path_buf(),
            inner,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(&self.inner)?;
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn mutate<T>(
        &mut self,
        op: impl FnOnce(&mut MemoryStore) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let result = op(&mut self.inner)?;
        self.persist()?;
        Ok(result)
    }
}

impl ItemStore for JsonStore {
    fn create_task(
        &mut self,
        content: &str,
        status: TaskStatus,
        project_id: Option<u64>,
    ) -> Result<Task, StoreError> {
        self.mutate(|s| s.create_task(content, status, project_id))
    }

    fn create_event(
        &mut self,
        content: &str,
        project_id: Option<u64>,
        collection_id: Option<u64>,
    ) -> Result<Event, StoreError> {
        self.mutate(|s| s.create_event(content, project_id, collection_id))
    }

    fn create_note(
        &mut self,
        content: &str,
        collection_id: Option<u64>,
    ) -> Result<Note, StoreError> {
        self.mutate(|s| s.create_note(content, collection_id))
    }

    fn create_project(&mut self, name: &str) -> Result<Project, StoreError> {
        self.mutate(|s| s.create_project(name))
    }

    fn create_collection(&mut self, name: &str) -> Result<Collection, StoreError> {
        self.mutate(|s| s.create_collection(name))
    }

    fn update_task_status(&mut self, id: u64, status: TaskStatus) -> Result<Task, StoreError> {
        self.mutate(|s| s.update_task_status(id, status))
    }

    fn update_content(&mut self, id: u64, content: &str) -> Result<TimelineItem, StoreError> {
        self.mutate(|s| s.update_content(id, content))
    }

    fn delete_item(&mut self, id: u64) -> Result<(), StoreError> {
        self.mutate(|s| s.delete_item(id))
    }

    fn delete_items(&mut self, ids: &[u64]) -> Result<usize, StoreError> {
        self.mutate(|s| s.delete_items(ids))
    }

    fn items(&self) -> Vec<TimelineItem> {
        self.inner.items()
    }

    fn tasks(&self) -> Vec<Task> {
        self.inner.tasks()
    }

    fn projects(&self) -> Vec<Project> {
        self.inner.projects()
    }

    fn collections(&self) -> Vec<Collection> {
        self.inner.collections()
    }

    fn find_project(&self, name: &str) -> Option<Project> {
        self.inner.find_project(name)
    }

    fn find_collection(&self, name: &str) -> Option<Collection> {
        self.inner.find_collection(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jot.json");

        {
            let mut store = JsonStore::open(&path).unwrap();
            store.create_task("persisted", TaskStatus::Todo, None).unwrap();
            store.create_project("home").unwrap();
        }

        let store = JsonStore::open(&path).unwrap();
        let items = store.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].content(), "persisted");
        assert!(store.find_project("home").is_some());
    }

    #[test]
    fn ids_continue_after_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jot.json");

        let first = {
            let mut store = JsonStore::open(&path).unwrap();
            store.create_task("a", TaskStatus::Todo, None).unwrap().id
        };
        let second = {
            let mut store = JsonStore::open(&path).unwrap();
            store.create_task("b", TaskStatus::Todo, None).unwrap().id
        };
        assert!(second > first);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jot.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            JsonStore::open(&path).unwrap_err(),
            StoreError::Corrupt(_)
        ));
    }
}
