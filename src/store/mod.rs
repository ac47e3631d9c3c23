pub mod json;
pub mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

use crate::model::{Collection, Event, Note, Project, Task, TaskStatus, TimelineItem};

/// Error type for persistence operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("item not found: {0}")]
    NotFound(u64),
    #[error("not a task: {0}")]
    NotATask(u64),
    #[error("project already exists: {0}")]
    DuplicateProject(String),
    #[error("collection already exists: {0}")]
    DuplicateCollection(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt data file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Persistence port. Tasks, events and notes share one ID space; projects
/// and collections each have their own. List operations return newest first.
pub trait ItemStore {
    fn create_task(
        &mut self,
        content: &str,
        status: TaskStatus,
        project_id: Option<u64>,
    ) -> Result<Task, StoreError>;
    fn create_event(
        &mut self,
        content: &str,
        project_id: Option<u64>,
        collection_id: Option<u64>,
    ) -> Result<Event, StoreError>;
    fn create_note(&mut self, content: &str, collection_id: Option<u64>)
    -> Result<Note, StoreError>;
    fn create_project(&mut self, name: &str) -> Result<Project, StoreError>;
    fn create_collection(&mut self, name: &str) -> Result<Collection, StoreError>;

    fn update_task_status(&mut self, id: u64, status: TaskStatus) -> Result<Task, StoreError>;
    fn update_content(&mut self, id: u64, content: &str) -> Result<TimelineItem, StoreError>;

    fn delete_item(&mut self, id: u64) -> Result<(), StoreError>;
    /// Delete every listed item that exists; returns how many were removed.
    fn delete_items(&mut self, ids: &[u64]) -> Result<usize, StoreError>;

    fn items(&self) -> Vec<TimelineItem>;
    fn tasks(&self) -> Vec<Task>;
    fn projects(&self) -> Vec<Project>;
    fn collections(&self) -> Vec<Collection>;

    /// Case-insensitive name lookup
    fn find_project(&self, name: &str) -> Option<Project>;
    fn find_collection(&self, name: &str) -> Option<Collection>;
}
