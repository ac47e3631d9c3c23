use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::model::{Collection, Event, Note, Project, Task, TaskStatus, TimelineItem};
use crate::store::{ItemStore, StoreError};

/// In-memory store. Also the serialized shape of the JSON data file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    items: Vec<TimelineItem>,
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    collections: Vec<Collection>,
    #[serde(default)]
    next_item_id: u64,
    #[serde(default)]
    next_project_id: u64,
    #[serde(default)]
    next_collection_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn next_item_id(&mut self) -> u64 {
        self.next_item_id += 1;
        self.next_item_id
    }

    fn item_mut(&mut self, id: u64) -> Option<&mut TimelineItem> {
        self.items.iter_mut().find(|i| i.id() == id)
    }
}

impl ItemStore for MemoryStore {
    fn create_task(
        &mut self,
        content: &str,
        status: TaskStatus,
        project_id: Option<u64>,
    ) -> Result<Task, StoreError> {
        let task = Task {
            id: self.next_item_id(),
            content: content.to_string(),
            status,
            project_id,
            created_at: Utc::now(),
        };
        self.items.push(TimelineItem::Task(task.clone()));
        Ok(task)
    }

    fn create_event(
        &mut self,
        content: &str,
        project_id: Option<u64>,
        collection_id: Option<u64>,
    ) -> Result<Event, StoreError> {
        let event = Event {
            id: self.next_item_id(),
            content: content.to_string(),
            project_id,
            collection_id,
            created_at: Utc::now(),
        };
        self.items.push(TimelineItem::Event(event.clone()));
        Ok(event)
    }

    fn create_note(
        &mut self,
        content: &str,
        collection_id: Option<u64>,
    ) -> Result<Note, StoreError> {
        let note = Note {
            id: self.next_item_id(),
            content: content.to_string(),
            collection_id,
            created_at: Utc::now(),
        };
        self.items.push(TimelineItem::Note(note.clone()));
        Ok(note)
    }

    fn create_project(&mut self, name: &str) -> Result<Project, StoreError> {
        if self.find_project(name).is_some() {
            return Err(StoreError::DuplicateProject(name.to_string()));
        }
        self.next_project_id += 1;
        let project = Project {
            id: self.next_project_id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.projects.push(project.clone());
        Ok(project)
    }

    fn create_collection(&mut self, name: &str) -> Result<Collection, StoreError> {
        if self.find_collection(name).is_some() {
            return Err(StoreError::DuplicateCollection(name.to_string()));
        }
        self.next_collection_id += 1;
        let collection = Collection {
            id: self.next_collection_id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.collections.push(collection.clone());
        Ok(collection)
    }

    fn update_task_status(&mut self, id: u64, status: TaskStatus) -> Result<Task, StoreError> {
        match self.item_mut(id) {
            Some(TimelineItem::Task(task)) => {
                task.status = status;
                Ok(task.clone())
            }
            Some(_) => Err(StoreError::NotATask(id)),
            None => Err(StoreError::NotFound(id)),
        }
    }

    fn update_content(&mut self, id: u64, content: &str) -> Result<TimelineItem, StoreError> {
        let item = self.item_mut(id).ok_or(StoreError::NotFound(id))?;
        match item {
            TimelineItem::Task(t) => t.content = content.to_string(),
            TimelineItem::Event(e) => e.content = content.to_string(),
            TimelineItem::Note(n) => n.content = content.to_string(),
        }
        Ok(item.clone())
    }

    fn delete_item(&mut self, id: u64) -> Result<(), StoreError> {
        let before = self.items.len();
        self.items.retain(|i| i.id() != id);
        if self.items.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn delete_items(&mut self, ids: &[u64]) -> Result<usize, StoreError> {
        let before = self.items.len();
        self.items.retain(|i| !ids.contains(&i.id()));
        Ok(before - self.items.len())
    }

    fn items(&self) -> Vec<TimelineItem> {
        // IDs are monotonic, so reverse insertion order is newest first
        self.items.iter().rev().cloned().collect()
    }

    fn tasks(&self) -> Vec<Task> {
        self.items
            .iter()
            .rev()
            .filter_map(|i| match i {
                TimelineItem::Task(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    fn projects(&self) -> Vec<Project> {
        self.projects.iter().rev().cloned().collect()
    }

    fn collections(&self) -> Vec<Collection> {
        self.collections.iter().rev().cloned().collect()
    }

    fn find_project(&self, name: &str) -> Option<Project> {
        self.projects
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    fn find_collection(&self, name: &str) -> Option<Collection> {
        self.collections
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_list_newest_first() {
        let mut store = MemoryStore::new();
        let a = store.create_task("first", TaskStatus::Todo, None).unwrap();
        let b = store.create_task("second", TaskStatus::Todo, None).unwrap();
        assert_ne!(a.id, b.id);

        let items = store.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].content(), "second");
        assert_eq!(items[1].content(), "first");
    }

    #[test]
    fn shared_id_space_across_item_kinds() {
        let mut store = MemoryStore::new();
        let t = store.create_task("t", TaskStatus::Todo, None).unwrap();
        let e = store.create_event("e", None, None).unwrap();
        let n = store.create_note("n", None).unwrap();
        assert_eq!((t.id, e.id, n.id), (1, 2, 3));
    }

    #[test]
    fn update_status_rejects_non_tasks() {
        let mut store = MemoryStore::new();
        let e = store.create_event("standup", None, None).unwrap();
        let err = store.update_task_status(e.id, TaskStatus::Done).unwrap_err();
        assert!(matches!(err, StoreError::NotATask(_)));
        assert!(matches!(
            store.update_task_status(99, TaskStatus::Done).unwrap_err(),
            StoreError::NotFound(99)
        ));
    }

    #[test]
    fn delete_many_skips_missing_ids() {
        let mut store = MemoryStore::new();
        let a = store.create_task("a", TaskStatus::Todo, None).unwrap();
        let b = store.create_note("b", None).unwrap();
        let removed = store.delete_items(&[a.id, b.id, 999]).unwrap();
        assert_eq!(removed, 2);
        assert!(store.items().is_empty());
    }

    #[test]
    fn duplicate_project_name_rejected() {
        let mut store = MemoryStore::new();
        store.create_project("home").unwrap();
        let err = store.create_project("Home").unwrap_err();
        assert!(matches!(err, StoreError::DuplicateProject(_)));
    }

    #[test]
    fn find_project_is_case_insensitive() {
        let mut store = MemoryStore::new();
        let p = store.create_project("Home").unwrap();
        assert_eq!(store.find_project("home").unwrap().id, p.id);
        assert!(store.find_project("work").is_none());
    }
}
