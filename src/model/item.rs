use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kinds of timeline items a submitted line can become
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Task,
    Event,
    Note,
}

impl ItemType {
    pub const ALL: [ItemType; 3] = [ItemType::Task, ItemType::Event, ItemType::Note];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Task => "task",
            ItemType::Event => "event",
            ItemType::Note => "note",
        }
    }

    /// Parse an item type token, case-insensitively
    pub fn parse(s: &str) -> Option<ItemType> {
        match s.to_ascii_lowercase().as_str() {
            "task" => Some(ItemType::Task),
            "event" => Some(ItemType::Event),
            "note" => Some(ItemType::Note),
            _ => None,
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task workflow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }

    pub fn parse(s: &str) -> Option<TaskStatus> {
        match s.to_ascii_lowercase().as_str() {
            "todo" => Some(TaskStatus::Todo),
            "in-progress" => Some(TaskStatus::InProgress),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }

    /// Forward transition: todo → in-progress → done → todo
    pub fn next(self) -> TaskStatus {
        match self {
            TaskStatus::Todo => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Done,
            TaskStatus::Done => TaskStatus::Todo,
        }
    }

    /// Backward transition: done → in-progress → todo; todo stays put
    pub fn prev(self) -> TaskStatus {
        match self {
            TaskStatus::Todo => TaskStatus::Todo,
            TaskStatus::InProgress => TaskStatus::Todo,
            TaskStatus::Done => TaskStatus::InProgress,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub content: String,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<u64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<u64>,
    pub created_at: DateTime<Utc>,
}

/// Any item that appears on the timeline. Tasks, events and notes share
/// one ID space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TimelineItem {
    Task(Task),
    Event(Event),
    Note(Note),
}

impl TimelineItem {
    pub fn id(&self) -> u64 {
        match self {
            TimelineItem::Task(t) => t.id,
            TimelineItem::Event(e) => e.id,
            TimelineItem::Note(n) => n.id,
        }
    }

    pub fn item_type(&self) -> ItemType {
        match self {
            TimelineItem::Task(_) => ItemType::Task,
            TimelineItem::Event(_) => ItemType::Event,
            TimelineItem::Note(_) => ItemType::Note,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            TimelineItem::Task(t) => &t.content,
            TimelineItem::Event(e) => &e.content,
            TimelineItem::Note(n) => &n.content,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            TimelineItem::Task(t) => t.created_at,
            TimelineItem::Event(e) => e.created_at,
            TimelineItem::Note(n) => n.created_at,
        }
    }
}
