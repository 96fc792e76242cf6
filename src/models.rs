use std::borrow::Cow;
use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

pub const UNTITLED: &str = "(no name)";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[serde(alias = "Low", alias = "Низкий")]
    Low,
    #[serde(alias = "Medium", alias = "Средний")]
    Medium,
    #[serde(alias = "High", alias = "Высокий")]
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Menu number (1-based) to priority.
    pub fn from_choice(choice: u32) -> Option<Self> {
        Self::ALL.get((choice as usize).checked_sub(1)?).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[serde(alias = "New", alias = "Новая")]
    New,
    #[serde(alias = "In progress", alias = "В процессе")]
    InProgress,
    #[serde(alias = "Done", alias = "Завершена")]
    Done,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::New, Status::InProgress, Status::Done];

    /// Menu number (1-based) to status.
    pub fn from_choice(choice: u32) -> Option<Self> {
        Self::ALL.get((choice as usize).checked_sub(1)?).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::New => "New",
            Status::InProgress => "In progress",
            Status::Done => "Done",
        }
    }
}

/// A priority or status as stored: a known level, or whatever other value the
/// file held, written back untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Level<T> {
    Known(T),
    Unrecognized(serde_json::Value),
}

impl<T: Copy> Level<T> {
    pub fn known(&self) -> Option<T> {
        match self {
            Level::Known(level) => Some(*level),
            Level::Unrecognized(_) => None,
        }
    }
}

impl Level<Priority> {
    pub fn label(&self) -> Cow<'_, str> {
        match self {
            Level::Known(priority) => Cow::Borrowed(priority.label()),
            Level::Unrecognized(raw) => raw_label(raw),
        }
    }
}

impl Level<Status> {
    pub fn label(&self) -> Cow<'_, str> {
        match self {
            Level::Known(status) => Cow::Borrowed(status.label()),
            Level::Unrecognized(raw) => raw_label(raw),
        }
    }
}

fn raw_label(raw: &serde_json::Value) -> Cow<'_, str> {
    match raw {
        serde_json::Value::String(text) => Cow::Borrowed(text.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Task {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default, alias = "desc")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Level<Priority>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Level<Status>>,
    #[serde(default)]
    pub important: bool,
}

impl Task {
    /// Builds a task from user input; a blank title becomes the placeholder.
    pub fn new(
        title: &str,
        description: &str,
        priority: Priority,
        status: Status,
        important: bool,
    ) -> Self {
        let title = if title.is_empty() { UNTITLED } else { title };
        Self {
            title: title.to_string(),
            description: description.to_string(),
            priority: Some(Level::Known(priority)),
            status: Some(Level::Known(status)),
            important,
        }
    }

    /// `None` when unset or not one of the known levels.
    pub fn priority(&self) -> Option<Priority> {
        self.priority.as_ref().and_then(Level::known)
    }

    pub fn status(&self) -> Option<Status> {
        self.status.as_ref().and_then(Level::known)
    }

    pub fn priority_label(&self) -> Cow<'_, str> {
        self.priority
            .as_ref()
            .map_or(Cow::Borrowed(""), Level::<Priority>::label)
    }

    pub fn status_label(&self) -> Cow<'_, str> {
        self.status
            .as_ref()
            .map_or(Cow::Borrowed(""), Level::<Status>::label)
    }

    pub fn matches(&self, query: &str) -> bool {
        self.title.contains(query) || self.description.contains(query)
    }
}

fn default_title() -> String {
    UNTITLED.to_string()
}

/// Identifier → task, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskCollection {
    entries: Vec<(String, Task)>,
}

impl TaskCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.position(id).map(|index| &self.entries[index].1)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        let index = self.position(id)?;
        Some(&mut self.entries[index].1)
    }

    /// Replaces in place when the id exists, appends otherwise.
    pub fn insert(&mut self, id: String, task: Task) {
        match self.position(&id) {
            Some(index) => self.entries[index].1 = task,
            None => self.entries.push((id, task)),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Task> {
        let index = self.position(id)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Task)> {
        self.entries.iter().map(|(id, task)| (id.as_str(), task))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key == id)
    }
}

impl Serialize for TaskCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, task) in &self.entries {
            map.serialize_entry(id, task)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TaskCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CollectionVisitor)
    }
}

struct CollectionVisitor;

impl<'de> Visitor<'de> for CollectionVisitor {
    type Value = TaskCollection;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of task id to task")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut tasks = TaskCollection::new();
        while let Some((id, task)) = access.next_entry::<String, Task>()? {
            tasks.insert(id, task);
        }
        Ok(tasks)
    }
}
