use crate::ids::next_id;
use crate::models::{Level, Priority, Status, Task, TaskCollection};

/// Orderings offered by the sorted listings. Tasks with no level sort last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Status,
    Priority,
}

impl SortKey {
    fn rank(self, task: &Task) -> usize {
        let rank = match self {
            SortKey::Status => task
                .status()
                .and_then(|status| Status::ALL.iter().position(|s| *s == status)),
            SortKey::Priority => task
                .priority()
                .and_then(|priority| Priority::ALL.iter().position(|p| *p == priority)),
        };
        rank.unwrap_or(usize::MAX)
    }
}

/// Field edits offered by the update menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEdit {
    /// Empty keeps the current title.
    Title(String),
    Description(String),
    Priority(Priority),
    Status(Status),
}

#[derive(Debug, Default)]
pub struct AppState {
    tasks: TaskCollection,
}

impl AppState {
    pub fn new(tasks: TaskCollection) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &TaskCollection {
        &self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.tasks.contains(task_id)
    }

    /// Stores the task under a fresh id and returns that id.
    pub fn add_task(&mut self, task: Task) -> String {
        let id = next_id(&self.tasks);
        self.tasks.insert(id.clone(), task);
        id
    }

    pub fn edit_task(&mut self, task_id: &str, edit: TaskEdit) -> Option<&Task> {
        let task = self.tasks.get_mut(task_id)?;
        match edit {
            TaskEdit::Title(title) => {
                if !title.is_empty() {
                    task.title = title;
                }
            }
            TaskEdit::Description(description) => task.description = description,
            TaskEdit::Priority(priority) => task.priority = Some(Level::Known(priority)),
            TaskEdit::Status(status) => task.status = Some(Level::Known(status)),
        }
        Some(&*task)
    }

    pub fn remove_task(&mut self, task_id: &str) -> Option<Task> {
        self.tasks.remove(task_id)
    }

    /// Stable sort: equal ranks keep collection order.
    pub fn sorted_by(&self, key: SortKey) -> Vec<(&str, &Task)> {
        let mut items: Vec<_> = self.tasks.iter().collect();
        items.sort_by_key(|(_, task)| key.rank(task));
        items
    }

    pub fn important(&self) -> Vec<(&str, &Task)> {
        self.tasks.iter().filter(|(_, task)| task.important).collect()
    }

    pub fn search(&self, query: &str) -> Vec<(&str, &Task)> {
        self.tasks
            .iter()
            .filter(|(_, task)| task.matches(query))
            .collect()
    }
}
