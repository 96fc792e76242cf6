use std::io::{self, BufRead, Write};

use crate::models::{Priority, Status, Task};
use crate::prompt::Prompter;
use crate::state::{AppState, SortKey, TaskEdit};
use crate::storage::{Loaded, Storage};

const CHOICE: &str = "Your choice: ";
const PRIORITY_MENU: &str = "Priority: 1 - low, 2 - medium, 3 - high";
const STATUS_MENU: &str = "Status: 1 - new, 2 - in progress, 3 - done";
const IMPORTANT_MARK: &str = " ⚠️";

/// One interactive run: the task file, the tasks in memory and the console.
pub struct Session<R, W> {
    storage: Storage,
    state: AppState,
    console: Prompter<R, W>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Loads the task file; a broken file is reported and replaced by an empty list.
    pub fn open(storage: Storage, mut console: Prompter<R, W>) -> io::Result<Self> {
        let loaded = storage.load();
        if let Loaded::Unreadable(error) = &loaded {
            console.say(format!(
                "Could not read {} ({error}). Starting with an empty list.",
                storage.path().display()
            ))?;
        }
        Ok(Self {
            storage,
            state: AppState::new(loaded.into_tasks()),
            console,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn console(&self) -> &Prompter<R, W> {
        &self.console
    }

    pub(crate) fn console_mut(&mut self) -> &mut Prompter<R, W> {
        &mut self.console
    }

    /// Writes the whole collection. A failed write is logged and reported, not fatal.
    fn persist(&mut self) -> io::Result<bool> {
        match self.storage.save(self.state.tasks()) {
            Ok(()) => Ok(true),
            Err(error) => {
                log::error!(
                    "failed to save tasks path={}: {error}",
                    self.storage.path().display()
                );
                self.console.say(format!("Could not save tasks: {error}"))?;
                Ok(false)
            }
        }
    }

    pub fn create_task(&mut self) -> io::Result<()> {
        self.console.say("\n=== New task ===")?;
        let title = self.console.ask_text("Title: ")?;
        let description = self.console.ask_text("Description: ")?;
        let priority = self.ask_priority()?;
        let status = self.ask_status()?;
        let important = self.console.ask_yes_no("Mark as important?")?;

        let task = Task::new(&title, &description, priority, status, important);
        let id = self.state.add_task(task);
        log::info!("task created id={id}");
        if self.persist()? {
            self.console.say(format!("Done! Task created with id={id}"))?;
        }
        Ok(())
    }

    pub fn list_all(&mut self) -> io::Result<()> {
        self.console.say("\n=== All tasks ===")?;
        if self.state.is_empty() {
            return self.console.say("Empty");
        }
        for (id, task) in self.state.tasks().iter() {
            self.console.say(render_task(id, task))?;
        }
        Ok(())
    }

    pub fn list_sorted(&mut self, key: SortKey) -> io::Result<()> {
        let header = match key {
            SortKey::Status => "\n=== Sorted by status ===",
            SortKey::Priority => "\n=== Sorted by priority ===",
        };
        self.console.say(header)?;
        if self.state.is_empty() {
            return self.console.say("Empty");
        }
        for (id, task) in self.state.sorted_by(key) {
            self.console.say(render_task(id, task))?;
        }
        Ok(())
    }

    pub fn list_important(&mut self) -> io::Result<()> {
        self.console.say("\n=== Important tasks ===")?;
        if self.state.is_empty() {
            return self.console.say("Empty");
        }
        let found = self.state.important();
        if found.is_empty() {
            return self.console.say("No important tasks");
        }
        for (id, task) in found {
            self.console.say(render_task(id, task))?;
        }
        Ok(())
    }

    pub fn search_tasks(&mut self) -> io::Result<()> {
        self.console.say("\n=== Search ===")?;
        if self.state.is_empty() {
            return self.console.say("Empty");
        }
        let query = self.console.ask_text("Word or phrase: ")?;
        let found = self.state.search(&query);
        if found.is_empty() {
            return self.console.say("Nothing found");
        }
        for (id, task) in found {
            self.console.say(render_task(id, task))?;
        }
        Ok(())
    }

    pub fn update_task(&mut self) -> io::Result<()> {
        self.console.say("\n=== Update task ===")?;
        if self.state.is_empty() {
            return self.console.say("Empty");
        }
        let task_id = self.console.ask_text("Task id: ")?;
        if !self.state.contains(&task_id) {
            return self.console.say("No such task.");
        }
        loop {
            self.console.say("\nWhat to change?")?;
            self.console.say("1 - Title")?;
            self.console.say("2 - Description")?;
            self.console.say("3 - Priority")?;
            self.console.say("4 - Status")?;
            self.console.say("0 - Back")?;
            let edit = match self.console.ask_choice(CHOICE, &[0, 1, 2, 3, 4])? {
                0 => break,
                1 => TaskEdit::Title(self.console.ask_text("New title: ")?),
                2 => TaskEdit::Description(self.console.ask_text("New description: ")?),
                3 => TaskEdit::Priority(self.ask_priority()?),
                4 => TaskEdit::Status(self.ask_status()?),
                _ => continue,
            };
            self.state.edit_task(&task_id, edit);
            log::info!("task updated id={task_id}");
            if self.persist()? {
                self.console.say("Saved")?;
            }
        }
        Ok(())
    }

    pub fn delete_task(&mut self) -> io::Result<()> {
        self.console.say("\n=== Delete task ===")?;
        if self.state.is_empty() {
            return self.console.say("Empty");
        }
        let task_id = self.console.ask_text("Task id: ")?;
        if !self.state.contains(&task_id) {
            return self.console.say("Task not found");
        }
        if !self
            .console
            .ask_yes_no(&format!("Really delete [{task_id}]?"))?
        {
            return self.console.say("Cancelled");
        }
        self.state.remove_task(&task_id);
        log::info!("task deleted id={task_id}");
        if self.persist()? {
            self.console.say("Deleted")?;
        }
        Ok(())
    }

    fn ask_priority(&mut self) -> io::Result<Priority> {
        self.console.say(PRIORITY_MENU)?;
        let choice = self.console.ask_choice(CHOICE, &[1, 2, 3])?;
        Ok(Priority::from_choice(choice).unwrap_or(Priority::Low))
    }

    fn ask_status(&mut self) -> io::Result<Status> {
        self.console.say(STATUS_MENU)?;
        let choice = self.console.ask_choice(CHOICE, &[1, 2, 3])?;
        Ok(Status::from_choice(choice).unwrap_or(Status::New))
    }
}

/// Shared task block used by every listing.
pub fn render_task(id: &str, task: &Task) -> String {
    let mark = if task.important { IMPORTANT_MARK } else { "" };
    format!(
        "[{id}] {}{mark}\nDescription: {}\nPriority: {} | Status: {}\n",
        task.title,
        task.description,
        task.priority_label(),
        task.status_label(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskCollection;
    use std::fs;
    use std::io::Cursor;

    type TestSession = Session<Cursor<Vec<u8>>, Vec<u8>>;

    fn make_task(title: &str, description: &str, important: bool) -> Task {
        Task::new(title, description, Priority::Medium, Status::New, important)
    }

    fn seed(root: &tempfile::TempDir, tasks: Vec<(&str, Task)>) -> Storage {
        let storage = Storage::new(root.path().join("tasks.json"));
        let mut collection = TaskCollection::new();
        for (id, task) in tasks {
            collection.insert(id.to_string(), task);
        }
        if !collection.is_empty() {
            storage.save(&collection).unwrap();
        }
        storage
    }

    fn session(storage: Storage, input: &str) -> TestSession {
        let console = Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        Session::open(storage, console).unwrap()
    }

    fn printed(session: &TestSession) -> String {
        String::from_utf8(session.console().output().clone()).unwrap()
    }

    fn reload(root: &tempfile::TempDir) -> TaskCollection {
        Storage::new(root.path().join("tasks.json"))
            .load_tasks()
            .unwrap()
    }

    #[test]
    fn render_task_includes_marker_and_blank_levels() {
        let task = make_task("Read", "chapter 2", true);
        assert_eq!(
            render_task("a1b", &task),
            "[a1b] Read ⚠️\nDescription: chapter 2\nPriority: Medium | Status: New\n"
        );

        let bare: Task = serde_json::from_str("{}").unwrap();
        assert_eq!(
            render_task("x", &bare),
            "[x] (no name)\nDescription: \nPriority:  | Status: \n"
        );
    }

    #[test]
    fn open_reports_unreadable_file_and_starts_empty() {
        let root = tempfile::tempdir().unwrap();
        let storage = Storage::new(root.path().join("tasks.json"));
        fs::write(storage.path(), "not json").unwrap();

        let s = session(storage, "");
        assert!(s.state().is_empty());
        assert!(printed(&s).contains("Starting with an empty list."));
    }

    #[test]
    fn create_task_persists_with_defaults_and_reports_id() {
        let root = tempfile::tempdir().unwrap();
        let mut s = session(seed(&root, Vec::new()), "\nsome notes\n5\n2\n3\nn\n");
        s.create_task().unwrap();

        let saved = reload(&root);
        assert_eq!(saved.len(), 1);
        let (id, task) = saved.iter().next().unwrap();
        assert_eq!(task.title, "(no name)");
        assert_eq!(task.description, "some notes");
        assert_eq!(task.priority(), Some(Priority::Medium));
        assert_eq!(task.status(), Some(Status::Done));
        assert!(!task.important);
        assert!(printed(&s).contains(&format!("Task created with id={id}")));
    }

    #[test]
    fn create_task_n_times_gives_n_distinct_ids() {
        let root = tempfile::tempdir().unwrap();
        let input = "t\n\n1\n1\nn\n".repeat(25);
        let mut s = session(seed(&root, Vec::new()), &input);
        for _ in 0..25 {
            s.create_task().unwrap();
        }
        assert_eq!(s.state().tasks().len(), 25);
        assert_eq!(reload(&root).len(), 25);
    }

    #[test]
    fn listings_report_empty_and_no_important_distinctly() {
        let root = tempfile::tempdir().unwrap();
        let mut s = session(seed(&root, Vec::new()), "");
        s.list_all().unwrap();
        s.list_important().unwrap();
        s.list_sorted(SortKey::Status).unwrap();
        s.search_tasks().unwrap();
        assert_eq!(printed(&s).matches("Empty").count(), 4);
        assert!(!printed(&s).contains("No important tasks"));

        let root = tempfile::tempdir().unwrap();
        let mut s = session(seed(&root, vec![("abc", make_task("a", "", false))]), "");
        s.list_important().unwrap();
        assert!(printed(&s).contains("No important tasks"));
    }

    #[test]
    fn list_sorted_by_status_prints_stable_order() {
        let root = tempfile::tempdir().unwrap();
        let mut tasks = Vec::new();
        for (id, status) in [
            ("t1", Status::Done),
            ("t2", Status::New),
            ("t3", Status::InProgress),
            ("t4", Status::New),
        ] {
            tasks.push((id, Task::new(id, "", Priority::Low, status, false)));
        }
        let mut s = session(seed(&root, tasks), "");
        s.list_sorted(SortKey::Status).unwrap();

        let out = printed(&s);
        let positions: Vec<usize> = ["[t2]", "[t4]", "[t3]", "[t1]"]
            .iter()
            .map(|id| out.find(id).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn search_prints_matches_or_nothing_found() {
        let root = tempfile::tempdir().unwrap();
        let storage = seed(
            &root,
            vec![
                ("aaa", make_task("Buy milk", "urgent buy", false)),
                ("bbb", make_task("Post office", "buy stamps", false)),
            ],
        );
        let mut s = session(storage, "Buy\nzzz\n");
        s.search_tasks().unwrap();
        s.search_tasks().unwrap();

        let out = printed(&s);
        assert!(out.contains("[aaa]"));
        assert!(!out.contains("[bbb]"));
        assert!(out.contains("Nothing found"));
    }

    #[test]
    fn update_task_edits_fields_and_saves_after_each_change() {
        let root = tempfile::tempdir().unwrap();
        let storage = seed(&root, vec![("abc", make_task("Old", "desc", false))]);
        let input = "abc\n1\n\n1\nNew\n2\n\n3\n3\n4\n2\n0\n";
        let mut s = session(storage, input);
        s.update_task().unwrap();

        let saved = reload(&root);
        let task = saved.get("abc").unwrap();
        assert_eq!(task.title, "New");
        assert_eq!(task.description, "");
        assert_eq!(task.priority(), Some(Priority::High));
        assert_eq!(task.status(), Some(Status::InProgress));
        assert_eq!(printed(&s).matches("Saved").count(), 5);
    }

    #[test]
    fn update_keeps_legacy_and_unrecognized_levels_of_other_tasks() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("tasks.json");
        fs::write(
            &path,
            r#"{
              "a1b": { "title": "A", "desc": "x", "priority": "Высокий", "status": "Новая", "important": false },
              "c2d": { "title": "B", "desc": "y", "priority": "someday", "status": "blocked", "important": true }
            }"#,
        )
        .unwrap();

        let mut s = session(Storage::new(path.clone()), "a1b
2
new notes
0
");
        s.update_task().unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["a1b"]["description"], "new notes");
        assert_eq!(raw["a1b"]["priority"], "high");
        assert_eq!(raw["a1b"]["status"], "new");
        assert_eq!(raw["c2d"]["priority"], "someday");
        assert_eq!(raw["c2d"]["status"], "blocked");
        assert_eq!(raw["c2d"]["important"], true);

        s.list_all().unwrap();
        assert!(printed(&s).contains("Priority: someday | Status: blocked"));
    }

    #[test]
    fn update_and_delete_report_missing_ids() {
        let root = tempfile::tempdir().unwrap();
        let storage = seed(&root, vec![("abc", make_task("a", "", false))]);
        let mut s = session(storage, "zzz\nzzz\n");
        s.update_task().unwrap();
        s.delete_task().unwrap();

        let out = printed(&s);
        assert!(out.contains("No such task."));
        assert!(out.contains("Task not found"));
        assert_eq!(s.state().tasks().len(), 1);
    }

    #[test]
    fn delete_without_exact_yes_leaves_file_untouched() {
        let root = tempfile::tempdir().unwrap();
        let storage = seed(&root, vec![("abc", make_task("a", "", false))]);
        let before = fs::read(root.path().join("tasks.json")).unwrap();
        let mut s = session(storage, "abc\nY\nabc\nyes\nabc\n\n");
        for _ in 0..3 {
            s.delete_task().unwrap();
        }

        assert_eq!(printed(&s).matches("Cancelled").count(), 3);
        assert!(s.state().contains("abc"));
        assert_eq!(fs::read(root.path().join("tasks.json")).unwrap(), before);
    }

    #[test]
    fn delete_with_yes_removes_and_persists() {
        let root = tempfile::tempdir().unwrap();
        let storage = seed(
            &root,
            vec![
                ("abc", make_task("a", "", false)),
                ("def", make_task("d", "", false)),
            ],
        );
        let mut s = session(storage, "abc\ny\n");
        s.delete_task().unwrap();

        let out = printed(&s);
        assert!(out.contains("Really delete [abc]? (y/N): "));
        assert!(out.contains("Deleted"));
        assert_eq!(reload(&root).ids().collect::<Vec<_>>(), vec!["def"]);
    }

    #[test]
    fn save_failure_is_reported_and_session_continues() {
        let root = tempfile::tempdir().unwrap();
        let storage = Storage::new(root.path().join("tasks.json"));
        fs::create_dir_all(storage.path()).unwrap();
        let mut s = session(storage, "t\n\n1\n1\ny\n");
        s.create_task().unwrap();

        let out = printed(&s);
        assert!(out.contains("Could not save tasks"));
        assert!(!out.contains("Task created"));
        assert_eq!(s.state().tasks().len(), 1);
    }
}
