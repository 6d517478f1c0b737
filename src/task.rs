//! Task records and the task store.
//!
//! The store owns the canonical task collection. Every successful mutation
//! is written back to the tasks file before the call returns; a failed save
//! leaves the in-memory collection as the authoritative copy so `save` can be
//! retried.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::TasksConfig;
use crate::due::DueDate;
use crate::error::{Error, Result};
use crate::storage::Storage;

/// One to-do item, in its persisted shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub due_date: DueDate,
    pub priority: String,
    #[serde(default)]
    pub completed: bool,
}

/// Completion filter for [`TaskStore::list`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFilter {
    Pending,
    Completed,
}

impl TaskFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            TaskFilter::Pending => !task.completed,
            TaskFilter::Completed => task.completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskFilter::Pending => "pending",
            TaskFilter::Completed => "completed",
        }
    }
}

impl std::str::FromStr for TaskFilter {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(TaskFilter::Pending),
            "completed" => Ok(TaskFilter::Completed),
            other => Err(Error::InvalidInput(format!(
                "unknown status '{other}' (expected pending|completed)"
            ))),
        }
    }
}

/// Fields to change on an existing task.
///
/// `None` and blank strings both leave a field unchanged. A due date is
/// cleared only by `clear_due` or the explicit value `N/A`.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<String>,
    pub clear_due: bool,
}

impl TaskUpdate {
    pub fn priority(value: impl Into<String>) -> Self {
        Self {
            priority: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn due_date(value: impl Into<String>) -> Self {
        Self {
            due_date: Some(value.into()),
            ..Self::default()
        }
    }
}

/// Changes validated against the store config, ready to apply.
struct ResolvedUpdate {
    title: Option<String>,
    due_date: Option<DueDate>,
    priority: Option<String>,
}

#[derive(Debug)]
pub struct TaskStore {
    storage: Storage,
    config: TasksConfig,
    tasks: Vec<Task>,
    /// Highest id this store has seen; ids are never handed out twice.
    last_id: u64,
}

impl TaskStore {
    /// Load the tasks file and wrap it in a store
    pub fn open(storage: Storage, config: TasksConfig) -> Result<Self> {
        let tasks = Self::load(&storage)?;
        Ok(Self::from_tasks(storage, config, tasks))
    }

    /// Build a store around an already loaded collection
    pub fn from_tasks(storage: Storage, config: TasksConfig, tasks: Vec<Task>) -> Self {
        let last_id = tasks.iter().map(|task| task.id).max().unwrap_or(0);
        Self {
            storage,
            config,
            tasks,
            last_id,
        }
    }

    /// Read persisted tasks. A missing file is an empty store.
    pub fn load(storage: &Storage) -> Result<Vec<Task>> {
        let path = storage.tasks_file();
        let Some(tasks) = storage.read_json::<Vec<Task>>(path)? else {
            tracing::debug!(path = %path.display(), "no tasks file; starting empty");
            return Ok(Vec::new());
        };

        validate_records(&tasks).map_err(|message| Error::CorruptState {
            path: path.to_path_buf(),
            source: serde::de::Error::custom(message),
        })?;

        tracing::debug!(path = %path.display(), count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    /// Replace an unreadable tasks file with an empty store.
    ///
    /// The previous file is copied to `<file>.corrupt` first. Returns the
    /// backup path when there was a file to preserve.
    pub fn reset(storage: &Storage) -> Result<Option<PathBuf>> {
        let backup = storage.preserve_tasks_file()?;
        storage.write_json(storage.tasks_file(), &Vec::<Task>::new())?;
        tracing::warn!(path = %storage.tasks_file().display(), "tasks file reset");
        Ok(backup)
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn config(&self) -> &TasksConfig {
        &self.config
    }

    /// Read-only view of every task, in store order
    pub fn all_tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: u64) -> Result<&Task> {
        self.tasks
            .iter()
            .find(|task| task.id == id)
            .ok_or(Error::NotFound(id))
    }

    /// Tasks in store order, optionally restricted by completion
    pub fn list(&self, filter: Option<TaskFilter>) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| filter.is_none_or(|filter| filter.matches(task)))
            .collect()
    }

    pub fn add(&mut self, title: &str, due_date: Option<&str>, priority: Option<&str>) -> Result<Task> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::InvalidInput("title cannot be empty".to_string()));
        }
        let due_date = match non_blank(due_date) {
            Some(value) => DueDate::parse(value)?,
            None => DueDate::None,
        };
        let priority = match non_blank(priority) {
            Some(value) => self.config.normalize_priority(value)?,
            None => self.config.default_priority.clone(),
        };
        let id = self.last_id.checked_add(1).ok_or_else(|| {
            Error::InvalidInput(format!("task id space exhausted after {}", self.last_id))
        })?;

        let task = Task {
            id,
            title: title.to_string(),
            due_date,
            priority,
            completed: false,
        };
        self.last_id = task.id;
        self.tasks.push(task.clone());
        tracing::info!(id = task.id, "task added");

        self.save()?;
        Ok(task)
    }

    pub fn complete(&mut self, id: u64) -> Result<Task> {
        self.set_completed(id, true)
    }

    /// Set the completion flag; `false` reopens a task
    pub fn set_completed(&mut self, id: u64, completed: bool) -> Result<Task> {
        let index = self.position(id)?;
        self.tasks[index].completed = completed;
        tracing::info!(id, completed, "task completion changed");

        self.save()?;
        Ok(self.tasks[index].clone())
    }

    pub fn update(&mut self, id: u64, update: TaskUpdate) -> Result<Task> {
        let index = self.position(id)?;
        let resolved = self.resolve_update(&update)?;

        let task = &mut self.tasks[index];
        if let Some(title) = resolved.title {
            task.title = title;
        }
        if let Some(due_date) = resolved.due_date {
            task.due_date = due_date;
        }
        if let Some(priority) = resolved.priority {
            task.priority = priority;
        }
        tracing::info!(id, "task updated");

        self.save()?;
        Ok(self.tasks[index].clone())
    }

    /// Remove a task permanently and return it
    pub fn delete(&mut self, id: u64) -> Result<Task> {
        let index = self.position(id)?;
        let removed = self.tasks.remove(index);
        tracing::info!(id, "task deleted");

        self.save()?;
        Ok(removed)
    }

    /// Overwrite the tasks file with the full collection
    pub fn save(&self) -> Result<()> {
        let path = self.storage.tasks_file();
        if let Err(err) = self.storage.write_json(path, &self.tasks) {
            tracing::warn!(path = %path.display(), error = %err, "save failed; in-memory state kept");
            return Err(err);
        }
        tracing::debug!(path = %path.display(), count = self.tasks.len(), "saved tasks");
        Ok(())
    }

    fn position(&self, id: u64) -> Result<usize> {
        self.tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(Error::NotFound(id))
    }

    fn resolve_update(&self, update: &TaskUpdate) -> Result<ResolvedUpdate> {
        let due_value = non_blank(update.due_date.as_deref());
        if update.clear_due && due_value.is_some() {
            return Err(Error::InvalidInput(
                "cannot set and clear the due date at once".to_string(),
            ));
        }

        let due_date = if update.clear_due {
            Some(DueDate::None)
        } else {
            due_value.map(DueDate::parse).transpose()?
        };
        let priority = non_blank(update.priority.as_deref())
            .map(|value| self.config.normalize_priority(value))
            .transpose()?;
        let title = non_blank(update.title.as_deref()).map(|value| value.trim().to_string());

        Ok(ResolvedUpdate {
            title,
            due_date,
            priority,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

fn validate_records(tasks: &[Task]) -> std::result::Result<(), String> {
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if task.id == 0 {
            return Err("task id must be positive".to_string());
        }
        if !seen.insert(task.id) {
            return Err(format!("duplicate task id {}", task.id));
        }
        if task.title.trim().is_empty() {
            return Err(format!("task {} has an empty title", task.id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_store() -> (TempDir, TaskStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = Storage::new(dir.path().join("tasks.json"));
        let store = TaskStore::open(storage, TasksConfig::default()).expect("open store");
        (dir, store)
    }

    #[test]
    fn add_assigns_sequential_ids_and_defaults() {
        let (_dir, mut store) = setup_store();

        let first = store.add("Write report", None, None).unwrap();
        let second = store.add("Call bank", Some("06-10-2025"), Some("high")).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(first.due_date, DueDate::None);
        assert_eq!(first.priority, "Medium");
        assert!(!first.completed);
        assert_eq!(second.id, 2);
        assert_eq!(second.due_date.to_string(), "06/10/2025");
        assert_eq!(second.priority, "High");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn add_rejects_blank_title_without_mutation() {
        let (dir, mut store) = setup_store();

        assert!(matches!(store.add("", None, None), Err(Error::InvalidInput(_))));
        assert!(matches!(store.add("   ", None, None), Err(Error::InvalidInput(_))));
        assert!(store.is_empty());
        assert!(!dir.path().join("tasks.json").exists());
    }

    #[test]
    fn add_rejects_invalid_due_date() {
        let (_dir, mut store) = setup_store();
        let result = store.add("Task", Some("13/45/2025"), None);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn ids_continue_from_loaded_maximum() {
        let (dir, mut store) = setup_store();
        fs::write(
            dir.path().join("tasks.json"),
            r#"[{"id": 7, "title": "Old", "due_date": "N/A", "priority": "Low", "completed": true},
               {"id": 3, "title": "Older", "due_date": "N/A", "priority": "Low", "completed": false}]"#,
        )
        .unwrap();
        let storage = store.storage().clone();
        store = TaskStore::open(storage, TasksConfig::default()).unwrap();

        let task = store.add("New", None, None).unwrap();
        assert_eq!(task.id, 8);
    }

    #[test]
    fn add_at_max_id_fails_without_mutation() {
        let (dir, store) = setup_store();
        let raw = format!(
            r#"[{{"id": {}, "title": "Last", "due_date": "N/A", "priority": "Low", "completed": false}}]"#,
            u64::MAX
        );
        fs::write(dir.path().join("tasks.json"), &raw).unwrap();
        let mut store = TaskStore::open(store.storage().clone(), TasksConfig::default()).unwrap();

        let result = store.add("Next", None, None);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(store.len(), 1);
        assert_eq!(fs::read_to_string(dir.path().join("tasks.json")).unwrap(), raw);
    }

    #[test]
    fn deleted_ids_are_not_reused_within_a_store() {
        let (_dir, mut store) = setup_store();
        store.add("One", None, None).unwrap();
        let two = store.add("Two", None, None).unwrap();

        store.delete(two.id).unwrap();
        let three = store.add("Three", None, None).unwrap();
        assert_eq!(three.id, 3);
    }

    #[test]
    fn delete_twice_fails_second_time() {
        let (_dir, mut store) = setup_store();
        let task = store.add("Temp", None, None).unwrap();

        let removed = store.delete(task.id).unwrap();
        assert_eq!(removed.title, "Temp");
        assert!(store.is_empty());
        assert!(matches!(store.delete(task.id), Err(Error::NotFound(1))));
    }

    #[test]
    fn complete_is_visible_in_completed_filter() {
        let (_dir, mut store) = setup_store();
        store.add("A", None, None).unwrap();
        let b = store.add("B", None, None).unwrap();

        let done = store.complete(b.id).unwrap();
        assert!(done.completed);

        let completed: Vec<u64> = store
            .list(Some(TaskFilter::Completed))
            .iter()
            .map(|task| task.id)
            .collect();
        let pending: Vec<u64> = store
            .list(Some(TaskFilter::Pending))
            .iter()
            .map(|task| task.id)
            .collect();
        assert_eq!(completed, vec![b.id]);
        assert_eq!(pending, vec![1]);
        assert_eq!(store.list(None).len(), 2);
    }

    #[test]
    fn set_completed_false_reopens() {
        let (_dir, mut store) = setup_store();
        let task = store.add("A", None, None).unwrap();
        store.complete(task.id).unwrap();

        let reopened = store.set_completed(task.id, false).unwrap();
        assert!(!reopened.completed);
        assert!(matches!(store.complete(99), Err(Error::NotFound(99))));
    }

    #[test]
    fn update_priority_leaves_other_fields() {
        let (_dir, mut store) = setup_store();
        let task = store.add("Plan trip", Some("07/01/2025"), None).unwrap();

        let updated = store.update(task.id, TaskUpdate::priority("High")).unwrap();
        assert_eq!(updated.priority, "High");
        assert_eq!(updated.title, task.title);
        assert_eq!(updated.due_date, task.due_date);
    }

    #[test]
    fn update_treats_blank_as_unchanged() {
        let (_dir, mut store) = setup_store();
        let task = store.add("Plan trip", Some("07/01/2025"), Some("Low")).unwrap();

        let updated = store
            .update(
                task.id,
                TaskUpdate {
                    title: Some(String::new()),
                    due_date: Some("  ".to_string()),
                    priority: Some(String::new()),
                    clear_due: false,
                },
            )
            .unwrap();
        assert_eq!(updated, task);
    }

    #[test]
    fn update_clears_due_date_only_when_explicit() {
        let (_dir, mut store) = setup_store();
        let task = store.add("Plan trip", Some("07/01/2025"), None).unwrap();

        let cleared = store
            .update(
                task.id,
                TaskUpdate {
                    clear_due: true,
                    ..TaskUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(cleared.due_date, DueDate::None);

        store.update(task.id, TaskUpdate::due_date("08/01/2025")).unwrap();
        let cleared = store.update(task.id, TaskUpdate::due_date("N/A")).unwrap();
        assert_eq!(cleared.due_date, DueDate::None);
    }

    #[test]
    fn update_rejects_conflicting_due_changes() {
        let (_dir, mut store) = setup_store();
        let task = store.add("Plan trip", None, None).unwrap();

        let result = store.update(
            task.id,
            TaskUpdate {
                due_date: Some("08/01/2025".to_string()),
                clear_due: true,
                ..TaskUpdate::default()
            },
        );
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn update_is_all_or_nothing() {
        let (_dir, mut store) = setup_store();
        let task = store.add("Plan trip", None, None).unwrap();

        let result = store.update(
            task.id,
            TaskUpdate {
                title: Some("Renamed".to_string()),
                due_date: Some("99/99/2025".to_string()),
                ..TaskUpdate::default()
            },
        );
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(store.get(task.id).unwrap().title, "Plan trip");
        assert!(matches!(
            store.update(42, TaskUpdate::priority("Low")),
            Err(Error::NotFound(42))
        ));
    }

    #[test]
    fn save_and_load_roundtrip_preserves_order() {
        let (_dir, mut store) = setup_store();
        store.add("Zeta", Some("1-2-2026"), Some("Low")).unwrap();
        store.add("Alpha", None, Some("Urgent")).unwrap();
        store.complete(1).unwrap();

        let loaded = TaskStore::load(store.storage()).unwrap();
        assert_eq!(loaded, store.all_tasks());
        assert_eq!(loaded[0].title, "Zeta");
        assert_eq!(loaded[0].due_date.to_string(), "01/02/2026");
    }

    #[test]
    fn load_keeps_unparsable_dates() {
        let (dir, _store) = setup_store();
        let path = dir.path().join("tasks.json");
        fs::write(
            &path,
            r#"[{"id": 1, "title": "Odd", "due_date": "32/13/9999", "priority": "Low", "completed": false}]"#,
        )
        .unwrap();

        let tasks = TaskStore::load(&Storage::new(&path)).unwrap();
        assert_eq!(tasks[0].due_date, DueDate::Unparsed("32/13/9999".to_string()));
    }

    #[test]
    fn load_rejects_duplicate_ids() {
        let (dir, _store) = setup_store();
        let path = dir.path().join("tasks.json");
        fs::write(
            &path,
            r#"[{"id": 1, "title": "A", "due_date": "N/A", "priority": "Low", "completed": false},
               {"id": 1, "title": "B", "due_date": "N/A", "priority": "Low", "completed": false}]"#,
        )
        .unwrap();

        let result = TaskStore::load(&Storage::new(&path));
        assert!(matches!(result, Err(Error::CorruptState { .. })));
    }

    #[test]
    fn reset_preserves_corrupt_file() {
        let (dir, _store) = setup_store();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "{{{").unwrap();
        let storage = Storage::new(&path);

        let backup = TaskStore::reset(&storage).unwrap().unwrap();
        assert_eq!(fs::read_to_string(backup).unwrap(), "{{{");
        assert!(TaskStore::load(&storage).unwrap().is_empty());
    }
}
