//! Task command implementations.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::storage::Storage;
use crate::task::{Task, TaskFilter, TaskStore, TaskUpdate};

/// Options shared by every command
pub struct CommonOptions {
    pub dir: Option<PathBuf>,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

impl CommonOptions {
    pub(crate) fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }
}

pub struct AddOptions {
    pub title: String,
    pub due: Option<String>,
    pub priority: Option<String>,
    pub common: CommonOptions,
}

pub struct ListOptions {
    pub status: Option<String>,
    pub common: CommonOptions,
}

pub struct IdOptions {
    pub id: u64,
    pub common: CommonOptions,
}

pub struct UpdateOptions {
    pub id: u64,
    pub title: Option<String>,
    pub due: Option<String>,
    pub priority: Option<String>,
    pub clear_due: bool,
    pub common: CommonOptions,
}

pub struct DeadlineOptions {
    pub id: u64,
    pub due: String,
    pub common: CommonOptions,
}

pub struct ResetOptions {
    pub yes: bool,
    pub common: CommonOptions,
}

#[derive(Serialize)]
struct TaskListOutput<'a> {
    total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'static str>,
    tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
struct ResetOutput {
    path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    backup: Option<PathBuf>,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let mut store = open_store(&options.common)?;
    let task = store.add(
        &options.title,
        options.due.as_deref(),
        options.priority.as_deref(),
    )?;

    let mut human = HumanOutput::new("Task added");
    push_task_summary(&mut human, &task);
    emit_success(options.common.output(), "add", &task, Some(&human))
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let store = open_store(&options.common)?;
    let filter = options
        .status
        .as_deref()
        .map(str::parse::<TaskFilter>)
        .transpose()?;
    let tasks = store.list(filter);

    let mut human = HumanOutput::new("Tasks");
    human.push_summary("Total", tasks.len().to_string());
    if let Some(filter) = filter {
        human.push_summary("Status", filter.as_str());
    }
    if tasks.is_empty() {
        human.push_detail("No tasks found.");
    }
    for task in &tasks {
        human.push_detail(task_line(task));
    }

    let output = TaskListOutput {
        total: tasks.len(),
        status: filter.map(TaskFilter::as_str),
        tasks,
    };
    emit_success(options.common.output(), "list", &output, Some(&human))
}

pub fn run_show(options: IdOptions) -> Result<()> {
    let store = open_store(&options.common)?;
    let task = store.get(options.id)?;

    let mut human = HumanOutput::new(format!("Task {}", task.id));
    push_task_summary(&mut human, task);
    emit_success(options.common.output(), "show", task, Some(&human))
}

pub fn run_set_completed(options: IdOptions, completed: bool) -> Result<()> {
    let mut store = open_store(&options.common)?;
    let task = store.set_completed(options.id, completed)?;

    let (header, command) = if completed {
        ("Task completed", "complete")
    } else {
        ("Task reopened", "reopen")
    };
    let mut human = HumanOutput::new(header);
    push_task_summary(&mut human, &task);
    emit_success(options.common.output(), command, &task, Some(&human))
}

pub fn run_update(options: UpdateOptions) -> Result<()> {
    let mut store = open_store(&options.common)?;
    let task = store.update(
        options.id,
        TaskUpdate {
            title: options.title,
            due_date: options.due,
            priority: options.priority,
            clear_due: options.clear_due,
        },
    )?;

    let mut human = HumanOutput::new("Task updated");
    push_task_summary(&mut human, &task);
    emit_success(options.common.output(), "update", &task, Some(&human))
}

pub fn run_deadline(options: DeadlineOptions) -> Result<()> {
    if options.due.trim().is_empty() {
        return Err(Error::InvalidInput("due date cannot be empty".to_string()));
    }
    let mut store = open_store(&options.common)?;
    let task = store.update(options.id, TaskUpdate::due_date(options.due))?;

    let mut human = HumanOutput::new("Deadline set");
    push_task_summary(&mut human, &task);
    emit_success(options.common.output(), "deadline", &task, Some(&human))
}

pub fn run_delete(options: IdOptions) -> Result<()> {
    let mut store = open_store(&options.common)?;
    let task = store.delete(options.id)?;

    let mut human = HumanOutput::new("Task deleted");
    human.push_summary("ID", task.id.to_string());
    human.push_summary("Title", task.title.clone());
    emit_success(options.common.output(), "delete", &task, Some(&human))
}

pub fn run_reset(options: ResetOptions) -> Result<()> {
    if !options.yes {
        return Err(Error::InvalidInput(
            "reset discards all tasks; pass --yes to confirm".to_string(),
        ));
    }
    let (storage, _) = resolve_storage(&options.common)?;
    let backup = TaskStore::reset(&storage)?;

    let mut human = HumanOutput::new("Tasks file reset");
    human.push_summary("Path", storage.tasks_file().display().to_string());
    if let Some(backup) = backup.as_ref() {
        human.push_summary("Backup", backup.display().to_string());
    }
    let output = ResetOutput {
        path: storage.tasks_file().to_path_buf(),
        backup,
    };
    emit_success(options.common.output(), "reset", &output, Some(&human))
}

/// Resolve the working directory, its config, and the tasks file
pub(crate) fn resolve_storage(common: &CommonOptions) -> Result<(Storage, Config)> {
    let dir = match common.dir.as_ref() {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let config = Config::load_from_dir(&dir)?;
    let storage = match common.file.as_ref() {
        Some(file) if file.is_absolute() => Storage::new(file.clone()),
        Some(file) => Storage::new(dir.join(file)),
        None => Storage::for_dir(&dir, &config),
    };
    tracing::debug!(path = %storage.tasks_file().display(), "using tasks file");
    Ok((storage, config))
}

pub(crate) fn open_store(common: &CommonOptions) -> Result<TaskStore> {
    let (storage, config) = resolve_storage(common)?;
    TaskStore::open(storage, config.tasks)
}

pub(crate) fn task_line(task: &Task) -> String {
    let mark = if task.completed { "✓" } else { "✗" };
    format!(
        "[{}] {} {} (Due: {}, Priority: {})",
        task.id, mark, task.title, task.due_date, task.priority
    )
}

fn push_task_summary(human: &mut HumanOutput, task: &Task) {
    human.push_summary("ID", task.id.to_string());
    human.push_summary("Title", task.title.clone());
    human.push_summary("Due", task.due_date.to_string());
    human.push_summary("Priority", task.priority.clone());
    human.push_summary(
        "Status",
        if task.completed { "completed" } else { "pending" },
    );
}
