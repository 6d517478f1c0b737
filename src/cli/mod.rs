//! Command-line interface for tasktrackr
//!
//! This module defines the CLI structure using clap derive macros.
//! Command implementations live in the submodules.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;

mod report;
mod task;

/// TaskTrackr - a local task tracker
///
/// Create, list, update, complete and delete tasks stored in a JSON file,
/// and organize them by due date.
#[derive(Parser, Debug)]
#[command(name = "tasktrackr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Working directory holding `.tasktrackr.toml` and the tasks file
    #[arg(long, global = true, env = "TASKTRACKR_DIR")]
    pub dir: Option<PathBuf>,

    /// Tasks file (overrides the configured `tasks_file`)
    #[arg(long, global = true, env = "TASKTRACKR_FILE")]
    pub file: Option<PathBuf>,

    /// Reference date for due-date reports (YYYY-MM-DD or MM/DD/YYYY)
    #[arg(long, global = true, env = "TASKTRACKR_TODAY")]
    pub today: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new task
    Add {
        /// Task title
        #[arg(long)]
        title: String,

        /// Due date (MM/DD/YYYY or MM-DD-YYYY)
        #[arg(long)]
        due: Option<String>,

        /// Priority label (e.g. Low, Medium, High)
        #[arg(long)]
        priority: Option<String>,
    },

    /// List tasks in store order
    List {
        /// Only pending or only completed tasks
        #[arg(long, value_parser = ["pending", "completed"])]
        status: Option<String>,
    },

    /// Show a single task
    Show {
        #[arg(long)]
        id: u64,
    },

    /// Mark a task as completed
    Complete {
        #[arg(long)]
        id: u64,
    },

    /// Mark a completed task as pending again
    Reopen {
        #[arg(long)]
        id: u64,
    },

    /// Update a task's title, due date or priority
    Update {
        #[arg(long)]
        id: u64,

        /// New title (blank leaves it unchanged)
        #[arg(long)]
        title: Option<String>,

        /// New due date; `N/A` clears it
        #[arg(long)]
        due: Option<String>,

        /// New priority
        #[arg(long)]
        priority: Option<String>,

        /// Remove the due date
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
    },

    /// Set a task's due date
    Deadline {
        #[arg(long)]
        id: u64,

        /// Due date (MM/DD/YYYY or MM-DD-YYYY)
        #[arg(long)]
        due: String,
    },

    /// Delete a task permanently
    Delete {
        #[arg(long)]
        id: u64,
    },

    /// Group tasks by due date
    Organize,

    /// Count tasks per due-date group and completion
    Summary,

    /// Replace an unreadable tasks file with an empty one
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let common = task::CommonOptions {
            dir: self.dir,
            file: self.file,
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Add {
                title,
                due,
                priority,
            } => task::run_add(task::AddOptions {
                title,
                due,
                priority,
                common,
            }),
            Commands::List { status } => task::run_list(task::ListOptions { status, common }),
            Commands::Show { id } => task::run_show(task::IdOptions { id, common }),
            Commands::Complete { id } => task::run_set_completed(task::IdOptions { id, common }, true),
            Commands::Reopen { id } => task::run_set_completed(task::IdOptions { id, common }, false),
            Commands::Update {
                id,
                title,
                due,
                priority,
                clear_due,
            } => task::run_update(task::UpdateOptions {
                id,
                title,
                due,
                priority,
                clear_due,
                common,
            }),
            Commands::Deadline { id, due } => task::run_deadline(task::DeadlineOptions {
                id,
                due,
                common,
            }),
            Commands::Delete { id } => task::run_delete(task::IdOptions { id, common }),
            Commands::Organize => report::run_organize(report::ReportOptions {
                today: self.today,
                common,
            }),
            Commands::Summary => report::run_summary(report::ReportOptions {
                today: self.today,
                common,
            }),
            Commands::Reset { yes } => task::run_reset(task::ResetOptions { yes, common }),
        }
    }
}
