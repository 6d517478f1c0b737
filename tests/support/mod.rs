#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.dir.path().join("tasks.json")
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn write_tasks(&self, contents: &str) -> std::io::Result<PathBuf> {
        self.write_file("tasks.json", contents)
    }

    pub fn read_tasks(&self) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(self.tasks_file())?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Command running in this directory with a pinned reference date
    pub fn cmd(&self) -> Command {
        let mut cmd = tasktrackr_cmd();
        cmd.current_dir(self.path());
        cmd.env("TASKTRACKR_TODAY", "2025-06-10");
        cmd
    }
}

pub fn tasktrackr_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tasktrackr").expect("binary");
    cmd.env_remove("TASKTRACKR_DIR");
    cmd.env_remove("TASKTRACKR_FILE");
    cmd.env_remove("TASKTRACKR_TODAY");
    cmd.env_remove("RUST_LOG");
    cmd
}

pub fn parse_json(stdout: &[u8]) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::from_slice(stdout)?)
}
