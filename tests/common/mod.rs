use std::fs;
use std::path::{Path, PathBuf};

use eval_judge::JudgeConfig;
use serde_json::Value;
use tempfile::TempDir;

/// Scratch workspace holding inputs and the results directory.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    /// Write a JSON input file and return its path.
    pub fn write(&self, name: &str, value: &Value) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
        path
    }

    pub fn config(&self) -> JudgeConfig {
        JudgeConfig {
            results_dir: self.dir.path().join("judged_results"),
        }
    }
}

pub fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}
