use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{runtime_paths, SHELL_LOG_FILE};

pub fn resolve_shell_log_path(user_data_root: Option<PathBuf>, log_file: &str) -> Option<PathBuf> {
    user_data_root.map(|root| root.join("logs").join(log_file))
}

fn append_line(log_path: &Path, line: &str) -> Result<(), String> {
    if let Some(parent_dir) = log_path.parent() {
        fs::create_dir_all(parent_dir).map_err(|error| {
            format!(
                "Failed to create log directory {}: {}",
                parent_dir.display(),
                error
            )
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|error| format!("Failed to open log file {}: {}", log_path.display(), error))?;
    writeln!(file, "{line}")
        .map_err(|error| format!("Failed to write log file {}: {}", log_path.display(), error))
}

fn append_tagged_log(tag: &str, message: &str) {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let line = format!("[{timestamp}] [{tag}] {message}");

    let log_path = resolve_shell_log_path(runtime_paths::user_data_root_dir(), SHELL_LOG_FILE);
    match log_path {
        Some(path) => {
            if append_line(&path, &line).is_err() {
                eprintln!("{line}");
            }
        }
        None => eprintln!("{line}"),
    }
}

pub fn append_startup_log(message: &str) {
    append_tagged_log("startup", message);
}

pub fn append_shell_log(message: &str) {
    append_tagged_log("shell", message);
}

pub fn append_update_log(message: &str) {
    append_tagged_log("update", message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_shell_log_path_places_log_under_logs_dir() {
        let path = resolve_shell_log_path(Some(PathBuf::from("/tmp/converse-root")), "shell.log")
            .expect("path should resolve when a root is known");
        assert_eq!(path, PathBuf::from("/tmp/converse-root/logs/shell.log"));
    }

    #[test]
    fn resolve_shell_log_path_is_none_without_root() {
        assert_eq!(resolve_shell_log_path(None, "shell.log"), None);
    }

    #[test]
    fn append_line_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log_path = dir.path().join("logs").join("shell.log");

        append_line(&log_path, "first line").expect("append should succeed");
        append_line(&log_path, "second line").expect("append should succeed");

        let contents = std::fs::read_to_string(&log_path).expect("log file should exist");
        assert_eq!(contents, "first line\nsecond line\n");
    }
}
