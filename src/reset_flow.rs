use std::{
    env, fs,
    path::Path,
    process::{Command, Stdio},
};

use crate::RESET_APP_DATA_FLAG;

pub(crate) fn reset_requested(startup_args: &[String]) -> bool {
    startup_args.iter().any(|arg| arg == RESET_APP_DATA_FLAG)
}

pub(crate) fn strip_reset_flag(startup_args: &[String]) -> Vec<String> {
    startup_args
        .iter()
        .filter(|arg| arg.as_str() != RESET_APP_DATA_FLAG)
        .cloned()
        .collect()
}

/// Deletes everything inside the user-data directory, keeping the directory
/// itself. Fully blocking: the relaunched process reads the same path.
pub(crate) fn clear_user_data_dir(user_data_dir: &Path) -> Result<(), String> {
    let entries = match fs::read_dir(user_data_dir) {
        Ok(entries) => entries,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(error) => {
            return Err(format!(
                "Failed to read user data directory {}: {}",
                user_data_dir.display(),
                error
            ));
        }
    };

    for entry in entries {
        let entry = entry.map_err(|error| {
            format!(
                "Failed to enumerate user data directory {}: {}",
                user_data_dir.display(),
                error
            )
        })?;
        let path = entry.path();
        let result = if entry
            .file_type()
            .map_err(|error| format!("Failed to stat {}: {}", path.display(), error))?
            .is_dir()
        {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        result.map_err(|error| format!("Failed to remove {}: {}", path.display(), error))?;
    }

    Ok(())
}

/// Relaunches the current executable with the reset flag stripped from its
/// arguments. The caller exits immediately afterwards.
pub(crate) fn relaunch_without_reset_flag(startup_args: &[String]) -> Result<(), String> {
    let executable = env::current_exe()
        .map_err(|error| format!("Failed to resolve current executable: {error}"))?;

    Command::new(&executable)
        .args(strip_reset_flag(startup_args))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| {
            format!(
                "Failed to relaunch {} after reset: {}",
                executable.display(),
                error
            )
        })
}
