use std::{
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
};

/// The single running process instance. Created once at process start and
/// owned by the lifecycle controller through tauri's managed state.
#[derive(Debug)]
pub(crate) struct ApplicationSession {
    pub(crate) startup_args: Vec<String>,
    pub(crate) user_data_dir: Option<PathBuf>,
    running: AtomicBool,
}

impl ApplicationSession {
    pub(crate) fn new(startup_args: Vec<String>, user_data_dir: Option<PathBuf>) -> Self {
        Self {
            startup_args,
            user_data_dir,
            running: AtomicBool::new(true),
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub(crate) fn mark_terminated(&self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::ApplicationSession;

    #[test]
    fn session_starts_running_and_terminates_once() {
        let session = ApplicationSession::new(vec!["--flag".to_string()], None);
        assert!(session.is_running());

        session.mark_terminated();
        assert!(!session.is_running());

        session.mark_terminated();
        assert!(!session.is_running());
    }
}
