use std::{any::Any, backtrace::Backtrace, panic, process};

use crate::append_shell_log;

const FATAL_EXIT_CODE: i32 = 1;

pub(crate) fn describe_panic_payload(payload: &dyn Any) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "<non-string panic payload>".to_string()
}

/// Installs the process-wide fail-fast boundary: any panic is logged with the
/// best available diagnostic and the process exits nonzero. There is no
/// recovery path.
pub fn install_fatal_handlers() {
    panic::set_hook(Box::new(|info| {
        let message = describe_panic_payload(info.payload());
        let location = info
            .location()
            .map(|location| location.to_string())
            .unwrap_or_else(|| "<unknown location>".to_string());
        let backtrace = Backtrace::force_capture();

        let diagnostic = format!("fatal panic at {location}: {message}\n{backtrace}");
        append_shell_log(&diagnostic);
        eprintln!("{diagnostic}");
        process::exit(FATAL_EXIT_CODE);
    }));
}

/// Escalation target for failures in spawned tasks and the startup sequencer.
pub fn fatal(context: &str, error: &str) -> ! {
    let diagnostic = format!("fatal: {context}: {error}");
    append_shell_log(&diagnostic);
    eprintln!("{diagnostic}");
    process::exit(FATAL_EXIT_CODE);
}
