use std::{
    collections::HashMap,
    sync::{Arc, Mutex, Weak},
};

use tauri::{AppHandle, Manager};

use crate::{append_shell_log, deep_link_queue, main_window, session::ApplicationSession, single_instance};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum AppEventKind {
    Activate,
    BeforeQuit,
    WindowAllClosed,
    OpenUrl,
    SecondInstance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AppEvent {
    Activate,
    BeforeQuit,
    WindowAllClosed,
    OpenUrl(String),
    SecondInstance(Vec<String>),
}

impl AppEvent {
    pub(crate) fn kind(&self) -> AppEventKind {
        match self {
            AppEvent::Activate => AppEventKind::Activate,
            AppEvent::BeforeQuit => AppEventKind::BeforeQuit,
            AppEvent::WindowAllClosed => AppEventKind::WindowAllClosed,
            AppEvent::OpenUrl(_) => AppEventKind::OpenUrl,
            AppEvent::SecondInstance(_) => AppEventKind::SecondInstance,
        }
    }
}

type Handler = Arc<dyn Fn(&AppEvent) + Send + Sync>;

/// Explicit table mapping platform event kinds to handlers, dispatchable and
/// detachable without a live platform event source.
#[derive(Default)]
pub(crate) struct AppEventTable {
    handlers: Mutex<HashMap<AppEventKind, Handler>>,
}

impl AppEventTable {
    pub(crate) fn register<F>(&self, kind: AppEventKind, handler: F)
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        if let Ok(mut handlers) = self.handlers.lock() {
            handlers.insert(kind, Arc::new(handler));
        }
    }

    pub(crate) fn detach_all(&self) {
        if let Ok(mut handlers) = self.handlers.lock() {
            handlers.clear();
        }
    }

    /// Returns whether a handler was attached for the event's kind. The
    /// handler runs outside the table lock so it may detach handlers itself.
    pub(crate) fn dispatch(&self, event: &AppEvent) -> bool {
        let handler = self
            .handlers
            .lock()
            .ok()
            .and_then(|handlers| handlers.get(&event.kind()).cloned());
        match handler {
            Some(handler) => {
                handler(event);
                true
            }
            None => false,
        }
    }
}

/// Attaches the default shell wiring to the table.
pub(crate) fn attach_default_handlers(table: &Arc<AppEventTable>, app_handle: AppHandle) {
    let activate_handle = app_handle.clone();
    table.register(AppEventKind::Activate, move |_| {
        main_window::show_main_window(&activate_handle);
    });

    let quit_handle = app_handle.clone();
    let weak_table: Weak<AppEventTable> = Arc::downgrade(table);
    table.register(AppEventKind::BeforeQuit, move |_| {
        if let Some(session) = quit_handle.try_state::<ApplicationSession>() {
            session.mark_terminated();
        }
        if let Some(table) = weak_table.upgrade() {
            table.detach_all();
        }
    });

    table.register(AppEventKind::WindowAllClosed, move |_| {
        append_shell_log("all windows closed; quitting");
    });

    let open_url_handle = app_handle.clone();
    table.register(AppEventKind::OpenUrl, move |event| {
        if let AppEvent::OpenUrl(url) = event {
            deep_link_queue::submit(&open_url_handle, url.clone());
        }
    });

    let second_instance_handle = app_handle;
    table.register(AppEventKind::SecondInstance, move |event| {
        if let AppEvent::SecondInstance(trailing_args) = event {
            single_instance::apply_second_instance(&second_instance_handle, trailing_args);
        }
    });
}

pub(crate) fn dispatch_managed(app_handle: &AppHandle, event: AppEvent) {
    let Some(table) = app_handle.try_state::<Arc<AppEventTable>>() else {
        append_shell_log("event table is not managed; event dropped");
        return;
    };
    if !table.dispatch(&event) {
        append_shell_log(&format!("no handler attached for {:?}", event.kind()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn dispatch_runs_the_handler_for_the_event_kind() {
        let table = AppEventTable::default();
        let activations = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&activations);
        table.register(AppEventKind::Activate, move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        assert!(table.dispatch(&AppEvent::Activate));
        assert!(table.dispatch(&AppEvent::Activate));
        assert_eq!(activations.load(Ordering::Relaxed), 2);
        assert!(!table.dispatch(&AppEvent::WindowAllClosed));
    }

    #[test]
    fn handlers_receive_the_event_payload() {
        let table = AppEventTable::default();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        table.register(AppEventKind::OpenUrl, move |event| {
            if let AppEvent::OpenUrl(url) = event {
                sink.lock().expect("sink lock").push(url.clone());
            }
        });

        table.dispatch(&AppEvent::OpenUrl("converse://add-server".to_string()));
        assert_eq!(
            seen.lock().expect("sink lock").as_slice(),
            &["converse://add-server".to_string()]
        );
    }

    #[test]
    fn a_handler_may_detach_the_whole_table() {
        let table = Arc::new(AppEventTable::default());
        let weak = Arc::downgrade(&table);

        table.register(AppEventKind::BeforeQuit, move |_| {
            if let Some(table) = weak.upgrade() {
                table.detach_all();
            }
        });
        table.register(AppEventKind::Activate, |_| {});

        assert!(table.dispatch(&AppEvent::BeforeQuit));
        assert!(!table.dispatch(&AppEvent::Activate));
        assert!(!table.dispatch(&AppEvent::BeforeQuit));
    }
}
