#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_events;
mod deep_link;
mod deep_link_queue;
mod dock;
mod error_report;
mod lifecycle;
mod logging;
mod main_window;
mod menus;
mod reset_flow;
mod runtime_paths;
mod session;
mod shell_locale;
mod single_instance;
mod startup_sequence;
mod tray_actions;
mod tray_setup;
mod update_flow;
mod update_runtime;
mod update_state;

pub(crate) use app_constants::*;
pub(crate) use logging::{append_shell_log, append_startup_log, append_update_log};

fn main() {
    lifecycle::run();
}
