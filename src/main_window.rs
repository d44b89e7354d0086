use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindowBuilder};

use crate::{append_shell_log, tray_setup, APP_NAME, MAIN_WINDOW_LABEL};

pub(crate) fn create_main_window(app_handle: &AppHandle) -> Result<(), String> {
    WebviewWindowBuilder::new(
        app_handle,
        MAIN_WINDOW_LABEL,
        WebviewUrl::App("index.html".into()),
    )
    .title(APP_NAME)
    .inner_size(1100.0, 700.0)
    .min_inner_size(600.0, 400.0)
    .build()
    .map(|_| ())
    .map_err(|error| format!("Failed to create main window: {error}"))
}

pub(crate) fn show_main_window(app_handle: &AppHandle) {
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        append_shell_log("show_main_window skipped: main window not found");
        return;
    };
    if let Err(error) = window.show() {
        append_shell_log(&format!("failed to show main window: {error}"));
        return;
    }
    tray_setup::sync_toggle_label(app_handle, true);
}

pub(crate) fn hide_main_window(app_handle: &AppHandle) {
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        append_shell_log("hide_main_window skipped: main window not found");
        return;
    };
    if let Err(error) = window.hide() {
        append_shell_log(&format!("failed to hide main window: {error}"));
        return;
    }
    tray_setup::sync_toggle_label(app_handle, false);
}

pub(crate) fn toggle_main_window(app_handle: &AppHandle) {
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        append_shell_log("toggle_main_window skipped: main window not found");
        return;
    };
    match window.is_visible() {
        Ok(true) => hide_main_window(app_handle),
        Ok(false) => show_main_window(app_handle),
        Err(error) => append_shell_log(&format!(
            "failed to read main window visibility: {error}"
        )),
    }
}

/// Brings the running window to the foreground, the second-instance hand-off
/// target.
pub(crate) fn focus_main_window(app_handle: &AppHandle) {
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        append_shell_log("focus_main_window skipped: main window not found");
        return;
    };
    if let Err(error) = window.show() {
        append_shell_log(&format!("failed to show main window: {error}"));
    }
    if let Err(error) = window.unminimize() {
        append_shell_log(&format!("failed to unminimize main window: {error}"));
    }
    if let Err(error) = window.set_focus() {
        append_shell_log(&format!("failed to focus main window: {error}"));
    }
    tray_setup::sync_toggle_label(app_handle, true);
}

pub(crate) fn is_main_window_visible(app_handle: &AppHandle) -> bool {
    app_handle
        .get_webview_window(MAIN_WINDOW_LABEL)
        .and_then(|window| window.is_visible().ok())
        .unwrap_or(false)
}
