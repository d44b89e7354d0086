use tauri::{
    menu::{Menu, MenuItem, PredefinedMenuItem},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    AppHandle, Manager,
};

use crate::{
    append_shell_log, main_window, session::ApplicationSession,
    shell_locale::ResolvedShellLocale, tray_actions, update_runtime, APP_NAME, TRAY_ID,
};

/// The menu item whose label tracks main-window visibility.
#[derive(Clone)]
pub(crate) struct TrayMenuState {
    toggle_item: MenuItem<tauri::Wry>,
}

pub(crate) fn setup_tray(app_handle: &AppHandle) -> Result<(), String> {
    let texts = app_handle
        .try_state::<ResolvedShellLocale>()
        .map(|locale| locale.texts())
        .unwrap_or_else(|| ResolvedShellLocale::default().texts());
    let toggle_label = if main_window::is_main_window_visible(app_handle) {
        texts.tray_hide
    } else {
        texts.tray_show
    };

    let toggle_item = MenuItem::with_id(
        app_handle,
        tray_actions::TRAY_MENU_TOGGLE_WINDOW,
        toggle_label,
        true,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create tray toggle menu item: {error}"))?;
    let check_updates_item = MenuItem::with_id(
        app_handle,
        tray_actions::TRAY_MENU_CHECK_UPDATES,
        texts.tray_check_updates,
        true,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create tray update-check menu item: {error}"))?;
    let quit_item = MenuItem::with_id(
        app_handle,
        tray_actions::TRAY_MENU_QUIT,
        texts.tray_quit,
        true,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create tray quit menu item: {error}"))?;
    let separator = PredefinedMenuItem::separator(app_handle)
        .map_err(|error| format!("Failed to create tray separator menu item: {error}"))?;

    let menu = Menu::with_items(
        app_handle,
        &[&toggle_item, &check_updates_item, &separator, &quit_item],
    )
    .map_err(|error| format!("Failed to build tray menu: {error}"))?;

    if !app_handle.manage(TrayMenuState {
        toggle_item: toggle_item.clone(),
    }) {
        append_shell_log("tray menu state already exists, skipping manage");
    }

    let tray_builder = TrayIconBuilder::with_id(TRAY_ID)
        .menu(&menu)
        .tooltip(APP_NAME)
        .icon(tauri::include_image!("./icons/tray.png"))
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| handle_tray_menu_event(app, event.id().as_ref()))
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                main_window::toggle_main_window(tray.app_handle());
            }
        });

    #[cfg(target_os = "macos")]
    let tray_builder = tray_builder.icon_as_template(true);

    tray_builder
        .build(app_handle)
        .map_err(|error| format!("Failed to create tray icon: {error}"))?;

    Ok(())
}

fn handle_tray_menu_event(app_handle: &AppHandle, menu_id: &str) {
    match tray_actions::action_from_menu_id(menu_id) {
        Some(tray_actions::TrayMenuAction::ToggleWindow) => {
            main_window::toggle_main_window(app_handle);
        }
        Some(tray_actions::TrayMenuAction::CheckUpdates) => {
            append_shell_log("tray requested an update check");
            update_runtime::spawn_update_check(app_handle.clone());
        }
        Some(tray_actions::TrayMenuAction::Quit) => {
            if let Some(session) = app_handle.try_state::<ApplicationSession>() {
                if !session.is_running() {
                    return;
                }
                session.mark_terminated();
            }
            append_shell_log("tray quit requested, exiting shell process");
            app_handle.exit(0);
        }
        None => {}
    }
}

pub(crate) fn sync_toggle_label(app_handle: &AppHandle, visible: bool) {
    let Some(tray_state) = app_handle.try_state::<TrayMenuState>() else {
        return;
    };
    let texts = app_handle
        .try_state::<ResolvedShellLocale>()
        .map(|locale| locale.texts())
        .unwrap_or_else(|| ResolvedShellLocale::default().texts());

    let label = if visible { texts.tray_hide } else { texts.tray_show };
    if let Err(error) = tray_state.toggle_item.set_text(label) {
        append_shell_log(&format!("failed to update tray toggle label: {error}"));
    }
}
