use tauri::{
    menu::{Menu, PredefinedMenuItem, Submenu},
    AppHandle, Manager,
};

use crate::{append_startup_log, shell_locale::ResolvedShellLocale};

/// Application menu mount. Assumes the main window already exists.
pub(crate) fn mount(app_handle: &AppHandle) -> Result<(), String> {
    let texts = app_handle
        .try_state::<ResolvedShellLocale>()
        .map(|locale| locale.texts())
        .unwrap_or_else(|| ResolvedShellLocale::default().texts());

    let close_item = PredefinedMenuItem::close_window(app_handle, None)
        .map_err(|error| format!("Failed to create close-window menu item: {error}"))?;
    let quit_item = PredefinedMenuItem::quit(app_handle, None)
        .map_err(|error| format!("Failed to create quit menu item: {error}"))?;
    let file_menu = Submenu::with_items(app_handle, texts.menu_file, true, &[&close_item, &quit_item])
        .map_err(|error| format!("Failed to build file menu: {error}"))?;

    let cut_item = PredefinedMenuItem::cut(app_handle, None)
        .map_err(|error| format!("Failed to create cut menu item: {error}"))?;
    let copy_item = PredefinedMenuItem::copy(app_handle, None)
        .map_err(|error| format!("Failed to create copy menu item: {error}"))?;
    let paste_item = PredefinedMenuItem::paste(app_handle, None)
        .map_err(|error| format!("Failed to create paste menu item: {error}"))?;
    let select_all_item = PredefinedMenuItem::select_all(app_handle, None)
        .map_err(|error| format!("Failed to create select-all menu item: {error}"))?;
    let edit_menu = Submenu::with_items(
        app_handle,
        texts.menu_edit,
        true,
        &[&cut_item, &copy_item, &paste_item, &select_all_item],
    )
    .map_err(|error| format!("Failed to build edit menu: {error}"))?;

    let menu = Menu::with_items(app_handle, &[&file_menu, &edit_menu])
        .map_err(|error| format!("Failed to build application menu: {error}"))?;
    app_handle
        .set_menu(menu)
        .map_err(|error| format!("Failed to attach application menu: {error}"))?;

    append_startup_log("application menu mounted");
    Ok(())
}
