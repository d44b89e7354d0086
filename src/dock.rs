use tauri::AppHandle;

use crate::append_startup_log;

/// Dock mount. Only macOS has a dock; elsewhere this step is a logged no-op
/// so the startup sequence keeps its fixed shape on every platform.
pub(crate) fn mount(app_handle: &AppHandle) -> Result<(), String> {
    #[cfg(target_os = "macos")]
    {
        app_handle
            .set_activation_policy(tauri::ActivationPolicy::Regular)
            .map_err(|error| format!("Failed to set dock activation policy: {error}"))?;
        append_startup_log("dock mounted");
    }

    #[cfg(not(target_os = "macos"))]
    {
        let _ = app_handle;
        append_startup_log("dock mount skipped on this platform");
    }

    Ok(())
}
