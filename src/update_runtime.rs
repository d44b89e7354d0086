use semver::Version;
use tauri::{AppHandle, Emitter, Manager};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};
use tauri_plugin_updater::UpdaterExt;

use crate::{
    append_update_log, runtime_paths,
    shell_locale::{ResolvedShellLocale, ShellTexts},
    update_flow::{ConfirmPrompt, ConfirmRequest, FoundOutcome, UpdateCoordinator},
    update_state, MAIN_WINDOW_LABEL, UPDATE_OFFER_CLOSED_EVENT, UPDATE_OFFER_EVENT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DialogSeverity {
    Info,
    Warning,
}

/// One confirmation dialog: a title, a message, a severity, and a single
/// acknowledgment button (the default).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DialogSpec {
    pub(crate) title: String,
    pub(crate) message: String,
    pub(crate) severity: DialogSeverity,
    pub(crate) ack_label: &'static str,
    pub(crate) default_button_index: usize,
}

pub(crate) fn dialog_spec_for(request: &ConfirmRequest, texts: &ShellTexts) -> DialogSpec {
    match request {
        ConfirmRequest::SkipVersion(version) => DialogSpec {
            title: format!("{} {version}", texts.update_skip_title),
            message: texts.update_skip_message.to_string(),
            severity: DialogSeverity::Warning,
            ack_label: texts.update_skip_ack,
            default_button_index: 0,
        },
        ConfirmRequest::DownloadUpdate(version) => DialogSpec {
            title: format!("{} {version}", texts.update_download_title),
            message: texts.update_download_message.to_string(),
            severity: DialogSeverity::Info,
            ack_label: texts.update_download_ack,
            default_button_index: 0,
        },
    }
}

/// Presents confirmation dialogs over the running shell. Blocking: the
/// requesting transition waits for the single acknowledgment.
pub(crate) struct ShellDialogPrompt {
    app_handle: AppHandle,
}

impl ShellDialogPrompt {
    pub(crate) fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }

    fn texts(&self) -> ShellTexts {
        self.app_handle
            .try_state::<ResolvedShellLocale>()
            .map(|locale| locale.texts())
            .unwrap_or_else(|| ResolvedShellLocale::default().texts())
    }
}

impl ConfirmPrompt for ShellDialogPrompt {
    fn acknowledge(&self, request: &ConfirmRequest) -> Result<(), String> {
        let spec = dialog_spec_for(request, &self.texts());
        let kind = match spec.severity {
            DialogSeverity::Info => MessageDialogKind::Info,
            DialogSeverity::Warning => MessageDialogKind::Warning,
        };

        let acknowledged = self
            .app_handle
            .dialog()
            .message(spec.message)
            .title(spec.title)
            .kind(kind)
            .buttons(MessageDialogButtons::OkCustom(spec.ack_label.to_string()))
            .blocking_show();
        if acknowledged {
            Ok(())
        } else {
            Err("confirmation dialog closed without acknowledgment".to_string())
        }
    }
}

fn coordinator(app_handle: &AppHandle) -> Result<tauri::State<'_, UpdateCoordinator>, String> {
    app_handle
        .try_state::<UpdateCoordinator>()
        .ok_or_else(|| "update coordinator is not ready".to_string())
}

fn close_offer_surface(app_handle: &AppHandle) {
    if let Err(error) = app_handle.emit_to(MAIN_WINDOW_LABEL, UPDATE_OFFER_CLOSED_EVENT, ()) {
        append_update_log(&format!("failed to close update offer surface: {error}"));
    }
}

/// One discovery cycle against the update endpoint, in the background. Check
/// failures are logged silently (no release published yet, or offline).
pub(crate) fn spawn_update_check(app_handle: AppHandle) {
    tauri::async_runtime::spawn(async move {
        run_update_check(app_handle).await;
    });
}

async fn run_update_check(app_handle: AppHandle) {
    let updater = match app_handle.updater() {
        Ok(updater) => updater,
        Err(error) => {
            append_update_log(&format!("failed to initialize updater: {error}"));
            return;
        }
    };

    match updater.check().await {
        Ok(Some(update)) => {
            let new_version = match Version::parse(&update.version) {
                Ok(version) => version,
                Err(error) => {
                    append_update_log(&format!(
                        "update endpoint reported unparsable version '{}': {}",
                        update.version, error
                    ));
                    return;
                }
            };
            publish_update_found(&app_handle, new_version);
        }
        Ok(None) => append_update_log("update check: already on the latest version"),
        Err(error) => {
            append_update_log(&format!("update check failed (silent): {error}"));
        }
    }
}

fn publish_update_found(app_handle: &AppHandle, new_version: Version) {
    let coordinator = match coordinator(app_handle) {
        Ok(coordinator) => coordinator,
        Err(error) => {
            append_update_log(&error);
            return;
        }
    };

    match coordinator.handle_update_found(new_version.clone()) {
        Ok(FoundOutcome::Offered) => {
            let Some(payload) = coordinator.offer_payload() else {
                append_update_log("update offer vanished before it could be published");
                return;
            };
            append_update_log(&format!(
                "update {} -> {} offered to the user",
                payload.current_version, payload.new_version
            ));
            if let Err(error) = app_handle.emit_to(MAIN_WINDOW_LABEL, UPDATE_OFFER_EVENT, payload) {
                append_update_log(&format!("failed to open update offer surface: {error}"));
            }
        }
        Ok(FoundOutcome::SuppressedSkipped) => {
            append_update_log(&format!("update {new_version} suppressed: skipped by the user"));
        }
        Ok(FoundOutcome::SuppressedNotNewer) => {
            append_update_log(&format!("update {new_version} suppressed: not newer"));
        }
        Ok(FoundOutcome::SuppressedBusy) => {
            append_update_log(&format!(
                "update {new_version} suppressed: a decision is already in flight"
            ));
        }
        Err(error) => append_update_log(&format!("update discovery failed: {error}")),
    }
}

#[tauri::command]
pub(crate) async fn update_offer_skip(app_handle: AppHandle) -> Result<(), String> {
    let prompt = ShellDialogPrompt::new(app_handle.clone());
    let version = coordinator(&app_handle)?.skip(&prompt)?;

    let state_path = runtime_paths::shell_state_path(runtime_paths::user_data_root_dir());
    if let Err(error) = update_state::record_skipped_version(state_path.as_deref(), &version) {
        append_update_log(&format!("failed to persist skipped version: {error}"));
    }
    append_update_log(&format!("update {version} skipped"));
    close_offer_surface(&app_handle);
    Ok(())
}

#[tauri::command]
pub(crate) async fn update_offer_remind_later(app_handle: AppHandle) -> Result<(), String> {
    let version = coordinator(&app_handle)?.remind_later()?;
    append_update_log(&format!("update {version} deferred until the next check"));
    close_offer_surface(&app_handle);
    Ok(())
}

/// The re-checked endpoint must still offer exactly the version the user
/// confirmed; anything else abandons the download.
fn verify_confirmed_version(endpoint_version: &str, confirmed: &Version) -> Result<(), String> {
    if endpoint_version == confirmed.to_string() {
        Ok(())
    } else {
        Err(format!(
            "endpoint now offers {endpoint_version} instead of the confirmed {confirmed}"
        ))
    }
}

#[tauri::command]
pub(crate) async fn update_offer_install(app_handle: AppHandle) -> Result<(), String> {
    let prompt = ShellDialogPrompt::new(app_handle.clone());
    let version = coordinator(&app_handle)?.install(&prompt)?;
    append_update_log(&format!("update {version} confirmed; download starting"));
    close_offer_surface(&app_handle);

    if let Err(error) = download_and_install(&app_handle, &version).await {
        match coordinator(&app_handle).and_then(|coordinator| coordinator.abandon_download()) {
            Ok(_) => append_update_log(&format!("update {version} abandoned: {error}")),
            Err(reset_error) => append_update_log(&format!(
                "failed to clear abandoned update {version}: {reset_error}"
            )),
        }
        return Err(error);
    }
    Ok(())
}

async fn download_and_install(app_handle: &AppHandle, version: &Version) -> Result<(), String> {
    let updater = app_handle
        .updater()
        .map_err(|error| format!("Failed to initialize updater: {error}"))?;
    let update = updater
        .check()
        .await
        .map_err(|error| format!("Failed to re-check update before download: {error}"))?
        .ok_or_else(|| "Update is no longer available at the endpoint.".to_string())?;
    verify_confirmed_version(&update.version, version)?;

    let downloaded_bytes = update
        .download(|_, _| {}, || {})
        .await
        .map_err(|error| format!("Failed to download update {version}: {error}"))?;

    let ready_version = coordinator(app_handle)?.download_complete()?;
    append_update_log(&format!("update {ready_version} downloaded; installing"));

    update
        .install(&downloaded_bytes)
        .map_err(|error| format!("Failed to install update {ready_version}: {error}"))?;

    append_update_log(&format!("update {ready_version} installed; restarting"));
    app_handle.request_restart();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell_locale::shell_texts_for_locale;

    fn version(raw: &str) -> Version {
        Version::parse(raw).expect("test version should parse")
    }

    #[test]
    fn skip_dialog_is_a_warning_with_a_single_default_button() {
        let texts = shell_texts_for_locale("en-US");
        let spec = dialog_spec_for(&ConfirmRequest::SkipVersion(version("3.2.0")), &texts);
        assert_eq!(spec.title, "Skip version 3.2.0");
        assert_eq!(spec.severity, DialogSeverity::Warning);
        assert_eq!(spec.ack_label, "OK");
        assert_eq!(spec.default_button_index, 0);
    }

    #[test]
    fn download_dialog_is_informational() {
        let texts = shell_texts_for_locale("en-US");
        let spec = dialog_spec_for(&ConfirmRequest::DownloadUpdate(version("3.2.0")), &texts);
        assert_eq!(spec.title, "Downloading update 3.2.0");
        assert_eq!(spec.severity, DialogSeverity::Info);
        assert_eq!(spec.default_button_index, 0);
    }

    #[test]
    fn a_drifted_endpoint_version_abandons_the_download() {
        let confirmed = version("3.2.0");
        assert!(verify_confirmed_version("3.2.0", &confirmed).is_ok());
        assert!(verify_confirmed_version("3.3.0", &confirmed).is_err());
        assert!(verify_confirmed_version("", &confirmed).is_err());
    }

    #[test]
    fn dialog_specs_follow_the_resolved_locale() {
        let texts = shell_texts_for_locale("pt-BR");
        let spec = dialog_spec_for(&ConfirmRequest::SkipVersion(version("3.2.0")), &texts);
        assert_eq!(spec.title, "Pular versão 3.2.0");
    }
}
