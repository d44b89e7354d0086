use std::{env, fs, path::Path};

use crate::{runtime_paths, DEFAULT_SHELL_LOCALE};

const LOCALE_FIELD: &str = "locale";

/// Static shell strings: tray labels, menu titles, and the update decision
/// dialogs. Localization content beyond these shell strings lives in the
/// frontend.
#[derive(Debug, Clone, Copy)]
pub struct ShellTexts {
    pub tray_hide: &'static str,
    pub tray_show: &'static str,
    pub tray_check_updates: &'static str,
    pub tray_quit: &'static str,
    pub menu_file: &'static str,
    pub menu_edit: &'static str,
    pub update_skip_title: &'static str,
    pub update_skip_message: &'static str,
    pub update_skip_ack: &'static str,
    pub update_download_title: &'static str,
    pub update_download_message: &'static str,
    pub update_download_ack: &'static str,
}

pub fn shell_texts_for_locale(locale: &str) -> ShellTexts {
    if locale == "pt-BR" {
        return ShellTexts {
            tray_hide: "Ocultar Converse",
            tray_show: "Mostrar Converse",
            tray_check_updates: "Verificar atualizações",
            tray_quit: "Sair",
            menu_file: "Arquivo",
            menu_edit: "Editar",
            update_skip_title: "Pular versão",
            update_skip_message:
                "Esta versão será ignorada até a próxima atualização estar disponível.",
            update_skip_ack: "OK",
            update_download_title: "Baixando atualização",
            update_download_message:
                "A atualização será baixada em segundo plano e instalada ao reiniciar.",
            update_download_ack: "OK",
        };
    }

    ShellTexts {
        tray_hide: "Hide Converse",
        tray_show: "Show Converse",
        tray_check_updates: "Check for Updates",
        tray_quit: "Quit",
        menu_file: "File",
        menu_edit: "Edit",
        update_skip_title: "Skip version",
        update_skip_message: "This version will be skipped until the next update is available.",
        update_skip_ack: "OK",
        update_download_title: "Downloading update",
        update_download_message:
            "The update will download in the background and install on restart.",
        update_download_ack: "OK",
    }
}

pub(crate) fn normalize_shell_locale(raw: &str) -> Option<&'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw == "en-US" {
        return Some("en-US");
    }
    if raw == "pt-BR" {
        return Some("pt-BR");
    }

    let lowered = raw.to_ascii_lowercase();
    if lowered.starts_with("en") {
        return Some("en-US");
    }
    if lowered.starts_with("pt") {
        return Some("pt-BR");
    }
    None
}

fn read_cached_shell_locale(state_path: Option<&Path>) -> Option<&'static str> {
    let raw = fs::read_to_string(state_path?).ok()?;
    let parsed: serde_json::Value = serde_json::from_str(&raw).ok()?;
    let locale = parsed.get(LOCALE_FIELD)?.as_str()?;
    normalize_shell_locale(locale)
}

pub fn resolve_shell_locale(default_shell_locale: &'static str) -> &'static str {
    let state_path = runtime_paths::shell_state_path(runtime_paths::user_data_root_dir());
    if let Some(locale) = read_cached_shell_locale(state_path.as_deref()) {
        return locale;
    }

    for env_key in ["CONVERSE_DESKTOP_LOCALE", "LC_ALL", "LANG"] {
        if let Ok(value) = env::var(env_key) {
            if let Some(locale) = normalize_shell_locale(&value) {
                return locale;
            }
        }
    }

    default_shell_locale
}

/// The resolved shell locale, fixed during the localization startup step.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResolvedShellLocale {
    pub(crate) locale: &'static str,
}

impl ResolvedShellLocale {
    pub(crate) fn texts(&self) -> ShellTexts {
        shell_texts_for_locale(self.locale)
    }
}

impl Default for ResolvedShellLocale {
    fn default() -> Self {
        Self {
            locale: DEFAULT_SHELL_LOCALE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_texts_for_locale_returns_english_copy() {
        let texts = shell_texts_for_locale("en-US");
        assert_eq!(texts.tray_hide, "Hide Converse");
        assert_eq!(texts.update_skip_title, "Skip version");
    }

    #[test]
    fn shell_texts_for_locale_returns_brazilian_portuguese_copy() {
        let texts = shell_texts_for_locale("pt-BR");
        assert_eq!(texts.tray_hide, "Ocultar Converse");
        assert_eq!(texts.tray_quit, "Sair");
    }

    #[test]
    fn normalize_shell_locale_accepts_language_prefixes() {
        assert_eq!(normalize_shell_locale("EN_us"), Some("en-US"));
        assert_eq!(normalize_shell_locale("pt_PT"), Some("pt-BR"));
        assert_eq!(normalize_shell_locale("fr-FR"), None);
        assert_eq!(normalize_shell_locale("  "), None);
    }

    #[test]
    fn cached_locale_wins_when_present_and_valid() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state_path = dir.path().join("shell_state.json");
        fs::write(&state_path, r#"{"locale":"pt-BR"}"#).expect("seed state");
        assert_eq!(read_cached_shell_locale(Some(&state_path)), Some("pt-BR"));

        fs::write(&state_path, r#"{"locale":"xx-XX"}"#).expect("seed state");
        assert_eq!(read_cached_shell_locale(Some(&state_path)), None);
    }
}
