use serde::Serialize;
use tauri::{AppHandle, Emitter};
use url::Url;

use crate::{
    append_shell_log, ADD_SERVER_EVENT, DEEP_LINK_ADD_SERVER_HOST, DEEP_LINK_SCHEME,
    MAIN_WINDOW_LABEL,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DeepLinkAction {
    AddServer(Url),
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddServerPayload {
    pub(crate) server_url: String,
}

fn parse_server_url(raw: &str) -> Result<Url, String> {
    let parsed = Url::parse(raw).map_err(|error| format!("invalid server URL: {error}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(format!("unsupported server URL scheme '{scheme}'")),
    }
}

/// Classifies a startup argument, second-instance argument, or open-url
/// payload. Anything unrecognized is an error the caller logs and drops.
pub(crate) fn classify(input: &str) -> Result<DeepLinkAction, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("empty deep link input".to_string());
    }

    let parsed = Url::parse(trimmed).map_err(|error| format!("not a deep link: {error}"))?;

    if parsed.scheme() == DEEP_LINK_SCHEME {
        if parsed.host_str() != Some(DEEP_LINK_ADD_SERVER_HOST) {
            return Err(format!(
                "unrecognized {DEEP_LINK_SCHEME} operation '{}'",
                parsed.host_str().unwrap_or("<none>")
            ));
        }

        let server_url = parsed
            .query_pairs()
            .find(|(key, _)| key == "url")
            .map(|(_, value)| value.into_owned())
            .ok_or_else(|| "add-server link is missing the 'url' parameter".to_string())?;
        return parse_server_url(&server_url).map(DeepLinkAction::AddServer);
    }

    // A plain https://host argument is shorthand for the server-add flow.
    parse_server_url(trimmed).map(DeepLinkAction::AddServer)
}

fn dispatch(app_handle: &AppHandle, action: DeepLinkAction) {
    match action {
        DeepLinkAction::AddServer(server_url) => {
            append_shell_log(&format!("deep link: add server {server_url}"));
            let payload = AddServerPayload {
                server_url: server_url.to_string(),
            };
            if let Err(error) = app_handle.emit_to(MAIN_WINDOW_LABEL, ADD_SERVER_EVENT, payload) {
                append_shell_log(&format!("failed to forward add-server deep link: {error}"));
            }
        }
    }
}

/// Processes one input end to end. Malformed input is logged and dropped with
/// no side effects.
pub(crate) fn process(app_handle: &AppHandle, input: &str) {
    match classify(input) {
        Ok(action) => dispatch(app_handle, action),
        Err(reason) => append_shell_log(&format!("dropped deep link input '{input}': {reason}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_server_target(input: &str) -> String {
        match classify(input).expect("input should classify") {
            DeepLinkAction::AddServer(url) => url.to_string(),
        }
    }

    #[test]
    fn classify_accepts_add_server_links() {
        assert_eq!(
            add_server_target("converse://add-server?url=https%3A%2F%2Fopen.converse.chat"),
            "https://open.converse.chat/"
        );
    }

    #[test]
    fn classify_accepts_plain_server_urls() {
        assert_eq!(
            add_server_target("https://chat.example.org"),
            "https://chat.example.org/"
        );
        assert_eq!(
            add_server_target("http://localhost:3000"),
            "http://localhost:3000/"
        );
    }

    #[test]
    fn classify_rejects_unknown_operations() {
        assert!(classify("converse://open-room?id=42").is_err());
        assert!(classify("converse://").is_err());
    }

    #[test]
    fn classify_rejects_missing_or_malformed_payloads() {
        assert!(classify("converse://add-server").is_err());
        assert!(classify("converse://add-server?url=ftp%3A%2F%2Fbad").is_err());
        assert!(classify("converse://add-server?url=not-a-url").is_err());
    }

    #[test]
    fn classify_rejects_non_link_arguments() {
        assert!(classify("--some-flag").is_err());
        assert!(classify("").is_err());
        assert!(classify("mailto:someone@example.org").is_err());
    }
}
