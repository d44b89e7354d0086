use tauri::AppHandle;

use crate::{app_events, append_shell_log, deep_link_queue, main_window};

/// How the running build was distributed. The Mac App Store enforces single
/// instance at the OS level, so the in-process lock is redundant there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DistributionChannel {
    Standalone,
    MacAppStore,
}

pub(crate) fn distribution_channel(env_value: Option<&str>) -> DistributionChannel {
    match env_value.map(str::trim) {
        Some("mas") => DistributionChannel::MacAppStore,
        _ => DistributionChannel::Standalone,
    }
}

pub(crate) fn should_enforce_single_instance(channel: DistributionChannel) -> bool {
    match channel {
        DistributionChannel::Standalone => true,
        DistributionChannel::MacAppStore => false,
    }
}

/// Runs in the lock-owning process when a denied launch hands off its
/// arguments. The first element is the denied process's executable path.
pub(crate) fn handle_second_instance(app_handle: &AppHandle, argv: Vec<String>) {
    let trailing_args: Vec<String> = argv.into_iter().skip(1).collect();
    append_shell_log(&format!(
        "second instance denied; received {} trailing argument(s)",
        trailing_args.len()
    ));
    app_events::dispatch_managed(app_handle, app_events::AppEvent::SecondInstance(trailing_args));
}

/// Default second-instance behavior: surface the running window, then route
/// the handed-off arguments like any other deep link.
pub(crate) fn apply_second_instance(app_handle: &AppHandle, trailing_args: &[String]) {
    main_window::focus_main_window(app_handle);
    for arg in trailing_args {
        deep_link_queue::submit(app_handle, arg.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distribution_channel_recognizes_the_mac_app_store() {
        assert_eq!(
            distribution_channel(Some("mas")),
            DistributionChannel::MacAppStore
        );
        assert_eq!(
            distribution_channel(Some(" mas ")),
            DistributionChannel::MacAppStore
        );
    }

    #[test]
    fn distribution_channel_defaults_to_standalone() {
        assert_eq!(distribution_channel(None), DistributionChannel::Standalone);
        assert_eq!(
            distribution_channel(Some("deb")),
            DistributionChannel::Standalone
        );
        assert_eq!(
            distribution_channel(Some("")),
            DistributionChannel::Standalone
        );
    }

    #[test]
    fn lock_is_enforced_everywhere_but_the_mac_app_store() {
        assert!(should_enforce_single_instance(
            DistributionChannel::Standalone
        ));
        assert!(!should_enforce_single_instance(
            DistributionChannel::MacAppStore
        ));
    }
}
