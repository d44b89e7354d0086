use std::{env, sync::Arc};

use tauri::{AppHandle, Manager, RunEvent};
use tauri_plugin_deep_link::DeepLinkExt;

use crate::{
    app_events::{self, AppEvent, AppEventTable},
    append_shell_log, append_startup_log, deep_link_queue,
    deep_link_queue::DeepLinkQueue,
    dock, error_report, main_window, menus, reset_flow, runtime_paths,
    session::ApplicationSession,
    shell_locale::{self, ResolvedShellLocale},
    single_instance,
    startup_sequence::{self, StartupStep},
    tray_setup,
    update_flow::UpdateCoordinator,
    update_runtime, update_state, DEEP_LINK_SCHEME, DEFAULT_SHELL_LOCALE, DIST_CHANNEL_ENV,
    START_EVENT,
};

/// Application-level parameters that must be in place before the webview
/// runtime spins up.
fn apply_app_parameters() {
    // WebKitGTK compositing is unstable with several Linux graphics drivers.
    #[cfg(target_os = "linux")]
    if env::var_os("WEBKIT_DISABLE_COMPOSITING_MODE").is_none() {
        env::set_var("WEBKIT_DISABLE_COMPOSITING_MODE", "1");
    }
}

fn register_url_scheme(app_handle: &AppHandle) -> Result<(), String> {
    #[cfg(any(windows, target_os = "linux"))]
    app_handle
        .deep_link()
        .register(DEEP_LINK_SCHEME)
        .map_err(|error| {
            format!("Failed to register '{DEEP_LINK_SCHEME}' URL scheme: {error}")
        })?;

    let open_url_handle = app_handle.clone();
    app_handle.deep_link().on_open_url(move |event| {
        for url in event.urls() {
            app_events::dispatch_managed(&open_url_handle, AppEvent::OpenUrl(url.to_string()));
        }
    });
    Ok(())
}

fn attach_event_handlers(app_handle: &AppHandle) -> Result<(), String> {
    let table = app_handle.state::<Arc<AppEventTable>>();
    app_events::attach_default_handlers(table.inner(), app_handle.clone());
    Ok(())
}

fn initialize_localization(app_handle: &AppHandle) -> Result<(), String> {
    let locale = shell_locale::resolve_shell_locale(DEFAULT_SHELL_LOCALE);
    app_handle.manage(ResolvedShellLocale { locale });
    append_startup_log(&format!("shell locale resolved to {locale}"));
    Ok(())
}

fn mount_main_window(app_handle: &AppHandle) -> Result<(), String> {
    main_window::create_main_window(app_handle)
}

fn mount_dock(app_handle: &AppHandle) -> Result<(), String> {
    dock::mount(app_handle)
}

fn mount_menus(app_handle: &AppHandle) -> Result<(), String> {
    menus::mount(app_handle)
}

fn mount_tray(app_handle: &AppHandle) -> Result<(), String> {
    tray_setup::setup_tray(app_handle)
}

fn prepare_update_coordinator(app_handle: &AppHandle) -> Result<(), String> {
    let session = app_handle.state::<ApplicationSession>();
    let state_path = runtime_paths::shell_state_path(session.user_data_dir.clone());
    let skipped_versions = update_state::read_skipped_versions(state_path.as_deref());
    if !skipped_versions.is_empty() {
        append_startup_log(&format!(
            "loaded {} skipped version(s) from shell state",
            skipped_versions.len()
        ));
    }

    let current_version = app_handle.package_info().version.clone();
    app_handle.manage(UpdateCoordinator::new(current_version, skipped_versions));
    Ok(())
}

fn emit_start_signal(app_handle: &AppHandle) -> Result<(), String> {
    use tauri::Emitter;
    app_handle
        .emit(START_EVENT, ())
        .map_err(|error| format!("Failed to emit start signal: {error}"))
}

fn dispatch_startup_args(app_handle: &AppHandle) -> Result<(), String> {
    let startup_args = app_handle.state::<ApplicationSession>().startup_args.clone();
    for arg in startup_args {
        deep_link_queue::submit(app_handle, arg);
    }
    Ok(())
}

fn spawn_initial_update_check(app_handle: &AppHandle) -> Result<(), String> {
    update_runtime::spawn_update_check(app_handle.clone());
    Ok(())
}

/// Post-readiness startup, in the fixed order later steps depend on: handlers
/// and localization first, then the surfaces (window before dock, menu, and
/// tray, which assume the window exists), then observers and startup args.
const STARTUP_STEPS: &[StartupStep<AppHandle>] = &[
    StartupStep { name: "register url scheme", run: register_url_scheme },
    StartupStep { name: "attach event handlers", run: attach_event_handlers },
    StartupStep { name: "initialize localization", run: initialize_localization },
    StartupStep { name: "prepare update coordinator", run: prepare_update_coordinator },
    StartupStep { name: "mount main window", run: mount_main_window },
    StartupStep { name: "mount dock", run: mount_dock },
    StartupStep { name: "mount menus", run: mount_menus },
    StartupStep { name: "mount tray", run: mount_tray },
    StartupStep { name: "emit start signal", run: emit_start_signal },
    StartupStep { name: "dispatch startup args", run: dispatch_startup_args },
    StartupStep { name: "spawn update check", run: spawn_initial_update_check },
];

#[tauri::command]
pub(crate) fn shell_is_desktop_runtime() -> bool {
    true
}

pub(crate) fn run() {
    error_report::install_fatal_handlers();
    apply_app_parameters();

    let startup_args: Vec<String> = env::args().skip(1).collect();
    let user_data_dir = runtime_paths::user_data_root_dir();
    append_startup_log(&format!("shell process starting, args: {startup_args:?}"));

    if reset_flow::reset_requested(&startup_args) {
        match &user_data_dir {
            Some(dir) => {
                append_startup_log(&format!("resetting app data at {}", dir.display()));
                if let Err(error) = reset_flow::clear_user_data_dir(dir) {
                    error_report::fatal("reset app data", &error);
                }
            }
            None => append_startup_log("user data directory unknown; nothing to reset"),
        }
        if let Err(error) = reset_flow::relaunch_without_reset_flag(&startup_args) {
            error_report::fatal("relaunch after reset", &error);
        }
        append_startup_log("app data reset complete; relaunched without the reset flag");
        return;
    }

    let channel = single_instance::distribution_channel(env::var(DIST_CHANNEL_ENV).ok().as_deref());
    let mut builder = tauri::Builder::default();
    if single_instance::should_enforce_single_instance(channel) {
        // Registered first: a denied launch exits inside plugin setup, before
        // any UI exists or user data is touched.
        builder = builder.plugin(tauri_plugin_single_instance::init(|app_handle, argv, _cwd| {
            single_instance::handle_second_instance(app_handle, argv);
        }));
    } else {
        append_startup_log("single-instance lock exempt for this distribution channel");
    }

    builder
        .plugin(tauri_plugin_deep_link::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_process::init())
        .plugin(tauri_plugin_updater::Builder::new().build())
        .manage(ApplicationSession::new(startup_args, user_data_dir))
        .manage(DeepLinkQueue::default())
        .manage(Arc::new(AppEventTable::default()))
        .invoke_handler(tauri::generate_handler![
            crate::lifecycle::shell_is_desktop_runtime,
            crate::update_runtime::update_offer_skip,
            crate::update_runtime::update_offer_remind_later,
            crate::update_runtime::update_offer_install,
        ])
        .setup(|app| {
            let app_handle = app.handle().clone();
            if let Err(error) = startup_sequence::run_startup_sequence(&app_handle, STARTUP_STEPS)
            {
                error_report::fatal("startup sequence", &error);
            }
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            RunEvent::Ready => append_startup_log("platform ready"),
            #[cfg(target_os = "macos")]
            RunEvent::Reopen { .. } => {
                app_events::dispatch_managed(app_handle, AppEvent::Activate);
            }
            RunEvent::ExitRequested { code, .. } => {
                if code.is_none() {
                    app_events::dispatch_managed(app_handle, AppEvent::WindowAllClosed);
                }
                app_events::dispatch_managed(app_handle, AppEvent::BeforeQuit);
            }
            RunEvent::Exit => append_shell_log("shell process exiting"),
            _ => {}
        });
}
