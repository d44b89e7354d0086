pub const APP_NAME: &str = "Converse";
pub const MAIN_WINDOW_LABEL: &str = "main";
pub const TRAY_ID: &str = "converse-tray";

pub const DEEP_LINK_SCHEME: &str = "converse";
pub const DEEP_LINK_ADD_SERVER_HOST: &str = "add-server";

pub const DEFAULT_SHELL_LOCALE: &str = "en-US";

pub const SHELL_LOG_FILE: &str = "shell.log";
pub const SHELL_STATE_FILE: &str = "shell_state.json";

pub const ROOT_ENV: &str = "CONVERSE_ROOT";
pub const ENVIRONMENT_ENV: &str = "CONVERSE_ENV";
pub const DIST_CHANNEL_ENV: &str = "CONVERSE_DIST_CHANNEL";

pub const RESET_APP_DATA_FLAG: &str = "--reset-app-data";

pub const START_EVENT: &str = "start";
pub const ADD_SERVER_EVENT: &str = "add-server";
pub const UPDATE_OFFER_EVENT: &str = "update-offer";
pub const UPDATE_OFFER_CLOSED_EVENT: &str = "update-offer-closed";
