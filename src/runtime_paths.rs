use std::{env, path::PathBuf};

use crate::{ENVIRONMENT_ENV, ROOT_ENV, SHELL_STATE_FILE};

/// Directory name under the home directory for the current execution
/// environment. Non-production environments get a suffixed directory so a
/// development run never touches the production profile.
pub(crate) fn user_data_dir_name(environment: Option<&str>) -> String {
    match environment {
        None => ".converse".to_string(),
        Some(environment) => format!(".converse-{environment}"),
    }
}

pub(crate) fn execution_environment(env_value: Option<String>, debug_build: bool) -> Option<String> {
    let trimmed = env_value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());
    match trimmed {
        Some(value) if value == "production" => None,
        Some(value) => Some(value),
        None if debug_build => Some("development".to_string()),
        None => None,
    }
}

pub fn user_data_root_dir() -> Option<PathBuf> {
    if let Ok(root) = env::var(ROOT_ENV) {
        let path = PathBuf::from(root.trim());
        if !path.as_os_str().is_empty() {
            return Some(path);
        }
    }

    let environment =
        execution_environment(env::var(ENVIRONMENT_ENV).ok(), cfg!(debug_assertions));
    home::home_dir().map(|home| home.join(user_data_dir_name(environment.as_deref())))
}

pub fn shell_state_path(user_data_root: Option<PathBuf>) -> Option<PathBuf> {
    user_data_root.map(|root| root.join(SHELL_STATE_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_uses_the_unsuffixed_directory() {
        assert_eq!(user_data_dir_name(None), ".converse");
    }

    #[test]
    fn non_production_environments_get_their_own_directory() {
        assert_eq!(
            user_data_dir_name(Some("development")),
            ".converse-development"
        );
        assert_eq!(user_data_dir_name(Some("staging")), ".converse-staging");
    }

    #[test]
    fn execution_environment_treats_production_as_unset() {
        assert_eq!(
            execution_environment(Some("production".to_string()), false),
            None
        );
        assert_eq!(
            execution_environment(Some("production".to_string()), true),
            None
        );
    }

    #[test]
    fn execution_environment_defaults_to_development_in_debug_builds() {
        assert_eq!(
            execution_environment(None, true),
            Some("development".to_string())
        );
        assert_eq!(execution_environment(None, false), None);
    }

    #[test]
    fn execution_environment_keeps_explicit_values() {
        assert_eq!(
            execution_environment(Some("staging".to_string()), false),
            Some("staging".to_string())
        );
        assert_eq!(execution_environment(Some("  ".to_string()), false), None);
    }

    #[test]
    fn shell_state_path_lives_at_the_root() {
        let path = shell_state_path(Some(PathBuf::from("/tmp/converse-root")))
            .expect("path should resolve when a root is known");
        assert_eq!(path, PathBuf::from("/tmp/converse-root/shell_state.json"));
    }
}
