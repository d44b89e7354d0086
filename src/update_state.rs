use std::{collections::BTreeSet, fs, path::Path};

use semver::Version;
use serde_json::{Map, Value};

use crate::append_update_log;

const SKIPPED_VERSIONS_FIELD: &str = "skippedVersions";

fn empty_state_object() -> Value {
    Value::Object(Map::new())
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if let Value::Object(map) = value {
        return map;
    }

    *value = empty_state_object();
    // Safe because `value` was just replaced with an object.
    value
        .as_object_mut()
        .expect("value was just normalized into a JSON object")
}

/// Loads the set of versions the user has skipped. Missing or malformed
/// state yields an empty set; invalid version strings are ignored.
pub(crate) fn read_skipped_versions(state_path: Option<&Path>) -> BTreeSet<Version> {
    let Some(state_path) = state_path else {
        return BTreeSet::new();
    };
    let Ok(raw) = fs::read_to_string(state_path) else {
        return BTreeSet::new();
    };
    let Ok(parsed) = serde_json::from_str::<Value>(&raw) else {
        append_update_log(&format!(
            "skipped-version state {} is not valid JSON; ignoring it",
            state_path.display()
        ));
        return BTreeSet::new();
    };

    parsed
        .get(SKIPPED_VERSIONS_FIELD)
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .filter_map(|entry| Version::parse(entry).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Appends one version to the persisted skip record, preserving any other
/// fields in the shell state file.
pub(crate) fn record_skipped_version(
    state_path: Option<&Path>,
    version: &Version,
) -> Result<(), String> {
    let Some(state_path) = state_path else {
        append_update_log("shell state path is unavailable; skip record not persisted");
        return Ok(());
    };

    if let Some(parent_dir) = state_path.parent() {
        fs::create_dir_all(parent_dir).map_err(|error| {
            format!(
                "Failed to create shell state directory {}: {}",
                parent_dir.display(),
                error
            )
        })?;
    }

    let mut parsed = match fs::read_to_string(state_path) {
        Ok(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(value) => value,
            Err(error) => {
                append_update_log(&format!(
                    "failed to parse shell state {}: {}. resetting state file",
                    state_path.display(),
                    error
                ));
                empty_state_object()
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => empty_state_object(),
        Err(error) => {
            return Err(format!(
                "Failed to read shell state {}: {}",
                state_path.display(),
                error
            ));
        }
    };
    let object = ensure_object(&mut parsed);

    let entries = object
        .entry(SKIPPED_VERSIONS_FIELD.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if !entries.is_array() {
        *entries = Value::Array(Vec::new());
    }
    let entries = entries
        .as_array_mut()
        .expect("entries were just normalized into a JSON array");
    let serialized_version = Value::String(version.to_string());
    if !entries.contains(&serialized_version) {
        entries.push(serialized_version);
    }

    let serialized = serde_json::to_string_pretty(&parsed)
        .map_err(|error| format!("Failed to serialize shell state: {error}"))?;
    fs::write(state_path, serialized).map_err(|error| {
        format!(
            "Failed to write shell state {}: {}",
            state_path.display(),
            error
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(raw: &str) -> Version {
        Version::parse(raw).expect("test version should parse")
    }

    #[test]
    fn skipped_versions_round_trip_through_the_state_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state_path = dir.path().join("shell_state.json");

        record_skipped_version(Some(&state_path), &version("3.2.0")).expect("record");
        record_skipped_version(Some(&state_path), &version("3.3.0")).expect("record");
        record_skipped_version(Some(&state_path), &version("3.2.0")).expect("re-record");

        let skipped = read_skipped_versions(Some(&state_path));
        assert_eq!(
            skipped,
            [version("3.2.0"), version("3.3.0")].into_iter().collect()
        );
    }

    #[test]
    fn recording_preserves_unrelated_state_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state_path = dir.path().join("shell_state.json");
        fs::write(&state_path, r#"{"locale":"pt-BR"}"#).expect("seed state");

        record_skipped_version(Some(&state_path), &version("3.2.0")).expect("record");

        let raw = fs::read_to_string(&state_path).expect("read state");
        let parsed: Value = serde_json::from_str(&raw).expect("parse state");
        assert_eq!(parsed["locale"], "pt-BR");
        assert_eq!(parsed[SKIPPED_VERSIONS_FIELD][0], "3.2.0");
    }

    #[test]
    fn recording_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state_path = dir.path().join("nested").join("shell_state.json");

        record_skipped_version(Some(&state_path), &version("3.2.0")).expect("record");
        assert_eq!(
            read_skipped_versions(Some(&state_path)),
            [version("3.2.0")].into_iter().collect()
        );
    }

    #[test]
    fn malformed_state_is_ignored_on_read_and_reset_on_write() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state_path = dir.path().join("shell_state.json");
        fs::write(&state_path, "not json at all").expect("seed state");

        assert!(read_skipped_versions(Some(&state_path)).is_empty());

        record_skipped_version(Some(&state_path), &version("3.2.0")).expect("record");
        assert_eq!(
            read_skipped_versions(Some(&state_path)),
            [version("3.2.0")].into_iter().collect()
        );
    }

    #[test]
    fn invalid_version_entries_are_dropped_on_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state_path = dir.path().join("shell_state.json");
        fs::write(
            &state_path,
            r#"{"skippedVersions":["3.2.0","not-a-version",17]}"#,
        )
        .expect("seed state");

        assert_eq!(
            read_skipped_versions(Some(&state_path)),
            [version("3.2.0")].into_iter().collect()
        );
    }

    #[test]
    fn missing_state_path_reads_empty_and_records_without_error() {
        assert!(read_skipped_versions(None).is_empty());
        record_skipped_version(None, &version("3.2.0")).expect("no-op record");
    }
}
