//! Daily notes convention resolution.
//!
//! The folder and date format of daily notes are not stored in one stable
//! place: they may come from a manual override, from the host application's
//! live daily-notes feature state, or from a persisted settings document.
//! None of those shapes are a contract across host versions, so resolution
//! searches broadly over untyped JSON and fails closed when no date format
//! can be established with confidence.
//!
//! Precedence: manual override, then live feature state, then the persisted
//! settings document. Within the candidate list, a later candidate's hit
//! overwrites an earlier one for each field independently, so the folder and
//! the format may come from different candidates.

use super::DailyNotesConvention;
use super::path::normalize_folder;
use serde_json::{Map, Value};
use std::collections::{HashSet, VecDeque};
use thiserror::Error;

/// Key aliases under which a candidate may store the daily notes folder.
const FOLDER_KEYS: [&str; 3] = ["folder", "directory", "path"];

/// Key aliases under which a candidate may store the date format.
const FORMAT_KEYS: [&str; 4] = ["format", "dateFormat", "filenameFormat", "fileFormat"];

/// Maximum depth of the breadth-first candidate expansion.
const MAX_SEARCH_DEPTH: usize = 4;

/// Well-known persisted settings documents, relative to the host config
/// directory, tried in order.
pub const SETTINGS_DOCUMENT_PATHS: [&str; 2] =
    ["daily-notes.json", "plugins/daily-notes/data.json"];

/// Why the convention could not be resolved. All variants abort the
/// invocation before any note is read.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConventionFailure {
    /// The host's daily notes feature state could not be located at all.
    #[error("the daily notes state of this vault could not be located")]
    PluginApiUnavailable,

    /// The daily notes feature exists but is switched off.
    #[error("the daily notes feature is disabled for this vault")]
    DailyNotesDisabled,

    /// No date format was found in any candidate source.
    #[error("no daily note date format found in the vault configuration")]
    ConfigMissing,
}

/// A manually configured convention override.
///
/// A non-empty `format` bypasses every other source, including the check
/// whether the daily notes feature is enabled at all.
#[derive(Debug, Clone, Default)]
pub struct ManualConvention {
    pub folder: Option<String>,
    pub format: Option<String>,
}

/// Snapshot of the host's daily notes feature state.
///
/// The option documents mirror the known locations such state has been
/// observed in: direct options, the result of an options getter, default
/// options, and the raw feature object itself. Hosts fill in whichever they
/// have; all are searched.
#[derive(Debug, Clone)]
pub struct DailyNotesState {
    /// Whether the feature is currently enabled.
    pub enabled: bool,
    /// Directly configured options.
    pub options: Option<Value>,
    /// Options as reported by the feature's own accessor.
    pub resolved_options: Option<Value>,
    /// Built-in defaults.
    pub default_options: Option<Value>,
    /// The feature object itself, when nothing more specific exists.
    pub raw: Value,
}

/// Read-only access to the host's configuration sources.
pub trait ConfigHost {
    /// The daily notes feature state, or `None` when it cannot be located.
    fn daily_notes_state(&self) -> Option<DailyNotesState>;

    /// Best-effort read of the first persisted settings document that parses
    /// as a JSON object. Missing and invalid documents are skipped silently.
    fn read_settings_document(&self, candidate_paths: &[&str]) -> Option<Value>;
}

/// Resolve the daily notes convention for one cleanup invocation.
///
/// The result is never cached: the underlying sources may change between
/// runs, so callers re-resolve every time.
pub fn resolve_convention(
    host: &dyn ConfigHost,
    manual: Option<&ManualConvention>,
) -> std::result::Result<DailyNotesConvention, ConventionFailure> {
    if let Some(manual) = manual
        && let Some(format) = non_empty(manual.format.as_deref())
    {
        return Ok(DailyNotesConvention {
            folder: normalize_folder(manual.folder.as_deref().unwrap_or("")),
            format: format.to_string(),
        });
    }

    let Some(state) = host.daily_notes_state() else {
        return Err(ConventionFailure::PluginApiUnavailable);
    };
    if !state.enabled {
        return Err(ConventionFailure::DailyNotesDisabled);
    }

    let settings_document = host.read_settings_document(&SETTINGS_DOCUMENT_PATHS);

    let mut candidates: Vec<&Map<String, Value>> = Vec::new();
    let roots = [
        state.options.as_ref(),
        state.resolved_options.as_ref(),
        state.default_options.as_ref(),
        Some(&state.raw),
    ];
    for root in roots.into_iter().flatten() {
        collect_nested_objects(root, &mut candidates);
    }
    if let Some(document) = settings_document.as_ref() {
        collect_nested_objects(document, &mut candidates);
    }

    let (folder, format) = pick_convention_fields(&candidates);
    match format {
        Some(format) => Ok(DailyNotesConvention {
            folder: normalize_folder(&folder),
            format,
        }),
        None => Err(ConventionFailure::ConfigMissing),
    }
}

/// Breadth-first expansion of one candidate root.
///
/// Collects every JSON object node up to [`MAX_SEARCH_DEPTH`] levels deep.
/// Arrays are neither candidates nor descended into. Visited nodes are
/// tracked by identity so shared subtrees are collected once per root.
fn collect_nested_objects<'a>(root: &'a Value, out: &mut Vec<&'a Map<String, Value>>) {
    let mut queue: VecDeque<(&'a Value, usize)> = VecDeque::new();
    let mut seen: HashSet<*const Value> = HashSet::new();
    queue.push_back((root, 0));

    while let Some((value, depth)) = queue.pop_front() {
        let Value::Object(map) = value else {
            continue;
        };
        if !seen.insert(value as *const Value) {
            continue;
        }
        out.push(map);

        if depth >= MAX_SEARCH_DEPTH {
            continue;
        }
        for child in map.values() {
            queue.push_back((child, depth + 1));
        }
    }
}

/// Scan candidates in order, letting later hits overwrite earlier ones.
fn pick_convention_fields(candidates: &[&Map<String, Value>]) -> (String, Option<String>) {
    let mut folder = String::new();
    let mut format: Option<String> = None;

    for candidate in candidates {
        if let Some(value) = string_by_keys(candidate, &FOLDER_KEYS) {
            folder = value;
        }
        if let Some(value) = string_by_keys(candidate, &FORMAT_KEYS) {
            format = Some(value);
        }
    }

    (folder, format)
}

/// First alias key whose value is a non-empty trimmed string.
fn string_by_keys(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        map.get(*key)
            .and_then(Value::as_str)
            .and_then(|value| non_empty(Some(value)))
            .map(str::to_string)
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Host backed by in-memory values.
    struct StubHost {
        state: Option<DailyNotesState>,
        settings_document: Option<Value>,
    }

    impl ConfigHost for StubHost {
        fn daily_notes_state(&self) -> Option<DailyNotesState> {
            self.state.clone()
        }

        fn read_settings_document(&self, _candidate_paths: &[&str]) -> Option<Value> {
            self.settings_document.clone()
        }
    }

    fn enabled_state(options: Value) -> DailyNotesState {
        DailyNotesState {
            enabled: true,
            options: Some(options),
            resolved_options: None,
            default_options: None,
            raw: Value::Null,
        }
    }

    fn manual(folder: Option<&str>, format: Option<&str>) -> ManualConvention {
        ManualConvention {
            folder: folder.map(str::to_string),
            format: format.map(str::to_string),
        }
    }

    #[test]
    fn manual_override_bypasses_all_other_sources() {
        let host = StubHost {
            state: None,
            settings_document: None,
        };
        let convention = resolve_convention(
            &host,
            Some(&manual(Some("/Daily/"), Some("YYYY-MM-DD"))),
        )
        .unwrap();
        assert_eq!(convention.folder, "Daily");
        assert_eq!(convention.format, "YYYY-MM-DD");
    }

    #[test]
    fn manual_override_wins_even_when_feature_is_disabled() {
        let host = StubHost {
            state: Some(DailyNotesState {
                enabled: false,
                options: None,
                resolved_options: None,
                default_options: None,
                raw: Value::Null,
            }),
            settings_document: None,
        };
        let convention =
            resolve_convention(&host, Some(&manual(None, Some("YYYY-MM-DD")))).unwrap();
        assert_eq!(convention.folder, "");
        assert_eq!(convention.format, "YYYY-MM-DD");
    }

    #[test]
    fn blank_manual_format_does_not_count_as_override() {
        let host = StubHost {
            state: Some(enabled_state(json!({"format": "YYYY-MM-DD"}))),
            settings_document: None,
        };
        let convention =
            resolve_convention(&host, Some(&manual(Some("Manual"), Some("   ")))).unwrap();
        // The blank format falls through to the live state, folder included.
        assert_eq!(convention.format, "YYYY-MM-DD");
        assert_eq!(convention.folder, "");
    }

    #[test]
    fn missing_state_is_api_unavailable() {
        let host = StubHost {
            state: None,
            settings_document: None,
        };
        assert_eq!(
            resolve_convention(&host, None),
            Err(ConventionFailure::PluginApiUnavailable)
        );
    }

    #[test]
    fn disabled_feature_fails_closed() {
        let host = StubHost {
            state: Some(DailyNotesState {
                enabled: false,
                options: Some(json!({"format": "YYYY-MM-DD"})),
                resolved_options: None,
                default_options: None,
                raw: Value::Null,
            }),
            settings_document: None,
        };
        assert_eq!(
            resolve_convention(&host, None),
            Err(ConventionFailure::DailyNotesDisabled)
        );
    }

    #[test]
    fn missing_format_everywhere_is_config_missing() {
        let host = StubHost {
            state: Some(enabled_state(json!({"folder": "Daily"}))),
            settings_document: None,
        };
        assert_eq!(
            resolve_convention(&host, None),
            Err(ConventionFailure::ConfigMissing)
        );
    }

    #[test]
    fn reads_folder_and_format_from_live_options() {
        let host = StubHost {
            state: Some(enabled_state(
                json!({"folder": "003-Journal/", "format": "YYYY-MM-DD"}),
            )),
            settings_document: None,
        };
        let convention = resolve_convention(&host, None).unwrap();
        assert_eq!(convention.folder, "003-Journal");
        assert_eq!(convention.format, "YYYY-MM-DD");
    }

    #[test]
    fn fields_may_come_from_different_candidates() {
        let host = StubHost {
            state: Some(DailyNotesState {
                enabled: true,
                options: Some(json!({"folder": "Daily"})),
                resolved_options: None,
                default_options: Some(json!({"format": "YYYY-MM-DD"})),
                raw: Value::Null,
            }),
            settings_document: None,
        };
        let convention = resolve_convention(&host, None).unwrap();
        assert_eq!(convention.folder, "Daily");
        assert_eq!(convention.format, "YYYY-MM-DD");
    }

    #[test]
    fn later_candidates_overwrite_earlier_hits() {
        let host = StubHost {
            state: Some(DailyNotesState {
                enabled: true,
                options: Some(json!({"folder": "Old", "format": "YYYY-MM-DD"})),
                resolved_options: None,
                default_options: None,
                raw: Value::Null,
            }),
            settings_document: Some(json!({"folder": "New"})),
        };
        let convention = resolve_convention(&host, None).unwrap();
        assert_eq!(convention.folder, "New");
        assert_eq!(convention.format, "YYYY-MM-DD");
    }

    #[test]
    fn nested_objects_are_searched_breadth_first() {
        let host = StubHost {
            state: Some(enabled_state(json!({
                "instance": {"settings": {"dateFormat": "DD.MM.YYYY"}}
            }))),
            settings_document: None,
        };
        let convention = resolve_convention(&host, None).unwrap();
        assert_eq!(convention.format, "DD.MM.YYYY");
    }

    #[test]
    fn search_depth_is_bounded() {
        // Six levels deep: beyond the traversal bound, never found.
        let host = StubHost {
            state: Some(enabled_state(json!({
                "a": {"b": {"c": {"d": {"e": {"format": "YYYY-MM-DD"}}}}}
            }))),
            settings_document: None,
        };
        assert_eq!(
            resolve_convention(&host, None),
            Err(ConventionFailure::ConfigMissing)
        );
    }

    #[test]
    fn arrays_are_not_descended_into() {
        let host = StubHost {
            state: Some(enabled_state(json!({
                "profiles": [{"format": "YYYY-MM-DD"}]
            }))),
            settings_document: None,
        };
        assert_eq!(
            resolve_convention(&host, None),
            Err(ConventionFailure::ConfigMissing)
        );
    }

    #[test]
    fn alias_keys_are_recognized() {
        let host = StubHost {
            state: Some(enabled_state(
                json!({"directory": "Journal", "filenameFormat": "YYYY-MM-DD"}),
            )),
            settings_document: None,
        };
        let convention = resolve_convention(&host, None).unwrap();
        assert_eq!(convention.folder, "Journal");
        assert_eq!(convention.format, "YYYY-MM-DD");
    }

    #[test]
    fn blank_and_non_string_values_are_skipped() {
        let host = StubHost {
            state: Some(enabled_state(
                json!({"folder": "  ", "format": 42, "inner": {"format": "YYYY-MM-DD"}}),
            )),
            settings_document: None,
        };
        let convention = resolve_convention(&host, None).unwrap();
        assert_eq!(convention.folder, "");
        assert_eq!(convention.format, "YYYY-MM-DD");
    }

    #[test]
    fn settings_document_fills_in_when_state_has_no_format() {
        let host = StubHost {
            state: Some(enabled_state(json!({}))),
            settings_document: Some(json!({"folder": "Daily", "format": "YYYY-MM-DD"})),
        };
        let convention = resolve_convention(&host, None).unwrap();
        assert_eq!(convention.folder, "Daily");
        assert_eq!(convention.format, "YYYY-MM-DD");
    }

    #[test]
    fn raw_feature_object_is_searched_last_among_state_sources() {
        let host = StubHost {
            state: Some(DailyNotesState {
                enabled: true,
                options: Some(json!({"format": "YYYY-MM-DD"})),
                resolved_options: None,
                default_options: None,
                raw: json!({"format": "DD.MM.YYYY"}),
            }),
            settings_document: None,
        };
        // Later candidates win, so the raw object overrides direct options.
        let convention = resolve_convention(&host, None).unwrap();
        assert_eq!(convention.format, "DD.MM.YYYY");
    }
}
