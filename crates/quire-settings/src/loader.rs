//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`QuireSettings::default()`]
//! 2. If `~/.quire/settings.json` exists, deep-merge user values over defaults
//! 3. Apply environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::QuireSettings;

/// Resolve the path to the settings file (`~/.quire/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".quire").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<QuireSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<QuireSettings> {
    let mut settings = load_file_layer(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Defaults with the file layer merged on top; no env overrides.
fn load_file_layer(path: &Path) -> Result<QuireSettings> {
    let defaults = serde_json::to_value(QuireSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// - Integers must be valid and within the specified range
/// - Booleans accept: `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`
/// - Invalid values are ignored with a warning (fall back to file/default)
pub fn apply_env_overrides(settings: &mut QuireSettings) {
    apply_overrides(settings, |name| std::env::var(name).ok());
}

/// Apply overrides from an arbitrary variable source.
fn apply_overrides(settings: &mut QuireSettings, lookup: impl Fn(&str) -> Option<String>) {
    let env = EnvSource { lookup };

    // ── Workspace ───────────────────────────────────────────────────
    if let Some(v) = env.string("QUIRE_WORKSPACE_ROOT") {
        settings.workspace.root = v;
    }
    if let Some(v) = env.string("QUIRE_ACTIVE_CLASS") {
        settings.workspace.active_class = v;
    }

    // ── Links and compile ───────────────────────────────────────────
    if let Some(v) = env.string("QUIRE_BACKEND_URL") {
        settings.server.backend_url = v;
    }
    if let Some(v) = env.string("QUIRE_TYPESET_PROGRAM") {
        settings.compile.typeset_program = v;
    }
    if let Some(v) = env.u64("QUIRE_COMPILE_TIMEOUT_MS", 1000, 3_600_000) {
        settings.compile.timeout_ms = v;
    }

    // ── Search ──────────────────────────────────────────────────────
    if let Some(v) = env.string("QUIRE_SEARCH_API_KEY") {
        settings.search.api_key = Some(v);
    }
    if let Some(v) = env.u32("QUIRE_SEARCH_RESULTS", 1, 20) {
        settings.search.num_results = v;
    }

    // ── Drive ───────────────────────────────────────────────────────
    if let Some(v) = env
        .string("QUIRE_DRIVE_API_KEY")
        .or_else(|| env.string("COMPOSIO_API_KEY"))
    {
        settings.drive.api_key = Some(v);
    }
    if let Some(v) = env.string("QUIRE_DRIVE_USER_ID") {
        settings.drive.user_id = Some(v);
    }

    // ── Context and logging ─────────────────────────────────────────
    if let Some(v) = env.bool("QUIRE_INCLUDE_PROGRESS") {
        settings.context.include_progress = v;
    }
    if let Some(v) = env.bool("QUIRE_INCLUDE_FACT_CHECK") {
        settings.context.include_fact_check = v;
    }
    if let Some(v) = env.string("QUIRE_LOG_LEVEL") {
        settings.logging.level = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u32` within a range.
pub fn parse_u32_range(val: &str, min: u32, max: u32) -> Option<u32> {
    let n: u32 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

struct EnvSource<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> EnvSource<F> {
    fn string(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|v| !v.is_empty())
    }

    fn bool(&self, name: &str) -> Option<bool> {
        let val = (self.lookup)(name)?;
        let result = parse_bool(&val);
        if result.is_none() {
            tracing::warn!(key = name, value = %val, "invalid boolean env var, ignoring");
        }
        result
    }

    fn u32(&self, name: &str, min: u32, max: u32) -> Option<u32> {
        let val = (self.lookup)(name)?;
        let result = parse_u32_range(&val, min, max);
        if result.is_none() {
            tracing::warn!(key = name, value = %val, "invalid u32 env var, ignoring");
        }
        result
    }

    fn u64(&self, name: &str, min: u64, max: u64) -> Option<u64> {
        let val = (self.lookup)(name)?;
        let result = parse_u64_range(&val, min, max);
        if result.is_none() {
            tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
        }
        result
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::errors::SettingsError;

    fn overrides(vars: &[(&str, &str)]) -> QuireSettings {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let mut settings = QuireSettings::default();
        apply_overrides(&mut settings, |name| map.get(name).cloned());
        settings
    }

    // ── deep_merge ──────────────────────────────────────────────────

    #[test]
    fn merge_nested_override() {
        let target = serde_json::json!({
            "compile": {"timeoutMs": 120000, "typesetProgram": "pdflatex"}
        });
        let source = serde_json::json!({
            "compile": {"timeoutMs": 5000}
        });
        let merged = deep_merge(target, source);
        assert_eq!(merged["compile"]["timeoutMs"], 5000);
        assert_eq!(merged["compile"]["typesetProgram"], "pdflatex");
    }

    #[test]
    fn merge_array_replace() {
        let target = serde_json::json!({"items": [1, 2, 3]});
        let source = serde_json::json!({"items": [4, 5]});
        let merged = deep_merge(target, source);
        assert_eq!(merged["items"], serde_json::json!([4, 5]));
    }

    #[test]
    fn merge_null_preserves_target() {
        let target = serde_json::json!({"a": 1, "b": 2});
        let source = serde_json::json!({"a": null});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn merge_primitive_replaces_object() {
        let target = serde_json::json!({"a": {"nested": true}});
        let source = serde_json::json!({"a": 42});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 42);
    }

    // ── file layer ──────────────────────────────────────────────────

    #[test]
    fn load_missing_file_returns_defaults() {
        let settings = load_file_layer(Path::new("/nonexistent/settings.json")).unwrap();
        assert_eq!(settings.compile.timeout_ms, 120_000);
        assert_eq!(settings.workspace.root, "classes");
    }

    #[test]
    fn load_partial_json_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"workspace": {"activeClass": "math-104"}, "search": {"apiKey": "k"}}"#,
        )
        .unwrap();

        let settings = load_file_layer(&path).unwrap();
        assert_eq!(settings.workspace.active_class, "math-104");
        assert_eq!(settings.workspace.root, "classes");
        assert_eq!(settings.search.api_key.as_deref(), Some("k"));
        assert_eq!(settings.search.num_results, 5);
    }

    #[test]
    fn load_invalid_json_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not valid json").unwrap();

        let result = load_file_layer(&path);
        assert!(matches!(result.unwrap_err(), SettingsError::Json(_)));
    }

    // ── env overrides ───────────────────────────────────────────────

    #[test]
    fn env_overrides_apply() {
        let s = overrides(&[
            ("QUIRE_WORKSPACE_ROOT", "/srv/classes"),
            ("QUIRE_ACTIVE_CLASS", "topology"),
            ("QUIRE_COMPILE_TIMEOUT_MS", "60000"),
            ("QUIRE_SEARCH_API_KEY", "secret"),
            ("QUIRE_INCLUDE_PROGRESS", "yes"),
        ]);
        assert_eq!(s.workspace.root, "/srv/classes");
        assert_eq!(s.workspace.active_class, "topology");
        assert_eq!(s.compile.timeout_ms, 60_000);
        assert_eq!(s.search.api_key.as_deref(), Some("secret"));
        assert!(s.context.include_progress);
    }

    #[test]
    fn invalid_env_values_are_ignored() {
        let s = overrides(&[
            ("QUIRE_COMPILE_TIMEOUT_MS", "5"),
            ("QUIRE_SEARCH_RESULTS", "many"),
            ("QUIRE_INCLUDE_FACT_CHECK", "maybe"),
            ("QUIRE_BACKEND_URL", ""),
        ]);
        assert_eq!(s.compile.timeout_ms, 120_000);
        assert_eq!(s.search.num_results, 5);
        assert!(!s.context.include_fact_check);
        assert_eq!(s.server.backend_url, "http://localhost:8200");
    }

    #[test]
    fn drive_key_falls_back_to_composio_var() {
        let s = overrides(&[("COMPOSIO_API_KEY", "ck")]);
        assert_eq!(s.drive.api_key.as_deref(), Some("ck"));
        assert!(s.drive_enabled());

        let s = overrides(&[("COMPOSIO_API_KEY", "ck"), ("QUIRE_DRIVE_API_KEY", "qk")]);
        assert_eq!(s.drive.api_key.as_deref(), Some("qk"));
    }

    // ── parsing ─────────────────────────────────────────────────────

    #[test]
    fn parse_bool_variants() {
        for val in &["true", "1", "yes", "on", "TRUE"] {
            assert_eq!(parse_bool(val), Some(true), "failed for {val}");
        }
        for val in &["false", "0", "no", "off", "Off"] {
            assert_eq!(parse_bool(val), Some(false), "failed for {val}");
        }
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn parse_ranges() {
        assert_eq!(parse_u32_range("5", 1, 20), Some(5));
        assert_eq!(parse_u32_range("0", 1, 20), None);
        assert_eq!(parse_u64_range("1000", 1000, 3_600_000), Some(1000));
        assert_eq!(parse_u64_range("abc", 1000, 3_600_000), None);
    }
}
