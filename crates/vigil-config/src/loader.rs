// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::Config;

/// Ordered list of config file locations searched from lowest to highest priority.
/// Later files override earlier ones.
fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. System-wide default
    paths.push(PathBuf::from("/etc/vigil/config.yaml"));
    paths.push(PathBuf::from("/etc/vigil/config.yml"));

    // 2. XDG / home
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config/vigil/config.yaml"));
        paths.push(home.join(".config/vigil/config.yml"));
    }
    if let Some(cfg) = dirs::config_dir() {
        paths.push(cfg.join("vigil/config.yaml"));
        paths.push(cfg.join("vigil/config.yml"));
    }

    // 3. Workspace-local
    paths.push(PathBuf::from(".vigil/config.yaml"));
    paths.push(PathBuf::from(".vigil/config.yml"));
    paths.push(PathBuf::from(".vigil.yaml"));
    paths.push(PathBuf::from(".vigil.yml"));
    paths.push(PathBuf::from("vigil.yaml"));
    paths.push(PathBuf::from("vigil.yml"));

    paths
}

/// Load configuration by merging all discovered YAML files, then applying
/// environment variable overrides, then an optional explicit `--config` path.
pub fn load(extra: Option<&Path>) -> anyhow::Result<Config> {
    let mut merged = serde_yaml::Value::Mapping(serde_yaml::Mapping::new());

    for path in config_search_paths() {
        if path.is_file() {
            debug!(path = %path.display(), "loading config layer");
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let layer: serde_yaml::Value = serde_yaml::from_str(&text)
                .with_context(|| format!("parsing {}", path.display()))?;
            merge_yaml(&mut merged, layer);
        }
    }

    if let Some(p) = extra {
        debug!(path = %p.display(), "loading explicit config");
        let text =
            std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
        let layer: serde_yaml::Value =
            serde_yaml::from_str(&text).with_context(|| format!("parsing {}", p.display()))?;
        merge_yaml(&mut merged, layer);
    }

    let mut config: Config = if matches!(merged, serde_yaml::Value::Mapping(ref m) if m.is_empty())
    {
        Config::default()
    } else {
        serde_yaml::from_value(merged).context("deserializing merged config layers")?
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

/// Environment-variable overrides, `VIGIL_`-prefixed, mirroring the `clap(env
/// = "VIGIL_...")` flags on the CLI so the same variables work whether or not
/// a flag was passed.
fn apply_env_overrides(config: &mut Config) {
    if let Ok(v) = std::env::var("VIGIL_OPENAI_API_KEY") {
        config.model.openai_api_key = v;
    }
    if let Ok(v) = std::env::var("VIGIL_OPENAI_MODEL") {
        config.model.openai_model = v;
    }
    if let Ok(v) = std::env::var("VIGIL_OPENAI_BASE_URL") {
        config.model.openai_base_url = v;
    }
    if let Ok(v) = std::env::var("VIGIL_CONTAINER_RUNTIME") {
        config.runtime.container_runtime = v;
    }
    if let Ok(v) = std::env::var("VIGIL_WAKE_INTERVAL_SECONDS") {
        if let Ok(n) = v.parse() {
            config.agent.wake_interval_seconds = n;
        }
    }
}

/// Deep-merge `src` into `dst`; src wins on scalar conflicts.
fn merge_yaml(dst: &mut serde_yaml::Value, src: serde_yaml::Value) {
    match (dst, src) {
        (serde_yaml::Value::Mapping(d), serde_yaml::Value::Mapping(s)) => {
            for (k, v) in s {
                let entry = d
                    .entry(k)
                    .or_insert(serde_yaml::Value::Mapping(serde_yaml::Mapping::new()));
                merge_yaml(entry, v);
            }
        }
        (dst, src) => *dst = src,
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn val(s: &str) -> serde_yaml::Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn merge_scalar_src_wins() {
        let mut dst = val("x: 1");
        let src = val("x: 2");
        merge_yaml(&mut dst, src);
        assert_eq!(dst["x"].as_i64(), Some(2));
    }

    #[test]
    fn merge_preserves_keys_not_in_src() {
        let mut dst = val("a: 1\nb: 2");
        let src = val("b: 99");
        merge_yaml(&mut dst, src);
        assert_eq!(dst["a"].as_i64(), Some(1));
        assert_eq!(dst["b"].as_i64(), Some(99));
    }

    #[test]
    fn merge_nested_tables() {
        let mut dst = val("model:\n  provider: openai\n  openai_model: gpt-4o");
        let src = val("model:\n  openai_model: gpt-4o-mini");
        merge_yaml(&mut dst, src);
        assert_eq!(dst["model"]["provider"].as_str(), Some("openai"));
        assert_eq!(dst["model"]["openai_model"].as_str(), Some("gpt-4o-mini"));
    }

    #[test]
    fn load_returns_error_when_explicit_path_missing() {
        let result = load(Some(Path::new("/tmp/vigil_nonexistent_config_xyz.yaml")));
        assert!(result.is_err());
    }

    #[test]
    fn load_with_no_extra_path_returns_defaults() {
        let cfg = load(None).unwrap();
        assert_eq!(cfg.model.provider, "openai");
    }

    #[test]
    fn load_explicit_file_overrides_defaults() {
        use std::io::Write;
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "model:\n  openai_model: test-model").unwrap();
        let cfg = load(Some(f.path())).unwrap();
        assert_eq!(cfg.model.openai_model, "test-model");
    }

    #[test]
    fn env_override_wins_over_file() {
        std::env::set_var("VIGIL_OPENAI_MODEL", "env-model");
        let cfg = load(None).unwrap();
        assert_eq!(cfg.model.openai_model, "env-model");
        std::env::remove_var("VIGIL_OPENAI_MODEL");
    }

    #[test]
    fn mistyped_field_is_an_error_not_a_silent_default() {
        use std::io::Write;
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "agent:\n  wake_interval_seconds: \"soon\"").unwrap();
        let err = load(Some(f.path())).unwrap_err();
        assert!(err.to_string().contains("deserializing merged config layers"));
    }
}
