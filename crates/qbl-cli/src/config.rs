//! `qbl.toml` configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use qbl_core::{IncludeMode, Order};
use qbl_render::Format;

/// Name of the per-project config file.
pub const CONFIG_FILE: &str = "qbl.toml";

/// Top-level qbl configuration. Every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QblConfig {
    /// Document title used by the renderers.
    #[serde(default = "default_title")]
    pub title: String,
    /// Output format; inferred from the output path when unset.
    #[serde(default)]
    pub format: Option<Format>,
    /// Question order; generated exams shuffle when unset.
    #[serde(default)]
    pub order: Option<Order>,
    /// Fixed seed for reproducible exams.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Compact GradeScope layout.
    #[serde(default)]
    pub compressed: bool,
    #[serde(default)]
    pub include_mode: IncludeMode,
    #[serde(default)]
    pub tags: TagConfig,
}

/// Default tag filters, merged with those given on the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagConfig {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub require: Vec<String>,
}

fn default_title() -> String {
    "Multiple Choice Quiz".to_string()
}

impl Default for QblConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            format: None,
            order: None,
            seed: None,
            compressed: false,
            include_mode: IncludeMode::default(),
            tags: TagConfig::default(),
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `path`, which must exist when given
/// 2. `qbl.toml` in the current directory
/// 3. `~/.config/qbl/config.toml`
///
/// Environment variable overrides: `QBL_SEED`, `QBL_TITLE`.
pub fn load_config_from(path: Option<&Path>) -> Result<QblConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<QblConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => QblConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Apply `QBL_SEED` and `QBL_TITLE` from `lookup`.
fn apply_env_overrides<F>(config: &mut QblConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(seed) = lookup("QBL_SEED") {
        let seed = seed
            .trim()
            .parse::<u64>()
            .with_context(|| format!("QBL_SEED is not a valid seed: {seed}"))?;
        config.seed = Some(seed);
    }
    if let Some(title) = lookup("QBL_TITLE") {
        config.title = title;
    }
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("qbl"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = QblConfig::default();
        assert_eq!(config.title, "Multiple Choice Quiz");
        assert!(config.order.is_none());
        assert_eq!(config.include_mode, IncludeMode::Restrict);
        assert!(config.seed.is_none());
        assert!(config.format.is_none());
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
title = "Midterm"
format = "gradescope"
order = "alpha"
seed = 42
compressed = true
include_mode = "mandatory"

[tags]
include = ["ownership"]
exclude = ["draft", "old"]
"#;
        let config: QblConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.title, "Midterm");
        assert_eq!(config.format, Some(Format::GradeScope));
        assert_eq!(config.order, Some(Order::Alphabetic));
        assert_eq!(config.seed, Some(42));
        assert!(config.compressed);
        assert_eq!(config.include_mode, IncludeMode::Mandatory);
        assert_eq!(config.tags.exclude, vec!["draft", "old"]);
        assert!(config.tags.require.is_empty());
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: QblConfig = toml::from_str("").unwrap();
        assert_eq!(config.title, "Multiple Choice Quiz");
        assert!(!config.compressed);
    }

    #[test]
    fn env_overrides() {
        let mut config = QblConfig::default();
        apply_env_overrides(&mut config, |key| match key {
            "QBL_SEED" => Some("7".to_string()),
            "QBL_TITLE" => Some("Quiz 3".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.title, "Quiz 3");
    }

    #[test]
    fn bad_env_seed_is_an_error() {
        let mut config = QblConfig::default();
        let err = apply_env_overrides(&mut config, |key| {
            (key == "QBL_SEED").then(|| "abc".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("QBL_SEED"));
    }

    #[test]
    fn explicit_missing_path_fails() {
        let err = load_config_from(Some(Path::new("/nonexistent/qbl.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "title = \"From file\"\norder = \"id\"\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.order, Some(Order::Id));
    }
}
