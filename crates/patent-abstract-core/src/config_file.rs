use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub extraction: Option<ExtractionConfig>,
    pub rules: Option<RulesConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Heading x-position (fraction of page width) above which page 1 is
    /// treated as multi-column.
    pub column_threshold: Option<f32>,
    /// Layout units to the left of the heading where the column clip starts.
    pub column_margin: Option<f32>,
    pub max_pages: Option<usize>,
    pub heading_pattern: Option<String>,
    pub search_term: Option<String>,
    pub expand_ligatures: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Replaces the built-in exact-match noise tokens.
    pub noise_tokens: Option<Vec<String>>,
    /// Appended to the noise tokens.
    pub extra_noise_tokens: Option<Vec<String>>,
    /// Replaces the built-in split-word suffixes.
    pub join_suffixes: Option<Vec<String>>,
    pub extra_noise_patterns: Option<Vec<String>>,
    pub extra_stop_patterns: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub color: Option<bool>,
    pub json: Option<bool>,
}

/// Platform config directory path: `<config_dir>/patent-abstract/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("patent-abstract").join("config.toml"))
}

/// Load config by cascading CWD `.patent-abstract.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".patent-abstract.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        extraction: merge_section(base.extraction, overlay.extraction, |b, o| ExtractionConfig {
            column_threshold: o.column_threshold.or(b.column_threshold),
            column_margin: o.column_margin.or(b.column_margin),
            max_pages: o.max_pages.or(b.max_pages),
            heading_pattern: o.heading_pattern.or(b.heading_pattern),
            search_term: o.search_term.or(b.search_term),
            expand_ligatures: o.expand_ligatures.or(b.expand_ligatures),
        }),
        rules: merge_section(base.rules, overlay.rules, |b, o| RulesConfig {
            noise_tokens: o.noise_tokens.or(b.noise_tokens),
            extra_noise_tokens: o.extra_noise_tokens.or(b.extra_noise_tokens),
            join_suffixes: o.join_suffixes.or(b.join_suffixes),
            extra_noise_patterns: o.extra_noise_patterns.or(b.extra_noise_patterns),
            extra_stop_patterns: o.extra_stop_patterns.or(b.extra_stop_patterns),
        }),
        output: merge_section(base.output, overlay.output, |b, o| OutputConfig {
            color: o.color.or(b.color),
            json: o.json.or(b.json),
        }),
    }
}

fn merge_section<T>(base: Option<T>, overlay: Option<T>, f: impl FnOnce(T, T) -> T) -> Option<T> {
    match (base, overlay) {
        (None, None) => None,
        (Some(b), None) => Some(b),
        (None, Some(o)) => Some(o),
        (Some(b), Some(o)) => Some(f(b, o)),
    }
}
