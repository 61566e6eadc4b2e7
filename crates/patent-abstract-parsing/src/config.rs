use regex::Regex;
use thiserror::Error;

use patent_abstract_core::config_file::ConfigFile;

pub const DEFAULT_SEARCH_TERM: &str = "ABSTRACT";
pub const DEFAULT_COLUMN_THRESHOLD: f32 = 0.55;
pub const DEFAULT_COLUMN_MARGIN: f32 = 200.0;
pub const DEFAULT_MAX_PAGES: usize = 3;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid regex: {0}")]
    InvalidRegex(#[from] regex::Error),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },
}

/// Controls how a list of patterns/values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }
}

/// Configuration for the abstract extraction pipeline.
///
/// Use [`AbstractConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone)]
pub struct AbstractConfig {
    // ── heading.rs ──
    /// String the backend searches page 1 for to get heading geometry.
    pub(crate) search_term: String,
    /// Heading x-fraction above which page 1 is treated as multi-column.
    pub(crate) column_threshold: f32,
    /// Distance left of the heading where the column clip starts.
    pub(crate) column_margin: f32,
    /// Number of leading pages scanned.
    pub(crate) max_pages: usize,
    pub(crate) expand_ligatures: bool,

    // ── section.rs ──
    /// Heading regex for slicing; `None` means whole-word case-insensitive "ABSTRACT".
    pub(crate) heading_re: Option<Regex>,

    // ── classify.rs ──
    /// Lines equal to one of these tokens are noise.
    pub(crate) noise_tokens: ListOverride<String>,
    pub(crate) extra_noise_patterns: Vec<Regex>,
    pub(crate) extra_stop_patterns: Vec<Regex>,

    // ── join.rs ──
    /// Suffixes that complete a five-letter stem across a line break.
    pub(crate) join_suffixes: ListOverride<String>,
}

impl Default for AbstractConfig {
    fn default() -> Self {
        Self {
            search_term: DEFAULT_SEARCH_TERM.to_string(),
            column_threshold: DEFAULT_COLUMN_THRESHOLD,
            column_margin: DEFAULT_COLUMN_MARGIN,
            max_pages: DEFAULT_MAX_PAGES,
            expand_ligatures: true,
            heading_re: None,
            noise_tokens: ListOverride::Default,
            extra_noise_patterns: Vec::new(),
            extra_stop_patterns: Vec::new(),
            join_suffixes: ListOverride::Default,
        }
    }
}

impl AbstractConfig {
    pub fn column_threshold(&self) -> f32 {
        self.column_threshold
    }

    pub fn column_margin(&self) -> f32 {
        self.column_margin
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }
}

/// Builder for [`AbstractConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
/// Fails fast if any pattern is invalid or a threshold is out of range.
#[derive(Debug, Clone, Default)]
pub struct AbstractConfigBuilder {
    search_term: Option<String>,
    column_threshold: Option<f32>,
    column_margin: Option<f32>,
    max_pages: Option<usize>,
    expand_ligatures: Option<bool>,
    heading_re: Option<String>,
    noise_tokens: ListOverride<String>,
    extra_noise_patterns: Vec<String>,
    extra_stop_patterns: Vec<String>,
    join_suffixes: ListOverride<String>,
}

impl AbstractConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder from an on-disk config. Unset fields keep their defaults.
    pub fn from_config_file(file: &ConfigFile) -> Self {
        let mut builder = Self::new();

        if let Some(extraction) = &file.extraction {
            builder.search_term = extraction.search_term.clone();
            builder.column_threshold = extraction.column_threshold;
            builder.column_margin = extraction.column_margin;
            builder.max_pages = extraction.max_pages;
            builder.expand_ligatures = extraction.expand_ligatures;
            builder.heading_re = extraction.heading_pattern.clone();
        }

        if let Some(rules) = &file.rules {
            if let Some(tokens) = &rules.noise_tokens {
                builder = builder.set_noise_tokens(tokens.clone());
            }
            for token in rules.extra_noise_tokens.iter().flatten() {
                builder = builder.add_noise_token(token.clone());
            }
            if let Some(suffixes) = &rules.join_suffixes {
                builder = builder.set_join_suffixes(suffixes.clone());
            }
            for pattern in rules.extra_noise_patterns.iter().flatten() {
                builder = builder.add_noise_pattern(pattern);
            }
            for pattern in rules.extra_stop_patterns.iter().flatten() {
                builder = builder.add_stop_pattern(pattern);
            }
        }

        builder
    }

    // ── Heading / layout ──

    pub fn search_term(mut self, term: &str) -> Self {
        self.search_term = Some(term.to_string());
        self
    }

    pub fn column_threshold(mut self, fraction: f32) -> Self {
        self.column_threshold = Some(fraction);
        self
    }

    pub fn column_margin(mut self, margin: f32) -> Self {
        self.column_margin = Some(margin);
        self
    }

    pub fn max_pages(mut self, n: usize) -> Self {
        self.max_pages = Some(n);
        self
    }

    pub fn expand_ligatures(mut self, enabled: bool) -> Self {
        self.expand_ligatures = Some(enabled);
        self
    }

    pub fn heading_regex(mut self, pattern: &str) -> Self {
        self.heading_re = Some(pattern.to_string());
        self
    }

    // ── Noise tokens ──

    pub fn set_noise_tokens(mut self, tokens: Vec<String>) -> Self {
        self.noise_tokens = ListOverride::Replace(tokens);
        self
    }

    pub fn add_noise_token(mut self, token: String) -> Self {
        match &mut self.noise_tokens {
            ListOverride::Extend(v) | ListOverride::Replace(v) => v.push(token),
            ListOverride::Default => self.noise_tokens = ListOverride::Extend(vec![token]),
        }
        self
    }

    // ── Extra rules ──

    pub fn add_noise_pattern(mut self, pattern: &str) -> Self {
        self.extra_noise_patterns.push(pattern.to_string());
        self
    }

    pub fn add_stop_pattern(mut self, pattern: &str) -> Self {
        self.extra_stop_patterns.push(pattern.to_string());
        self
    }

    // ── Join suffixes ──

    pub fn set_join_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.join_suffixes = ListOverride::Replace(suffixes);
        self
    }

    pub fn add_join_suffix(mut self, suffix: String) -> Self {
        match &mut self.join_suffixes {
            ListOverride::Extend(v) | ListOverride::Replace(v) => v.push(suffix),
            ListOverride::Default => self.join_suffixes = ListOverride::Extend(vec![suffix]),
        }
        self
    }

    /// Compile all patterns, validate scalars, and produce an [`AbstractConfig`].
    pub fn build(self) -> Result<AbstractConfig, ConfigError> {
        let column_threshold = self.column_threshold.unwrap_or(DEFAULT_COLUMN_THRESHOLD);
        if !(column_threshold > 0.0 && column_threshold < 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "column_threshold",
                reason: format!("{column_threshold} is not between 0 and 1"),
            });
        }

        let column_margin = self.column_margin.unwrap_or(DEFAULT_COLUMN_MARGIN);
        if !column_margin.is_finite() || column_margin < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "column_margin",
                reason: format!("{column_margin} is negative or not finite"),
            });
        }

        let max_pages = self.max_pages.unwrap_or(DEFAULT_MAX_PAGES);
        if max_pages == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_pages",
                reason: "at least one page must be scanned".into(),
            });
        }

        let search_term = self
            .search_term
            .unwrap_or_else(|| DEFAULT_SEARCH_TERM.to_string());
        if search_term.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "search_term",
                reason: "must not be empty".into(),
            });
        }

        let compile_all = |patterns: Vec<String>| -> Result<Vec<Regex>, regex::Error> {
            patterns.iter().map(|p| Regex::new(p)).collect()
        };

        Ok(AbstractConfig {
            search_term,
            column_threshold,
            column_margin,
            max_pages,
            expand_ligatures: self.expand_ligatures.unwrap_or(true),
            heading_re: self.heading_re.map(|p| Regex::new(&p)).transpose()?,
            noise_tokens: self.noise_tokens,
            extra_noise_patterns: compile_all(self.extra_noise_patterns)?,
            extra_stop_patterns: compile_all(self.extra_stop_patterns)?,
            join_suffixes: self.join_suffixes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patent_abstract_core::config_file::{ExtractionConfig, RulesConfig};

    #[test]
    fn test_default_config() {
        let config = AbstractConfig::default();
        assert!((config.column_threshold - 0.55).abs() < f32::EPSILON);
        assert!((config.column_margin - 200.0).abs() < f32::EPSILON);
        assert_eq!(config.max_pages, 3);
        assert_eq!(config.search_term, "ABSTRACT");
        assert!(config.expand_ligatures);
    }

    #[test]
    fn test_builder_basic() {
        let config = AbstractConfigBuilder::new()
            .column_threshold(0.6)
            .column_margin(150.0)
            .max_pages(2)
            .build()
            .unwrap();
        assert!((config.column_threshold - 0.6).abs() < f32::EPSILON);
        assert!((config.column_margin - 150.0).abs() < f32::EPSILON);
        assert_eq!(config.max_pages, 2);
    }

    #[test]
    fn test_builder_invalid_regex() {
        let result = AbstractConfigBuilder::new()
            .add_noise_pattern(r"[invalid")
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidRegex(_))));
    }

    #[test]
    fn test_builder_rejects_out_of_range_values() {
        assert!(
            AbstractConfigBuilder::new()
                .column_threshold(1.5)
                .build()
                .is_err()
        );
        assert!(
            AbstractConfigBuilder::new()
                .column_margin(-1.0)
                .build()
                .is_err()
        );
        assert!(AbstractConfigBuilder::new().max_pages(0).build().is_err());
        assert!(AbstractConfigBuilder::new().search_term(" ").build().is_err());
    }

    #[test]
    fn test_list_override_resolve() {
        let defaults = vec!["a".to_string(), "b".to_string()];

        let d: ListOverride<String> = ListOverride::Default;
        assert_eq!(d.resolve(&defaults), defaults);

        let r: ListOverride<String> = ListOverride::Replace(vec!["x".to_string()]);
        assert_eq!(r.resolve(&defaults), vec!["x".to_string()]);

        let e: ListOverride<String> = ListOverride::Extend(vec!["c".to_string()]);
        assert_eq!(
            e.resolve(&defaults),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn test_add_token_after_replace_keeps_replacement() {
        let config = AbstractConfigBuilder::new()
            .set_noise_tokens(vec!["X".into()])
            .add_noise_token("Y".into())
            .build()
            .unwrap();
        let tokens = config.noise_tokens.resolve(&["default".to_string()]);
        assert_eq!(tokens, vec!["X".to_string(), "Y".to_string()]);
    }

    #[test]
    fn test_from_config_file() {
        let file = ConfigFile {
            extraction: Some(ExtractionConfig {
                column_threshold: Some(0.7),
                max_pages: Some(1),
                ..Default::default()
            }),
            rules: Some(RulesConfig {
                extra_noise_tokens: Some(vec!["FIG.".into()]),
                extra_stop_patterns: Some(vec![r"(?i)^summary".into()]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let config = AbstractConfigBuilder::from_config_file(&file).build().unwrap();
        assert!((config.column_threshold - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.max_pages, 1);
        assert_eq!(config.extra_stop_patterns.len(), 1);
        assert!(matches!(config.noise_tokens, ListOverride::Extend(ref v) if v == &["FIG."]));
    }

    #[test]
    fn test_from_config_file_invalid_pattern_fails_build() {
        let file = ConfigFile {
            extraction: Some(ExtractionConfig {
                heading_pattern: Some("(unclosed".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(AbstractConfigBuilder::from_config_file(&file).build().is_err());
    }
}
