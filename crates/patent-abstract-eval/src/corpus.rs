use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::EvalError;

/// A labelled document: where it lives and the abstract it should yield.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    /// Optional label shown in reports, e.g. a publication number.
    #[serde(default)]
    pub id: Option<String>,
    pub path: PathBuf,
    #[serde(rename = "abstract")]
    pub expected: String,
}

impl Case {
    /// Label for reports: the id when given, otherwise the file name.
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => self
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.path.display().to_string()),
        }
    }
}

/// Ground-truth corpus loaded from a TOML file of `[[cases]]` tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(default)]
    pub cases: Vec<Case>,
}

impl Corpus {
    /// Parse a corpus file. Relative case paths are resolved against the
    /// directory containing the corpus file.
    pub fn load(path: &Path) -> Result<Self, EvalError> {
        let content = std::fs::read_to_string(path).map_err(|source| EvalError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut corpus = Self::from_toml(&content)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for case in &mut corpus.cases {
            if case.path.is_relative() {
                case.path = base.join(&case.path);
            }
        }

        tracing::debug!(path = %path.display(), cases = corpus.len(), "loaded corpus");
        Ok(corpus)
    }

    /// Parse corpus TOML without touching case paths.
    pub fn from_toml(content: &str) -> Result<Self, EvalError> {
        Ok(toml::from_str(content)?)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}
