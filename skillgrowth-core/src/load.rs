//! Document sources and load errors.
//!
//! The report is built from four documents. Where they come from (disk,
//! HTTP, preloaded scripts) is up to the caller; this module only names
//! them, unwraps preload scripts and turns failures into [`LoadError`].
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentKind {
    Skills,
    Series,
    Values,
    Analysis,
}

impl DocumentKind {
    pub const ALL: [Self; 4] = [Self::Skills, Self::Series, Self::Values, Self::Analysis];

    #[must_use]
    pub const fn stem(self) -> &'static str {
        match self {
            Self::Skills => "skills",
            Self::Series => "series",
            Self::Values => "values",
            Self::Analysis => "analysis",
        }
    }

    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}.json", self.stem())
    }

    #[must_use]
    pub fn script_name(self) -> String {
        format!("{}.js", self.stem())
    }

    /// Global a preload script assigns the document to.
    #[must_use]
    pub const fn global_name(self) -> &'static str {
        match self {
            Self::Skills => "SKILLS",
            Self::Series => "SERIES",
            Self::Values => "VALUES",
            Self::Analysis => "ANALYSIS",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stem())
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("load failed: {document} could not be fetched: {reason}")]
    Fetch {
        document: DocumentKind,
        reason: String,
    },
    #[error("load failed: {document} is not valid JSON: {source}")]
    Parse {
        document: DocumentKind,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid report configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl LoadError {
    pub fn fetch(document: DocumentKind, reason: impl fmt::Display) -> Self {
        Self::Fetch {
            document,
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub const fn document(&self) -> Option<DocumentKind> {
        match self {
            Self::Fetch { document, .. } | Self::Parse { document, .. } => Some(*document),
            Self::Config(_) => None,
        }
    }
}

/// Raw text of all four documents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawDocuments {
    pub skills: String,
    pub series: String,
    pub values: String,
    pub analysis: String,
}

impl RawDocuments {
    #[must_use]
    pub fn get(&self, kind: DocumentKind) -> &str {
        match kind {
            DocumentKind::Skills => &self.skills,
            DocumentKind::Series => &self.series,
            DocumentKind::Values => &self.values,
            DocumentKind::Analysis => &self.analysis,
        }
    }

    pub fn set(&mut self, kind: DocumentKind, text: String) {
        match kind {
            DocumentKind::Skills => self.skills = text,
            DocumentKind::Series => self.series = text,
            DocumentKind::Values => self.values = text,
            DocumentKind::Analysis => self.analysis = text,
        }
    }
}

/// Trait for abstracting document loading
/// Platform-specific implementations should provide this
pub trait DocumentSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the raw text of one document
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read from this source.
    fn load_document(&self, kind: DocumentKind) -> Result<String, Self::Error>;
}

/// Load every document, failing on the first one that cannot be read.
///
/// # Errors
///
/// Returns [`LoadError::Fetch`] naming the first missing document.
pub fn load_all<S: DocumentSource>(source: &S) -> Result<RawDocuments, LoadError> {
    let mut docs = RawDocuments::default();
    for kind in DocumentKind::ALL {
        let text = source
            .load_document(kind)
            .map_err(|err| LoadError::fetch(kind, err))?;
        docs.set(kind, text);
    }
    Ok(docs)
}

static GLOBAL_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?s)^\s*(?:(?:window|globalThis|self)\.)?",
        r"([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(.*?)[\s;]*$",
    ))
    .expect("global script pattern is valid")
});

/// Extract the JSON payload of a preload script such as `window.SKILLS = [...];`.
///
/// Returns `None` when the script assigns a different global or is not an assignment.
#[must_use]
pub fn unwrap_global_script(script: &str, kind: DocumentKind) -> Option<&str> {
    let caps = GLOBAL_SCRIPT.captures(script)?;
    let name = caps.get(1)?.as_str();
    if name != kind.global_name() {
        return None;
    }
    caps.get(2).map(|m| m.as_str())
}

/// Documents already held in memory, such as preloaded globals.
#[derive(Debug, Clone, Default)]
pub struct PreloadedSource {
    documents: HashMap<DocumentKind, String>,
}

#[derive(Debug, Error)]
pub enum PreloadError {
    #[error("no preloaded {0} document")]
    Missing(DocumentKind),
}

impl PreloadedSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: DocumentKind, json: impl Into<String>) {
        self.documents.insert(kind, json.into());
    }

    /// Register a preload script; returns `false` if it does not assign the expected global.
    pub fn insert_script(&mut self, kind: DocumentKind, script: &str) -> bool {
        match unwrap_global_script(script, kind) {
            Some(json) => {
                self.insert(kind, json);
                true
            }
            None => {
                log::warn!("preload script for {kind} does not assign {}", kind.global_name());
                false
            }
        }
    }

    #[must_use]
    pub fn contains(&self, kind: DocumentKind) -> bool {
        self.documents.contains_key(&kind)
    }
}

impl DocumentSource for PreloadedSource {
    type Error = PreloadError;

    fn load_document(&self, kind: DocumentKind) -> Result<String, Self::Error> {
        self.documents
            .get(&kind)
            .cloned()
            .ok_or(PreloadError::Missing(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwraps_window_assignment() {
        let script = "window.SKILLS = [{\"skill_id\": \"00001\"}];\n";
        assert_eq!(
            unwrap_global_script(script, DocumentKind::Skills),
            Some("[{\"skill_id\": \"00001\"}]")
        );
        assert_eq!(
            unwrap_global_script("VALUES={}", DocumentKind::Values),
            Some("{}")
        );
    }

    #[test]
    fn rejects_other_globals() {
        assert!(unwrap_global_script("window.SERIES = []", DocumentKind::Skills).is_none());
        assert!(unwrap_global_script("[1, 2]", DocumentKind::Skills).is_none());
    }

    #[test]
    fn preloaded_source_loads_all_or_names_missing() {
        let mut source = PreloadedSource::new();
        for kind in [DocumentKind::Skills, DocumentKind::Series, DocumentKind::Values] {
            source.insert(kind, "[]");
        }
        let err = load_all(&source).unwrap_err();
        assert_eq!(err.document(), Some(DocumentKind::Analysis));
        assert!(err.to_string().starts_with("load failed"));

        assert!(source.insert_script(DocumentKind::Analysis, "window.ANALYSIS = {};"));
        let docs = load_all(&source).unwrap();
        assert_eq!(docs.get(DocumentKind::Analysis), "{}");
    }

    #[test]
    fn file_names_follow_stems() {
        assert_eq!(DocumentKind::Values.file_name(), "values.json");
        assert_eq!(DocumentKind::Analysis.script_name(), "analysis.js");
    }
}
