//! Free-text query matching for skill and series lookups.
//!
//! A query may be an id fragment, a full id with punctuation around it, a
//! partial name, or a name typed with different spacing or dash conventions.
use regex::Regex;
use std::sync::LazyLock;

static STRIP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\s\u{3000}\-\u{2013}\u{2014}\u{FF0D}_]+").expect("strip pattern is valid")
});

static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{5}").expect("id pattern is valid"));

/// Remove whitespace (including the ideographic space), dash variants and underscores.
#[must_use]
pub fn normalize(s: &str) -> String {
    STRIP_PATTERN.replace_all(s, "").into_owned()
}

/// First run of five consecutive ASCII digits, or an empty string.
#[must_use]
pub fn extract_id(s: &str) -> &str {
    ID_PATTERN.find(s).map_or("", |m| m.as_str())
}

/// Pre-processed query, so a full pass over the skills normalizes the query only once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    raw: String,
    id: String,
    normalized: String,
}

impl Query {
    #[must_use]
    pub fn new(query: &str) -> Self {
        let raw = query.trim();
        Self {
            raw: raw.to_string(),
            id: extract_id(raw).to_string(),
            normalized: normalize(raw),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether an entity with this id and name passes the query.
    #[must_use]
    pub fn matches(&self, id: &str, name: &str) -> bool {
        if self.raw.is_empty() {
            return true;
        }
        id.contains(&self.raw)
            || (!self.id.is_empty() && id.contains(&self.id))
            || name.contains(&self.raw)
            || normalize(name).contains(&self.normalized)
    }
}

/// One-shot form of [`Query::matches`].
#[must_use]
pub fn matches(query: &str, id: &str, name: &str) -> bool {
    Query::new(query).matches(id, name)
}
