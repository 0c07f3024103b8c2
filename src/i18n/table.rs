//! Locale table: typed tree of display strings keyed by locale code.
//!
//! Every locale is a [`Branch`] whose children are either leaf strings or
//! further branches. Lookups take a dotted key (`"home.stats.warranty"`) and
//! walk one segment at a time. A walk reports [`Resolved::Missing`] rather
//! than an empty string, so a missing entry is never confused with one that
//! is intentionally blank.

use crate::i18n::{Language, LanguageRegistry};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Errors raised while building a [`LocaleTable`].
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog for '{locale}' is not valid JSON")]
    InvalidJson {
        locale: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog for '{locale}' must be a JSON object at the root")]
    RootNotObject { locale: String },

    #[error("catalog for '{locale}' has a {kind} at '{path}', expected a string or object")]
    InvalidNode {
        locale: String,
        path: String,
        kind: &'static str,
    },

    #[error("canonical locale '{0}' is missing from the table")]
    MissingCanonical(String),
}

/// A node in a locale tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Branch(Branch),
}

/// An ordered mapping from key segment to child node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Branch {
    entries: Vec<(String, Node)>,
}

impl Branch {
    pub fn get(&self, segment: &str) -> Option<&Node> {
        self.entries
            .iter()
            .find(|(key, _)| key == segment)
            .map(|(_, node)| node)
    }

    /// Children in authoring order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(key, node)| (key.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dotted keys of every leaf below this branch, depth first.
    pub fn leaf_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        collect_leaf_keys(self, "", &mut keys);
        keys
    }

    fn from_json(locale: &str, path: &str, map: serde_json::Map<String, Value>) -> Result<Self, CatalogError> {
        let mut entries = Vec::with_capacity(map.len());
        for (key, value) in map {
            let child_path = join_key(path, &key);
            let node = match value {
                Value::String(text) => Node::Text(text),
                Value::Object(child) => Node::Branch(Branch::from_json(locale, &child_path, child)?),
                other => {
                    return Err(CatalogError::InvalidNode {
                        locale: locale.to_string(),
                        path: child_path,
                        kind: json_kind(&other),
                    })
                }
            };
            entries.push((key, node));
        }
        Ok(Self { entries })
    }
}

/// Outcome of walking a dotted key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'a> {
    /// The key names a leaf string (possibly empty).
    Text(&'a str),
    /// The key names a subtree rather than a leaf.
    Branch(&'a Branch),
    /// Some segment could not be followed.
    Missing,
}

impl<'a> Resolved<'a> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Resolved::Missing)
    }

    pub fn as_text(&self) -> Option<&'a str> {
        match *self {
            Resolved::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// All locale trees, built once and immutable thereafter.
#[derive(Debug, Clone)]
pub struct LocaleTable {
    locales: HashMap<String, Branch>,
    canonical: String,
}

impl LocaleTable {
    /// Build the table from the catalogs embedded in the language registry.
    pub fn builtin() -> Result<Self, CatalogError> {
        let registry = LanguageRegistry::get();
        Self::from_sources(
            registry.canonical().code,
            registry
                .list_all()
                .into_iter()
                .map(|config| (config.code, config.catalog)),
        )
    }

    /// Build the table from `(locale code, JSON text)` pairs.
    pub fn from_sources<'s, I>(canonical: &str, sources: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (&'s str, &'s str)>,
    {
        let mut parsed = Vec::new();
        for (locale, json) in sources {
            let value: Value =
                serde_json::from_str(json).map_err(|source| CatalogError::InvalidJson {
                    locale: locale.to_string(),
                    source,
                })?;
            parsed.push((locale.to_string(), value));
        }
        Self::from_values(canonical, parsed)
    }

    /// Build the table from already-parsed JSON values.
    pub fn from_values<I>(canonical: &str, values: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut locales = HashMap::new();
        for (locale, value) in values {
            let Value::Object(map) = value else {
                return Err(CatalogError::RootNotObject { locale });
            };
            let branch = Branch::from_json(&locale, "", map)?;
            locales.insert(locale, branch);
        }

        if !locales.contains_key(canonical) {
            return Err(CatalogError::MissingCanonical(canonical.to_string()));
        }

        Ok(Self {
            locales,
            canonical: canonical.to_string(),
        })
    }

    pub fn canonical_code(&self) -> &str {
        &self.canonical
    }

    pub fn locale(&self, code: &str) -> Option<&Branch> {
        self.locales.get(code)
    }

    /// Locale codes present in the table, sorted.
    pub fn locale_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.locales.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// Walk `key` within a single locale.
    pub fn resolve(&self, locale: &str, key: &str) -> Resolved<'_> {
        match self.locales.get(locale) {
            Some(root) => walk(root, key),
            None => Resolved::Missing,
        }
    }

    /// Walk `key` in `language`, restarting from the canonical locale when the
    /// walk cannot be completed.
    pub fn resolve_with_fallback(&self, language: Language, key: &str) -> Resolved<'_> {
        let resolved = self.resolve(language.code(), key);
        if !resolved.is_missing() || language.code() == self.canonical {
            return resolved;
        }

        debug!(
            "Key '{}' missing in '{}', falling back to '{}'",
            key,
            language.code(),
            self.canonical
        );
        self.resolve(&self.canonical, key)
    }
}

fn walk<'a>(root: &'a Branch, key: &str) -> Resolved<'a> {
    let mut current = root;
    let mut segments = key.split('.').peekable();

    while let Some(segment) = segments.next() {
        match current.get(segment) {
            Some(Node::Branch(branch)) => {
                if segments.peek().is_none() {
                    return Resolved::Branch(branch);
                }
                current = branch;
            }
            Some(Node::Text(text)) => {
                // A leaf only resolves when it is the last segment
                return if segments.peek().is_none() {
                    Resolved::Text(text)
                } else {
                    Resolved::Missing
                };
            }
            None => return Resolved::Missing,
        }
    }

    Resolved::Missing
}

fn collect_leaf_keys(branch: &Branch, prefix: &str, out: &mut Vec<String>) {
    for (key, node) in branch.iter() {
        let full = join_key(prefix, key);
        match node {
            Node::Text(_) => out.push(full),
            Node::Branch(child) => collect_leaf_keys(child, &full, out),
        }
    }
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::Array(_) => "array",
        Value::String(_) => "string",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> LocaleTable {
        LocaleTable::from_sources(
            "en",
            [
                (
                    "en",
                    r#"{
                        "home": {
                            "title": "Home",
                            "stats": { "warranty": "Warranty", "successRate": "Success Rate" }
                        },
                        "common": { "blank": "" },
                        "onlyEnglish": "English only"
                    }"#,
                ),
                (
                    "ru",
                    r#"{
                        "home": {
                            "title": "Главная",
                            "stats": { "warranty": "Гарантия" }
                        },
                        "common": { "blank": "" }
                    }"#,
                ),
            ],
        )
        .expect("Sample table should build")
    }

    // ==================== Construction Tests ====================

    #[test]
    fn test_builtin_table_builds() {
        let table = LocaleTable::builtin().expect("Builtin catalogs should parse");
        assert_eq!(table.canonical_code(), "en");
        assert_eq!(table.locale_codes(), vec!["en", "ru"]);
    }

    #[test]
    fn test_missing_canonical_rejected() {
        let result = LocaleTable::from_sources("en", [("ru", r#"{"a": "б"}"#)]);
        assert!(matches!(result, Err(CatalogError::MissingCanonical(code)) if code == "en"));
    }

    #[test]
    fn test_invalid_json_rejected() {
        let result = LocaleTable::from_sources("en", [("en", "{not json")]);
        assert!(matches!(result, Err(CatalogError::InvalidJson { .. })));
    }

    #[test]
    fn test_non_object_root_rejected() {
        let result = LocaleTable::from_sources("en", [("en", r#"["a"]"#)]);
        assert!(matches!(result, Err(CatalogError::RootNotObject { .. })));
    }

    #[test]
    fn test_number_leaf_rejected_with_path() {
        let result = LocaleTable::from_sources("en", [("en", r#"{"home": {"count": 3}}"#)]);
        match result {
            Err(CatalogError::InvalidNode { path, kind, .. }) => {
                assert_eq!(path, "home.count");
                assert_eq!(kind, "number");
            }
            other => panic!("Expected InvalidNode, got {:?}", other),
        }
    }

    #[test]
    fn test_branch_preserves_authoring_order() {
        let table = LocaleTable::from_sources("en", [("en", r#"{"z": "1", "a": "2", "m": "3"}"#)])
            .unwrap();
        let keys: Vec<&str> = table.locale("en").unwrap().iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    // ==================== resolve Tests ====================

    #[test]
    fn test_resolve_leaf() {
        let table = sample_table();
        assert_eq!(table.resolve("en", "home.stats.warranty"), Resolved::Text("Warranty"));
        assert_eq!(table.resolve("ru", "home.stats.warranty"), Resolved::Text("Гарантия"));
    }

    #[test]
    fn test_resolve_blank_is_not_missing() {
        let table = sample_table();
        assert_eq!(table.resolve("en", "common.blank"), Resolved::Text(""));
    }

    #[test]
    fn test_resolve_subtree() {
        let table = sample_table();
        match table.resolve("en", "home.stats") {
            Resolved::Branch(branch) => assert_eq!(branch.len(), 2),
            other => panic!("Expected branch, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_past_leaf_is_missing() {
        let table = sample_table();
        assert!(table.resolve("en", "home.title.extra").is_missing());
    }

    #[test]
    fn test_resolve_unknown_locale_is_missing() {
        let table = sample_table();
        assert!(table.resolve("de", "home.title").is_missing());
    }

    #[test]
    fn test_resolve_empty_key_is_missing() {
        let table = sample_table();
        assert!(table.resolve("en", "").is_missing());
        assert!(table.resolve("en", "home.").is_missing());
    }

    // ==================== resolve_with_fallback Tests ====================

    #[test]
    fn test_fallback_missing_leaf() {
        let table = sample_table();
        assert_eq!(
            table.resolve_with_fallback(Language::RUSSIAN, "home.stats.successRate"),
            Resolved::Text("Success Rate")
        );
    }

    #[test]
    fn test_fallback_missing_subtree() {
        let table = sample_table();
        assert_eq!(
            table.resolve_with_fallback(Language::RUSSIAN, "onlyEnglish"),
            Resolved::Text("English only")
        );
    }

    #[test]
    fn test_fallback_prefers_current_locale() {
        let table = sample_table();
        assert_eq!(
            table.resolve_with_fallback(Language::RUSSIAN, "home.title"),
            Resolved::Text("Главная")
        );
    }

    #[test]
    fn test_fallback_missing_everywhere() {
        let table = sample_table();
        assert!(table
            .resolve_with_fallback(Language::RUSSIAN, "does.not.exist")
            .is_missing());
        assert!(table
            .resolve_with_fallback(Language::ENGLISH, "does.not.exist")
            .is_missing());
    }

    // ==================== leaf_keys Tests ====================

    #[test]
    fn test_leaf_keys() {
        let table = sample_table();
        let keys = table.locale("en").unwrap().leaf_keys();
        assert_eq!(
            keys,
            vec![
                "home.title",
                "home.stats.warranty",
                "home.stats.successRate",
                "common.blank",
                "onlyEnglish"
            ]
        );
    }
}
