//! Catalog quality validation.
//!
//! Checks every non-canonical locale against the canonical tree: missing
//! entries are tolerated (they fall back) but reported, while shape changes
//! and placeholder drift are errors because they render wrong text.

use crate::i18n::{Branch, LocaleTable, Node};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that produce wrong output
    pub errors: Vec<String>,

    /// Problems that degrade gracefully (e.g., fallback to English)
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for locale catalogs.
pub struct CatalogValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl CatalogValidator {
    /// Validate every locale in `table` against its canonical locale.
    pub fn validate(table: &LocaleTable) -> ValidationReport {
        let mut report = ValidationReport::new();
        let canonical_code = table.canonical_code();

        let Some(canonical) = table.locale(canonical_code) else {
            report
                .errors
                .push(format!("Canonical locale '{}' is missing", canonical_code));
            return report;
        };

        for key in canonical.leaf_keys() {
            if let Some(Node::Text(text)) = find(canonical, &key) {
                if text.trim().is_empty() {
                    report
                        .warnings
                        .push(format!("[{}] '{}' is empty", canonical_code, key));
                }
            }
        }

        for code in table.locale_codes() {
            if code == canonical_code {
                continue;
            }
            if let Some(locale) = table.locale(code) {
                Self::compare(code, canonical, locale, "", &mut report);
            }
        }

        report
    }

    fn compare(code: &str, canonical: &Branch, locale: &Branch, prefix: &str, report: &mut ValidationReport) {
        for (key, expected) in canonical.iter() {
            let path = join(prefix, key);
            match (expected, locale.get(key)) {
                (_, None) => report.warnings.push(format!(
                    "[{}] '{}' is missing, falls back to canonical",
                    code, path
                )),
                (Node::Text(expected), Some(Node::Text(actual))) => {
                    let expected_args = Self::extract_placeholders(expected);
                    let actual_args = Self::extract_placeholders(actual);
                    if expected_args != actual_args {
                        report.errors.push(format!(
                            "[{}] '{}' placeholder mismatch: canonical has {:?}, translation has {:?}",
                            code, path, expected_args, actual_args
                        ));
                    }
                }
                (Node::Branch(expected), Some(Node::Branch(actual))) => {
                    Self::compare(code, expected, actual, &path, report);
                }
                (Node::Text(_), Some(Node::Branch(_))) => report.errors.push(format!(
                    "[{}] '{}' is a subtree, canonical has a string",
                    code, path
                )),
                (Node::Branch(_), Some(Node::Text(_))) => report.errors.push(format!(
                    "[{}] '{}' is a string, canonical has a subtree",
                    code, path
                )),
            }
        }

        for (key, _) in locale.iter() {
            if canonical.get(key).is_none() {
                report.warnings.push(format!(
                    "[{}] '{}' is not in the canonical catalog",
                    code,
                    join(prefix, key)
                ));
            }
        }
    }

    /// Extract the set of `{name}` placeholders from a string.
    fn extract_placeholders(text: &str) -> BTreeSet<String> {
        let regex = PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").unwrap());

        regex
            .captures_iter(text)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }
}

fn find<'a>(root: &'a Branch, key: &str) -> Option<&'a Node> {
    let mut segments = key.split('.');
    let mut node = root.get(segments.next()?)?;
    for segment in segments {
        match node {
            Node::Branch(branch) => node = branch.get(segment)?,
            Node::Text(_) => return None,
        }
    }
    Some(node)
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}
