//! Translator: the current-locale context consulted on every render.
//!
//! Owns the immutable [`LocaleTable`], the current [`Language`] and the
//! durable store that mirrors the selection. Nothing here is global, so tests
//! and multiple front-ends can each hold an isolated instance.

use crate::i18n::{Language, LocaleTable, LookupMetrics, Node, Resolved};
use crate::storage::{KeyValueStore, LANGUAGE_KEY};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct Translator<S: KeyValueStore> {
    table: Arc<LocaleTable>,
    current: Language,
    store: S,
    metrics: LookupMetrics,
}

impl<S: KeyValueStore> Translator<S> {
    /// Initialize the current locale.
    ///
    /// Order: the persisted selection, then the first client preference that
    /// names a supported locale, then `default`. A persisted value that is no
    /// longer supported is ignored.
    pub fn init<I, P>(table: Arc<LocaleTable>, store: S, preferences: I, default: Language) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let persisted = store.get(LANGUAGE_KEY).and_then(|code| {
            Language::from_code(&code)
                .map_err(|e| warn!("Ignoring persisted locale: {}", e))
                .ok()
        });

        let current = match persisted {
            Some(lang) => {
                debug!("Using persisted locale '{}'", lang);
                lang
            }
            None => match Language::from_preferences(preferences) {
                Some(lang) => {
                    debug!("Inferred locale '{}' from client preferences", lang);
                    lang
                }
                None => default,
            },
        };

        Self {
            table,
            current,
            store,
            metrics: LookupMetrics::new(),
        }
    }

    pub fn current(&self) -> Language {
        self.current
    }

    pub fn table(&self) -> &LocaleTable {
        &self.table
    }

    pub fn metrics(&self) -> &LookupMetrics {
        &self.metrics
    }

    /// Switch the current locale and persist the choice.
    ///
    /// A failed write is logged; the in-memory selection stays authoritative
    /// for the rest of the session.
    pub fn change_language(&mut self, language: Language) {
        self.current = language;
        if let Err(e) = self.store.set(LANGUAGE_KEY, language.code()) {
            warn!("Failed to persist locale '{}': {:#}", language, e);
        }
        info!("Language changed to {}", language.name());
    }

    /// Resolve `key` with canonical fallback, without recording metrics.
    pub fn lookup(&self, key: &str) -> Resolved<'_> {
        self.table.resolve_with_fallback(self.current, key)
    }

    /// Display string for `key`.
    ///
    /// Returns the key itself when neither the current nor the canonical
    /// locale has a leaf string there. A key naming a subtree also returns
    /// the key; use [`t_list`](Self::t_list) to render a subtree.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.metrics.record_lookup();

        match self.lookup(key) {
            Resolved::Text(text) => {
                if !self.current.is_canonical()
                    && self.table.resolve(self.current.code(), key).is_missing()
                {
                    self.metrics.record_fallback();
                }
                text
            }
            Resolved::Branch(_) => {
                debug!("Key '{}' names a subtree, not a string", key);
                self.metrics.record_miss();
                key
            }
            Resolved::Missing => {
                debug!("Missing translation for '{}'", key);
                self.metrics.record_miss();
                key
            }
        }
    }

    /// Display string for `key` with `{name}` placeholders substituted.
    pub fn t_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        args.iter()
            .fold(self.t(key).to_string(), |text, (name, value)| {
                text.replace(&format!("{{{}}}", name), value)
            })
    }

    /// Leaf strings directly under the subtree `key`, in authoring order.
    ///
    /// Nested subtrees are skipped. Returns an empty list when `key` is a
    /// leaf or missing.
    pub fn t_list(&self, key: &str) -> Vec<&str> {
        match self.lookup(key) {
            Resolved::Branch(branch) => branch
                .iter()
                .filter_map(|(_, node)| match node {
                    Node::Text(text) => Some(text.as_str()),
                    Node::Branch(_) => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}
