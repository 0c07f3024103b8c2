//! Internationalization (i18n) module for the site's display strings.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for supported locales and their embedded catalogs
//! - `language`: Validated `Language` handle, including client-preference inference
//! - `table`: Typed locale tree and dotted-key resolution with canonical fallback
//! - `translator`: Injectable current-locale context with durable persistence
//! - `validator`: Catalog completeness and placeholder checks
//! - `metrics`: Lookup, fallback and miss counters
//!
//! # Example
//!
//! ```rust,ignore
//! use fixnet::i18n::{Language, LocaleTable, Translator};
//! use fixnet::storage::MemoryStore;
//!
//! let table = Arc::new(LocaleTable::builtin()?);
//! let mut t = Translator::init(table, MemoryStore::new(), ["ru-RU"], Language::ENGLISH);
//! assert_eq!(t.t("nav.brand"), "FixNet");
//! t.change_language(Language::ENGLISH);
//! ```

mod language;
mod metrics;
mod registry;
mod table;
mod translator;
mod validator;

pub use language::Language;
pub use metrics::{LookupMetrics, LookupReport};
pub use registry::{LanguageConfig, LanguageRegistry};
pub use table::{Branch, CatalogError, LocaleTable, Node, Resolved};
pub use translator::Translator;
pub use validator::{CatalogValidator, ValidationReport};
