//! Supported locales and their embedded catalogs.
//!
//! Static configuration only; which locale is *current* lives in
//! [`Translator`](crate::i18n::Translator). The first entry is the canonical
//! locale every lookup falls back to.

/// A supported locale.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "ru")
    pub code: &'static str,

    /// English name of the language
    pub name: &'static str,

    /// Name shown in the language toggle
    pub native_name: &'static str,

    /// Whether this locale can be selected
    pub enabled: bool,

    /// Embedded string catalog (nested JSON object)
    pub catalog: &'static str,
}

pub(crate) const ENGLISH_CONFIG: LanguageConfig = LanguageConfig {
    code: "en",
    name: "English",
    native_name: "English",
    enabled: true,
    catalog: include_str!("../../locales/en.json"),
};

pub(crate) const RUSSIAN_CONFIG: LanguageConfig = LanguageConfig {
    code: "ru",
    name: "Russian",
    native_name: "Русский",
    enabled: true,
    catalog: include_str!("../../locales/ru.json"),
};

const LOCALES: &[LanguageConfig] = &[ENGLISH_CONFIG, RUSSIAN_CONFIG];

static REGISTRY: LanguageRegistry = LanguageRegistry { languages: LOCALES };

pub struct LanguageRegistry {
    languages: &'static [LanguageConfig],
}

impl LanguageRegistry {
    pub fn get() -> &'static LanguageRegistry {
        &REGISTRY
    }

    pub fn get_by_code(&self, code: &str) -> Option<&'static LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Selectable locales, in toggle order.
    pub fn list_enabled(&self) -> Vec<&'static LanguageConfig> {
        self.languages.iter().filter(|lang| lang.enabled).collect()
    }

    /// Every registered locale, including disabled ones.
    pub fn list_all(&self) -> &'static [LanguageConfig] {
        self.languages
    }

    /// The locale missing keys fall back to.
    pub fn canonical(&self) -> &'static LanguageConfig {
        &self.languages[0]
    }

    pub fn is_canonical(&self, code: &str) -> bool {
        self.canonical().code == code
    }

    pub fn is_enabled(&self, code: &str) -> bool {
        self.get_by_code(code).is_some_and(|lang| lang.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_by_code() {
        let russian = LanguageRegistry::get()
            .get_by_code("ru")
            .expect("Russian should be registered");
        assert_eq!(russian.name, "Russian");
        assert_eq!(russian.native_name, "Русский");
        assert!(russian.enabled);

        assert!(LanguageRegistry::get().get_by_code("fr").is_none());
        assert!(LanguageRegistry::get().get_by_code("EN").is_none());
    }

    #[test]
    fn test_catalogs_are_json_objects() {
        for config in LanguageRegistry::get().list_all() {
            assert!(
                config.catalog.trim_start().starts_with('{'),
                "{} catalog should be an object",
                config.code
            );
        }
    }

    #[test]
    fn test_toggle_order() {
        let codes: Vec<_> = LanguageRegistry::get()
            .list_enabled()
            .iter()
            .map(|c| c.code)
            .collect();
        assert_eq!(codes, vec!["en", "ru"]);
    }

    #[test]
    fn test_english_is_canonical() {
        let registry = LanguageRegistry::get();
        assert_eq!(registry.canonical().code, "en");
        assert!(registry.is_canonical("en"));
        assert!(!registry.is_canonical("ru"));
    }

    #[test]
    fn test_is_enabled() {
        let registry = LanguageRegistry::get();
        assert!(registry.is_enabled("en"));
        assert!(registry.is_enabled("ru"));
        assert!(!registry.is_enabled("fr"));
        assert!(!registry.is_enabled(""));
    }
}
