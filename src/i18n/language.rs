//! Language type: validated locale handle.
//!
//! A `Language` can only be constructed for a code present and enabled in the
//! registry, so holders never need to re-check support.

use crate::i18n::registry::{ENGLISH_CONFIG, RUSSIAN_CONFIG};
use crate::i18n::{LanguageConfig, LanguageRegistry};
use anyhow::{bail, Result};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A validated language.
#[derive(Debug, Clone, Copy)]
pub struct Language {
    config: &'static LanguageConfig,
}

impl Language {
    pub const ENGLISH: Language = Language {
        config: &ENGLISH_CONFIG,
    };

    pub const RUSSIAN: Language = Language {
        config: &RUSSIAN_CONFIG,
    };

    /// Language for an enabled, registered code. Codes are case-sensitive.
    pub fn from_code(code: &str) -> Result<Language> {
        match LanguageRegistry::get().get_by_code(code) {
            Some(config) if config.enabled => Ok(Language { config }),
            Some(_) => bail!("Language '{}' is not enabled", code),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// Pick the first client language preference that names an enabled locale.
    ///
    /// Preferences are BCP 47-ish tags as reported by a browser or the OS
    /// (`"ru-RU"`, `"en_US.UTF-8"`, `"RU"`). Only the primary subtag is
    /// compared, case-insensitively.
    pub fn from_preferences<I, S>(preferences: I) -> Option<Language>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        preferences.into_iter().find_map(|pref| {
            let primary = pref
                .as_ref()
                .trim()
                .split(['-', '_', '.'])
                .next()
                .unwrap_or("")
                .to_ascii_lowercase();
            if primary.is_empty() {
                return None;
            }
            Language::from_code(&primary).ok()
        })
    }

    /// The fallback language.
    pub fn canonical() -> Language {
        Language {
            config: LanguageRegistry::get().canonical(),
        }
    }

    pub fn code(&self) -> &'static str {
        self.config.code
    }

    pub fn config(&self) -> &'static LanguageConfig {
        self.config
    }

    /// English name, for logs.
    pub fn name(&self) -> &'static str {
        self.config.name
    }

    pub fn native_name(&self) -> &'static str {
        self.config.native_name
    }

    pub fn is_canonical(&self) -> bool {
        LanguageRegistry::get().is_canonical(self.code())
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for Language {}

impl Hash for Language {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code().hash(state);
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Constant Tests ====================

    #[test]
    fn test_english_constant() {
        let english = Language::ENGLISH;
        assert_eq!(english.code(), "en");
        assert_eq!(english.name(), "English");
        assert!(english.is_canonical());
    }

    #[test]
    fn test_russian_constant() {
        let russian = Language::RUSSIAN;
        assert_eq!(russian.code(), "ru");
        assert_eq!(russian.native_name(), "Русский");
        assert!(!russian.is_canonical());
    }

    // ==================== from_code Tests ====================

    #[test]
    fn test_from_code_russian() {
        let language = Language::from_code("ru").expect("Should succeed");
        assert_eq!(language, Language::RUSSIAN);
    }

    #[test]
    fn test_from_code_invalid() {
        let result = Language::from_code("fr");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Unknown"));
    }

    #[test]
    fn test_from_code_is_case_sensitive() {
        assert!(Language::from_code("RU").is_err());
    }

    #[test]
    fn test_from_code_empty() {
        assert!(Language::from_code("").is_err());
    }

    // ==================== from_preferences Tests ====================

    #[test]
    fn test_from_preferences_region_tag() {
        let lang = Language::from_preferences(["ru-RU", "en-US"]);
        assert_eq!(lang, Some(Language::RUSSIAN));
    }

    #[test]
    fn test_from_preferences_skips_unsupported() {
        let lang = Language::from_preferences(["de-DE", "fr", "ru"]);
        assert_eq!(lang, Some(Language::RUSSIAN));
    }

    #[test]
    fn test_from_preferences_posix_locale() {
        let lang = Language::from_preferences(["en_US.UTF-8"]);
        assert_eq!(lang, Some(Language::ENGLISH));
    }

    #[test]
    fn test_from_preferences_uppercase() {
        let lang = Language::from_preferences(["RU"]);
        assert_eq!(lang, Some(Language::RUSSIAN));
    }

    #[test]
    fn test_from_preferences_none_match() {
        assert_eq!(Language::from_preferences(["de", "ja-JP"]), None);
        assert_eq!(Language::from_preferences(Vec::<String>::new()), None);
        assert_eq!(Language::from_preferences(["", "  "]), None);
    }

    // ==================== Trait Tests ====================

    #[test]
    fn test_canonical_returns_english() {
        assert_eq!(Language::canonical(), Language::ENGLISH);
    }

    #[test]
    fn test_display_is_code() {
        assert_eq!(Language::RUSSIAN.to_string(), "ru");
    }
}
