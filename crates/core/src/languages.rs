//! Output-language catalog.
//!
//! A static list of the languages a shortcut can target, each with its ISO
//! code, English name, and native name. The native name is what gets
//! substituted into prompt templates; the prompt-locale code decides which
//! localized template text to use.

/// One selectable output language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageOption {
    /// ISO language code (`zh-Hans`-style for Chinese variants).
    pub code: &'static str,
    /// English display name, used as the stored settings value.
    pub english: &'static str,
    /// Native name, substituted for `{lang}` in prompt templates.
    pub native: &'static str,
}

/// Supported output languages, ordered by global usage.
pub const LANGUAGES: &[LanguageOption] = &[
    LanguageOption { code: "en", english: "English", native: "English" },
    LanguageOption { code: "zh-Hans", english: "Chinese (Simplified)", native: "简体中文" },
    LanguageOption { code: "zh-Hant", english: "Chinese (Traditional)", native: "繁體中文" },
    LanguageOption { code: "es", english: "Spanish", native: "Español" },
    LanguageOption { code: "ja", english: "Japanese", native: "日本語" },
    LanguageOption { code: "ko", english: "Korean", native: "한국어" },
    LanguageOption { code: "fr", english: "French", native: "Français" },
    LanguageOption { code: "de", english: "German", native: "Deutsch" },
    LanguageOption { code: "pt", english: "Portuguese", native: "Português" },
    LanguageOption { code: "ru", english: "Russian", native: "Русский" },
    LanguageOption { code: "ar", english: "Arabic", native: "العربية" },
    LanguageOption { code: "it", english: "Italian", native: "Italiano" },
    LanguageOption { code: "nl", english: "Dutch", native: "Nederlands" },
    LanguageOption { code: "pl", english: "Polish", native: "Polski" },
    LanguageOption { code: "vi", english: "Vietnamese", native: "Tiếng Việt" },
    LanguageOption { code: "th", english: "Thai", native: "ไทย" },
    LanguageOption { code: "id", english: "Indonesian", native: "Bahasa Indonesia" },
    LanguageOption { code: "tr", english: "Turkish", native: "Türkçe" },
    LanguageOption { code: "hi", english: "Hindi", native: "हिन्दी" },
    LanguageOption { code: "bn", english: "Bengali", native: "বাংলা" },
    LanguageOption { code: "uk", english: "Ukrainian", native: "Українська" },
    LanguageOption { code: "cs", english: "Czech", native: "Čeština" },
    LanguageOption { code: "sv", english: "Swedish", native: "Svenska" },
    LanguageOption { code: "da", english: "Danish", native: "Dansk" },
    LanguageOption { code: "fi", english: "Finnish", native: "Suomi" },
    LanguageOption { code: "no", english: "Norwegian", native: "Norsk" },
    LanguageOption { code: "el", english: "Greek", native: "Ελληνικά" },
    LanguageOption { code: "he", english: "Hebrew", native: "עברית" },
    LanguageOption { code: "ro", english: "Romanian", native: "Română" },
    LanguageOption { code: "hu", english: "Hungarian", native: "Magyar" },
    LanguageOption { code: "ms", english: "Malay", native: "Bahasa Melayu" },
    LanguageOption { code: "fa", english: "Persian", native: "فارسی" },
];

/// Finds a language by its English name, case-insensitively.
pub fn find_by_english(english: &str) -> Option<&'static LanguageOption> {
    LANGUAGES.iter().find(|lang| lang.english.eq_ignore_ascii_case(english))
}

/// Native name for a language, falling back to the input when unknown.
///
/// Used for `{lang}` replacement in prompt templates, so an unknown language
/// still produces a usable instruction.
pub fn native_name(english: &str) -> &str {
    match find_by_english(english) {
        Some(lang) => lang.native,
        None => english,
    }
}

/// Prompt-locale code for a language's English name.
///
/// All Chinese variants collapse to `zh` for template lookup; unknown
/// languages fall back to `en`.
pub fn prompt_locale(english: &str) -> &'static str {
    let Some(lang) = find_by_english(english) else {
        return "en";
    };
    if lang.code.starts_with("zh") { "zh" } else { lang.code }
}

/// Migrates legacy stored language values to their current names.
///
/// Earlier versions stored plain "Chinese"; it now maps to the Simplified
/// variant.
pub fn migrate_language_value(stored: &str) -> &str {
    if stored == "Chinese" { "Chinese (Simplified)" } else { stored }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_english_case_insensitive() {
        assert!(find_by_english("japanese").is_some());
        assert!(find_by_english("JAPANESE").is_some());
        assert!(find_by_english("Klingon").is_none());
    }

    #[test]
    fn test_native_name() {
        assert_eq!(native_name("Japanese"), "日本語");
        assert_eq!(native_name("Chinese (Simplified)"), "简体中文");
        // Unknown languages pass through unchanged.
        assert_eq!(native_name("Klingon"), "Klingon");
    }

    #[rstest::rstest]
    #[case("Chinese (Simplified)", "zh")]
    #[case("Chinese (Traditional)", "zh")]
    #[case("Spanish", "es")]
    #[case("English", "en")]
    #[case("Klingon", "en")]
    fn test_prompt_locale(#[case] english: &str, #[case] expected: &str) {
        assert_eq!(prompt_locale(english), expected);
    }

    #[test]
    fn test_migrate_legacy_chinese() {
        assert_eq!(migrate_language_value("Chinese"), "Chinese (Simplified)");
        assert_eq!(migrate_language_value("English"), "English");
    }

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<_> = LANGUAGES.iter().map(|l| l.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), LANGUAGES.len());
    }
}
