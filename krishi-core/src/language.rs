/// Languages supported by the hosted translation/speech stack.
///
/// Display name paired with the provider language code. The set mirrors what
/// the Sarvam models accept; treat it as a closed vocabulary in UI code.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("English", "en-IN"),
    ("Hindi", "hi-IN"),
    ("Bengali", "bn-IN"),
    ("Gujarati", "gu-IN"),
    ("Kannada", "kn-IN"),
    ("Malayalam", "ml-IN"),
    ("Marathi", "mr-IN"),
    ("Odia", "or-IN"),
    ("Punjabi", "pa-IN"),
    ("Tamil", "ta-IN"),
    ("Telugu", "te-IN"),
    ("Urdu", "ur-IN"),
    ("Assamese", "as-IN"),
    ("Kashmiri", "ks-IN"),
    ("Konkani", "kok-IN"),
    ("Maithili", "mai-IN"),
    ("Nepali", "ne-IN"),
    ("Sanskrit", "sa-IN"),
    ("Sindhi", "sd-IN"),
    ("Bodo", "brx-IN"),
    ("Dogri", "doi-IN"),
    ("Manipuri", "mni-IN"),
    ("Santali", "sat-IN"),
];

/// All app copy is authored in this language; translating into it is a no-op.
pub const SOURCE_LANGUAGE: &str = "en-IN";

pub fn code_for_name(name: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name.trim()))
        .map(|(_, c)| *c)
}

pub fn name_for_code(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(_, c)| *c == code.trim())
        .map(|(n, _)| *n)
}

pub fn is_source_language(code: &str) -> bool {
    code.trim() == SOURCE_LANGUAGE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_codes_case_insensitively() {
        assert_eq!(code_for_name("hindi"), Some("hi-IN"));
        assert_eq!(code_for_name(" Punjabi "), Some("pa-IN"));
        assert_eq!(code_for_name("Klingon"), None);
    }

    #[test]
    fn maps_codes_back_to_names() {
        assert_eq!(name_for_code("sat-IN"), Some("Santali"));
        assert_eq!(name_for_code("xx-YY"), None);
    }

    #[test]
    fn source_language_is_english() {
        assert!(is_source_language("en-IN"));
        assert!(!is_source_language("hi-IN"));
    }
}
