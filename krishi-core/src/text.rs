/// Normalizes a vision model's free-text answer into a crop label.
///
/// The model is asked for a single word but routinely appends punctuation or
/// answers in odd casing. Strips surrounding whitespace and trailing
/// punctuation, then title-cases each word. Returns `None` when nothing
/// usable remains.
pub fn normalize_crop_label(raw: &str) -> Option<String> {
    let trimmed = raw
        .trim()
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | '!' | '?' | ';' | ':'))
        .trim();

    if trimmed.is_empty() {
        return None;
    }

    let label = trimmed
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ");

    Some(label)
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_punctuation() {
        assert_eq!(normalize_crop_label("Rice."), Some("Rice".into()));
        assert_eq!(normalize_crop_label("wheat!"), Some("Wheat".into()));
    }

    #[test]
    fn title_cases_multi_word_answers() {
        assert_eq!(normalize_crop_label("sugar cane"), Some("Sugar Cane".into()));
        assert_eq!(normalize_crop_label("SUGARCANE"), Some("Sugarcane".into()));
    }

    #[test]
    fn empty_answers_yield_none() {
        assert_eq!(normalize_crop_label("   "), None);
        assert_eq!(normalize_crop_label("..."), None);
    }
}
