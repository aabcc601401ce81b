//! English singularization for lenient relationship matching

const IRREGULAR: [(&str, &str); 9] = [
    ("people", "person"),
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("teeth", "tooth"),
    ("feet", "foot"),
    ("criteria", "criterion"),
];

const UNCOUNTABLE: [&str; 8] = [
    "news",
    "series",
    "species",
    "information",
    "equipment",
    "sheep",
    "fish",
    "media",
];

/// Suffix rewrites, checked in order; the first match wins
const SUFFIXES: [(&str, &str); 12] = [
    ("ies", "y"),
    ("lves", "lf"),
    ("ives", "ife"),
    ("sses", "ss"),
    ("shes", "sh"),
    ("ches", "ch"),
    ("xes", "x"),
    ("zzes", "zz"),
    ("oes", "o"),
    ("uses", "us"),
    ("ss", "ss"),
    ("us", "us"),
];

/// Singular form of an English plural noun; words that are already singular
/// are returned unchanged
pub fn singularize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }

    for (plural, singular) in IRREGULAR {
        if lower.ends_with(plural) && at_word_boundary(word, word.len() - plural.len()) {
            let stem = &word[..word.len() - plural.len()];
            return format!("{stem}{}", match_case(&word[stem.len()..], singular));
        }
    }

    for (suffix, replacement) in SUFFIXES {
        if lower.len() > suffix.len() && lower.ends_with(suffix) {
            let stem = &word[..word.len() - suffix.len()];
            return format!("{stem}{}", match_case(&word[stem.len()..], replacement));
        }
    }

    if lower.len() > 1 && lower.ends_with('s') && !lower.ends_with("is") {
        return word[..word.len() - 1].to_string();
    }

    word.to_string()
}

/// Irregular plurals only match whole words or camelCase/snake_case segments
fn at_word_boundary(word: &str, idx: usize) -> bool {
    let bytes = word.as_bytes();
    idx == 0 || bytes[idx].is_ascii_uppercase() || matches!(bytes[idx - 1], b'_' | b'-')
}

fn match_case(original: &str, replacement: &str) -> String {
    let mut chars = original.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {
            if chars.all(|c| c.is_ascii_uppercase()) && original.len() > 1 {
                replacement.to_ascii_uppercase()
            } else {
                let mut out = replacement.to_string();
                out[..1].make_ascii_uppercase();
                out
            }
        }
        _ => replacement.to_string(),
    }
}
