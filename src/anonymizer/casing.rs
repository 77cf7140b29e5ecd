/// Re-shape `replacement` to the casing pattern of `source`.
///
/// An uppercase first character followed by another uppercase character
/// means all-caps; an uppercase first character alone (or a one-character
/// source) means capitalized; anything else leaves the replacement as it
/// came out of the gazetteer.
pub fn apply_casing(source: &str, replacement: &str) -> String {
    let mut chars = source.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => match chars.next() {
            Some(second) if second.is_uppercase() => replacement.to_uppercase(),
            _ => capitalize(replacement),
        },
        _ => replacement.to_string(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str().to_lowercase()),
        None => String::new(),
    }
}
