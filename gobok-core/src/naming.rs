//! Identifier case conversion for generated Go names.

/// Uppercase the first character (e.g., "name" -> "Name", "ID" -> "ID").
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars).collect(),
    }
}

/// Convert an identifier to lowerCamelCase, treating a leading run of
/// capitals as an initialism (e.g., "Name" -> "name", "ID" -> "id",
/// "URLPath" -> "urlPath").
pub fn to_lower_camel(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let run = chars.iter().take_while(|c| c.is_uppercase()).count();

    // In "URLPath" the capital before the first lowercase letter starts the
    // next word, so only "URL" is lowered.
    let lower_count = match chars.get(run) {
        Some(next) if run > 1 && next.is_lowercase() => run - 1,
        _ => run,
    };

    chars
        .iter()
        .enumerate()
        .flat_map(|(i, c)| {
            if i < lower_count {
                c.to_lowercase().collect::<Vec<_>>()
            } else {
                vec![*c]
            }
        })
        .collect()
}
