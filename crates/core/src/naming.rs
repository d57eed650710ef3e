//! Case conversions used by name transforms and emitters.

/// Split path segments into lowercase words. Word boundaries are
/// non-alphanumeric characters and lower-to-upper case changes.
pub fn words<S: AsRef<str>>(segments: &[S]) -> Vec<String> {
    let mut out = Vec::new();
    for segment in segments {
        let mut current = String::new();
        let mut prev_lower = false;
        for ch in segment.as_ref().chars() {
            if !ch.is_alphanumeric() {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
                prev_lower = false;
                continue;
            }
            if ch.is_uppercase() && prev_lower && !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
            current.extend(ch.to_lowercase());
        }
        if !current.is_empty() {
            out.push(current);
        }
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn kebab_case<S: AsRef<str>>(segments: &[S]) -> String {
    words(segments).join("-")
}

pub fn snake_case<S: AsRef<str>>(segments: &[S]) -> String {
    words(segments).join("_")
}

pub fn camel_case<S: AsRef<str>>(segments: &[S]) -> String {
    words(segments)
        .iter()
        .enumerate()
        .map(|(i, w)| if i == 0 { w.clone() } else { capitalize(w) })
        .collect()
}

pub fn pascal_case<S: AsRef<str>>(segments: &[S]) -> String {
    words(segments).iter().map(|w| capitalize(w)).collect()
}

/// Prefix applied to names that would otherwise start with a digit.
pub const IDENTIFIER_PREFIX: &str = "_";

/// Rewrite `name` into a legal identifier in C-family languages.
pub fn identifier_safe(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert_str(0, IDENTIFIER_PREFIX);
    }
    out
}

/// True if `name` is already a legal identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
