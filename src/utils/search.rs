/// Normalized search keyword. `None` means "no filter".
pub fn normalize_keyword(keyword: &str) -> Option<String> {
    let keyword = keyword.trim();
    (!keyword.is_empty()).then(|| keyword.to_lowercase())
}

/// Case-insensitive substring match against any of `fields`.
/// An empty keyword matches everything.
pub fn matches_any(fields: &[&str], keyword: &str) -> bool {
    match normalize_keyword(keyword) {
        None => true,
        Some(needle) => fields.iter().any(|f| f.to_lowercase().contains(&needle)),
    }
}

/// `LIKE` pattern for an already-lowercased keyword, with MySQL wildcards
/// escaped so `%` and `_` are matched literally.
pub fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
