/// Expands a numerology value into its equivalent tokens.
///
/// Compound master/reduced forms split on `/` ("22/4" -> ["22", "4"]);
/// plain values yield a single token; empty or absent input yields an empty
/// set, making any overlap test vacuously false.
pub fn normalize(value: Option<&str>) -> Vec<String> {
    let Some(raw) = value else {
        return Vec::new();
    };
    raw.split('/')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Whether two numerology values share any token. Symmetric: "22" matches
/// "22/4" and "4" matches "22/4".
pub fn overlaps(a: Option<&str>, b: Option<&str>) -> bool {
    let tokens_a = normalize(a);
    let tokens_b = normalize(b);
    tokens_a.iter().any(|token| tokens_b.contains(token))
}

/// Whether a value carries at least one usable token.
pub fn is_present(value: Option<&str>) -> bool {
    !normalize(value).is_empty()
}
