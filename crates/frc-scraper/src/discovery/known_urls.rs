/// Union of the URL lists whose keyword occurs in the lowercased query, in
/// table order.
#[must_use]
pub fn known_candidates(table: &[(String, Vec<String>)], query: &str) -> Vec<String> {
    let query = query.to_lowercase();
    table
        .iter()
        .filter(|(keyword, _)| query.contains(keyword.as_str()))
        .flat_map(|(_, urls)| urls.iter().cloned())
        .collect()
}
