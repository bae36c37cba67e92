// Resolves which raw column of a dataset carries a given field
use shared::models::RawRow;

use super::key_normalizer::normalize_key;

/// Finds the header in `sample` that denotes the field described by `aliases`.
///
/// An exact match on the normalized form wins over everything; only if no header
/// matches exactly is a header accepted whose normalized form contains an alias.
/// Within each pass the first header in column order wins.
pub fn resolve_header<'a, S: AsRef<str>>(sample: &'a RawRow, aliases: &[S]) -> Option<&'a str> {
    let wanted: Vec<String> = aliases
        .iter()
        .map(|a| normalize_key(a.as_ref()))
        .filter(|a| !a.is_empty())
        .collect();
    if wanted.is_empty() {
        return None;
    }

    let normalized: Vec<(&str, String)> = sample
        .headers()
        .map(|h| (h, normalize_key(h)))
        .collect();

    normalized
        .iter()
        .find(|(_, nk)| wanted.iter().any(|a| nk == a))
        .or_else(|| {
            normalized
                .iter()
                .find(|(_, nk)| wanted.iter().any(|a| nk.contains(a.as_str())))
        })
        .map(|(h, _)| *h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::RawValue;

    fn row(headers: &[&str]) -> RawRow {
        headers.iter().map(|h| (*h, RawValue::Absent)).collect()
    }

    #[test]
    fn exact_match_ignores_case_and_accents() {
        let sample = row(&["Título", "Precio de Compra"]);
        assert_eq!(resolve_header(&sample, &["title", "titulo"]), Some("Título"));
        assert_eq!(
            resolve_header(&sample, &["purchase price", "precio de compra"]),
            Some("Precio de Compra")
        );
    }

    #[test]
    fn exact_match_beats_earlier_substring_match() {
        // "date" is contained in "Date Added" but "Purchase Date" matches exactly.
        let sample = row(&["Date Added", "Purchase Date"]);
        assert_eq!(
            resolve_header(&sample, &["purchase date", "fecha de compra", "date"]),
            Some("Purchase Date")
        );
    }

    #[test]
    fn first_header_in_column_order_wins() {
        let sample = row(&["Price", "Purchase Price"]);
        assert_eq!(
            resolve_header(&sample, &["purchase price", "price"]),
            Some("Price")
        );
    }

    #[test]
    fn substring_fallback() {
        let sample = row(&["Book Title (original)", "Cost"]);
        assert_eq!(resolve_header(&sample, &["title"]), Some("Book Title (original)"));
    }

    #[test]
    fn unresolved_field_is_none() {
        let sample = row(&["Author", "ISBN"]);
        assert_eq!(resolve_header(&sample, &["price", "precio"]), None);
        assert_eq!(resolve_header(&RawRow::new(), &["price"]), None);
    }

    #[test]
    fn blank_aliases_never_match() {
        let sample = row(&["Anything"]);
        assert_eq!(resolve_header(&sample, &["", "  "]), None);
    }
}
