// Header canonicalization: "Título  de Compra" and "titulo_de_compra" compare equal
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static NON_ALNUM_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("static pattern is valid"));

/// Canonical comparison form of a header: diacritics stripped, lowercased, every run
/// of characters outside `a-z0-9` collapsed to one space, ends trimmed.
pub fn normalize_key(key: &str) -> String {
    let folded: String = key
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();
    NON_ALNUM_RUN.replace_all(&folded, " ").trim().to_string()
}

/// Absent headers normalize to the empty string.
pub fn normalize_optional_key(key: Option<&str>) -> String {
    key.map(normalize_key).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_diacritics_and_case() {
        assert_eq!(normalize_key("Título"), normalize_key("titulo"));
        assert_eq!(normalize_key("Fecha Añadido"), "fecha anadido");
    }

    #[test]
    fn collapses_punctuation_and_whitespace() {
        assert_eq!(normalize_key("  Purchase__Price ($) "), "purchase price");
        assert_eq!(normalize_key("purchase  place"), "purchase place");
        assert_eq!(normalize_key("Date-Added"), "date added");
    }

    #[test]
    fn is_idempotent() {
        for raw in ["Lugar de Compra", "FECHA DE AÑADIDO", "  x--y  ", ""] {
            let once = normalize_key(raw);
            assert_eq!(normalize_key(&once), once);
        }
    }

    #[test]
    fn absent_key_is_empty() {
        assert_eq!(normalize_optional_key(None), "");
        assert_eq!(normalize_optional_key(Some("Precio")), "precio");
    }

    #[test]
    fn non_latin_letters_are_dropped() {
        assert_eq!(normalize_key("Цена price"), "price");
    }
}
