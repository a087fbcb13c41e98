//! Utility functions for imobi
//!
//! Common helper functions used across the codebase.

/// Split a delimited query value into its non-empty, trimmed segments.
///
/// # Examples
///
/// ```
/// use imobi_common::split_list;
///
/// assert_eq!(split_list("Centro,, Alto ,", ','), vec!["Centro", "Alto"]);
/// assert!(split_list("", ',').is_empty());
/// ```
pub fn split_list(raw: &str, separator: char) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build a document key from a display name.
///
/// Lowercases, folds Portuguese accents to ASCII and collapses every run of
/// other characters into a single `-`.
///
/// # Examples
///
/// ```
/// use imobi_common::sanitize_key;
///
/// assert_eq!(sanitize_key("São Pedro"), "sao-pedro");
/// assert_eq!(sanitize_key("  Santa Bárbara d'Oeste "), "santa-barbara-d-oeste");
/// ```
pub fn sanitize_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        let folded = fold_accent(c);
        if folded.is_ascii_alphanumeric() {
            if pending_dash && !key.is_empty() {
                key.push('-');
            }
            pending_dash = false;
            key.push(folded);
        } else {
            pending_dash = true;
        }
    }

    key
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

/// Interpret a query flag such as `lancamento=sim`.
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "1" | "true" | "sim" | "s" | "on"
    )
}

/// Keep only the ASCII digits of a phone number or document.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_split_list_drops_empty_segments() {
        assert_eq!(
            split_list("Apartamento,Casa,,", ','),
            vec!["Apartamento".to_string(), "Casa".to_string()]
        );
        assert_eq!(split_list(" , ,", ','), Vec::<String>::new());
    }

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("Piracicaba"), "piracicaba");
        assert_eq!(sanitize_key("Águas de São Pedro"), "aguas-de-sao-pedro");
        assert_eq!(sanitize_key("--Rio Claro--"), "rio-claro");
        assert_eq!(sanitize_key(""), "");
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("sim"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("nao"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("(19) 99999-0000"), "19999990000");
    }

    proptest! {
        #[test]
        fn sanitize_key_only_emits_key_chars(name in "\\PC{0,40}") {
            let key = sanitize_key(&name);
            prop_assert!(key.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!key.starts_with('-'));
            prop_assert!(!key.ends_with('-'));
            prop_assert!(!key.contains("--"));
        }
    }
}
