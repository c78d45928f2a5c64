use std::sync::LazyLock;

use regex::Regex;

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}").unwrap());

/// Best-effort integer from a price string. Strips everything that is not
/// an ASCII digit — narrow no-break separators (U+202F), regular spaces,
/// and the "F CFA" currency suffix included.
pub fn parse_price(raw: &str) -> Option<i64> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// First run of 4 consecutive digits, e.g. "2019" out of "Année 2019".
pub fn parse_year(raw: &str) -> Option<i32> {
    YEAR_RE.find(raw).and_then(|m| m.as_str().parse().ok())
}

/// Alternate year encoding seen in one source layout: the composite title
/// carries the year as its second-to-last whitespace token
/// ("Toyota Corolla 2019 Dakar"). "0" is a placeholder, not a year.
pub fn year_from_title(title: &str) -> Option<i32> {
    let tokens: Vec<&str> = title.split_whitespace().collect();
    if tokens.len() < 2 {
        return None;
    }
    let token = tokens[tokens.len() - 2];
    if token == "0" {
        return None;
    }
    token.parse().ok()
}

/// Mileage in km from strings like "45 000 km" (with U+202F separators).
pub fn parse_mileage(raw: &str) -> Option<i64> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleParts {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub city: Option<String>,
}

/// Split a composite "brand model ... city" title by token position:
/// brand is the first token; model and city are the second and last tokens
/// and only exist when there are more than 2 tokens. A heuristic — it
/// misreads multi-word brands — kept as the documented contract.
pub fn split_title(composite: &str) -> TitleParts {
    let tokens: Vec<&str> = composite.split_whitespace().collect();
    let brand = tokens.first().map(|t| t.to_string());
    let (model, city) = if tokens.len() > 2 {
        (
            tokens.get(1).map(|t| t.to_string()),
            tokens.last().map(|t| t.to_string()),
        )
    } else {
        (None, None)
    };
    TitleParts { brand, model, city }
}

/// Owner name from an ad's free text: the span between "Par " and the
/// following "Appeler", title-cased. "Unknown" when the marker is absent.
pub fn extract_owner(text: &str) -> String {
    let Some(after) = text.split("Par ").nth(1) else {
        return "Unknown".to_string();
    };
    let owner = after.split("Appeler").next().unwrap_or(after).trim();
    if owner.is_empty() {
        return "Unknown".to_string();
    }
    title_case(owner)
}

/// Uppercase the first letter of each whitespace-separated word,
/// lowercase the rest.
fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_with_narrow_spaces_and_currency() {
        assert_eq!(parse_price("12\u{202f}500\u{202f}000 F CFA"), Some(12_500_000));
    }

    #[test]
    fn price_plain_digits() {
        assert_eq!(parse_price("4500000"), Some(4_500_000));
    }

    #[test]
    fn price_without_digits_is_missing() {
        assert_eq!(parse_price("Prix sur demande"), None);
        assert_eq!(parse_price(""), None);
    }

    #[test]
    fn year_embedded_in_text() {
        assert_eq!(parse_year("mise en circulation 2019"), Some(2019));
        assert_eq!(parse_year("2021"), Some(2021));
    }

    #[test]
    fn year_needs_four_digit_run() {
        assert_eq!(parse_year("v8"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn year_fallback_second_to_last_token() {
        assert_eq!(year_from_title("Toyota Corolla 2019 Dakar"), Some(2019));
    }

    #[test]
    fn year_fallback_rejects_zero_placeholder() {
        assert_eq!(year_from_title("Toyota Corolla 0 Dakar"), None);
    }

    #[test]
    fn year_fallback_rejects_non_numeric() {
        assert_eq!(year_from_title("Toyota Corolla grise Dakar"), None);
        assert_eq!(year_from_title("Toyota"), None);
    }

    #[test]
    fn mileage_with_unit_and_separator() {
        assert_eq!(parse_mileage("45\u{202f}000 km"), Some(45_000));
        assert_eq!(parse_mileage("45 000 km"), Some(45_000));
    }

    #[test]
    fn mileage_unit_alone_is_missing() {
        assert_eq!(parse_mileage("km"), None);
    }

    #[test]
    fn split_full_title() {
        let parts = split_title("Toyota Corolla 2019 Dakar");
        assert_eq!(parts.brand.as_deref(), Some("Toyota"));
        assert_eq!(parts.model.as_deref(), Some("Corolla"));
        assert_eq!(parts.city.as_deref(), Some("Dakar"));
    }

    #[test]
    fn split_two_tokens_has_no_model_or_city() {
        let parts = split_title("Toyota Corolla");
        assert_eq!(parts.brand.as_deref(), Some("Toyota"));
        assert_eq!(parts.model, None);
        assert_eq!(parts.city, None);
    }

    #[test]
    fn split_empty() {
        let parts = split_title("   ");
        assert_eq!(parts.brand, None);
        assert_eq!(parts.model, None);
        assert_eq!(parts.city, None);
    }

    // The documented approximation: multi-word brands get split on the
    // first token like everything else.
    #[test]
    fn split_multi_word_brand_follows_token_rule() {
        let parts = split_title("Land Rover Defender 2020 Thies");
        assert_eq!(parts.brand.as_deref(), Some("Land"));
        assert_eq!(parts.model.as_deref(), Some("Rover"));
        assert_eq!(parts.city.as_deref(), Some("Thies"));
    }

    #[test]
    fn owner_between_markers_is_title_cased() {
        let text = "Ad text Par Jean Dupont Appeler maintenant";
        assert_eq!(extract_owner(text), "Jean Dupont");
    }

    #[test]
    fn owner_marker_case_normalized() {
        let text = "Par JEAN DUPONT Appeler";
        assert_eq!(extract_owner(text), "Jean Dupont");
    }

    #[test]
    fn owner_without_marker_is_unknown() {
        assert_eq!(extract_owner("no seller info here"), "Unknown");
    }

    #[test]
    fn owner_without_closing_marker_takes_rest() {
        assert_eq!(extract_owner("Par amadou ba"), "Amadou Ba");
    }
}
