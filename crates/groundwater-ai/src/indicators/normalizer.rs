pub(crate) fn normalize_location(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_uppercase()
}

/// Parses scraped numeric cells such as `"1,23,456.7"`; blanks and dashes read as missing.
pub(crate) fn parse_quantity(value: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|ch| *ch != ',' && !ch.is_whitespace())
        .collect();

    if cleaned.is_empty() || cleaned == "-" || cleaned.eq_ignore_ascii_case("na") {
        return Ok(None);
    }

    cleaned.parse::<f64>().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_location_collapses_whitespace_and_case() {
        assert_eq!(normalize_location("\u{feff}  tamil   nadu "), "TAMIL NADU");
        assert_eq!(normalize_location("Pune"), "PUNE");
    }

    #[test]
    fn parse_quantity_handles_indian_digit_grouping() {
        assert_eq!(parse_quantity("1,23,456.5").unwrap(), Some(123456.5));
        assert_eq!(parse_quantity(" 600 ").unwrap(), Some(600.0));
        assert_eq!(parse_quantity("").unwrap(), None);
        assert_eq!(parse_quantity("-").unwrap(), None);
        assert!(parse_quantity("n/a?").is_err());
    }
}
