/// Lower-cased, underscore separated category key (`"Retail  Sale"` -> `"retail_sale"`).
pub(crate) fn normalize_category(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_ascii_lowercase()
}

/// Why an amount cell could not be reduced to a plain decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AmountRejection {
    /// `,` could be a decimal or a grouping separator.
    AmbiguousComma,
    UnexpectedCharacter(char),
}

/// Strip currency symbols and spaces. Any other character than digits,
/// `.` and `-` rejects the cell.
pub(crate) fn normalize_amount(value: &str) -> Result<String, AmountRejection> {
    let mut normalized = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '0'..='9' | '.' | '-' => normalized.push(ch),
            ',' => return Err(AmountRejection::AmbiguousComma),
            _ if ch.is_whitespace() || is_currency_symbol(ch) => {}
            _ => return Err(AmountRejection::UnexpectedCharacter(ch)),
        }
    }
    Ok(normalized)
}

fn is_currency_symbol(ch: char) -> bool {
    matches!(ch, '$' | '€' | '£' | '¥' | '₹' | '₽' | '₺' | '₩' | '\u{feff}')
}

#[cfg(test)]
pub(crate) fn normalize_category_for_tests(value: &str) -> String {
    normalize_category(value)
}

#[cfg(test)]
pub(crate) fn normalize_amount_for_tests(value: &str) -> Result<String, AmountRejection> {
    normalize_amount(value)
}
