//! Per-rule predicates over string values.

use regex::Regex;

pub(crate) fn is_email(value: &str) -> bool {
    // Same basic shape check the form layer has always used.
    let pattern = Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("static email pattern");
    pattern.is_match(value)
}

pub(crate) fn is_alpha_numeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
}

pub(crate) fn is_alpha_numeric_space(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ')
}

pub(crate) fn is_alpha_dash(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub(crate) fn is_alpha_space(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == ' ')
}

pub(crate) fn is_alpha_numeric_punct(value: &str) -> bool {
    const PUNCT: &str = "~!#$%&*-_+=|:. ";
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || PUNCT.contains(c))
}

pub(crate) fn is_valid_json(value: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(value).is_ok()
}

pub(crate) fn is_valid_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

pub(crate) fn is_valid_ip(value: &str) -> bool {
    value.parse::<std::net::IpAddr>().is_ok()
}

pub(crate) fn is_valid_date(value: &str) -> bool {
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// Luhn check over the digits, ignoring spaces and dashes.
pub(crate) fn is_valid_cc_number(value: &str) -> bool {
    let digits: Vec<u32> = value
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .map(|c| c.to_digit(10))
        .collect::<Option<_>>()
        .unwrap_or_default();

    if digits.len() < 12 || digits.len() > 19 {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();

    sum % 10 == 0
}
