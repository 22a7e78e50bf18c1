//! Format checks for individual scalar fields.

use crate::error::ViolationKind;
use url::Url;

/// Check an email address: one `@`, a non-empty local part, and a dotted
/// domain without empty labels. Whitespace is never allowed.
pub fn check_email(value: &str) -> Result<(), ViolationKind> {
    if value.chars().any(char::is_whitespace) {
        return Err(ViolationKind::InvalidEmail);
    }

    let (local, domain) = value.split_once('@').ok_or(ViolationKind::InvalidEmail)?;
    if local.is_empty() || domain.contains('@') {
        return Err(ViolationKind::InvalidEmail);
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(ViolationKind::InvalidEmail);
    }

    Ok(())
}

/// Check an absolute http(s) URL with a host.
pub fn check_http_url(value: &str) -> Result<(), ViolationKind> {
    let url = Url::parse(value).map_err(|e| ViolationKind::InvalidUrl {
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ViolationKind::InvalidUrl {
            reason: "URL scheme should be 'http' or 'https'".to_string(),
        });
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ViolationKind::InvalidUrl {
            reason: "missing host".to_string(),
        });
    }

    Ok(())
}

/// Check the leading number of a GPA such as `3.8` or `3.8/4.0` against an
/// inclusive range. The number may carry a sign.
pub fn check_gpa(value: &str, (min, max): (f64, f64)) -> Result<(), ViolationKind> {
    let trimmed = value.trim();
    let (sign, rest) = match trimmed.strip_prefix(['-', '+']) {
        Some(rest) => (&trimmed[..1], rest),
        None => ("", trimmed),
    };
    let digits: String = rest
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let numeric = format!("{}{}", sign, digits);

    let gpa: f64 = numeric.parse().map_err(|_| ViolationKind::WrongType {
        expected: "numeric GPA",
        found: format!("'{}'", value),
    })?;

    if gpa < min || gpa > max {
        return Err(ViolationKind::OutOfRange {
            min,
            max,
            value: gpa,
        });
    }

    Ok(())
}
