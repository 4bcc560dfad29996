//! Service-code validation and display-name derivation.

use regex_lite::Regex;

use crate::error::HookError;

/// Dash-case service codes: lowercase letters, digits and hyphens.
///
/// Lowercase accented Latin-1 letters are accepted (the two ranges skip
/// U+00F7, the division sign).
const SERVICE_CODE_PATTERN: &str = "^[a-z0-9à-öø-ÿ-]+$";

/// Check that a service code is in dash-case.
pub(crate) fn validate_service_code(code: &str) -> Result<(), HookError> {
    let pattern = Regex::new(SERVICE_CODE_PATTERN).expect("hard-coded pattern compiles");
    if pattern.is_match(code) {
        Ok(())
    } else {
        Err(HookError::invalid(
            "serviceCode",
            format!("'{}' is not in dash-case", code),
        ))
    }
}

/// Start-case a dash-case code: each segment capitalized, joined by spaces.
///
/// `"push-notification"` becomes `"Push Notification"`.
pub(crate) fn start_case(code: &str) -> String {
    code.split('-')
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
