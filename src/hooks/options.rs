//! Option-extraction guards shared by the hooks.
//!
//! Options arrive as an untyped JSON object from the host tool, so presence
//! and type are checked dynamically.

use serde_json::Value;

use crate::error::HookError;

/// Fetch a required string option.
pub(crate) fn required_str<'a>(
    options: &'a Value,
    name: &'static str,
) -> Result<&'a str, HookError> {
    let value = options.get(name).ok_or(HookError::MissingOption(name))?;
    value
        .as_str()
        .ok_or_else(|| HookError::invalid(name, "expected a string"))
}

/// Fetch a required port option: a number, or a string holding one.
pub(crate) fn required_port(options: &Value, name: &'static str) -> Result<u64, HookError> {
    let value = options.get(name).ok_or(HookError::MissingOption(name))?;
    match value {
        Value::Number(port) => port
            .as_u64()
            .ok_or_else(|| HookError::invalid(name, "expected a positive integer")),
        Value::String(port) => port
            .parse()
            .map_err(|_| HookError::invalid(name, "expected a numeric string")),
        _ => Err(HookError::invalid(
            name,
            "expected a number or numeric string",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_str() {
        let options = json!({"serviceCode": "testing"});
        assert_eq!(required_str(&options, "serviceCode").unwrap(), "testing");

        assert!(matches!(
            required_str(&options, "accountId"),
            Err(HookError::MissingOption("accountId"))
        ));

        let options = json!({"serviceCode": ["invalid"]});
        assert!(matches!(
            required_str(&options, "serviceCode"),
            Err(HookError::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_required_port() {
        assert_eq!(
            required_port(&json!({"servicePort": 3000}), "servicePort").unwrap(),
            3000
        );
        assert_eq!(
            required_port(&json!({"servicePort": "3000"}), "servicePort").unwrap(),
            3000
        );

        assert!(matches!(
            required_port(&json!({}), "servicePort"),
            Err(HookError::MissingOption("servicePort"))
        ));
        assert!(required_port(&json!({"servicePort": ["invalid"]}), "servicePort").is_err());
        assert!(required_port(&json!({"servicePort": "eighty"}), "servicePort").is_err());
        assert!(required_port(&json!({"servicePort": -1}), "servicePort").is_err());
    }
}
