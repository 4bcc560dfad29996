//! Trace-extension settings.
//!
//! The trace layer is opt-in: when settings are supplied, the base hook
//! wires the extension into the provider environment and layer list. The
//! process environment is consulted only through [`TraceConfig::from_env`],
//! keeping the hooks themselves free of ambient reads.

use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable holding the AWS account that publishes the trace layer.
pub const TRACE_ACCOUNT_ID_VAR: &str = "TRACE_ACCOUNT_ID";

/// Environment variable holding the published trace-extension layer version.
pub const TRACE_EXTENSION_VERSION_VAR: &str = "JANIS_TRACE_EXTENSION_VERSION";

/// Settings for the Janis trace extension layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceConfig {
    /// AWS account id that publishes the trace layer.
    pub account_id: String,

    /// Published layer version.
    pub extension_version: String,
}

impl TraceConfig {
    /// Read the trace settings from the process environment.
    ///
    /// Returns `None` unless both variables are set and non-empty.
    pub fn from_env() -> Option<Self> {
        let account_id = env::var(TRACE_ACCOUNT_ID_VAR)
            .ok()
            .filter(|value| !value.is_empty())?;
        let extension_version = env::var(TRACE_EXTENSION_VERSION_VAR)
            .ok()
            .filter(|value| !value.is_empty())?;

        Some(Self {
            account_id,
            extension_version,
        })
    }

    /// Layer ARN for this account and version, with the region left as a
    /// deployment-tool template.
    pub fn layer_arn(&self) -> String {
        format!(
            "arn:aws:lambda:${{aws:region}}:{}:layer:trace:{}",
            self.account_id, self.extension_version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_arn() {
        let trace = TraceConfig {
            account_id: "012345678910".to_string(),
            extension_version: "1".to_string(),
        };
        assert_eq!(
            trace.layer_arn(),
            "arn:aws:lambda:${aws:region}:012345678910:layer:trace:1"
        );
    }

    #[test]
    fn test_from_env() {
        // Exercised in a single test so the variable mutations don't
        // interleave with each other under the parallel test runner.
        env::remove_var(TRACE_ACCOUNT_ID_VAR);
        env::remove_var(TRACE_EXTENSION_VERSION_VAR);
        assert_eq!(TraceConfig::from_env(), None);

        env::set_var(TRACE_ACCOUNT_ID_VAR, "012345678910");
        assert_eq!(TraceConfig::from_env(), None);

        env::set_var(TRACE_EXTENSION_VERSION_VAR, "1");
        assert_eq!(
            TraceConfig::from_env(),
            Some(TraceConfig {
                account_id: "012345678910".to_string(),
                extension_version: "1".to_string(),
            })
        );

        env::set_var(TRACE_EXTENSION_VERSION_VAR, "");
        assert_eq!(TraceConfig::from_env(), None);

        env::remove_var(TRACE_ACCOUNT_ID_VAR);
        env::remove_var(TRACE_EXTENSION_VERSION_VAR);
    }
}
