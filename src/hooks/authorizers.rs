//! Authorizer-catalog hook.

use serde_json::{json, Map, Value};

use crate::error::HookError;
use crate::merge::deep_merge;

use super::options::required_str;

/// Result cache TTL shared by every catalog entry, in seconds.
const RESULT_TTL_SECONDS: u32 = 300;

const FULL_HEADERS: &[&str] = &["janis-client", "janis-api-key", "janis-api-secret"];
const API_KEY_HEADERS: &[&str] = &["janis-api-key", "janis-api-secret"];
const CLIENT_HEADERS: &[&str] = &["janis-client"];
const ENTITY_HEADERS: &[&str] = &["janis-api-key", "janis-api-secret", "janis-entity"];
const IMPORT_HEADERS: &[&str] = &[
    "janis-api-key",
    "janis-api-secret",
    "janis-service",
    "janis-entity",
];

/// A catalog entry: the exposed name, the authorizer function its ARN
/// points at, and the request headers it authenticates with.
struct AuthorizerDef {
    name: &'static str,
    function_name: &'static str,
    headers: &'static [&'static str],
}

/// The authorizer catalog.
///
/// `ServiceNoClientAuthorizer` points at the `ServiceAuthorizer` function:
/// both are backed by the same lambda, the entry only drops the client
/// header requirement.
const AUTHORIZERS: &[AuthorizerDef] = &[
    AuthorizerDef {
        name: "FullAuthorizer",
        function_name: "FullAuthorizer",
        headers: FULL_HEADERS,
    },
    AuthorizerDef {
        name: "NoClientAuthorizer",
        function_name: "NoClientAuthorizer",
        headers: API_KEY_HEADERS,
    },
    AuthorizerDef {
        name: "LoggedAuthorizer",
        function_name: "LoggedAuthorizer",
        headers: API_KEY_HEADERS,
    },
    AuthorizerDef {
        name: "ApiKeyAuthorizer",
        function_name: "ApiKeyAuthorizer",
        headers: API_KEY_HEADERS,
    },
    AuthorizerDef {
        name: "UserAuthorizer",
        function_name: "UserAuthorizer",
        headers: API_KEY_HEADERS,
    },
    AuthorizerDef {
        name: "DevUserAuthorizer",
        function_name: "DevUserAuthorizer",
        headers: API_KEY_HEADERS,
    },
    AuthorizerDef {
        name: "ServiceAuthorizer",
        function_name: "ServiceAuthorizer",
        headers: FULL_HEADERS,
    },
    AuthorizerDef {
        name: "ServiceNoClientAuthorizer",
        function_name: "ServiceAuthorizer",
        headers: API_KEY_HEADERS,
    },
    AuthorizerDef {
        name: "ClientAuthorizer",
        function_name: "ClientAuthorizer",
        headers: CLIENT_HEADERS,
    },
    AuthorizerDef {
        name: "ImportExportAuthorizer",
        function_name: "ImportExportAuthorizer",
        headers: ENTITY_HEADERS,
    },
    AuthorizerDef {
        name: "ImportAuthorizer",
        function_name: "ImportAuthorizer",
        headers: IMPORT_HEADERS,
    },
    AuthorizerDef {
        name: "ExportAuthorizer",
        function_name: "ExportAuthorizer",
        headers: ENTITY_HEADERS,
    },
];

impl AuthorizerDef {
    fn arn(&self, account_id: &str) -> String {
        format!(
            "arn:aws:lambda:us-east-1:{}:function:JanisAuthorizerService-${{self:custom.stage}}-{}",
            account_id, self.function_name
        )
    }

    fn identity_source(&self) -> String {
        self.headers
            .iter()
            .map(|header| format!("method.request.header.{}", header))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn to_value(&self, account_id: &str) -> Value {
        json!({
            "name": self.name,
            "arn": self.arn(account_id),
            "resultTtlInSeconds": RESULT_TTL_SECONDS,
            "identitySource": self.identity_source(),
            "type": "request"
        })
    }
}

/// Merge the authorizer catalog under `custom.authorizers`.
///
/// Caller-defined entries are preserved; a generated entry replaces a
/// same-named caller entry wholesale. Sibling `custom` keys and the rest of
/// the descriptor are untouched. `options` must carry the `accountId` the
/// authorizer functions are deployed in.
pub fn authorizers(existing_config: Value, options: &Value) -> Result<Value, HookError> {
    let account_id = required_str(options, "accountId")?;

    // Each entry goes through a replace directive so the generated
    // definition wins over a stale caller copy instead of field-merging
    // into it.
    let catalog: Map<String, Value> = AUTHORIZERS
        .iter()
        .map(|def| {
            (
                def.name.to_string(),
                json!({ "mode": "replace", "value": def.to_value(account_id) }),
            )
        })
        .collect();

    Ok(deep_merge(
        existing_config,
        json!({ "custom": { "authorizers": catalog } }),
    ))
}
