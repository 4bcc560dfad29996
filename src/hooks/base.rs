//! Base service-descriptor hook.

use serde_json::Value;

use crate::error::HookError;
use crate::merge::deep_merge;
use crate::naming::{start_case, validate_service_code};
use crate::trace::TraceConfig;

use super::defaults::BaseDefaults;
use super::options::{required_port, required_str};

/// Offset between the local HTTP port and the local lambda port.
const LAMBDA_PORT_OFFSET: u64 = 20_000;

/// Build the base service descriptor.
///
/// Merges the platform defaults with `existing_config`: caller scalars win,
/// caller arrays are appended after the defaults, and a replace directive
/// (see [`crate::FieldOverride`]) swaps out a default subtree wholesale.
///
/// `options` must carry a dash-case `serviceCode` and a numeric
/// `servicePort` (number or numeric string). Trace-extension settings are
/// injected explicitly; use [`TraceConfig::from_env`] to pick them up from
/// the process environment.
pub fn base(
    existing_config: Value,
    options: &Value,
    trace: Option<&TraceConfig>,
) -> Result<Value, HookError> {
    let service_code = required_str(options, "serviceCode")?;
    validate_service_code(service_code)?;

    let http_port = required_port(options, "servicePort")?;

    let service_title = start_case(service_code);
    let service_name = service_title.replace(' ', "");

    // Services running inside a VPC need the managed execution policy on
    // the generated role.
    let with_vpc_policy = existing_config
        .pointer("/provider/vpc")
        .is_some_and(|vpc| !vpc.is_null());

    let defaults = BaseDefaults {
        service_code,
        service_title: &service_title,
        service_name: &service_name,
        http_port,
        lambda_port: http_port + LAMBDA_PORT_OFFSET,
        trace,
        with_vpc_policy,
    };

    Ok(deep_merge(defaults.to_value(), existing_config))
}
