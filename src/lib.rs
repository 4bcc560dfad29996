//! Janis serverless descriptor hooks.
//!
//! This crate implements the configuration hooks that take a partial
//! serverless deployment descriptor and deep-merge in the Janis platform
//! defaults: provider settings, the service execution role, API-gateway
//! error responses, the authorizer catalog, packaging globs and the plugin
//! list. Each hook is a pure transform over the trees it is given; the
//! deployment tool serializes the result.

pub mod error;
pub mod hooks;
pub mod merge;
pub mod naming;
pub mod trace;

pub use error::HookError;
pub use hooks::{authorizers, base};
pub use merge::{deep_merge, FieldOverride};
pub use trace::TraceConfig;
