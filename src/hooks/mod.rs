//! Descriptor hooks.
//!
//! Each hook is an entry point for the deployment-tool configuration file:
//! `hook(existing_config, options) -> merged_config`. The caller's partial
//! descriptor always survives the merge; the hooks only add and overlay the
//! generated defaults.

mod authorizers;
mod base;
mod defaults;
mod options;

pub use authorizers::authorizers;
pub use base::base;
