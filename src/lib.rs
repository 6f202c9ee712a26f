#![warn(clippy::pedantic)]
// Noisy doc/signature lints; would require annotating every pub function
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
// Style preference: keeping format!("{}", x) over format!("{x}") for readability with complex exprs
#![allow(clippy::uninlined_format_args)]
// Module structure: automod::dispatch::DispatchOutcome and similar
#![allow(clippy::module_name_repetitions)]

pub mod automod;
pub mod cli;
pub mod config;
pub mod discord;
pub mod errors;
pub(crate) mod utils;

/// Re-exports for fuzz targets. Not part of the public API.
#[doc(hidden)]
pub mod fuzz_api {
    pub use crate::automod::redact::redact;
    pub use crate::automod::rules::parse_rules;
    pub use crate::automod::template::render;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
