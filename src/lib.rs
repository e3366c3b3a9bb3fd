//! Structured data, sitemap and CMS content tooling for a firm marketing site.
//!
//! Every tool lives under [`tools`]; the [`cli`] module wires them to the
//! `firmsite` binary.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod macros;
pub mod runtime;
pub mod selectors;
pub mod tools;
pub mod types;

pub use config::SiteConfig;
pub use error::{Result, SiteError};
pub use types::*;
