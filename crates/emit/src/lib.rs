//! Platform emission for resolved token tables.
//!
//! A [`PlatformSpec`] owns a transform pipeline, a platform-wide filter and
//! a list of output files. [`emit`] applies all three to one resolved table
//! and returns the rendered documents; writing them is the caller's job.

pub mod android;
pub mod css;
pub mod filter;
pub mod format;
pub mod javascript;
pub mod json;
pub mod platform;
pub mod swift;

use serde::Serialize;

pub use filter::TokenFilter;
pub use format::{Format, RenderContext};
pub use platform::{
    default_platforms, emit, expand_theme_placeholders, FileSpec, OutputFile, PlatformSpec,
};

#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmitError {
    #[error("unknown format '{0}'")]
    UnknownFormat(String),

    #[error("unknown filter '{0}' (expected all, color, dimension, typography or type:<list>)")]
    UnknownFilter(String),

    #[error("cannot render {destination}: {message}")]
    Emission {
        destination: String,
        message: String,
    },
}
