//! tessera-core: design-token loading, theme composition and resolution.
//!
//! The pipeline runs in numbered passes:
//!
//! - [`pass1_load`] -- expand source patterns, parse token files into
//!   [`TokenTree`]s tagged as [`Layer`]s
//! - [`pass2_compose`] -- pick the ordered layer list for a theme
//! - [`pass3_resolve`] -- merge layers, apply mode overrides, resolve aliases
//! - [`pass4_transform`] -- run named value/name transforms per platform
//!
//! [`resolve_theme()`] chains passes 2 and 3.

pub mod ast;
pub mod color;
pub mod error;
pub mod naming;
pub mod parser;
pub mod pass1_load;
pub mod pass2_compose;
pub mod pass3_resolve;
pub mod pass4_transform;
pub mod path;
pub mod pipeline;
pub mod source;
pub mod theme;

// ── Convenience re-exports: key types ────────────────────────────────

pub use ast::{Category, RawToken, Token, TokenNode, TokenTable, TokenTree, TokenType};
pub use error::TokenError;
pub use pass1_load::{Layer, LoadOutcome};
pub use pass4_transform::TransformPipeline;
pub use theme::{ThemeDescriptor, TokenSetSelection};

// ── Convenience re-exports: pipeline entry points ────────────────────

pub use pass1_load::{load_sources, load_sources_with_provider};
pub use pass2_compose::compose;
pub use pass3_resolve::resolve;
pub use pipeline::resolve_theme;
pub use theme::{load_theme_manifest, parse_theme_manifest};
