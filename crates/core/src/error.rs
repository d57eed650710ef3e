use serde::Serialize;

/// Errors raised while loading, composing, resolving or transforming tokens.
///
/// Load errors for individual files are collected by the loader; everything
/// else is fatal for the theme being resolved.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenError {
    /// A required source pattern matched no files.
    #[error("no token files match pattern '{pattern}'")]
    SourceNotFound { pattern: String },

    /// A token file or theme manifest could not be read or parsed.
    #[error("{file}: {message}")]
    Parse { file: String, message: String },

    /// A theme selects a token set that no loaded layer provides.
    #[error("theme '{theme}': no {category} token set named '{set}'")]
    UnknownTokenSet {
        theme: String,
        category: String,
        set: String,
    },

    /// Alias resolution revisited a token already on the visit stack.
    #[error("cyclic reference: {}", .cycle.join(" \u{2192} "))]
    CyclicReference { cycle: Vec<String> },

    /// An alias names a path that is not in the merged table.
    #[error("token '{token}' references unknown token '{reference}'")]
    UnresolvedReference { token: String, reference: String },

    /// A primitive token aliases a semantic or component token.
    #[error("primitive token '{token}' cannot reference {category} token '{reference}'")]
    LayeringViolation {
        token: String,
        reference: String,
        category: String,
    },

    /// A dotted path or reference is malformed.
    #[error("invalid token path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    /// A transform name has no entry in the registry.
    #[error("unknown transform '{name}'")]
    UnknownTransform { name: String },
}

impl TokenError {
    pub fn parse(file: impl Into<String>, message: impl Into<String>) -> Self {
        TokenError::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Short stable identifier for the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::SourceNotFound { .. } => "source_not_found",
            TokenError::Parse { .. } => "parse",
            TokenError::UnknownTokenSet { .. } => "unknown_token_set",
            TokenError::CyclicReference { .. } => "cyclic_reference",
            TokenError::UnresolvedReference { .. } => "unresolved_reference",
            TokenError::LayeringViolation { .. } => "layering_violation",
            TokenError::InvalidPath { .. } => "invalid_path",
            TokenError::UnknownTransform { .. } => "unknown_transform",
        }
    }
}
