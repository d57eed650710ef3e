use std::path::PathBuf;
use tessera_core::TokenError;
use tessera_emit::EmitError;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    pub fn kind(&self) -> &'static str {
        match self {
            BuildError::Token(e) => e.kind(),
            BuildError::Emit(EmitError::UnknownFormat(_)) => "unknown_format",
            BuildError::Emit(EmitError::UnknownFilter(_)) => "unknown_filter",
            BuildError::Emit(EmitError::Emission { .. }) | BuildError::Write { .. } => "emission",
        }
    }
}
