//! Token filters: which tokens a platform or output file includes.

use crate::EmitError;
use std::fmt;
use tessera_core::{Token, TokenType};

/// A named predicate over resolved tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TokenFilter {
    #[default]
    All,
    /// Colours only.
    Color,
    /// Length-like tokens: dimension, fontSize, spacing, borderRadius.
    Dimension,
    /// fontFamily, fontWeight, fontSize, lineHeight.
    Typography,
    /// Explicit list, written `type:color,opacity`.
    Types(Vec<TokenType>),
}

impl TokenFilter {
    pub fn parse(name: &str) -> Result<TokenFilter, EmitError> {
        match name {
            "all" => Ok(TokenFilter::All),
            "color" => Ok(TokenFilter::Color),
            "dimension" => Ok(TokenFilter::Dimension),
            "typography" => Ok(TokenFilter::Typography),
            _ => {
                let list = name
                    .strip_prefix("type:")
                    .ok_or_else(|| EmitError::UnknownFilter(name.to_string()))?;
                let types: Vec<TokenType> = list
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(TokenType::parse)
                    .collect();
                if types.is_empty() {
                    return Err(EmitError::UnknownFilter(name.to_string()));
                }
                Ok(TokenFilter::Types(types))
            }
        }
    }

    pub fn matches(&self, token: &Token) -> bool {
        let ty = &token.token_type;
        match self {
            TokenFilter::All => true,
            TokenFilter::Color => *ty == TokenType::Color,
            TokenFilter::Dimension => ty.is_dimension_like(),
            TokenFilter::Typography => matches!(
                ty,
                TokenType::FontFamily
                    | TokenType::FontWeight
                    | TokenType::FontSize
                    | TokenType::LineHeight
            ),
            TokenFilter::Types(types) => types.contains(ty),
        }
    }
}

impl fmt::Display for TokenFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenFilter::All => f.write_str("all"),
            TokenFilter::Color => f.write_str("color"),
            TokenFilter::Dimension => f.write_str("dimension"),
            TokenFilter::Typography => f.write_str("typography"),
            TokenFilter::Types(types) => {
                let names: Vec<&str> = types.iter().map(TokenType::as_str).collect();
                write!(f, "type:{}", names.join(","))
            }
        }
    }
}
