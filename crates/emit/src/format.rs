//! Format registry and helpers shared by the emitters.

use crate::filter::TokenFilter;
use crate::{android, css, javascript, json, swift, EmitError};
use indexmap::IndexMap;
use std::fmt;
use tessera_core::Token;

/// Banner written at the top of every generated file.
pub const DO_NOT_EDIT: &str = "Do not edit directly, this file was auto-generated.";

/// Every supported output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    CssVariables,
    ScssMapDeep,
    JsonNested,
    JsonFlat,
    JavascriptEs6,
    SwiftClass,
    AndroidColors,
    AndroidDimens,
}

impl Format {
    pub const ALL: [Format; 8] = [
        Format::CssVariables,
        Format::ScssMapDeep,
        Format::JsonNested,
        Format::JsonFlat,
        Format::JavascriptEs6,
        Format::SwiftClass,
        Format::AndroidColors,
        Format::AndroidDimens,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Format::CssVariables => "css/variables",
            Format::ScssMapDeep => "scss/map-deep",
            Format::JsonNested => "json/nested",
            Format::JsonFlat => "json/flat",
            Format::JavascriptEs6 => "javascript/es6",
            Format::SwiftClass => "ios-swift/class",
            Format::AndroidColors => "android/colors",
            Format::AndroidDimens => "android/dimens",
        }
    }

    pub fn parse(name: &str) -> Result<Format, EmitError> {
        Format::ALL
            .into_iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| EmitError::UnknownFormat(name.to_string()))
    }

    /// Filter a file of this format applies when none is configured.
    pub fn default_filter(&self) -> TokenFilter {
        match self {
            Format::AndroidColors => TokenFilter::Color,
            Format::AndroidDimens => TokenFilter::Dimension,
            _ => TokenFilter::All,
        }
    }

    /// Serialize the (already filtered) tokens into a document.
    pub fn render(&self, tokens: &[&Token], ctx: &RenderContext<'_>) -> Result<String, EmitError> {
        match self {
            Format::CssVariables => Ok(css::variables(tokens)),
            Format::ScssMapDeep => css::scss_map_deep(tokens, ctx),
            Format::JsonNested => json::nested(tokens, ctx),
            Format::JsonFlat => json::flat(tokens, ctx),
            Format::JavascriptEs6 => Ok(javascript::es6(tokens)),
            Format::SwiftClass => Ok(swift::class(tokens, ctx)),
            Format::AndroidColors => Ok(android::colors(tokens)),
            Format::AndroidDimens => Ok(android::dimens(tokens)),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-file information an emitter may need beyond the tokens.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub theme_id: &'a str,
    /// Destination after placeholder expansion.
    pub destination: &'a str,
    pub class_name: Option<&'a str>,
}

/// Tokens regrouped by their path segments.
#[derive(Debug)]
pub enum Nested<'a> {
    Leaf(&'a Token),
    Group(IndexMap<String, Nested<'a>>),
}

/// Rebuild the group structure from token paths, in table order.
pub fn nest<'a>(
    tokens: &[&'a Token],
    destination: &str,
) -> Result<IndexMap<String, Nested<'a>>, EmitError> {
    let conflict = |token: &Token| EmitError::Emission {
        destination: destination.to_string(),
        message: format!(
            "token '{}' overlaps a group of the same path",
            token.key()
        ),
    };

    let mut root: IndexMap<String, Nested<'a>> = IndexMap::new();
    for token in tokens {
        let Some((last, parents)) = token.path.split_last() else {
            continue;
        };
        let mut level = &mut root;
        for segment in parents {
            let entry = level
                .entry(segment.clone())
                .or_insert_with(|| Nested::Group(IndexMap::new()));
            level = match entry {
                Nested::Group(children) => children,
                Nested::Leaf(_) => return Err(conflict(token)),
            };
        }
        if level.contains_key(last) {
            return Err(conflict(token));
        }
        level.insert(last.clone(), Nested::Leaf(token));
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tessera_core::TokenType;

    #[test]
    fn format_names_round_trip() {
        for format in Format::ALL {
            assert_eq!(Format::parse(format.name()).unwrap(), format);
        }
        assert!(Format::parse("css/nope").is_err());
    }

    #[test]
    fn nest_groups_by_path() {
        let a = Token::new(&["color", "bg"], TokenType::Color, json!("#fff"));
        let b = Token::new(&["color", "fg"], TokenType::Color, json!("#000"));
        let c = Token::new(&["space"], TokenType::Spacing, json!(4));
        let root = nest(&[&a, &b, &c], "out.json").unwrap();
        let keys: Vec<&String> = root.keys().collect();
        assert_eq!(keys, vec!["color", "space"]);
        match &root["color"] {
            Nested::Group(children) => assert_eq!(children.len(), 2),
            Nested::Leaf(_) => panic!("expected group"),
        }
    }

    #[test]
    fn nest_rejects_token_group_overlap() {
        let a = Token::new(&["color"], TokenType::Color, json!("#fff"));
        let b = Token::new(&["color", "bg"], TokenType::Color, json!("#000"));
        assert!(matches!(
            nest(&[&a, &b], "out.json"),
            Err(EmitError::Emission { .. })
        ));
        assert!(nest(&[&b, &a], "out.json").is_err());
    }
}
