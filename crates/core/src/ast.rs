//! Shared token model for the tessera pipeline.
//!
//! Raw types are produced by the source parser and consumed by the
//! composer and resolver. Resolved types ([`Token`], [`TokenTable`]) are what
//! the transform pipeline and the emitters see.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::path::join_path;

// ──────────────────────────────────────────────
// Layer categories
// ──────────────────────────────────────────────

/// Which layer of the token architecture a source file belongs to.
///
/// The derived ordering (primitive < semantic < component) is the override
/// precedence used by the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Primitive,
    Semantic,
    Component,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Primitive, Category::Semantic, Category::Component];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Primitive => "primitive",
            Category::Semantic => "semantic",
            Category::Component => "component",
        }
    }

    /// Match a category name or a conventional directory name
    /// (`primitives`, `components`).
    pub fn from_name(name: &str) -> Option<Category> {
        match name.to_ascii_lowercase().as_str() {
            "primitive" | "primitives" => Some(Category::Primitive),
            "semantic" | "semantics" => Some(Category::Semantic),
            "component" | "components" => Some(Category::Component),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ──────────────────────────────────────────────
// Token types
// ──────────────────────────────────────────────

/// The declared kind of a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenType {
    Color,
    Dimension,
    FontSize,
    Spacing,
    FontFamily,
    FontWeight,
    LineHeight,
    BorderRadius,
    Opacity,
    String,
    Number,
    Boolean,
    /// Any type name tessera has no special handling for, kept verbatim.
    Other(String),
}

impl TokenType {
    /// Parse a type name. Accepts DTCG camelCase, kebab-case and the plural
    /// spellings used by Tokens Studio (`fontSizes`, `fontFamilies`, ...).
    pub fn parse(name: &str) -> TokenType {
        let key: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "color" | "colors" => TokenType::Color,
            "dimension" | "dimensions" | "sizing" | "size" => TokenType::Dimension,
            "fontsize" | "fontsizes" => TokenType::FontSize,
            "spacing" | "space" => TokenType::Spacing,
            "fontfamily" | "fontfamilies" => TokenType::FontFamily,
            "fontweight" | "fontweights" => TokenType::FontWeight,
            "lineheight" | "lineheights" => TokenType::LineHeight,
            "borderradius" | "borderradii" => TokenType::BorderRadius,
            "opacity" => TokenType::Opacity,
            "string" | "text" | "content" => TokenType::String,
            "number" => TokenType::Number,
            "boolean" | "bool" => TokenType::Boolean,
            _ => TokenType::Other(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TokenType::Color => "color",
            TokenType::Dimension => "dimension",
            TokenType::FontSize => "fontSize",
            TokenType::Spacing => "spacing",
            TokenType::FontFamily => "fontFamily",
            TokenType::FontWeight => "fontWeight",
            TokenType::LineHeight => "lineHeight",
            TokenType::BorderRadius => "borderRadius",
            TokenType::Opacity => "opacity",
            TokenType::String => "string",
            TokenType::Number => "number",
            TokenType::Boolean => "boolean",
            TokenType::Other(name) => name,
        }
    }

    /// Types whose numeric values carry a length unit.
    pub fn is_dimension_like(&self) -> bool {
        matches!(
            self,
            TokenType::Dimension | TokenType::FontSize | TokenType::Spacing | TokenType::BorderRadius
        )
    }

    /// Infer a type from a literal when neither the token nor its group
    /// declares one.
    pub fn infer(value: &Value) -> TokenType {
        match value {
            Value::Number(_) => TokenType::Number,
            Value::Bool(_) => TokenType::Boolean,
            _ => TokenType::String,
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TokenType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TokenType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(TokenType::parse(&name))
    }
}

// ──────────────────────────────────────────────
// Raw tree (one source file)
// ──────────────────────────────────────────────

/// Mode overrides keyed by axis, then by mode identifier.
pub type ModeOverrides = BTreeMap<String, BTreeMap<String, Value>>;

/// A token leaf as written in a source file, before resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct RawToken {
    /// Declared type (own or inherited from an enclosing group).
    pub token_type: Option<TokenType>,
    /// Literal, alias (`"{a.b}"`), or string with embedded aliases.
    pub value: Value,
    pub description: Option<String>,
    pub mode_overrides: ModeOverrides,
}

impl RawToken {
    pub fn new(token_type: Option<TokenType>, value: Value) -> Self {
        RawToken {
            token_type,
            value,
            description: None,
            mode_overrides: BTreeMap::new(),
        }
    }
}

/// A tree node is either a nested group or a token, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenNode {
    Group(TokenTree),
    Token(RawToken),
}

/// Ordered mapping from path segment to node, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenTree {
    pub entries: Vec<(String, TokenNode)>,
}

impl TokenTree {
    pub fn new() -> Self {
        TokenTree::default()
    }

    pub fn push(&mut self, segment: impl Into<String>, node: TokenNode) {
        self.entries.push((segment.into(), node));
    }

    /// Number of token leaves in the tree.
    pub fn token_count(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, node)| match node {
                TokenNode::Group(tree) => tree.token_count(),
                TokenNode::Token(_) => 1,
            })
            .sum()
    }
}

// ──────────────────────────────────────────────
// Resolved tokens
// ──────────────────────────────────────────────

/// A fully resolved token: literal value, no aliases, no mode metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub path: Vec<String>,
    /// Output name. Starts as the dotted path; name transforms rewrite it.
    pub name: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category of the layer that defined this token.
    pub category: Category,
}

impl Token {
    pub fn new<S: AsRef<str>>(path: &[S], token_type: TokenType, value: Value) -> Self {
        let path: Vec<String> = path.iter().map(|s| s.as_ref().to_string()).collect();
        Token {
            name: join_path(&path),
            path,
            token_type,
            value,
            description: None,
            category: Category::Primitive,
        }
    }

    /// Dotted path key of this token.
    pub fn key(&self) -> String {
        join_path(&self.path)
    }
}

/// Resolved (or transformed) tokens keyed by dotted path, in resolution
/// order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TokenTable {
    tokens: IndexMap<String, Token>,
}

impl TokenTable {
    pub fn new() -> Self {
        TokenTable::default()
    }

    /// Insert a token under its path key. An existing token with the same
    /// path is replaced in place.
    pub fn insert(&mut self, token: Token) {
        self.tokens.insert(token.key(), token);
    }

    pub fn get(&self, path: &str) -> Option<&Token> {
        self.tokens.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.values()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Apply `f` to every token, preserving order and keys.
    pub fn map(&self, mut f: impl FnMut(Token) -> Token) -> TokenTable {
        let tokens = self
            .tokens
            .iter()
            .map(|(key, token)| (key.clone(), f(token.clone())))
            .collect();
        TokenTable { tokens }
    }
}

impl FromIterator<Token> for TokenTable {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        let mut table = TokenTable::new();
        for token in iter {
            table.insert(token);
        }
        table
    }
}

/// Render a literal as plain text: strings unquoted, everything else as
/// compact JSON.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
