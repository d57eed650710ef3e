//! Pass 4: the transform pipeline.
//!
//! Transforms live in a static registry of named descriptors, each a
//! matcher plus a pure token rewrite. A [`TransformPipeline`] is built from
//! names once and applied per platform, in exactly the listed order, to its
//! own copy of the resolved table.

use crate::ast::{Token, TokenTable, TokenType};
use crate::color::parse_hex_color;
use crate::error::TokenError;
use crate::naming;
use serde_json::Value;

/// Whether a transform rewrites a token's value or its output name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    Value,
    Name,
}

/// One registry entry.
#[derive(Debug)]
pub struct TransformDescriptor {
    pub name: &'static str,
    pub kind: TransformKind,
    pub matcher: fn(&Token) -> bool,
    pub transform: fn(Token) -> Token,
}

/// Every built-in transform.
pub static REGISTRY: &[TransformDescriptor] = &[
    TransformDescriptor {
        name: "value/unit-suffix",
        kind: TransformKind::Value,
        matcher: is_numeric_dimension,
        transform: unit_suffix,
    },
    TransformDescriptor {
        name: "value/android-unit",
        kind: TransformKind::Value,
        matcher: is_numeric_dimension,
        transform: android_unit,
    },
    TransformDescriptor {
        name: "value/round",
        kind: TransformKind::Value,
        matcher: is_numeric,
        transform: round,
    },
    TransformDescriptor {
        name: "color/hex",
        kind: TransformKind::Value,
        matcher: is_hex_color,
        transform: color_hex,
    },
    TransformDescriptor {
        name: "name/identifier-safe",
        kind: TransformKind::Name,
        matcher: always,
        transform: identifier_safe,
    },
    TransformDescriptor {
        name: "name/kebab",
        kind: TransformKind::Name,
        matcher: always,
        transform: kebab,
    },
    TransformDescriptor {
        name: "name/camel",
        kind: TransformKind::Name,
        matcher: always,
        transform: camel,
    },
    TransformDescriptor {
        name: "name/pascal",
        kind: TransformKind::Name,
        matcher: always,
        transform: pascal,
    },
    TransformDescriptor {
        name: "name/snake",
        kind: TransformKind::Name,
        matcher: always,
        transform: snake,
    },
];

/// Look up a transform by name.
pub fn lookup(name: &str) -> Result<&'static TransformDescriptor, TokenError> {
    REGISTRY
        .iter()
        .find(|d| d.name == name)
        .ok_or_else(|| TokenError::UnknownTransform {
            name: name.to_string(),
        })
}

/// An ordered list of transforms, resolved by name up front.
#[derive(Debug, Clone, Default)]
pub struct TransformPipeline {
    steps: Vec<&'static TransformDescriptor>,
}

impl TransformPipeline {
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, TokenError> {
        let steps = names
            .iter()
            .map(|n| lookup(n.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TransformPipeline { steps })
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|d| d.name).collect()
    }

    /// Run every step over every token. Non-matching tokens pass through
    /// each step unchanged.
    pub fn apply(&self, table: &TokenTable) -> TokenTable {
        table.map(|token| self.apply_token(token))
    }

    pub fn apply_token(&self, mut token: Token) -> Token {
        for step in &self.steps {
            if (step.matcher)(&token) {
                token = (step.transform)(token);
            }
        }
        token
    }
}

// ──────────────────────────────────────────────
// Matchers
// ──────────────────────────────────────────────

fn always(_: &Token) -> bool {
    true
}

/// Numeric value of a JSON number or a string holding only a number.
pub fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Format a number without a trailing `.0`.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn is_numeric(token: &Token) -> bool {
    numeric(&token.value).is_some()
}

fn is_numeric_dimension(token: &Token) -> bool {
    token.token_type.is_dimension_like() && is_numeric(token)
}

fn is_hex_color(token: &Token) -> bool {
    token.token_type == TokenType::Color
        && token
            .value
            .as_str()
            .is_some_and(|s| parse_hex_color(s).is_some())
}

// ──────────────────────────────────────────────
// Value transforms
// ──────────────────────────────────────────────

fn with_suffix(mut token: Token, suffix: &str) -> Token {
    if let Some(n) = numeric(&token.value) {
        token.value = Value::String(format!("{}{}", format_number(n), suffix));
    }
    token
}

fn unit_suffix(token: Token) -> Token {
    with_suffix(token, "px")
}

fn android_unit(token: Token) -> Token {
    let suffix = if token.token_type == TokenType::FontSize {
        "sp"
    } else {
        "dp"
    };
    with_suffix(token, suffix)
}

fn round(mut token: Token) -> Token {
    let Some(n) = numeric(&token.value) else {
        return token;
    };
    let rounded = (n * 100.0).round() / 100.0;
    if !rounded.is_finite() {
        return token;
    }
    token.value = match &token.value {
        Value::String(_) => Value::String(format_number(rounded)),
        _ if rounded.fract() == 0.0 && rounded.abs() < 1e15 => Value::from(rounded as i64),
        _ => Value::from(rounded),
    };
    token
}

fn color_hex(mut token: Token) -> Token {
    if let Some(rgba) = token.value.as_str().and_then(parse_hex_color) {
        token.value = Value::String(rgba.to_hex());
    }
    token
}

// ──────────────────────────────────────────────
// Name transforms
// ──────────────────────────────────────────────

fn identifier_safe(mut token: Token) -> Token {
    token.name = naming::identifier_safe(&token.name);
    token
}

fn kebab(mut token: Token) -> Token {
    token.name = naming::kebab_case(&token.path);
    token
}

fn camel(mut token: Token) -> Token {
    token.name = naming::camel_case(&token.path);
    token
}

fn pascal(mut token: Token) -> Token {
    token.name = naming::pascal_case(&token.path);
    token
}

fn snake(mut token: Token) -> Token {
    token.name = naming::snake_case(&token.path);
    token
}
