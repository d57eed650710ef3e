//! Structured-data emitters.

use crate::format::{nest, Nested, RenderContext};
use crate::EmitError;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tessera_core::Token;

/// `json/nested`: the original group nesting rebuilt from token paths.
pub fn nested(tokens: &[&Token], ctx: &RenderContext<'_>) -> Result<String, EmitError> {
    let tree = nest(tokens, ctx.destination)?;
    finish(Value::Object(to_object(&tree)), ctx)
}

fn to_object(map: &IndexMap<String, Nested<'_>>) -> Map<String, Value> {
    map.iter()
        .map(|(key, node)| {
            let value = match node {
                Nested::Leaf(token) => token.value.clone(),
                Nested::Group(children) => Value::Object(to_object(children)),
            };
            (key.clone(), value)
        })
        .collect()
}

/// `json/flat`: output name -> value.
pub fn flat(tokens: &[&Token], ctx: &RenderContext<'_>) -> Result<String, EmitError> {
    let map: Map<String, Value> = tokens
        .iter()
        .map(|t| (t.name.clone(), t.value.clone()))
        .collect();
    finish(Value::Object(map), ctx)
}

fn finish(value: Value, ctx: &RenderContext<'_>) -> Result<String, EmitError> {
    let mut text = serde_json::to_string_pretty(&value).map_err(|e| EmitError::Emission {
        destination: ctx.destination.to_string(),
        message: format!("serialization error: {}", e),
    })?;
    text.push('\n');
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tessera_core::TokenType;

    fn ctx() -> RenderContext<'static> {
        RenderContext {
            theme_id: "light",
            destination: "tokens.json",
            class_name: None,
        }
    }

    #[test]
    fn nested_rebuilds_groups_in_order() {
        let fg = Token::new(&["color", "fg"], TokenType::Color, json!("#000"));
        let bg = Token::new(&["color", "bg"], TokenType::Color, json!("#fff"));
        let m = Token::new(&["space", "m"], TokenType::Spacing, json!("16px"));
        let out = nested(&[&fg, &bg, &m], &ctx()).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            value,
            json!({ "color": { "fg": "#000", "bg": "#fff" }, "space": { "m": "16px" } })
        );
        assert!(out.find("\"fg\"").unwrap() < out.find("\"bg\"").unwrap());
    }

    #[test]
    fn flat_uses_output_names() {
        let mut bg = Token::new(&["color", "bg"], TokenType::Color, json!("#fff"));
        bg.name = "colorBg".into();
        let out = flat(&[&bg], &ctx()).unwrap();
        assert_eq!(serde_json::from_str::<Value>(&out).unwrap(), json!({ "colorBg": "#fff" }));
    }

    #[test]
    fn empty_documents() {
        assert_eq!(nested(&[], &ctx()).unwrap(), "{}\n");
        assert_eq!(flat(&[], &ctx()).unwrap(), "{}\n");
    }
}
