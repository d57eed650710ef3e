//! Stylesheet emitters: CSS custom properties and a nested SCSS map.

use crate::format::{nest, Nested, RenderContext, DO_NOT_EDIT};
use crate::EmitError;
use indexmap::IndexMap;
use serde_json::Value;
use tessera_core::ast::value_to_text;
use tessera_core::Token;

/// `css/variables`: one custom property per token inside `:root`.
pub fn variables(tokens: &[&Token]) -> String {
    let mut out = format!("/**\n * {}\n */\n\n:root {{\n", DO_NOT_EDIT);
    for token in tokens {
        out.push_str(&format!("  --{}: {};", token.name, css_value(&token.value)));
        if let Some(description) = &token.description {
            out.push_str(&format!(" /* {} */", description.replace("*/", "* /")));
        }
        out.push('\n');
    }
    out.push_str("}\n");
    out
}

fn css_value(value: &Value) -> String {
    match value {
        // Composite values become space-separated lists (e.g. shadows).
        Value::Object(fields) => fields.values().map(value_to_text).collect::<Vec<_>>().join(" "),
        Value::Array(items) => items.iter().map(value_to_text).collect::<Vec<_>>().join(", "),
        other => value_to_text(other),
    }
}

/// `scss/map-deep`: a `$tokens` map nested by path segment.
pub fn scss_map_deep(tokens: &[&Token], ctx: &RenderContext<'_>) -> Result<String, EmitError> {
    let tree = nest(tokens, ctx.destination)?;
    let mut out = format!("// {}\n\n$tokens: ", DO_NOT_EDIT);
    if tree.is_empty() {
        out.push_str("();\n");
        return Ok(out);
    }
    write_map(&tree, 1, &mut out);
    out.push_str(";\n");
    Ok(out)
}

fn write_map(map: &IndexMap<String, Nested<'_>>, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    out.push_str("(\n");
    for (key, node) in map {
        out.push_str(&format!("{}'{}': ", indent, key.replace('\'', "\\'")));
        match node {
            Nested::Leaf(token) => out.push_str(&scss_value(&token.value)),
            Nested::Group(children) => write_map(children, depth + 1, out),
        }
        out.push_str(",\n");
    }
    out.push_str(&"  ".repeat(depth - 1));
    out.push(')');
}

fn scss_value(value: &Value) -> String {
    let text = css_value(value);
    // Commas would split the value into a list inside the map.
    if text.contains(',') {
        format!("\"{}\"", text.replace('"', "\\\""))
    } else {
        text
    }
}
