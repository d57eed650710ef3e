//! `ios-swift/class`: one `public static let` per token inside a class.

use crate::format::{RenderContext, DO_NOT_EDIT};
use serde_json::Value;
use tessera_core::ast::value_to_text;
use tessera_core::color::parse_hex_color;
use tessera_core::naming::pascal_case;
use tessera_core::pass4_transform::{format_number, numeric};
use tessera_core::{Token, TokenType};

pub fn class(tokens: &[&Token], ctx: &RenderContext<'_>) -> String {
    let class_name = match ctx.class_name {
        Some(name) => name.to_string(),
        None => format!("{}Tokens", pascal_case(&[ctx.theme_id])),
    };
    let file_name = ctx.destination.rsplit('/').next().unwrap_or(ctx.destination);

    let mut out = format!(
        "//\n// {}\n//\n\n// {}\n\nimport UIKit\n\npublic class {} {{\n",
        file_name, DO_NOT_EDIT, class_name
    );
    for token in tokens {
        if let Some(description) = &token.description {
            out.push_str(&format!("    /// {}\n", description));
        }
        out.push_str(&format!(
            "    public static let {} = {}\n",
            identifier(&token.name),
            literal(token)
        ));
    }
    out.push_str("}\n");
    out
}

/// Swift keywords that cannot name a property without backticks.
const RESERVED: &[&str] = &[
    "Any", "Protocol", "Self", "Type", "as", "associatedtype", "break", "case", "catch", "class",
    "continue", "default", "defer", "deinit", "do", "else", "enum", "extension", "fallthrough",
    "false", "fileprivate", "for", "func", "guard", "if", "import", "in", "init", "inout",
    "internal", "is", "let", "nil", "open", "operator", "private", "precedencegroup",
    "protocol", "public", "repeat", "rethrows", "return", "self", "static", "struct", "subscript",
    "super", "switch", "throw", "throws", "true", "try", "typealias", "var", "where", "while",
];

fn identifier(name: &str) -> String {
    if RESERVED.contains(&name) {
        format!("`{}`", name)
    } else {
        name.to_string()
    }
}

fn literal(token: &Token) -> String {
    if let Value::Bool(b) = token.value {
        return b.to_string();
    }
    if token.token_type == TokenType::Color {
        if let Some(c) = token.value.as_str().and_then(parse_hex_color) {
            return format!(
                "UIColor(red: {:.3}, green: {:.3}, blue: {:.3}, alpha: {:.3})",
                c.r, c.g, c.b, c.a
            );
        }
    }
    if let Some(n) = numeric(&token.value) {
        return match token.token_type {
            TokenType::String | TokenType::FontFamily => string_literal(&value_to_text(&token.value)),
            ref ty if ty.is_dimension_like() => format!("CGFloat({})", format_number(n)),
            _ => format_number(n),
        };
    }
    string_literal(&value_to_text(&token.value))
}

fn string_literal(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n");
    format!("\"{}\"", escaped)
}
