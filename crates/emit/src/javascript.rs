//! `javascript/es6`: a flat exported object literal.

use crate::format::DO_NOT_EDIT;
use tessera_core::naming::is_identifier;
use tessera_core::Token;

pub fn es6(tokens: &[&Token]) -> String {
    let mut out = format!("/**\n * {}\n */\n\nexport const tokens = {{\n", DO_NOT_EDIT);
    for token in tokens {
        if let Some(description) = &token.description {
            out.push_str(&format!("  /** {} */\n", description.replace("*/", "* /")));
        }
        out.push_str(&format!("  {}: {},\n", key(&token.name), token.value));
    }
    out.push_str("};\n\nexport default tokens;\n");
    out
}

fn key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        serde_json::Value::String(name.to_string()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tessera_core::TokenType;

    #[test]
    fn exports_flat_mapping() {
        let mut bg = Token::new(&["color", "bg"], TokenType::Color, json!("#fff"));
        bg.name = "colorBg".into();
        let mut weight = Token::new(&["font", "weight"], TokenType::FontWeight, json!(700));
        weight.name = "fontWeight".into();
        let js = es6(&[&bg, &weight]);
        assert!(js.contains("export const tokens = {\n  colorBg: \"#fff\",\n  fontWeight: 700,\n};"));
        assert!(js.ends_with("export default tokens;\n"));
    }

    #[test]
    fn non_identifier_names_are_quoted() {
        let t = Token::new(&["1", "size"], TokenType::Dimension, json!("16px"));
        assert!(es6(&[&t]).contains("  \"1.size\": \"16px\",\n"));
    }

    #[test]
    fn empty_module_still_exports() {
        assert!(es6(&[]).contains("export const tokens = {\n};"));
    }
}
