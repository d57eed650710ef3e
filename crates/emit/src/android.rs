//! Android resource emitters (`values/*.xml`).

use crate::format::DO_NOT_EDIT;
use tessera_core::ast::value_to_text;
use tessera_core::color::parse_hex_color;
use tessera_core::Token;

/// `android/colors`: `<color>` entries, hex colours as `#AARRGGBB`.
pub fn colors(tokens: &[&Token]) -> String {
    resources(tokens, "color", |token| {
        let text = value_to_text(&token.value);
        parse_hex_color(&text)
            .map(|c| c.to_argb_hex())
            .unwrap_or(text)
    })
}

/// `android/dimens`: `<dimen>` entries.
pub fn dimens(tokens: &[&Token]) -> String {
    resources(tokens, "dimen", |token| value_to_text(&token.value))
}

fn resources(tokens: &[&Token], element: &str, value: impl Fn(&Token) -> String) -> String {
    let mut out = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\n<!--\n  {}\n-->\n<resources>\n",
        DO_NOT_EDIT
    );
    for token in tokens {
        out.push_str(&format!(
            "  <{el} name=\"{name}\">{value}</{el}>",
            el = element,
            name = escape(&token.name),
            value = escape(&value(token)),
        ));
        if let Some(description) = &token.description {
            out.push_str(&format!("<!-- {} -->", description.replace("--", "- -")));
        }
        out.push('\n');
    }
    out.push_str("</resources>\n");
    out
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
