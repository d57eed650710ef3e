//! Token document parser: JSON text -> [`TokenTree`].
//!
//! Leaves follow the typed-value convention (`$value` / `$type`, or the
//! legacy `value` / `type`). Groups may declare a `$type` that descendants
//! inherit. Mode overrides are read from `$extensions.modes`
//! (`{axis: {mode: value}}`) or `$extensions.mode` (`{mode: value}`, placed on
//! the [`DEFAULT_MODE_AXIS`]).

use crate::ast::{ModeOverrides, RawToken, TokenNode, TokenTree, TokenType};
use crate::error::TokenError;
use serde_json::{Map, Value};

/// Axis assigned to single-axis `$extensions.mode` overrides.
pub const DEFAULT_MODE_AXIS: &str = "mode";

/// Parse a token document.
pub fn parse_document(file: &str, src: &str) -> Result<TokenTree, TokenError> {
    let value: Value = serde_json::from_str(src)
        .map_err(|e| TokenError::parse(file, format!("invalid JSON: {}", e)))?;
    tree_from_value(file, &value)
}

/// Build a tree from an already-parsed JSON document.
pub fn tree_from_value(file: &str, value: &Value) -> Result<TokenTree, TokenError> {
    let obj = value
        .as_object()
        .ok_or_else(|| TokenError::parse(file, "token document must be a JSON object"))?;
    parse_group(file, obj, None, &mut Vec::new())
}

fn parse_group(
    file: &str,
    obj: &Map<String, Value>,
    inherited: Option<&TokenType>,
    trail: &mut Vec<String>,
) -> Result<TokenTree, TokenError> {
    let group_type = type_field(obj).map(TokenType::parse);
    let group_type = group_type.as_ref().or(inherited);

    let mut tree = TokenTree::new();
    for (key, child) in obj {
        if key.starts_with('$') || is_legacy_group_property(key, child) {
            continue;
        }
        trail.push(key.clone());
        if key.contains('{') || key.contains('}') {
            return Err(TokenError::parse(
                file,
                format!("'{}': path segments cannot contain braces", trail.join("/")),
            ));
        }
        let node = match child {
            Value::Object(child_obj) if is_token(child_obj) => {
                TokenNode::Token(parse_token(file, child_obj, group_type, trail)?)
            }
            Value::Object(child_obj) => {
                TokenNode::Group(parse_group(file, child_obj, group_type, trail)?)
            }
            _ => {
                return Err(TokenError::parse(
                    file,
                    format!(
                        "'{}': expected a token (with $value) or a group",
                        trail.join("/")
                    ),
                ))
            }
        };
        trail.pop();
        tree.push(key.clone(), node);
    }
    Ok(tree)
}

fn is_token(obj: &Map<String, Value>) -> bool {
    if obj.contains_key("$value") {
        return true;
    }
    // Legacy form: `value` alongside `type`, or a non-object `value`.
    match obj.get("value") {
        Some(Value::Object(_)) => obj.contains_key("type"),
        Some(_) => true,
        None => false,
    }
}

/// Legacy unprefixed `type` / `description` on a group. A group or token
/// that happens to be named `type` is an object and stays a child.
fn is_legacy_group_property(key: &str, child: &Value) -> bool {
    matches!(key, "type" | "description") && child.is_string()
}

fn type_field(obj: &Map<String, Value>) -> Option<&str> {
    obj.get("$type")
        .or_else(|| obj.get("type"))
        .and_then(Value::as_str)
}

fn parse_token(
    file: &str,
    obj: &Map<String, Value>,
    inherited: Option<&TokenType>,
    trail: &[String],
) -> Result<RawToken, TokenError> {
    let value = obj
        .get("$value")
        .or_else(|| obj.get("value"))
        .cloned()
        .unwrap_or(Value::Null);
    if value.is_null() {
        return Err(TokenError::parse(
            file,
            format!("'{}': token value is null", trail.join("/")),
        ));
    }

    let token_type = type_field(obj)
        .map(TokenType::parse)
        .or_else(|| inherited.cloned());
    let description = obj
        .get("$description")
        .or_else(|| obj.get("description"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let mut mode_overrides = ModeOverrides::new();
    if let Some(ext) = obj.get("$extensions").and_then(Value::as_object) {
        if let Some(axes) = ext.get("modes") {
            let axes = axes.as_object().ok_or_else(|| {
                TokenError::parse(
                    file,
                    format!("'{}': $extensions.modes must be an object", trail.join("/")),
                )
            })?;
            for (axis, modes) in axes {
                let modes = mode_map(file, trail, modes)?;
                mode_overrides.insert(axis.clone(), modes);
            }
        }
        if let Some(modes) = ext.get("mode") {
            let modes = mode_map(file, trail, modes)?;
            mode_overrides
                .entry(DEFAULT_MODE_AXIS.to_string())
                .or_default()
                .extend(modes);
        }
    }

    Ok(RawToken {
        token_type,
        value,
        description,
        mode_overrides,
    })
}

fn mode_map(
    file: &str,
    trail: &[String],
    modes: &Value,
) -> Result<std::collections::BTreeMap<String, Value>, TokenError> {
    let modes = modes.as_object().ok_or_else(|| {
        TokenError::parse(
            file,
            format!(
                "'{}': mode overrides must map mode names to values",
                trail.join("/")
            ),
        )
    })?;
    Ok(modes
        .iter()
        .map(|(mode, value)| (mode.clone(), value.clone()))
        .collect())
}
