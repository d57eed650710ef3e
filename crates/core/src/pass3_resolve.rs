//! Pass 3: merge ordered layers into one table, apply mode overrides and
//! resolve aliases.
//!
//! 1. Flatten every layer into dotted paths; later layers replace earlier
//!    tokens with the same path (whole token, type included).
//! 2. Substitute mode overrides selected by the theme.
//! 3. Resolve aliases transitively against the merged table, with a visit
//!    stack for cycle detection.
//!
//! Iteration is always over insertion-ordered or sorted collections, so the
//! same input produces the same table.

use crate::ast::{
    value_to_text, Category, RawToken, Token, TokenNode, TokenTable, TokenTree, TokenType,
};
use crate::error::TokenError;
use crate::pass1_load::Layer;
use crate::path::{as_reference, find_references, join_path, normalize_path};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Flatten a tree into `(path segments, token)` pairs in document order.
pub fn flatten(tree: &TokenTree) -> Vec<(Vec<String>, &RawToken)> {
    let mut out = Vec::new();
    let mut trail = Vec::new();
    flatten_into(tree, &mut trail, &mut out);
    out
}

fn flatten_into<'a>(
    tree: &'a TokenTree,
    trail: &mut Vec<String>,
    out: &mut Vec<(Vec<String>, &'a RawToken)>,
) {
    for (segment, node) in &tree.entries {
        trail.push(segment.clone());
        match node {
            TokenNode::Group(group) => flatten_into(group, trail, out),
            TokenNode::Token(token) => out.push((trail.clone(), token)),
        }
        trail.pop();
    }
}

/// A merged token awaiting alias resolution.
struct Pending {
    path: Vec<String>,
    declared: Option<TokenType>,
    value: Value,
    description: Option<String>,
    category: Category,
    /// Some primitive layer defines this path, even if a later layer
    /// replaced it.
    in_primitives: bool,
}

/// Resolve the ordered layers for one theme into a [`TokenTable`].
pub fn resolve(
    layers: &[&Layer],
    mode_selection: &BTreeMap<String, String>,
) -> Result<TokenTable, TokenError> {
    let mut merged: IndexMap<String, Pending> = IndexMap::new();
    for layer in layers {
        for (path, raw) in flatten(&layer.tree) {
            let key = join_path(&path);
            let value = select_mode(raw, mode_selection);
            let in_primitives = layer.category == Category::Primitive
                || merged.get(&key).is_some_and(|p| p.in_primitives);
            merged.insert(
                key,
                Pending {
                    path,
                    declared: raw.token_type.clone(),
                    value,
                    description: raw.description.clone(),
                    category: layer.category,
                    in_primitives,
                },
            );
        }
        debug!(layer = %layer.source.display(), merged = merged.len(), "merged layer");
    }

    let mut resolver = Resolver {
        merged: &merged,
        done: HashMap::new(),
        stack: Vec::new(),
    };
    let mut table = TokenTable::new();
    for (key, pending) in &merged {
        let (value, token_type) = resolver.resolve_key(key)?;
        table.insert(Token {
            path: pending.path.clone(),
            name: key.clone(),
            token_type,
            value,
            description: pending.description.clone(),
            category: pending.category,
        });
    }
    Ok(table)
}

/// Base value, or the override for the selected mode. Axes apply in
/// lexical order; the last matching axis wins.
fn select_mode(raw: &RawToken, mode_selection: &BTreeMap<String, String>) -> Value {
    let mut value = &raw.value;
    for (axis, overrides) in &raw.mode_overrides {
        if let Some(over) = mode_selection.get(axis).and_then(|mode| overrides.get(mode)) {
            value = over;
        }
    }
    value.clone()
}

struct Resolver<'a> {
    merged: &'a IndexMap<String, Pending>,
    done: HashMap<String, (Value, TokenType)>,
    stack: Vec<String>,
}

impl Resolver<'_> {
    fn resolve_key(&mut self, key: &str) -> Result<(Value, TokenType), TokenError> {
        if let Some(hit) = self.done.get(key) {
            return Ok(hit.clone());
        }
        if let Some(pos) = self.stack.iter().position(|k| k == key) {
            let mut cycle = self.stack[pos..].to_vec();
            cycle.push(key.to_string());
            return Err(TokenError::CyclicReference { cycle });
        }
        let merged = self.merged;
        let Some(pending) = merged.get(key) else {
            // Callers check existence first.
            return Err(TokenError::UnresolvedReference {
                token: self.stack.last().cloned().unwrap_or_default(),
                reference: key.to_string(),
            });
        };

        self.stack.push(key.to_string());
        let (value, alias_type) = self.resolve_value(key, pending.category, &pending.value)?;
        self.stack.pop();

        let token_type = pending
            .declared
            .clone()
            .or(alias_type)
            .unwrap_or_else(|| TokenType::infer(&value));
        self.done
            .insert(key.to_string(), (value.clone(), token_type.clone()));
        Ok((value, token_type))
    }

    /// Resolve every reference inside `value`. Returns the literal and, when
    /// `value` was a single whole-value alias, the target's type.
    fn resolve_value(
        &mut self,
        owner: &str,
        owner_category: Category,
        value: &Value,
    ) -> Result<(Value, Option<TokenType>), TokenError> {
        match value {
            Value::String(s) => {
                if let Some(reference) = as_reference(s) {
                    let (literal, ty) = self.follow(owner, owner_category, reference)?;
                    return Ok((literal, Some(ty)));
                }
                let refs = find_references(s);
                if refs.is_empty() {
                    return Ok((value.clone(), None));
                }
                let mut out = String::with_capacity(s.len());
                let mut last = 0;
                for (range, reference) in refs {
                    let (literal, _) = self.follow(owner, owner_category, reference)?;
                    out.push_str(&s[last..range.start]);
                    out.push_str(&value_to_text(&literal));
                    last = range.end;
                }
                out.push_str(&s[last..]);
                Ok((Value::String(out), None))
            }
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.resolve_value(owner, owner_category, item)?.0);
                }
                Ok((Value::Array(out), None))
            }
            Value::Object(fields) => {
                let mut out = serde_json::Map::new();
                for (k, v) in fields {
                    out.insert(k.clone(), self.resolve_value(owner, owner_category, v)?.0);
                }
                Ok((Value::Object(out), None))
            }
            literal => Ok((literal.clone(), None)),
        }
    }

    fn follow(
        &mut self,
        owner: &str,
        owner_category: Category,
        reference: &str,
    ) -> Result<(Value, TokenType), TokenError> {
        let target = normalize_path(reference)?;
        let merged = self.merged;
        let Some(pending) = merged.get(&target) else {
            return Err(TokenError::UnresolvedReference {
                token: owner.to_string(),
                reference: target,
            });
        };
        if owner_category == Category::Primitive && !pending.in_primitives {
            return Err(TokenError::LayeringViolation {
                token: owner.to_string(),
                reference: target,
                category: pending.category.to_string(),
            });
        }
        self.resolve_key(&target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;
    use serde_json::json;
    use std::path::PathBuf;

    fn layer(category: Category, name: &str, src: &str) -> Layer {
        Layer {
            category,
            set_name: name.to_string(),
            source: PathBuf::from(format!("{}/{}.json", category, name)),
            tree: parse_document(name, src).unwrap(),
        }
    }

    fn no_modes() -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    #[test]
    fn flatten_produces_escaped_dotted_keys() {
        let tree = parse_document("t", r#"{ "space": { "1.5": { "$value": 6 } } }"#).unwrap();
        let flat = flatten(&tree);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].0, vec!["space", "1.5"]);
        assert_eq!(join_path(&flat[0].0), "space.1\\.5");
    }

    #[test]
    fn alias_chain_resolves_to_literal() {
        let base = layer(
            Category::Primitive,
            "base",
            r##"{ "c": { "$value": "#112233", "$type": "color" }, "b": { "$value": "{c}" }, "a": { "$value": "{b}" } }"##,
        );
        let table = resolve(&[&base], &no_modes()).unwrap();
        let a = table.get("a").unwrap();
        assert_eq!(a.value, json!("#112233"));
        assert_eq!(a.token_type, TokenType::Color);
    }

    #[test]
    fn forward_references_resolve() {
        let base = layer(
            Category::Primitive,
            "base",
            r#"{ "alias": { "$value": "{real}" }, "real": { "$value": 4, "$type": "spacing" } }"#,
        );
        let table = resolve(&[&base], &no_modes()).unwrap();
        assert_eq!(table.get("alias").unwrap().value, json!(4));
        let keys: Vec<String> = table.iter().map(Token::key).collect();
        assert_eq!(keys, vec!["alias", "real"]);
    }

    #[test]
    fn cycle_is_reported_with_its_path() {
        let base = layer(
            Category::Primitive,
            "base",
            r#"{ "a": { "$value": "{b}" }, "b": { "$value": "{a}" } }"#,
        );
        let err = resolve(&[&base], &no_modes()).unwrap_err();
        assert_eq!(
            err,
            TokenError::CyclicReference {
                cycle: vec!["a".into(), "b".into(), "a".into()]
            }
        );
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let base = layer(Category::Primitive, "base", r#"{ "a": { "$value": "{a}" } }"#);
        assert!(matches!(
            resolve(&[&base], &no_modes()),
            Err(TokenError::CyclicReference { .. })
        ));
    }

    #[test]
    fn missing_target_is_unresolved() {
        let base = layer(Category::Primitive, "base", r#"{ "a": { "$value": "{nope.x}" } }"#);
        assert_eq!(
            resolve(&[&base], &no_modes()).unwrap_err(),
            TokenError::UnresolvedReference {
                token: "a".into(),
                reference: "nope.x".into()
            }
        );
    }

    #[test]
    fn later_layer_wins_whole_token() {
        let prim = layer(
            Category::Primitive,
            "base",
            r##"{ "color": { "bg": { "$value": "#ffffff", "$type": "color", "$description": "old" } } }"##,
        );
        let sem = layer(
            Category::Semantic,
            "light",
            r#"{ "color": { "bg": { "$value": "plain", "$type": "string" } } }"#,
        );
        let table = resolve(&[&prim, &sem], &no_modes()).unwrap();
        let bg = table.get("color.bg").unwrap();
        assert_eq!(bg.value, json!("plain"));
        assert_eq!(bg.token_type, TokenType::String);
        assert_eq!(bg.description, None);
        assert_eq!(bg.category, Category::Semantic);
    }

    #[test]
    fn mode_override_applies_only_when_selected() {
        let sem = layer(
            Category::Semantic,
            "theme",
            r##"{ "bg": { "$value": "#ffffff", "$type": "color", "$extensions": { "modes": { "scheme": { "dark": "#000000" } } } } }"##,
        );
        let mut modes = BTreeMap::new();
        modes.insert("scheme".to_string(), "dark".to_string());
        let dark = resolve(&[&sem], &modes).unwrap();
        assert_eq!(dark.get("bg").unwrap().value, json!("#000000"));

        modes.insert("scheme".to_string(), "sepia".to_string());
        let other = resolve(&[&sem], &modes).unwrap();
        assert_eq!(other.get("bg").unwrap().value, json!("#ffffff"));

        let absent = resolve(&[&sem], &no_modes()).unwrap();
        assert_eq!(absent.get("bg").unwrap().value, json!("#ffffff"));
    }

    #[test]
    fn mode_override_may_be_an_alias() {
        let prim = layer(
            Category::Primitive,
            "base",
            r##"{ "black": { "$value": "#000000", "$type": "color" } }"##,
        );
        let sem = layer(
            Category::Semantic,
            "theme",
            r##"{ "bg": { "$value": "#ffffff", "$type": "color", "$extensions": { "mode": { "dark": "{black}" } } } }"##,
        );
        let mut modes = BTreeMap::new();
        modes.insert("mode".to_string(), "dark".to_string());
        let table = resolve(&[&prim, &sem], &modes).unwrap();
        assert_eq!(table.get("bg").unwrap().value, json!("#000000"));
    }

    #[test]
    fn embedded_references_are_interpolated() {
        let base = layer(
            Category::Primitive,
            "base",
            r##"{ "w": { "$value": 1 }, "c": { "$value": "#333333" }, "border": { "$value": "{w}px solid {c}" } }"##,
        );
        let table = resolve(&[&base], &no_modes()).unwrap();
        assert_eq!(table.get("border").unwrap().value, json!("1px solid #333333"));
        assert_eq!(table.get("border").unwrap().token_type, TokenType::String);
    }

    #[test]
    fn composite_values_resolve_recursively() {
        let base = layer(
            Category::Primitive,
            "base",
            r##"{ "c": { "$value": "#000000" }, "shadow": { "$type": "shadow", "$value": { "color": "{c}", "blur": 4 } } }"##,
        );
        let table = resolve(&[&base], &no_modes()).unwrap();
        assert_eq!(
            table.get("shadow").unwrap().value,
            json!({ "color": "#000000", "blur": 4 })
        );
    }

    #[test]
    fn primitive_may_not_alias_semantic() {
        let prim = layer(Category::Primitive, "base", r#"{ "p": { "$value": "{s}" } }"#);
        let sem = layer(Category::Semantic, "light", r#"{ "s": { "$value": 1 } }"#);
        assert!(matches!(
            resolve(&[&prim, &sem], &no_modes()),
            Err(TokenError::LayeringViolation { .. })
        ));
    }

    #[test]
    fn primitive_alias_follows_semantic_override_of_primitive_path() {
        let prim = layer(
            Category::Primitive,
            "base",
            r##"{ "x": { "$value": "#111111" }, "y": { "$value": "{x}" } }"##,
        );
        let sem = layer(Category::Semantic, "light", r##"{ "x": { "$value": "#222222" } }"##);
        let table = resolve(&[&prim, &sem], &no_modes()).unwrap();
        assert_eq!(table.get("y").unwrap().value, json!("#222222"));
    }

    #[test]
    fn resolution_is_deterministic() {
        let prim = layer(
            Category::Primitive,
            "base",
            r##"{ "z": { "$value": "#010101" }, "a": { "$value": "{z}" }, "m": { "$value": "{a} {z}" } }"##,
        );
        let first = serde_json::to_string(&resolve(&[&prim], &no_modes()).unwrap()).unwrap();
        let second = serde_json::to_string(&resolve(&[&prim], &no_modes()).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
