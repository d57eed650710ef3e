//! Pass 2: theme composition -- pick the ordered layer list for one theme.
//!
//! All primitive layers come first, lexically by source path. Selected
//! semantic and component sets follow in category order, so a later layer
//! always has precedence over an earlier one during resolution.

use crate::ast::Category;
use crate::error::TokenError;
use crate::pass1_load::Layer;
use crate::theme::{ThemeDescriptor, TokenSetSelection};
use tracing::debug;

pub fn compose<'a>(
    theme: &ThemeDescriptor,
    layers: &'a [Layer],
) -> Result<Vec<&'a Layer>, TokenError> {
    let mut ordered: Vec<&Layer> = layers
        .iter()
        .filter(|l| l.category == Category::Primitive)
        .collect();
    ordered.sort_by(|a, b| a.source.cmp(&b.source));

    // BTreeMap iteration follows Category's ordering.
    for (category, selection) in &theme.selected_token_sets {
        let TokenSetSelection::Set(set) = selection else {
            continue;
        };
        let mut matching: Vec<&Layer> = layers
            .iter()
            .filter(|l| l.category == *category && l.set_name == *set)
            .collect();
        if matching.is_empty() {
            return Err(TokenError::UnknownTokenSet {
                theme: theme.id.clone(),
                category: category.to_string(),
                set: set.clone(),
            });
        }
        // Primitives are already included wholesale.
        if *category == Category::Primitive {
            continue;
        }
        matching.sort_by(|a, b| a.source.cmp(&b.source));
        ordered.extend(matching);
    }

    debug!(
        theme = %theme.id,
        layers = ?ordered.iter().map(|l| l.source.display().to_string()).collect::<Vec<_>>(),
        "composed theme"
    );
    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::TokenTree;
    use std::path::PathBuf;

    fn layer(category: Category, path: &str) -> Layer {
        let source = PathBuf::from(path);
        Layer {
            category,
            set_name: source.file_stem().unwrap().to_string_lossy().to_string(),
            source,
            tree: TokenTree::new(),
        }
    }

    fn sources(ordered: &[&Layer]) -> Vec<String> {
        ordered
            .iter()
            .map(|l| l.source.to_string_lossy().to_string())
            .collect()
    }

    fn layers() -> Vec<Layer> {
        vec![
            layer(Category::Component, "tokens/components/button.json"),
            layer(Category::Semantic, "tokens/semantic/dark.json"),
            layer(Category::Primitive, "tokens/primitives/space.json"),
            layer(Category::Semantic, "tokens/semantic/light.json"),
            layer(Category::Primitive, "tokens/primitives/color.json"),
        ]
    }

    #[test]
    fn primitives_first_then_selected_in_category_order() {
        let layers = layers();
        let theme = ThemeDescriptor::new("dark")
            .with_set(Category::Component, "button")
            .with_set(Category::Semantic, "dark");
        let ordered = compose(&theme, &layers).unwrap();
        assert_eq!(
            sources(&ordered),
            vec![
                "tokens/primitives/color.json",
                "tokens/primitives/space.json",
                "tokens/semantic/dark.json",
                "tokens/components/button.json",
            ]
        );
    }

    #[test]
    fn disabled_and_absent_categories_skipped() {
        let layers = layers();
        let theme = ThemeDescriptor::new("bare").with_set(Category::Semantic, "disabled");
        let ordered = compose(&theme, &layers).unwrap();
        assert_eq!(ordered.len(), 2);
        assert!(ordered.iter().all(|l| l.category == Category::Primitive));
    }

    #[test]
    fn unknown_set_fails() {
        let layers = layers();
        let theme = ThemeDescriptor::new("x").with_set(Category::Semantic, "sepia");
        assert_eq!(
            compose(&theme, &layers).unwrap_err(),
            TokenError::UnknownTokenSet {
                theme: "x".into(),
                category: "semantic".into(),
                set: "sepia".into(),
            }
        );
    }

    #[test]
    fn primitive_selection_is_validated_not_duplicated() {
        let layers = layers();
        let theme = ThemeDescriptor::new("x").with_set(Category::Primitive, "color");
        assert_eq!(compose(&theme, &layers).unwrap().len(), 2);

        let theme = ThemeDescriptor::new("x").with_set(Category::Primitive, "missing");
        assert!(compose(&theme, &layers).is_err());
    }
}
