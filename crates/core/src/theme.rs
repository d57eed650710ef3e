//! Theme descriptors and the theme manifest format.
//!
//! ```json
//! [
//!   {
//!     "id": "dark",
//!     "selectedTokenSets": { "semantic": "color-dark", "component": "disabled" },
//!     "modeSelection": { "scheme": "dark" }
//!   }
//! ]
//! ```

use crate::ast::Category;
use crate::error::TokenError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Literal that disables a category in `selectedTokenSets`.
pub const DISABLED: &str = "disabled";

/// What a theme selects for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TokenSetSelection {
    Disabled,
    Set(String),
}

impl From<String> for TokenSetSelection {
    fn from(s: String) -> Self {
        if s == DISABLED {
            TokenSetSelection::Disabled
        } else {
            TokenSetSelection::Set(s)
        }
    }
}

impl From<TokenSetSelection> for String {
    fn from(sel: TokenSetSelection) -> Self {
        match sel {
            TokenSetSelection::Disabled => DISABLED.to_string(),
            TokenSetSelection::Set(s) => s,
        }
    }
}

/// A concrete theme: which token set each category uses, and which mode
/// each mode axis selects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeDescriptor {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub selected_token_sets: BTreeMap<Category, TokenSetSelection>,
    pub mode_selection: BTreeMap<String, String>,
}

impl ThemeDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        ThemeDescriptor {
            id: id.into(),
            name: None,
            selected_token_sets: BTreeMap::new(),
            mode_selection: BTreeMap::new(),
        }
    }

    pub fn with_set(mut self, category: Category, set: &str) -> Self {
        self.selected_token_sets
            .insert(category, TokenSetSelection::from(set.to_string()));
        self
    }

    pub fn with_mode(mut self, axis: &str, mode: &str) -> Self {
        self.mode_selection.insert(axis.to_string(), mode.to_string());
        self
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestEntry {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    selected_token_sets: BTreeMap<String, String>,
    #[serde(default)]
    mode_selection: BTreeMap<String, String>,
}

/// Parse a theme manifest (a JSON array of theme descriptors).
pub fn parse_theme_manifest(file: &str, src: &str) -> Result<Vec<ThemeDescriptor>, TokenError> {
    let entries: Vec<ManifestEntry> = serde_json::from_str(src)
        .map_err(|e| TokenError::parse(file, format!("invalid theme manifest: {}", e)))?;

    let mut themes = Vec::with_capacity(entries.len());
    for entry in entries {
        if themes.iter().any(|t: &ThemeDescriptor| t.id == entry.id) {
            return Err(TokenError::parse(
                file,
                format!("duplicate theme id '{}'", entry.id),
            ));
        }
        let mut selected_token_sets = BTreeMap::new();
        for (category, selection) in entry.selected_token_sets {
            let category = Category::from_name(&category).ok_or_else(|| {
                TokenError::parse(
                    file,
                    format!(
                        "theme '{}': unknown category '{}' (expected primitive, semantic or component)",
                        entry.id, category
                    ),
                )
            })?;
            selected_token_sets.insert(category, TokenSetSelection::from(selection));
        }
        themes.push(ThemeDescriptor {
            id: entry.id,
            name: entry.name,
            selected_token_sets,
            mode_selection: entry.mode_selection,
        });
    }
    Ok(themes)
}

/// Read and parse a theme manifest from disk.
pub fn load_theme_manifest(path: &Path) -> Result<Vec<ThemeDescriptor>, TokenError> {
    let display = path.to_string_lossy();
    let src = std::fs::read_to_string(path)
        .map_err(|e| TokenError::parse(display.as_ref(), format!("cannot read file: {}", e)))?;
    parse_theme_manifest(&display, &src)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_selection_and_modes() {
        let src = r#"[
            { "id": "light", "selectedTokenSets": { "semantic": "color-light", "components": "disabled" } },
            { "id": "dark", "name": "Dark", "selectedTokenSets": { "semantic": "color-dark" }, "modeSelection": { "scheme": "dark" } }
        ]"#;
        let themes = parse_theme_manifest("$themes.json", src).unwrap();
        assert_eq!(themes.len(), 2);
        assert_eq!(
            themes[0].selected_token_sets[&Category::Semantic],
            TokenSetSelection::Set("color-light".into())
        );
        assert_eq!(
            themes[0].selected_token_sets[&Category::Component],
            TokenSetSelection::Disabled
        );
        assert_eq!(themes[1].mode_selection["scheme"], "dark");
        assert_eq!(themes[1].name.as_deref(), Some("Dark"));
    }

    #[test]
    fn unknown_category_rejected() {
        let src = r#"[{ "id": "x", "selectedTokenSets": { "brand": "acme" } }]"#;
        let err = parse_theme_manifest("$themes.json", src).unwrap_err();
        assert!(err.to_string().contains("unknown category 'brand'"));
    }

    #[test]
    fn duplicate_theme_ids_rejected() {
        let src = r#"[{ "id": "x" }, { "id": "x" }]"#;
        assert!(parse_theme_manifest("$themes.json", src).is_err());
    }

    #[test]
    fn descriptor_serializes_camel_case() {
        let theme = ThemeDescriptor::new("light")
            .with_set(Category::Semantic, "color-light")
            .with_mode("scheme", "light");
        let json = serde_json::to_value(&theme).unwrap();
        assert_eq!(json["selectedTokenSets"]["semantic"], "color-light");
        assert_eq!(json["modeSelection"]["scheme"], "light");
    }
}
