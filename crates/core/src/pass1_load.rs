//! Pass 1: expand source patterns, parse token files, tag each with its
//! layer category and token-set name.
//!
//! A malformed file is recorded in [`LoadOutcome::errors`] and does not stop
//! its siblings from loading. A pattern that matches nothing is fatal.

use crate::ast::{Category, TokenTree};
use crate::error::TokenError;
use crate::parser;
use crate::source::{FileSystemProvider, SourceProvider};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One parsed source file tagged with its place in the token architecture.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub category: Category,
    /// Token-set name, the file stem (e.g. `color-light`).
    pub set_name: String,
    pub source: PathBuf,
    pub tree: TokenTree,
}

/// Layers that loaded, plus per-file errors for the ones that did not.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub layers: Vec<Layer>,
    pub errors: Vec<TokenError>,
}

impl LoadOutcome {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Load every file matching `patterns` (relative to `base`) from disk.
pub fn load_sources<S: AsRef<str>>(patterns: &[S], base: &Path) -> Result<LoadOutcome, TokenError> {
    load_sources_with_provider(patterns, &FileSystemProvider::new(base))
}

/// Load every file matching `patterns` using the given [`SourceProvider`].
///
/// Files are visited pattern by pattern, lexically within a pattern; a file
/// matched by several patterns is loaded once. Files whose stem starts with
/// `$` (theme manifests, metadata) are skipped.
pub fn load_sources_with_provider<S: AsRef<str>>(
    patterns: &[S],
    provider: &dyn SourceProvider,
) -> Result<LoadOutcome, TokenError> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut outcome = LoadOutcome::default();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let paths = provider
            .expand(pattern)
            .map_err(|e| TokenError::parse(pattern, e.to_string()))?;
        if paths.is_empty() {
            return Err(TokenError::SourceNotFound {
                pattern: pattern.to_string(),
            });
        }

        for path in paths {
            if !seen.insert(path.clone()) {
                continue;
            }
            let Some(set_name) = set_name_of(&path) else {
                debug!(file = %path.display(), "skipping non-token file");
                continue;
            };
            match load_layer(&path, set_name, provider) {
                Ok(layer) => {
                    debug!(
                        file = %path.display(),
                        category = %layer.category,
                        set = %layer.set_name,
                        tokens = layer.tree.token_count(),
                        "loaded layer"
                    );
                    outcome.layers.push(layer);
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "failed to load token file");
                    outcome.errors.push(e);
                }
            }
        }
    }

    Ok(outcome)
}

fn load_layer(
    path: &Path,
    set_name: String,
    provider: &dyn SourceProvider,
) -> Result<Layer, TokenError> {
    let display = path.to_string_lossy();
    let src = provider
        .read_source(path)
        .map_err(|e| TokenError::parse(display.as_ref(), format!("cannot read file: {}", e)))?;
    let tree = parser::parse_document(&display, &src)?;
    Ok(Layer {
        category: category_of(provider.relative(path)),
        set_name,
        source: path.to_path_buf(),
        tree,
    })
}

fn set_name_of(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_string_lossy().to_string();
    if stem.starts_with('$') {
        None
    } else {
        Some(stem)
    }
}

/// Category of the nearest enclosing directory named after a category;
/// primitive when none is found. Expects a path relative to the source
/// root so directories above the project never count.
pub fn category_of(path: &Path) -> Category {
    path.parent()
        .into_iter()
        .flat_map(|dir| dir.components().rev())
        .find_map(|c| Category::from_name(&c.as_os_str().to_string_lossy()))
        .unwrap_or(Category::Primitive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemoryProvider;

    fn provider() -> InMemoryProvider {
        InMemoryProvider::new([
            (
                "tokens/primitives/color.json",
                r##"{ "color": { "white": { "$value": "#ffffff", "$type": "color" } } }"##,
            ),
            (
                "tokens/semantic/light.json",
                r#"{ "bg": { "$value": "{color.white}", "$type": "color" } }"#,
            ),
            ("tokens/semantic/broken.json", "{ not json"),
            ("tokens/$themes.json", "[]"),
        ])
    }

    #[test]
    fn tags_layers_by_directory_and_stem() {
        let outcome = load_sources_with_provider(&["tokens/**/*.json"], &provider()).unwrap();
        let tags: Vec<(Category, &str)> = outcome
            .layers
            .iter()
            .map(|l| (l.category, l.set_name.as_str()))
            .collect();
        assert_eq!(
            tags,
            vec![
                (Category::Primitive, "color"),
                (Category::Semantic, "light")
            ]
        );
    }

    #[test]
    fn malformed_file_is_collected_not_fatal() {
        let outcome = load_sources_with_provider(&["tokens/**/*.json"], &provider()).unwrap();
        assert_eq!(outcome.layers.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert!(matches!(
            &outcome.errors[0],
            TokenError::Parse { file, .. } if file.ends_with("broken.json")
        ));
        assert!(!outcome.is_clean());
    }

    #[test]
    fn pattern_without_matches_is_source_not_found() {
        let err = load_sources_with_provider(&["tokens/**/*.json", "missing/*.json"], &provider())
            .unwrap_err();
        assert_eq!(
            err,
            TokenError::SourceNotFound {
                pattern: "missing/*.json".to_string()
            }
        );
    }

    #[test]
    fn overlapping_patterns_load_once() {
        let outcome = load_sources_with_provider(
            &["tokens/primitives/*.json", "tokens/**/color.json"],
            &provider(),
        )
        .unwrap();
        assert_eq!(outcome.layers.len(), 1);
    }

    #[test]
    fn directories_above_the_base_do_not_set_category() {
        let root = tempfile::tempdir().unwrap();
        let base = root.path().join("packages/components/design-tokens");
        std::fs::create_dir_all(base.join("tokens/semantic")).unwrap();
        std::fs::write(
            base.join("tokens/base.json"),
            r#"{ "space": { "m": { "$value": 16, "$type": "spacing" } } }"#,
        )
        .unwrap();
        std::fs::write(
            base.join("tokens/semantic/gap.json"),
            r#"{ "gap": { "$value": "{space.m}", "$type": "spacing" } }"#,
        )
        .unwrap();

        let outcome = load_sources(&["tokens/**/*.json"], &base).unwrap();
        let tags: Vec<(Category, &str)> = outcome
            .layers
            .iter()
            .map(|l| (l.category, l.set_name.as_str()))
            .collect();
        assert_eq!(
            tags,
            vec![(Category::Primitive, "base"), (Category::Semantic, "gap")]
        );
    }

    #[test]
    fn category_defaults_to_primitive() {
        assert_eq!(category_of(Path::new("tokens/base.json")), Category::Primitive);
        assert_eq!(
            category_of(Path::new("tokens/components/button.json")),
            Category::Component
        );
    }
}
