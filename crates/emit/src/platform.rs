//! Platform configuration and per-platform emission.

use crate::filter::TokenFilter;
use crate::format::{Format, RenderContext};
use crate::EmitError;
use std::collections::HashMap;
use tessera_core::naming::pascal_case;
use tessera_core::{Token, TokenTable, TransformPipeline};

/// One output file of a platform.
#[derive(Debug, Clone)]
pub struct FileSpec {
    /// Path relative to the theme's build directory; may contain `{theme}`
    /// or `{Theme}`.
    pub destination: String,
    pub format: Format,
    /// Narrows the platform filter. `None` means the format's default.
    pub filter: Option<TokenFilter>,
    /// Swift class name override.
    pub class_name: Option<String>,
}

impl FileSpec {
    pub fn new(destination: &str, format: Format) -> Self {
        FileSpec {
            destination: destination.to_string(),
            format,
            filter: None,
            class_name: None,
        }
    }

    pub fn with_filter(mut self, filter: TokenFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn effective_filter(&self) -> TokenFilter {
        self.filter
            .clone()
            .unwrap_or_else(|| self.format.default_filter())
    }
}

#[derive(Debug, Clone)]
pub struct PlatformSpec {
    pub name: String,
    pub transforms: TransformPipeline,
    pub filter: TokenFilter,
    pub files: Vec<FileSpec>,
}

/// A rendered document, destination relative to the theme's build path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub destination: String,
    pub content: String,
}

/// Substitute `{theme}` (the theme id) and `{Theme}` (its PascalCase form).
pub fn expand_theme_placeholders(template: &str, theme_id: &str) -> String {
    template
        .replace("{theme}", theme_id)
        .replace("{Theme}", &pascal_case(&[theme_id]))
}

/// Transform, filter and render `table` for one platform.
///
/// The table is not modified; the platform works on its own transformed
/// copy. A file whose filter admits no tokens is still produced. Two tokens
/// whose transformed names coincide in one file fail the platform.
pub fn emit(
    table: &TokenTable,
    platform: &PlatformSpec,
    theme_id: &str,
) -> Result<Vec<OutputFile>, EmitError> {
    let transformed = platform.transforms.apply(table);
    let admitted: Vec<&Token> = transformed
        .iter()
        .filter(|t| platform.filter.matches(t))
        .collect();

    platform
        .files
        .iter()
        .map(|file| {
            let destination = expand_theme_placeholders(&file.destination, theme_id);
            let filter = file.effective_filter();
            let tokens: Vec<&Token> = admitted
                .iter()
                .copied()
                .filter(|t| filter.matches(t))
                .collect();
            check_unique_names(&tokens, &destination)?;
            let ctx = RenderContext {
                theme_id,
                destination: &destination,
                class_name: file.class_name.as_deref(),
            };
            let content = file.format.render(&tokens, &ctx)?;
            Ok(OutputFile {
                destination,
                content,
            })
        })
        .collect()
}

fn check_unique_names(tokens: &[&Token], destination: &str) -> Result<(), EmitError> {
    let mut seen: HashMap<&str, &Token> = HashMap::with_capacity(tokens.len());
    for &token in tokens {
        if let Some(first) = seen.insert(token.name.as_str(), token) {
            return Err(EmitError::Emission {
                destination: destination.to_string(),
                message: format!(
                    "tokens '{}' and '{}' both emit as '{}'",
                    first.key(),
                    token.key(),
                    token.name
                ),
            });
        }
    }
    Ok(())
}

/// The six built-in platforms used when a project configures none.
pub fn default_platforms() -> Vec<PlatformSpec> {
    let platform = |name: &str, transforms: &[&str], files: Vec<FileSpec>| PlatformSpec {
        name: name.to_string(),
        // Registry names below are all built in.
        transforms: TransformPipeline::from_names(transforms).unwrap_or_default(),
        filter: TokenFilter::All,
        files,
    };
    vec![
        platform(
            "css",
            &["value/unit-suffix", "name/kebab"],
            vec![FileSpec::new("vars.css", Format::CssVariables)],
        ),
        platform(
            "scss",
            &["value/unit-suffix", "name/kebab"],
            vec![FileSpec::new("tokens.scss", Format::ScssMapDeep)],
        ),
        platform(
            "js",
            &["value/unit-suffix", "name/camel", "name/identifier-safe"],
            vec![FileSpec::new("tokens.js", Format::JavascriptEs6)],
        ),
        platform(
            "json",
            &[],
            vec![FileSpec::new("tokens.json", Format::JsonNested)],
        ),
        platform(
            "ios",
            &["name/camel", "name/identifier-safe"],
            vec![FileSpec::new("{Theme}Tokens.swift", Format::SwiftClass)],
        ),
        platform(
            "android",
            &["value/android-unit", "name/snake", "name/identifier-safe"],
            vec![
                FileSpec::new("values-{theme}/colors.xml", Format::AndroidColors),
                FileSpec::new("values-{theme}/dimens.xml", Format::AndroidDimens),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tessera_core::TokenType;

    fn table() -> TokenTable {
        vec![
            Token::new(&["color", "bg"], TokenType::Color, json!("#ffffff")),
            Token::new(&["space", "m"], TokenType::Spacing, json!(16)),
            Token::new(&["font", "weight"], TokenType::FontWeight, json!(700)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn placeholders_expand() {
        assert_eq!(
            expand_theme_placeholders("values-{theme}/{Theme}.xml", "dark-blue"),
            "values-dark-blue/DarkBlue.xml"
        );
    }

    #[test]
    fn default_platforms_cover_six_targets() {
        let names: Vec<String> = default_platforms().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["css", "scss", "js", "json", "ios", "android"]);
        for p in default_platforms() {
            assert!(!p.files.is_empty());
        }
        assert_eq!(
            default_platforms()[2].transforms.names(),
            vec!["value/unit-suffix", "name/camel", "name/identifier-safe"]
        );
    }

    #[test]
    fn css_platform_renders_suffixed_kebab_vars() {
        let css = default_platforms().remove(0);
        let out = emit(&table(), &css, "light").unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].destination, "vars.css");
        assert!(out[0].content.contains("  --color-bg: #ffffff;\n"));
        assert!(out[0].content.contains("  --space-m: 16px;\n"));
    }

    #[test]
    fn android_files_use_format_default_filters() {
        let android = default_platforms().pop().unwrap();
        let out = emit(&table(), &android, "dark").unwrap();
        assert_eq!(out[0].destination, "values-dark/colors.xml");
        assert!(out[0].content.contains("color_bg"));
        assert!(!out[0].content.contains("space_m"));
        assert_eq!(out[1].destination, "values-dark/dimens.xml");
        assert!(out[1].content.contains("<dimen name=\"space_m\">16dp</dimen>"));
        assert!(!out[1].content.contains("font_weight"));
    }

    #[test]
    fn colliding_output_names_fail_the_file() {
        let table: TokenTable = vec![
            Token::new(&["color", "bg-default"], TokenType::Color, json!("#ffffff")),
            Token::new(&["color", "bgDefault"], TokenType::Color, json!("#000000")),
        ]
        .into_iter()
        .collect();
        let ios = default_platforms().remove(4);
        let err = emit(&table, &ios, "light").unwrap_err();
        assert_eq!(
            err,
            EmitError::Emission {
                destination: "LightTokens.swift".into(),
                message: "tokens 'color.bg-default' and 'color.bgDefault' both emit as 'colorBgDefault'"
                    .into(),
            }
        );

        // Untransformed names are the dotted paths, which never clash.
        let json = default_platforms().remove(3);
        assert!(emit(&table, &json, "light").is_ok());
    }

    #[test]
    fn same_name_in_different_files_is_allowed() {
        let table: TokenTable = vec![
            Token::new(&["brand"], TokenType::Color, json!("#3366ff")),
            Token::new(&["Brand"], TokenType::Spacing, json!(4)),
        ]
        .into_iter()
        .collect();
        let android = default_platforms().remove(5);
        let out = emit(&table, &android, "light").unwrap();
        assert!(out[0].content.contains("name=\"brand\""));
        assert!(out[1].content.contains("name=\"brand\""));
    }

    #[test]
    fn input_table_is_untouched() {
        let table = table();
        let css = default_platforms().remove(0);
        emit(&table, &css, "light").unwrap();
        assert_eq!(table.get("space.m").unwrap().value, json!(16));
        assert_eq!(table.get("space.m").unwrap().name, "space.m");
    }
}
