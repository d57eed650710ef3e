//! Project configuration (`tessera.toml`).
//!
//! ```toml
//! [sources]
//! include = ["tokens/**/*.json"]
//! themes = "tokens/$themes.json"
//!
//! [output]
//! build_path = "build/{theme}"
//!
//! [[platforms]]
//! name = "css"
//! transforms = ["value/unit-suffix", "name/kebab"]
//! filter = "all"
//!
//! [[platforms.files]]
//! destination = "vars.css"
//! format = "css/variables"
//! ```
//!
//! Every section is optional. Without `[[platforms]]` the six built-in
//! platforms are used. Relative paths are resolved against the directory
//! holding the config file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tessera_build::DEFAULT_BUILD_PATH;
use tessera_core::TransformPipeline;
use tessera_emit::{default_platforms, FileSpec, Format, PlatformSpec, TokenFilter};

// ── Types ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub platforms: Vec<PlatformConfig>,
}

/// `[sources]`: where token files and the theme manifest live.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourcesConfig {
    #[serde(default = "default_include")]
    pub include: Vec<String>,
    #[serde(default = "default_themes")]
    pub themes: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        SourcesConfig {
            include: default_include(),
            themes: default_themes(),
        }
    }
}

fn default_include() -> Vec<String> {
    vec!["tokens/**/*.json".to_string()]
}

fn default_themes() -> String {
    "tokens/$themes.json".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_build_path")]
    pub build_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            build_path: default_build_path(),
        }
    }
}

fn default_build_path() -> String {
    DEFAULT_BUILD_PATH.to_string()
}

/// One `[[platforms]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformConfig {
    pub name: String,
    #[serde(default)]
    pub transforms: Vec<String>,
    #[serde(default)]
    pub filter: Option<String>,
    pub files: Vec<FileConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub destination: String,
    pub format: String,
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse '{}': {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("platform '{platform}': {message}")]
    Platform { platform: String, message: String },
}

/// A loaded configuration with its platform registry validated.
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory the config file lives in.
    pub root: PathBuf,
    pub config: ProjectConfig,
    pub platforms: Vec<PlatformSpec>,
}

impl Project {
    pub fn themes_path(&self) -> PathBuf {
        self.root.join(&self.config.sources.themes)
    }
}

// ── Functions ─────────────────────────────────────────────────────────────────

pub fn parse_project_config(path: &Path, content: &str) -> Result<ProjectConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Read `path`, parse it and resolve every platform against the transform,
/// filter and format registries.
pub fn load_project(path: &Path) -> Result<Project, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_project_config(path, &content)?;
    let platforms = platform_specs(&config)?;
    let root = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok(Project {
        root,
        config,
        platforms,
    })
}

/// The configured platforms, or the built-in registry when none are given.
pub fn platform_specs(config: &ProjectConfig) -> Result<Vec<PlatformSpec>, ConfigError> {
    if config.platforms.is_empty() {
        return Ok(default_platforms());
    }

    let mut seen = HashSet::new();
    config
        .platforms
        .iter()
        .map(|platform| -> Result<PlatformSpec, ConfigError> {
            let invalid = |message: String| ConfigError::Platform {
                platform: platform.name.clone(),
                message,
            };
            if !seen.insert(platform.name.as_str()) {
                return Err(invalid("defined more than once".to_string()));
            }
            if platform.files.is_empty() {
                return Err(invalid("no [[platforms.files]] entries".to_string()));
            }
            let transforms = TransformPipeline::from_names(&platform.transforms)
                .map_err(|e| invalid(e.to_string()))?;
            let filter = parse_filter(platform.filter.as_deref()).map_err(invalid)?;
            let files = platform
                .files
                .iter()
                .map(|file| -> Result<FileSpec, String> {
                    let format = Format::parse(&file.format).map_err(|e| e.to_string())?;
                    Ok(FileSpec {
                        destination: file.destination.clone(),
                        format,
                        filter: file
                            .filter
                            .as_deref()
                            .map(TokenFilter::parse)
                            .transpose()
                            .map_err(|e| e.to_string())?,
                        class_name: file.class_name.clone(),
                    })
                })
                .collect::<Result<Vec<_>, String>>()
                .map_err(invalid)?;
            Ok(PlatformSpec {
                name: platform.name.clone(),
                transforms,
                filter,
                files,
            })
        })
        .collect()
}

fn parse_filter(name: Option<&str>) -> Result<TokenFilter, String> {
    match name {
        None => Ok(TokenFilter::All),
        Some(name) => TokenFilter::parse(name).map_err(|e| e.to_string()),
    }
}
