//! Subcommand implementations.

pub(crate) mod build;
pub(crate) mod pull;
pub(crate) mod resolve;
pub(crate) mod themes;
pub(crate) mod upload;

use std::path::Path;

use tessera_core::{load_sources, load_theme_manifest, LoadOutcome, ThemeDescriptor};

use crate::config::{load_project, Project};

/// Everything a build-style command needs: configuration, themes and the
/// loaded token layers.
pub(crate) struct Workspace {
    pub project: Project,
    pub themes: Vec<ThemeDescriptor>,
    pub sources: LoadOutcome,
}

pub(crate) fn load_workspace(config_path: &Path) -> Result<Workspace, String> {
    let project = load_project(config_path).map_err(|e| e.to_string())?;
    let themes = load_theme_manifest(&project.themes_path()).map_err(|e| e.to_string())?;
    let sources =
        load_sources(&project.config.sources.include, &project.root).map_err(|e| e.to_string())?;
    Ok(Workspace {
        project,
        themes,
        sources,
    })
}

/// Keep only the themes named in `ids`; all of them when `ids` is empty.
pub(crate) fn select_themes(
    themes: &[ThemeDescriptor],
    ids: &[String],
) -> Result<Vec<ThemeDescriptor>, String> {
    if ids.is_empty() {
        return Ok(themes.to_vec());
    }
    ids.iter()
        .map(|id| find_theme(themes, id).cloned())
        .collect()
}

pub(crate) fn find_theme<'a>(
    themes: &'a [ThemeDescriptor],
    id: &str,
) -> Result<&'a ThemeDescriptor, String> {
    themes.iter().find(|t| t.id == id).ok_or_else(|| {
        let known: Vec<&str> = themes.iter().map(|t| t.id.as_str()).collect();
        format!("unknown theme '{}' (known: {})", id, known.join(", "))
    })
}
