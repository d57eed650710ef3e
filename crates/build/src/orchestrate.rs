//! The build loop: every theme against every platform.
//!
//! Each theme is composed and resolved once; every platform then works on
//! its own transformed copy of that table. A failure is recorded against
//! the (theme, platform) pair it belongs to and the loop moves on, so one
//! broken theme never stops the others.

use crate::error::BuildError;
use crate::report::{BuildReport, Outcome, PairReport, Stage, WrittenFile};
use crate::writer::OutputWriter;
use std::path::{Path, PathBuf};
use tessera_core::{compose, resolve, LoadOutcome, ThemeDescriptor, TokenTable};
use tessera_emit::{emit, expand_theme_placeholders, PlatformSpec};
use tracing::{debug, info, warn};

/// Default output directory template, relative to the writer's root.
pub const DEFAULT_BUILD_PATH: &str = "build/{theme}";

#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory per theme; accepts `{theme}` and `{Theme}`.
    pub build_path: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            build_path: DEFAULT_BUILD_PATH.to_string(),
        }
    }
}

pub fn build(
    themes: &[ThemeDescriptor],
    platforms: &[PlatformSpec],
    sources: &LoadOutcome,
    options: &BuildOptions,
    writer: &mut dyn OutputWriter,
) -> BuildReport {
    let mut report = BuildReport {
        source_errors: sources.errors.clone(),
        entries: Vec::with_capacity(themes.len() * platforms.len()),
    };

    for theme in themes {
        let table = match resolve_for(theme, sources) {
            Ok(table) => table,
            Err((stage, error)) => {
                for platform in platforms {
                    report.entries.push(failure(theme, platform, stage, &error));
                }
                continue;
            }
        };
        debug!(theme = %theme.id, tokens = table.len(), "resolved theme");

        let out_dir = PathBuf::from(expand_theme_placeholders(&options.build_path, &theme.id));
        for platform in platforms {
            let entry = match build_platform(&table, platform, &theme.id, &out_dir, writer) {
                Ok(files) => {
                    info!(
                        theme = %theme.id,
                        platform = %platform.name,
                        files = files.len(),
                        "built"
                    );
                    PairReport {
                        theme: theme.id.clone(),
                        platform: platform.name.clone(),
                        outcome: Outcome::Success { files },
                    }
                }
                Err((stage, error)) => failure(theme, platform, stage, &error),
            };
            report.entries.push(entry);
        }
    }

    report
}

fn resolve_for(
    theme: &ThemeDescriptor,
    sources: &LoadOutcome,
) -> Result<TokenTable, (Stage, BuildError)> {
    let layers = compose(theme, &sources.layers).map_err(|e| (Stage::Compose, BuildError::from(e)))?;
    resolve(&layers, &theme.mode_selection).map_err(|e| (Stage::Resolve, BuildError::from(e)))
}

fn build_platform(
    table: &TokenTable,
    platform: &PlatformSpec,
    theme_id: &str,
    out_dir: &Path,
    writer: &mut dyn OutputWriter,
) -> Result<Vec<WrittenFile>, (Stage, BuildError)> {
    let outputs = emit(table, platform, theme_id).map_err(|e| (Stage::Emit, BuildError::from(e)))?;

    let mut written = Vec::with_capacity(outputs.len());
    for output in outputs {
        let path = out_dir.join(&output.destination);
        writer.write(&path, &output.content).map_err(|source| {
            (
                Stage::Write,
                BuildError::Write {
                    path: path.clone(),
                    source,
                },
            )
        })?;
        written.push(WrittenFile::new(
            path.to_string_lossy().replace('\\', "/"),
            &output.content,
        ));
    }
    Ok(written)
}

fn failure(
    theme: &ThemeDescriptor,
    platform: &PlatformSpec,
    stage: Stage,
    error: &BuildError,
) -> PairReport {
    warn!(
        theme = %theme.id,
        platform = %platform.name,
        stage = %stage,
        error = %error,
        "build failed"
    );
    PairReport {
        theme: theme.id.clone(),
        platform: platform.name.clone(),
        outcome: Outcome::Failure {
            stage,
            kind: error.kind().to_string(),
            message: error.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::InMemoryWriter;
    use std::io;
    use tessera_core::load_sources_with_provider;
    use tessera_core::source::InMemoryProvider;
    use tessera_emit::default_platforms;

    fn sources() -> LoadOutcome {
        let provider = InMemoryProvider::new([(
            "tokens/primitives/base.json",
            r##"{ "color": { "bg": { "$value": "#ffffff", "$type": "color" } },
                 "space": { "m": { "$value": 16, "$type": "spacing" } } }"##,
        )]);
        load_sources_with_provider(&["tokens/**/*.json"], &provider).unwrap()
    }

    struct FailingWriter;

    impl OutputWriter for FailingWriter {
        fn write(&mut self, _: &Path, _: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    #[test]
    fn writes_every_platform_under_theme_directory() {
        let mut writer = InMemoryWriter::new();
        let report = build(
            &[ThemeDescriptor::new("light")],
            &default_platforms(),
            &sources(),
            &BuildOptions::default(),
            &mut writer,
        );
        assert!(report.is_success());
        assert_eq!(report.entries.len(), 6);
        assert!(writer.get("build/light/vars.css").unwrap().contains("--space-m: 16px;"));
        assert!(writer.get("build/light/LightTokens.swift").is_some());
        assert!(writer.get("build/light/values-light/dimens.xml").is_some());
    }

    #[test]
    fn compose_failure_is_recorded_for_each_platform() {
        let theme = ThemeDescriptor::new("sepia").with_set(tessera_core::Category::Semantic, "sepia");
        let report = build(
            &[theme],
            &default_platforms(),
            &sources(),
            &BuildOptions::default(),
            &mut InMemoryWriter::new(),
        );
        assert_eq!(report.failures().count(), 6);
        assert!(report.failures().all(|e| matches!(
            &e.outcome,
            Outcome::Failure { stage: Stage::Compose, kind, .. } if kind == "unknown_token_set"
        )));
    }

    #[test]
    fn write_failure_is_attributed_to_write_stage() {
        let report = build(
            &[ThemeDescriptor::new("light")],
            &default_platforms()[..1],
            &sources(),
            &BuildOptions::default(),
            &mut FailingWriter,
        );
        let entry = report.entry("light", "css").unwrap();
        match &entry.outcome {
            Outcome::Failure { stage, kind, message } => {
                assert_eq!(*stage, Stage::Write);
                assert_eq!(kind, "emission");
                assert!(message.contains("build/light/vars.css"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn custom_build_path_uses_placeholders() {
        let mut writer = InMemoryWriter::new();
        let options = BuildOptions {
            build_path: "dist/{Theme}".into(),
        };
        build(
            &[ThemeDescriptor::new("dark-blue")],
            &default_platforms()[..1],
            &sources(),
            &options,
            &mut writer,
        );
        assert!(writer.get("dist/DarkBlue/vars.css").is_some());
    }
}
