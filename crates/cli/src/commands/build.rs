use std::path::Path;
use std::process;

use tessera_build::{build, BuildOptions, BuildReport, FileSystemWriter, Outcome};
use tessera_emit::PlatformSpec;

use super::{load_workspace, select_themes};
use crate::{report_error, OutputFormat};

pub(crate) fn cmd_build(
    config: &Path,
    theme_ids: &[String],
    platform_names: &[String],
    output: OutputFormat,
    quiet: bool,
) {
    let workspace = match load_workspace(config) {
        Ok(w) => w,
        Err(e) => {
            report_error(&e, output, quiet);
            process::exit(1);
        }
    };
    let themes = match select_themes(&workspace.themes, theme_ids) {
        Ok(t) => t,
        Err(e) => {
            report_error(&e, output, quiet);
            process::exit(1);
        }
    };
    let platforms = match select_platforms(&workspace.project.platforms, platform_names) {
        Ok(p) => p,
        Err(e) => {
            report_error(&e, output, quiet);
            process::exit(1);
        }
    };

    let options = BuildOptions {
        build_path: workspace.project.config.output.build_path.clone(),
    };
    let mut writer = FileSystemWriter::new(&workspace.project.root);
    let report = build(&themes, &platforms, &workspace.sources, &options, &mut writer);

    if !quiet {
        match output {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&report)
                    .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
                println!("{}", json);
            }
            OutputFormat::Text => print_report(&report),
        }
    }

    if !report.is_success() {
        process::exit(1);
    }
}

fn select_platforms(all: &[PlatformSpec], names: &[String]) -> Result<Vec<PlatformSpec>, String> {
    if names.is_empty() {
        return Ok(all.to_vec());
    }
    names
        .iter()
        .map(|name| {
            all.iter().find(|p| &p.name == name).cloned().ok_or_else(|| {
                let known: Vec<&str> = all.iter().map(|p| p.name.as_str()).collect();
                format!("unknown platform '{}' (known: {})", name, known.join(", "))
            })
        })
        .collect()
}

fn print_report(report: &BuildReport) {
    for error in &report.source_errors {
        println!("source error: {}", error);
    }
    for entry in &report.entries {
        match &entry.outcome {
            Outcome::Success { files } => {
                println!("ok    {}/{}", entry.theme, entry.platform);
                for file in files {
                    println!("        {}  {}", file.path, &file.etag[..12]);
                }
            }
            Outcome::Failure {
                stage, message, ..
            } => {
                println!("FAIL  {}/{} [{}] {}", entry.theme, entry.platform, stage, message);
            }
        }
    }
    println!();
    println!(
        "{} of {} builds succeeded",
        report.successes().count(),
        report.entries.len()
    );
}
