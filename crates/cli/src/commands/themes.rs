use std::path::Path;
use std::process;

use serde_json::json;
use tessera_core::compose;

use super::load_workspace;
use crate::{report_error, OutputFormat};

/// List every theme with its selections and composed layer order.
pub(crate) fn cmd_themes(config: &Path, output: OutputFormat, quiet: bool) {
    let workspace = match load_workspace(config) {
        Ok(w) => w,
        Err(e) => {
            report_error(&e, output, quiet);
            process::exit(1);
        }
    };

    let mut failed = false;
    let mut listing = Vec::new();
    for theme in &workspace.themes {
        let layers = compose(theme, &workspace.sources.layers).map(|layers| {
            layers
                .iter()
                .map(|l| l.source.to_string_lossy().replace('\\', "/"))
                .collect::<Vec<_>>()
        });
        failed |= layers.is_err();
        listing.push((theme, layers));
    }

    if !quiet {
        match output {
            OutputFormat::Json => {
                let entries: Vec<_> = listing
                    .iter()
                    .map(|(theme, layers)| {
                        let mut entry = serde_json::to_value(theme).unwrap_or_else(|_| json!({}));
                        match layers {
                            Ok(layers) => entry["layers"] = json!(layers),
                            Err(e) => entry["error"] = json!(e.to_string()),
                        }
                        entry
                    })
                    .collect();
                let json = serde_json::to_string_pretty(&entries)
                    .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
                println!("{}", json);
            }
            OutputFormat::Text => {
                for (theme, layers) in &listing {
                    match &theme.name {
                        Some(name) => println!("{} ({})", theme.id, name),
                        None => println!("{}", theme.id),
                    }
                    for (axis, mode) in &theme.mode_selection {
                        println!("  mode {} = {}", axis, mode);
                    }
                    match layers {
                        Ok(layers) => {
                            for layer in layers {
                                println!("  - {}", layer);
                            }
                        }
                        Err(e) => println!("  error: {}", e),
                    }
                }
            }
        }
    }

    if failed {
        process::exit(1);
    }
}
