use std::path::Path;
use std::process;

use tessera_core::resolve_theme;

use super::{find_theme, load_workspace};
use crate::{report_error, OutputFormat};

/// Print one theme's resolved table as JSON.
pub(crate) fn cmd_resolve(config: &Path, theme_id: &str, output: OutputFormat, quiet: bool) {
    let workspace = match load_workspace(config) {
        Ok(w) => w,
        Err(e) => {
            report_error(&e, output, quiet);
            process::exit(1);
        }
    };
    let theme = match find_theme(&workspace.themes, theme_id) {
        Ok(t) => t,
        Err(e) => {
            report_error(&e, output, quiet);
            process::exit(1);
        }
    };
    let table = match resolve_theme(theme, &workspace.sources.layers) {
        Ok(t) => t,
        Err(e) => {
            match output {
                OutputFormat::Json => {
                    let err_json = serde_json::to_string_pretty(&e)
                        .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", e));
                    eprintln!("{}", err_json);
                }
                OutputFormat::Text => {
                    if !quiet {
                        eprintln!("resolution error: {}", e);
                    }
                }
            }
            process::exit(1);
        }
    };

    let json = serde_json::to_string_pretty(&table)
        .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
    println!("{}", json);
}
