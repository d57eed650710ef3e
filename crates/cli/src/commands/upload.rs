use std::path::Path;
use std::process;

use tessera_core::resolve_theme;
use tracing::info;

use super::{find_theme, load_workspace};
use crate::figma::{plan_upload, FigmaClient, LocalVariables};
use crate::{report_error, OutputFormat};

/// Push one theme's resolved table into Figma variables.
pub(crate) fn cmd_upload(
    config: &Path,
    theme_id: &str,
    file_key: &str,
    token: Option<&str>,
    dry_run: bool,
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
    let table = match find_theme(&workspace.themes, theme_id)
        .and_then(|theme| resolve_theme(theme, &workspace.sources.layers).map_err(|e| e.to_string()))
    {
        Ok(t) => t,
        Err(e) => {
            report_error(&e, output, quiet);
            process::exit(1);
        }
    };

    if dry_run {
        let plan = plan_upload(&table, &LocalVariables::default());
        let json = serde_json::to_string_pretty(&plan)
            .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
        println!("{}", json);
        return;
    }

    let Some(token) = token else {
        report_error("FIGMA_TOKEN is not set", output, quiet);
        process::exit(1);
    };
    let client = FigmaClient::new(token);
    let remote = match client.local_variables(file_key) {
        Ok(r) => r,
        Err(e) => {
            report_error(&e, output, quiet);
            process::exit(1);
        }
    };
    let plan = plan_upload(&table, &remote);
    if plan.is_empty() {
        if !quiet {
            println!("No tokens to upload.");
        }
        return;
    }
    if let Err(e) = client.post_variables(file_key, &plan) {
        report_error(&e, output, quiet);
        process::exit(1);
    }
    info!(
        theme = theme_id,
        collections = plan.variable_collections.len(),
        created = plan.variables.len(),
        values = plan.variable_mode_values.len(),
        "uploaded variables"
    );

    if !quiet {
        match output {
            OutputFormat::Json => println!(
                "{}",
                serde_json::json!({
                    "theme": theme_id,
                    "collections_created": plan.variable_collections.len(),
                    "variables_created": plan.variables.len(),
                    "values_set": plan.variable_mode_values.len(),
                })
            ),
            OutputFormat::Text => println!(
                "Uploaded {} values ({} new variables, {} new collections)",
                plan.variable_mode_values.len(),
                plan.variables.len(),
                plan.variable_collections.len()
            ),
        }
    }
}
