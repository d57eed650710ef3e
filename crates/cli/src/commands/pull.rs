use std::path::Path;
use std::process;

use tracing::info;

use crate::figma::FigmaClient;
use crate::{report_error, OutputFormat};

/// Fetch the raw Figma document and save it pretty-printed.
pub(crate) fn cmd_pull(
    file_key: &str,
    out: &Path,
    token: Option<&str>,
    output: OutputFormat,
    quiet: bool,
) {
    let Some(token) = token else {
        report_error("FIGMA_TOKEN is not set", output, quiet);
        process::exit(1);
    };

    let document = match FigmaClient::new(token).fetch_file(file_key) {
        Ok(d) => d,
        Err(e) => {
            report_error(&e, output, quiet);
            process::exit(1);
        }
    };

    let pretty = match serde_json::to_string_pretty(&document) {
        Ok(s) => s,
        Err(e) => {
            report_error(&format!("serialization error: {}", e), output, quiet);
            process::exit(1);
        }
    };
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(parent) {
            report_error(&format!("could not create '{}': {}", parent.display(), e), output, quiet);
            process::exit(1);
        }
    }
    if let Err(e) = std::fs::write(out, pretty + "\n") {
        report_error(&format!("could not write '{}': {}", out.display(), e), output, quiet);
        process::exit(1);
    }
    info!(file = %out.display(), "fetched figma document");

    if !quiet && output == OutputFormat::Json {
        println!("{}", serde_json::json!({ "file_key": file_key, "written": out.display().to_string() }));
    }
}
