mod commands;
mod config;
mod figma;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Design-token build toolchain.
#[derive(Parser)]
#[command(name = "tessera", version, about = "Design-token build toolchain")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log pipeline detail to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Path to the project configuration
    #[arg(long, global = true, default_value = "tessera.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every theme for every platform
    Build {
        /// Only build this theme (repeatable)
        #[arg(long = "theme")]
        themes: Vec<String>,
        /// Only build this platform (repeatable)
        #[arg(long = "platform")]
        platforms: Vec<String>,
    },

    /// Print a theme's resolved token table as JSON
    Resolve {
        /// Theme id from the theme manifest
        #[arg(long)]
        theme: String,
    },

    /// List themes and their composed layer order
    Themes,

    /// Download the raw document of a Figma file
    Pull {
        /// Figma file key
        #[arg(long, env = "FIGMA_FILE_KEY")]
        file_key: String,
        /// Where to write the document
        #[arg(long, default_value = "tokens/figma-raw.json")]
        out: PathBuf,
        /// Figma personal access token
        #[arg(long, env = "FIGMA_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },

    /// Push a theme's resolved tokens into Figma variables
    Upload {
        /// Theme id from the theme manifest
        #[arg(long)]
        theme: String,
        /// Figma file key
        #[arg(long, env = "FIGMA_FILE_KEY")]
        file_key: String,
        /// Figma personal access token
        #[arg(long, env = "FIGMA_TOKEN", hide_env_values = true)]
        token: Option<String>,
        /// Print the request body instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Build { themes, platforms } => {
            commands::build::cmd_build(&cli.config, &themes, &platforms, cli.output, cli.quiet);
        }
        Commands::Resolve { theme } => {
            commands::resolve::cmd_resolve(&cli.config, &theme, cli.output, cli.quiet);
        }
        Commands::Themes => {
            commands::themes::cmd_themes(&cli.config, cli.output, cli.quiet);
        }
        Commands::Pull {
            file_key,
            out,
            token,
        } => {
            commands::pull::cmd_pull(&file_key, &out, token.as_deref(), cli.output, cli.quiet);
        }
        Commands::Upload {
            theme,
            file_key,
            token,
            dry_run,
        } => {
            commands::upload::cmd_upload(
                &cli.config,
                &theme,
                &file_key,
                token.as_deref(),
                dry_run,
                cli.output,
                cli.quiet,
            );
        }
    }
}

/// Print an error to stderr unless `--quiet`.
pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("error: {}", msg),
        OutputFormat::Json => eprintln!("{}", serde_json::json!({ "error": msg })),
    }
}
