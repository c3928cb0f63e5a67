//! molsearch CLI - molecule similarity search front-end
//!
//! This is the entry point for the `molsearch` command-line tool, which provides:
//! - `models`: list the search options the backend offers
//! - `search`: one-shot search printing the best match
//! - `tui`: interactive search page in the terminal
//! - `completions`: shell completion scripts

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use molsearch_core::config::{config_dir, load_dotenv};
use molsearch_core::ClientConfig;
use tracing::debug;

mod commands;
mod sketch;
mod tracing_setup;
mod tui;
mod ui;

#[derive(Parser, Debug)]
#[command(
    name = "molsearch",
    author,
    version,
    about = "Search a molecule similarity backend from the terminal",
    long_about = "Submit a structure (typed, drawn or read from a sketch file) to a molecule \
                  similarity service and show the best match: SMILES, distance, properties \
                  and depiction."
)]
struct Cli {
    /// Backend base URL (overrides config.toml and MOLSEARCH_URL)
    #[arg(long, global = true, value_name = "URL")]
    url: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Suppress progress spinners (for script consumption)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the search options offered by the backend
    Models(commands::models::ModelsArgs),
    /// Run one search and print the best match
    Search(commands::search::SearchArgs),
    /// Interactive search page
    Tui(tui::TuiArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Resolve client configuration: file and environment, then `--url`
fn client_config(url: Option<&str>) -> Result<ClientConfig> {
    let config = ClientConfig::load().context("Failed to load configuration")?;
    let config = match url {
        Some(url) => config.with_base_url(url).context("Invalid --url")?,
        None => config,
    };
    debug!(
        models = %config.models_url(),
        search = %config.search_url(),
        timeout = ?config.request_timeout,
        "client configuration"
    );
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The TUI owns the terminal, so its logs go to a file
    let log_file = match cli.command {
        Commands::Tui(_) => config_dir().map(|dir| dir.join("tui.log")),
        _ => None,
    };
    tracing_setup::init(&tracing_setup::TracingConfig {
        debug: cli.debug,
        log_file,
    })
    .ok();

    // Initialize UI quiet mode from flag, env var, and TTY detection
    ui::init_quiet_mode(cli.quiet);

    load_dotenv();

    match cli.command {
        Commands::Models(args) => {
            let config = client_config(cli.url.as_deref())?;
            commands::run_models(args, &config).await?
        }
        Commands::Search(args) => {
            let config = client_config(cli.url.as_deref())?;
            commands::run_search(args, &config).await?
        }
        Commands::Tui(args) => {
            let config = client_config(cli.url.as_deref())?;
            tokio::task::block_in_place(|| tui::run(args, &config))?
        }
        Commands::Completions(args) => run_completions(args)?,
    }
    Ok(())
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
