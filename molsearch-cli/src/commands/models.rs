//! Models command - list the search options the backend offers

use anyhow::{bail, Context, Result};
use clap::Parser;
use molsearch_core::error_channel::describe;
use molsearch_core::{ClientConfig, HttpSearchClient, SearchBackend};

use crate::ui;

/// Output format for the option list
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelsFormat {
    /// One name per line
    #[default]
    Text,
    /// JSON array
    Json,
}

#[derive(Parser, Debug)]
pub struct ModelsArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = ModelsFormat::Text)]
    pub format: ModelsFormat,
}

pub async fn run_models(args: ModelsArgs, config: &ClientConfig) -> Result<()> {
    let client = HttpSearchClient::new(config).context("Failed to build HTTP client")?;

    let pb = ui::spinner(format!("Fetching options from {}", client.models_url()));
    let outcome = client.fetch_models().await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let names = match outcome {
        Ok(names) => names,
        Err(failure) => bail!(describe(&failure)),
    };

    match args.format {
        ModelsFormat::Json => println!("{}", serde_json::to_string_pretty(&names)?),
        ModelsFormat::Text => {
            for name in &names {
                println!("{}", name);
            }
        }
    }
    Ok(())
}
