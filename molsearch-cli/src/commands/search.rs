//! Search command - one-shot similarity search
//!
//! Runs the same session the TUI drives: fetch options, fill the form from
//! the command line, submit once, then print what landed on the page.
//!
//! Examples:
//!   molsearch search c1ccccc1O
//!   molsearch search --drawn CCO -o LogP -o db=ChEMBL
//!   molsearch search --sketch ~/sketch.smi --format json --svg-out best.svg

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use molsearch_core::{
    ClientConfig, HttpSearchClient, NothingDrawn, Page, PageHandle, ResultSlot, SearchSession,
    SessionViews, StructureSource, UiState, TOGGLE_ON,
};
use tracing::warn;

use super::OutputFormat;
use crate::sketch::{FileSketchpad, LiteralDrawing};
use crate::ui::{self, fragment_text, SpinnerDisplay};

#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Structure to search for (SMILES or anything the backend accepts)
    pub query: Option<String>,

    /// Drawn structure; replaces QUERY when non-empty
    #[arg(long, value_name = "STRUCTURE")]
    pub drawn: Option<String>,

    /// Read the drawn structure from a file (missing file = nothing drawn)
    #[arg(long, value_name = "PATH", conflicts_with = "drawn")]
    pub sketch: Option<PathBuf>,

    /// Search option: NAME ticks a toggle, NAME=VALUE sends VALUE verbatim
    #[arg(short = 'o', long = "option", value_name = "NAME[=VALUE]")]
    pub options: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the result's SVG depiction to this file
    #[arg(long, value_name = "PATH")]
    pub svg_out: Option<PathBuf>,
}

/// Split `NAME[=VALUE]`; a bare name means a ticked toggle
fn parse_option(raw: &str) -> Result<(&str, &str)> {
    let (name, value) = raw.split_once('=').unwrap_or((raw, TOGGLE_ON));
    let name = name.trim();
    if name.is_empty() {
        bail!("Invalid option '{}': expected NAME or NAME=VALUE", raw);
    }
    Ok((name, value))
}

fn structure_source(args: &SearchArgs) -> Box<dyn StructureSource> {
    match (&args.drawn, &args.sketch) {
        (Some(drawn), _) => Box::new(LiteralDrawing(drawn.clone())),
        (None, Some(path)) => Box::new(FileSketchpad::new(path)),
        (None, None) => Box::new(NothingDrawn),
    }
}

pub async fn run_search(args: SearchArgs, config: &ClientConfig) -> Result<()> {
    let mut parsed = Vec::with_capacity(args.options.len());
    for raw in &args.options {
        parsed.push(parse_option(raw)?);
    }

    let structure = structure_source(&args);
    let query = args.query.clone().unwrap_or_default();
    if query.trim().is_empty() && structure.structure().is_empty() {
        bail!("Nothing to search for: pass a QUERY, --drawn or --sketch");
    }

    let client = HttpSearchClient::new(config).context("Failed to build HTTP client")?;

    let page = PageHandle::new();
    let mut views = SessionViews::from_page(&page, structure);
    views.display = Box::new(SpinnerDisplay::new(page.clone(), "Searching..."));
    let mut session = SearchSession::new(views);

    session.bootstrap(&client).await;
    // A failed bootstrap has already been logged; search without the option list
    let options_loaded = session.state() != UiState::Failed;

    {
        let mut page = page.borrow_mut();
        for (name, value) in parsed {
            if options_loaded && !page.labels().contains(&name) {
                warn!("Option '{}' is not offered by the backend; sending it anyway", name);
            }
            page.set_field(name, value);
        }
        page.query = query;
    }

    session.submit(&client).await;

    if session.state() == UiState::Failed {
        let message = session
            .errors()
            .message()
            .unwrap_or("search failed")
            .to_string();
        return Err(anyhow!(message));
    }

    let result = session
        .display()
        .current()
        .ok_or_else(|| anyhow!("Search finished without a result"))?;

    match args.format {
        OutputFormat::Text => print_card(&page.borrow(), args.svg_out.is_some()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Smiles => println!("{}", result.smiles),
    }

    if let Some(path) = &args.svg_out {
        fs::write(path, &result.svg)
            .with_context(|| format!("Failed to write SVG to {}", path.display()))?;
        if !ui::is_quiet() {
            eprintln!("Saved depiction to {}", path.display());
        }
    }
    Ok(())
}

/// Text rendering of the result card, read back from the page slots
fn print_card(page: &Page, svg_saved: bool) {
    println!("SMILES:    {}", page.slot(ResultSlot::Smiles));
    println!("Distance:  {}", page.slot(ResultSlot::Distance));

    let properties = fragment_text(page.slot(ResultSlot::Properties));
    if !properties.is_empty() {
        println!("Properties:");
        for line in properties.lines() {
            println!("  {}", line);
        }
    }

    if !svg_saved && !page.slot(ResultSlot::Graphic).is_empty() {
        println!("(depiction available with --svg-out or --format json)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_option_bare_name_is_toggle() {
        assert_eq!(parse_option("LogP").unwrap(), ("LogP", "on"));
    }

    #[test]
    fn test_parse_option_with_value() {
        assert_eq!(parse_option("db=ChEMBL").unwrap(), ("db", "ChEMBL"));
        assert_eq!(parse_option("expr=a=b").unwrap(), ("expr", "a=b"));
        assert_eq!(parse_option("MW=").unwrap(), ("MW", ""));
    }

    #[test]
    fn test_parse_option_rejects_empty_name() {
        assert!(parse_option("=1").is_err());
        assert!(parse_option("").is_err());
    }

    #[test]
    fn test_structure_source_prefers_literal() {
        let args = SearchArgs {
            query: None,
            drawn: Some("CCO".to_string()),
            sketch: None,
            options: Vec::new(),
            format: OutputFormat::Text,
            svg_out: None,
        };
        assert_eq!(structure_source(&args).structure(), "CCO");
    }
}
