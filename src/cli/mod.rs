//! Command-line interface wiring for the `bbcards` binary.
//!
//! This module owns the clap definitions and hands off to the directory or
//! file mode handler.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use serde::Serialize;

use bbcards::deck::DEFAULT_DECK_NAME;
use bbcards::{CardGeometry, CardTexts, DeckOptions, DeckOutcome, LayoutConstants};

pub mod common;
pub mod directory;
pub mod files;
pub mod utils;

use common::GeometryArgs;

/// Parsed CLI entrypoint for the `bbcards` binary.
#[derive(Parser, Debug)]
#[command(
    name = "bbcards",
    version,
    about = "Print-ready PDF decks for party card games",
    long_about = "Print-ready PDF decks for party card games.\n\n\
        Either point --directory at a tree of card lists (white.txt, black.txt and \
        an optional icon.png per directory; one PDF is written per directory that \
        has cards), or name the card files with --white/--black. --directory wins \
        when both are given."
)]
pub struct Cli {
    /// Directory to search (recursively) for card files.
    #[arg(short = 'd', long)]
    pub directory: Option<PathBuf>,
    /// White card file.
    #[arg(short = 'w', long)]
    pub white: Option<PathBuf>,
    /// Black card file.
    #[arg(short = 'b', long)]
    pub black: Option<PathBuf>,
    /// Icon file (.png or .jpg).
    #[arg(short = 'i', long)]
    pub icon: Option<PathBuf>,
    /// Output PDF (`-` for stdout). In directory mode, names the top directory's PDF.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
    /// White cards given inline, one per line.
    #[arg(long = "white-text", value_name = "TEXT")]
    pub white_text: Option<String>,
    /// Black cards given inline, one per line.
    #[arg(long = "black-text", value_name = "TEXT")]
    pub black_text: Option<String>,
    #[command(flatten)]
    pub geometry: GeometryArgs,
    /// Language of the printed captions: en or es.
    #[arg(long, default_value = "en")]
    pub lang: String,
    /// Deck name printed on every card.
    #[arg(short = 'n', long, default_value = DEFAULT_DECK_NAME)]
    pub name: String,
    /// Where directory mode writes its PDFs.
    #[arg(long = "out-dir", default_value = ".")]
    pub out_dir: PathBuf,
    /// Print a JSON summary of the rendered decks.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    fn has_input(&self) -> bool {
        self.directory.is_some()
            || self.white.is_some()
            || self.black.is_some()
            || self.white_text.is_some()
            || self.black_text.is_some()
    }

    fn deck_options(&self) -> Result<DeckOptions> {
        let request = self.geometry.request();
        let geometry = CardGeometry::compute(&request, &LayoutConstants::default())
            .context("cards do not fit on the selected paper")?;
        log::debug!(
            "{} x {} cards of {:.1}x{:.1}pt on {} paper ({:.1}x{:.1}pt)",
            geometry.cards_across(),
            geometry.cards_high(),
            geometry.card_width(),
            geometry.card_height(),
            request.paper,
            geometry.paper_width(),
            geometry.paper_height()
        );

        let mut options = DeckOptions::new(geometry);
        options.texts = CardTexts::for_language(&self.lang);
        options.deck_name = self.name.clone();
        Ok(options)
    }
}

/// JSON document printed with `--json`.
#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub options: &'a DeckOptions,
    pub decks: &'a [DeckOutcome],
}

/// Execute the parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    if !cli.has_input() {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    }

    let options = cli.deck_options()?;
    match &cli.directory {
        Some(dir) => directory::handle(&cli, dir, options),
        None => files::handle(&cli, options),
    }
}
