//! File mode (`bbcards --white FILE --black FILE`), including inline card text.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use bbcards::core::lines_from_str;
use bbcards::deck::DEFAULT_TITLE;
use bbcards::walker::title_for;
use bbcards::{CardLists, Deck, DeckOptions, DeckOutcome, Icon, render_pdf};

use crate::cli::utils::{is_stdout, print_json, write_output};
use crate::cli::{Cli, Summary};

const DEFAULT_OUTPUT: &str = "cards.pdf";

pub fn handle(cli: &Cli, options: DeckOptions) -> Result<()> {
    let cards = card_lists(cli)?;
    if cards.is_empty() {
        log::warn!("no cards to print");
        return Ok(());
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    let to_stdout = is_stdout(&output);
    let icon = deck_icon(cli);

    let deck = Deck::build(&cards, &options)
        .context("failed to lay out cards")?
        .with_title(document_title(&output))
        .with_icons(icon.clone(), icon);
    let mut bytes = Vec::new();
    let report = render_pdf(&deck, &mut bytes).context("failed to render deck")?;
    write_output(&output, &bytes)?;

    if to_stdout {
        if cli.json {
            log::warn!("the PDF went to stdout, not printing the JSON summary");
        }
        return Ok(());
    }
    log::info!("wrote {}", output.display());
    if cli.json {
        let outcome = DeckOutcome {
            directory: PathBuf::from("."),
            output: Some(output),
            report,
        };
        return print_json(&Summary {
            options: &options,
            decks: std::slice::from_ref(&outcome),
        });
    }
    println!(
        "{}: {} white and {} black cards on {} pages",
        output.display(),
        report.white_cards,
        report.black_cards,
        report.pages
    );
    Ok(())
}

/// Card lists from `--white`/`--black`; inline text replaces a colour's file.
fn card_lists(cli: &Cli) -> Result<CardLists> {
    let mut cards = CardLists::from_files(cli.white.as_deref(), cli.black.as_deref())
        .context("failed to read card lists")?;
    if let Some(text) = &cli.white_text {
        cards.white = lines_from_str(text);
    }
    if let Some(text) = &cli.black_text {
        cards.black = lines_from_str(text);
    }
    Ok(cards)
}

fn document_title(output: &Path) -> String {
    if is_stdout(output) {
        DEFAULT_TITLE.to_string()
    } else {
        title_for(output)
    }
}

/// The `--icon` file for both colours, or the built-in logo.
fn deck_icon(cli: &Cli) -> Icon {
    let Some(path) = &cli.icon else {
        return Icon::Builtin;
    };
    let icon = Icon::first_existing([path]);
    if icon == Icon::Builtin {
        log::warn!("icon {} not found, using the built-in logo", path.display());
    }
    icon
}
