//! Directory mode (`bbcards --directory DIR`).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use bbcards::{DeckOptions, WalkOptions, walk};

use crate::cli::utils::{is_stdout, print_json};
use crate::cli::{Cli, Summary};

pub fn handle(cli: &Cli, dir: &Path, options: DeckOptions) -> Result<()> {
    if cli.white.is_some() || cli.black.is_some() {
        log::warn!("--directory given, ignoring --white/--black");
    }
    let root_output = match &cli.output {
        Some(path) if is_stdout(path) => {
            log::warn!("directory mode writes files, ignoring --output -");
            None
        }
        Some(path) => Some(path.to_string_lossy().into_owned()),
        None => None,
    };

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("failed to create {}", cli.out_dir.display()))?;
    let walk_options = WalkOptions {
        deck: options,
        out_dir: cli.out_dir.clone(),
        root_output,
    };
    let outcomes = walk(dir, &walk_options)?;

    if cli.json {
        return print_json(&Summary {
            options: &walk_options.deck,
            decks: &outcomes,
        });
    }
    for outcome in &outcomes {
        match &outcome.output {
            Some(path) => println!(
                "{}: {} white and {} black cards on {} pages",
                path.display(),
                outcome.report.white_cards,
                outcome.report.black_cards,
                outcome.report.pages
            ),
            None => println!("{}: no cards, skipped", outcome.directory.display()),
        }
    }
    Ok(())
}
