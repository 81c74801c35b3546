//! Directory mode: one deck per directory that holds cards, walked depth first.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Serialize;

use crate::deck::{CardLists, Deck, DeckOptions, Icon};
use crate::render::{RenderReport, render_pdf};

const FALLBACK_OUTPUT: &str = "cards.pdf";

/// Settings for a directory walk.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    pub deck: DeckOptions,
    /// Where the PDFs are written.
    pub out_dir: PathBuf,
    /// Output file name for the root directory, instead of `<basename>.pdf`.
    pub root_output: Option<String>,
}

impl WalkOptions {
    pub fn new(deck: DeckOptions) -> Self {
        Self {
            deck,
            out_dir: PathBuf::from("."),
            root_output: None,
        }
    }
}

/// Result of visiting one directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckOutcome {
    pub directory: PathBuf,
    /// `None` when the directory had no cards and nothing was written.
    pub output: Option<PathBuf>,
    pub report: RenderReport,
}

impl DeckOutcome {
    fn skipped(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
            output: None,
            report: RenderReport::default(),
        }
    }

    pub fn is_rendered(&self) -> bool {
        self.output.is_some()
    }
}

/// Render `root` and every directory below it.
///
/// Directories are visited in pre-order with children sorted by name; each
/// canonical path is visited at most once, so symlink loops terminate.
pub fn walk(root: &Path, options: &WalkOptions) -> Result<Vec<DeckOutcome>> {
    let root = root
        .canonicalize()
        .with_context(|| format!("failed to resolve directory {}", root.display()))?;
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }

    let mut outcomes = Vec::new();
    let mut visited = HashSet::new();
    let mut written = HashSet::new();
    let mut stack = vec![root.clone()];

    while let Some(dir) = stack.pop() {
        if !visited.insert(dir.clone()) {
            log::debug!("already visited {}", dir.display());
            continue;
        }

        let file_name = match (&options.root_output, dir == root) {
            (Some(name), true) => name.clone(),
            _ => output_name(&dir),
        };
        let output = options.out_dir.join(file_name);
        let outcome = render_directory(&dir, &options.deck, &output)?;
        if outcome.is_rendered() && !written.insert(output.clone()) {
            log::warn!(
                "{} was overwritten by the deck in {}",
                output.display(),
                dir.display()
            );
        }
        outcomes.push(outcome);

        // Reversed so the smallest name is popped first.
        stack.extend(subdirectories(&dir).into_iter().rev());
    }
    Ok(outcomes)
}

/// Render the deck found directly inside `dir` to `output`, if it has any cards.
pub fn render_directory(dir: &Path, options: &DeckOptions, output: &Path) -> Result<DeckOutcome> {
    let cards = CardLists::from_files(
        Some(dir.join(&options.white_file)),
        Some(dir.join(&options.black_file)),
    )
    .with_context(|| format!("failed to read card lists in {}", dir.display()))?;
    if cards.is_empty() {
        log::warn!("skipping {}: no cards", dir.display());
        return Ok(DeckOutcome::skipped(dir));
    }

    let white_icon = Icon::first_existing(icon_candidates(dir, &options.icon_file, "white"));
    let black_icon = Icon::first_existing(icon_candidates(dir, &options.icon_file, "black"));
    log::debug!(
        "icons for {}: white {:?}, black {:?}",
        dir.display(),
        white_icon,
        black_icon
    );

    let deck = Deck::build(&cards, options)
        .with_context(|| format!("failed to lay out cards in {}", dir.display()))?
        .with_title(title_for(output))
        .with_icons(white_icon, black_icon)
        .with_source_dir(dir);
    let report = write_deck(&deck, output)?;
    Ok(DeckOutcome {
        directory: dir.to_path_buf(),
        output: Some(output.to_path_buf()),
        report,
    })
}

/// Render `deck` and write the PDF to `output`.
///
/// The document is assembled in memory first so a failed render leaves no partial file.
pub fn write_deck(deck: &Deck, output: &Path) -> Result<RenderReport> {
    let mut bytes = Vec::new();
    let report = render_pdf(deck, &mut bytes)
        .with_context(|| format!("failed to render {}", output.display()))?;
    fs::write(output, &bytes).with_context(|| format!("failed to write {}", output.display()))?;
    log::info!(
        "wrote {} ({} white, {} black, {} pages)",
        output.display(),
        report.white_cards,
        report.black_cards,
        report.pages
    );
    Ok(report)
}

/// Icon files to try for one card colour, most specific first.
pub fn icon_candidates(dir: &Path, icon_file: &str, colour: &str) -> [PathBuf; 2] {
    [dir.join(format!("{colour}_{icon_file}")), dir.join(icon_file)]
}

/// `<basename>.pdf`, or `cards.pdf` for a directory without a name such as `/`.
pub fn output_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| format!("{}.pdf", name.to_string_lossy()))
        .unwrap_or_else(|| FALLBACK_OUTPUT.to_string())
}

/// Document title: the output file name without its extension.
pub fn title_for(output: &Path) -> String {
    output
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| crate::deck::DEFAULT_TITLE.to_string())
}

/// Canonical paths of the directories inside `dir`, sorted by entry name.
fn subdirectories(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            log::warn!("cannot list {}: {err}", dir.display());
            return Vec::new();
        }
    };

    let mut children: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(err) => {
                log::warn!("unreadable entry in {}: {err}", dir.display());
                None
            }
        })
        .filter(|path| path.is_dir())
        .collect();
    children.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    children
        .into_iter()
        .filter_map(|path| match path.canonicalize() {
            Ok(path) => Some(path),
            Err(err) => {
                log::warn!("cannot resolve {}: {err}", path.display());
                None
            }
        })
        .collect()
}
