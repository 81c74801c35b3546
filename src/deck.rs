use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::{CardGeometry, CardTexts, Page, lines_from_str, paginate};
use crate::error::CardResult;

pub const DEFAULT_DECK_NAME: &str = "Cards Against Humanity";
pub const DEFAULT_WHITE_FILE: &str = "white.txt";
pub const DEFAULT_BLACK_FILE: &str = "black.txt";
pub const DEFAULT_ICON_FILE: &str = "icon.png";
/// Document title used when there is no output file to name it after.
pub const DEFAULT_TITLE: &str = "Bigger, Blacker Cards";

/// Logo stamped into every card cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    File(PathBuf),
    /// Vector logo drawn when no icon file is available.
    Builtin,
}

impl Icon {
    /// The first candidate that is an existing file, else [`Icon::Builtin`].
    pub fn first_existing<I, P>(candidates: I) -> Icon
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        candidates
            .into_iter()
            .find(|path| path.as_ref().is_file())
            .map(|path| Icon::File(path.as_ref().to_path_buf()))
            .unwrap_or(Icon::Builtin)
    }
}

/// Settings shared by every deck of a run.
#[derive(Debug, Clone, Serialize)]
pub struct DeckOptions {
    pub geometry: CardGeometry,
    pub texts: CardTexts,
    pub deck_name: String,
    pub white_file: String,
    pub black_file: String,
    pub icon_file: String,
}

impl DeckOptions {
    pub fn new(geometry: CardGeometry) -> Self {
        Self {
            geometry,
            texts: CardTexts::default(),
            deck_name: DEFAULT_DECK_NAME.to_string(),
            white_file: DEFAULT_WHITE_FILE.to_string(),
            black_file: DEFAULT_BLACK_FILE.to_string(),
            icon_file: DEFAULT_ICON_FILE.to_string(),
        }
    }
}

/// Non-blank white and black card lines, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardLists {
    pub white: Vec<String>,
    pub black: Vec<String>,
}

impl CardLists {
    /// Read both lists; a list whose file does not exist is empty.
    pub fn from_files<P: AsRef<Path>>(white: Option<P>, black: Option<P>) -> io::Result<Self> {
        Ok(Self {
            white: read_card_file(white)?,
            black: read_card_file(black)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.white.is_empty() && self.black.is_empty()
    }
}

fn read_card_file<P: AsRef<Path>>(path: Option<P>) -> io::Result<Vec<String>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    match fs::read(path.as_ref()) {
        Ok(bytes) => Ok(lines_from_str(&String::from_utf8_lossy(&bytes))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(err),
    }
}

/// Everything needed to print one PDF.
#[derive(Debug, Clone)]
pub struct Deck {
    pub white_pages: Vec<Page>,
    pub black_pages: Vec<Page>,
    pub name: String,
    pub title: String,
    pub texts: CardTexts,
    pub geometry: CardGeometry,
    pub white_icon: Icon,
    pub black_icon: Icon,
    /// Directory that `[[img=...]]` paths are relative to.
    pub source_dir: PathBuf,
}

impl Deck {
    /// Paginate `cards` for the grid in `options`. Icons default to the
    /// built-in logo and images resolve against the current directory.
    pub fn build(cards: &CardLists, options: &DeckOptions) -> CardResult<Self> {
        let capacity = options.geometry.capacity();
        Ok(Self {
            white_pages: paginate(&cards.white, capacity)?,
            black_pages: paginate(&cards.black, capacity)?,
            name: options.deck_name.clone(),
            title: DEFAULT_TITLE.to_string(),
            texts: options.texts.clone(),
            geometry: options.geometry,
            white_icon: Icon::Builtin,
            black_icon: Icon::Builtin,
            source_dir: PathBuf::from("."),
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_icons(mut self, white: Icon, black: Icon) -> Self {
        self.white_icon = white;
        self.black_icon = black;
        self
    }

    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = dir.into();
        self
    }

    pub fn white_count(&self) -> usize {
        self.white_pages.iter().map(Vec::len).sum()
    }

    pub fn black_count(&self) -> usize {
        self.black_pages.iter().map(Vec::len).sum()
    }

    pub fn page_count(&self) -> usize {
        self.white_pages.len() + self.black_pages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GeometryRequest, LayoutConstants};
    use pretty_assertions::assert_eq;

    fn options() -> DeckOptions {
        let geometry =
            CardGeometry::compute(&GeometryRequest::default(), &LayoutConstants::default())
                .unwrap();
        DeckOptions::new(geometry)
    }

    #[test]
    fn missing_files_are_empty_lists() {
        let dir = tempfile::tempdir().unwrap();
        let white = dir.path().join("white.txt");
        fs::write(&white, "a\n\nb\r\n").unwrap();
        let black = dir.path().join("black.txt");
        let cards = CardLists::from_files(Some(&white), Some(&black)).unwrap();
        assert_eq!(cards.white, vec!["a", "b"]);
        assert!(cards.black.is_empty());
        assert!(!cards.is_empty());
    }

    #[test]
    fn card_files_keep_the_first_column() {
        let dir = tempfile::tempdir().unwrap();
        let white = dir.path().join("white.txt");
        fs::write(&white, "Pick\\tme\tnotes\n\tindented\n").unwrap();
        let cards = CardLists::from_files(Some(&white), None).unwrap();
        assert_eq!(cards.white, vec!["Pick\\tme", "indented"]);
    }

    #[test]
    fn decks_paginate_both_colours() {
        let white: Vec<String> = (1..=25).map(|i| format!("white {i}")).collect();
        let cards = CardLists {
            white,
            black: vec!["prompt".into()],
        };
        let deck = Deck::build(&cards, &options()).unwrap();
        assert_eq!(deck.white_pages.len(), 2);
        assert_eq!(deck.black_pages.len(), 1);
        assert_eq!((deck.white_count(), deck.black_count()), (25, 1));
        assert_eq!(deck.page_count(), 3);
        assert_eq!(deck.title, DEFAULT_TITLE);
        assert_eq!(deck.name, DEFAULT_DECK_NAME);
    }

    #[test]
    fn icon_candidates_fall_through() {
        let dir = tempfile::tempdir().unwrap();
        let icon = dir.path().join("icon.png");
        fs::write(&icon, b"png").unwrap();
        let found = Icon::first_existing([dir.path().join("black_icon.png"), icon.clone()]);
        assert_eq!(found, Icon::File(icon));
        assert_eq!(
            Icon::first_existing([dir.path().join("nope.png")]),
            Icon::Builtin
        );
    }
}
