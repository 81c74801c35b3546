//! Drawing decks: the [`Surface`] abstraction, its PDF implementation and the
//! card layout that drives it.

pub mod deck;
pub mod image;
pub mod metrics;
pub mod pdf;
pub mod surface;
pub mod text;

use std::io::Write;

pub use deck::{RenderReport, render_deck};
pub use pdf::{DocumentInfo, PdfSurface};
pub use surface::{Align, Color, Point, Rect, Surface, TextBox};

use crate::deck::Deck;
use crate::error::CardResult;

/// Render `deck` as a complete PDF document into `writer`.
pub fn render_pdf<W: Write>(deck: &Deck, writer: &mut W) -> CardResult<RenderReport> {
    let mut surface = PdfSurface::new();
    let report = render_deck(deck, &mut surface)?;
    surface.finish(&DocumentInfo::new(deck.title.as_str()), writer)?;
    Ok(report)
}
