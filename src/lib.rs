//! Print-ready PDF decks for party card games, generated from plain-text card lists.

pub mod core;
pub mod deck;
pub mod error;
pub mod render;
pub mod walker;

pub use crate::core::{
    CardDirective, CardGeometry, CardSize, CardTexts, CornerSpec, GeometryRequest,
    ImageDirective, LayoutConstants, PaperFormat, PickCount, parse_card, paginate, sanitize,
};
pub use deck::{CardLists, Deck, DeckOptions, Icon};
pub use error::{CardError, CardResult};
pub use render::{PdfSurface, RenderReport, Surface, render_deck, render_pdf};
pub use walker::{DeckOutcome, WalkOptions, walk};
