//! Paper and card geometry.
//!
//! All lengths handed to the renderer are PDF points (1/72 in). Card sizes are
//! described in inches and converted once, when a [`CardGeometry`] is built.

use std::fmt;

use serde::Serialize;

use crate::error::{CardError, CardResult};

pub const POINTS_PER_INCH: f32 = 72.0;
pub const MM_PER_INCH: f32 = 25.4;

/// Convert inches to points.
#[inline]
pub fn inches_to_pt(inches: f32) -> f32 {
    inches * POINTS_PER_INCH
}

/// Convert millimeters to points.
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm / MM_PER_INCH * POINTS_PER_INCH
}

/// Fixed layout values shared by every deck of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutConstants {
    /// Horizontal space kept free of cards, split between both sides.
    pub horizontal_margin: f32,
    /// Vertical space kept free of cards, split between top and bottom.
    pub vertical_margin: f32,
    /// Radius used when rounded corners are requested without a value.
    pub default_corner_radius: f32,
}

impl Default for LayoutConstants {
    fn default() -> Self {
        Self {
            horizontal_margin: mm_to_pt(10.0),
            vertical_margin: mm_to_pt(15.0),
            default_corner_radius: inches_to_pt(1.0 / 8.0),
        }
    }
}

/// Supported paper formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaperFormat {
    DefaultLetter,
    Letter,
    LetterLandscape,
    DinA4,
    DinA4Landscape,
}

impl PaperFormat {
    /// Resolve a user supplied identifier, falling back to [`PaperFormat::DefaultLetter`].
    pub fn from_identifier(id: &str) -> Self {
        const TABLE: &[(&[&str], PaperFormat)] = &[
            (&["LETTER", "letter"], PaperFormat::Letter),
            (
                &["LETTER_", "letter-landscape", "letter_"],
                PaperFormat::LetterLandscape,
            ),
            (&["DINA4", "dina4", "a4", "A4"], PaperFormat::DinA4),
            (
                &["DINA4_", "dina4_", "a4-landscape", "A4-landscape"],
                PaperFormat::DinA4Landscape,
            ),
        ];
        TABLE
            .iter()
            .find(|(names, _)| names.contains(&id))
            .map(|(_, format)| *format)
            .unwrap_or(PaperFormat::DefaultLetter)
    }

    /// Paper `(width, height)` in points.
    pub fn dimensions(self) -> (f32, f32) {
        let letter = (inches_to_pt(8.5), inches_to_pt(11.0));
        let a4 = (mm_to_pt(210.0), mm_to_pt(297.0));
        match self {
            PaperFormat::DefaultLetter | PaperFormat::Letter => letter,
            PaperFormat::LetterLandscape => (letter.1, letter.0),
            PaperFormat::DinA4 => a4,
            PaperFormat::DinA4Landscape => (a4.1, a4.0),
        }
    }
}

impl fmt::Display for PaperFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaperFormat::DefaultLetter => write!(f, "letter (default)"),
            PaperFormat::Letter => write!(f, "letter"),
            PaperFormat::LetterLandscape => write!(f, "letter-landscape"),
            PaperFormat::DinA4 => write!(f, "a4"),
            PaperFormat::DinA4Landscape => write!(f, "a4-landscape"),
        }
    }
}

/// Requested corner style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CornerSpec {
    Rounded(bool),
    Radius(f32),
}

impl CornerSpec {
    fn resolve(self, constants: &LayoutConstants) -> f32 {
        match self {
            CornerSpec::Rounded(true) => constants.default_corner_radius,
            CornerSpec::Rounded(false) => 0.0,
            CornerSpec::Radius(radius) => radius,
        }
    }
}

/// Physical card dimensions plus the body font size that suits them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardSize {
    pub width_in: f32,
    pub height_in: f32,
    pub font_size: f32,
}

impl CardSize {
    pub const SMALL: CardSize = CardSize {
        width_in: 2.0,
        height_in: 2.0,
        font_size: 14.0,
    };
    pub const MEDIUM1: CardSize = CardSize {
        width_in: 41.0 / MM_PER_INCH,
        height_in: 63.0 / MM_PER_INCH,
        font_size: 12.0,
    };
    pub const MEDIUM2: CardSize = CardSize {
        width_in: 43.0 / MM_PER_INCH,
        height_in: 65.0 / MM_PER_INCH,
        font_size: 12.0,
    };
    pub const MEDIUM3: CardSize = CardSize {
        width_in: 45.0 / MM_PER_INCH,
        height_in: 68.0 / MM_PER_INCH,
        font_size: 14.0,
    };
    pub const LARGE: CardSize = CardSize {
        width_in: 2.5,
        height_in: 3.5,
        font_size: 14.0,
    };
}

impl Default for CardSize {
    fn default() -> Self {
        CardSize::SMALL
    }
}

/// Everything the geometry calculation needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryRequest {
    pub card: CardSize,
    pub paper: PaperFormat,
    pub corners: CornerSpec,
    pub one_card_per_page: bool,
}

impl Default for GeometryRequest {
    fn default() -> Self {
        Self {
            card: CardSize::default(),
            paper: PaperFormat::DefaultLetter,
            corners: CornerSpec::Rounded(false),
            one_card_per_page: false,
        }
    }
}

/// Resolved grid layout for one deck render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardGeometry {
    card_width: f32,
    card_height: f32,
    paper_width: f32,
    paper_height: f32,
    corner_radius: f32,
    cards_across: usize,
    cards_high: usize,
    page_width: f32,
    page_height: f32,
    margin_left: f32,
    margin_top: f32,
    font_size: f32,
    one_card_per_page: bool,
}

impl CardGeometry {
    /// Compute the grid for `request`.
    ///
    /// Fails with [`CardError::DegenerateGeometry`] when not even a single card
    /// fits into the printable area.
    pub fn compute(request: &GeometryRequest, constants: &LayoutConstants) -> CardResult<Self> {
        let card_width = inches_to_pt(request.card.width_in);
        let card_height = inches_to_pt(request.card.height_in);

        // A one-card sheet is cut to the card itself, so no printer margin is reserved.
        let (paper_width, paper_height, h_margin, v_margin) = if request.one_card_per_page {
            (card_width, card_height, 0.0, 0.0)
        } else {
            let (w, h) = request.paper.dimensions();
            (w, h, constants.horizontal_margin, constants.vertical_margin)
        };

        let cols = ((paper_width - h_margin) / card_width).floor() as i64;
        let rows = ((paper_height - v_margin) / card_height).floor() as i64;
        if cols < 1 || rows < 1 {
            return Err(CardError::DegenerateGeometry {
                card_width,
                card_height,
                paper_width,
                paper_height,
                cols,
                rows,
            });
        }

        let page_width = card_width * cols as f32;
        let page_height = card_height * rows as f32;

        Ok(Self {
            card_width,
            card_height,
            paper_width,
            paper_height,
            corner_radius: request.corners.resolve(constants),
            cards_across: cols as usize,
            cards_high: rows as usize,
            page_width,
            page_height,
            margin_left: (paper_width - page_width) / 2.0,
            margin_top: (paper_height - page_height) / 2.0,
            font_size: request.card.font_size,
            one_card_per_page: request.one_card_per_page,
        })
    }

    pub fn card_width(&self) -> f32 {
        self.card_width
    }

    pub fn card_height(&self) -> f32 {
        self.card_height
    }

    pub fn paper_width(&self) -> f32 {
        self.paper_width
    }

    pub fn paper_height(&self) -> f32 {
        self.paper_height
    }

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    pub fn cards_across(&self) -> usize {
        self.cards_across
    }

    pub fn cards_high(&self) -> usize {
        self.cards_high
    }

    pub fn page_width(&self) -> f32 {
        self.page_width
    }

    pub fn page_height(&self) -> f32 {
        self.page_height
    }

    pub fn margin_left(&self) -> f32 {
        self.margin_left
    }

    pub fn margin_top(&self) -> f32 {
        self.margin_top
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn one_card_per_page(&self) -> bool {
        self.one_card_per_page
    }

    /// Number of cards placed on one sheet.
    pub fn capacity(&self) -> usize {
        if self.one_card_per_page {
            1
        } else {
            self.cards_across * self.cards_high
        }
    }

    /// Grid position of the `index`-th card of a page.
    pub fn slot(&self, index: usize) -> CardSlot {
        CardSlot {
            column: index % self.cards_across,
            row: self.cards_high - index / self.cards_across,
        }
    }
}

/// Grid cell of a card; `row` counts from the bottom edge, starting at 1 for
/// the lowest row, so `row * card_height` is the cell's top edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardSlot {
    pub row: usize,
    pub column: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(card: CardSize, paper: PaperFormat) -> CardResult<CardGeometry> {
        let request = GeometryRequest {
            card,
            paper,
            ..GeometryRequest::default()
        };
        CardGeometry::compute(&request, &LayoutConstants::default())
    }

    #[test]
    fn small_cards_on_letter_make_a_four_by_five_grid() {
        let g = geometry(CardSize::SMALL, PaperFormat::DefaultLetter).unwrap();
        assert_eq!(g.cards_across(), 4);
        assert_eq!(g.cards_high(), 5);
        assert_eq!(g.capacity(), 20);
        assert!((g.page_width() - 576.0).abs() < 1e-3);
        assert!((g.margin_left() - 18.0).abs() < 1e-3);
        assert!((g.margin_top() - 36.0).abs() < 1e-3);
    }

    #[test]
    fn every_builtin_size_fits_every_format() {
        let sizes = [
            CardSize::SMALL,
            CardSize::MEDIUM1,
            CardSize::MEDIUM2,
            CardSize::MEDIUM3,
            CardSize::LARGE,
        ];
        let formats = [
            PaperFormat::DefaultLetter,
            PaperFormat::Letter,
            PaperFormat::LetterLandscape,
            PaperFormat::DinA4,
            PaperFormat::DinA4Landscape,
        ];
        for size in sizes {
            for format in formats {
                let g = geometry(size, format).unwrap();
                assert!(g.cards_across() >= 1 && g.cards_high() >= 1);
                assert!(g.page_width() <= g.paper_width());
                assert!(g.page_height() <= g.paper_height());
                assert!(g.margin_left() >= 0.0 && g.margin_top() >= 0.0);
            }
        }
    }

    #[test]
    fn oversized_card_is_rejected() {
        let huge = CardSize {
            width_in: 9.0,
            height_in: 2.0,
            font_size: 14.0,
        };
        let err = geometry(huge, PaperFormat::Letter).unwrap_err();
        assert!(matches!(err, CardError::DegenerateGeometry { cols: 0, .. }));
    }

    #[test]
    fn unknown_paper_identifier_falls_back_to_letter() {
        assert_eq!(
            PaperFormat::from_identifier("TABLOID"),
            PaperFormat::DefaultLetter
        );
        assert_eq!(PaperFormat::from_identifier("DINA4_"), PaperFormat::DinA4Landscape);
        assert_eq!(PaperFormat::from_identifier("LETTER_"), PaperFormat::LetterLandscape);
    }

    #[test]
    fn corner_spec_resolution() {
        let constants = LayoutConstants::default();
        assert_eq!(CornerSpec::Rounded(false).resolve(&constants), 0.0);
        assert!((CornerSpec::Rounded(true).resolve(&constants) - 9.0).abs() < 1e-4);
        assert_eq!(CornerSpec::Radius(4.5).resolve(&constants), 4.5);
    }

    #[test]
    fn one_card_per_page_uses_card_as_paper() {
        let request = GeometryRequest {
            card: CardSize::LARGE,
            one_card_per_page: true,
            ..GeometryRequest::default()
        };
        let g = CardGeometry::compute(&request, &LayoutConstants::default()).unwrap();
        assert_eq!(g.capacity(), 1);
        assert_eq!(g.paper_width(), g.card_width());
        assert_eq!(g.margin_left(), 0.0);
    }

    #[test]
    fn slots_fill_rows_from_the_top() {
        let g = geometry(CardSize::SMALL, PaperFormat::Letter).unwrap();
        assert_eq!(g.slot(0), CardSlot { row: 5, column: 0 });
        assert_eq!(g.slot(3), CardSlot { row: 5, column: 3 });
        assert_eq!(g.slot(4), CardSlot { row: 4, column: 0 });
        assert_eq!(g.slot(19), CardSlot { row: 1, column: 3 });
    }
}
