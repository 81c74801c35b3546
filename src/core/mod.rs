//! Pure card-layout primitives: geometry, markup, directives and pagination.

pub mod directive;
pub mod geometry;
pub mod language;
pub mod markup;
pub mod paginate;

pub use directive::{CardDirective, ImageDirective, PickCount, parse_card, parse_directives};
pub use geometry::{
    CardGeometry, CardSize, CardSlot, CornerSpec, GeometryRequest, LayoutConstants, PaperFormat,
};
pub use language::CardTexts;
pub use markup::{Span, Tag, sanitize, tokenize};
pub use paginate::{Page, lines_from_str, non_blank_lines, paginate};
