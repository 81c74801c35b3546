use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while building or rendering a deck.
#[derive(Debug, Error)]
pub enum CardError {
    #[error(
        "card of {card_width:.1}x{card_height:.1}pt does not fit on {paper_width:.1}x{paper_height:.1}pt paper ({cols} across, {rows} high)"
    )]
    DegenerateGeometry {
        card_width: f32,
        card_height: f32,
        paper_width: f32,
        paper_height: f32,
        cols: i64,
        rows: i64,
    },
    #[error("page capacity must be at least one card")]
    ZeroCapacity,
    #[error("malformed image directive '{directive}': {reason}")]
    InvalidImageDirective { directive: String, reason: String },
    #[error("image '{}' referenced by a card does not exist", .0.display())]
    MissingImage(PathBuf),
    #[error("failed to decode image '{}'", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("PDF assembly failed")]
    Pdf(#[from] lopdf::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type CardResult<T> = Result<T, CardError>;
