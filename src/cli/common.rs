//! Shared clap argument groups.

use clap::{Args, ValueEnum};

use bbcards::{CardSize, CornerSpec, GeometryRequest, PaperFormat};

/// Card and sheet layout flags.
#[derive(Args, Debug, Clone)]
pub struct GeometryArgs {
    /// Paper format: LETTER, LETTER_ (landscape), DINA4, DINA4_ (landscape).
    #[arg(short = 'f', long = "format")]
    pub format: Option<String>,
    /// Draw cards with rounded corners.
    #[arg(short = 'r', long)]
    pub rounded: bool,
    /// Print one card per page, on a sheet the size of the card.
    #[arg(short = 'p', long = "oneperpage")]
    pub one_per_page: bool,
    #[command(flatten)]
    pub size: SizeArgs,
}

impl GeometryArgs {
    pub fn request(&self) -> GeometryRequest {
        GeometryRequest {
            card: self.size.card_size(),
            paper: self
                .format
                .as_deref()
                .map(PaperFormat::from_identifier)
                .unwrap_or(PaperFormat::DefaultLetter),
            corners: CornerSpec::Rounded(self.rounded),
            one_card_per_page: self.one_per_page,
        }
    }
}

/// Card size flags. When several are given the largest family wins.
#[derive(Args, Debug, Clone, Default)]
pub struct SizeArgs {
    /// Small 2"x2" cards (default).
    #[arg(short = 's', long)]
    pub small: bool,
    /// Medium 41mm x 63mm cards.
    #[arg(long)]
    pub medium1: bool,
    /// Medium 43mm x 65mm cards.
    #[arg(long)]
    pub medium2: bool,
    /// Medium 45mm x 68mm cards.
    #[arg(long)]
    pub medium3: bool,
    /// Large 2.5"x3.5" cards.
    #[arg(short = 'l', long)]
    pub large: bool,
    /// Card size by name.
    #[arg(
        long,
        value_enum,
        conflicts_with_all = ["small", "medium1", "medium2", "medium3", "large"]
    )]
    pub size: Option<SizeArg>,
}

impl SizeArgs {
    pub fn card_size(&self) -> CardSize {
        if let Some(size) = self.size {
            size.into()
        } else if self.large {
            CardSize::LARGE
        } else if self.medium1 {
            CardSize::MEDIUM1
        } else if self.medium2 {
            CardSize::MEDIUM2
        } else if self.medium3 {
            CardSize::MEDIUM3
        } else {
            CardSize::SMALL
        }
    }
}

/// Card sizes by name, for `--size`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeArg {
    Small,
    Medium1,
    Medium2,
    Medium3,
    Large,
}

impl From<SizeArg> for CardSize {
    fn from(value: SizeArg) -> CardSize {
        match value {
            SizeArg::Small => CardSize::SMALL,
            SizeArg::Medium1 => CardSize::MEDIUM1,
            SizeArg::Medium2 => CardSize::MEDIUM2,
            SizeArg::Medium3 => CardSize::MEDIUM3,
            SizeArg::Large => CardSize::LARGE,
        }
    }
}
