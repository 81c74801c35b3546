#![allow(dead_code)]

use std::path::{Path, PathBuf};

use bbcards::render::{Color, Point, Rect, Surface, TextBox};
use bbcards::{
    CardGeometry, CardLists, CardResult, Deck, DeckOptions, GeometryRequest, LayoutConstants,
    RenderReport, render_deck,
};
use lopdf::Document as LopdfDocument;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// One drawing call, as issued by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    BeginPage { width: f32, height: f32 },
    StrokeColor(Color),
    FillColor(Color),
    LineWidth(f32),
    Dash(Option<(f32, f32)>),
    FillRect(Rect),
    RoundedRect { rect: Rect, radius: f32 },
    Line { from: Point, to: Point },
    Circle { center: Point, radius: f32 },
    Text { text: String, spec: TextBox },
    Image { path: PathBuf, fit: (f32, f32), top_left: Point },
}

/// A [`Surface`] that remembers every call instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<Call>,
}

impl RecordingSurface {
    /// Calls grouped per page; anything before the first page is dropped.
    pub fn pages(&self) -> Vec<&[Call]> {
        let starts: Vec<usize> = self
            .calls
            .iter()
            .enumerate()
            .filter(|(_, call)| matches!(call, Call::BeginPage { .. }))
            .map(|(i, _)| i)
            .collect();
        starts
            .iter()
            .enumerate()
            .map(|(n, &start)| {
                let end = starts.get(n + 1).copied().unwrap_or(self.calls.len());
                &self.calls[start..end]
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn begin_page(&mut self, width: f32, height: f32) -> CardResult<()> {
        self.calls.push(Call::BeginPage { width, height });
        Ok(())
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.calls.push(Call::StrokeColor(color));
    }

    fn set_fill_color(&mut self, color: Color) {
        self.calls.push(Call::FillColor(color));
    }

    fn set_line_width(&mut self, width: f32) {
        self.calls.push(Call::LineWidth(width));
    }

    fn set_dash(&mut self, dash: Option<(f32, f32)>) {
        self.calls.push(Call::Dash(dash));
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.calls.push(Call::FillRect(rect));
    }

    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32) {
        self.calls.push(Call::RoundedRect { rect, radius });
    }

    fn stroke_line(&mut self, from: Point, to: Point) {
        self.calls.push(Call::Line { from, to });
    }

    fn fill_circle(&mut self, center: Point, radius: f32) {
        self.calls.push(Call::Circle { center, radius });
    }

    fn text_box(&mut self, text: &str, spec: &TextBox) -> CardResult<()> {
        self.calls.push(Call::Text {
            text: text.to_string(),
            spec: spec.clone(),
        });
        Ok(())
    }

    fn image(&mut self, path: &Path, fit: (f32, f32), top_left: Point) -> CardResult<()> {
        self.calls.push(Call::Image {
            path: path.to_path_buf(),
            fit,
            top_left,
        });
        Ok(())
    }
}

/// Texts drawn in `calls`, in order.
pub fn texts(calls: &[Call]) -> Vec<&str> {
    calls
        .iter()
        .filter_map(|call| match call {
            Call::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

/// Card numbers (`#N`) drawn in `calls`.
pub fn card_numbers(calls: &[Call]) -> Vec<usize> {
    texts(calls)
        .into_iter()
        .filter_map(|text| text.strip_prefix('#')?.parse().ok())
        .collect()
}

pub fn text_spec<'a>(calls: &'a [Call], wanted: &str) -> Option<&'a TextBox> {
    calls.iter().find_map(|call| match call {
        Call::Text { text, spec } if text == wanted => Some(spec),
        _ => None,
    })
}

/// Small cards on letter paper: a 4 x 5 grid.
pub fn default_options() -> DeckOptions {
    let geometry =
        CardGeometry::compute(&GeometryRequest::default(), &LayoutConstants::default())
            .expect("default geometry");
    DeckOptions::new(geometry)
}

pub fn numbered(prefix: &str, n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("{prefix} {i}")).collect()
}

pub fn record(deck: &Deck) -> CardResult<(RecordingSurface, RenderReport)> {
    let mut surface = RecordingSurface::default();
    let report = render_deck(deck, &mut surface)?;
    Ok((surface, report))
}

pub fn deck_of(white: Vec<String>, black: Vec<String>) -> CardResult<Deck> {
    Deck::build(&CardLists { white, black }, &default_options())
}

pub fn load_pdf(path: &Path) -> Result<LopdfDocument, Box<dyn std::error::Error>> {
    Ok(LopdfDocument::load(path)?)
}

/// A string entry of the PDF information dictionary.
pub fn info_entry(doc: &LopdfDocument, key: &[u8]) -> Option<Vec<u8>> {
    let id = doc.trailer.get(b"Info").ok()?.as_reference().ok()?;
    let info = doc.get_object(id).ok()?.as_dict().ok()?;
    match info.get(key).ok()? {
        lopdf::Object::String(bytes, _) => Some(bytes.clone()),
        _ => None,
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
