//! Line breaking for text boxes with inline formatting.

use crate::core::markup::{Span, Tag, decode_entities, tokenize};
use crate::render::metrics::{ASCENDER, FontFace, LINE_HEIGHT, text_width};
use crate::render::surface::{Align, Color};

const MIN_FONT_SIZE: f32 = 5.0;
const SHRINK_STEP: f32 = 0.5;
const SCRIPT_SCALE: f32 = 0.583;
const SCRIPT_RISE: f32 = 0.33;
const TAB_AS_SPACES: &str = "    ";

/// Resolved style of a run of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStyle {
    pub face: FontFace,
    pub size: f32,
    /// Baseline shift, positive for superscript.
    pub rise: f32,
    pub color: Option<Color>,
    pub underline: bool,
    pub strike: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub style: RunStyle,
    /// Offset from the line start.
    pub x: f32,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub runs: Vec<Run>,
    /// Offset of the line start from the box's left edge, after alignment.
    pub offset: f32,
    pub width: f32,
    pub ascent: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub lines: Vec<Line>,
    /// Base font size after shrinking.
    pub size: f32,
}

impl TextLayout {
    pub fn height(&self) -> f32 {
        self.lines.iter().map(|l| l.height).sum()
    }
}

/// Parameters for [`layout`].
#[derive(Debug, Clone, Copy)]
pub struct LayoutRequest {
    pub width: f32,
    pub height: f32,
    pub size: f32,
    pub bold: bool,
    pub align: Align,
    pub shrink_to_fit: bool,
    pub inline_format: bool,
}

/// Lay `text` out into lines that fit the box width.
///
/// With `shrink_to_fit` the font size is reduced until the text fits the box
/// height (never below 5pt); otherwise lines that do not fit are dropped.
pub fn layout(text: &str, request: &LayoutRequest) -> TextLayout {
    let mut size = request.size;
    loop {
        let lines = wrap(&units(text, request, size), request.width, size);
        let height: f32 = lines.iter().map(|l| l.height).sum();
        let can_shrink = request.shrink_to_fit && size - SHRINK_STEP >= MIN_FONT_SIZE;
        if height <= request.height + f32::EPSILON || !can_shrink {
            let lines = if request.shrink_to_fit {
                lines
            } else {
                truncate(lines, request.height)
            };
            return TextLayout {
                lines: align(lines, request.width, request.align),
                size,
            };
        }
        size -= SHRINK_STEP;
    }
}

fn truncate(lines: Vec<Line>, height: f32) -> Vec<Line> {
    let mut used = 0.0;
    lines
        .into_iter()
        .take_while(|line| {
            used += line.height;
            used <= height + 0.01
        })
        .collect()
}

fn align(mut lines: Vec<Line>, width: f32, align: Align) -> Vec<Line> {
    for line in &mut lines {
        line.offset = match align {
            Align::Left => 0.0,
            Align::Center => (width - line.width) / 2.0,
            Align::Right => width - line.width,
        };
    }
    lines
}

#[derive(Debug, Clone)]
struct Fragment {
    text: String,
    style: RunStyle,
}

impl Fragment {
    fn width(&self) -> f32 {
        text_width(self.style.face, &self.text, self.style.size)
    }

    fn trailing_space_width(&self) -> f32 {
        let trimmed = self.text.trim_end_matches(' ');
        text_width(self.style.face, &self.text[trimmed.len()..], self.style.size)
    }
}

/// Breakable units: fragments that must stay on one line, or a forced break.
#[derive(Debug)]
enum Unit {
    Word(Vec<Fragment>),
    Newline,
}

#[derive(Debug, Default)]
struct StyleState {
    bold: usize,
    italic: usize,
    underline: usize,
    strike: usize,
    sub: usize,
    sup: usize,
    sizes: Vec<Option<f32>>,
    colors: Vec<Option<Color>>,
}

impl StyleState {
    fn apply(&mut self, span: &Span<'_>) {
        match span {
            Span::Open { tag, attrs } => match tag {
                Tag::Bold => self.bold += 1,
                Tag::Italic => self.italic += 1,
                Tag::Underline => self.underline += 1,
                Tag::Strikethrough => self.strike += 1,
                Tag::Subscript => self.sub += 1,
                Tag::Superscript => self.sup += 1,
                Tag::Font => {
                    let size = attribute(attrs, "size").and_then(|v| v.parse().ok());
                    let inherited = self.sizes.last().copied().flatten();
                    self.sizes.push(size.or(inherited));
                }
                Tag::Color => {
                    let color = attribute(attrs, "rgb").and_then(Color::from_hex);
                    let inherited = self.colors.last().copied().flatten();
                    self.colors.push(color.or(inherited));
                }
            },
            Span::Close(tag) => match tag {
                Tag::Bold => self.bold = self.bold.saturating_sub(1),
                Tag::Italic => self.italic = self.italic.saturating_sub(1),
                Tag::Underline => self.underline = self.underline.saturating_sub(1),
                Tag::Strikethrough => self.strike = self.strike.saturating_sub(1),
                Tag::Subscript => self.sub = self.sub.saturating_sub(1),
                Tag::Superscript => self.sup = self.sup.saturating_sub(1),
                Tag::Font => {
                    self.sizes.pop();
                }
                Tag::Color => {
                    self.colors.pop();
                }
            },
            Span::Text(_) | Span::Break => {}
        }
    }

    fn style(&self, base_size: f32, scale: f32, bold_default: bool) -> RunStyle {
        let size = match self.sizes.last().copied().flatten() {
            Some(explicit) => explicit * scale,
            None => base_size,
        };
        let (size, rise) = if self.sup > 0 {
            (size * SCRIPT_SCALE, size * SCRIPT_RISE)
        } else if self.sub > 0 {
            (size * SCRIPT_SCALE, -size * SCRIPT_RISE)
        } else {
            (size, 0.0)
        };
        RunStyle {
            face: FontFace::select(bold_default || self.bold > 0, self.italic > 0),
            size,
            rise,
            color: self.colors.last().copied().flatten(),
            underline: self.underline > 0,
            strike: self.strike > 0,
        }
    }
}

/// Value of `name=` in a tag's attribute string, with optional quotes.
fn attribute<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    let mut rest = attrs;
    while let Some(pos) = rest.find(name) {
        let after = &rest[pos + name.len()..];
        let preceded_ok = pos == 0 || rest[..pos].ends_with(char::is_whitespace);
        if let (true, Some(value)) = (preceded_ok, after.trim_start().strip_prefix('=')) {
            let value = value.trim_start();
            return Some(match value.chars().next() {
                Some(q @ ('"' | '\'')) => value[1..].split(q).next().unwrap_or_default(),
                _ => value.split(char::is_whitespace).next().unwrap_or_default(),
            });
        }
        rest = after;
    }
    None
}

fn units(text: &str, request: &LayoutRequest, size: f32) -> Vec<Unit> {
    let scale = size / request.size;
    let mut units = Vec::new();
    let mut open = false;
    let mut state = StyleState::default();

    let spans = if request.inline_format {
        tokenize(text)
    } else {
        vec![Span::Text(text)]
    };

    for span in &spans {
        let raw = match span {
            Span::Text(raw) => raw,
            Span::Break => {
                units.push(Unit::Newline);
                open = false;
                continue;
            }
            other => {
                state.apply(other);
                continue;
            }
        };
        let decoded = if request.inline_format {
            decode_entities(raw)
        } else {
            (*raw).into()
        };
        let style = state.style(size, scale, request.bold);
        for (idx, part) in decoded.split('\n').enumerate() {
            if idx > 0 {
                units.push(Unit::Newline);
                open = false;
            }
            let part = part.replace('\t', TAB_AS_SPACES);
            for word in part.split_inclusive(' ') {
                let fragment = Fragment {
                    text: word.to_string(),
                    style,
                };
                match units.last_mut() {
                    Some(Unit::Word(fragments)) if open => fragments.push(fragment),
                    _ => units.push(Unit::Word(vec![fragment])),
                }
                open = !word.ends_with(' ');
            }
        }
    }
    units
}

struct LineBuilder {
    lines: Vec<Line>,
    runs: Vec<Run>,
    width: f32,
    base_size: f32,
}

impl LineBuilder {
    fn push(&mut self, fragment: Fragment) {
        let width = fragment.width();
        match self.runs.last_mut() {
            Some(run) if run.style == fragment.style => {
                run.text.push_str(&fragment.text);
                run.width += width;
            }
            _ => self.runs.push(Run {
                text: fragment.text,
                style: fragment.style,
                x: self.width,
                width,
            }),
        }
        self.width += width;
    }

    fn finish_line(&mut self) {
        let mut runs = std::mem::take(&mut self.runs);
        if let Some(last) = runs.last_mut() {
            let trimmed_len = last.text.trim_end_matches(' ').len();
            let trailing = text_width(last.style.face, &last.text[trimmed_len..], last.style.size);
            last.text.truncate(trimmed_len);
            last.width -= trailing;
            self.width -= trailing;
        }
        runs.retain(|r| !r.text.is_empty());
        let tallest = runs
            .iter()
            .map(|r| r.style.size + r.style.rise.max(0.0))
            .fold(self.base_size, f32::max);
        self.lines.push(Line {
            runs,
            offset: 0.0,
            width: self.width,
            ascent: tallest * ASCENDER,
            height: tallest * LINE_HEIGHT,
        });
        self.width = 0.0;
    }
}

fn wrap(units: &[Unit], max_width: f32, base_size: f32) -> Vec<Line> {
    let mut builder = LineBuilder {
        lines: Vec::new(),
        runs: Vec::new(),
        width: 0.0,
        base_size,
    };

    for unit in units {
        let fragments = match unit {
            Unit::Newline => {
                builder.finish_line();
                continue;
            }
            Unit::Word(fragments) => fragments,
        };
        let total: f32 = fragments.iter().map(Fragment::width).sum();
        let trailing = fragments.last().map_or(0.0, Fragment::trailing_space_width);
        let visible = total - trailing;

        if !builder.runs.is_empty() && builder.width + visible > max_width {
            builder.finish_line();
        }
        if visible <= max_width {
            for fragment in fragments {
                builder.push(fragment.clone());
            }
            continue;
        }
        // A single word wider than the box is broken between characters.
        for fragment in fragments {
            for ch in fragment.text.chars() {
                let piece = Fragment {
                    text: ch.to_string(),
                    style: fragment.style,
                };
                let w = piece.width();
                if !builder.runs.is_empty() && ch != ' ' && builder.width + w > max_width {
                    builder.finish_line();
                }
                builder.push(piece);
            }
        }
    }
    if !builder.runs.is_empty() || builder.lines.is_empty() {
        builder.finish_line();
    }
    builder.lines
}
