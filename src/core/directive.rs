//! `[[...]]` card directives: explicit pick counts and embedded images.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::markup::{sanitize, trim_blanks};
use crate::error::{CardError, CardResult};

/// How many answer cards a black card asks for. White cards are always `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum PickCount {
    None,
    One,
    Two,
    Three,
}

impl PickCount {
    fn from_explicit(value: &str) -> Self {
        match value {
            "2" => PickCount::Two,
            "3" => PickCount::Three,
            _ => PickCount::One,
        }
    }

    /// Count blank-fill markers (runs of two or more underscores).
    fn infer(text: &str) -> Self {
        // The sentinels guarantee every run is closed by a non-underscore.
        let padded = format!("a{text}a");
        let mut runs = 0usize;
        let mut run_len = 0usize;
        for ch in padded.chars() {
            if ch == '_' {
                run_len += 1;
                continue;
            }
            if run_len >= 2 {
                runs += 1;
            }
            run_len = 0;
        }
        match runs + 1 {
            3 => PickCount::Two,
            n if n >= 4 => PickCount::Three,
            _ => PickCount::One,
        }
    }
}

/// `[[img=FILE;W;H;DX;DY]]`: an image fitted into `width`×`height`, placed
/// relative to the bottom-right of the card's text box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageDirective {
    pub file: String,
    pub width: f32,
    pub height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl ImageDirective {
    fn parse(body: &str) -> CardResult<Self> {
        let mut fields = body.split(';');
        let file = fields.next().unwrap_or_default().trim().to_string();
        if file.is_empty() {
            return Err(invalid(body, "missing file name"));
        }
        let mut numbers = [0.0f32; 4];
        for (slot, field) in numbers.iter_mut().zip(fields) {
            let field = field.trim();
            if field.is_empty() {
                continue;
            }
            *slot = field
                .parse()
                .map_err(|_| invalid(body, &format!("'{field}' is not a number")))?;
        }
        let [width, height, offset_x, offset_y] = numbers;
        Ok(Self {
            file,
            width,
            height,
            offset_x,
            offset_y,
        })
    }

    /// Locate the image relative to the deck's source directory.
    pub fn resolve(&self, base: &Path) -> CardResult<PathBuf> {
        let path = base.join(&self.file);
        if path.is_file() {
            Ok(path)
        } else {
            Err(CardError::MissingImage(path))
        }
    }
}

fn invalid(body: &str, reason: &str) -> CardError {
    CardError::InvalidImageDirective {
        directive: body.to_string(),
        reason: reason.to_string(),
    }
}

/// A card line after directive extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardDirective {
    pub display_text: String,
    pub pick: PickCount,
    pub image: Option<ImageDirective>,
}

/// Extract directives from an already sanitized line.
pub fn parse_directives(sanitized: &str, is_black: bool) -> CardResult<CardDirective> {
    let mut rest = sanitized;

    let mut explicit_pick = None;
    if let Some((digits, after)) = bracketed(rest, |body| {
        !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit())
    }) {
        explicit_pick = Some(digits);
        rest = after;
    }

    let mut image = None;
    if let Some((body, after)) = bracketed(rest, |body| {
        body.strip_prefix("img=").is_some_and(|fields| !fields.is_empty())
    }) {
        image = Some(ImageDirective::parse(&body["img=".len()..])?);
        rest = after;
    }

    let display_text = trim_blanks(rest).to_string();
    let pick = if !is_black {
        PickCount::None
    } else {
        match explicit_pick {
            Some(value) => PickCount::from_explicit(value),
            None => PickCount::infer(&display_text),
        }
    };

    Ok(CardDirective {
        display_text,
        pick,
        image,
    })
}

/// Sanitize a raw card line and parse its directives.
///
/// Returns the sanitized line alongside the parsed card so callers can keep
/// both without the input being touched.
pub fn parse_card(raw: &str, is_black: bool) -> CardResult<(String, CardDirective)> {
    let sanitized = sanitize(raw);
    let directive = parse_directives(&sanitized, is_black)?;
    Ok((sanitized, directive))
}

/// Match `[[body]]` at the start of `s` when `accept(body)` holds.
/// The body never contains `]`.
fn bracketed(s: &str, accept: impl Fn(&str) -> bool) -> Option<(&str, &str)> {
    let inner = s.strip_prefix("[[")?;
    let end = inner.find(']')?;
    let (body, tail) = inner.split_at(end);
    let after = tail.strip_prefix("]]")?;
    accept(body).then_some((body, after))
}
