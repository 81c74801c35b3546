//! [`Surface`] backed by an in-memory `lopdf` document.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};

use crate::error::CardResult;
use crate::render::image::{self, DecodedImage};
use crate::render::metrics::FontFace;
use crate::render::surface::{Color, Point, Rect, Surface, TextBox};
use crate::render::text::{self, LayoutRequest};

pub const PRODUCER: &str = "Bigger, Blacker Cards";

/// Bézier control point distance for quarter circles.
const KAPPA: f32 = 0.552_284_8;

/// Metadata written to the document information dictionary.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    pub created: DateTime<Utc>,
}

impl DocumentInfo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            created: Utc::now(),
        }
    }
}

struct EmbeddedImage {
    name: String,
    width: u32,
    height: u32,
}

struct OpenPage {
    width: f32,
    height: f32,
    operations: Vec<Operation>,
}

/// Accumulates pages in memory and writes them out in one go with [`PdfSurface::finish`].
pub struct PdfSurface {
    document: Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    page_ids: Vec<ObjectId>,
    page: Option<OpenPage>,
    xobjects: Dictionary,
    images: HashMap<PathBuf, EmbeddedImage>,
}

impl Default for PdfSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfSurface {
    pub fn new() -> Self {
        let mut document = Document::with_version("1.4");
        let pages_id = document.new_object_id();
        let resources_id = document.new_object_id();
        Self {
            document,
            pages_id,
            resources_id,
            page_ids: Vec::new(),
            page: None,
            xobjects: Dictionary::new(),
            images: HashMap::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len() + usize::from(self.page.is_some())
    }

    /// Close the last page, assemble the document and write it to `writer`.
    pub fn finish<W: Write>(mut self, info: &DocumentInfo, writer: &mut W) -> CardResult<()> {
        self.close_page()?;

        let mut fonts = Dictionary::new();
        for face in FontFace::ALL {
            let font_id = self.document.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => face.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(face.resource_name(), font_id);
        }
        let mut resources = dictionary! { "Font" => fonts };
        if !self.xobjects.is_empty() {
            resources.set(
                "XObject",
                std::mem::replace(&mut self.xobjects, Dictionary::new()),
            );
        }
        self.document
            .objects
            .insert(self.resources_id, Object::Dictionary(resources));

        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::from(*id)).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.document
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.document.trailer.set("Root", catalog_id);

        let info_id = self.document.add_object(dictionary! {
            "Title" => Object::String(win_ansi(&info.title), StringFormat::Literal),
            "Producer" => Object::string_literal(PRODUCER),
            "Creator" => Object::string_literal(PRODUCER),
            "CreationDate" => Object::string_literal(pdf_date(&info.created)),
        });
        self.document.trailer.set("Info", info_id);

        self.document.compress();
        self.document.save_to(writer)?;
        Ok(())
    }

    fn close_page(&mut self) -> CardResult<()> {
        let Some(page) = self.page.take() else {
            return Ok(());
        };
        let content = Content {
            operations: page.operations,
        };
        let content_id = self
            .document
            .add_object(Stream::new(Dictionary::new(), content.encode()?));
        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), page.width.into(), page.height.into()],
            "Contents" => content_id,
            "Resources" => self.resources_id,
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    /// Operations issued before the first page have nowhere to go and are dropped.
    fn emit(&mut self, operator: &str, operands: Vec<Object>) {
        if let Some(page) = self.page.as_mut() {
            page.operations.push(Operation::new(operator, operands));
        }
    }

    fn emit_xy(&mut self, operator: &str, points: &[(f32, f32)]) {
        let operands = points
            .iter()
            .flat_map(|&(x, y)| [Object::from(x), Object::from(y)])
            .collect();
        self.emit(operator, operands);
    }

    fn embed(&mut self, path: &Path) -> CardResult<(String, u32, u32)> {
        if let Some(found) = self.images.get(path) {
            return Ok((found.name.clone(), found.width, found.height));
        }

        let DecodedImage {
            width,
            height,
            rgb,
            alpha,
        } = image::decode(path)?;
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        };
        if let Some(alpha) = alpha {
            let mask_id = self.document.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => i64::from(width),
                    "Height" => i64::from(height),
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                },
                alpha,
            ));
            dict.set("SMask", mask_id);
        }
        let image_id = self.document.add_object(Stream::new(dict, rgb));

        let name = format!("Im{}", self.images.len() + 1);
        self.xobjects.set(name.as_str(), image_id);
        log::debug!("embedded {} as /{name} ({width}x{height})", path.display());
        self.images.insert(
            path.to_path_buf(),
            EmbeddedImage {
                name: name.clone(),
                width,
                height,
            },
        );
        Ok((name, width, height))
    }
}

impl Surface for PdfSurface {
    fn begin_page(&mut self, width: f32, height: f32) -> CardResult<()> {
        self.close_page()?;
        self.page = Some(OpenPage {
            width,
            height,
            operations: Vec::new(),
        });
        Ok(())
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.emit("RG", rgb_operands(color));
    }

    fn set_fill_color(&mut self, color: Color) {
        self.emit("rg", rgb_operands(color));
    }

    fn set_line_width(&mut self, width: f32) {
        self.emit("w", vec![width.into()]);
    }

    fn set_dash(&mut self, dash: Option<(f32, f32)>) {
        let pattern = match dash {
            Some((on, off)) => vec![on.into(), off.into()],
            None => Vec::new(),
        };
        self.emit("d", vec![Object::Array(pattern), 0.into()]);
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.emit(
            "re",
            vec![
                rect.origin.x.into(),
                rect.origin.y.into(),
                rect.width.into(),
                rect.height.into(),
            ],
        );
        self.emit("f", vec![]);
    }

    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32) {
        let r = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
        let (x0, y0) = (rect.origin.x, rect.origin.y);
        let (x1, y1) = (x0 + rect.width, y0 + rect.height);
        if r == 0.0 {
            self.emit(
                "re",
                vec![x0.into(), y0.into(), rect.width.into(), rect.height.into()],
            );
            self.emit("S", vec![]);
            return;
        }
        let k = r * KAPPA;
        self.emit_xy("m", &[(x0 + r, y0)]);
        self.emit_xy("l", &[(x1 - r, y0)]);
        self.emit_xy("c", &[(x1 - r + k, y0), (x1, y0 + r - k), (x1, y0 + r)]);
        self.emit_xy("l", &[(x1, y1 - r)]);
        self.emit_xy("c", &[(x1, y1 - r + k), (x1 - r + k, y1), (x1 - r, y1)]);
        self.emit_xy("l", &[(x0 + r, y1)]);
        self.emit_xy("c", &[(x0 + r - k, y1), (x0, y1 - r + k), (x0, y1 - r)]);
        self.emit_xy("l", &[(x0, y0 + r)]);
        self.emit_xy("c", &[(x0, y0 + r - k), (x0 + r - k, y0), (x0 + r, y0)]);
        self.emit("h", vec![]);
        self.emit("S", vec![]);
    }

    fn stroke_line(&mut self, from: Point, to: Point) {
        self.emit_xy("m", &[(from.x, from.y)]);
        self.emit_xy("l", &[(to.x, to.y)]);
        self.emit("S", vec![]);
    }

    fn fill_circle(&mut self, center: Point, radius: f32) {
        let (cx, cy, r) = (center.x, center.y, radius);
        let k = r * KAPPA;
        self.emit_xy("m", &[(cx + r, cy)]);
        self.emit_xy("c", &[(cx + r, cy + k), (cx + k, cy + r), (cx, cy + r)]);
        self.emit_xy("c", &[(cx - k, cy + r), (cx - r, cy + k), (cx - r, cy)]);
        self.emit_xy("c", &[(cx - r, cy - k), (cx - k, cy - r), (cx, cy - r)]);
        self.emit_xy("c", &[(cx + k, cy - r), (cx + r, cy - k), (cx + r, cy)]);
        self.emit("f", vec![]);
    }

    fn text_box(&mut self, text: &str, spec: &TextBox) -> CardResult<()> {
        let laid_out = text::layout(
            text,
            &LayoutRequest {
                width: spec.width,
                height: spec.height,
                size: spec.size,
                bold: spec.bold,
                align: spec.align,
                shrink_to_fit: spec.shrink_to_fit,
                inline_format: spec.inline_format,
            },
        );

        self.emit("q", vec![]);
        if let Some(color) = spec.color {
            self.set_fill_color(color);
        }
        if spec.rotate != 0.0 {
            let (sin, cos) = spec.rotate.to_radians().sin_cos();
            let cx = spec.at.x + spec.width / 2.0;
            let cy = spec.at.y - spec.height / 2.0;
            self.emit(
                "cm",
                vec![
                    cos.into(),
                    sin.into(),
                    (-sin).into(),
                    cos.into(),
                    (cx - cos * cx + sin * cy).into(),
                    (cy - sin * cx - cos * cy).into(),
                ],
            );
        }

        let mut top = spec.at.y;
        for line in &laid_out.lines {
            let baseline = top - line.ascent;
            for run in &line.runs {
                let style = &run.style;
                let x = spec.at.x + line.offset + run.x;
                let y = baseline + style.rise;
                if let Some(color) = style.color {
                    self.emit("q", vec![]);
                    self.set_fill_color(color);
                }
                self.emit("BT", vec![]);
                self.emit(
                    "Tf",
                    vec![
                        Object::Name(style.face.resource_name().as_bytes().to_vec()),
                        style.size.into(),
                    ],
                );
                self.emit_xy("Td", &[(x, y)]);
                self.emit(
                    "Tj",
                    vec![Object::String(win_ansi(&run.text), StringFormat::Literal)],
                );
                self.emit("ET", vec![]);

                let thickness = style.size * 0.05;
                if style.underline {
                    self.fill_rect(Rect::new(x, y - style.size * 0.12, run.width, thickness));
                }
                if style.strike {
                    self.fill_rect(Rect::new(x, y + style.size * 0.28, run.width, thickness));
                }
                if style.color.is_some() {
                    self.emit("Q", vec![]);
                }
            }
            top -= line.height;
        }
        self.emit("Q", vec![]);
        Ok(())
    }

    fn image(&mut self, path: &Path, fit: (f32, f32), top_left: Point) -> CardResult<()> {
        let (name, width, height) = self.embed(path)?;
        let (w, h) = image::fit_size(width, height, fit);
        self.emit("q", vec![]);
        self.emit(
            "cm",
            vec![
                w.into(),
                0.into(),
                0.into(),
                h.into(),
                top_left.x.into(),
                (top_left.y - h).into(),
            ],
        );
        self.emit("Do", vec![Object::Name(name.into_bytes())]);
        self.emit("Q", vec![]);
        Ok(())
    }
}

fn rgb_operands(color: Color) -> Vec<Object> {
    color.components().into_iter().map(Object::from).collect()
}

fn pdf_date(at: &DateTime<Utc>) -> String {
    at.format("D:%Y%m%d%H%M%SZ").to_string()
}

/// Encode `text` for a WinAnsiEncoding font; unmappable characters become `?`.
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '\u{20ac}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2122}' => 0x99,
            c if (c as u32) < 0x80 || (0xa0..=0xff).contains(&(c as u32)) => c as u8,
            _ => b'?',
        })
        .collect()
}
