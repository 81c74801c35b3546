//! Lays a [`Deck`] out onto a [`Surface`], one sheet per page of cards.

use serde::Serialize;

use crate::core::{CardGeometry, CardSlot, PickCount, parse_card};
use crate::deck::{Deck, Icon};
use crate::error::CardResult;
use crate::render::surface::{Align, Color, Point, Rect, Surface, TextBox};

/// Inset of the printable box from the card's left, right and top edges.
const CARD_INSET: f32 = 10.0;
const LINE_WIDTH: f32 = 0.5;
const CROP_DASH: (f32, f32) = (3.0, 2.0);
const CROP_NEAR: f32 = 8.0;
const CROP_FAR: f32 = 100.0;
const LOGO_HEIGHT: f32 = 15.0;
const BADGE_RADIUS: f32 = 6.0;
/// Vertical distance between the pick badge and the draw badge above it.
const BADGE_STEP: f32 = 16.0;

/// What was printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderReport {
    pub white_cards: usize,
    pub black_cards: usize,
    pub pages: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    White,
    Black,
}

impl Side {
    fn is_black(self) -> bool {
        self == Side::Black
    }

    fn foreground(self) -> Color {
        match self {
            Side::White => Color::BLACK,
            Side::Black => Color::WHITE,
        }
    }

    fn background(self) -> Color {
        match self {
            Side::White => Color::WHITE,
            Side::Black => Color::BLACK,
        }
    }
}

/// The printable area of one grid cell, in sheet coordinates.
#[derive(Debug, Clone, Copy)]
struct CardBox {
    left: f32,
    top: f32,
    width: f32,
    height: f32,
}

impl CardBox {
    fn right(&self) -> f32 {
        self.left + self.width
    }

    fn bottom(&self) -> f32 {
        self.top - self.height
    }
}

/// Print every white page, then every black page, of `deck`.
///
/// Card numbers count each colour separately and continue across pages.
pub fn render_deck<S: Surface + ?Sized>(deck: &Deck, surface: &mut S) -> CardResult<RenderReport> {
    let mut renderer = DeckRenderer {
        deck,
        surface,
        white_number: 0,
        black_number: 0,
    };
    for (index, page) in deck.white_pages.iter().enumerate() {
        log::debug!("white page {} of {}", index + 1, deck.white_pages.len());
        renderer.page(page, Side::White)?;
    }
    for (index, page) in deck.black_pages.iter().enumerate() {
        log::debug!("black page {} of {}", index + 1, deck.black_pages.len());
        renderer.page(page, Side::Black)?;
    }
    Ok(RenderReport {
        white_cards: renderer.white_number,
        black_cards: renderer.black_number,
        pages: deck.page_count(),
    })
}

struct DeckRenderer<'a, S: ?Sized> {
    deck: &'a Deck,
    surface: &'a mut S,
    white_number: usize,
    black_number: usize,
}

impl<'a, S: Surface + ?Sized> DeckRenderer<'a, S> {
    fn geometry(&self) -> &'a CardGeometry {
        &self.deck.geometry
    }

    /// Sheet position of a point given relative to the card grid's bottom-left corner.
    fn grid_point(&self, x: f32, y: f32) -> Point {
        let g = self.geometry();
        Point::new(g.margin_left() + x, g.margin_top() + y)
    }

    fn card_box(&self, slot: CardSlot) -> CardBox {
        let g = self.geometry();
        let top_left = self.grid_point(
            g.card_width() * slot.column as f32 + CARD_INSET,
            g.card_height() * slot.row as f32 - CARD_INSET,
        );
        CardBox {
            left: top_left.x,
            top: top_left.y,
            width: g.card_width() - 2.0 * CARD_INSET,
            height: g.card_height() - CARD_INSET,
        }
    }

    fn page(&mut self, lines: &[String], side: Side) -> CardResult<()> {
        let g = self.geometry();
        let (paper_width, paper_height) = (g.paper_width(), g.paper_height());
        self.surface.begin_page(paper_width, paper_height)?;
        self.surface.set_line_width(LINE_WIDTH);
        if side.is_black() {
            self.surface.set_fill_color(Color::BLACK);
            self.surface
                .fill_rect(Rect::new(0.0, 0.0, paper_width, paper_height));
        }
        self.use_foreground(side);

        self.cut_grid();
        for (index, line) in lines.iter().enumerate() {
            self.card(index, line, side)?;
        }
        self.branding(side)
    }

    fn use_foreground(&mut self, side: Side) {
        self.surface.set_stroke_color(side.foreground());
        self.surface.set_fill_color(side.foreground());
    }

    fn cut_grid(&mut self) {
        let g = self.geometry();
        let (cw, ch) = (g.card_width(), g.card_height());

        for column in 0..g.cards_across() {
            for row in 0..g.cards_high() {
                let origin = self.grid_point(cw * column as f32, ch * row as f32);
                self.surface.stroke_rounded_rect(
                    Rect::new(origin.x, origin.y, cw, ch),
                    g.corner_radius(),
                );
            }
        }

        self.surface.set_dash(Some(CROP_DASH));
        for i in 0..=g.cards_across() {
            let x = cw * i as f32;
            self.crop_mark((x, -CROP_FAR), (x, -CROP_NEAR));
            let top = g.page_height();
            self.crop_mark((x, top + CROP_NEAR), (x, top + CROP_FAR));
        }
        for i in 0..=g.cards_high() {
            let y = ch * i as f32;
            self.crop_mark((-CROP_FAR, y), (-CROP_NEAR, y));
            let right = g.page_width();
            self.crop_mark((right + CROP_NEAR, y), (right + CROP_FAR, y));
        }
        self.surface.set_dash(None);
    }

    fn crop_mark(&mut self, from: (f32, f32), to: (f32, f32)) {
        let from = self.grid_point(from.0, from.1);
        let to = self.grid_point(to.0, to.1);
        self.surface.stroke_line(from, to);
    }

    fn next_number(&mut self, side: Side) -> usize {
        let counter = match side {
            Side::White => &mut self.white_number,
            Side::Black => &mut self.black_number,
        };
        *counter += 1;
        *counter
    }

    fn card(&mut self, index: usize, line: &str, side: Side) -> CardResult<()> {
        let bx = self.card_box(self.geometry().slot(index));
        let (_, directive) = parse_card(line, side.is_black())?;
        let number = self.next_number(side);

        if let Some(image) = &directive.image {
            let path = image.resolve(&self.deck.source_dir)?;
            self.surface.image(
                &path,
                (image.width, image.height),
                Point::new(bx.right() + image.offset_x, bx.bottom() + image.offset_y),
            )?;
        }

        let reserve = match directive.pick {
            PickCount::Three => 68.0,
            PickCount::Two => 55.0,
            PickCount::None | PickCount::One => 35.0,
        };
        let body = format!("<b>{}</b>", directive.display_text);
        let g = self.geometry();
        let deck = self.deck;
        self.surface.text_box(
            &body,
            &TextBox::new(
                Point::new(bx.left, bx.top),
                bx.width,
                g.card_height() - reserve,
                g.font_size(),
            )
            .shrink_to_fit()
            .inline_format(),
        )?;

        self.surface.text_box(
            &format!("#{number}"),
            &TextBox::new(Point::new(bx.right() - 25.0, bx.bottom() + 8.0), 30.0, 10.0, 6.0)
                .bold()
                .align(Align::Right)
                .rotate(15.0),
        )?;

        match directive.pick {
            PickCount::Two => self.badge(&bx, &deck.texts.pick, "2", Color::BLACK, 0.0, side)?,
            PickCount::Three => {
                // The digit is printed in red, as on the classic decks.
                self.badge(&bx, &deck.texts.pick, "3", Color::RED, 0.0, side)?;
                self.badge(&bx, &deck.texts.draw, "2", Color::BLACK, BADGE_STEP, side)?;
            }
            PickCount::None | PickCount::One => {}
        }
        Ok(())
    }

    /// Caption plus a digit in a disc, `lift` points above the bottom badge row.
    fn badge(
        &mut self,
        bx: &CardBox,
        caption: &str,
        digit: &str,
        digit_color: Color,
        lift: f32,
        side: Side,
    ) -> CardResult<()> {
        let (right, bottom) = (bx.right(), bx.bottom() + lift);
        self.surface.text_box(
            caption,
            &TextBox::new(Point::new(right - 55.0, bottom + 35.0), 35.0, 12.0, 9.0)
                .bold()
                .align(Align::Right)
                .shrink_to_fit(),
        )?;

        self.surface.set_fill_color(Color::WHITE);
        self.surface.set_stroke_color(Color::WHITE);
        self.surface
            .fill_circle(Point::new(right - 10.0, bottom + 32.0), BADGE_RADIUS);
        self.use_foreground(side);

        self.surface.text_box(
            digit,
            &TextBox::new(Point::new(right - 14.0, bottom + 36.0), 8.0, 12.0, 10.0)
                .bold()
                .align(Align::Center)
                .color(digit_color),
        )
    }

    /// Icon and deck name in every cell of the grid, filled or not.
    fn branding(&mut self, side: Side) -> CardResult<()> {
        let deck = self.deck;
        let icon = match side {
            Side::White => &deck.white_icon,
            Side::Black => &deck.black_icon,
        };
        let logo_width = self.geometry().card_width() / 2.0;

        for index in 0..self.geometry().capacity() {
            let bx = self.card_box(self.geometry().slot(index));
            let at = Point::new(bx.left, bx.bottom() + 25.0);
            match icon {
                Icon::File(path) => self.surface.image(path, (logo_width, LOGO_HEIGHT), at)?,
                Icon::Builtin => self.builtin_logo(at, side),
            }
            self.surface.text_box(
                &deck.name,
                &TextBox::new(Point::new(bx.left + 22.0, bx.bottom() + 18.0), 200.0, 10.0, 6.0)
                    .bold(),
            )?;
        }
        Ok(())
    }

    /// Three fanned card outlines inside a 15pt square.
    fn builtin_logo(&mut self, top_left: Point, side: Side) {
        const CARD: (f32, f32) = (7.0, 10.0);
        const STEP: (f32, f32) = (3.0, 2.5);
        for i in 0..3 {
            let offset = i as f32;
            let rect = Rect::new(
                top_left.x + STEP.0 * offset,
                top_left.y - LOGO_HEIGHT + STEP.1 * (2.0 - offset),
                CARD.0,
                CARD.1,
            );
            self.surface.set_fill_color(side.background());
            self.surface.fill_rect(rect);
            self.surface.stroke_rounded_rect(rect, 1.0);
        }
        self.use_foreground(side);
    }
}
