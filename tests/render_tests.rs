mod common;

use bbcards::render::{Align, Color, Point, Rect};
use bbcards::{CardError, CardTexts, Icon, render_pdf};
use common::{
    Call, TestResult, card_numbers, deck_of, default_options, init_logging, numbered, record,
    text_spec, texts,
};
use pretty_assertions::assert_eq;

#[test]
fn numbers_restart_per_colour_and_continue_across_pages() -> TestResult {
    init_logging();
    let deck = deck_of(numbered("white", 25), numbered("black", 3))?;
    let (surface, report) = record(&deck)?;

    assert_eq!(report.white_cards, 25);
    assert_eq!(report.black_cards, 3);
    assert_eq!(report.pages, 3);

    let pages = surface.pages();
    assert_eq!(pages.len(), 3);
    assert_eq!(card_numbers(pages[0]), (1..=20).collect::<Vec<_>>());
    assert_eq!(card_numbers(pages[1]), (21..=25).collect::<Vec<_>>());
    assert_eq!(card_numbers(pages[2]), vec![1, 2, 3]);
    Ok(())
}

#[test]
fn card_text_is_bold_and_placed_in_the_inset_box() -> TestResult {
    let deck = deck_of(vec!["Hello".into()], vec![])?;
    let (surface, _) = record(&deck)?;
    let calls = &surface.calls;

    // Small cards on letter: 18pt side margins, 36pt top/bottom margins.
    let body = text_spec(calls, "<b>Hello</b>").ok_or("card text not drawn")?;
    assert_eq!(body.at, Point::new(28.0, 746.0));
    assert_eq!(body.width, 124.0);
    assert_eq!(body.height, 144.0 - 35.0);
    assert_eq!(body.size, 14.0);
    assert!(body.shrink_to_fit && body.inline_format);

    let number = text_spec(calls, "#1").ok_or("card number not drawn")?;
    assert_eq!(number.at, Point::new(127.0, 620.0));
    assert_eq!((number.width, number.size, number.rotate), (30.0, 6.0, 15.0));
    assert_eq!(number.align, Align::Right);
    assert!(number.bold);
    Ok(())
}

#[test]
fn two_blanks_make_a_pick_two_card() -> TestResult {
    let deck = deck_of(vec![], vec!["Why did the ___ cross the ___?".into()])?;
    let (surface, report) = record(&deck)?;
    assert_eq!(report.black_cards, 1);
    let calls = &surface.calls;

    let body = text_spec(calls, "<b>Why did the ___ cross the ___?</b>").ok_or("no body")?;
    assert_eq!(body.height, 144.0 - 55.0);

    let caption = text_spec(calls, "PICK").ok_or("no pick caption")?;
    assert_eq!(caption.at, Point::new(97.0, 647.0));
    assert_eq!((caption.width, caption.size), (35.0, 9.0));

    let digit = text_spec(calls, "2").ok_or("no pick digit")?;
    assert_eq!(digit.at, Point::new(138.0, 648.0));
    assert_eq!(digit.color, Some(Color::BLACK));
    assert_eq!(digit.align, Align::Center);

    assert!(calls.contains(&Call::Circle {
        center: Point::new(142.0, 644.0),
        radius: 6.0
    }));
    assert!(!texts(calls).contains(&"DRAW"));
    Ok(())
}

#[test]
fn pick_three_stacks_draw_badge_with_localized_captions() -> TestResult {
    let mut options = default_options();
    options.texts = CardTexts::for_language("es");
    let cards = bbcards::CardLists {
        white: vec![],
        black: vec!["[[3]]Haiku: ___".into()],
    };
    let deck = bbcards::Deck::build(&cards, &options)?;
    let (surface, _) = record(&deck)?;
    let calls = &surface.calls;

    let body = text_spec(calls, "<b>Haiku: ___</b>").ok_or("no body")?;
    assert_eq!(body.height, 144.0 - 68.0);

    let three = text_spec(calls, "3").ok_or("no 3")?;
    assert_eq!(three.color, Some(Color::RED));
    assert_eq!(text_spec(calls, "ELIGE").map(|s| s.at), Some(Point::new(97.0, 647.0)));
    assert_eq!(text_spec(calls, "COGE").map(|s| s.at), Some(Point::new(97.0, 663.0)));
    let two = text_spec(calls, "2").ok_or("no 2")?;
    assert_eq!(two.at, Point::new(138.0, 664.0));

    let circles = calls
        .iter()
        .filter(|call| matches!(call, Call::Circle { .. }))
        .count();
    assert_eq!(circles, 2);
    Ok(())
}

#[test]
fn black_pages_are_filled_and_drawn_in_white() -> TestResult {
    let deck = deck_of(vec![], vec!["A black card.".into()])?;
    let (surface, _) = record(&deck)?;
    let page = surface.pages()[0];

    assert_eq!(
        &page[..6],
        &[
            Call::BeginPage {
                width: 612.0,
                height: 792.0
            },
            Call::LineWidth(0.5),
            Call::FillColor(Color::BLACK),
            Call::FillRect(Rect::new(0.0, 0.0, 612.0, 792.0)),
            Call::StrokeColor(Color::WHITE),
            Call::FillColor(Color::WHITE),
        ]
    );
    Ok(())
}

#[test]
fn every_cell_gets_a_frame_crop_marks_and_branding() -> TestResult {
    let deck = deck_of(vec!["only one".into()], vec![])?;
    let (surface, _) = record(&deck)?;
    let calls = &surface.calls;

    let frames = calls
        .iter()
        .filter(|call| matches!(call, Call::RoundedRect { radius, .. } if *radius == 0.0))
        .count();
    assert_eq!(frames, 20);

    // 5 vertical and 6 horizontal grid lines, two marks each.
    let lines = calls
        .iter()
        .filter(|call| matches!(call, Call::Line { .. }))
        .count();
    assert_eq!(lines, 2 * 5 + 2 * 6);
    assert!(calls.contains(&Call::Dash(Some((3.0, 2.0)))));
    assert!(calls.contains(&Call::Dash(None)));
    assert!(calls.contains(&Call::Line {
        from: Point::new(18.0, -64.0),
        to: Point::new(18.0, 28.0),
    }));

    let names = texts(calls)
        .into_iter()
        .filter(|text| *text == "Cards Against Humanity")
        .count();
    assert_eq!(names, 20);
    let name = text_spec(calls, "Cards Against Humanity").ok_or("no deck name")?;
    assert_eq!((name.width, name.size), (200.0, 6.0));
    Ok(())
}

#[test]
fn icon_files_are_stamped_in_every_cell() -> TestResult {
    let dir = tempfile::tempdir()?;
    let icon = dir.path().join("icon.png");
    std::fs::write(&icon, b"stand-in")?;

    let deck = deck_of(vec!["card".into()], vec![])?
        .with_icons(Icon::File(icon.clone()), Icon::Builtin);
    let (surface, _) = record(&deck)?;
    let images: Vec<&Call> = surface
        .calls
        .iter()
        .filter(|call| matches!(call, Call::Image { .. }))
        .collect();
    assert_eq!(images.len(), 20);
    assert_eq!(
        images[0],
        &Call::Image {
            path: icon,
            fit: (72.0, 15.0),
            top_left: Point::new(28.0, 637.0),
        }
    );
    Ok(())
}

#[test]
fn image_directives_resolve_against_the_source_directory() -> TestResult {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("cat.png"), b"stand-in")?;

    let deck = deck_of(vec!["[[img=cat.png;40;30;-50;60]]A cat".into()], vec![])?
        .with_source_dir(dir.path());
    let (surface, _) = record(&deck)?;
    let image = surface
        .calls
        .iter()
        .find(|call| matches!(call, Call::Image { .. }))
        .ok_or("image not drawn")?;
    assert_eq!(
        image,
        &Call::Image {
            path: dir.path().join("cat.png"),
            fit: (40.0, 30.0),
            top_left: Point::new(102.0, 672.0),
        }
    );
    assert!(text_spec(&surface.calls, "<b>A cat</b>").is_some());
    Ok(())
}

#[test]
fn missing_card_images_abort_the_deck() -> TestResult {
    let dir = tempfile::tempdir()?;
    let deck = deck_of(vec!["[[img=nope.png;10;10;0;0]]x".into()], vec![])?
        .with_source_dir(dir.path());
    let result = record(&deck);
    assert!(matches!(result, Err(CardError::MissingImage(_))));
    Ok(())
}

#[test]
fn pdf_output_has_one_page_per_grid_page_and_a_title() -> TestResult {
    let deck = deck_of(numbered("white", 5), numbered("black", 3))?.with_title("party night");
    let mut bytes = Vec::new();
    let report = render_pdf(&deck, &mut bytes)?;
    assert_eq!(report.pages, 2);

    let doc = lopdf::Document::load_mem(&bytes)?;
    assert_eq!(doc.get_pages().len(), 2);
    assert_eq!(common::info_entry(&doc, b"Title"), Some(b"party night".to_vec()));
    assert_eq!(
        common::info_entry(&doc, b"Producer"),
        Some(b"Bigger, Blacker Cards".to_vec())
    );
    Ok(())
}
