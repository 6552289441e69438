//! Layout behavior against stub fonts with known proportions

mod common;

use common::{stub_renderer, stub_selector, EMOJI};
use proptest::prelude::*;
use textimg::{prelude::*, GlyphRun, Line};

fn line_text(line: &Line) -> String {
    line.runs().iter().map(GlyphRun::ch).collect()
}

fn run_for(ch: char, size: u32) -> GlyphRun {
    let face = stub_selector()
        .get_proper_font(ch, FontStyle::Normal, FontWeight::NORMAL, None, &[])
        .unwrap();
    GlyphRun::new(ch, face, size, Color::black(), 0, None).unwrap()
}

proptest! {
    #[test]
    fn prop_wrapped_lines_fit_and_keep_text(
        text in "[a-z中 ]{1,40}",
        extra in 0.0f32..200.0,
    ) {
        let style = TextStyle::default();
        let mut layout = Text2Image::from_text(&text, &style, &stub_selector()).unwrap();
        let widest = layout.lines()[0]
            .runs()
            .iter()
            .map(GlyphRun::width)
            .fold(0.0, f32::max);
        let max_width = widest + extra;

        layout.wrap(max_width);
        for line in layout.lines() {
            prop_assert!(line.width() <= max_width);
        }
        let joined: String = layout.lines().iter().map(line_text).collect();
        prop_assert_eq!(joined, text);
    }
}

#[test]
fn test_covered_text_needs_no_fallback() {
    let selector = stub_selector();
    for ch in "Hello, world!".chars() {
        let face = selector
            .get_proper_font(ch, FontStyle::Normal, FontWeight::NORMAL, None, &[])
            .unwrap();
        assert_eq!(face.family(), "Latin");
    }
    let face = selector
        .get_proper_font('中', FontStyle::Normal, FontWeight::NORMAL, None, &[])
        .unwrap();
    assert_eq!(face.family(), "CJK");
}

#[test]
fn test_fixed_size_metrics_are_linear() {
    let small = run_for(EMOJI, 32);
    let large = run_for(EMOJI, 64);
    assert_eq!(small.face().fixed_size(), Some(137));
    assert!((small.ascent() / large.ascent() - 0.5).abs() < 1e-4);
    assert!((small.width() / large.width() - 0.5).abs() < 1e-4);
    assert!((small.height() / large.height() - 0.5).abs() < 1e-4);
}

#[test]
fn test_empty_line_wraps_to_one_empty_line() {
    let line = Line::new(Vec::new(), HAlign::Right);
    assert_eq!(line.width(), 0.0);
    assert_eq!(line.height(), 0.0);
    assert_eq!(line.ascent(), 0.0);
    assert_eq!(line.descent(), 0.0);
    let wrapped = line.wrap(100.0);
    assert_eq!(wrapped.len(), 1);
    assert!(wrapped[0].is_empty());
    assert_eq!(wrapped[0].align(), HAlign::Right);
}

#[test]
fn test_bold_markup_runs_share_a_line() {
    let style = TextStyle::for_markup().with_align(HAlign::Center);
    let layout = Text2Image::from_bbcode_text("[b]A[/b]B", &style, &stub_selector()).unwrap();
    assert_eq!(layout.lines().len(), 1);
    let line = &layout.lines()[0];
    assert_eq!(line.align(), HAlign::Center);
    assert_eq!(line.runs().len(), 2);
    assert_eq!(line_text(line), "AB");
}

#[test]
fn test_hello_render_size_and_determinism() {
    let renderer = stub_renderer();
    let options = RenderOptions::default();
    let first = renderer.render("Hello", &options).unwrap();
    let second = renderer.render("Hello", &options).unwrap();

    let glyphs: f32 = "Hello".chars().map(|ch| run_for(ch, 30).width()).sum();
    assert!(first.width() as f32 >= 20.0 + glyphs);
    assert!(first.height() as f32 >= 20.0 + 24.0 + 6.0);
    assert_eq!(first, second);
}

#[test]
fn test_alignment_change_splits_lines() {
    let layout = Text2Image::from_bbcode_text(
        "[align=center]Hi[/align]There",
        &TextStyle::for_markup(),
        &stub_selector(),
    )
    .unwrap();
    let lines = layout.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!((line_text(&lines[0]).as_str(), lines[0].align()), ("Hi", HAlign::Center));
    assert_eq!((line_text(&lines[1]).as_str(), lines[1].align()), ("There", HAlign::Left));
}

#[test]
fn test_fixed_size_glyph_box_is_scaled() {
    let run = run_for(EMOJI, 64);
    let ratio = 64.0 / 137.0;
    // Raw box at 137px: one em wide and tall
    assert!((run.width() - 137.0 * ratio).abs() < 1e-3);
    assert!((run.height() - 137.0 * ratio).abs() < 1e-3);

    let mut surface = Surface::new(100, 100, None).unwrap();
    run.draw_on(&mut surface, (0, 0)).unwrap();
    assert!(surface.pixel(60, 60).is_some_and(|c| c.a > 200));
    assert_eq!(surface.pixel(70, 10).map(|c| c.a), Some(0));
    assert_eq!(surface.pixel(10, 70).map(|c| c.a), Some(0));
}

#[test]
fn test_mixed_scripts_align_on_baseline() {
    let style = TextStyle::default();
    let layout = Text2Image::from_text("a[😀", &style, &stub_selector()).unwrap();
    let runs = layout.lines()[0].runs();
    assert_eq!(runs[1].face().family(), "Latin");
    assert_eq!(runs[2].face().family(), "Emoji");
    // Same requested size, so the emoji scales to the same ascent
    assert!((runs[0].ascent() - runs[2].ascent()).abs() < 1e-3);
}

#[test]
fn test_stroke_widens_every_glyph() {
    let style = TextStyle::default().with_stroke(2, Some(Color::white()));
    let layout = Text2Image::from_text("ab", &style, &stub_selector()).unwrap();
    assert_eq!(layout.width(), 2.0 * (15.0 + 4.0));
}

#[test]
fn test_draw_text_reports_does_not_fit() {
    let renderer = stub_renderer();
    let mut surface = Surface::new(50, 50, None).unwrap();
    let err = renderer
        .draw_text(
            &mut surface,
            Region::new(0, 0, 50, 8),
            "no room",
            &FitOptions::default(),
        )
        .err()
        .unwrap();
    assert!(matches!(err, TextImgError::DoesNotFit { .. }));
}
