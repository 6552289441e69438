//! Integration tests for the skia rasterizer against fonts installed on the machine

use std::path::Path;
use std::sync::Arc;

use textimg_core::{Color, GlyphPaint, RasterFont, Surface};
use textimg_render_skia::SkiaRasterFont;

const SANS_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Fonts with layered COLR glyphs
const COLR_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/noto/Noto-COLRv1.ttf",
    "/usr/share/fonts/google-noto-color-emoji-fonts/Noto-COLRv1.ttf",
    "/usr/share/fonts/noto/Noto-COLRv1.ttf",
    "/usr/share/fonts/truetype/twemoji/TwemojiMozilla.ttf",
    "C:\\Windows\\Fonts\\seguiemj.ttf",
];

fn load_first(candidates: &[&str], size: u32) -> Option<SkiaRasterFont> {
    let path = candidates.iter().map(Path::new).find(|p| p.exists())?;
    let data = std::fs::read(path).ok()?;
    SkiaRasterFont::new(Arc::new(data), 0, size).ok()
}

fn load_sans(size: u32) -> Option<SkiaRasterFont> {
    load_first(SANS_CANDIDATES, size)
}

fn inked_rows(surface: &Surface) -> Vec<u32> {
    (0..surface.height())
        .filter(|&y| (0..surface.width()).any(|x| surface.pixel(x, y).is_some_and(|c| c.a > 0)))
        .collect()
}

#[test]
fn test_metrics_scale_with_size() {
    let (Some(small), Some(large)) = (load_sans(20), load_sans(40)) else {
        eprintln!("Skipping test: no sans font found");
        return;
    };
    assert!(small.metrics().ascent > 0.0);
    assert!(small.metrics().descent > 0.0);
    let ratio = small.metrics().ascent / large.metrics().ascent;
    assert!((ratio - 0.5).abs() < 0.01, "ratio was {ratio}");
}

#[test]
fn test_measure_includes_stroke_on_both_sides() {
    let Some(font) = load_sans(30) else {
        eprintln!("Skipping test: no sans font found");
        return;
    };
    let plain = font.measure('H', 0);
    let stroked = font.measure('H', 3);
    assert!((stroked.advance - plain.advance - 6.0).abs() < 0.001);
    assert!((stroked.height - plain.height - 6.0).abs() < 0.001);
}

#[test]
fn test_descender_reaches_below_baseline() {
    let Some(font) = load_sans(30) else {
        eprintln!("Skipping test: no sans font found");
        return;
    };
    let ascent = font.metrics().ascent;
    assert!(font.measure('g', 0).height > ascent);
    assert!(font.measure('x', 0).height <= ascent + 0.5);
    // No ink at all: the box stops at the baseline
    assert!((font.measure(' ', 0).height - ascent).abs() < 0.001);
}

#[test]
fn test_draw_glyph_inks_inside_its_box() {
    let Some(font) = load_sans(30) else {
        eprintln!("Skipping test: no sans font found");
        return;
    };
    let extent = font.measure('A', 0);
    let mut surface = Surface::new(60, 60, None).unwrap();
    font.draw_glyph(&mut surface, 'A', (10.0, 10.0), &GlyphPaint::fill(Color::black()))
        .unwrap();

    let rows = inked_rows(&surface);
    assert!(!rows.is_empty());
    let top = *rows.first().unwrap() as f32;
    let bottom = *rows.last().unwrap() as f32;
    assert!(top >= 10.0);
    assert!(bottom <= 10.0 + extent.height + 1.0);
}

#[test]
fn test_stroke_uses_its_own_color() {
    let Some(font) = load_sans(40) else {
        eprintln!("Skipping test: no sans font found");
        return;
    };
    let paint = GlyphPaint {
        fill: Color::white(),
        stroke_width: 3,
        stroke: Some(Color::rgb(255, 0, 0)),
    };
    let mut surface = Surface::new(80, 80, None).unwrap();
    font.draw_glyph(&mut surface, 'O', (0.0, 0.0), &paint).unwrap();

    let mut saw_red = false;
    for y in 0..surface.height() {
        for x in 0..surface.width() {
            if let Some(c) = surface.pixel(x, y) {
                if c.a == 255 && c.r == 255 && c.g == 0 {
                    saw_red = true;
                }
            }
        }
    }
    assert!(saw_red, "stroke color should be visible around the glyph");
}

#[test]
fn test_drawing_is_deterministic() {
    let Some(font) = load_sans(24) else {
        eprintln!("Skipping test: no sans font found");
        return;
    };
    let draw = || {
        let mut surface = Surface::new(40, 40, Some(Color::white())).unwrap();
        font.draw_glyph(&mut surface, 'R', (2.5, 3.0), &GlyphPaint::fill(Color::black()))
            .unwrap();
        surface
    };
    assert_eq!(draw(), draw());
}

#[test]
fn test_colr_glyph_keeps_its_palette() {
    let Some(font) = load_first(COLR_CANDIDATES, 64).filter(|f| f.has_color_glyph('😀')) else {
        eprintln!("Skipping test: no COLR emoji font found");
        return;
    };
    let extent = font.measure('😀', 0);
    assert!(extent.advance > 0.0);
    assert!(extent.height > font.metrics().ascent * 0.5);

    let mut surface = Surface::new(128, 128, None).unwrap();
    font.draw_glyph(&mut surface, '😀', (10.0, 10.0), &GlyphPaint::fill(Color::black()))
        .unwrap();

    // A single-color fill would leave only black pixels behind
    let colorful = (0..surface.height())
        .flat_map(|y| (0..surface.width()).map(move |x| (x, y)))
        .filter_map(|(x, y)| surface.pixel(x, y))
        .filter(|c| c.a > 200 && (c.r > 100 || c.g > 100 || c.b > 100))
        .count();
    assert!(colorful > 50, "only {colorful} colored pixels");
}

#[test]
fn test_plain_font_has_no_color_glyphs() {
    let Some(font) = load_sans(30) else {
        eprintln!("Skipping test: no sans font found");
        return;
    };
    assert!(!font.has_color_glyph('A'));
}
