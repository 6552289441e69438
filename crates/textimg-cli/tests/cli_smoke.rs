//! CLI Smoke Tests
//!
//! Runs the `textimg` binary against DejaVu Sans only, so results do not
//! depend on what else is installed.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

const DEJAVU_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
];

fn dejavu() -> Option<PathBuf> {
    DEJAVU_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

fn temp_output(ext: &str) -> PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("textimg_test_{}.{}", id, ext))
}

fn textimg(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_textimg"))
        .args(args)
        .env("TEXTIMG_FONT_PATH", std::env::temp_dir().join("textimg-cli-no-fonts"))
        .output()
        .expect("Failed to execute textimg")
}

fn isolated<'a>(font: &'a str, args: &[&'a str]) -> Vec<&'a str> {
    let mut all = args.to_vec();
    all.extend(["--no-system-fonts", "--font-file", font, "--fallback", "DejaVu Sans"]);
    all
}

#[test]
fn test_help_lists_commands() {
    let output = textimg(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("render"));
    assert!(stdout.contains("which"));
}

#[test]
fn test_render_png() {
    let Some(font) = dejavu() else {
        eprintln!("Skipping test: DejaVuSans.ttf not found");
        return;
    };
    let font = font.to_string_lossy().into_owned();
    let out = temp_output("png");
    let out_str = out.to_string_lossy().into_owned();

    let output = textimg(&isolated(
        &font,
        &["render", "[b]Hello[/b] [color=red]world[/color]", "-o", &out_str, "-q"],
    ));
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let bytes = fs::read(&out).unwrap();
    assert_eq!(&bytes[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    let _ = fs::remove_file(&out);
}

#[test]
fn test_render_jpeg_from_extension() {
    let Some(font) = dejavu() else {
        eprintln!("Skipping test: DejaVuSans.ttf not found");
        return;
    };
    let font = font.to_string_lossy().into_owned();
    let out = temp_output("jpg");
    let out_str = out.to_string_lossy().into_owned();

    let output = textimg(&isolated(&font, &["render", "plain [text]", "--plain", "-o", &out_str]));
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let bytes = fs::read(&out).unwrap();
    assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
    let _ = fs::remove_file(&out);
}

#[test]
fn test_which_reports_family() {
    let Some(font) = dejavu() else {
        eprintln!("Skipping test: DejaVuSans.ttf not found");
        return;
    };
    let font = font.to_string_lossy().into_owned();
    let output = textimg(&isolated(&font, &["which", "Ab"]));
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 2);
    assert!(stdout.lines().all(|line| line.contains("DejaVu Sans")));
    assert!(stdout.starts_with("U+0041"));
}

#[test]
fn test_no_fonts_at_all_fails() {
    let output = textimg(&["render", "x", "--no-system-fonts", "-o", "/dev/null"]);
    assert!(!output.status.success());
}

#[test]
fn test_invalid_color_fails() {
    let output = textimg(&["render", "x", "--fill", "not-a-color"]);
    assert!(!output.status.success());
}
