//! Render command implementation

use std::fs;
use std::io::{self, Read, Write};

use anyhow::{bail, Context, Result};
use textimg::{RenderOptions, TextRenderer, TextStyle};
use textimg_core::{traits::Exporter, Color};
use textimg_export::ImageFormat;

use crate::cli::{OutputFormat, RenderArgs};

pub fn run(args: &RenderArgs) -> Result<()> {
    let text = input_text(args)?;
    let options = render_options(args)?;
    let format = output_format(args);

    let db = super::open_database(&args.fonts)?;
    let renderer = TextRenderer::from_database(db);
    let image = if args.plain {
        renderer.render(&text, &options)
    } else {
        renderer.render_markup(&text, &options)
    }
    .context("Rendering failed")?;

    let bytes = format.exporter().export(&image).context("Encoding failed")?;
    match &args.output_file {
        Some(path) => {
            fs::write(path, &bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if !args.quiet {
                eprintln!(
                    "Wrote {}x{} image to {}",
                    image.width(),
                    image.height(),
                    path.display()
                );
            }
        }
        None => io::stdout()
            .write_all(&bytes)
            .context("Failed to write to stdout")?,
    }
    Ok(())
}

fn input_text(args: &RenderArgs) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    if let Some(path) = &args.text_file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read text from stdin")?;
    Ok(text.trim_end_matches('\n').to_string())
}

pub fn render_options(args: &RenderArgs) -> Result<RenderOptions> {
    if args.font_size == 0 {
        bail!("Font size must be positive");
    }
    let base = if args.plain {
        TextStyle::default()
    } else {
        TextStyle::for_markup()
    };
    let style = TextStyle {
        font_size: args.font_size,
        bold: args.fonts.bold,
        fill: args.fill,
        spacing: args.spacing.unwrap_or(base.spacing),
        align: args.align,
        stroke_width: args.stroke_width,
        stroke_color: args.stroke_color,
        font_name: args.fonts.font.clone(),
        fallback_fonts: args.fonts.fallback.clone(),
    };
    Ok(RenderOptions {
        background: parse_background(&args.background)?,
        padding: args.padding,
        max_width: args.max_width,
        style,
    })
}

fn parse_background(value: &str) -> Result<Option<Color>> {
    if matches!(value.to_ascii_lowercase().as_str(), "none" | "transparent") {
        return Ok(None);
    }
    let color = value
        .parse::<Color>()
        .with_context(|| format!("Invalid background '{value}'"))?;
    Ok(Some(color))
}

fn output_format(args: &RenderArgs) -> ImageFormat {
    match args.format {
        Some(OutputFormat::Png) => ImageFormat::Png,
        Some(OutputFormat::Jpeg) => ImageFormat::Jpeg,
        None => args
            .output_file
            .as_ref()
            .and_then(ImageFormat::from_path)
            .unwrap_or(ImageFormat::Png),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn render_args(extra: &[&str]) -> Box<RenderArgs> {
        let argv = ["textimg", "render", "text"].iter().chain(extra).copied();
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Render(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_spacing_depends_on_mode() {
        assert_eq!(render_options(&render_args(&[])).unwrap().style.spacing, 6);
        assert_eq!(
            render_options(&render_args(&["--plain"])).unwrap().style.spacing,
            4
        );
        assert_eq!(
            render_options(&render_args(&["--spacing", "9"])).unwrap().style.spacing,
            9
        );
    }

    #[test]
    fn test_background_none_is_transparent() {
        let options = render_options(&render_args(&["--bg", "none"])).unwrap();
        assert_eq!(options.background, None);
        let options = render_options(&render_args(&["--bg", "#000"])).unwrap();
        assert_eq!(options.background, Some(Color::black()));
        assert!(render_options(&render_args(&["--bg", "nope"])).is_err());
    }

    #[test]
    fn test_zero_font_size_is_rejected() {
        assert!(render_options(&render_args(&["-s", "0"])).is_err());
    }

    #[test]
    fn test_format_follows_extension() {
        assert_eq!(output_format(&render_args(&["-o", "a.jpg"])), ImageFormat::Jpeg);
        assert_eq!(output_format(&render_args(&["-o", "a.webp"])), ImageFormat::Png);
        assert_eq!(
            output_format(&render_args(&["-o", "a.jpg", "-O", "png"])),
            ImageFormat::Png
        );
    }
}
