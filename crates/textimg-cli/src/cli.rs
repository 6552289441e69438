//! CLI argument definitions using Clap v4

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use textimg_core::{types::HAlign, Color};

/// textimg - styled text and markup rendered to images
#[derive(Parser, Debug)]
#[command(name = "textimg")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render text to an image file
    #[command(alias = "r")]
    Render(Box<RenderArgs>),

    /// Show which font each character would be drawn with
    #[command(alias = "w")]
    Which(WhichArgs),
}

/// Where fonts come from
#[derive(Args, Debug, Clone)]
pub struct FontArgs {
    /// Plugin font directory, searched before system fonts
    #[arg(long = "font-dir")]
    pub font_dir: Option<PathBuf>,

    /// Extra font file to load (repeatable)
    #[arg(long = "font-file", action = ArgAction::Append)]
    pub font_files: Vec<PathBuf>,

    /// Do not scan system font directories
    #[arg(long = "no-system-fonts")]
    pub no_system_fonts: bool,

    /// Preferred font family or file name
    #[arg(short = 'f', long = "font")]
    pub font: Option<String>,

    /// Fallback family, tried in order (repeatable; replaces the default stack)
    #[arg(long = "fallback", action = ArgAction::Append)]
    pub fallback: Vec<String>,

    /// Use the bold face
    #[arg(long)]
    pub bold: bool,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Text to render (reads from stdin if omitted)
    pub text: Option<String>,

    /// Read input text from file
    #[arg(short = 'T', long = "text-file", conflicts_with = "text")]
    pub text_file: Option<PathBuf>,

    /// Treat brackets literally instead of as markup
    #[arg(long)]
    pub plain: bool,

    #[command(flatten)]
    pub fonts: FontArgs,

    /// Font size in pixels
    #[arg(short = 's', long = "font-size", default_value = "30")]
    pub font_size: u32,

    /// Text color: #RGB, #RRGGBB, #RRGGBBAA or a color name
    #[arg(short = 'c', long = "fill", default_value = "black")]
    pub fill: Color,

    /// Pixels between lines [default: 6 for markup, 4 for plain text]
    #[arg(long)]
    pub spacing: Option<u32>,

    /// Alignment of lines: left, right, center
    #[arg(short = 'a', long, default_value = "left")]
    pub align: HAlign,

    /// Stroke width in pixels
    #[arg(long = "stroke-width", default_value = "0")]
    pub stroke_width: u32,

    /// Stroke color (defaults to the fill color)
    #[arg(long = "stroke-color")]
    pub stroke_color: Option<Color>,

    /// Wrap lines wider than this many pixels
    #[arg(short = 'w', long = "max-width")]
    pub max_width: Option<f32>,

    /// Padding as <all> or <x>,<y>
    #[arg(short = 'm', long, default_value = "10", value_parser = parse_padding)]
    pub padding: (u32, u32),

    /// Background color, or "none" for transparent
    #[arg(short = 'b', long = "bg", default_value = "white")]
    pub background: String,

    /// Output file path (stdout if omitted)
    #[arg(short = 'o', long = "output-file")]
    pub output_file: Option<PathBuf>,

    /// Output format [default: from the output extension, else png]
    #[arg(short = 'O', long = "format")]
    pub format: Option<OutputFormat>,

    /// Silent mode (no progress info)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

#[derive(Args, Debug)]
pub struct WhichArgs {
    /// Characters to look up
    pub text: String,

    #[command(flatten)]
    pub fonts: FontArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Png,
    #[value(alias = "jpg")]
    Jpeg,
}

/// `10` pads both axes, `10,20` pads x and y separately
pub fn parse_padding(value: &str) -> Result<(u32, u32), String> {
    let parse = |s: &str| {
        s.trim()
            .parse::<u32>()
            .map_err(|_| format!("invalid padding '{value}'"))
    };
    match value.split_once(',') {
        Some((x, y)) => Ok((parse(x)?, parse(y)?)),
        None => {
            let all = parse(value)?;
            Ok((all, all))
        }
    }
}
