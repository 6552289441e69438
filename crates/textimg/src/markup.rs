//! BBCode-like markup
//!
//! ```text
//! [align=left|right|center]...[/align]
//! [color=#RRGGBB|name]...[/color]
//! [font=file.ttf]...[/font]
//! [size=48]...[/size]
//! [b]...[/b]
//! ```
//!
//! Each tag kind is matched on its own with a stack, so tags of different
//! kinds may overlap freely while tags of one kind nest. A character takes
//! the value of the innermost span of each kind that contains it, or the
//! caller's default outside every span. Characters that belong to a tag's
//! delimiters are not emitted. Tags that never close, closing tags with
//! nothing open, and tags with unparsable values are plain text.

use textimg_core::{types::HAlign, Color};

/// Font file extensions accepted by `[font=...]`
const FONT_EXTENSIONS: &[&str] = &["ttf", "ttc", "otf", "fnt"];

/// One character with every attribute resolved
#[derive(Debug, Clone, PartialEq)]
pub struct StyledChar {
    pub ch: char,
    pub align: HAlign,
    pub color: Color,
    /// Font named by the innermost `[font]` tag, else the default font
    pub font: Option<String>,
    pub size: u32,
    pub bold: bool,
}

/// Attribute values outside every tag
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupDefaults {
    pub align: HAlign,
    pub color: Color,
    pub font: Option<String>,
    pub size: u32,
    pub bold: bool,
}

/// One `[...]` in the text, in character indices, brackets included
///
/// A tag body never holds another `[`; the last `[` before a `]` opens it.
#[derive(Debug, Clone, PartialEq)]
struct Tag {
    range: (usize, usize),
    closing: bool,
    name: String,
    value: Option<String>,
}

/// What a tag turned out to be for one kind
enum Mark<T> {
    Open(T),
    Close,
}

/// Parse `text` into styled characters, dropping tag delimiters
pub fn parse(text: &str, defaults: &MarkupDefaults) -> Vec<StyledChar> {
    let chars: Vec<char> = text.chars().collect();
    let tags = tokenize(&chars);
    let len = chars.len();

    let aligns = marks(&tags, "align", |v| v?.parse::<HAlign>().ok());
    let colors = marks(&tags, "color", |v| v?.parse::<Color>().ok());
    let fonts = marks(&tags, "font", |v| {
        v.filter(|v| is_font_file(v)).map(|v| Some(v.to_string()))
    });
    let sizes = marks(&tags, "size", |v| parse_size(v?));
    let bolds = marks(&tags, "b", |v| v.is_none().then_some(true));

    let aligns = layer(len, &tags, &aligns, &defaults.align);
    let colors = layer(len, &tags, &colors, &defaults.color);
    let fonts = layer(len, &tags, &fonts, &defaults.font);
    let sizes = layer(len, &tags, &sizes, &defaults.size);
    let bolds = layer(len, &tags, &bolds, &defaults.bold);

    chars
        .iter()
        .enumerate()
        .filter_map(|(idx, &ch)| {
            Some(StyledChar {
                ch,
                align: *aligns[idx]?,
                color: *colors[idx]?,
                font: fonts[idx]?.clone(),
                size: *sizes[idx]?,
                bold: *bolds[idx]?,
            })
        })
        .collect()
}

/// Every `[...]` in `chars`, in order
fn tokenize(chars: &[char]) -> Vec<Tag> {
    let mut tags = Vec::new();
    let mut start = None;

    for (idx, &ch) in chars.iter().enumerate() {
        match ch {
            '[' => start = Some(idx),
            ']' => {
                if let Some(start) = start.take() {
                    let body: String = chars[start + 1..idx].iter().collect();
                    let (closing, body) = match body.strip_prefix('/') {
                        Some(rest) => (true, rest.to_string()),
                        None => (false, body),
                    };
                    let (name, value) = match body.split_once('=') {
                        Some((name, value)) if !closing => {
                            (name.to_string(), Some(value.to_string()))
                        }
                        _ => (body, None),
                    };
                    tags.push(Tag {
                        range: (start, idx + 1),
                        closing,
                        name,
                        value,
                    });
                }
            }
            _ => {}
        }
    }

    tags
}

/// Pair up the `name` tags in `tags` with a stack, one mark per tag
///
/// `parse_value` receives the text after `=` (or `None` for a bare tag) and
/// rejects the tag by returning `None`. Tags that do not pair stay unmarked.
fn marks<T>(
    tags: &[Tag],
    name: &str,
    parse_value: impl Fn(Option<&str>) -> Option<T>,
) -> Vec<Option<Mark<T>>> {
    let mut out: Vec<Option<Mark<T>>> = tags.iter().map(|_| None).collect();
    let mut open: Vec<(usize, T)> = Vec::new();

    for (idx, tag) in tags.iter().enumerate() {
        if tag.name != name {
            continue;
        }
        if tag.closing {
            if let Some((open_idx, value)) = open.pop() {
                out[open_idx] = Some(Mark::Open(value));
                out[idx] = Some(Mark::Close);
            }
        } else if let Some(value) = parse_value(tag.value.as_deref()) {
            open.push((idx, value));
        }
    }

    out
}

/// Value of one attribute at every character, `None` inside a delimiter
///
/// Matched pairs nest, so the innermost open span is the top of a stack.
fn layer<'a, T>(
    len: usize,
    tags: &[Tag],
    marks: &'a [Option<Mark<T>>],
    default: &'a T,
) -> Vec<Option<&'a T>> {
    let mut out = Vec::with_capacity(len);
    let mut stack: Vec<&T> = Vec::new();

    for (tag, mark) in tags.iter().zip(marks) {
        let (start, end) = tag.range;
        let current = stack.last().copied().unwrap_or(default);
        out.resize(start, Some(current));
        match mark {
            Some(Mark::Open(value)) => {
                out.resize(end, None);
                stack.push(value);
            }
            Some(Mark::Close) => {
                out.resize(end, None);
                stack.pop();
            }
            None => out.resize(end, Some(current)),
        }
    }
    let current = stack.last().copied().unwrap_or(default);
    out.resize(len, Some(current));
    out
}

fn is_font_file(value: &str) -> bool {
    !value.is_empty()
        && !value.chars().any(char::is_whitespace)
        && value
            .rsplit_once('.')
            .is_some_and(|(stem, ext)| !stem.is_empty() && FONT_EXTENSIONS.contains(&ext))
}

fn parse_size(value: &str) -> Option<u32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok().filter(|&size| size > 0)
}
