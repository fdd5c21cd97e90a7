//! Line templates for tree entries
//!
//! A small subset of Python's format syntax: literal text, `{{` and `}}`
//! escapes, and `{field}` / `{field:spec}` where `spec` is
//! `[[fill]align][width][.precision]`.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

pub const DEFAULT_TEMPLATE: &str = "{name}";

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{|\}\}|\{([^{}]*)\}|[{}]").expect("TOKEN regex is invalid")
});

/// Placeholders a template may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Escaped base name (the literal path on the root line).
    Name,
    Path,
    Type,
    /// Human-readable size.
    Size,
    /// Size in bytes.
    BSize,
    Hash,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Field::Name),
            "path" => Some(Field::Path),
            "type" => Some(Field::Type),
            "size" => Some(Field::Size),
            "bsize" => Some(Field::BSize),
            "hash" => Some(Field::Hash),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
}

fn align_of(ch: char) -> Option<Align> {
    match ch {
        '<' => Some(Align::Left),
        '>' => Some(Align::Right),
        '^' => Some(Align::Center),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FormatSpec {
    fill: char,
    align: Option<Align>,
    width: usize,
    precision: Option<usize>,
}

impl Default for FormatSpec {
    fn default() -> Self {
        Self {
            fill: ' ',
            align: None,
            width: 0,
            precision: None,
        }
    }
}

impl FormatSpec {
    fn parse(spec: &str) -> Option<Self> {
        let chars: Vec<char> = spec.chars().collect();
        let mut parsed = FormatSpec::default();
        let mut i = 0;

        if let Some(align) = chars.get(1).and_then(|&c| align_of(c)) {
            parsed.fill = chars[0];
            parsed.align = Some(align);
            i = 2;
        } else if let Some(align) = chars.first().and_then(|&c| align_of(c)) {
            parsed.align = Some(align);
            i = 1;
        }

        let start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        if i > start {
            parsed.width = chars[start..i].iter().collect::<String>().parse().ok()?;
        }

        if chars.get(i) == Some(&'.') {
            i += 1;
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if i == start {
                return None;
            }
            parsed.precision = Some(chars[start..i].iter().collect::<String>().parse().ok()?);
        }

        (i == chars.len()).then_some(parsed)
    }

    fn apply(&self, text: &str, default_align: Align) -> String {
        let mut out: String = match self.precision {
            Some(p) => text.chars().take(p).collect(),
            None => text.to_string(),
        };
        let len = out.chars().count();
        if len >= self.width {
            return out;
        }
        let pad = self.width - len;
        let fill = |n: usize| std::iter::repeat_n(self.fill, n).collect::<String>();
        match self.align.unwrap_or(default_align) {
            Align::Left => {
                out.push_str(&fill(pad));
                out
            }
            Align::Right => fill(pad) + &out,
            Align::Center => {
                let left = pad / 2;
                fill(left) + &out + &fill(pad - left)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field, FormatSpec),
}

/// Values for one rendered entry.
#[derive(Debug, Clone)]
pub struct FieldValues<'v> {
    pub name: &'v str,
    pub path: &'v str,
    pub kind: &'v str,
    pub size: Option<u64>,
    /// Only present when the template references `{hash}`.
    pub hash: Option<&'v str>,
}

/// A parsed line template.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            source: DEFAULT_TEMPLATE.to_string(),
            segments: vec![Segment::Field(Field::Name, FormatSpec::default())],
        }
    }
}

impl Template {
    /// Parse a template; unknown fields and malformed specs are errors.
    pub fn parse(source: &str) -> Result<Self> {
        let invalid = |message: String| Error::Template {
            template: source.to_string(),
            message,
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut last = 0;

        for caps in TOKEN.captures_iter(source) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            literal.push_str(&source[last..whole.start()]);
            last = whole.end();

            match whole.as_str() {
                "{{" => literal.push('{'),
                "}}" => literal.push('}'),
                "{" | "}" => {
                    return Err(invalid(format!(
                        "unmatched '{}' at offset {}",
                        whole.as_str(),
                        whole.start()
                    )));
                }
                _ => {
                    let inner = caps.get(1).map_or("", |m| m.as_str());
                    let (name, spec) = inner.split_once(':').unwrap_or((inner, ""));
                    let field = Field::from_name(name)
                        .ok_or_else(|| invalid(format!("unknown field '{{{}}}'", name)))?;
                    let spec = FormatSpec::parse(spec)
                        .ok_or_else(|| invalid(format!("bad format spec '{}'", spec)))?;
                    if field == Field::BSize && spec.precision.is_some() {
                        return Err(invalid("precision not allowed for '{bsize}'".to_string()));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field, spec));
                }
            }
        }
        literal.push_str(&source[last..]);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the template references `field`.
    pub fn uses(&self, field: Field) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Field(f, _) if *f == field))
    }

    /// Whether rendering needs entry sizes.
    pub fn uses_size(&self) -> bool {
        self.uses(Field::Size) || self.uses(Field::BSize)
    }

    pub fn render(&self, values: &FieldValues<'_>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field, spec) => {
                    let rendered = match field {
                        Field::Name => spec.apply(values.name, Align::Left),
                        Field::Path => spec.apply(values.path, Align::Left),
                        Field::Type => spec.apply(values.kind, Align::Left),
                        Field::Size => {
                            spec.apply(&crate::tree::format_size(values.size), Align::Left)
                        }
                        Field::BSize => match values.size {
                            Some(bytes) => spec.apply(&bytes.to_string(), Align::Right),
                            None => spec.apply("-", Align::Left),
                        },
                        Field::Hash => spec.apply(values.hash.unwrap_or("-"), Align::Left),
                    };
                    out.push_str(&rendered);
                }
            }
        }
        out
    }
}
