//! # Display Templates
//!
//! Parses and renders the text a timer logs when it stops. A template has two
//! positional slots: `{0}` is the timer name and `{1}` the smoothed average in
//! milliseconds. Supported syntax:
//!
//! - `{0}`, `{1}` and auto-numbered `{}` slots;
//! - a format spec after a colon, `[0][width][.precision][f|s]`, e.g. `{1:0.1f}` or `{0:10}`;
//! - `{{` and `}}` for literal braces.
//!
//! A bare `{1}` prints the average like Python's `repr` of a float (`30.0`,
//! `1e+16`, `1.5e-05`). Unlike Python, a precision without a type letter
//! (`{1:.1}`) is fixed-point, the same as `{1:.1f}`, and fill or alignment
//! characters other than a leading `0` are rejected.
//!
//! Templates are parsed once, when the timer is built, so a malformed template is
//! reported at construction rather than on the first stop.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    // `<index>` or `<index>:<spec>`, where the index may be empty (auto-numbering).
    static ref SLOT_RE: Regex = Regex::new(r"^(\d*)(?::(.*))?$").expect("valid slot regex");
}

lazy_static! {
    static ref SPEC_RE: Regex =
        Regex::new(r"^(0)?(\d+)?(?:\.(\d+))?([fs])?$").expect("valid spec regex");
}

/// Errors found while parsing a display template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unclosed '{{' at byte {0} in display template")]
    UnclosedBrace(usize),
    #[error("Single '}}' at byte {0} in display template; use '}}}}' for a literal brace")]
    StrayClosingBrace(usize),
    #[error("Display template refers to argument {0}, but only 0 (name) and 1 (average) exist")]
    IndexOutOfRange(usize),
    #[error("Invalid slot '{{{0}}}' in display template")]
    InvalidSlot(String),
    #[error("Cannot mix automatic '{{}}' and numbered slots in display template")]
    MixedNumbering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Argument {
    Name,
    Average,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct FormatSpec {
    zero_pad: bool,
    width: usize,
    precision: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
enum Piece {
    Literal(String),
    Slot { argument: Argument, spec: FormatSpec },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Numbering {
    Automatic,
    Manual,
}

/// A parsed display template.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    source: String,
    pieces: Vec<Piece>,
}

impl Template {
    /// Parses `source` into a reusable template.
    ///
    /// # Errors
    /// Returns a `TemplateError` describing the first malformed slot or brace.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut next_auto_index = 0;
        let mut numbering: Option<Numbering> = None;
        let mut chars = source.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' => {
                    if chars.next_if(|&(_, n)| n == '{').is_some() {
                        literal.push('{');
                        continue;
                    }

                    let mut body = String::new();
                    let mut closed = false;
                    for (_, n) in chars.by_ref() {
                        match n {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => return Err(TemplateError::UnclosedBrace(pos)),
                            _ => body.push(n),
                        }
                    }
                    if !closed {
                        return Err(TemplateError::UnclosedBrace(pos));
                    }

                    if !literal.is_empty() {
                        pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                    }
                    pieces.push(parse_slot(&body, &mut next_auto_index, &mut numbering)?);
                }
                '}' => {
                    if chars.next_if(|&(_, n)| n == '}').is_none() {
                        return Err(TemplateError::StrayClosingBrace(pos));
                    }
                    literal.push('}');
                }
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            pieces,
        })
    }

    /// The template text this was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Renders the template with the timer `name` and `average` (milliseconds).
    pub fn render(&self, name: &str, average: f64) -> String {
        let mut out = String::with_capacity(self.source.len() + name.len());
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Slot {
                    argument: Argument::Name,
                    spec,
                } => out.push_str(&render_name(name, spec)),
                Piece::Slot {
                    argument: Argument::Average,
                    spec,
                } => out.push_str(&render_average(average, spec)),
            }
        }
        out
    }
}

fn parse_slot(
    body: &str,
    next_auto_index: &mut usize,
    numbering: &mut Option<Numbering>,
) -> Result<Piece, TemplateError> {
    let invalid = || TemplateError::InvalidSlot(body.to_string());
    let captures = SLOT_RE.captures(body).ok_or_else(invalid)?;

    let index_str = captures.get(1).map_or("", |m| m.as_str());
    let (index, mode) = if index_str.is_empty() {
        let index = *next_auto_index;
        *next_auto_index += 1;
        (index, Numbering::Automatic)
    } else {
        let index = index_str.parse::<usize>().map_err(|_| invalid())?;
        (index, Numbering::Manual)
    };

    if numbering.is_some_and(|existing| existing != mode) {
        return Err(TemplateError::MixedNumbering);
    }
    *numbering = Some(mode);

    let argument = match index {
        0 => Argument::Name,
        1 => Argument::Average,
        other => return Err(TemplateError::IndexOutOfRange(other)),
    };

    let spec_str = captures.get(2).map_or("", |m| m.as_str());
    let spec_captures = SPEC_RE.captures(spec_str).ok_or_else(invalid)?;

    let zero_pad = spec_captures.get(1).is_some();
    let width = match spec_captures.get(2) {
        Some(m) => m.as_str().parse::<usize>().map_err(|_| invalid())?,
        None => 0,
    };
    let mut precision = match spec_captures.get(3) {
        Some(m) => Some(m.as_str().parse::<usize>().map_err(|_| invalid())?),
        None => None,
    };

    match (spec_captures.get(4).map(|m| m.as_str()), argument) {
        (Some("f"), Argument::Name) | (Some("s"), Argument::Average) => return Err(invalid()),
        // A bare `f` means six decimals.
        (Some("f"), Argument::Average) if precision.is_none() => precision = Some(6),
        _ => {}
    }

    Ok(Piece::Slot {
        argument,
        spec: FormatSpec {
            zero_pad,
            width,
            precision,
        },
    })
}

fn render_name(name: &str, spec: &FormatSpec) -> String {
    let truncated: String = match spec.precision {
        Some(max_chars) => name.chars().take(max_chars).collect(),
        None => name.to_string(),
    };
    format!("{:<width$}", truncated, width = spec.width)
}

fn render_average(value: f64, spec: &FormatSpec) -> String {
    match (spec.precision, spec.zero_pad) {
        (Some(precision), true) => {
            format!("{:0width$.precision$}", value, width = spec.width, precision = precision)
        }
        (Some(precision), false) => {
            format!("{:>width$.precision$}", value, width = spec.width, precision = precision)
        }
        (None, _) => format!("{:>width$}", float_repr(value), width = spec.width),
    }
}

/// Shortest round-trip text of `value`, switching to exponent notation below
/// `1e-4` and from `1e16` on.
fn float_repr(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
    }

    let plain = value.to_string();
    if plain.contains('.') {
        plain
    } else {
        format!("{}.0", plain)
    }
}
