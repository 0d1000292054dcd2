//! # bracefmt-render — per-type rendering and alignment
//!
//! The back half of the `bracefmt` formatting engine: given one argument
//! [`Value`] and the [`FormatSpec`] parsed for its substitution, [`render`]
//! produces the text destined for that substitution's output segment.
//!
//! Rendering never fails and never panics by construction. A type code that
//! does not fit the value's category falls back to the category's natural
//! rendering, wrapped in reverse-video error markers so a human scanning the
//! output can spot the bad substitution.
//!
//! # Example
//!
//! ```rust
//! use bracefmt_parser::parse;
//! use bracefmt_render::{render, Value};
//!
//! let parsed = parse("{0:#06x}", 1);
//! let spec = parsed.specs[0].as_ref().unwrap();
//!
//! assert_eq!(render(&Value::Int(255), spec), "0x00ff");
//! ```
//!
//! Each value category has one rendering path:
//!
//! | category | default type | notes |
//! |----------|--------------|-------|
//! | `UInt`   | `d`          | float codes convert through `f64` |
//! | `Int`    | `d`          | sign composed by hand, magnitude in any base |
//! | `Float`  | `g`          | integer codes reinterpret the IEEE bit pattern |
//! | `Byte`   | `c`/`s`      | out-of-range falls back to marked decimal |
//! | `Str`    | `s`          | precision truncates characters, width pads |
//! | `Ptr`    | `x`          | default width 2× the pointer byte width, zero-filled |

mod align;
mod error;
mod numeric;
mod value;

pub use error::RenderFailure;
pub use value::Value;

use bracefmt_parser::{Align, FormatSpec, TypeCode};

use align::Class;
use numeric::{FloatStyle, IntBase};

/// Maps an integer-presentation type code to its digit base. The internal
/// unsigned-decimal fallback shares `Dec` with `d`.
fn int_base(code: TypeCode) -> Option<IntBase> {
    match code {
        TypeCode::Decimal => Some(IntBase::Dec),
        TypeCode::Octal => Some(IntBase::Oct),
        TypeCode::HexLower => Some(IntBase::HexLower),
        TypeCode::HexUpper => Some(IntBase::HexUpper),
        _ => None,
    }
}

fn float_style(code: TypeCode) -> Option<FloatStyle> {
    match code {
        TypeCode::ExpLower => Some(FloatStyle::Exp { upper: false }),
        TypeCode::ExpUpper => Some(FloatStyle::Exp { upper: true }),
        TypeCode::FixedLower => Some(FloatStyle::Fixed { upper: false }),
        TypeCode::FixedUpper => Some(FloatStyle::Fixed { upper: true }),
        TypeCode::GeneralLower => Some(FloatStyle::General { upper: false }),
        TypeCode::GeneralUpper => Some(FloatStyle::General { upper: true }),
        _ => None,
    }
}

/// Renders one value under one spec. The result is the full padded field,
/// marker-wrapped when the requested type code did not fit the category.
pub fn render(value: &Value, spec: &FormatSpec) -> String {
    match value {
        Value::UInt(v) => uint_value(*v, spec),
        Value::Int(v) => int_value(*v, spec),
        Value::Float(v) => float_value(*v, spec),
        Value::Byte(b) => byte_value(*b, spec),
        Value::Str(s) => str_value(s, spec),
        Value::Ptr(p) => ptr_value(*p, spec),
    }
}

fn uint_value(v: u64, spec: &FormatSpec) -> String {
    let code = spec.type_code.unwrap_or(TypeCode::Decimal);
    if let Some(base) = int_base(code) {
        return numeric::unsigned_int(v, spec, base, false);
    }
    if let Some(style) = float_style(code) {
        return numeric::float(v as f64, spec, style, false);
    }
    if code == TypeCode::Char {
        return char_field(v, spec, code);
    }
    numeric::unsigned_int(v, spec, IntBase::Dec, true)
}

fn int_value(v: i64, spec: &FormatSpec) -> String {
    let code = spec.type_code.unwrap_or(TypeCode::Decimal);
    if let Some(base) = int_base(code) {
        return numeric::signed_int(v, spec, base, false);
    }
    if let Some(style) = float_style(code) {
        return numeric::float(v as f64, spec, style, false);
    }
    if code == TypeCode::Char {
        // A negative value can never be a character; fall back to its own
        // signed rendering rather than a wrapped bit pattern.
        return match u64::try_from(v) {
            Ok(u) => char_field(u, spec, code),
            Err(_) => numeric::signed_int(v, spec, IntBase::Dec, true),
        };
    }
    numeric::signed_int(v, spec, IntBase::Dec, true)
}

fn float_value(v: f64, spec: &FormatSpec) -> String {
    let code = spec.type_code.unwrap_or(TypeCode::GeneralLower);
    if let Some(style) = float_style(code) {
        return numeric::float(v, spec, style, false);
    }
    if let Some(base) = int_base(code) {
        // Integer codes expose the IEEE bit pattern in the requested base.
        return numeric::unsigned_int(v.to_bits(), spec, base, false);
    }
    numeric::float(v, spec, FloatStyle::General { upper: false }, true)
}

fn byte_value(b: u8, spec: &FormatSpec) -> String {
    let code = spec.type_code.unwrap_or(TypeCode::Str);
    if let Some(base) = int_base(code) {
        return numeric::unsigned_int(b.into(), spec, base, false);
    }
    char_field(b.into(), spec, code)
}

/// The character path, shared by the byte category and `c`-typed integers.
/// Values past one unsigned byte fall back to marked decimal.
fn char_field(v: u64, spec: &FormatSpec, code: TypeCode) -> String {
    if matches!(code, TypeCode::Char | TypeCode::Str) && v <= u64::from(u8::MAX) {
        // Precision zero prints the empty string, still padded to width.
        if spec.precision == Some(0) {
            return align::aligned("", spec, Class::Char, false);
        }
        if let Some(c) = char::from_u32(v as u32) {
            let mut buf = [0u8; 4];
            return align::aligned(c.encode_utf8(&mut buf), spec, Class::Char, false);
        }
    }
    numeric::unsigned_int(v, spec, IntBase::Dec, true)
}

fn str_value(s: &str, spec: &FormatSpec) -> String {
    let code = spec.type_code.unwrap_or(TypeCode::Str);
    let error = code != TypeCode::Str;
    match spec.precision {
        Some(p) => {
            let truncated: String = s.chars().take(p).collect();
            align::aligned(&truncated, spec, Class::Text, error)
        }
        None => align::aligned(s, spec, Class::Text, error),
    }
}

fn ptr_value(p: usize, spec: &FormatSpec) -> String {
    let mut spec = spec.clone();
    if spec.width.is_none() {
        // Addresses print at full pointer width with leading zeros unless
        // the spec says otherwise.
        spec.width = Some(2 * std::mem::size_of::<usize>());
        spec.fill = '0';
        spec.align = Some(Align::Right);
    }
    let code = spec.type_code.unwrap_or(TypeCode::HexLower);
    if let Some(base) = int_base(code) {
        return numeric::unsigned_int(p as u64, &spec, base, false);
    }
    if let Some(style) = float_style(code) {
        return numeric::float(p as f64, &spec, style, false);
    }
    numeric::unsigned_int(p as u64, &spec, IntBase::Dec, true)
}
