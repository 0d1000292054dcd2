//! Field alignment and padding.
//!
//! Applied after a value has been rendered to a plain string, uniformly for
//! every value category. Width comparisons use display width so wide (CJK)
//! characters pad correctly.

use bracefmt_parser::{Align, FormatSpec, Sign, MARK_END, MARK_START};
use unicode_width::UnicodeWidthStr;

/// What kind of string is being aligned. Determines the default alignment
/// and how sign-aware padding finds the glued-left prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Class {
    /// Strings; default left.
    Text,
    /// Single characters; default left.
    Char,
    /// Numeric output; default right. `prefixed` is true when an
    /// alternate-form base prefix (`0o`/`0x`/`0X`) is present.
    Num { prefixed: bool },
}

/// Pads `s` into its field per `spec`, wrapping the whole padded field in
/// error markers when `error` is set (markers go outside the padding).
pub(crate) fn aligned(s: &str, spec: &FormatSpec, class: Class, error: bool) -> String {
    let mut out = String::with_capacity(s.len() + spec.width.unwrap_or(0));
    if error {
        out.push_str(MARK_START);
    }

    let visible = s.width();
    match spec.width {
        Some(width) if width > visible => {
            let pad = width - visible;
            let align = spec.align.unwrap_or(match class {
                Class::Text | Class::Char => Align::Left,
                Class::Num { .. } => Align::Right,
            });
            match align {
                Align::Left => {
                    out.push_str(s);
                    push_fill(&mut out, spec.fill, pad);
                }
                Align::Right => {
                    push_fill(&mut out, spec.fill, pad);
                    out.push_str(s);
                }
                Align::Center => {
                    // The odd fill character goes on the right.
                    push_fill(&mut out, spec.fill, pad / 2);
                    out.push_str(s);
                    push_fill(&mut out, spec.fill, pad / 2 + pad % 2);
                }
                Align::SignAware => {
                    let lead = leading_len(s, spec, class);
                    out.push_str(&s[..lead]);
                    push_fill(&mut out, spec.fill, pad);
                    out.push_str(&s[lead..]);
                }
            }
        }
        _ => out.push_str(s),
    }

    if error {
        out.push_str(MARK_END);
    }
    out
}

fn push_fill(out: &mut String, fill: char, count: usize) {
    out.extend(std::iter::repeat(fill).take(count));
}

/// Byte length of the sign/prefix run that stays glued to the left margin
/// under `=` alignment: the sign character plus the full alternate-form
/// prefix, up to 3 bytes (`-0x`). Sign and prefix are ASCII, so bytes and
/// characters coincide.
fn leading_len(s: &str, spec: &FormatSpec, class: Class) -> usize {
    let Class::Num { prefixed } = class else {
        return 0;
    };
    let mut lead = 0;
    if s.starts_with('-') || spec.sign != Sign::Minus {
        lead = 1;
    }
    if prefixed {
        lead += 2;
    }
    lead.min(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracefmt_parser::parse;

    fn spec_for(template: &str) -> FormatSpec {
        parse(template, 1).specs[0].clone().unwrap()
    }

    #[test]
    fn no_width_passes_through() {
        let spec = spec_for("{}");
        assert_eq!(aligned("abc", &spec, Class::Text, false), "abc");
    }

    #[test]
    fn width_already_met_passes_through() {
        let spec = spec_for("{:3}");
        assert_eq!(aligned("abcd", &spec, Class::Text, false), "abcd");
    }

    #[test]
    fn default_left_for_text() {
        let spec = spec_for("{:5}");
        assert_eq!(aligned("ab", &spec, Class::Text, false), "ab   ");
    }

    #[test]
    fn default_right_for_numbers() {
        let spec = spec_for("{:5}");
        assert_eq!(
            aligned("42", &spec, Class::Num { prefixed: false }, false),
            "   42"
        );
    }

    #[test]
    fn center_puts_extra_fill_right() {
        let spec = spec_for("{:^5}");
        assert_eq!(aligned("ab", &spec, Class::Text, false), " ab  ");
    }

    #[test]
    fn center_with_custom_fill() {
        let spec = spec_for("{:*^6}");
        assert_eq!(aligned("ab", &spec, Class::Text, false), "**ab**");
    }

    #[test]
    fn sign_aware_splits_after_sign() {
        let spec = spec_for("{:06}");
        assert_eq!(
            aligned("-42", &spec, Class::Num { prefixed: false }, false),
            "-00042"
        );
    }

    #[test]
    fn sign_aware_splits_after_prefix() {
        let spec = spec_for("{:#010x}");
        assert_eq!(
            aligned("0xff", &spec, Class::Num { prefixed: true }, false),
            "0x000000ff"
        );
    }

    #[test]
    fn sign_aware_negative_with_prefix_keeps_three_leading() {
        let spec = spec_for("{:#010x}");
        assert_eq!(
            aligned("-0xff", &spec, Class::Num { prefixed: true }, false),
            "-0x00000ff"
        );
    }

    #[test]
    fn sign_aware_space_sign() {
        let spec = spec_for("{: 06}");
        assert_eq!(
            aligned(" 42", &spec, Class::Num { prefixed: false }, false),
            " 00042"
        );
    }

    #[test]
    fn sign_aware_on_text_pads_in_front() {
        let spec = spec_for("{:=5}");
        assert_eq!(aligned("ab", &spec, Class::Text, false), "   ab");
    }

    #[test]
    fn error_markers_wrap_padding() {
        let spec = spec_for("{:>5}");
        let out = aligned("ab", &spec, Class::Text, true);
        assert_eq!(out, format!("{}   ab{}", MARK_START, MARK_END));
    }

    #[test]
    fn wide_characters_count_display_width() {
        // "你好" is 4 columns wide, so only one fill column remains.
        let spec = spec_for("{:5}");
        assert_eq!(aligned("你好", &spec, Class::Text, false), "你好 ");
    }
}
