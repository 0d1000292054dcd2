//! Numeric rendering: sign, base prefix, digits, and float styles.
//!
//! The sign is always composed by hand rather than delegated to the digit
//! backend: negative octal/hex renders as `-` followed by the magnitude in
//! that base, never a twos-complement bit pattern, and the most negative
//! value of a signed type keeps its full magnitude via the unsigned absolute
//! value.

use bracefmt_parser::{FormatSpec, Sign};

use crate::align::{aligned, Class};

/// Digit base for integer output. `d` and the internal unsigned-decimal
/// fallback both map to `Dec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IntBase {
    Dec,
    Oct,
    HexLower,
    HexUpper,
}

/// Presentation style for float output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FloatStyle {
    /// `e` / `E` — scientific, decimal point always visible.
    Exp { upper: bool },
    /// `f` / `F` — fixed-point, decimal point always visible.
    Fixed { upper: bool },
    /// `g` / `G` — shortest of fixed/scientific, trailing zeros stripped.
    General { upper: bool },
}

impl FloatStyle {
    fn upper(self) -> bool {
        match self {
            FloatStyle::Exp { upper } => upper,
            FloatStyle::Fixed { upper } => upper,
            FloatStyle::General { upper } => upper,
        }
    }
}

/// Renders an unsigned integer into its aligned field.
pub(crate) fn unsigned_int(mag: u64, spec: &FormatSpec, base: IntBase, error: bool) -> String {
    int_magnitude(false, mag, spec, base, error)
}

/// Renders a signed integer into its aligned field.
pub(crate) fn signed_int(v: i64, spec: &FormatSpec, base: IntBase, error: bool) -> String {
    int_magnitude(v < 0, v.unsigned_abs(), spec, base, error)
}

fn int_magnitude(neg: bool, mag: u64, spec: &FormatSpec, base: IntBase, error: bool) -> String {
    let digits = match base {
        IntBase::Dec => mag.to_string(),
        IntBase::Oct => format!("{:o}", mag),
        IntBase::HexLower => format!("{:x}", mag),
        IntBase::HexUpper => format!("{:X}", mag),
    };
    let prefix = if spec.alternate_form {
        match base {
            IntBase::Dec => "",
            IntBase::Oct => "0o",
            IntBase::HexLower => "0x",
            IntBase::HexUpper => "0X",
        }
    } else {
        ""
    };
    let body = assemble(neg, spec, prefix, &digits);
    aligned(
        &body,
        spec,
        Class::Num {
            prefixed: !prefix.is_empty(),
        },
        error,
    )
}

/// Renders a float into its aligned field. Precision defaults to 6: digits
/// after the point for `e`/`f`, significant digits for `g`.
pub(crate) fn float(v: f64, spec: &FormatSpec, style: FloatStyle, error: bool) -> String {
    let precision = spec.precision.unwrap_or(6);
    let neg = v < 0.0;
    let mag = v.abs();
    let mut body = if mag.is_nan() {
        "nan".to_string()
    } else if mag.is_infinite() {
        "inf".to_string()
    } else {
        match style {
            FloatStyle::Exp { .. } => scientific(mag, precision),
            FloatStyle::Fixed { .. } => fixed(mag, precision),
            FloatStyle::General { .. } => general(mag, precision),
        }
    };
    if style.upper() {
        body.make_ascii_uppercase();
    }
    let body = assemble(neg, spec, "", &body);
    aligned(&body, spec, Class::Num { prefixed: false }, error)
}

/// Composes sign, base prefix, and digits. Non-negative values take a `+` or
/// space only when the spec asks for one.
fn assemble(neg: bool, spec: &FormatSpec, prefix: &str, digits: &str) -> String {
    let mut out = String::with_capacity(1 + prefix.len() + digits.len());
    if neg {
        out.push('-');
    } else {
        match spec.sign {
            Sign::Plus => out.push('+'),
            Sign::Space => out.push(' '),
            Sign::Minus => {}
        }
    }
    out.push_str(prefix);
    out.push_str(digits);
    out
}

/// `e`-style: mantissa with `prec` fractional digits, signed two-digit
/// exponent, decimal point always present.
fn scientific(v: f64, prec: usize) -> String {
    let s = format!("{:.*e}", prec, v);
    let Some((mantissa, exp)) = s.split_once('e') else {
        return s;
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    let mut out = String::with_capacity(s.len() + 3);
    out.push_str(mantissa);
    if !out.contains('.') {
        out.push('.');
    }
    push_exponent(&mut out, exp);
    out
}

/// `f`-style: `prec` fractional digits, decimal point always present.
fn fixed(v: f64, prec: usize) -> String {
    let mut out = format!("{:.*}", prec, v);
    if !out.contains('.') {
        out.push('.');
    }
    out
}

/// `g`-style: `prec` significant digits (0 treated as 1), scientific when
/// the decimal exponent is below -4 or at least `prec`, trailing zeros
/// stripped, no forced decimal point.
fn general(v: f64, prec: usize) -> String {
    let p = prec.max(1);
    let probe = format!("{:.*e}", p - 1, v);
    let Some((mantissa, exp)) = probe.split_once('e') else {
        return probe;
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    if exp < -4 || exp >= p as i32 {
        let mut out = strip_trailing_zeros(mantissa);
        push_exponent(&mut out, exp);
        out
    } else {
        let decimals = (p as i32 - 1 - exp).max(0) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, v))
    }
}

fn push_exponent(out: &mut String, exp: i32) {
    out.push('e');
    out.push(if exp < 0 { '-' } else { '+' });
    let mag = exp.unsigned_abs();
    if mag < 10 {
        out.push('0');
    }
    out.push_str(&mag.to_string());
}

/// Removes trailing fractional zeros, and the point itself if nothing
/// remains after it. Integral strings pass through untouched.
fn strip_trailing_zeros(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracefmt_parser::parse;

    fn spec_for(template: &str) -> FormatSpec {
        parse(template, 1).specs[0].clone().unwrap()
    }

    mod integers {
        use super::*;

        #[test]
        fn plain_decimal() {
            let spec = spec_for("{}");
            assert_eq!(unsigned_int(42, &spec, IntBase::Dec, false), "42");
            assert_eq!(signed_int(-42, &spec, IntBase::Dec, false), "-42");
        }

        #[test]
        fn forced_plus_sign() {
            let spec = spec_for("{:+d}");
            assert_eq!(signed_int(5, &spec, IntBase::Dec, false), "+5");
            assert_eq!(signed_int(-5, &spec, IntBase::Dec, false), "-5");
        }

        #[test]
        fn space_sign() {
            let spec = spec_for("{: d}");
            assert_eq!(signed_int(5, &spec, IntBase::Dec, false), " 5");
            assert_eq!(signed_int(-5, &spec, IntBase::Dec, false), "-5");
        }

        #[test]
        fn negative_hex_is_signed_magnitude() {
            let spec = spec_for("{:x}");
            assert_eq!(signed_int(-255, &spec, IntBase::HexLower, false), "-ff");
        }

        #[test]
        fn alternate_form_prefixes() {
            assert_eq!(
                unsigned_int(255, &spec_for("{:#x}"), IntBase::HexLower, false),
                "0xff"
            );
            assert_eq!(
                unsigned_int(255, &spec_for("{:#X}"), IntBase::HexUpper, false),
                "0XFF"
            );
            assert_eq!(
                unsigned_int(8, &spec_for("{:#o}"), IntBase::Oct, false),
                "0o10"
            );
        }

        #[test]
        fn alternate_prefix_follows_sign() {
            let spec = spec_for("{:+#x}");
            assert_eq!(signed_int(-255, &spec, IntBase::HexLower, false), "-0xff");
            assert_eq!(signed_int(255, &spec, IntBase::HexLower, false), "+0xff");
        }

        #[test]
        fn most_negative_value_keeps_magnitude() {
            let spec = spec_for("{}");
            assert_eq!(
                signed_int(i64::MIN, &spec, IntBase::Dec, false),
                "-9223372036854775808"
            );
        }

        #[test]
        fn zero_padding_goes_inside_sign() {
            let spec = spec_for("{:06d}");
            assert_eq!(signed_int(-42, &spec, IntBase::Dec, false), "-00042");
            assert_eq!(signed_int(3, &spec, IntBase::Dec, false), "000003");
        }

        #[test]
        fn zero_padding_goes_inside_prefix() {
            let spec = spec_for("{:#012x}");
            assert_eq!(
                unsigned_int(255, &spec, IntBase::HexLower, false),
                "0x00000000ff"
            );
        }

        #[test]
        fn error_marks_wrap_field() {
            let spec = spec_for("{:>6}");
            let out = unsigned_int(7, &spec, IntBase::Dec, true);
            assert_eq!(
                out,
                format!(
                    "{}     7{}",
                    bracefmt_parser::MARK_START,
                    bracefmt_parser::MARK_END
                )
            );
        }
    }

    mod floats {
        use super::*;

        #[test]
        fn fixed_default_precision() {
            let spec = spec_for("{:f}");
            assert_eq!(float(1.0, &spec, FloatStyle::Fixed { upper: false }, false), "1.000000");
        }

        #[test]
        fn fixed_explicit_precision() {
            let spec = spec_for("{:.2f}");
            assert_eq!(
                float(3.14159, &spec, FloatStyle::Fixed { upper: false }, false),
                "3.14"
            );
        }

        #[test]
        fn fixed_zero_precision_keeps_point() {
            let spec = spec_for("{:.0f}");
            assert_eq!(float(3.0, &spec, FloatStyle::Fixed { upper: false }, false), "3.");
        }

        #[test]
        fn scientific_two_digit_exponent() {
            let spec = spec_for("{:e}");
            assert_eq!(
                float(244.0, &spec, FloatStyle::Exp { upper: false }, false),
                "2.440000e+02"
            );
            assert_eq!(
                float(0.001, &spec, FloatStyle::Exp { upper: false }, false),
                "1.000000e-03"
            );
        }

        #[test]
        fn scientific_zero_precision_keeps_point() {
            let spec = spec_for("{:.0e}");
            assert_eq!(float(244.0, &spec, FloatStyle::Exp { upper: false }, false), "2.e+02");
        }

        #[test]
        fn scientific_uppercase() {
            let spec = spec_for("{:E}");
            assert_eq!(
                float(244.0, &spec, FloatStyle::Exp { upper: true }, false),
                "2.440000E+02"
            );
        }

        #[test]
        fn general_strips_trailing_zeros() {
            let spec = spec_for("{:g}");
            assert_eq!(float(100.0, &spec, FloatStyle::General { upper: false }, false), "100");
            assert_eq!(
                float(0.03125, &spec, FloatStyle::General { upper: false }, false),
                "0.03125"
            );
        }

        #[test]
        fn general_switches_to_scientific() {
            let spec = spec_for("{:g}");
            assert_eq!(
                float(0.00001, &spec, FloatStyle::General { upper: false }, false),
                "1e-05"
            );
            assert_eq!(
                float(1234567.0, &spec, FloatStyle::General { upper: false }, false),
                "1.23457e+06"
            );
        }

        #[test]
        fn general_precision_is_significant_digits() {
            let spec = spec_for("{:.3g}");
            assert_eq!(
                float(3.14159, &spec, FloatStyle::General { upper: false }, false),
                "3.14"
            );
        }

        #[test]
        fn general_zero() {
            let spec = spec_for("{:g}");
            assert_eq!(float(0.0, &spec, FloatStyle::General { upper: false }, false), "0");
        }

        #[test]
        fn negative_float_sign() {
            let spec = spec_for("{:.1f}");
            assert_eq!(float(-2.5, &spec, FloatStyle::Fixed { upper: false }, false), "-2.5");
        }

        #[test]
        fn nonfinite_values() {
            let spec = spec_for("{:f}");
            assert_eq!(
                float(f64::INFINITY, &spec, FloatStyle::Fixed { upper: false }, false),
                "inf"
            );
            assert_eq!(
                float(f64::NEG_INFINITY, &spec, FloatStyle::Fixed { upper: false }, false),
                "-inf"
            );
            assert_eq!(
                float(f64::NAN, &spec, FloatStyle::Fixed { upper: false }, false),
                "nan"
            );
        }

        #[test]
        fn nonfinite_uppercase() {
            let spec = spec_for("{:F}");
            assert_eq!(
                float(f64::INFINITY, &spec, FloatStyle::Fixed { upper: true }, false),
                "INF"
            );
        }

        #[test]
        fn float_zero_pad() {
            let spec = spec_for("{:08.2f}");
            assert_eq!(
                float(-2.5, &spec, FloatStyle::Fixed { upper: false }, false),
                "-0002.50"
            );
        }
    }
}
