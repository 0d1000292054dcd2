//! # bracefmt — brace-style formatting that never panics
//!
//! `bracefmt` renders `{}`-style templates against a heterogeneous argument
//! list, in the spirit of Python's `str.format`, with one hard guarantee:
//! [`format`] never panics, whatever the template or arguments. Malformed
//! substitutions, missing arguments, and type/code mismatches are rendered
//! in place as reverse-video-marked diagnostics, and the rest of the output
//! is unaffected.
//!
//! ## Quick start
//!
//! ```rust
//! use bracefmt::fmt;
//!
//! assert_eq!(fmt!("{} {}!", "hello", "world"), "hello world!");
//! assert_eq!(fmt!("{1}-{0}", 1, 2), "2-1");
//! assert_eq!(fmt!("{:+d} {:#x} {:05d}", 5, 255, 3), "+5 0xff 00003");
//! assert_eq!(fmt!("{:.2f}", 3.14159), "3.14");
//! assert_eq!(fmt!("{0} {0}", "x"), "x x");
//! ```
//!
//! The macro is a thin veneer over the slice form:
//!
//! ```rust
//! use bracefmt::{format, Value};
//!
//! let out = format("{:>6}", &[Value::from("ab")]);
//! assert_eq!(out, "    ab");
//! ```
//!
//! ## Error markers
//!
//! Anything that cannot render correctly is wrapped in a fixed pair of
//! reverse-video escapes so it stands out on a terminal without crashing the
//! program. [`format_plain`] strips those escapes (and any other ANSI
//! sequences) for log files and other non-terminal consumers:
//!
//! ```rust
//! use bracefmt::{format_plain, Value};
//!
//! let out = format_plain("{5}", &[Value::from(1)]);
//! assert_eq!(out, "[missing]");
//! ```
//!
//! ## The `m` index
//!
//! `{m}` substitutes the description of the OS error code current when
//! [`format`] was entered, like `%m` in glibc's `printf`:
//!
//! ```rust
//! use bracefmt::fmt;
//!
//! let _ = std::fs::metadata("/no/such/path");
//! let msg = fmt!("open failed: {m}");
//! assert!(msg.starts_with("open failed: "));
//! ```

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

pub use bracefmt_parser::{
    parse, Align, ArgIndex, FormatSpec, ParsedTemplate, Sign, TypeCode, MARK_END, MARK_START,
};
pub use bracefmt_render::{render, RenderFailure, Value};

/// Renders `template` against `args`. Never panics.
///
/// The current OS error code is captured as the very first step, before the
/// template is even parsed, so `{m}` substitutions cannot be clobbered by
/// the engine's own work. Callers that want `{m}` must not run other
/// error-code-producing operations between the failing call and this one;
/// the engine cannot see errno changes that happen before it is entered.
pub fn format(template: &str, args: &[Value]) -> String {
    let errno_text = std::io::Error::last_os_error().to_string();
    match catch_unwind(AssertUnwindSafe(|| assemble(template, args, &errno_text))) {
        Ok(out) => out,
        // Parse or final assembly escaped containment: the whole output
        // becomes one marker.
        Err(payload) => recover(payload.as_ref()),
    }
}

/// [`format`], then strips the error markers and any other ANSI escapes.
pub fn format_plain(template: &str, args: &[Value]) -> String {
    console::strip_ansi_codes(&format(template, args)).into_owned()
}

/// Formats with auto-converted arguments: `fmt!("{} {}", 1, "two")`.
///
/// Each argument goes through [`Value::from`]; values needing an explicit
/// constructor ([`Value::display`], [`Value::pointer`]) can be passed
/// pre-built since `Value` converts to itself.
#[macro_export]
macro_rules! fmt {
    ($template:expr $(,)?) => {
        $crate::format($template, &[])
    };
    ($template:expr, $($arg:expr),+ $(,)?) => {
        $crate::format($template, &[$($crate::Value::from($arg)),+])
    };
}

/// Parses the template, resolves `{m}`, renders every argument chain, and
/// concatenates the segments.
fn assemble(template: &str, args: &[Value], errno_text: &str) -> String {
    let mut parsed = parse(template, args.len());
    let ParsedTemplate {
        segments,
        specs,
        errno_spec,
    } = &mut parsed;

    // The OS error renders first, before any argument is inspected.
    if let Some(root) = errno_spec.as_ref() {
        let errno_value = Value::Str(errno_text.to_string());
        fill_chain(segments, specs, root, &errno_value);
    }
    for (index, value) in args.iter().enumerate() {
        if let Some(root) = specs.get(index).and_then(|slot| slot.as_ref()) {
            fill_chain(segments, specs, root, value);
        }
    }
    segments.concat()
}

/// Renders one argument into every substitution in its chain. Each chain
/// element is contained on its own, so one failing render cannot disturb
/// the neighboring substitutions.
fn fill_chain(
    segments: &mut [String],
    specs: &[Option<FormatSpec>],
    root: &FormatSpec,
    value: &Value,
) {
    let mut spec = root;
    loop {
        let text = match catch_unwind(AssertUnwindSafe(|| render(value, spec))) {
            Ok(text) => text,
            Err(payload) => recover(payload.as_ref()),
        };
        if let Some(slot) = segments.get_mut(spec.target_segment) {
            *slot = text;
        }
        match spec
            .next_same_index
            .and_then(|i| specs.get(i))
            .and_then(|slot| slot.as_ref())
        {
            Some(next) => spec = next,
            None => break,
        }
    }
}

/// Turns an escaped panic into a marker. Failing *here* means the no-panic
/// contract cannot be honored at all, and the process terminates.
fn recover(payload: &(dyn Any + Send)) -> String {
    match catch_unwind(AssertUnwindSafe(|| {
        RenderFailure::from_payload(payload).marker()
    })) {
        Ok(marker) => marker,
        Err(_) => std::process::abort(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_form_matches_macro() {
        assert_eq!(
            format("{} {}", &[Value::from(1), Value::from(2)]),
            fmt!("{} {}", 1, 2)
        );
    }

    #[test]
    fn empty_argument_list() {
        assert_eq!(fmt!("plain"), "plain");
    }

    #[test]
    fn trailing_comma_accepted() {
        assert_eq!(fmt!("{}", 1,), "1");
    }

    #[test]
    fn prebuilt_values_pass_through() {
        let v = Value::display(&3.5f64);
        assert_eq!(format("{}", &[v]), "3.5");
    }

    #[test]
    fn unused_arguments_are_ignored() {
        assert_eq!(fmt!("{0}", 1, 2, 3), "1");
    }
}
