//! Brace-substitution template parser.
//!
//! This crate provides the front half of the `bracefmt` formatting engine:
//! a single-pass parser that turns a template string containing `{}`-style
//! substitution markers into a list of output segments plus a table of
//! [`FormatSpec`] records describing how each substitution should render.
//!
//! The parser never fails. Malformed substitutions are echoed back into the
//! literal text wrapped in reverse-video escape markers, and scanning resumes
//! just past the matching close brace, so one bad substitution cannot corrupt
//! the rest of the template.
//!
//! # Example
//!
//! ```rust
//! use bracefmt_parser::{parse, ArgIndex};
//!
//! let parsed = parse("value: {0:>8.2f}!", 1);
//!
//! // Literal text, one placeholder slot, trailing literal.
//! assert_eq!(parsed.segments, vec!["value: ", "", "!"]);
//!
//! let spec = parsed.specs[0].as_ref().unwrap();
//! assert_eq!(spec.arg_index, ArgIndex::Pos(0));
//! assert_eq!(spec.width, Some(8));
//! assert_eq!(spec.precision, Some(2));
//! ```
//!
//! # Grammar
//!
//! ```text
//! sub    := '{' index? (':' spec)? '}'
//! index  := digits | 'm'            -- 'm' substitutes the current OS error
//! spec   := mods? width? ('.' digits)? type?
//! mods   := (fill? align)? sign? '#'? '0'?
//! fill   := any char except '{' '}'
//! align  := '<' | '>' | '=' | '^'
//! sign   := '+' | '-' | ' '
//! type   := 's'|'c'|'d'|'o'|'x'|'X'|'e'|'E'|'f'|'F'|'g'|'G'
//! ```
//!
//! Doubled braces (`{{`, `}}`) collapse to a single literal brace. A lone `}`
//! is an error and is echoed back marked. The sign / `#` / `0` modifiers must
//! appear in exactly that order; `0` is shorthand for sign-aware zero padding
//! and conflicts with an explicit alignment.

/// Escape sequence opening an error marker (VT reverse video on).
pub const MARK_START: &str = "\x1b[7m";

/// Escape sequence closing an error marker (VT reverse video off).
pub const MARK_END: &str = "\x1b[27m";

/// Diagnostic token emitted for a substitution whose argument index is out
/// of range.
pub const MISSING_TOKEN: &str = "[missing]";

/// Wraps a diagnostic token in the error marker escapes.
pub fn mark(text: &str) -> String {
    let mut out = String::with_capacity(MARK_START.len() + text.len() + MARK_END.len());
    out.push_str(MARK_START);
    out.push_str(text);
    out.push_str(MARK_END);
    out
}

/// Which argument a substitution draws its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgIndex {
    /// A 0-based position in the supplied argument list.
    Pos(usize),
    /// The `m` sentinel: the description of the OS error code captured at
    /// call entry, independent of the argument list.
    Errno,
}

/// Alignment of a rendered value inside its padded field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// `<` — value first, fill after.
    Left,
    /// `>` — fill first, value after.
    Right,
    /// `^` — fill split around the value, extra fill char on the right.
    Center,
    /// `=` — fill inserted between the sign/base prefix and the digits.
    SignAware,
}

impl Align {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '<' => Some(Align::Left),
            '>' => Some(Align::Right),
            '^' => Some(Align::Center),
            '=' => Some(Align::SignAware),
            _ => None,
        }
    }
}

/// Sign display policy for numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sign {
    /// `-` — sign only for negative values (the default).
    #[default]
    Minus,
    /// `+` — always show a sign.
    Plus,
    /// ` ` — a space where the plus sign would go.
    Space,
}

/// Presentation type requested by the trailing type character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCode {
    /// `s` — plain string.
    Str,
    /// `c` — single character.
    Char,
    /// `d` — decimal integer.
    Decimal,
    /// `o` — octal integer.
    Octal,
    /// `x` / `X` — hexadecimal integer.
    HexLower,
    HexUpper,
    /// `e` / `E` — scientific notation.
    ExpLower,
    ExpUpper,
    /// `f` / `F` — fixed-point notation.
    FixedLower,
    FixedUpper,
    /// `g` / `G` — general floating-point notation.
    GeneralLower,
    GeneralUpper,
}

impl TypeCode {
    /// Maps a type character from the grammar to its code.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            's' => Some(TypeCode::Str),
            'c' => Some(TypeCode::Char),
            'd' => Some(TypeCode::Decimal),
            'o' => Some(TypeCode::Octal),
            'x' => Some(TypeCode::HexLower),
            'X' => Some(TypeCode::HexUpper),
            'e' => Some(TypeCode::ExpLower),
            'E' => Some(TypeCode::ExpUpper),
            'f' => Some(TypeCode::FixedLower),
            'F' => Some(TypeCode::FixedUpper),
            'g' => Some(TypeCode::GeneralLower),
            'G' => Some(TypeCode::GeneralUpper),
            _ => None,
        }
    }

    /// The grammar character for this code.
    pub fn as_char(self) -> char {
        match self {
            TypeCode::Str => 's',
            TypeCode::Char => 'c',
            TypeCode::Decimal => 'd',
            TypeCode::Octal => 'o',
            TypeCode::HexLower => 'x',
            TypeCode::HexUpper => 'X',
            TypeCode::ExpLower => 'e',
            TypeCode::ExpUpper => 'E',
            TypeCode::FixedLower => 'f',
            TypeCode::FixedUpper => 'F',
            TypeCode::GeneralLower => 'g',
            TypeCode::GeneralUpper => 'G',
        }
    }
}

/// One parsed substitution: every modifier governing how a single `{...}`
/// occurrence renders, plus its position in the output and its place in the
/// same-argument chain.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatSpec {
    /// Which argument this substitution renders.
    pub arg_index: ArgIndex,
    /// Padding character, space unless overridden.
    pub fill: char,
    /// Requested alignment; `None` lets the value category choose.
    pub align: Option<Align>,
    /// Sign policy.
    pub sign: Sign,
    /// `#` — prefix octal/hex output with `0o` / `0x` / `0X`.
    pub alternate_form: bool,
    /// Minimum field width.
    pub width: Option<usize>,
    /// Precision: digits for numeric styles, character count for strings.
    pub precision: Option<usize>,
    /// Trailing type character, if any.
    pub type_code: Option<TypeCode>,
    /// Arena index of the next spec sharing this argument index.
    pub next_same_index: Option<usize>,
    /// Index of the output segment this substitution writes into.
    pub target_segment: usize,
}

impl Default for FormatSpec {
    fn default() -> Self {
        FormatSpec {
            arg_index: ArgIndex::Pos(0),
            fill: ' ',
            align: None,
            sign: Sign::Minus,
            alternate_form: false,
            width: None,
            precision: None,
            type_code: None,
            next_same_index: None,
            target_segment: 0,
        }
    }
}

/// The parser's complete output for one template.
///
/// `segments` alternates literal text and empty placeholder slots; the render
/// engine writes each placeholder exactly once, and concatenating the final
/// list yields the output. `specs` is a flat arena: the first `n_args` slots
/// are the chain roots for argument indices `0..n_args`, and specs for an
/// already-seen index are appended past the end and linked through
/// [`FormatSpec::next_same_index`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTemplate {
    pub segments: Vec<String>,
    pub specs: Vec<Option<FormatSpec>>,
    /// Chain root for `{m}` substitutions, if the template has any.
    pub errno_spec: Option<FormatSpec>,
}

/// A successfully parsed substitution, before it is placed in the arena.
struct ParsedSub {
    spec: FormatSpec,
    /// True when the substitution relied on the auto-increment index.
    used_auto: bool,
}

/// Parses a template against an argument count.
///
/// Never fails: malformed substitutions become marked literal echoes,
/// substitutions referencing an argument past `n_args` become a marked
/// `[missing]` token, and everything else produces a live [`FormatSpec`].
pub fn parse(template: &str, n_args: usize) -> ParsedTemplate {
    let mut segments: Vec<String> = Vec::with_capacity(n_args * 2 + 1);
    let mut specs: Vec<Option<FormatSpec>> = vec![None; n_args];
    let mut errno_spec: Option<FormatSpec> = None;
    let mut extras: Vec<FormatSpec> = Vec::new();
    let mut literal = String::new();
    let mut auto_index = 0usize;

    let mut rest = template;
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("{{") {
            literal.push('{');
            rest = after;
        } else if let Some(after) = rest.strip_prefix("}}") {
            literal.push('}');
            rest = after;
        } else if let Some(after) = rest.strip_prefix('}') {
            // A close brace must be doubled even where unambiguous.
            literal.push_str(&mark("}"));
            rest = after;
        } else if let Some(body) = rest.strip_prefix('{') {
            let (parsed, after) = parse_subst(body, auto_index);
            match parsed {
                None => {
                    // Echo the whole malformed substitution, brace included.
                    let consumed = &rest[..rest.len() - after.len()];
                    literal.push_str(&mark(consumed));
                }
                Some(sub) => {
                    if sub.used_auto {
                        auto_index += 1;
                    }
                    let mut spec = sub.spec;
                    match spec.arg_index {
                        ArgIndex::Pos(i) if i >= n_args => {
                            literal.push_str(&mark(MISSING_TOKEN));
                        }
                        _ => {
                            segments.push(std::mem::take(&mut literal));
                            segments.push(String::new());
                            spec.target_segment = segments.len() - 1;
                            let root = match spec.arg_index {
                                ArgIndex::Errno => &mut errno_spec,
                                ArgIndex::Pos(i) => &mut specs[i],
                            };
                            if root.is_none() {
                                *root = Some(spec);
                            } else {
                                extras.push(spec);
                            }
                        }
                    }
                }
            }
            rest = after;
        } else {
            let stop = rest.find(['{', '}']).unwrap_or(rest.len());
            literal.push_str(&rest[..stop]);
            rest = &rest[stop..];
        }
    }
    segments.push(literal);

    // Link repeated-index specs into their chains. Quadratic in chain length,
    // but chains longer than one or two elements are rare.
    for extra in extras {
        let arg = extra.arg_index;
        specs.push(Some(extra));
        let appended = specs.len() - 1;
        let mut cur = match arg {
            ArgIndex::Errno => {
                let Some(root) = errno_spec.as_mut() else { continue };
                match root.next_same_index {
                    None => {
                        root.next_same_index = Some(appended);
                        continue;
                    }
                    Some(n) => n,
                }
            }
            ArgIndex::Pos(i) => i,
        };
        while let Some(n) = specs
            .get(cur)
            .and_then(|s| s.as_ref())
            .and_then(|s| s.next_same_index)
        {
            cur = n;
        }
        if let Some(Some(tail)) = specs.get_mut(cur) {
            tail.next_same_index = Some(appended);
        }
    }

    ParsedTemplate {
        segments,
        specs,
        errno_spec,
    }
}

/// Parses one substitution starting just past the opening brace.
///
/// Returns the parsed spec (or `None` for a malformed one) and the remainder
/// of the input past the matching close brace. On error the remainder is
/// found by a brace-depth-aware scan, so unmatched braces inside the bad
/// substitution do not cause premature resumption.
fn parse_subst(input: &str, auto_index: usize) -> (Option<ParsedSub>, &str) {
    let mut spec = FormatSpec::default();
    let mut used_auto = false;
    let mut rest = input;

    if rest.starts_with(|c: char| c.is_ascii_digit()) {
        let (index, after) = take_number(rest);
        match index {
            // An unrepresentably large index can never name a real
            // argument; saturate and let the missing-argument path mark it.
            Some(i) => spec.arg_index = ArgIndex::Pos(i),
            None => spec.arg_index = ArgIndex::Pos(usize::MAX),
        }
        rest = after;
    } else if let Some(after) = rest.strip_prefix('m') {
        spec.arg_index = ArgIndex::Errno;
        rest = after;
    } else {
        spec.arg_index = ArgIndex::Pos(auto_index);
        used_auto = true;
    }

    if let Some(after) = rest.strip_prefix('}') {
        return (Some(ParsedSub { spec, used_auto }), after);
    }
    let Some(after) = rest.strip_prefix(':') else {
        return (None, skip_malformed(rest));
    };
    rest = after;

    if rest.starts_with('{') || rest.is_empty() {
        return (None, skip_malformed(rest));
    }
    if let Some(after) = rest.strip_prefix('}') {
        // `{:}` is legal and means the same as `{}`.
        return (Some(ParsedSub { spec, used_auto }), after);
    }

    // Fill/align detection: a fill character is signalled by the character
    // after it being a valid alignment option. If the second character is
    // not an alignment option but the first is, the first is the alignment
    // and the fill stays a space.
    let mut chars = rest.chars();
    let (first, second) = match (chars.next(), chars.next()) {
        (Some(a), Some(b)) => (a, b),
        // The spec text ran out before its close brace.
        _ => return (None, skip_malformed(rest)),
    };
    if let Some(align) = Align::from_char(second) {
        spec.fill = first;
        spec.align = Some(align);
        rest = &rest[first.len_utf8() + second.len_utf8()..];
    } else if let Some(align) = Align::from_char(first) {
        spec.align = Some(align);
        rest = &rest[first.len_utf8()..];
    }

    // Sign, alternate form, and zero fill accept exactly this order.
    if let Some(c) = rest.chars().next() {
        let sign = match c {
            '+' => Some(Sign::Plus),
            '-' => Some(Sign::Minus),
            ' ' => Some(Sign::Space),
            _ => None,
        };
        if let Some(sign) = sign {
            spec.sign = sign;
            rest = &rest[1..];
        }
    }
    if let Some(after) = rest.strip_prefix('#') {
        spec.alternate_form = true;
        rest = after;
    }
    if let Some(after) = rest.strip_prefix('0') {
        // `0` is shorthand for `=` alignment with `0` fill, and conflicts
        // with an explicit alignment.
        if spec.align.is_some() {
            return (None, skip_malformed(after));
        }
        spec.align = Some(Align::SignAware);
        spec.fill = '0';
        rest = after;
    }

    if rest.starts_with(|c: char| c.is_ascii_digit()) {
        let (width, after) = take_number(rest);
        let Some(width) = width else {
            return (None, skip_malformed(after));
        };
        spec.width = Some(width);
        rest = after;
    }

    if let Some(after) = rest.strip_prefix('.') {
        if !after.starts_with(|c: char| c.is_ascii_digit()) {
            return (None, skip_malformed(after));
        }
        let (precision, after) = take_number(after);
        let Some(precision) = precision else {
            return (None, skip_malformed(after));
        };
        spec.precision = Some(precision);
        rest = after;
    }

    if let Some(c) = rest.chars().next() {
        if let Some(code) = TypeCode::from_char(c) {
            spec.type_code = Some(code);
            rest = &rest[1..];
        }
    }

    match rest.strip_prefix('}') {
        Some(after) => (Some(ParsedSub { spec, used_auto }), after),
        None => (None, skip_malformed(rest)),
    }
}

/// Consumes a run of ASCII digits. Returns `None` for a value that does not
/// fit in `usize`, along with the remaining input either way.
fn take_number(input: &str) -> (Option<usize>, &str) {
    let end = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    (input[..end].parse().ok(), &input[end..])
}

/// Skips past the close brace matching an already-malformed substitution,
/// tracking nested brace depth. Returns the input past that brace, or the
/// empty remainder if the template ends first.
fn skip_malformed(input: &str) -> &str {
    let mut depth = 1usize;
    let mut rest = input;
    while let Some(c) = rest.chars().next() {
        rest = &rest[c.len_utf8()..];
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
    }
    rest
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn brace_free_text() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 .,:;!?'\"_-]{0,40}"
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn brace_free_templates_pass_through(text in brace_free_text()) {
            let parsed = parse(&text, 0);
            prop_assert_eq!(parsed.segments, vec![text]);
        }

        #[test]
        fn never_panics_on_arbitrary_input(text in "\\PC{0,60}", n in 0usize..4) {
            let parsed = parse(&text, n);
            // The arena always reserves the chain-root slots.
            prop_assert!(parsed.specs.len() >= n);
            prop_assert!(!parsed.segments.is_empty());
        }

        #[test]
        fn assembled_specs_parse(
            fill in prop::option::of("[a-zA-Z*#@~]"),
            align in prop::option::of(prop::sample::select(vec!['<', '>', '^', '='])),
            sign in prop::option::of(prop::sample::select(vec!['+', '-', ' '])),
            width in prop::option::of(1usize..100),
            precision in prop::option::of(0usize..100),
            code in prop::option::of(prop::sample::select(
                "scdoxXeEfFgG".chars().collect::<Vec<_>>()
            )),
        ) {
            // A fill requires an alignment to follow it.
            let fill = align.and(fill);
            let mut body = String::from("{:");
            if let Some(f) = &fill { body.push_str(f); }
            if let Some(a) = align { body.push(a); }
            if let Some(s) = sign { body.push(s); }
            if let Some(w) = width { body.push_str(&w.to_string()); }
            if let Some(p) = precision { body.push_str(&format!(".{}", p)); }
            if let Some(c) = code { body.push(c); }
            body.push('}');

            let parsed = parse(&body, 1);
            let spec = parsed.specs[0].as_ref().expect("spec should parse");
            match align {
                Some(a) => prop_assert_eq!(spec.align, Align::from_char(a)),
                None => prop_assert_eq!(spec.align, None),
            }
            prop_assert_eq!(spec.width, width);
            prop_assert_eq!(spec.precision, precision);
            prop_assert_eq!(spec.type_code, code.and_then(TypeCode::from_char));
        }

        #[test]
        fn doubled_braces_always_collapse(a in brace_free_text(), b in brace_free_text()) {
            let template = format!("{}{{{{{}}}}}", a, b);
            let parsed = parse(&template, 0);
            prop_assert_eq!(parsed.segments, vec![format!("{}{{{}}}", a, b)]);
        }
    }
}
