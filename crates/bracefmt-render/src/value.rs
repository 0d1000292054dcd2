//! The closed value union the render engine dispatches over.
//!
//! Every argument type is mapped into one of six categories before the
//! engine sees it; the `From` impls and constructors here are that mapping.

use std::ffi::CStr;
use std::fmt::Display;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::error::RenderFailure;

/// One formatting argument, reduced to its render category.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Unsigned integers; default presentation is decimal.
    UInt(u64),
    /// Signed integers; default presentation is decimal.
    Int(i64),
    /// Floating point; default presentation is `g`-style.
    Float(f64),
    /// A single byte-wide character; default presentation is the character
    /// itself.
    Byte(u8),
    /// Text; default presentation is the string itself.
    Str(String),
    /// A raw pointer's address; default presentation is zero-padded hex at
    /// the pointer's full width.
    Ptr(usize),
}

impl Value {
    /// Converts any displayable value to text up front.
    ///
    /// A panic inside the `Display` impl is caught here, at the conversion
    /// site, and becomes a marker-wrapped diagnostic rendered at this
    /// argument's substitution positions; it never aborts the whole call.
    pub fn display<T: Display + ?Sized>(value: &T) -> Value {
        match catch_unwind(AssertUnwindSafe(|| value.to_string())) {
            Ok(text) => Value::Str(text),
            Err(payload) => Value::Str(RenderFailure::from_payload(payload.as_ref()).marker()),
        }
    }

    /// Captures a raw pointer's address.
    pub fn pointer<T>(ptr: *const T) -> Value {
        Value::Ptr(ptr as usize)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::Byte(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::UInt(v.into())
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::UInt(v.into())
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt(v)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::UInt(v as u64)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Int(v.into())
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int(v.into())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        // The byte category is a closed one-byte union; wider code points
        // take the numeric path, consistent with the category's own
        // out-of-range fallback.
        match u8::try_from(u32::from(v)) {
            Ok(b) => Value::Byte(b),
            Err(_) => Value::UInt(u32::from(v).into()),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Str(v.clone())
    }
}

impl From<&CStr> for Value {
    fn from(v: &CStr) -> Self {
        Value::Str(v.to_string_lossy().into_owned())
    }
}

impl<T> From<*const T> for Value {
    fn from(v: *const T) -> Self {
        Value::pointer(v)
    }
}

impl<T> From<*mut T> for Value {
    fn from(v: *mut T) -> Self {
        Value::pointer(v)
    }
}

impl From<&serde_json::Value> for Value {
    /// JSON scalars keep their natural category; composites and null render
    /// as their JSON text (empty for null).
    fn from(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Str(String::new()),
            serde_json::Value::Bool(b) => Value::Str(b.to_string()),
            serde_json::Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Str(s.clone()),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                Value::Str(v.to_string())
            }
        }
    }
}
