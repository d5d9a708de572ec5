//! Command argument values and flattening
//!
//! Arguments travel as plain text: each scalar is written with its natural
//! textual form and nested lists are expanded inline, all joined by commas.
//! Nothing is quoted or escaped, so a string containing `,` splits into
//! several arguments on the game side.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single command argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Nested arguments, flattened inline on the wire
    List(Vec<Value>),
}

impl Value {
    /// Interpret a command-line token as an integer, then a float, else a string
    pub fn infer(token: &str) -> Self {
        if let Ok(n) = token.parse::<i64>() {
            return Value::Int(n);
        }
        // "inf" / "nan" parse as floats but are far more likely to be names
        if token.bytes().any(|b| b.is_ascii_digit()) {
            if let Ok(f) = token.parse::<f64>() {
                return Value::Float(f);
            }
        }
        Value::Str(token.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => f.write_str(&flatten(items)),
        }
    }
}

/// Join arguments with commas, expanding nested lists recursively
pub fn flatten(values: &[Value]) -> String {
    let mut parts = Vec::new();
    collect_scalars(values, &mut parts);
    parts.join(",")
}

fn collect_scalars(values: &[Value], out: &mut Vec<String>) {
    for value in values {
        match value {
            Value::List(items) => collect_scalars(items, out),
            scalar => out.push(scalar.to_string()),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Int(i64::from(n))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

// Integers wider than `Int` keep their exact digits as text when out of range
macro_rules! impl_from_wide_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    match i64::try_from(n) {
                        Ok(n) => Value::Int(n),
                        Err(_) => Value::Str(n.to_string()),
                    }
                }
            }
        )*
    };
}

impl_from_wide_int!(isize, usize, u64, i128, u128);

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(f64::from(x))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Str(c.to_string())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for Value {
    fn from(items: &[T]) -> Self {
        Value::List(items.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

/// Build a `Vec<Value>` from heterogeneous arguments
///
/// ```
/// use mcpi_core::{args, flatten};
///
/// let a = args!["a", vec![1, 2], 0.5];
/// assert_eq!(flatten(&a), "a,1,2,0.5");
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($arg)),+]
    };
}
