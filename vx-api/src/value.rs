//! Caller-supplied argument values and their wire rendering

use std::collections::BTreeMap;

/// One argument handed to an operation
///
/// Objects carry named sub-arguments for rules that declare a `key`, for
/// example the `handset`/`hybrid`/`port` options of `call_line`.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<ArgValue>),
    Object(BTreeMap<String, ArgValue>),
}

impl ArgValue {
    /// Type name used in validation messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ArgValue::Null => "null",
            ArgValue::Bool(_) => "boolean",
            ArgValue::Number(_) => "number",
            ArgValue::String(_) => "string",
            ArgValue::List(_) => "list",
            ArgValue::Object(_) => "object",
        }
    }

    /// Named sub-argument of an object argument
    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        match self {
            ArgValue::Object(fields) => fields.get(key),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ArgValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Build an object argument from `(key, value)` pairs, skipping absent values
    pub fn object<I, K>(fields: I) -> ArgValue
    where
        I: IntoIterator<Item = (K, Option<ArgValue>)>,
        K: Into<String>,
    {
        ArgValue::Object(
            fields
                .into_iter()
                .filter_map(|(k, v)| v.map(|v| (k.into(), v)))
                .collect(),
        )
    }
}

/// A compile-time constant usable as a fixed property value or a default
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Number(f64),
    Str(&'static str),
}

impl From<Literal> for ArgValue {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Null => ArgValue::Null,
            Literal::Bool(b) => ArgValue::Bool(b),
            Literal::Number(n) => ArgValue::Number(n),
            Literal::Str(s) => ArgValue::String(s.to_string()),
        }
    }
}

/// Render a value as an LWCP token
///
/// Strings are double-quoted with `\` and `"` escaped, booleans become
/// `TRUE`/`FALSE`, numbers render in decimal, null renders as `NULL`. Lists and
/// objects have no scalar form and render as the empty token.
pub fn stringify(value: &ArgValue) -> String {
    match value {
        ArgValue::String(s) => format!("\"{}\"", escape(s)),
        ArgValue::Bool(true) => "TRUE".to_string(),
        ArgValue::Bool(false) => "FALSE".to_string(),
        ArgValue::Number(n) => format_number(*n),
        ArgValue::Null => "NULL".to_string(),
        ArgValue::List(_) | ArgValue::Object(_) => String::new(),
    }
}

/// Integral values print without a fractional part
pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Conversion into an argument slot; `None` means the argument was not given
pub trait IntoArg {
    fn into_arg(self) -> Option<ArgValue>;
}

macro_rules! impl_into_arg {
    ($($ty:ty => |$v:ident| $body:expr),* $(,)?) => {
        $(
            impl IntoArg for $ty {
                fn into_arg(self) -> Option<ArgValue> {
                    let $v = self;
                    Some($body)
                }
            }
        )*
    };
}

impl_into_arg! {
    ArgValue => |v| v,
    bool => |v| ArgValue::Bool(v),
    f64 => |v| ArgValue::Number(v),
    f32 => |v| ArgValue::Number(f64::from(v)),
    i32 => |v| ArgValue::Number(f64::from(v)),
    i64 => |v| ArgValue::Number(v as f64),
    u8 => |v| ArgValue::Number(f64::from(v)),
    u16 => |v| ArgValue::Number(f64::from(v)),
    u32 => |v| ArgValue::Number(f64::from(v)),
    u64 => |v| ArgValue::Number(v as f64),
    usize => |v| ArgValue::Number(v as f64),
    String => |v| ArgValue::String(v),
    &str => |v| ArgValue::String(v.to_string()),
    &String => |v| ArgValue::String(v.clone()),
    (u32, u32) => |v| ArgValue::List(vec![ArgValue::Number(f64::from(v.0)), ArgValue::Number(f64::from(v.1))]),
}

impl<T: IntoArg> IntoArg for Option<T> {
    fn into_arg(self) -> Option<ArgValue> {
        self.and_then(IntoArg::into_arg)
    }
}

/// Collect positional arguments of mixed types
///
/// ```
/// use vx_api::{args, ArgValue};
///
/// let values = args![3u32, "555-0100"];
/// assert_eq!(values[0], Some(ArgValue::Number(3.0)));
/// ```
#[macro_export]
macro_rules! args {
    () => { ::std::vec::Vec::<::std::option::Option<$crate::ArgValue>>::new() };
    ($($arg:expr),+ $(,)?) => {
        vec![$($crate::IntoArg::into_arg($arg)),+]
    };
}
