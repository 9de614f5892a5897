//! JSON document format over `serde_json::Value`.
//!
//! Paths are RFC 6901 JSON pointers (`/server/port`), list elements are
//! `/servers/0`, `/servers/1`, .... Values are typed, so conversion inspects the
//! JSON type directly instead of going through strings: a string never parses
//! as a number, an integer parses only into integer types wide enough to hold
//! it, and a fractional number never parses into an integer type.

use serde_json::{Map, Number, Value};

use crate::error::BindfigError;
use crate::format::{Format, FormatValue};

/// Conversion between a scalar type and a JSON value.
///
/// Implement this for your own types to bind them with [`JsonFormat`].
pub trait JsonScalar: Sized {
    /// `None` when `value` has the wrong JSON type or is out of range.
    fn from_json(value: &Value) -> Option<Self>;

    /// `None` when JSON cannot represent this value (e.g. a NaN float).
    fn to_json(&self) -> Option<Value>;
}

impl JsonScalar for bool {
    fn from_json(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn to_json(&self) -> Option<Value> {
        Some(Value::Bool(*self))
    }
}

impl JsonScalar for String {
    fn from_json(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }

    fn to_json(&self) -> Option<Value> {
        Some(Value::String(self.clone()))
    }
}

macro_rules! json_integer {
    ($($ty:ty => $read:ident),* $(,)?) => {$(
        impl JsonScalar for $ty {
            fn from_json(value: &Value) -> Option<Self> {
                value.$read().and_then(|n| <$ty>::try_from(n).ok())
            }

            fn to_json(&self) -> Option<Value> {
                Some(Value::from(*self))
            }
        }
    )*};
}

json_integer! {
    i8 => as_i64,
    i16 => as_i64,
    i32 => as_i64,
    i64 => as_i64,
    isize => as_i64,
    u8 => as_u64,
    u16 => as_u64,
    u32 => as_u64,
    u64 => as_u64,
    usize => as_u64,
}

impl JsonScalar for f64 {
    fn from_json(value: &Value) -> Option<Self> {
        value.as_f64()
    }

    fn to_json(&self) -> Option<Value> {
        Number::from_f64(*self).map(Value::Number)
    }
}

impl JsonScalar for f32 {
    fn from_json(value: &Value) -> Option<Self> {
        let wide = value.as_f64()?;
        let narrow = wide as f32;
        (f64::from(narrow) == wide).then_some(narrow)
    }

    fn to_json(&self) -> Option<Value> {
        Number::from_f64(f64::from(*self)).map(Value::Number)
    }
}

/// Parses from and emits into a `serde_json::Value` document.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl Format for JsonFormat {
    const NAME: &'static str = "[JSON]";
    type Source = Value;
    type Dest = Value;

    fn vector_element_path(&self, vector_path: &str, index: usize) -> String {
        format!("{vector_path}/{index}")
    }
}

impl<T: JsonScalar> FormatValue<T> for JsonFormat {
    fn parse(&self, source: &Value, path: &str) -> Option<T> {
        source.pointer(path).and_then(T::from_json)
    }

    fn emit(&self, dest: &mut Value, path: &str, value: &T) -> Result<(), BindfigError> {
        let json = value
            .to_json()
            .ok_or_else(|| BindfigError::emit::<Self>(path, "cannot be represented in JSON"))?;
        set_pointer(dest, path, json).map_err(|reason| BindfigError::emit::<Self>(path, reason))
    }
}

/// Write `value` at `pointer`, creating intermediate containers.
///
/// A `null` (or missing) step becomes an array when the next token is `0`
/// and an object otherwise. Arrays grow one element at a time: writing at
/// `len` appends, writing past it is an error.
fn set_pointer(root: &mut Value, pointer: &str, value: Value) -> Result<(), String> {
    if pointer.is_empty() {
        *root = value;
        return Ok(());
    }
    let Some(tokens) = pointer.strip_prefix('/') else {
        return Err("is not a JSON pointer".to_string());
    };

    let mut current = root;
    for token in tokens.split('/').map(|t| t.replace("~1", "/").replace("~0", "~")) {
        if current.is_null() {
            *current = if token == "0" {
                Value::Array(Vec::new())
            } else {
                Value::Object(Map::new())
            };
        }
        current = match current {
            Value::Object(map) => map.entry(token).or_insert(Value::Null),
            Value::Array(items) => {
                let index: usize = token
                    .parse()
                    .map_err(|_| format!("cannot index an array with '{token}'"))?;
                if index == items.len() {
                    items.push(Value::Null);
                }
                items
                    .get_mut(index)
                    .ok_or_else(|| format!("would leave a gap before index {index}"))?
            }
            _ => return Err("would descend through a scalar value".to_string()),
        };
    }
    *current = value;
    Ok(())
}
