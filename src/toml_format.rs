//! TOML document format over `toml::Table`.
//!
//! Paths are dotted keys (`server.port`); empty segments are skipped, so a
//! schema can build paths as `format!("{path}.port")` and still work at the
//! root where `path` is empty. List elements are `tags.0`, `tags.1`, ....
//!
//! TOML has no null, so emitted arrays can only grow one element at a time
//! in index order. That is what list emission does.

use toml::map::Entry;
use toml::{Table, Value};

use crate::error::BindfigError;
use crate::format::{Format, FormatValue};

/// Conversion between a scalar type and a TOML value.
pub trait TomlScalar: Sized {
    fn from_toml(value: &Value) -> Option<Self>;

    /// `None` when TOML cannot hold the value (e.g. a `u64` above `i64::MAX`).
    fn to_toml(&self) -> Option<Value>;
}

impl TomlScalar for bool {
    fn from_toml(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn to_toml(&self) -> Option<Value> {
        Some(Value::Boolean(*self))
    }
}

impl TomlScalar for String {
    fn from_toml(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }

    fn to_toml(&self) -> Option<Value> {
        Some(Value::String(self.clone()))
    }
}

macro_rules! toml_integer {
    ($($ty:ty),* $(,)?) => {$(
        impl TomlScalar for $ty {
            fn from_toml(value: &Value) -> Option<Self> {
                value.as_integer().and_then(|n| <$ty>::try_from(n).ok())
            }

            fn to_toml(&self) -> Option<Value> {
                i64::try_from(*self).ok().map(Value::Integer)
            }
        }
    )*};
}

toml_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl TomlScalar for f64 {
    fn from_toml(value: &Value) -> Option<Self> {
        match value {
            Value::Float(f) => Some(*f),
            Value::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    fn to_toml(&self) -> Option<Value> {
        Some(Value::Float(*self))
    }
}

impl TomlScalar for f32 {
    fn from_toml(value: &Value) -> Option<Self> {
        let wide = f64::from_toml(value)?;
        let narrow = wide as f32;
        (f64::from(narrow) == wide).then_some(narrow)
    }

    fn to_toml(&self) -> Option<Value> {
        Some(Value::Float(f64::from(*self)))
    }
}

/// Parses from and emits into a `toml::Table`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlFormat;

impl Format for TomlFormat {
    const NAME: &'static str = "[TOML]";
    type Source = Table;
    type Dest = Table;

    fn vector_element_path(&self, vector_path: &str, index: usize) -> String {
        format!("{vector_path}.{index}")
    }
}

impl<T: TomlScalar> FormatValue<T> for TomlFormat {
    fn parse(&self, source: &Table, path: &str) -> Option<T> {
        get_dotted(source, path).and_then(T::from_toml)
    }

    fn emit(&self, dest: &mut Table, path: &str, value: &T) -> Result<(), BindfigError> {
        let value = value
            .to_toml()
            .ok_or_else(|| BindfigError::emit::<Self>(path, "cannot be represented in TOML"))?;
        set_dotted(dest, path, value).map_err(|reason| BindfigError::emit::<Self>(path, reason))
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('.').filter(|s| !s.is_empty()).collect()
}

fn get_dotted<'a>(root: &'a Table, path: &str) -> Option<&'a Value> {
    let segments = segments(path);
    let (first, rest) = segments.split_first()?;
    let mut current = root.get(*first)?;
    for segment in rest {
        current = match current {
            Value::Table(table) => table.get(*segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn set_dotted(root: &mut Table, path: &str, value: Value) -> Result<(), String> {
    let segments = segments(path);
    if segments.is_empty() {
        return Err("is not a key".to_string());
    }
    let mut doc = Value::Table(std::mem::take(root));
    let result = set_in(&mut doc, &segments, value);
    if let Value::Table(table) = doc {
        *root = table;
    }
    result
}

/// Walk `segments` from `current`, creating tables (or arrays, when the next
/// segment is `0`) for missing steps. A numeric key on a missing step is a
/// table key. Nothing is created when the walk would leave a hole in an
/// existing array.
fn set_in(current: &mut Value, segments: &[&str], value: Value) -> Result<(), String> {
    let Some((head, rest)) = segments.split_first() else {
        *current = value;
        return Ok(());
    };
    let fresh = || match rest.first() {
        Some(&"0") => Value::Array(Vec::new()),
        _ => Value::Table(Table::new()),
    };

    let child = match current {
        Value::Table(table) => match table.entry(head.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(fresh()),
        },
        Value::Array(items) => {
            let index: usize = head
                .parse()
                .map_err(|_| format!("cannot index an array with '{head}'"))?;
            if index == items.len() {
                items.push(fresh());
            }
            items
                .get_mut(index)
                .ok_or_else(|| format!("would leave a gap before index {index}"))?
        }
        _ => return Err("would descend through a scalar value".to_string()),
    };
    set_in(child, rest, value)
}
