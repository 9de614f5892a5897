//! The format adapter contract.
//!
//! A format knows how to fetch and store a single scalar at a path in one
//! concrete kind of source, and how to name the Nth element of a list. The
//! traversal engine never looks inside a source itself; everything it needs
//! goes through these two traits.
//!
//! Per-type conversion is a separate trait, [`FormatValue<T>`], so a format
//! declares exactly which scalar types it can carry. Using a type that a
//! format cannot convert is a compile error at the registration site.

use crate::error::BindfigError;

/// A configuration source/destination kind (environment, JSON, ...).
pub trait Format: 'static {
    /// Label used in error messages, e.g. `"[ENV]"`.
    const NAME: &'static str;

    /// What values are parsed from.
    type Source;

    /// What values are emitted into.
    type Dest;

    /// Path of the element at `index` of the list living at `vector_path`.
    ///
    /// Must be deterministic and injective, and is used for both parsing and
    /// emitting so that lists round-trip through the same paths.
    fn vector_element_path(&self, vector_path: &str, index: usize) -> String;
}

/// Conversion of one scalar type `T` to and from a format.
pub trait FormatValue<T>: Format {
    /// Best-effort typed fetch.
    ///
    /// Returns `None` both when nothing lives at `path` and when the value
    /// there cannot be represented as `T`. A miss is not an error.
    fn parse(&self, source: &Self::Source, path: &str) -> Option<T>;

    /// Write `value` at `path`, creating intermediate structure as needed.
    fn emit(&self, dest: &mut Self::Dest, path: &str, value: &T) -> Result<(), BindfigError>;
}
