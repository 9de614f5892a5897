//! Environment variable format.
//!
//! Variables are a flat string-to-string namespace, so a schema decides its own
//! naming: nested schemas usually join their prefix with `_`
//! (`format!("{path}_PORT")`), and list elements get an `_N` suffix
//! (`SERVERS_0`, `SERVERS_1`, ...).
//!
//! Values are plain strings converted with `FromStr`. A conversion only counts
//! if printing the result back with `Display` reproduces the original string
//! exactly. This rejects lossy inputs such as `"123456.789"` for an `f32` or
//! `"-1"` for an unsigned port, and overflow across integer widths.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use crate::error::BindfigError;
use crate::format::{Format, FormatValue};

/// Where environment values are read from.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EnvSource {
    /// The environment of the running process.
    #[default]
    Process,
    /// An explicit set of variables (tests, or values captured earlier).
    Vars(BTreeMap<String, String>),
}

impl EnvSource {
    pub fn process() -> Self {
        EnvSource::Process
    }

    /// A fixed set of variables, e.g. collected from `std::env::vars()`.
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        EnvSource::Vars(vars.into_iter().collect())
    }

    /// Look up one variable. Non-unicode process values count as missing.
    pub fn get(&self, name: &str) -> Option<Cow<'_, str>> {
        match self {
            EnvSource::Process => std::env::var(name).ok().map(Cow::Owned),
            EnvSource::Vars(vars) => vars.get(name).map(|v| Cow::Borrowed(v.as_str())),
        }
    }
}

impl From<BTreeMap<String, String>> for EnvSource {
    fn from(vars: BTreeMap<String, String>) -> Self {
        EnvSource::Vars(vars)
    }
}

/// Parses from an [`EnvSource`], emits into a sorted `name -> value` map.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvFormat;

impl Format for EnvFormat {
    const NAME: &'static str = "[ENV]";
    type Source = EnvSource;
    type Dest = BTreeMap<String, String>;

    fn vector_element_path(&self, vector_path: &str, index: usize) -> String {
        format!("{vector_path}_{index}")
    }
}

impl<T: FromStr + Display> FormatValue<T> for EnvFormat {
    fn parse(&self, source: &EnvSource, path: &str) -> Option<T> {
        let raw = source.get(path)?;
        let value = raw.parse::<T>().ok()?;
        // Only accept values that survive a round-trip unchanged.
        (value.to_string() == raw).then_some(value)
    }

    fn emit(
        &self,
        dest: &mut BTreeMap<String, String>,
        path: &str,
        value: &T,
    ) -> Result<(), BindfigError> {
        dest.insert(path.to_string(), value.to_string());
        Ok(())
    }
}
