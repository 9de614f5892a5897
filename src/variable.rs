use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

use serde::{Serialize, Serializer};

use crate::error::BindfigError;

/// User-supplied check run on a value right after it is parsed.
pub type Validator<T> = fn(&T) -> Result<(), String>;

/// A single typed configuration value that may be absent.
///
/// Constructed empty it is mandatory: a schema holding it is not initialized
/// until a source provides a value. Constructed with a seed it is optional and
/// the seed acts as the default.
#[derive(Clone)]
pub struct Variable<T> {
    value: Option<T>,
    optional: bool,
    validator: Option<Validator<T>>,
}

impl<T> Variable<T> {
    /// An empty, mandatory variable.
    pub fn new() -> Self {
        Self {
            value: None,
            optional: false,
            validator: None,
        }
    }

    /// An optional variable holding `value` until a source overrides it.
    pub fn with_default(value: T) -> Self {
        Self {
            value: Some(value),
            optional: true,
            validator: None,
        }
    }

    /// Attach a validation hook, run whenever a value is parsed into this variable.
    pub fn validator(mut self, validator: Validator<T>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Whether a value is present (parsed or default).
    pub fn initialized(&self) -> bool {
        self.value.is_some()
    }

    /// Whether absence of a value is tolerated.
    pub fn optional(&self) -> bool {
        self.optional
    }

    /// Read the value, failing with [`BindfigError::NotSet`] if there is none.
    pub fn get(&self) -> Result<&T, BindfigError> {
        self.value.as_ref().ok_or(BindfigError::NotSet)
    }

    pub fn get_mut(&mut self) -> Result<&mut T, BindfigError> {
        self.value.as_mut().ok_or(BindfigError::NotSet)
    }

    /// The value, if present.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Replace the value. Optionality is left as constructed.
    pub fn set(&mut self, value: T) {
        self.value = Some(value);
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        match (&self.value, self.validator) {
            (Some(value), Some(validator)) => validator(value),
            _ => Ok(()),
        }
    }
}

impl<T> Default for Variable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<T> for Variable<T> {
    fn from(value: T) -> Self {
        Self::with_default(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Variable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("value", &self.value)
            .field("optional", &self.optional)
            .finish()
    }
}

impl<T: fmt::Display> fmt::Display for Variable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => value.fmt(f),
            None => f.write_str("[not set]"),
        }
    }
}

/// Two variables are equal when they hold equal values (or are both empty).
impl<T: PartialEq> PartialEq for Variable<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// An empty variable never equals a raw value.
impl<T: PartialEq> PartialEq<T> for Variable<T> {
    fn eq(&self, other: &T) -> bool {
        self.value.as_ref() == Some(other)
    }
}

/// An empty variable is unordered against any raw value.
impl<T: PartialOrd> PartialOrd<T> for Variable<T> {
    fn partial_cmp(&self, other: &T) -> Option<Ordering> {
        self.value.as_ref()?.partial_cmp(other)
    }
}

/// Arithmetic on a borrowed variable yields the result, or
/// [`BindfigError::NotSet`] when the variable is empty.
macro_rules! arithmetic {
    ($($trait:ident $method:ident),* $(,)?) => {$(
        impl<T: $trait<Output = T> + Clone> $trait<T> for &Variable<T> {
            type Output = Result<T, BindfigError>;

            fn $method(self, rhs: T) -> Self::Output {
                Ok(self.get()?.clone().$method(rhs))
            }
        }
    )*};
}

arithmetic!(Add add, Sub sub, Mul mul, Div div);

impl<T: Serialize> Serialize for Variable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}
