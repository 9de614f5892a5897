use std::fmt;
use std::ops::Index;

use serde::{Serialize, Serializer};

use crate::error::BindfigError;
use crate::variable::Validator;

/// An ordered list of configuration elements that may be absent.
///
/// Elements are either scalars or nested [`Config`](crate::Config) schemas;
/// which one is decided when the list is registered.
///
/// Three construction modes:
///
/// - [`new`](Self::new): mandatory, no default.
/// - [`new_optional`](Self::new_optional): optional, absent until parsed.
/// - [`with_default`](Self::with_default): optional, seeded (possibly empty).
///
/// A parse that finds no elements leaves the current contents alone, so a
/// seed survives a source that doesn't mention the list.
#[derive(Clone)]
pub struct Vector<T> {
    elements: Option<Vec<T>>,
    optional: bool,
    validator: Option<Validator<Vec<T>>>,
}

impl<T> Vector<T> {
    pub fn new() -> Self {
        Self {
            elements: None,
            optional: false,
            validator: None,
        }
    }

    pub fn new_optional() -> Self {
        Self {
            elements: None,
            optional: true,
            validator: None,
        }
    }

    pub fn with_default(elements: Vec<T>) -> Self {
        Self {
            elements: Some(elements),
            optional: true,
            validator: None,
        }
    }

    /// Attach a validation hook, run on the whole list after a parse appended elements.
    pub fn validator(mut self, validator: Validator<Vec<T>>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn initialized(&self) -> bool {
        self.elements.is_some()
    }

    pub fn optional(&self) -> bool {
        self.optional
    }

    pub fn get(&self) -> Result<&Vec<T>, BindfigError> {
        self.elements.as_ref().ok_or(BindfigError::NotSet)
    }

    pub fn get_mut(&mut self) -> Result<&mut Vec<T>, BindfigError> {
        self.elements.as_mut().ok_or(BindfigError::NotSet)
    }

    pub fn value(&self) -> Option<&Vec<T>> {
        self.elements.as_ref()
    }

    pub fn set(&mut self, elements: Vec<T>) {
        self.elements = Some(elements);
    }

    /// Number of elements; an absent list has none.
    pub fn len(&self) -> usize {
        self.elements.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate the elements; an absent list yields nothing.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.as_deref().unwrap_or(&[]).iter()
    }

    /// Append an element found at `index` during a parse.
    ///
    /// The first element of a pass replaces whatever was held before (a seed
    /// or an earlier format's result); later ones extend it.
    pub(crate) fn push_parsed(&mut self, index: usize, element: T) {
        if index == 0 {
            self.elements = Some(Vec::new());
        }
        self.elements.get_or_insert_with(Vec::new).push(element);
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        match (&self.elements, self.validator) {
            (Some(elements), Some(validator)) => validator(elements),
            _ => Ok(()),
        }
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for Vector<T> {
    fn from(elements: Vec<T>) -> Self {
        Self::with_default(elements)
    }
}

/// Panics if the list is absent or `pos` is out of bounds, like indexing a `Vec`.
impl<T> Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, pos: usize) -> &T {
        match &self.elements {
            Some(elements) => &elements[pos],
            None => panic!("index {pos} into a vector that is not set"),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("elements", &self.elements)
            .field("optional", &self.optional)
            .finish()
    }
}

impl<T: PartialEq> PartialEq for Vector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl<T: PartialEq> PartialEq<Vec<T>> for Vector<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.elements.as_ref() == Some(other)
    }
}

impl<T: Serialize> Serialize for Vector<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.elements.serialize(serializer)
    }
}
