//! Binding nodes: one registered child of a schema, resolved to a path under
//! one format.
//!
//! Nodes are rebuilt by every registration pass and dropped when the pass
//! ends. They reach their holder through a [`Field`], so the schema is borrowed
//! only while a node is being parsed or emitted.

use tracing::trace;

use crate::config::{self, Config};
use crate::error::BindfigError;
use crate::format::{Format, FormatValue};
use crate::registry::Field;
use crate::variable::Variable;
use crate::vector::Vector;

/// Status of a registered child, independent of format.
pub(crate) trait Probe<S> {
    fn initialized(&self, schema: &S) -> bool;
    fn optional(&self, schema: &S) -> bool;
}

/// A registered child, bound to a path under format `F`.
pub(crate) trait Node<S, F: Format>: Probe<S> {
    fn path(&self) -> &str;

    /// Whether the child is initialized as far as `F` is concerned.
    fn initialized_for(&self, schema: &S) -> bool {
        self.initialized(schema)
    }

    /// Returns whether anything was found in `source`.
    fn parse(
        &self,
        schema: &mut S,
        format: &F,
        source: &F::Source,
        throw_on_fail: bool,
    ) -> Result<bool, BindfigError>;

    fn emit(
        &self,
        schema: &S,
        format: &F,
        dest: &mut F::Dest,
        throw_on_fail: bool,
    ) -> Result<(), BindfigError>;

    fn paths(&self, _schema: &S, _format: &F, out: &mut Vec<String>) {
        out.push(self.path().to_string());
    }
}

pub(crate) struct ScalarNode<S, T> {
    path: String,
    field: Field<S, Variable<T>>,
}

impl<S, T> ScalarNode<S, T> {
    pub(crate) fn new(path: String, field: Field<S, Variable<T>>) -> Self {
        Self { path, field }
    }
}

impl<S, T> Probe<S> for ScalarNode<S, T> {
    fn initialized(&self, schema: &S) -> bool {
        self.field.get(schema).initialized()
    }

    fn optional(&self, schema: &S) -> bool {
        self.field.get(schema).optional()
    }
}

impl<S, T, F: FormatValue<T>> Node<S, F> for ScalarNode<S, T> {
    fn path(&self) -> &str {
        &self.path
    }

    fn parse(
        &self,
        schema: &mut S,
        format: &F,
        source: &F::Source,
        throw_on_fail: bool,
    ) -> Result<bool, BindfigError> {
        let variable = self.field.get_mut(schema);
        let Some(value) = format.parse(source, &self.path) else {
            trace!(format = F::NAME, path = %self.path, "no value");
            if !variable.initialized() && !variable.optional() && throw_on_fail {
                return Err(BindfigError::parse::<F>(&self.path, "is not set"));
            }
            return Ok(false);
        };
        variable.set(value);
        if let Err(reason) = variable.validate()
            && throw_on_fail
        {
            return Err(BindfigError::parse::<F>(&self.path, reason));
        }
        Ok(true)
    }

    fn emit(
        &self,
        schema: &S,
        format: &F,
        dest: &mut F::Dest,
        throw_on_fail: bool,
    ) -> Result<(), BindfigError> {
        match self.field.get(schema).value() {
            Some(value) => format.emit(dest, &self.path, value),
            None if throw_on_fail => Err(BindfigError::emit::<F>(&self.path, "is not set")),
            None => Ok(()),
        }
    }
}

/// Parse list elements at index 0, 1, ... until the first one that fails.
///
/// `element` parses one element as mandatory, returning `Ok(None)` when
/// nothing was found there. Returns the number of elements appended.
fn parse_elements<T, F: Format>(
    vector: &mut Vector<T>,
    format: &F,
    path: &str,
    throw_on_fail: bool,
    mut element: impl FnMut(&str) -> Result<Option<T>, BindfigError>,
) -> Result<bool, BindfigError> {
    let mut index = 0;
    let stop = loop {
        let element_path = format.vector_element_path(path, index);
        match element(&element_path) {
            Ok(Some(value)) => {
                vector.push_parsed(index, value);
                index += 1;
            }
            Ok(None) => break None,
            Err(err) => break Some(err),
        }
    };
    trace!(format = F::NAME, path, elements = index, "list ends");

    if index == 0 && !vector.initialized() && !vector.optional() && throw_on_fail {
        return Err(stop.unwrap_or_else(|| BindfigError::parse::<F>(path, "vector is not set")));
    }
    if let Err(reason) = vector.validate()
        && throw_on_fail
    {
        return Err(BindfigError::parse::<F>(path, reason));
    }
    Ok(index > 0)
}

fn vector_not_set<T, F: Format>(
    vector: &Vector<T>,
    path: &str,
    throw_on_fail: bool,
) -> Result<(), BindfigError> {
    if !vector.optional() && throw_on_fail {
        return Err(BindfigError::emit::<F>(path, "vector is not set"));
    }
    Ok(())
}

pub(crate) struct ListNode<S, T> {
    path: String,
    field: Field<S, Vector<T>>,
}

impl<S, T> ListNode<S, T> {
    pub(crate) fn new(path: String, field: Field<S, Vector<T>>) -> Self {
        Self { path, field }
    }
}

impl<S, T> Probe<S> for ListNode<S, T> {
    fn initialized(&self, schema: &S) -> bool {
        self.field.get(schema).initialized()
    }

    fn optional(&self, schema: &S) -> bool {
        self.field.get(schema).optional()
    }
}

impl<S, T, F: FormatValue<T>> Node<S, F> for ListNode<S, T> {
    fn path(&self) -> &str {
        &self.path
    }

    fn parse(
        &self,
        schema: &mut S,
        format: &F,
        source: &F::Source,
        throw_on_fail: bool,
    ) -> Result<bool, BindfigError> {
        let vector = self.field.get_mut(schema);
        parse_elements(vector, format, &self.path, throw_on_fail, |element_path| {
            match format.parse(source, element_path) {
                Some(value) => Ok(Some(value)),
                None => Err(BindfigError::parse::<F>(element_path, "is not set")),
            }
        })
    }

    fn emit(
        &self,
        schema: &S,
        format: &F,
        dest: &mut F::Dest,
        throw_on_fail: bool,
    ) -> Result<(), BindfigError> {
        let vector = self.field.get(schema);
        let Some(elements) = vector.value() else {
            return vector_not_set::<T, F>(vector, &self.path, throw_on_fail);
        };
        for (index, value) in elements.iter().enumerate() {
            format.emit(dest, &format.vector_element_path(&self.path, index), value)?;
        }
        Ok(())
    }
}

pub(crate) struct ConfigNode<S, C> {
    path: String,
    field: Field<S, C>,
}

impl<S, C> ConfigNode<S, C> {
    pub(crate) fn new(path: String, field: Field<S, C>) -> Self {
        Self { path, field }
    }
}

impl<S, C: Config> Probe<S> for ConfigNode<S, C> {
    fn initialized(&self, schema: &S) -> bool {
        self.field.get(schema).initialized()
    }

    fn optional(&self, schema: &S) -> bool {
        self.field.get(schema).optional()
    }
}

impl<S, C: Config, F: Format> Node<S, F> for ConfigNode<S, C> {
    fn path(&self) -> &str {
        &self.path
    }

    fn initialized_for(&self, schema: &S) -> bool {
        self.field.get(schema).initialized_for::<F>()
    }

    fn parse(
        &self,
        schema: &mut S,
        format: &F,
        source: &F::Source,
        throw_on_fail: bool,
    ) -> Result<bool, BindfigError> {
        let config = self.field.get_mut(schema);
        config::parse_section(config, format, &self.path, source, throw_on_fail)
    }

    fn emit(
        &self,
        schema: &S,
        format: &F,
        dest: &mut F::Dest,
        throw_on_fail: bool,
    ) -> Result<(), BindfigError> {
        let config = self.field.get(schema);
        config::emit_section(config, format, &self.path, dest, throw_on_fail)
    }

    fn paths(&self, schema: &S, format: &F, out: &mut Vec<String>) {
        out.extend(self.field.get(schema).paths(format, &self.path));
    }
}

pub(crate) struct ConfigListNode<S, C> {
    path: String,
    field: Field<S, Vector<C>>,
}

impl<S, C> ConfigListNode<S, C> {
    pub(crate) fn new(path: String, field: Field<S, Vector<C>>) -> Self {
        Self { path, field }
    }
}

impl<S, C> Probe<S> for ConfigListNode<S, C> {
    fn initialized(&self, schema: &S) -> bool {
        self.field.get(schema).initialized()
    }

    fn optional(&self, schema: &S) -> bool {
        self.field.get(schema).optional()
    }
}

impl<S, C: Config + Default, F: Format> Node<S, F> for ConfigListNode<S, C> {
    fn path(&self) -> &str {
        &self.path
    }

    fn parse(
        &self,
        schema: &mut S,
        format: &F,
        source: &F::Source,
        throw_on_fail: bool,
    ) -> Result<bool, BindfigError> {
        let vector = self.field.get_mut(schema);
        parse_elements(vector, format, &self.path, throw_on_fail, |element_path| {
            let mut element = C::default();
            // An element that yields nothing ends the list like a missing one.
            let found = config::parse_section(&mut element, format, element_path, source, true)?;
            Ok(found.then_some(element))
        })
    }

    fn emit(
        &self,
        schema: &S,
        format: &F,
        dest: &mut F::Dest,
        throw_on_fail: bool,
    ) -> Result<(), BindfigError> {
        let vector = self.field.get(schema);
        let Some(elements) = vector.value() else {
            return vector_not_set::<C, F>(vector, &self.path, throw_on_fail);
        };
        for (index, element) in elements.iter().enumerate() {
            let element_path = format.vector_element_path(&self.path, index);
            config::emit_section(element, format, &element_path, dest, throw_on_fail)?;
        }
        Ok(())
    }
}
