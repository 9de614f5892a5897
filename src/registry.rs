//! Child registration: how a schema tells the engine what it contains.
//!
//! [`Config::register`](crate::Config::register) receives a fresh [`Registry`]
//! on every traversal and describes its children through one [`Binder`] per
//! format:
//!
//! ```ignore
//! fn register(&self, path: &str, registry: &mut Registry<Self>) {
//!     registry
//!         .format::<EnvFormat>()
//!         .variable(format!("{path}_PORT"), field!(port));
//!     registry
//!         .format::<JsonFormat>()
//!         .variable(format!("{path}/port"), field!(port));
//! }
//! ```
//!
//! A registry collects only the binders of the format being traversed; every
//! other binder is a no-op. So a schema can name formats the caller never
//! uses, and a field bound under one format is invisible to the others.

use std::any::{Any, TypeId};
use std::marker::PhantomData;

use crate::config::Config;
use crate::format::{Format, FormatValue};
use crate::node::{ConfigListNode, ConfigNode, ListNode, Node, Probe, ScalarNode};
use crate::variable::Variable;
use crate::vector::Vector;

/// A pair of accessors from a schema `S` to one of its holders `V`.
///
/// Nodes keep these instead of references, so nothing borrows the schema
/// between calls. Build one with [`field!`](crate::field).
pub struct Field<S, V> {
    get: fn(&S) -> &V,
    get_mut: fn(&mut S) -> &mut V,
}

impl<S, V> Field<S, V> {
    pub fn new(get: fn(&S) -> &V, get_mut: fn(&mut S) -> &mut V) -> Self {
        Self { get, get_mut }
    }

    pub(crate) fn get<'a>(&self, schema: &'a S) -> &'a V {
        (self.get)(schema)
    }

    pub(crate) fn get_mut<'a>(&self, schema: &'a mut S) -> &'a mut V {
        (self.get_mut)(schema)
    }
}

impl<S, V> Clone for Field<S, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, V> Copy for Field<S, V> {}

/// Accessor pair for a named field of `Self`, for use inside `register`.
///
/// `field!(port)` expands to `Field::new(|s| &s.port, |s| &mut s.port)`.
#[macro_export]
macro_rules! field {
    ($name:ident) => {
        $crate::Field::new(|s| &s.$name, |s| &mut s.$name)
    };
}

enum Collect<S> {
    /// Keep the nodes registered for one format, as `Vec<Box<dyn Node<S, F>>>`.
    Format { format: TypeId, nodes: Box<dyn Any> },
    /// Keep every registration, under any format, for status checks only.
    Status(Vec<Box<dyn Probe<S>>>),
}

/// Children of one schema, collected during a single registration pass.
pub struct Registry<S> {
    collect: Collect<S>,
}

impl<S: 'static> Registry<S> {
    /// Start a registry that collects the children bound under `F`.
    pub(crate) fn for_format<F: Format>() -> Self {
        let nodes: Vec<Box<dyn Node<S, F>>> = Vec::new();
        Self {
            collect: Collect::Format {
                format: TypeId::of::<F>(),
                nodes: Box::new(nodes),
            },
        }
    }

    pub(crate) fn for_status() -> Self {
        Self {
            collect: Collect::Status(Vec::new()),
        }
    }

    /// Bind children under format `F`.
    pub fn format<F: Format>(&mut self) -> Binder<'_, S, F> {
        Binder {
            registry: self,
            _format: PhantomData,
        }
    }

    pub(crate) fn into_nodes<F: Format>(self) -> Vec<Box<dyn Node<S, F>>> {
        match self.collect {
            Collect::Format { nodes, .. } => nodes
                .downcast::<Vec<Box<dyn Node<S, F>>>>()
                .map(|nodes| *nodes)
                .unwrap_or_default(),
            Collect::Status(_) => Vec::new(),
        }
    }

    pub(crate) fn into_probes(self) -> Vec<Box<dyn Probe<S>>> {
        match self.collect {
            Collect::Status(probes) => probes,
            Collect::Format { .. } => Vec::new(),
        }
    }
}

/// Registers children of a schema `S` under one format `F`.
///
/// Each method picks the node kind explicitly; the scalar type must be
/// convertible by `F`, or registration does not compile.
pub struct Binder<'r, S, F> {
    registry: &'r mut Registry<S>,
    _format: PhantomData<fn() -> F>,
}

impl<S: 'static, F: Format> Binder<'_, S, F> {
    fn push<N>(&mut self, node: N) -> &mut Self
    where
        N: Node<S, F> + 'static,
    {
        match &mut self.registry.collect {
            Collect::Status(probes) => probes.push(Box::new(node)),
            Collect::Format { format, nodes } if *format == TypeId::of::<F>() => {
                if let Some(nodes) = nodes.downcast_mut::<Vec<Box<dyn Node<S, F>>>>() {
                    nodes.push(Box::new(node));
                }
            }
            Collect::Format { .. } => {}
        }
        self
    }

    /// Bind a scalar at `path`.
    pub fn variable<T: 'static>(
        &mut self,
        path: impl Into<String>,
        field: Field<S, Variable<T>>,
    ) -> &mut Self
    where
        F: FormatValue<T>,
    {
        self.push(ScalarNode::new(path.into(), field))
    }

    /// Bind a list of scalars; element paths come from
    /// [`Format::vector_element_path`].
    pub fn vector<T: 'static>(&mut self, path: impl Into<String>, field: Field<S, Vector<T>>) -> &mut Self
    where
        F: FormatValue<T>,
    {
        self.push(ListNode::new(path.into(), field))
    }

    /// Bind a nested schema; `path` becomes the prefix its `register` receives.
    pub fn config<C: Config>(&mut self, path: impl Into<String>, field: Field<S, C>) -> &mut Self {
        self.push(ConfigNode::new(path.into(), field))
    }

    /// Bind a list of nested schemas. Elements start from `C::default()`.
    pub fn config_vector<C: Config + Default>(
        &mut self,
        path: impl Into<String>,
        field: Field<S, Vector<C>>,
    ) -> &mut Self {
        self.push(ConfigListNode::new(path.into(), field))
    }
}
