//! Schemas and the section-level traversal.
//!
//! A schema is any type implementing [`Config`]. Its children are not stored
//! anywhere: every parse, emit and status query calls
//! [`register`](Config::register) again with the current path prefix, so the
//! set of children and their paths can depend on the prefix and the format.
//!
//! Parsing a section asks every child in registration order. A child that
//! fails on a mandatory element aborts the whole parse only when the section
//! itself is mandatory and the caller asked for errors; otherwise the failure
//! is logged and the remaining children are still tried. The section counts
//! as found when any child found something.

use tracing::debug;

use crate::error::BindfigError;
use crate::format::Format;
use crate::node::{Node, Probe};
use crate::registry::Registry;

/// A configuration schema: a struct of [`Variable`](crate::Variable)s,
/// [`Vector`](crate::Vector)s and nested schemas.
///
/// # Example
///
/// ```
/// use bindfig::{field, Config, EnvFormat, EnvSource, JsonFormat, Registry, Variable};
///
/// #[derive(Default)]
/// struct Server {
///     host: Variable<String>,
///     port: Variable<u16>,
/// }
///
/// impl Config for Server {
///     fn register(&self, path: &str, registry: &mut Registry<Self>) {
///         registry
///             .format::<EnvFormat>()
///             .variable(format!("{path}HOST"), field!(host))
///             .variable(format!("{path}PORT"), field!(port));
///         registry
///             .format::<JsonFormat>()
///             .variable(format!("{path}/host"), field!(host))
///             .variable(format!("{path}/port"), field!(port));
///     }
/// }
///
/// let env = EnvSource::from_vars([
///     ("APP_HOST".to_string(), "localhost".to_string()),
///     ("APP_PORT".to_string(), "8080".to_string()),
/// ]);
/// let mut server = Server::default();
/// assert!(server.parse(&EnvFormat, "APP_", &env).unwrap());
/// assert_eq!(server.port, 8080);
///
/// let mut json = serde_json::Value::Null;
/// server.emit(&JsonFormat, "", &mut json).unwrap();
/// assert_eq!(json, serde_json::json!({"host": "localhost", "port": 8080}));
/// ```
pub trait Config: Sized + 'static {
    /// Register every child of this schema under `path`.
    ///
    /// Called once per traversal, so it must be free of side effects and
    /// produce the same registrations each time it runs.
    ///
    /// Every child path must be built from `path`. A schema used as a list
    /// element receives a different prefix per index; one that ignores it
    /// answers every index and the list never ends.
    fn register(&self, path: &str, registry: &mut Registry<Self>);

    /// Whether this section may be absent. Mandatory by default.
    fn optional(&self) -> bool {
        false
    }

    /// Check the section as a whole after a parse left it initialized.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Parse from `source`, failing on the first missing mandatory element.
    ///
    /// Returns whether anything was found.
    fn parse<F: Format>(
        &mut self,
        format: &F,
        path: &str,
        source: &F::Source,
    ) -> Result<bool, BindfigError> {
        parse_section(self, format, path, source, true)
    }

    /// Parse whatever `source` provides and never fail.
    ///
    /// Check [`initialized`](Self::initialized) afterwards to know whether
    /// the result is usable.
    fn parse_partial<F: Format>(&mut self, format: &F, path: &str, source: &F::Source) -> bool {
        parse_section(self, format, path, source, false).unwrap_or(false)
    }

    /// Emit into `dest`, failing if a mandatory element is not set.
    fn emit<F: Format>(&self, format: &F, path: &str, dest: &mut F::Dest) -> Result<(), BindfigError> {
        emit_section(self, format, path, dest, true)
    }

    /// Emit every element that is set and skip the rest.
    fn emit_partial<F: Format>(&self, format: &F, path: &str, dest: &mut F::Dest) {
        if let Err(err) = emit_section(self, format, path, dest, false) {
            debug!(format = F::NAME, path, error = %err, "partial emit stopped");
        }
    }

    /// Whether every mandatory child is initialized, whichever format it is
    /// bound under.
    fn initialized(&self) -> bool {
        let mut registry = Registry::for_status();
        self.register("", &mut registry);
        registry
            .into_probes()
            .iter()
            .all(|probe| probe.optional(self) || probe.initialized(self))
    }

    /// Whether every mandatory child bound under `F` is initialized.
    fn initialized_for<F: Format>(&self) -> bool {
        let mut registry = Registry::for_format::<F>();
        self.register("", &mut registry);
        registry
            .into_nodes::<F>()
            .iter()
            .all(|node| node.optional(self) || node.initialized_for(self))
    }

    /// Every path bound under `F` below `path`, nested sections expanded.
    ///
    /// Lists contribute their own path, not their element paths.
    fn paths<F: Format>(&self, format: &F, path: &str) -> Vec<String> {
        let mut registry = Registry::for_format::<F>();
        self.register(path, &mut registry);
        let mut out = Vec::new();
        for node in registry.into_nodes::<F>() {
            node.paths(self, format, &mut out);
        }
        out
    }
}

pub(crate) fn parse_section<C: Config, F: Format>(
    config: &mut C,
    format: &F,
    path: &str,
    source: &F::Source,
    throw_on_fail: bool,
) -> Result<bool, BindfigError> {
    let mut registry = Registry::for_format::<F>();
    config.register(path, &mut registry);
    let nodes = registry.into_nodes::<F>();
    let optional = config.optional();
    debug!(format = F::NAME, path, children = nodes.len(), optional, "parsing section");

    let mut found = false;
    for node in &nodes {
        match node.parse(config, format, source, throw_on_fail) {
            Ok(parsed) => found |= parsed,
            Err(err) if optional || !throw_on_fail => {
                debug!(format = F::NAME, path, error = %err, "child not parsed");
            }
            Err(err) => return Err(err),
        }
    }

    let initialized = nodes
        .iter()
        .all(|node| node.optional(config) || node.initialized_for(config));
    if initialized
        && let Err(reason) = config.validate()
        && throw_on_fail
    {
        return Err(BindfigError::parse::<F>(path, reason));
    }
    Ok(found)
}

pub(crate) fn emit_section<C: Config, F: Format>(
    config: &C,
    format: &F,
    path: &str,
    dest: &mut F::Dest,
    throw_on_fail: bool,
) -> Result<(), BindfigError> {
    let mut registry = Registry::for_format::<F>();
    config.register(path, &mut registry);
    let nodes = registry.into_nodes::<F>();
    let optional = config.optional();

    let missing = nodes
        .iter()
        .find(|node| !node.optional(config) && !node.initialized_for(config));
    if let Some(node) = missing {
        if optional {
            debug!(format = F::NAME, path, "optional section not set, skipped");
            return Ok(());
        }
        if throw_on_fail {
            return Err(BindfigError::emit::<F>(node.path(), "is not set"));
        }
    }
    debug!(format = F::NAME, path, children = nodes.len(), "emitting section");

    for node in &nodes {
        match node.emit(config, format, dest, throw_on_fail) {
            Ok(()) => {}
            Err(err) if !throw_on_fail => {
                debug!(format = F::NAME, path, error = %err, "child not emitted");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}
