//! Declarative configuration binding for Rust applications. Describe your
//! configuration once as a typed schema, then fill it from environment
//! variables, a JSON document, a TOML table, or a format of your own.
//!
//! ```ignore
//! let mut config = AppConfig::default();
//! config.parse(&EnvFormat, "APP", &EnvSource::process())?;
//! let port: u16 = *config.server.port.get()?;
//! ```
//!
//! # The schema
//!
//! A schema is a plain struct whose fields are holders:
//!
//! - **[`Variable<T>`]** holds one value that may be absent. Built with
//!   [`Variable::new`] it is mandatory; built with [`Variable::with_default`]
//!   it is optional and the seed is its default.
//! - **[`Vector<T>`]** holds a list that may be absent: mandatory
//!   ([`Vector::new`]), optional and absent ([`Vector::new_optional`]), or
//!   optional with a seed ([`Vector::with_default`], possibly empty).
//!   Elements are scalars or nested schemas.
//! - **Nested schemas** are fields of a type that itself implements
//!   [`Config`].
//!
//! The struct implements [`Config::register`], which names each child and
//! gives its path for every format the schema supports:
//!
//! ```ignore
//! impl Config for ServerConfig {
//!     fn register(&self, path: &str, registry: &mut Registry<Self>) {
//!         registry
//!             .format::<EnvFormat>()
//!             .variable(format!("{path}_HOST"), field!(host))
//!             .vector(format!("{path}_ALIASES"), field!(aliases));
//!         registry
//!             .format::<JsonFormat>()
//!             .variable(format!("{path}/host"), field!(host))
//!             .vector(format!("{path}/aliases"), field!(aliases));
//!     }
//! }
//! ```
//!
//! Registration runs again on every parse, emit and status query with the
//! current path prefix. It must not have side effects, and it must register
//! the same children every time.
//!
//! # Formats
//!
//! A format decides how a single scalar is read from and written to its
//! source, and how list elements are named. Three ship with the crate:
//!
//! | Format | Source / destination | Paths | List elements |
//! |---|---|---|---|
//! | [`EnvFormat`] | [`EnvSource`] / `BTreeMap<String, String>` | `APP_PORT` | `APP_HOSTS_0` |
//! | [`JsonFormat`] | `serde_json::Value` | `/app/port` | `/app/hosts/0` |
//! | [`TomlFormat`] (feature `toml`) | `toml::Table` | `app.port` | `app.hosts.0` |
//!
//! A value that is missing or has the wrong type is a miss, not an error.
//! The environment format only accepts strings that print back identically,
//! so `"-1"` is a miss for a `u16` and `"0.5"` is a miss for an integer.
//!
//! To add a format, implement [`Format`] and [`FormatValue<T>`] for every
//! scalar type it carries. Nothing else in the crate needs to know about it.
//!
//! # Many formats, one schema
//!
//! A schema binds each field under any subset of formats. Parsing with one
//! format only touches the fields registered for it; the rest keep whatever
//! they held. Registering under a format the caller never parses with costs
//! nothing, so one schema type can serve applications that use different
//! sources. Parsing env first and JSON second layers the JSON values on top,
//! while fields the JSON lacks keep their env values.
//!
//! # Mandatory, optional, and partial results
//!
//! [`Config::parse`] fails with [`BindfigError::Parse`] as soon as a mandatory
//! element is missing from a mandatory section. [`Config::parse_partial`]
//! never fails: it takes whatever the source has and reports whether it found
//! anything, and [`Config::initialized`] tells whether the result is
//! complete. An optional section with missing mandatory children is simply
//! left uninitialized.
//!
//! Lists are read element by element from index 0 and stop at the first
//! element that is missing or incomplete. A list with a seed keeps its seed
//! when the source has no elements for it, and is replaced wholesale when it
//! has at least one.
//!
//! [`Config::emit`] and [`Config::emit_partial`] write the schema back out
//! through the same paths, so emit followed by parse reproduces the values.
//!
//! # Validation
//!
//! [`Variable::validator`] and [`Vector::validator`] attach a check that runs
//! right after a value is parsed. [`Config::validate`] checks a whole section
//! once it is initialized. A rejected value becomes a
//! [`BindfigError::Parse`] carrying the format name and path.
//!
//! # Logging
//!
//! Traversal reports through [`tracing`](https://docs.rs/tracing): section
//! entry and skipped children at `debug`, leaf misses and list ends at
//! `trace`. The crate never installs a subscriber.
//!
//! # Error handling
//!
//! All fallible operations return [`BindfigError`]. With the `rich-errors`
//! feature it also implements `miette::Diagnostic`.

pub mod error;

mod config;
mod env;
mod format;
mod json;
mod node;
mod registry;
#[cfg(feature = "toml")]
mod toml_format;
mod variable;
mod vector;

#[cfg(test)]
mod fixtures;

pub use config::Config;
pub use env::{EnvFormat, EnvSource};
pub use error::BindfigError;
pub use format::{Format, FormatValue};
pub use json::{JsonFormat, JsonScalar};
pub use registry::{Binder, Field, Registry};
#[cfg(feature = "toml")]
pub use toml_format::{TomlFormat, TomlScalar};
pub use variable::{Validator, Variable};
pub use vector::Vector;
