// Licensed under the Apache-2.0 license

//! IP-XACT register map model.
//!
//! This crate reads register descriptions and merges them into a single
//! in-memory model that code generators can walk.
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use registers_ipxact::{merge_file, Components, MergeConfig};
//!
//! let mut components = Components::new();
//! let config = MergeConfig::by_address();
//! let ok = merge_file(Path::new("soc.xml"), &mut components, &config).unwrap();
//! assert!(ok);
//! ```
//!
//! ## Module Organization
//!
//! - [`number`]: Numeric literal parsing ([`Number`])
//! - [`container`]: Name-keyed ordered collection ([`Container`])
//! - [`model`]: Components, registers, fields and enumerations
//! - [`desc`]: Reader-neutral description of one input document
//! - [`merge`]: Applies descriptions to the model ([`Merger`])
//! - [`reader`]: Input readers
//! - [`config`]: Merge options ([`MergeConfig`])

pub mod config;
pub mod container;
pub mod desc;
pub mod error;
pub mod merge;
pub mod model;
pub mod number;
pub mod reader;

use std::path::Path;

pub use config::{MergeConfig, MergeMode};
pub use container::Container;
pub use desc::Document;
pub use error::{MergeError, ReadError};
pub use merge::Merger;
pub use model::{
    Access, Component, Components, Enumeration, Field, Register, TypeId, TypeIdentified,
};
pub use number::Number;
pub use reader::{reader_for, IpxactReader, Reader};

/// Read `path` and merge it into `components`.
///
/// Returns `Ok(false)` when some element of the input was malformed. The
/// well-formed parts are merged regardless.
pub fn merge_file(
    path: &Path,
    components: &mut Components,
    config: &MergeConfig,
) -> Result<bool, ReadError> {
    let document = reader_for(path)?.read()?;
    Ok(Merger::new(components, config).merge_document(&document)?)
}
