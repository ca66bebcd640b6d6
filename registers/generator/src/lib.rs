// Licensed under the Apache-2.0 license

//! Register map layout compiler and output writers.
//!
//! This crate computes the physical storage layout of the registers merged
//! by `registers-ipxact` and renders the model into C headers, assembler
//! symbol tables or IP-XACT.
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use registers_generator::{writer_for, RenderConfig};
//! use registers_ipxact::{merge_file, Components, MergeConfig};
//!
//! let mut components = Components::new();
//! merge_file(Path::new("soc.xml"), &mut components, &MergeConfig::by_name()).unwrap();
//!
//! let config = RenderConfig::new().project("soc");
//! let written = writer_for(Path::new("out/soc.h"), &config)
//!     .unwrap()
//!     .write(&components)
//!     .unwrap();
//! ```
//!
//! ## Module Organization
//!
//! - [`layout`]: Register bit layout and component padding
//! - [`output`]: Writers for each output type ([`Writer`])
//! - [`util`]: Name conversion utilities (escaping, camel case, guards)
//! - [`config`]: Output options ([`RenderConfig`])
//! - [`error`]: Layout and render errors

pub mod config;
pub mod error;
pub mod layout;
pub mod output;
pub mod util;

pub use config::RenderConfig;
pub use error::{LayoutError, RenderError};
pub use layout::{
    compile_component, compile_register, Chunk, ChunkKind, LayoutWarning, RegisterLayout, Slot,
};
pub use output::{writer_for, AsmWriter, HeaderWriter, Writer, XmlWriter};
