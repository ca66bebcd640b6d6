// Licensed under the Apache-2.0 license

use std::path::PathBuf;

use thiserror::Error;

/// Register placements that cannot be laid out.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("component '{component}': register '{previous}' ends at {end:#x}, past the start of '{next}' at {address:#x}")]
    Overlap {
        component: String,
        previous: String,
        next: String,
        end: u64,
        address: u64,
    },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("output type '{0}' is not supported")]
    Unsupported(String),
    #[error("no writer for output '{0}'")]
    UnknownType(PathBuf),
    #[error("register '{register}' has an unsupported width of {width} bits, use 8, 16 or 32")]
    UnsupportedWidth { register: String, width: u32 },
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("unable to serialize XML: {0}")]
    Xml(String),
    #[error("unable to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
