// Licensed under the Apache-2.0 license

use std::path::PathBuf;

use thiserror::Error;

/// Conflicts that make the merged model unusable. Everything else found
/// while merging is logged and reported through the returned status.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("component '{component}' is a copy of '{original}' (type '{type_id}') and cannot define registers")]
    ComponentCopyRedefinition {
        component: String,
        original: String,
        type_id: String,
    },
    #[error("register '{component}.{register}' is a copy of '{original}' (type '{type_id}') and cannot define fields")]
    RegisterCopyRedefinition {
        component: String,
        register: String,
        original: String,
        type_id: String,
    },
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("unable to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed XML near byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },
    #[error("no reader for input '{0}'")]
    Unsupported(PathBuf),
    #[error(transparent)]
    Merge(#[from] MergeError),
}
