// Licensed under the Apache-2.0 license

//! Output writers.
//!
//! A [`Writer`] renders the merged register model into one or more files.
//! [`writer_for`] picks the writer from the last extension of the output
//! path, or from the configured output type.
//!
//! | Type   | Writer          | Files                              |
//! |--------|-----------------|------------------------------------|
//! | `h`    | [`HeaderWriter`] | `<stem>_<component>.h` per component |
//! | `asym` | [`AsmWriter`]    | the output path                    |
//! | `xml`  | [`XmlWriter`]    | the output path                    |

mod asm;
mod header;
mod xml;

use std::path::{Path, PathBuf};

use registers_ipxact::Components;

use crate::config::RenderConfig;
use crate::error::RenderError;

pub use asm::AsmWriter;
pub use header::HeaderWriter;
pub use xml::XmlWriter;

/// Output types recognized but not generated by this crate.
const UNSUPPORTED_TYPES: [&str; 4] = ["tex", "s", "cpp", "ape_cpp"];

pub trait Writer {
    /// Render `components`, returning the paths of the files written.
    fn write(&self, components: &Components) -> Result<Vec<PathBuf>, RenderError>;
}

/// Select the writer for `path`.
pub fn writer_for(path: &Path, config: &RenderConfig) -> Result<Box<dyn Writer>, RenderError> {
    let extension = match &config.output_type {
        Some(kind) => Some(kind.as_str()),
        None => path.extension().and_then(|e| e.to_str()),
    };
    match extension {
        Some("h") => Ok(Box::new(HeaderWriter::new(path, config))),
        Some("asym") => Ok(Box::new(AsmWriter::new(path, config))),
        Some("xml") => Ok(Box::new(XmlWriter::new(path, config))),
        Some(kind) if UNSUPPORTED_TYPES.contains(&kind) => {
            Err(RenderError::Unsupported(kind.to_string()))
        }
        _ => Err(RenderError::UnknownType(path.to_path_buf())),
    }
}

/// Substitute every `<KEY>` placeholder in `template`.
///
/// Substituted values are copied as they are, so placeholders inside them
/// are left alone.
fn fill(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut contents = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('<') {
        contents.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let found = substitutions
            .iter()
            .find(|(key, _)| tail.starts_with(key) && tail[key.len()..].starts_with('>'));
        match found {
            Some((key, value)) => {
                contents.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                contents.push('<');
                rest = tail;
            }
        }
    }
    contents.push_str(rest);
    contents
}

/// File name component of `path` as text.
fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn write_file(path: &Path, contents: &str) -> Result<(), RenderError> {
    std::fs::write(path, contents).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })
}
