// Licensed under the Apache-2.0 license

//! Assembler symbol table output.
//!
//! One file with `.equ` symbols for the byte address of every register and
//! for the shift, mask and enumerated values of every field:
//!
//! ```text
//! .equ    REG_UART_CTRL, 0x40001000 ; Control register
//! .equ        UART_CTRL_EN_SHIFT, 0
//! .equ        UART_CTRL_EN_MASK,  0x1
//! ```

use std::fmt::Write;
use std::path::{Path, PathBuf};

use log::info;
use registers_ipxact::{Component, Components, Register};

use super::{file_name, fill, write_file, Writer};
use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::util::upper_ident;

const TEMPLATE: &str = r#"/*
 * @file       <FILE>
 *
 * @project    <PROJECT>
 *
 * Register symbols.
 */

<SERIALIZED>"#;

pub struct AsmWriter {
    path: PathBuf,
    project: String,
}

impl AsmWriter {
    pub fn new(path: &Path, config: &RenderConfig) -> Self {
        Self {
            path: path.to_path_buf(),
            project: config.project.clone(),
        }
    }

    /// Contents of the symbol file for all `components`.
    pub fn render(&self, components: &Components) -> String {
        let mut out = String::new();
        for component in components.iter() {
            let owner = components.resolve(component);
            for register in owner.registers.iter() {
                register_symbols(&mut out, component, owner, register);
            }
            writeln!(out).unwrap();
        }
        fill(
            TEMPLATE,
            &[
                ("SERIALIZED", out.as_str()),
                ("FILE", file_name(&self.path).as_str()),
                ("PROJECT", self.project.as_str()),
            ],
        )
    }
}

impl Writer for AsmWriter {
    fn write(&self, components: &Components) -> Result<Vec<PathBuf>, RenderError> {
        write_file(&self.path, &self.render(components))?;
        info!("Wrote {}", self.path.display());
        Ok(vec![self.path.clone()])
    }
}

/// Symbols of `register`, placed at the base of `component`. `owner` is the
/// component that defines the register, which differs for a type copy.
fn register_symbols(
    out: &mut String,
    component: &Component,
    owner: &Component,
    register: &Register,
) {
    let component_name = upper_ident(&component.name);
    let register_name = upper_ident(&register.name);
    let address = (component.base_address + register.address)
        * u64::from(component.address_unit_bits)
        / 8;

    if register.description.is_empty() {
        writeln!(out, ".equ    REG_{component_name}_{register_name}, 0x{address:x}").unwrap();
    } else {
        writeln!(
            out,
            ".equ    REG_{component_name}_{register_name}, 0x{address:x} ; {}",
            register.description
        )
        .unwrap();
    }

    for field in owner.fields(register).iter() {
        let prefix = format!(
            "{component_name}_{register_name}_{}",
            upper_ident(&field.name)
        );
        writeln!(out, ".equ        {prefix}_SHIFT, {}", field.stop).unwrap();
        writeln!(out, ".equ        {prefix}_MASK,  0x{:x}", field.mask()).unwrap();
        if !field.enums.is_empty() {
            for value in field.enums.iter() {
                writeln!(
                    out,
                    ".equ        {prefix}_{}, 0x{:x}",
                    upper_ident(&value.name),
                    value.value
                )
                .unwrap();
            }
            writeln!(out).unwrap();
        }
    }
    writeln!(out).unwrap();
}
