// Licensed under the Apache-2.0 license

//! C header output.
//!
//! Every component is written to its own header next to the output path,
//! named `<stem>_<component>.h`. For a component `uart` the header contains:
//!
//! ```text
//! #define REG_UART_BASE ((volatile void*)0x...)     component base and size
//! #define REG_UART_CTRL ((volatile ..._uint32_t*)0x...)
//! #define     UART_CTRL_EN_SHIFT 0u                 per field SHIFT/MASK/GET/SET
//! #define     UART_CTRL_MODE_FAST 0x3u              per enumeration value
//! typedef register_container RegUARTCtrl_t { ... }  raw access plus bitfields
//! typedef struct UART_t { ... } UART_t;             registers and padding
//! extern volatile UART_t uart;
//! ```
//!
//! The bitfield block lists the register layout in little-endian order under
//! `__LITTLE_ENDIAN__` and in big-endian order under `__BIG_ENDIAN__`.
//! Components and registers that are type copies only get address defines;
//! a copied component includes the header of its original.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use log::info;
use registers_ipxact::{Component, Components, Register, TypeIdentified};

use super::{file_name, fill, write_file, Writer};
use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::layout::{compile_component, compile_register, Chunk, Slot};
use crate::util::{camel_case, escape, guard, upper_ident};

const TEMPLATE: &str = r#"////////////////////////////////////////////////////////////////////////////////
///
/// @file       <FILE>
///
/// @project    <PROJECT>
///
/// @brief      <DESCRIPTION>
///
////////////////////////////////////////////////////////////////////////////////

/** @defgroup <GUARD>    <DESCRIPTION> */
/** @addtogroup <GUARD>
 * @{
 */
#ifndef <GUARD>
#define <GUARD>

#include <stdint.h>
<INCLUDES>
typedef uint8_t  <GUARD>_uint8_t;
typedef uint16_t <GUARD>_uint16_t;
typedef uint32_t <GUARD>_uint32_t;

#define register_container union
#define BITFIELD_BEGIN(__type__, __name__) struct {
#define BITFIELD_MEMBER(__type__, __name__, __offset__, __bits__) __type__ __name__:__bits__;
#define BITFIELD_END(__type__, __name__) } __name__;

<SERIALIZED>
#undef register_container
#undef BITFIELD_BEGIN
#undef BITFIELD_MEMBER
#undef BITFIELD_END

_Static_assert(sizeof(<COMPONENT_TYPE>_t) == <COMPONENT_SIZE>, "sizeof(<COMPONENT_TYPE>_t) must be <COMPONENT_SIZE>");

#endif /* !<GUARD> */
/** @} */
"#;

const INDENT: &str = "    ";

pub struct HeaderWriter {
    path: PathBuf,
    project: String,
}

impl HeaderWriter {
    pub fn new(path: &Path, config: &RenderConfig) -> Self {
        Self {
            path: path.to_path_buf(),
            project: config.project.clone(),
        }
    }

    /// Path of the header generated for `component`.
    pub fn component_file(&self, component: &str) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.path.with_file_name(format!("{stem}_{component}.h"))
    }

    /// Contents of the header for `component`.
    pub fn render(
        &self,
        components: &Components,
        component: &Component,
    ) -> Result<String, RenderError> {
        let file = file_name(&self.component_file(&component.name));
        let header = Header {
            guard: guard(&file),
            components,
            component,
            component_type: component_type(component),
        };

        let includes = match component.type_id_copy() {
            Some(original) => format!(
                "#include \"{}\"\n",
                file_name(&self.component_file(original))
            ),
            None => String::new(),
        };
        let registers = components.registers(component);
        let size = component.size(registers) * u64::from(component.address_unit_bits) / 8;
        let serialized = header.component()?;
        let description = file.strip_suffix(".h").unwrap_or(&file);

        Ok(fill(
            TEMPLATE,
            &[
                ("INCLUDES", includes.as_str()),
                ("SERIALIZED", serialized.as_str()),
                ("COMPONENT_TYPE", header.component_type.as_str()),
                ("COMPONENT_SIZE", size.to_string().as_str()),
                ("FILE", file.as_str()),
                ("PROJECT", self.project.as_str()),
                ("DESCRIPTION", description),
                ("GUARD", header.guard.as_str()),
            ],
        ))
    }
}

impl Writer for HeaderWriter {
    fn write(&self, components: &Components) -> Result<Vec<PathBuf>, RenderError> {
        let mut written = Vec::new();
        for component in components.iter() {
            let path = self.component_file(&component.name);
            let contents = self.render(components, component)?;
            write_file(&path, &contents)?;
            info!("Wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}

/// Upper-cased type identifier, or name, of a component.
fn component_type(component: &Component) -> String {
    upper_ident(component.type_id().unwrap_or(&component.name))
}

/// Raw access member of a register: `count` values of `unit` bits.
fn direct_access(register: &Register) -> Result<(u32, u32), RenderError> {
    match register.width {
        8 | 16 | 32 => Ok((register.width, 1)),
        w if w > 0 && w % 32 == 0 => Ok((32, w / 32)),
        width => Err(RenderError::UnsupportedWidth {
            register: register.name.clone(),
            width,
        }),
    }
}

struct Header<'a> {
    guard: String,
    components: &'a Components,
    component: &'a Component,
    component_type: String,
}

impl Header<'_> {
    fn storage_type(&self, width: u32) -> String {
        format!("{}_uint{width}_t", self.guard)
    }

    fn register_type(&self, register: &Register) -> String {
        format!(
            "Reg{}{}_t",
            self.component_type,
            camel_case(register.type_id().unwrap_or(&register.name))
        )
    }

    /// Byte address of `offset` address units into the component.
    fn byte_address(&self, offset: u64) -> u64 {
        (self.component.base_address + offset) * u64::from(self.component.address_unit_bits) / 8
    }

    fn component(&self) -> Result<String, RenderError> {
        let component = self.component;
        let name = upper_ident(&component.name);
        let registers = self.components.registers(component);
        let mut out = String::new();

        writeln!(
            out,
            "#define REG_{name}_BASE ((volatile void*)0x{:x}) /* {} */",
            self.byte_address(0),
            component.description
        )
        .unwrap();
        if component.range != 0 {
            let size = component.range * u64::from(component.address_unit_bits) / 8;
            writeln!(out, "#define REG_{name}_SIZE (0x{size:x})").unwrap();
        } else {
            writeln!(
                out,
                "#define REG_{name}_SIZE (sizeof({}_t))",
                self.component_type
            )
            .unwrap();
        }
        writeln!(out).unwrap();

        for register in registers.iter() {
            self.register(&mut out, register)?;
        }

        if !component.is_type_id_copy() {
            self.component_struct(&mut out)?;
        }

        writeln!(out, "/** @brief {} */", component.description).unwrap();
        writeln!(
            out,
            "extern volatile {}_t {};",
            self.component_type,
            escape(&component.name)
        )
        .unwrap();
        writeln!(out).unwrap();
        Ok(out)
    }

    fn register(&self, out: &mut String, register: &Register) -> Result<(), RenderError> {
        let (unit, _) = direct_access(register)?;
        writeln!(
            out,
            "#define REG_{}_{} ((volatile {}*)0x{:x}) /* {} */",
            upper_ident(&self.component.name),
            upper_ident(&register.name),
            self.storage_type(unit),
            self.byte_address(register.address),
            register.description
        )
        .unwrap();

        if self.component.is_type_id_copy() || register.is_type_id_copy() {
            return Ok(());
        }

        if !register.fields.is_empty() {
            self.field_defines(out, register);
            writeln!(out).unwrap();
        }
        self.register_container(out, register)
    }

    fn field_defines(&self, out: &mut String, register: &Register) {
        let prefix = format!(
            "{}_{}",
            upper_ident(&self.component.name),
            upper_ident(&register.name)
        );
        let enum_prefix = format!(
            "{}_{}",
            upper_ident(self.component.type_id().unwrap_or(&self.component.name)),
            upper_ident(register.type_id().unwrap_or(&register.name))
        );

        for field in register.fields.iter() {
            let field_name = upper_ident(&field.name);
            let define = format!("{prefix}_{field_name}");
            let shift = field.stop;
            let mask = field.mask();
            writeln!(out, "#define     {define}_SHIFT {shift}u").unwrap();
            writeln!(out, "#define     {define}_MASK  0x{mask:x}u").unwrap();
            writeln!(
                out,
                "#define GET_{define}(__reg__)  (((__reg__) & 0x{mask:x}) >> {shift}u)"
            )
            .unwrap();
            writeln!(
                out,
                "#define SET_{define}(__val__)  (((__val__) << {shift}u) & 0x{mask:x}u)"
            )
            .unwrap();

            if !field.enums.is_empty() {
                for value in field.enums.iter() {
                    writeln!(
                        out,
                        "#define     {enum_prefix}_{field_name}_{} 0x{:x}u",
                        upper_ident(&value.name.replace(' ', "")),
                        value.value
                    )
                    .unwrap();
                }
                writeln!(out).unwrap();
            }
        }
    }

    fn register_container(&self, out: &mut String, register: &Register) -> Result<(), RenderError> {
        let (unit, count) = direct_access(register)?;
        let register_type = self.register_type(register);
        let raw_type = self.storage_type(unit);

        writeln!(
            out,
            "/** @brief Register definition for @ref {}_t.{}. */",
            self.component_type,
            camel_case(&register.name)
        )
        .unwrap();
        writeln!(out, "typedef register_container {register_type} {{").unwrap();
        writeln!(out, "{INDENT}/** @brief {unit}bit direct register access. */").unwrap();
        if count > 1 {
            writeln!(out, "{INDENT}{raw_type} r{unit}[{count}];").unwrap();
        } else {
            writeln!(out, "{INDENT}{raw_type} r{unit};").unwrap();
        }

        let fields = self.component.fields(register);
        if !fields.is_empty() {
            let layout = compile_register(register, fields);
            writeln!(out).unwrap();
            writeln!(out, "{INDENT}BITFIELD_BEGIN({raw_type}, bits)").unwrap();
            writeln!(out, "#if defined(__LITTLE_ENDIAN__)").unwrap();
            for chunk in &layout.little_endian {
                self.bitfield_member(out, chunk);
            }
            writeln!(out, "#elif defined(__BIG_ENDIAN__)").unwrap();
            for chunk in layout.big_endian() {
                self.bitfield_member(out, chunk);
            }
            writeln!(out, "#else").unwrap();
            writeln!(out, "#error Unknown Endian").unwrap();
            writeln!(out, "#endif").unwrap();
            writeln!(out, "{INDENT}BITFIELD_END({raw_type}, bits)").unwrap();
        }
        writeln!(out, "}} {register_type};").unwrap();
        writeln!(out).unwrap();
        Ok(())
    }

    fn bitfield_member(&self, out: &mut String, chunk: &Chunk) {
        writeln!(out, "{INDENT}{INDENT}/** @brief {} */", chunk.description).unwrap();
        writeln!(
            out,
            "{INDENT}{INDENT}BITFIELD_MEMBER({}, {}, {}, {})",
            self.storage_type(chunk.unit),
            escape(&chunk.name),
            chunk.lsb,
            chunk.width()
        )
        .unwrap();
    }

    fn component_struct(&self, out: &mut String) -> Result<(), RenderError> {
        let component = self.component;
        let slots = compile_component(component, self.components.registers(component))?;

        writeln!(
            out,
            "/** @brief Component definition for @ref {}. */",
            component.name
        )
        .unwrap();
        writeln!(out, "typedef struct {}_t {{", self.component_type).unwrap();
        for slot in slots {
            match slot {
                Slot::Reserved {
                    offset,
                    unit,
                    count,
                } => {
                    writeln!(
                        out,
                        "{INDENT}/** @brief Reserved bytes to pad out data structure. */"
                    )
                    .unwrap();
                    writeln!(
                        out,
                        "{INDENT}{} {}[{count}];",
                        self.storage_type(unit),
                        Slot::reserved_name(offset)
                    )
                    .unwrap();
                }
                Slot::Register(register) => {
                    writeln!(out, "{INDENT}/** @brief {} */", register.description).unwrap();
                    let member = camel_case(&register.name);
                    let register_type = self.register_type(register);
                    if register.dimensions > 1 {
                        writeln!(
                            out,
                            "{INDENT}{register_type} {member}[{}];",
                            register.dimensions
                        )
                        .unwrap();
                    } else {
                        writeln!(out, "{INDENT}{register_type} {member};").unwrap();
                    }
                }
            }
            writeln!(out).unwrap();
        }
        writeln!(out, "}} {}_t;", self.component_type).unwrap();
        writeln!(out).unwrap();
        Ok(())
    }
}
