// Licensed under the Apache-2.0 license

//! IP-XACT output.
//!
//! The merged model is written back as one `ipxact:component` with a
//! memory map per component, using the element names the IP-XACT reader
//! understands. Reading the file again gives the same model, though not
//! the same text as the original inputs.
//!
//! ```text
//! <ipxact:memoryMap>
//!   <ipxact:name>uart</ipxact:name>
//!   <ipxact:addressBlock>             name, base, range, type identifier
//!     <ipxact:register>               offset, size, dim, fields
//!   </ipxact:addressBlock>
//!   <ipxact:addressUnitBits>8</ipxact:addressUnitBits>
//! </ipxact:memoryMap>
//! ```
//!
//! Type copies carry only their type identifier and are written after the
//! element they copy, so that the original is declared first on re-read.

use std::path::{Path, PathBuf};

use log::info;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use registers_ipxact::{Access, Component, Components, Field, Register, TypeIdentified};

use super::{write_file, Writer};
use crate::config::RenderConfig;
use crate::error::RenderError;

const NAMESPACE: &str = "http://www.accellera.org/XMLSchema/IPXACT/1685-2014";
const SCHEMA_LOCATION: &str =
    "http://www.accellera.org/images/XMLSchema/IPXACT/1685-2014/index.xsd";

pub struct XmlWriter {
    path: PathBuf,
    project: String,
}

impl XmlWriter {
    pub fn new(path: &Path, config: &RenderConfig) -> Self {
        Self {
            path: path.to_path_buf(),
            project: config.project.clone(),
        }
    }

    /// IP-XACT text for all `components`.
    pub fn render(&self, components: &Components) -> Result<String, RenderError> {
        let mut xml = XmlDocument::new();
        xml.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        xml.event(Event::Start(BytesStart::new("ipxact:component").with_attributes([
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
            ("xmlns:ipxact", NAMESPACE),
            ("xsi:schemaLocation", SCHEMA_LOCATION),
        ])))?;
        xml.element("ipxact:vendor", "registers")?;
        xml.element("ipxact:library", &self.project)?;
        xml.element("ipxact:name", "Register Definitions")?;
        xml.element("ipxact:version", "1.0")?;

        if !components.is_empty() {
            xml.start("ipxact:memoryMaps")?;
            for component in originals_first(components.iter()) {
                memory_map(&mut xml, component)?;
            }
            xml.end("ipxact:memoryMaps")?;
        }
        xml.end("ipxact:component")?;
        Ok(xml.finish())
    }
}

impl Writer for XmlWriter {
    fn write(&self, components: &Components) -> Result<Vec<PathBuf>, RenderError> {
        write_file(&self.path, &self.render(components)?)?;
        info!("Wrote {}", self.path.display());
        Ok(vec![self.path.clone()])
    }
}

struct XmlDocument {
    writer: quick_xml::Writer<Vec<u8>>,
}

impl XmlDocument {
    fn new() -> Self {
        Self {
            writer: quick_xml::Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), RenderError> {
        self.writer
            .write_event(event)
            .map_err(|e| RenderError::Xml(e.to_string()))
    }

    fn start(&mut self, name: &str) -> Result<(), RenderError> {
        self.event(Event::Start(BytesStart::new(name)))
    }

    fn end(&mut self, name: &str) -> Result<(), RenderError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    /// `<name>text</name>`, with `text` escaped.
    fn element(&mut self, name: &str, text: &str) -> Result<(), RenderError> {
        self.start(name)?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    fn finish(self) -> String {
        String::from_utf8_lossy(&self.writer.into_inner()).into_owned()
    }
}

/// `items` in order, except that a type copy met before its original is
/// moved to the end.
fn originals_first<'a, T: TypeIdentified>(items: impl Iterator<Item = &'a T>) -> Vec<&'a T> {
    let mut ordered: Vec<&T> = Vec::new();
    let mut deferred = Vec::new();
    for item in items {
        match item.type_id_copy() {
            Some(original) if !ordered.iter().any(|o| o.name() == original) => {
                deferred.push(item)
            }
            _ => ordered.push(item),
        }
    }
    ordered.extend(deferred);
    ordered
}

fn access_keyword(access: Access) -> Option<&'static str> {
    match access {
        Access::ReadOnly => Some("read-only"),
        Access::WriteOnly => Some("write-only"),
        Access::ReadWrite => Some("read-write"),
        Access::ReadWriteOnce => Some("read-writeOnce"),
        Access::WriteOnce => Some("writeOnce"),
        Access::Reserved => None,
    }
}

fn memory_map(xml: &mut XmlDocument, component: &Component) -> Result<(), RenderError> {
    xml.start("ipxact:memoryMap")?;
    xml.element("ipxact:name", &component.name)?;
    xml.element("ipxact:description", &component.description)?;

    xml.start("ipxact:addressBlock")?;
    xml.element("ipxact:name", &component.name)?;
    xml.element("ipxact:description", &component.description)?;
    xml.element(
        "ipxact:baseAddress",
        &format!("{:#x}", component.base_address),
    )?;
    xml.element("ipxact:range", &format!("{:#x}", component.range))?;
    if let Some(id) = component.type_id() {
        xml.element("ipxact:typeIdentifier", id)?;
    }
    xml.element("ipxact:usage", "register")?;
    xml.element("ipxact:volatile", "false")?;
    for register in originals_first(component.registers.iter()) {
        register_element(xml, register)?;
    }
    if !component.module_name.is_empty() {
        xml.start("ipxact:vendorExtensions")?;
        xml.element("hdlModuleName", &component.module_name)?;
        xml.end("ipxact:vendorExtensions")?;
    }
    xml.end("ipxact:addressBlock")?;

    xml.element(
        "ipxact:addressUnitBits",
        &component.address_unit_bits.to_string(),
    )?;
    xml.end("ipxact:memoryMap")
}

fn register_element(xml: &mut XmlDocument, register: &Register) -> Result<(), RenderError> {
    xml.start("ipxact:register")?;
    xml.element("ipxact:name", &register.name)?;
    xml.element("ipxact:description", &register.description)?;
    xml.element("ipxact:addressOffset", &format!("{:#x}", register.address))?;
    if let Some(id) = register.type_id() {
        xml.element("ipxact:typeIdentifier", id)?;
    }
    if register.dimensions > 1 {
        xml.element("ipxact:dim", &register.dimensions.to_string())?;
    }
    xml.element("ipxact:size", &register.width.to_string())?;
    xml.element("ipxact:volatile", "true")?;
    for field in register.fields.iter() {
        field_element(xml, field)?;
    }
    xml.end("ipxact:register")
}

fn field_element(xml: &mut XmlDocument, field: &Field) -> Result<(), RenderError> {
    xml.start("ipxact:field")?;
    xml.element("ipxact:name", &field.name)?;
    xml.element("ipxact:description", &field.description)?;
    xml.element("ipxact:bitOffset", &field.stop.to_string())?;
    xml.element("ipxact:bitWidth", &field.width().to_string())?;
    if let Some(reset) = field.reset {
        xml.start("ipxact:resets")?;
        xml.start("ipxact:reset")?;
        xml.element("ipxact:value", &format!("{reset:#x}"))?;
        xml.end("ipxact:reset")?;
        xml.end("ipxact:resets")?;
    }
    // No access element reads back as reserved.
    if let Some(access) = access_keyword(field.access) {
        xml.element("ipxact:access", access)?;
    }

    if !field.enums.is_empty() {
        xml.start("ipxact:enumeratedValues")?;
        for value in field.enums.iter() {
            xml.start("ipxact:enumeratedValue")?;
            xml.element("ipxact:name", &value.name)?;
            xml.element("ipxact:description", &value.description)?;
            xml.element("ipxact:value", &format!("{:#x}", value.value))?;
            xml.end("ipxact:enumeratedValue")?;
        }
        xml.end("ipxact:enumeratedValues")?;
    }

    if field.reserved || field.constant {
        xml.start("ipxact:vendorExtensions")?;
        xml.element("reserved", &field.reserved.to_string())?;
        xml.element("constantValue", &field.constant.to_string())?;
        xml.end("ipxact:vendorExtensions")?;
    }
    xml.end("ipxact:field")
}
