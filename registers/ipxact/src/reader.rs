// Licensed under the Apache-2.0 license

//! Input readers.
//!
//! A reader turns one input file into a [`Document`]. The only format
//! understood today is IP-XACT, selected by the `.xml` extension.

use std::path::{Path, PathBuf};

use log::debug;
use quick_xml::events::Event;

use crate::desc::{ComponentDesc, Document, EnumDesc, FieldDesc, RegisterDesc};
use crate::error::ReadError;

pub trait Reader {
    fn read(&self) -> Result<Document, ReadError>;
}

/// Pick a reader for `path` from its extension.
pub fn reader_for(path: &Path) -> Result<Box<dyn Reader>, ReadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("xml") => Ok(Box::new(IpxactReader::new(path))),
        _ => Err(ReadError::Unsupported(path.to_path_buf())),
    }
}

pub struct IpxactReader {
    path: PathBuf,
}

impl IpxactReader {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl Reader for IpxactReader {
    fn read(&self) -> Result<Document, ReadError> {
        debug!("Reading {}", self.path.display());
        let xml = std::fs::read_to_string(&self.path).map_err(|source| ReadError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_ipxact(&xml)
    }
}

/// Minimal element tree: names, concatenated text and children.
#[derive(Debug, Default)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn new(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            ..Default::default()
        }
    }

    /// Name without its namespace prefix.
    fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.local_name() == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.local_name() == name)
    }

    fn child_text(&self, name: &str) -> Option<String> {
        self.child(name).map(|c| c.text.trim().to_string())
    }

    /// Text of the element at `path` below this one.
    fn text_at(&self, path: &[&str]) -> Option<String> {
        let mut element = self;
        for name in path {
            element = element.child(name)?;
        }
        Some(element.text.trim().to_string())
    }
}

fn parse_tree(xml: &str) -> Result<Element, ReadError> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack = vec![Element::default()];
    loop {
        let position = reader.buffer_position() as u64;
        let event = reader
            .read_event()
            .map_err(|source| ReadError::Xml { position, source })?;
        match event {
            Event::Start(start) => stack.push(Element::new(start.name().as_ref())),
            Event::Empty(start) => {
                let element = Element::new(start.name().as_ref());
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(element);
                }
            }
            Event::End(_) => {
                if stack.len() > 1 {
                    if let Some(element) = stack.pop() {
                        if let Some(parent) = stack.last_mut() {
                            parent.children.push(element);
                        }
                    }
                }
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|source| ReadError::Xml { position, source })?;
                if let Some(element) = stack.last_mut() {
                    element.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(element) = stack.last_mut() {
                    element.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    // Unclosed elements still carry data; fold them into their parents.
    while stack.len() > 1 {
        if let Some(element) = stack.pop() {
            if let Some(parent) = stack.last_mut() {
                parent.children.push(element);
            }
        }
    }
    Ok(stack.pop().unwrap_or_default())
}

/// Parse IP-XACT text into a document description.
///
/// Every `addressBlock` found anywhere in the tree becomes a component. The
/// block's address unit size comes from the first following sibling named
/// `addressUnitBits`. Namespace prefixes are ignored when matching names.
pub fn parse_ipxact(xml: &str) -> Result<Document, ReadError> {
    let root = parse_tree(xml)?;
    let mut document = Document::default();
    collect_blocks(&root, &mut document.components);
    debug!("Found {} address blocks", document.components.len());
    Ok(document)
}

fn collect_blocks(element: &Element, components: &mut Vec<ComponentDesc>) {
    for (i, child) in element.children.iter().enumerate() {
        match child.local_name() {
            "addressBlock" => {
                let address_unit_bits = element.children[i + 1..]
                    .iter()
                    .find(|sibling| sibling.local_name() == "addressUnitBits")
                    .map(|sibling| sibling.text.trim().to_string());
                components.push(component(child, address_unit_bits));
            }
            "addressUnitBits" => {}
            _ => collect_blocks(child, components),
        }
    }
}

fn component(block: &Element, address_unit_bits: Option<String>) -> ComponentDesc {
    ComponentDesc {
        name: block.child_text("name"),
        description: block.child_text("description"),
        base_address: block.child_text("baseAddress"),
        range: block.child_text("range"),
        address_unit_bits,
        module_name: block.text_at(&["vendorExtensions", "hdlModuleName"]),
        type_id: block.child_text("typeIdentifier"),
        registers: block.children_named("register").map(register).collect(),
    }
}

fn register(element: &Element) -> RegisterDesc {
    RegisterDesc {
        name: element.child_text("name"),
        description: element.child_text("description"),
        address_offset: element.child_text("addressOffset"),
        size: element.child_text("size"),
        dim: element.child_text("dim"),
        type_id: element.child_text("typeIdentifier"),
        fields: element.children_named("field").map(field).collect(),
    }
}

fn field(element: &Element) -> FieldDesc {
    FieldDesc {
        name: element.child_text("name"),
        description: element.child_text("description"),
        bit_offset: element.child_text("bitOffset"),
        bit_width: element.child_text("bitWidth"),
        access: element.child_text("access"),
        reset_value: element.text_at(&["resets", "reset", "value"]),
        reserved: element.text_at(&["vendorExtensions", "reserved"]),
        constant_value: element.text_at(&["vendorExtensions", "constantValue"]),
        enums: element
            .child("enumeratedValues")
            .map(|values| values.children_named("enumeratedValue").map(enumeration).collect())
            .unwrap_or_default(),
    }
}

fn enumeration(element: &Element) -> EnumDesc {
    EnumDesc {
        name: element.child_text("name"),
        description: element.child_text("description"),
        value: element.child_text("value"),
    }
}
