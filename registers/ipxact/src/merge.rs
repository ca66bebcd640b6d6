// Licensed under the Apache-2.0 license

//! Applies parsed document descriptions to the register model.
//!
//! Documents are merged strictly in the order they are given. The first
//! occurrence of a key creates the entity; later occurrences update it in
//! place. Registers are keyed by name, or by address when the run merges by
//! address.
//!
//! Malformed attributes are logged and fail the element they belong to,
//! without stopping its siblings; the result of every merge call is the AND
//! of its children. Redefining the children of a type copy is a
//! [`MergeError`].

use log::{debug, error, info, warn};

use crate::config::MergeConfig;
use crate::desc::{ComponentDesc, Document, EnumDesc, FieldDesc, RegisterDesc};
use crate::error::MergeError;
use crate::model::{
    bit_mask, Access, Component, Components, Enumeration, Field, Register, TypeIdentified,
    DEFAULT_ADDRESS_UNIT_BITS,
};
use crate::number::Number;

pub struct Merger<'a> {
    components: &'a mut Components,
    config: &'a MergeConfig,
}

impl<'a> Merger<'a> {
    pub fn new(components: &'a mut Components, config: &'a MergeConfig) -> Self {
        Self { components, config }
    }

    pub fn merge_document(&mut self, document: &Document) -> Result<bool, MergeError> {
        let mut status = true;
        for desc in &document.components {
            let merged = self.merge_component(desc)?;
            status = status && merged;
        }
        Ok(status)
    }

    pub fn merge_component(&mut self, desc: &ComponentDesc) -> Result<bool, MergeError> {
        let Some(name) = required_name(desc.name.as_deref(), "document", "address block") else {
            return Ok(false);
        };
        let mut status = true;

        let mut address_unit_bits = DEFAULT_ADDRESS_UNIT_BITS;
        if let Some(text) = desc.address_unit_bits.as_deref() {
            match parse_u32(text) {
                Some(bits) if bits != 0 => address_unit_bits = bits,
                _ => {
                    error!("{name}: addressUnitBits with invalid text '{text}'");
                    status = false;
                }
            }
        }

        let original = desc
            .type_id
            .as_deref()
            .and_then(|id| self.components.component_with_type_id(id, name))
            .map(|c| c.name.clone());

        let config = self.config;
        let (component, update) = self.components.get_or_create(name);
        if update {
            debug!("Updating component {name}");
        } else {
            debug!("Created component {name}");
        }

        component.address_unit_bits = address_unit_bits;
        if let Some(module_name) = &desc.module_name {
            component.module_name = module_name.trim().to_string();
        }
        if let Some(description) = &desc.description {
            component.description = description.clone();
        }
        if let Some(text) = desc.range.as_deref() {
            match Number::parse(text).get() {
                Some(range) => component.range = range,
                None => {
                    error!("{name}: range with invalid text '{text}'");
                    status = false;
                }
            }
        }
        if let Some(text) = desc.base_address.as_deref() {
            match Number::parse(text).get() {
                Some(base) => {
                    if update && component.base_address != base {
                        info!("Replacing {name} base address with {base:#x}");
                    }
                    component.base_address = base;
                }
                None => {
                    error!("{name}: baseAddress with invalid text '{text}'");
                    status = false;
                }
            }
        }

        if let Some(id) = desc.type_id.as_deref() {
            match &original {
                Some(original) => {
                    if !component.registers.is_empty() {
                        warn!(
                            "{name}: dropping {} registers, type '{id}' is defined by {original}",
                            component.registers.len()
                        );
                        component.registers.clear();
                    }
                    component.set_type_id(id, original);
                }
                None => component.set_type_id(id, name),
            }
        }

        if let Some(original) = component.type_id_copy() {
            if !desc.registers.is_empty() {
                return Err(MergeError::ComponentCopyRedefinition {
                    component: name.to_string(),
                    original: original.to_string(),
                    type_id: component.type_id().unwrap_or_default().to_string(),
                });
            }
        }

        for register in &desc.registers {
            let merged = merge_register(config, component, register, update)?;
            status = status && merged;
        }
        Ok(status)
    }
}

/// Merge one register description into `component`.
///
/// `update` is true when `component` existed before this document. A
/// register that has to be created is never treated as an update.
pub fn merge_register(
    config: &MergeConfig,
    component: &mut Component,
    desc: &RegisterDesc,
    update: bool,
) -> Result<bool, MergeError> {
    let mut update = update;
    let Some(name) = required_name(desc.name.as_deref(), &component.name, "register") else {
        return Ok(false);
    };
    let mut status = true;
    let address = desc.address_offset.as_deref().map(|text| (text, Number::parse(text)));
    let has_fields = !desc.fields.is_empty();

    let by_address = match address {
        Some((_, number)) if config.merge_by_address() => number.get(),
        _ => None,
    };
    let found = match by_address {
        Some(address) => match component.register_at(address).map(|r| r.name.clone()) {
            Some(previous) => {
                if !component.registers.rename(&previous, name) {
                    error!(
                        "{}: register {previous} at {address:#x} cannot be renamed to {name}, the name is taken",
                        component.name
                    );
                    return Ok(false);
                }
                if previous != name {
                    info!("  Register {previous} at {address:#x} renamed to {name}");
                }
                if let Some(register) = component.registers.get_mut(name) {
                    register.name = name.to_string();
                    register.fields.clear();
                }
                if has_fields {
                    update = false;
                }
                true
            }
            None => false,
        },
        None => component.registers.contains(name),
    };

    if !found {
        if update {
            info!("  Register {}.{name} not found, creating it", component.name);
        }
        component.registers.set(name, Register::new(name));
        update = false;
    }

    let original = desc
        .type_id
        .as_deref()
        .and_then(|id| component.register_with_type_id(id, name))
        .map(|r| r.name.clone());
    let component_name = component.name.clone();
    let path = format!("{component_name}.{name}");
    let Some(register) = component.registers.get_mut(name) else {
        return Ok(false);
    };

    if let Some(text) = desc.dim.as_deref() {
        match parse_u32(text) {
            Some(dimensions) if dimensions != 0 => register.dimensions = dimensions,
            _ => {
                error!("{path}: dim with invalid text '{text}'");
                status = false;
            }
        }
    }
    if let Some(description) = &desc.description {
        if update {
            debug!("Replacing {path} description");
        }
        register.description = description.clone();
    }
    match desc.size.as_deref() {
        Some(text) => match parse_u32(text) {
            Some(width) if width != 0 => {
                if update && register.width != width {
                    info!("Replacing {path} width with {width}");
                }
                register.width = width;
            }
            _ => {
                error!("{path}: size with invalid text '{text}'");
                status = false;
            }
        },
        None if !update && register.width == 0 => {
            error!("{path}: missing size");
            status = false;
        }
        None => {}
    }

    if let Some(id) = desc.type_id.as_deref() {
        match &original {
            Some(original) => {
                if !register.fields.is_empty() {
                    warn!(
                        "{path}: dropping {} fields, type '{id}' is defined by {original}",
                        register.fields.len()
                    );
                    register.fields.clear();
                }
                register.set_type_id(id, original);
            }
            None => register.set_type_id(id, name),
        }
    }

    if let Some(original) = register.type_id_copy() {
        if has_fields {
            return Err(MergeError::RegisterCopyRedefinition {
                component: component_name,
                register: name.to_string(),
                original: original.to_string(),
                type_id: register.type_id().unwrap_or_default().to_string(),
            });
        }
    }

    for field in &desc.fields {
        let merged = merge_field(register, field, update);
        status = status && merged;
    }

    match address {
        Some((text, number)) => match number.get() {
            Some(address) => {
                if update && register.address != address {
                    info!("Replacing {path} address with {address:#x}");
                }
                register.address = address;
            }
            None => {
                error!("{path}: addressOffset with invalid text '{text}'");
                status = false;
            }
        },
        None if !found => {
            error!("{path}: missing addressOffset");
            status = false;
        }
        None => {}
    }

    component.registers.sort();
    Ok(status)
}

/// Merge one field description into `register`.
///
/// While updating, fields unknown to the register are dropped and the bit
/// position and access of known fields are left alone.
pub fn merge_field(register: &mut Register, desc: &FieldDesc, update: bool) -> bool {
    let Some(name) = required_name(desc.name.as_deref(), &register.name, "field") else {
        return false;
    };
    if !register.fields.contains(name) {
        if update {
            info!("    Bitfield {}.{name} not found, dropping", register.name);
            return true;
        }
        register.fields.set(name, Field::new(name));
    }

    let path = format!("{}.{name}", register.name);
    let register_width = register.width;
    let Some(field) = register.fields.get_mut(name) else {
        return false;
    };
    let mut status = true;

    if let Some(description) = &desc.description {
        field.description = description.clone();
    }
    if let Some(text) = desc.reserved.as_deref() {
        field.reserved = text.trim() == "true";
    }
    if let Some(text) = desc.constant_value.as_deref() {
        field.constant = text.trim() == "true";
    }

    let mut stop = 0;
    match desc.bit_offset.as_deref() {
        Some(text) => match parse_u32(text) {
            Some(offset) => stop = offset,
            None => {
                error!("{path}: bitOffset with invalid text '{text}'");
                status = false;
            }
        },
        None if !update => {
            error!("{path}: missing bitOffset");
            status = false;
        }
        None => {}
    }

    let mut width = None;
    match desc.bit_width.as_deref() {
        Some(text) => match parse_u32(text) {
            Some(bits) => width = Some(bits),
            None => {
                error!("{path}: bitWidth with invalid text '{text}'");
                status = false;
            }
        },
        None if !update => {
            error!("{path}: missing bitWidth");
            status = false;
        }
        None => {}
    }

    for enumeration in &desc.enums {
        let merged = merge_enumeration(field, enumeration);
        status = status && merged;
    }

    if !update {
        match width {
            Some(0) => {
                error!("{path}: bitWidth of zero");
                status = false;
            }
            Some(width) => {
                field.stop = stop;
                field.start = stop.saturating_add(width - 1);
                if register_width != 0 && field.start >= register_width {
                    error!(
                        "{path}: bits {}..={} do not fit in a {register_width}-bit register",
                        field.stop, field.start
                    );
                    status = false;
                }
            }
            None => {}
        }

        field.access = if name.starts_with("reserved") {
            Access::Reserved
        } else {
            desc.access
                .as_deref()
                .map(Access::from_ipxact)
                .unwrap_or(Access::Reserved)
        };
    }

    if let Some(text) = desc.reset_value.as_deref() {
        if status {
            let limit = bit_mask(0, field.width() - 1);
            match Number::parse(text).get() {
                Some(reset) if reset & limit == reset => field.reset = Some(reset),
                Some(reset) => {
                    error!("{path}: reset value {reset:#x} does not fit in the field");
                    status = false;
                }
                None => {
                    error!("{path}: reset value with invalid text '{text}'");
                    status = false;
                }
            }
        }
    }

    register.fields.sort();
    status
}

/// Create or update an enumeration of `field`. Enumerations are never dropped.
pub fn merge_enumeration(field: &mut Field, desc: &EnumDesc) -> bool {
    let Some(name) = required_name(desc.name.as_deref(), &field.name, "enumerated value") else {
        return false;
    };
    let mut status = true;
    let (enumeration, _) = field
        .enums
        .get_or_insert_with(name, || Enumeration::new(name));
    if let Some(description) = &desc.description {
        enumeration.description = description.clone();
    }
    if let Some(text) = desc.value.as_deref() {
        match Number::parse(text).get() {
            Some(value) => enumeration.value = value,
            None => {
                error!("{}.{name}: value with invalid text '{text}'", field.name);
                status = false;
            }
        }
    }
    field.enums.sort();
    status
}

fn required_name<'d>(name: Option<&'d str>, parent: &str, kind: &str) -> Option<&'d str> {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => Some(name),
        _ => {
            error!("{parent}: {kind} with no name");
            None
        }
    }
}

fn parse_u32(text: &str) -> Option<u32> {
    Number::parse(text)
        .get()
        .and_then(|value| u32::try_from(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    fn field(name: &str, offset: u32, width: u32, access: &str) -> FieldDesc {
        FieldDesc {
            name: text(name),
            bit_offset: text(&offset.to_string()),
            bit_width: text(&width.to_string()),
            access: text(access),
            ..Default::default()
        }
    }

    fn register(name: &str, address: u64, fields: Vec<FieldDesc>) -> RegisterDesc {
        RegisterDesc {
            name: text(name),
            address_offset: text(&format!("{address:#x}")),
            size: text("32"),
            fields,
            ..Default::default()
        }
    }

    fn component(name: &str, registers: Vec<RegisterDesc>) -> ComponentDesc {
        ComponentDesc {
            name: text(name),
            base_address: text("0x40000000"),
            registers,
            ..Default::default()
        }
    }

    fn merge(components: &mut Components, config: &MergeConfig, desc: ComponentDesc) -> Result<bool, MergeError> {
        let document = Document {
            components: vec![desc],
        };
        Merger::new(components, config).merge_document(&document)
    }

    fn field_names(register: &Register) -> Vec<&str> {
        register.fields.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_create_component() {
        let mut components = Components::new();
        let config = MergeConfig::default();
        let desc = component(
            "UART",
            vec![
                register("STATUS", 4, vec![field("BUSY", 0, 1, "read-only")]),
                register("CTRL", 0, vec![field("EN", 0, 1, "read-write"), field("MODE", 4, 2, "write-only")]),
            ],
        );
        assert!(merge(&mut components, &config, desc).unwrap());

        let uart = components.get("UART").unwrap();
        assert_eq!(uart.base_address, 0x4000_0000);
        assert_eq!(uart.address_unit_bits, 8);
        let names: Vec<_> = uart.registers.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["CTRL", "STATUS"]);

        let ctrl = uart.registers.get("CTRL").unwrap();
        let mode = ctrl.fields.get("MODE").unwrap();
        assert_eq!((mode.stop, mode.start), (4, 5));
        assert_eq!(mode.access, Access::WriteOnly);
        assert_eq!(ctrl.mask(), 0x31);
    }

    #[test]
    fn test_merge_by_address_replaces_register() {
        let mut components = Components::new();
        let config = MergeConfig::by_address();
        let first = component("C", vec![register("foo", 0x10, vec![field("A", 0, 4, "read-write")])]);
        let second = component("C", vec![register("bar", 0x10, vec![field("B", 8, 4, "read-only")])]);
        assert!(merge(&mut components, &config, first).unwrap());
        assert!(merge(&mut components, &config, second).unwrap());

        let c = components.get("C").unwrap();
        assert_eq!(c.registers.len(), 1);
        let bar = c.register_at(0x10).unwrap();
        assert_eq!(bar.name, "bar");
        assert!(c.registers.get("foo").is_none());
        assert_eq!(field_names(bar), vec!["B"]);
        let b = bar.fields.get("B").unwrap();
        assert_eq!((b.stop, b.start, b.access), (8, 11, Access::ReadOnly));
    }

    #[test]
    fn test_merge_by_name_updates_in_place() {
        let mut components = Components::new();
        let config = MergeConfig::by_name();
        let first = component("C", vec![register("R", 0x0, vec![field("A", 0, 4, "read-write")])]);
        assert!(merge(&mut components, &config, first).unwrap());

        let mut update = field("A", 8, 2, "read-only");
        update.description = text("updated");
        let mut second = register("R", 0x4, vec![update, field("NEW", 16, 1, "read-write")]);
        second.description = text("moved");
        assert!(merge(&mut components, &config, component("C", vec![second])).unwrap());

        let r = components.get("C").unwrap().registers.get("R").unwrap();
        assert_eq!(r.address, 0x4);
        assert_eq!(r.description, "moved");
        assert_eq!(field_names(r), vec!["A"], "unknown fields are dropped on update");
        let a = r.fields.get("A").unwrap();
        assert_eq!(a.description, "updated");
        assert_eq!((a.stop, a.start, a.access), (0, 3, Access::ReadWrite));
    }

    #[test]
    fn test_new_register_in_known_component_is_created() {
        let mut components = Components::new();
        let config = MergeConfig::default();
        merge(&mut components, &config, component("C", vec![register("R0", 0, vec![])])).unwrap();
        let added = component("C", vec![register("R1", 4, vec![field("X", 0, 8, "read-write")])]);
        assert!(merge(&mut components, &config, added).unwrap());

        let r1 = components.get("C").unwrap().registers.get("R1").unwrap();
        assert_eq!(field_names(r1), vec!["X"]);
    }

    #[test]
    fn test_component_type_id_sharing() {
        let mut components = Components::new();
        let config = MergeConfig::default();
        let mut a = component("A", vec![register("R0", 0, vec![field("F", 0, 8, "read-write")])]);
        a.type_id = text("timer");
        assert!(merge(&mut components, &config, a).unwrap());

        let mut b = component("B", vec![]);
        b.type_id = text("timer");
        assert!(merge(&mut components, &config, b).unwrap());

        let b = components.get("B").unwrap();
        assert!(b.is_type_id_copy());
        assert_eq!(b.type_id_copy(), Some("A"));
        let shared = components.registers(b);
        assert!(std::ptr::eq(shared, &components.get("A").unwrap().registers));
        assert_eq!(shared.len(), 1);

        let mut redefine = component("B", vec![register("R0", 0, vec![field("G", 8, 8, "read-write")])]);
        redefine.type_id = text("timer");
        let err = merge(&mut components, &config, redefine).unwrap_err();
        assert!(matches!(err, MergeError::ComponentCopyRedefinition { .. }));
    }

    #[test]
    fn test_register_type_id_sharing() {
        let mut components = Components::new();
        let config = MergeConfig::default();
        let mut r0 = register("CH0", 0, vec![field("F", 0, 8, "read-write")]);
        r0.type_id = text("channel");
        let mut r1 = register("CH1", 4, vec![]);
        r1.type_id = text("channel");
        assert!(merge(&mut components, &config, component("C", vec![r0, r1])).unwrap());

        let c = components.get("C").unwrap();
        let ch1 = c.registers.get("CH1").unwrap();
        assert_eq!(ch1.type_id_copy(), Some("CH0"));
        assert_eq!(c.resolve_register(ch1).name, "CH0");
        assert_eq!(c.fields(ch1).len(), 1);

        let mut redefine = register("CH1", 4, vec![field("G", 0, 8, "read-write")]);
        redefine.type_id = text("channel");
        let err = merge(&mut components, &config, component("C", vec![redefine])).unwrap_err();
        assert!(matches!(
            err,
            MergeError::RegisterCopyRedefinition { ref component, ref register, .. }
                if component == "C" && register == "CH1"
        ));
    }

    #[test]
    fn test_invalid_numbers_fail_but_siblings_merge() {
        let mut components = Components::new();
        let config = MergeConfig::default();
        let mut bad = register("BAD", 0, vec![]);
        bad.address_offset = text("0xZZ");
        let good = register("GOOD", 8, vec![field("OK", 0, 1, "read-write")]);
        assert!(!merge(&mut components, &config, component("C", vec![bad, good])).unwrap());

        let c = components.get("C").unwrap();
        assert_eq!(c.registers.get("GOOD").unwrap().address, 8);
        assert!(c.registers.get("BAD").is_some());
    }

    #[test]
    fn test_field_checks() {
        let mut components = Components::new();
        let config = MergeConfig::default();

        let mut reset = field("RST", 0, 4, "read-write");
        reset.reset_value = text("0x1F");
        let r = register("R", 0, vec![reset]);
        assert!(!merge(&mut components, &config, component("C", vec![r])).unwrap());
        let rst = components.get("C").unwrap().registers.get("R").unwrap().fields.get("RST").unwrap();
        assert_eq!(rst.reset, None);

        let r = register("WIDE", 4, vec![field("TOP", 30, 4, "read-write")]);
        assert!(!merge(&mut components, &config, component("C", vec![r])).unwrap());

        let r = register("ZERO", 8, vec![field("NONE", 0, 0, "read-write")]);
        assert!(!merge(&mut components, &config, component("C", vec![r])).unwrap());

        let mut fits = field("FITS", 0, 4, "read-write");
        fits.reset_value = text("4'hA");
        let r = register("OK", 12, vec![fits]);
        assert!(merge(&mut components, &config, component("C", vec![r])).unwrap());
        let ok = components.get("C").unwrap().registers.get("OK").unwrap();
        assert_eq!(ok.reset_value(), 0xA);
    }

    #[test]
    fn test_access_and_vendor_flags() {
        let mut components = Components::new();
        let config = MergeConfig::default();
        let mut spare = field("SPARE", 4, 4, "read-write");
        spare.reserved = text("true");
        spare.constant_value = text("true");
        let r = register(
            "R",
            0,
            vec![
                field("reserved0", 0, 4, "read-write"),
                spare,
                field("ODD", 8, 1, "readable"),
            ],
        );
        assert!(merge(&mut components, &config, component("C", vec![r])).unwrap());

        let r = components.get("C").unwrap().registers.get("R").unwrap();
        assert_eq!(r.fields.get("reserved0").unwrap().access, Access::Reserved);
        assert_eq!(r.fields.get("ODD").unwrap().access, Access::Reserved);
        let spare = r.fields.get("SPARE").unwrap();
        assert!(spare.reserved && spare.constant);
        assert_eq!(spare.access, Access::ReadWrite);
    }

    #[test]
    fn test_address_unit_bits_and_enums() {
        let mut components = Components::new();
        let config = MergeConfig::default();
        let mut mode = field("MODE", 0, 2, "read-write");
        mode.enums = vec![
            EnumDesc {
                name: text("FAST"),
                value: text("2"),
                ..Default::default()
            },
            EnumDesc {
                name: text("OFF"),
                value: text("0"),
                ..Default::default()
            },
        ];
        let mut c = component("C", vec![register("R", 0, vec![mode])]);
        c.address_unit_bits = text("32");
        assert!(merge(&mut components, &config, c).unwrap());

        let mut again = field("MODE", 0, 2, "read-write");
        again.enums = vec![EnumDesc {
            name: text("FAST"),
            value: text("3"),
            ..Default::default()
        }];
        let c = component("C", vec![register("R", 0, vec![again])]);
        assert!(merge(&mut components, &config, c).unwrap());

        let c = components.get("C").unwrap();
        assert_eq!(c.address_unit_bits, 8, "address unit bits apply per occurrence");
        let mode = c.registers.get("R").unwrap().fields.get("MODE").unwrap();
        let values: Vec<_> = mode.enums.iter().map(|e| (e.name.as_str(), e.value)).collect();
        assert_eq!(values, vec![("OFF", 0), ("FAST", 3)]);
    }

    #[test]
    fn test_missing_names() {
        let mut components = Components::new();
        let config = MergeConfig::default();
        assert!(!merge(&mut components, &config, ComponentDesc::default()).unwrap());
        assert!(components.is_empty());
    }
}
