// Licensed under the Apache-2.0 license

//! The register model: components own registers, registers own fields and
//! fields own enumerations.
//!
//! Children are held in [`Container`]s keyed by name. Registers are ordered
//! by address, fields by their most significant bit and enumerations by
//! value. Components keep the order in which they were first seen.
//!
//! Components and registers can carry a type identifier. The first element
//! seen with a given identifier defines the type; later elements with the
//! same identifier are copies and resolve to the original's children.

use std::cmp::Ordering;

use crate::container::{insertion_order, Container};

/// Access policy of a field.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Access {
    ReadOnly,
    WriteOnly,
    #[default]
    ReadWrite,
    ReadWriteOnce,
    WriteOnce,
    Reserved,
}

impl Access {
    /// Map an IP-XACT access keyword. Anything unrecognized is reserved.
    pub fn from_ipxact(text: &str) -> Access {
        match text.trim() {
            "read-only" => Access::ReadOnly,
            "write-only" => Access::WriteOnly,
            "read-write" => Access::ReadWrite,
            "writeOnce" => Access::WriteOnce,
            "read-writeOnce" => Access::ReadWriteOnce,
            _ => Access::Reserved,
        }
    }
}

/// Type identifier shared by components or registers with the same layout.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TypeId {
    /// The identifier text.
    pub id: String,
    /// Name of the element that first declared `id`.
    pub original: String,
}

/// Elements that can share their children through a type identifier.
pub trait TypeIdentified {
    fn name(&self) -> &str;
    fn type_id_slot(&self) -> &Option<TypeId>;
    fn type_id_slot_mut(&mut self) -> &mut Option<TypeId>;

    fn set_type_id(&mut self, id: &str, original: &str) {
        *self.type_id_slot_mut() = Some(TypeId {
            id: id.to_string(),
            original: original.to_string(),
        });
    }

    fn type_id(&self) -> Option<&str> {
        self.type_id_slot().as_ref().map(|t| t.id.as_str())
    }

    /// Name of the original element when this one is a copy.
    fn type_id_copy(&self) -> Option<&str> {
        match self.type_id_slot() {
            Some(t) if t.original != self.name() => Some(t.original.as_str()),
            _ => None,
        }
    }

    fn is_type_id_copy(&self) -> bool {
        self.type_id_copy().is_some()
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Enumeration {
    pub name: String,
    pub description: String,
    pub value: u64,
}

impl Enumeration {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// A contiguous bit range `[stop, start]` of a register, inclusive.
#[derive(Clone, Debug)]
pub struct Field {
    pub name: String,
    pub description: String,
    /// Most significant bit.
    pub start: u32,
    /// Least significant bit.
    pub stop: u32,
    pub access: Access,
    pub reserved: bool,
    pub constant: bool,
    pub reset: Option<u64>,
    pub enums: Container<Enumeration>,
}

impl Field {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            start: 0,
            stop: 0,
            access: Access::default(),
            reserved: false,
            constant: false,
            reset: None,
            enums: Container::new(Field::enum_order),
        }
    }

    fn enum_order(a: &Enumeration, b: &Enumeration) -> Ordering {
        a.value.cmp(&b.value)
    }

    /// Number of bits covered by the field.
    pub fn width(&self) -> u32 {
        self.start.saturating_sub(self.stop) + 1
    }

    /// Bits of the register covered by this field. Bits past 63 are dropped.
    pub fn mask(&self) -> u64 {
        bit_mask(self.stop, self.start)
    }
}

/// Mask with bits `lsb..=msb` set, truncated to 64 bits.
pub fn bit_mask(lsb: u32, msb: u32) -> u64 {
    let width = msb.saturating_sub(lsb) + 1;
    let ones = if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    };
    ones.checked_shl(lsb).unwrap_or(0)
}

#[derive(Clone, Debug)]
pub struct Register {
    pub name: String,
    pub description: String,
    pub address: u64,
    /// Width in bits. Zero until a size has been merged.
    pub width: u32,
    pub dimensions: u32,
    pub type_id: Option<TypeId>,
    /// Own fields. Use [`Component::fields`] to follow a type copy.
    pub fields: Container<Field>,
}

impl Register {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            address: 0,
            width: 0,
            dimensions: 1,
            type_id: None,
            fields: Container::new(Register::field_order),
        }
    }

    fn field_order(a: &Field, b: &Field) -> Ordering {
        a.start.cmp(&b.start)
    }

    fn defined_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.reserved)
    }

    /// Bits covered by any field not flagged reserved.
    pub fn mask(&self) -> u64 {
        self.defined_fields().fold(0, |mask, f| mask | f.mask())
    }

    /// Bits covered by fields that are neither read-only nor reserved.
    pub fn write_mask(&self) -> u64 {
        self.defined_fields()
            .filter(|f| f.access != Access::ReadOnly)
            .fold(0, |mask, f| mask | f.mask())
    }

    /// Reset value assembled from the fields that declare one.
    pub fn reset_value(&self) -> u64 {
        self.fields.iter().fold(0, |value, f| match f.reset {
            Some(reset) => {
                let mask = f.mask();
                (value & !mask) | (reset.checked_shl(f.stop).unwrap_or(0) & mask)
            }
            None => value,
        })
    }

    pub fn has_reset(&self) -> bool {
        self.fields.iter().any(|f| f.reset.is_some())
    }

    pub fn has_read_only(&self) -> bool {
        self.defined_fields().any(|f| f.access == Access::ReadOnly)
    }

    pub fn has_write_only(&self) -> bool {
        self.defined_fields().any(|f| f.access == Access::WriteOnly)
    }

    pub fn has_write(&self) -> bool {
        self.defined_fields().any(|f| f.access != Access::ReadOnly)
    }

    /// Addressable units occupied by one element of this register.
    pub fn units(&self, address_unit_bits: u32) -> u64 {
        let unit = u64::from(address_unit_bits.max(1));
        u64::from(self.width).div_ceil(unit)
    }
}

impl TypeIdentified for Register {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_id_slot(&self) -> &Option<TypeId> {
        &self.type_id
    }

    fn type_id_slot_mut(&mut self) -> &mut Option<TypeId> {
        &mut self.type_id
    }
}

pub const DEFAULT_ADDRESS_UNIT_BITS: u32 = 8;

#[derive(Clone, Debug)]
pub struct Component {
    pub name: String,
    pub description: String,
    pub base_address: u64,
    /// Size of the address block in address units. Zero when not declared.
    pub range: u64,
    pub address_unit_bits: u32,
    pub module_name: String,
    pub type_id: Option<TypeId>,
    /// Own registers. Use [`Components::registers`] to follow a type copy.
    pub registers: Container<Register>,
}

impl Component {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            base_address: 0,
            range: 0,
            address_unit_bits: DEFAULT_ADDRESS_UNIT_BITS,
            module_name: String::new(),
            type_id: None,
            registers: Container::new(Component::register_order),
        }
    }

    fn register_order(a: &Register, b: &Register) -> Ordering {
        a.address.cmp(&b.address)
    }

    /// First register located at `address`.
    pub fn register_at(&self, address: u64) -> Option<&Register> {
        self.registers.iter().find(|r| r.address == address)
    }

    /// Original register declaring type identifier `id`, other than `exclude`.
    pub fn register_with_type_id(&self, id: &str, exclude: &str) -> Option<&Register> {
        self.registers.iter().find(|r| {
            r.name != exclude && r.type_id() == Some(id) && !r.is_type_id_copy()
        })
    }

    /// Follow a register's type copy to the register that owns the fields.
    pub fn resolve_register<'a>(&'a self, register: &'a Register) -> &'a Register {
        register
            .type_id_copy()
            .and_then(|original| self.registers.get(original))
            .unwrap_or(register)
    }

    /// Fields of `register`, following a type copy.
    pub fn fields<'a>(&'a self, register: &'a Register) -> &'a Container<Field> {
        &self.resolve_register(register).fields
    }

    /// Size of the component in address units: the declared range, or the
    /// end of the last register.
    pub fn size(&self, registers: &Container<Register>) -> u64 {
        if self.range != 0 {
            return self.range;
        }
        registers
            .last()
            .map(|r| r.address + r.units(self.address_unit_bits) * u64::from(r.dimensions))
            .unwrap_or(0)
    }
}

impl TypeIdentified for Component {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_id_slot(&self) -> &Option<TypeId> {
        &self.type_id
    }

    fn type_id_slot_mut(&mut self) -> &mut Option<TypeId> {
        &mut self.type_id
    }
}

/// Root of the register model.
#[derive(Clone, Debug)]
pub struct Components {
    components: Container<Component>,
}

impl Default for Components {
    fn default() -> Self {
        Self::new()
    }
}

impl Components {
    pub fn new() -> Self {
        Self {
            components: Container::new(insertion_order),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Component> {
        self.components.get_mut(name)
    }

    pub fn set(&mut self, component: Component) {
        let name = component.name.clone();
        self.components.set(&name, component);
    }

    pub fn get_or_create(&mut self, name: &str) -> (&mut Component, bool) {
        self.components
            .get_or_insert_with(name, || Component::new(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Original component declaring type identifier `id`, other than `exclude`.
    pub fn component_with_type_id(&self, id: &str, exclude: &str) -> Option<&Component> {
        self.components.iter().find(|c| {
            c.name != exclude && c.type_id() == Some(id) && !c.is_type_id_copy()
        })
    }

    /// Follow a component's type copy to the component that owns the registers.
    pub fn resolve<'a>(&'a self, component: &'a Component) -> &'a Component {
        component
            .type_id_copy()
            .and_then(|original| self.components.get(original))
            .unwrap_or(component)
    }

    /// Registers of `component`, following a type copy.
    pub fn registers<'a>(&'a self, component: &'a Component) -> &'a Container<Register> {
        &self.resolve(component).registers
    }
}
