// Licensed under the Apache-2.0 license

//! Reader-neutral description of one input document.
//!
//! Readers translate their input format into these types. Every attribute
//! is the raw text found in the input, `None` when the element was absent.
//! Interpretation (numbers, access keywords, identity) is left to the
//! merge step.

#[derive(Clone, Debug, Default)]
pub struct Document {
    pub components: Vec<ComponentDesc>,
}

#[derive(Clone, Debug, Default)]
pub struct ComponentDesc {
    pub name: Option<String>,
    pub description: Option<String>,
    pub base_address: Option<String>,
    pub range: Option<String>,
    pub address_unit_bits: Option<String>,
    pub module_name: Option<String>,
    pub type_id: Option<String>,
    pub registers: Vec<RegisterDesc>,
}

#[derive(Clone, Debug, Default)]
pub struct RegisterDesc {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address_offset: Option<String>,
    pub size: Option<String>,
    pub dim: Option<String>,
    pub type_id: Option<String>,
    pub fields: Vec<FieldDesc>,
}

#[derive(Clone, Debug, Default)]
pub struct FieldDesc {
    pub name: Option<String>,
    pub description: Option<String>,
    pub bit_offset: Option<String>,
    pub bit_width: Option<String>,
    pub access: Option<String>,
    pub reset_value: Option<String>,
    pub reserved: Option<String>,
    pub constant_value: Option<String>,
    pub enums: Vec<EnumDesc>,
}

#[derive(Clone, Debug, Default)]
pub struct EnumDesc {
    pub name: Option<String>,
    pub description: Option<String>,
    pub value: Option<String>,
}
