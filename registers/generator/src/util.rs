// Licensed under the Apache-2.0 license

//! Utility functions for name conversion.
//!
//! This module turns names from the register description into identifiers
//! usable in generated C and assembly sources.

/// Replaces characters that are not allowed in C identifiers.
///
/// # Examples
/// ```
/// use registers_generator::util::escape;
/// assert_eq!(escape("rx-fifo.level"), "rx_fifo_level");
/// assert_eq!(escape("cfg@2/4"), "cfg_AT_2_DIV_4");
/// ```
pub fn escape(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            ' ' | '-' | '.' | ',' | ':' | '[' | ']' | '\u{2014}' => result.push('_'),
            '@' => result.push_str("_AT_"),
            '/' => result.push_str("_DIV_"),
            c => result.push(c),
        }
    }
    result
}

/// Escaped and upper-cased, for macro names.
pub fn upper_ident(name: &str) -> String {
    escape(name).to_ascii_uppercase()
}

/// Converts a name to CamelCase (PascalCase).
///
/// Handles various edge cases:
/// - Leading digits get underscore prefix
/// - Punctuation and whitespace start a new word
/// - C keywords get underscore suffix
///
/// # Examples
/// ```
/// use registers_generator::util::camel_case;
/// assert_eq!(camel_case("my_register"), "MyRegister");
/// assert_eq!(camel_case("i3c_ctrl"), "I3cCtrl");
/// ```
pub fn camel_case(name: &str) -> String {
    let mut result = String::new();
    if let Some(c) = name.chars().next() {
        if c.is_ascii_digit() {
            result.push('_');
        }
    }
    let mut upper_next = true;
    for c in escape(name).chars() {
        if c.is_ascii_punctuation() || c.is_ascii_whitespace() {
            upper_next = true;
        } else {
            result.push(if upper_next {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            });
            upper_next = false;
        }
    }
    String::from(tweak_keywords(&result))
}

/// Include guard and type prefix derived from an output file name.
///
/// # Examples
/// ```
/// use registers_generator::util::guard;
/// assert_eq!(guard("soc_uart.h"), "SOC_UART_H");
/// ```
pub fn guard(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '.' | '/' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

/// Appends underscore suffix to C keywords to avoid conflicts.
fn tweak_keywords(s: &str) -> &str {
    match s {
        "Auto" => "Auto_",
        "Break" => "Break_",
        "Case" => "Case_",
        "Char" => "Char_",
        "Const" => "Const_",
        "Continue" => "Continue_",
        "Default" => "Default_",
        "Do" => "Do_",
        "Double" => "Double_",
        "Else" => "Else_",
        "Enum" => "Enum_",
        "Extern" => "Extern_",
        "Float" => "Float_",
        "For" => "For_",
        "Goto" => "Goto_",
        "If" => "If_",
        "Int" => "Int_",
        "Long" => "Long_",
        "Register" => "Register_",
        "Return" => "Return_",
        "Short" => "Short_",
        "Signed" => "Signed_",
        "Sizeof" => "Sizeof_",
        "Static" => "Static_",
        "Struct" => "Struct_",
        "Switch" => "Switch_",
        "Typedef" => "Typedef_",
        "Union" => "Union_",
        "Unsigned" => "Unsigned_",
        "Void" => "Void_",
        "Volatile" => "Volatile_",
        "While" => "While_",
        s => s,
    }
}
