// Licensed under the Apache-2.0 license

//! Numeric literal parsing.
//!
//! Two grammars are accepted, tried in order, each of which must match the
//! whole input:
//!
//! ```text
//! sized:  ws* <width> ' <base> [0-9A-Fa-f_]+ ws*     8'hFF  4'b1010  32'd1_000
//! plain:  ws* <prefix>? [0-9A-Fa-f]+ ws*             0x1F   017      42
//! ```
//!
//! Sized bases are `h` (hex), `o` (octal), `d` (decimal) and `b` (binary).
//! Plain prefixes are `0x`/`0X` (hex), a bare `0` (octal) or nothing (decimal).
//!
//! Parsing never returns an error: literals that match neither grammar, or
//! whose digits are not valid in the selected base, produce a [`Number`] whose
//! [`Number::is_valid`] is false. The declared width of a sized literal is
//! recorded but never used to bound the value.

use log::warn;
use winnow::ascii::{digit1, multispace0};
use winnow::combinator::{alt, delimited};
use winnow::token::{one_of, take_while};
use winnow::{ModalResult, Parser};

/// A parsed numeric literal.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Number {
    valid: bool,
    width: u32,
    value: u64,
}

impl Number {
    /// Parse `text` as a sized or plain literal.
    ///
    /// # Examples
    /// ```
    /// use registers_ipxact::Number;
    ///
    /// let n = Number::parse("8'hFF");
    /// assert!(n.is_valid());
    /// assert_eq!((n.width(), n.value()), (8, 255));
    /// assert!(!Number::parse("abc").is_valid());
    /// ```
    pub fn parse(text: &str) -> Number {
        if let Ok((width, base, digits)) = sized_literal.parse(text) {
            return Number::from_sized(width, base, digits);
        }
        if let Ok((prefix, digits)) = plain_literal.parse(text) {
            return Number::from_plain(prefix, digits);
        }
        Number::default()
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Declared width of a sized literal, zero for plain literals.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The parsed magnitude. Zero when the literal did not match either grammar.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// The magnitude, if the literal was valid.
    pub fn get(&self) -> Option<u64> {
        self.valid.then_some(self.value)
    }

    fn from_sized(width: &str, base: char, digits: &str) -> Number {
        let mut number = Number {
            valid: true,
            width: width.parse().unwrap_or(0),
            value: 0,
        };
        let digits: String = digits.chars().filter(|c| *c != '_').collect();
        if digits.is_empty() {
            warn!("Numeric literal has no digits after removing '_'");
            number.valid = false;
            return number;
        }

        match base {
            'h' => number.set_radix(&digits, 16),
            'o' => number.set_radix(&digits, 8),
            'd' => number.set_radix(&digits, 10),
            'b' => number.scan_binary(&digits),
            other => {
                warn!("Unable to handle base format of '{other}'");
                number.valid = false;
            }
        }
        number
    }

    fn from_plain(prefix: &str, digits: &str) -> Number {
        let mut number = Number {
            valid: true,
            width: 0,
            value: 0,
        };
        match prefix {
            "" => number.set_radix(digits, 10),
            "0x" | "0X" => number.set_radix(digits, 16),
            "0" => number.set_radix(digits, 8),
            other => {
                warn!("Unable to handle base format of '{other}'");
                number.valid = false;
            }
        }
        number
    }

    fn set_radix(&mut self, digits: &str, radix: u32) {
        match u64::from_str_radix(digits, radix) {
            Ok(value) => self.value = value,
            Err(err) => {
                warn!("Unable to parse '{digits}' as a base {radix} number: {err}");
                self.valid = false;
            }
        }
    }

    /// Binary digits are scanned from the least significant end. A bad digit
    /// invalidates the number but the scan carries on.
    fn scan_binary(&mut self, digits: &str) {
        for (bit, c) in digits.chars().rev().enumerate() {
            match c {
                '1' => match u32::try_from(bit).ok().and_then(|b| 1u64.checked_shl(b)) {
                    Some(mask) => self.value |= mask,
                    None => {
                        warn!("Binary literal '{digits}' does not fit in 64 bits");
                        self.valid = false;
                    }
                },
                '0' => {}
                other => {
                    warn!("Invalid binary character '{other}'");
                    self.valid = false;
                }
            }
        }
    }
}

fn sized_literal<'s>(input: &mut &'s str) -> ModalResult<(&'s str, char, &'s str)> {
    delimited(
        multispace0,
        (
            digit1,
            '\'',
            one_of(|c: char| c.is_ascii_alphabetic()),
            take_while(1.., |c: char| c.is_ascii_hexdigit() || c == '_'),
        ),
        multispace0,
    )
    .map(|(width, _, base, digits)| (width, base, digits))
    .parse_next(input)
}

fn hex_digits<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    take_while(1.., |c: char| c.is_ascii_hexdigit()).parse_next(input)
}

fn plain_literal<'s>(input: &mut &'s str) -> ModalResult<(&'s str, &'s str)> {
    delimited(
        multispace0,
        alt((
            (alt(("0x", "0X")), hex_digits),
            ("0", hex_digits),
            (alt(("x", "X")), hex_digits),
            hex_digits.map(|digits| ("", digits)),
        )),
        multispace0,
    )
    .parse_next(input)
}
