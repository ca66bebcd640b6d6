// Licensed under the Apache-2.0 license

//! Concrete storage layout of registers and components.
//!
//! A register layout is a gap-free list of chunks covering bits `0..width`.
//! Every chunk is a field, a slice of a field that does not fit its storage
//! unit, or reserved padding. Each chunk is assigned an 8, 16 or 32-bit
//! storage unit. Chunks never cross the boundary of the unit they are
//! assigned to.
//!
//! ```text
//!  bit  0        8       16               32
//!       | EN |r| MODE |r | reserved_15_8 | STATUS | reserved_31_24 |
//!       '---- u8 -----'  '----- u8 -----' '- u8 -' '---- u8 ------'
//! ```
//!
//! The unit of a new storage container is chosen from the run of contiguous
//! fields starting there, extended until it ends on a byte boundary:
//!
//! - a run of 8 bits or less uses 8 bits, 16 or less uses 16, anything
//!   longer uses 32;
//! - 24 bits has no storage type and is promoted to 32;
//! - a unit that would not be naturally aligned is promoted to 32.
//!
//! A field that starts inside an open container but runs past its end
//! widens that container (and the chunks already in it) to 16 bits, or to
//! 32 bits with a [`LayoutWarning::Misaligned`]. Only fields that cannot
//! fit a 32-bit word are split.
//!
//! Padding between fields that starts a new container takes the largest
//! unit that is aligned at its position and fits before the next field.
//! Padding after the last field is a single chunk, widening the open
//! container when it starts inside it.
//!
//! The big-endian order is the little-endian order reversed.
//!
//! At the component level, [`compile_component`] interleaves reserved arrays
//! between registers so that every register sits at its declared address.

use log::{info, warn};
use registers_ipxact::{Component, Container, Field, Register};
use thiserror::Error;

use crate::error::LayoutError;

/// Storage units in order of preference for padding.
const UNITS: [u32; 3] = [32, 16, 8];

/// Width assumed for a register that declares none.
const DEFAULT_WIDTH: u32 = 32;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChunkKind {
    Field,
    /// Part of `field` that was split at a storage unit boundary.
    Slice { field: String },
    Reserved,
}

/// A bit range `[lsb, msb]` of a register assigned to one storage unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub name: String,
    pub description: String,
    pub lsb: u32,
    pub msb: u32,
    /// Storage unit width in bits: 8, 16 or 32.
    pub unit: u32,
    pub kind: ChunkKind,
}

impl Chunk {
    pub fn width(&self) -> u32 {
        self.msb - self.lsb + 1
    }

    pub fn is_reserved(&self) -> bool {
        self.kind == ChunkKind::Reserved
    }
}

/// Non-fatal findings of the layout heuristics.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LayoutWarning {
    #[error("register '{register}' has no width, assuming {DEFAULT_WIDTH} bits")]
    ZeroWidth { register: String },
    #[error("register '{register}' width of {width} bits is not a whole number of bytes")]
    UnalignedWidth { register: String, width: u32 },
    #[error("'{name}' at bit {lsb} needs 24 bits of storage, promoted to 32")]
    Promoted24 { name: String, lsb: u32 },
    #[error("'{name}' at bit {lsb} is not aligned to a {unit}-bit unit, promoted to 32")]
    Misaligned { name: String, lsb: u32, unit: u32 },
    #[error("field '{field}' bits {lsb}..={msb} overlap a previous field or run past the register")]
    Overlap { field: String, lsb: u32, msb: u32 },
    #[error("padding bits {lsb}..={msb} span more than one 32-bit word, split at word boundaries")]
    WidePadding { lsb: u32, msb: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterLayout {
    /// Register width in bits covered by the chunks.
    pub width: u32,
    /// Chunks from bit 0 upwards.
    pub little_endian: Vec<Chunk>,
    pub diagnostics: Vec<LayoutWarning>,
}

impl RegisterLayout {
    /// Chunks from the most significant bit downwards.
    pub fn big_endian(&self) -> impl Iterator<Item = &Chunk> {
        self.little_endian.iter().rev()
    }
}

/// A field clipped to the bits it really owns. `end` is exclusive.
#[derive(Debug)]
struct Span<'a> {
    name: &'a str,
    description: &'a str,
    lsb: u32,
    end: u32,
}

struct Sweep<'a> {
    chunks: Vec<Chunk>,
    diagnostics: Vec<LayoutWarning>,
    unit: u32,
    unit_end: u32,
    spans: &'a [Span<'a>],
}

impl Sweep<'_> {
    /// Storage unit for a container opened at `pos` by an element ending at
    /// `end`, followed by `spans[next..]`.
    fn choose_unit(&mut self, name: &str, pos: u32, end: u32, next: usize) -> u32 {
        let mut run_end = end;
        for span in &self.spans[next..] {
            if run_end % 8 == 0 || span.lsb != run_end {
                break;
            }
            run_end = span.end;
        }
        let run = run_end.next_multiple_of(8) - pos;

        let unit = match run {
            24 => {
                self.warn(LayoutWarning::Promoted24 {
                    name: name.to_string(),
                    lsb: pos,
                });
                32
            }
            0..=8 => 8,
            9..=16 => 16,
            _ => 32,
        };
        if unit != 32 && pos % unit != 0 {
            self.warn(LayoutWarning::Misaligned {
                name: name.to_string(),
                lsb: pos,
                unit,
            });
            return 32;
        }
        unit
    }

    fn open(&mut self, pos: u32, unit: u32) {
        self.unit = unit;
        self.unit_end = pos - pos % unit + unit;
    }

    /// Smallest unit larger than the open one whose aligned container also
    /// holds bits up to `end`.
    fn fitting_unit(&self, end: u32) -> Option<u32> {
        let base = self.unit_end - self.unit;
        UNITS
            .into_iter()
            .rev()
            .find(|&u| u > self.unit && base - base % u + u >= end)
    }

    /// Re-open the current container as `unit` bits, moving the chunks
    /// already inside it along.
    fn widen(&mut self, unit: u32) {
        let base = self.unit_end - self.unit;
        let base = base - base % unit;
        for chunk in self.chunks.iter_mut().rev().take_while(|c| c.lsb >= base) {
            chunk.unit = chunk.unit.max(unit);
        }
        self.open(base, unit);
    }

    /// Reserved chunks covering `[from, to)`, followed by `spans[next..]`.
    fn pad(&mut self, from: u32, to: u32, next: usize) {
        let mut pos = from;
        while pos < to {
            if pos >= self.unit_end {
                match UNITS.into_iter().find(|u| pos % u == 0 && pos + u <= to) {
                    Some(unit) => self.open(pos, unit),
                    None => {
                        let unit = self.choose_unit("reserved", pos, to, next);
                        self.open(pos, unit);
                    }
                }
            }
            let end = to.min(self.unit_end);
            self.chunks.push(Chunk {
                name: format!("reserved_{}_{}", end - 1, pos),
                description: "Padding".to_string(),
                lsb: pos,
                msb: end - 1,
                unit: self.unit,
                kind: ChunkKind::Reserved,
            });
            pos = end;
        }
    }

    /// Chunks for `spans[index]`, split at storage unit boundaries.
    fn field(&mut self, index: usize) {
        let spans = self.spans;
        let span = &spans[index];
        if span.lsb < self.unit_end && span.end > self.unit_end && self.unit < 32 {
            let unit = self.fitting_unit(span.end).unwrap_or(32);
            if unit == 32 {
                self.warn(LayoutWarning::Misaligned {
                    name: span.name.to_string(),
                    lsb: span.lsb,
                    unit: self.unit,
                });
            } else {
                info!("Widening storage of {} to {unit} bits", span.name);
            }
            self.widen(unit);
        }

        let mut pieces = Vec::new();
        let mut pos = span.lsb;
        while pos < span.end {
            if pos >= self.unit_end {
                let unit = self.choose_unit(span.name, pos, span.end, index + 1);
                self.open(pos, unit);
            }
            let end = span.end.min(self.unit_end);
            pieces.push((pos, end - 1, self.unit));
            pos = end;
        }

        if let [(lsb, msb, unit)] = pieces[..] {
            self.chunks.push(Chunk {
                name: span.name.to_string(),
                description: span.description.to_string(),
                lsb,
                msb,
                unit,
                kind: ChunkKind::Field,
            });
            return;
        }
        info!(
            "Splitting field {} into {} storage units",
            span.name,
            pieces.len()
        );
        for (lsb, msb, unit) in pieces {
            self.chunks.push(Chunk {
                name: format!("{}_{msb}_{lsb}", span.name),
                description: span.description.to_string(),
                lsb,
                msb,
                unit,
                kind: ChunkKind::Slice {
                    field: span.name.to_string(),
                },
            });
        }
    }

    /// The final reserved chunk covering `[from, to)`.
    fn tail(&mut self, from: u32, to: u32) {
        if from / 32 != (to - 1) / 32 {
            self.warn(LayoutWarning::WidePadding {
                lsb: from,
                msb: to - 1,
            });
        }
        let mut pos = from;
        while pos < to {
            let end = to.min(pos - pos % 32 + 32);
            if pos < self.unit_end {
                if end > self.unit_end {
                    let unit = self.fitting_unit(end).unwrap_or(32);
                    self.widen(unit);
                }
            } else {
                let unit = UNITS
                    .into_iter()
                    .rev()
                    .find(|&u| pos - pos % u + u >= end)
                    .unwrap_or(32);
                self.open(pos, unit);
            }
            self.chunks.push(Chunk {
                name: format!("reserved_{}_{}", end - 1, pos),
                description: "Padding".to_string(),
                lsb: pos,
                msb: end - 1,
                unit: self.unit,
                kind: ChunkKind::Reserved,
            });
            pos = end;
        }
    }

    fn warn(&mut self, warning: LayoutWarning) {
        warn!("{warning}");
        self.diagnostics.push(warning);
    }
}

/// Lay out `register` using `fields`, which are the register's own fields
/// or, for a type copy, the fields of the original.
pub fn compile_register(register: &Register, fields: &Container<Field>) -> RegisterLayout {
    let mut diagnostics = Vec::new();
    let mut width = register.width;
    if width == 0 {
        let warning = LayoutWarning::ZeroWidth {
            register: register.name.clone(),
        };
        warn!("{warning}");
        diagnostics.push(warning);
        width = DEFAULT_WIDTH;
    } else if width % 8 != 0 {
        let warning = LayoutWarning::UnalignedWidth {
            register: register.name.clone(),
            width,
        };
        warn!("{warning}");
        diagnostics.push(warning);
    }

    let mut spans = Vec::new();
    let mut pos = 0;
    for field in fields.iter() {
        let lsb = field.stop.max(pos);
        let end = field.start.saturating_add(1).min(width);
        if field.stop < pos || field.start >= width {
            let warning = LayoutWarning::Overlap {
                field: field.name.clone(),
                lsb: field.stop,
                msb: field.start,
            };
            warn!("{warning}");
            diagnostics.push(warning);
        }
        if lsb >= end {
            continue;
        }
        spans.push(Span {
            name: &field.name,
            description: &field.description,
            lsb,
            end,
        });
        pos = end;
    }

    let mut sweep = Sweep {
        chunks: Vec::new(),
        diagnostics,
        unit: 0,
        unit_end: 0,
        spans: &spans,
    };
    let mut pos = 0;
    for (index, span) in spans.iter().enumerate() {
        if span.lsb > pos {
            sweep.pad(pos, span.lsb, index);
        }
        sweep.field(index);
        pos = span.end;
    }
    if pos < width {
        sweep.tail(pos, width);
    }

    RegisterLayout {
        width,
        little_endian: sweep.chunks,
        diagnostics: sweep.diagnostics,
    }
}

/// One entry of a component's storage layout.
#[derive(Clone, Debug)]
pub enum Slot<'a> {
    Register(&'a Register),
    /// `count` units of `unit` bits starting at address `offset`.
    Reserved { offset: u64, unit: u32, count: u64 },
}

impl Slot<'_> {
    /// Name of a reserved array, derived from its address.
    pub fn reserved_name(offset: u64) -> String {
        format!("reserved_{offset}")
    }
}

/// Lay out `registers` of `component` in address order with reserved arrays
/// filling the gaps.
///
/// Fails when a register's footprint runs past the address of the next one.
pub fn compile_component<'a>(
    component: &Component,
    registers: &'a Container<Register>,
) -> Result<Vec<Slot<'a>>, LayoutError> {
    let address_unit_bits = component.address_unit_bits.max(1);
    let mut slots = Vec::new();
    let mut previous: Option<&Register> = None;

    for register in registers.iter() {
        let end = previous
            .map(|p| p.address + p.units(address_unit_bits) * u64::from(p.dimensions))
            .unwrap_or(0);
        if register.address < end {
            return Err(LayoutError::Overlap {
                component: component.name.clone(),
                previous: previous.map(|p| p.name.clone()).unwrap_or_default(),
                next: register.name.clone(),
                end,
                address: register.address,
            });
        }

        let gap = register.address - end;
        if gap > 0 {
            match previous {
                Some(p) => info!(
                    "Adding {gap} units of padding between {} and {}",
                    p.name, register.name
                ),
                None => info!(
                    "Adding {gap} units of padding before first register {}",
                    register.name
                ),
            }
            slots.push(reserved_array(end, gap, address_unit_bits));
        }

        slots.push(Slot::Register(register));
        previous = Some(register);
    }
    Ok(slots)
}

fn reserved_array<'a>(offset: u64, gap: u64, address_unit_bits: u32) -> Slot<'a> {
    let bits = gap * u64::from(address_unit_bits);
    match UNITS.into_iter().find(|&u| bits % u64::from(u) == 0) {
        Some(unit) => Slot::Reserved {
            offset,
            unit,
            count: bits / u64::from(unit),
        },
        None => {
            warn!("Padding of {bits} bits at {offset:#x} is not a whole number of bytes, rounding up");
            Slot::Reserved {
                offset,
                unit: 8,
                count: bits.div_ceil(8),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registers_ipxact::Access;

    fn register(width: u32, fields: &[(&str, u32, u32)]) -> Register {
        let mut r = Register::new("R");
        r.width = width;
        for &(name, stop, start) in fields {
            let mut f = Field::new(name);
            f.stop = stop;
            f.start = start;
            f.access = Access::ReadWrite;
            r.fields.set(name, f);
        }
        r
    }

    fn layout(width: u32, fields: &[(&str, u32, u32)]) -> RegisterLayout {
        let r = register(width, fields);
        compile_register(&r, &r.fields)
    }

    fn summary(layout: &RegisterLayout) -> Vec<(String, u32, u32, u32)> {
        layout
            .little_endian
            .iter()
            .map(|c| (c.name.clone(), c.lsb, c.msb, c.unit))
            .collect()
    }

    fn entry(name: &str, lsb: u32, msb: u32, unit: u32) -> (String, u32, u32, u32) {
        (name.to_string(), lsb, msb, unit)
    }

    fn assert_partition(layout: &RegisterLayout) {
        let mut next = 0;
        for chunk in &layout.little_endian {
            assert_eq!(chunk.lsb, next, "gap or overlap before {}", chunk.name);
            assert!(chunk.msb >= chunk.lsb);
            assert!(matches!(chunk.unit, 8 | 16 | 32), "bad unit for {}", chunk.name);
            let base = chunk.lsb - chunk.lsb % chunk.unit;
            assert!(
                chunk.msb < base + chunk.unit,
                "{} crosses its {}-bit unit",
                chunk.name,
                chunk.unit
            );
            next = chunk.msb + 1;
        }
        assert_eq!(next, layout.width, "chunks must cover the whole register");
    }

    #[test]
    fn test_byte_fields_with_gaps() {
        let l = layout(32, &[("EN", 0, 0), ("MODE", 4, 5), ("STATUS", 16, 23)]);
        assert_partition(&l);
        assert_eq!(
            summary(&l),
            vec![
                entry("EN", 0, 0, 8),
                entry("reserved_3_1", 1, 3, 8),
                entry("MODE", 4, 5, 8),
                entry("reserved_7_6", 6, 7, 8),
                entry("reserved_15_8", 8, 15, 8),
                entry("STATUS", 16, 23, 8),
                entry("reserved_31_24", 24, 31, 8),
            ]
        );
        assert!(l.diagnostics.is_empty());
    }

    #[test]
    fn test_full_width_field() {
        let l = layout(32, &[("DATA", 0, 31)]);
        assert_eq!(summary(&l), vec![entry("DATA", 0, 31, 32)]);
        assert_eq!(l.little_endian[0].kind, ChunkKind::Field);
    }

    #[test]
    fn test_contiguous_run_shares_unit() {
        let l = layout(16, &[("A", 0, 3), ("B", 4, 11), ("C", 12, 15)]);
        assert_partition(&l);
        assert!(l.little_endian.iter().all(|c| c.unit == 16));
    }

    #[test]
    fn test_24_bit_run_is_promoted() {
        let l = layout(32, &[("ADDR", 0, 23)]);
        assert_partition(&l);
        assert_eq!(
            summary(&l),
            vec![entry("ADDR", 0, 23, 32), entry("reserved_31_24", 24, 31, 32)]
        );
        assert_eq!(
            l.diagnostics,
            vec![LayoutWarning::Promoted24 {
                name: "ADDR".to_string(),
                lsb: 0
            }]
        );
    }

    #[test]
    fn test_misaligned_unit_is_promoted() {
        let l = layout(32, &[("LO", 0, 7), ("MID", 8, 23)]);
        assert_partition(&l);
        assert_eq!(l.little_endian[0].unit, 8);
        assert_eq!(l.little_endian[1].unit, 32);
        assert!(matches!(
            l.diagnostics[..],
            [LayoutWarning::Misaligned { lsb: 8, unit: 16, .. }]
        ));
    }

    #[test]
    fn test_wide_field_is_split() {
        let l = layout(64, &[("COUNT", 0, 39)]);
        assert_partition(&l);
        assert_eq!(
            summary(&l),
            vec![
                entry("COUNT_31_0", 0, 31, 32),
                entry("COUNT_39_32", 32, 39, 8),
                entry("reserved_63_40", 40, 63, 32),
            ]
        );
        assert_eq!(
            l.little_endian[1].kind,
            ChunkKind::Slice {
                field: "COUNT".to_string()
            }
        );
    }

    #[test]
    fn test_narrow_field_past_open_unit_stays_whole() {
        let l = layout(32, &[("EN", 0, 0), ("CNT", 4, 11)]);
        assert_partition(&l);
        assert_eq!(
            summary(&l),
            vec![
                entry("EN", 0, 0, 32),
                entry("reserved_3_1", 1, 3, 32),
                entry("CNT", 4, 11, 32),
                entry("reserved_31_12", 12, 31, 32),
            ]
        );
        assert!(l.little_endian.iter().all(|c| !matches!(c.kind, ChunkKind::Slice { .. })));
        assert!(l.diagnostics.is_empty());

        let l = layout(16, &[("EN", 0, 0), ("CNT", 4, 11), ("TOP", 12, 15)]);
        assert_eq!(
            summary(&l),
            vec![
                entry("EN", 0, 0, 16),
                entry("reserved_3_1", 1, 3, 16),
                entry("CNT", 4, 11, 16),
                entry("TOP", 12, 15, 16),
            ]
        );
    }

    #[test]
    fn test_field_past_open_unit_is_promoted() {
        let l = layout(32, &[("A", 0, 4), ("B", 6, 17)]);
        assert_partition(&l);
        assert_eq!(
            summary(&l),
            vec![
                entry("A", 0, 4, 32),
                entry("reserved_5_5", 5, 5, 32),
                entry("B", 6, 17, 32),
                entry("reserved_31_18", 18, 31, 32),
            ]
        );
        assert_eq!(
            l.diagnostics,
            vec![LayoutWarning::Misaligned {
                name: "B".to_string(),
                lsb: 6,
                unit: 8
            }]
        );
    }

    #[test]
    fn test_field_across_word_boundary_is_split() {
        let l = layout(64, &[("A", 0, 27), ("B", 28, 35)]);
        assert_partition(&l);
        assert_eq!(
            summary(&l),
            vec![
                entry("A", 0, 27, 32),
                entry("B_31_28", 28, 31, 32),
                entry("B_35_32", 32, 35, 32),
                entry("reserved_63_36", 36, 63, 32),
            ]
        );
    }

    #[test]
    fn test_trailing_padding_is_one_chunk() {
        let l = layout(32, &[("EN", 0, 3)]);
        assert_partition(&l);
        assert_eq!(
            summary(&l),
            vec![entry("EN", 0, 3, 32), entry("reserved_31_4", 4, 31, 32)]
        );

        let l = layout(32, &[("LO", 0, 15)]);
        assert_eq!(
            summary(&l),
            vec![entry("LO", 0, 15, 16), entry("reserved_31_16", 16, 31, 16)]
        );

        let l = layout(64, &[("LO", 0, 11)]);
        assert_partition(&l);
        assert_eq!(
            summary(&l),
            vec![
                entry("LO", 0, 11, 32),
                entry("reserved_31_12", 12, 31, 32),
                entry("reserved_63_32", 32, 63, 32),
            ]
        );
        assert_eq!(
            l.diagnostics,
            vec![LayoutWarning::WidePadding { lsb: 12, msb: 63 }]
        );
    }

    #[test]
    fn test_big_endian_is_reversed() {
        let l = layout(32, &[("EN", 0, 0), ("MODE", 4, 5), ("STATUS", 16, 23)]);
        let be: Vec<_> = l.big_endian().cloned().collect();
        let mut le = l.little_endian.clone();
        le.reverse();
        assert_eq!(be, le);
    }

    #[test]
    fn test_idempotent() {
        let r = register(32, &[("A", 2, 5), ("B", 9, 9), ("C", 20, 30)]);
        let first = compile_register(&r, &r.fields);
        let second = compile_register(&r, &r.fields);
        assert_eq!(first, second);
        assert_partition(&first);
    }

    #[test]
    fn test_partition_holds_for_odd_layouts() {
        let cases: &[(u32, &[(&str, u32, u32)])] = &[
            (8, &[]),
            (16, &[("X", 3, 3)]),
            (32, &[("A", 1, 2), ("B", 3, 9), ("C", 10, 10), ("D", 30, 31)]),
            (32, &[("A", 0, 4), ("B", 6, 17)]),
            (64, &[("LO", 4, 12), ("HI", 33, 62)]),
            (16, &[("A", 0, 7), ("B", 4, 11)]),
            (16, &[("A", 0, 7), ("B", 12, 20)]),
        ];
        for (width, fields) in cases {
            let l = layout(*width, fields);
            assert_partition(&l);
            for (name, lsb, msb) in fields.iter() {
                if msb - lsb < 32 && lsb / 32 == msb / 32 && *msb < *width {
                    assert!(
                        l.little_endian.iter().any(|c| c.name == *name),
                        "{name} was split"
                    );
                }
            }
        }
    }

    #[test]
    fn test_overlap_and_zero_width_are_reported() {
        let l = layout(16, &[("A", 0, 7), ("B", 4, 11)]);
        assert!(l
            .diagnostics
            .iter()
            .any(|d| matches!(d, LayoutWarning::Overlap { field, .. } if field == "B")));
        assert!(l.little_endian.iter().any(|c| c.name == "B" && c.lsb == 8));

        let l = layout(0, &[("A", 0, 7)]);
        assert_eq!(l.width, 32);
        assert!(matches!(l.diagnostics[0], LayoutWarning::ZeroWidth { .. }));
        assert_partition(&l);
    }

    fn component(registers: &[(&str, u64, u32, u32)]) -> Component {
        let mut c = Component::new("C");
        for &(name, address, width, dimensions) in registers {
            let mut r = Register::new(name);
            r.address = address;
            r.width = width;
            r.dimensions = dimensions;
            c.registers.set(name, r);
        }
        c
    }

    #[test]
    fn test_component_padding() {
        let c = component(&[("R0", 0, 32, 1), ("R1", 8, 32, 1)]);
        let slots = compile_component(&c, &c.registers).unwrap();
        assert_eq!(slots.len(), 3);
        assert!(matches!(slots[0], Slot::Register(r) if r.name == "R0"));
        assert!(matches!(
            slots[1],
            Slot::Reserved {
                offset: 4,
                unit: 32,
                count: 1
            }
        ));
        assert!(matches!(slots[2], Slot::Register(r) if r.name == "R1"));
    }

    #[test]
    fn test_component_padding_granularity() {
        let c = component(&[("R0", 2, 8, 1), ("R1", 3, 8, 4), ("R2", 0x10, 16, 1)]);
        let slots = compile_component(&c, &c.registers).unwrap();
        assert!(matches!(
            slots[0],
            Slot::Reserved {
                offset: 0,
                unit: 16,
                count: 1
            }
        ));
        assert!(matches!(slots[3], Slot::Reserved { offset: 7, unit: 8, count: 9 }));
        assert_eq!(Slot::reserved_name(7), "reserved_7");
    }

    #[test]
    fn test_component_padding_in_wide_units() {
        let mut c = component(&[("R0", 0, 32, 1), ("R1", 3, 32, 1)]);
        c.address_unit_bits = 32;
        let slots = compile_component(&c, &c.registers).unwrap();
        assert!(matches!(
            slots[1],
            Slot::Reserved {
                offset: 1,
                unit: 32,
                count: 2
            }
        ));
    }

    #[test]
    fn test_component_overlap_is_fatal() {
        let c = component(&[("R0", 0, 64, 1), ("R1", 4, 32, 1)]);
        let err = compile_component(&c, &c.registers).unwrap_err();
        assert_eq!(
            err,
            LayoutError::Overlap {
                component: "C".to_string(),
                previous: "R0".to_string(),
                next: "R1".to_string(),
                end: 8,
                address: 4,
            }
        );
    }
}
