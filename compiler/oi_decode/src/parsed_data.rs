//! `ParsedData`: parses one `WireType`-shaped value out of a VarInt byte
//! stream (§4.7). Grounded on
//! `original_source/oi/exporters/ParsedData.cpp`.
//!
//! `Pair`/`List`/`Sum` hold [`Lazy`] children the caller must force in
//! order — forcing shares a single cursor (`Rc<Cell<usize>>`) so forcing
//! `first` before `second` advances the position `second` reads from,
//! exactly like the original's shared `it` reference. The caller's own
//! cursor *is* that `Rc<Cell<usize>>` — `parse` takes it by reference
//! rather than copying it into a private `Cell` and syncing back
//! afterward, so forcing a `Lazy` returned from one `parse` call still
//! advances the position the caller's next `parse` call reads from.

use std::cell::Cell;
use std::rc::Rc;

use oi_errors::{Error, Result};
use oi_wire::{decode_advance, WireType};

#[derive(Debug, Clone)]
pub enum ParsedData<'a> {
    Unit,
    VarInt { value: u64 },
    Pair { first: Lazy<'a>, second: Lazy<'a> },
    List { length: u64, values: Lazy<'a> },
    Sum { index: u64, value: Lazy<'a> },
}

#[derive(Debug, Clone)]
pub struct Lazy<'a> {
    bytes: &'a [u8],
    cursor: Rc<Cell<usize>>,
    ty: WireType,
}

impl<'a> Lazy<'a> {
    fn new(bytes: &'a [u8], cursor: Rc<Cell<usize>>, ty: WireType) -> Self {
        Lazy { bytes, cursor, ty }
    }

    /// Parse this element, advancing the shared cursor past it.
    pub fn force(&self) -> Result<ParsedData<'a>> {
        ParsedData::parse(self.bytes, &self.cursor, self.ty.clone())
    }
}

impl<'a> ParsedData<'a> {
    /// Parse one `ty`-shaped value starting at `cursor`'s current position,
    /// advancing `cursor` past the bytes immediately consumed. `cursor` is
    /// the same `Rc<Cell<usize>>` the caller holds — not a private copy —
    /// so a `Pair`/`List`/`Sum`'s `Lazy` children, once forced, continue
    /// advancing that one position rather than a detached snapshot of it.
    pub fn parse(bytes: &'a [u8], cursor: &Rc<Cell<usize>>, ty: WireType) -> Result<Self> {
        match ty {
            WireType::Unit => Ok(ParsedData::Unit),
            WireType::VarInt => {
                let mut pos = cursor.get();
                let value = decode_advance(bytes, &mut pos)?;
                cursor.set(pos);
                Ok(ParsedData::VarInt { value })
            }
            WireType::Pair(a, b) => Ok(ParsedData::Pair {
                first: Lazy::new(bytes, cursor.clone(), *a),
                second: Lazy::new(bytes, cursor.clone(), *b),
            }),
            WireType::List(elem) => {
                let mut pos = cursor.get();
                let length = decode_advance(bytes, &mut pos)?;
                cursor.set(pos);
                Ok(ParsedData::List {
                    length,
                    values: Lazy::new(bytes, cursor.clone(), *elem),
                })
            }
            WireType::Sum(variants) => {
                let mut pos = cursor.get();
                let index = decode_advance(bytes, &mut pos)?;
                cursor.set(pos);
                let max = variants.len();
                if index as usize >= max {
                    return Err(Error::SumIndexOutOfRange { index, max });
                }
                let chosen = variants
                    .into_iter()
                    .nth(index as usize)
                    .unwrap_or_else(|| unreachable!("index already range-checked above"));
                Ok(ParsedData::Sum {
                    index,
                    value: Lazy::new(bytes, cursor.clone(), chosen),
                })
            }
        }
    }
}
