//! `TypeCheckingWalker`: a stack machine that walks a `WireType` tree
//! alongside a fixed-width `u64` word buffer, validating that the words
//! match the declared shape (§4.7). Grounded on
//! `original_source/oi/exporters/TypeCheckingWalker.{h,cpp}`.
//!
//! This is a distinct, coarser-grained validator from [`crate::ParsedData`]:
//! it consumes one `u64` word per scalar rather than a LEB128 byte stream,
//! the representation a tree-builder-style consumer works with once a
//! data segment has been split into fixed-width words.

use oi_errors::{Error, Result};
use oi_wire::WireType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    VarInt { value: u64 },
    SumIndex { index: u64 },
    ListLength { length: u64 },
}

pub struct TypeCheckingWalker<'a> {
    stack: Vec<WireType>,
    buf: &'a [u64],
    pos: usize,
}

impl<'a> TypeCheckingWalker<'a> {
    pub fn new(root: WireType, buf: &'a [u64]) -> Self {
        TypeCheckingWalker {
            stack: vec![root],
            buf,
            pos: 0,
        }
    }

    fn pop_front(&mut self) -> Result<u64> {
        if self.pos >= self.buf.len() {
            return Err(Error::UnexpectedEndOfSegment);
        }
        let v = self.buf[self.pos];
        self.pos += 1;
        Ok(v)
    }

    /// Advance the stack machine by one logical element, or `Ok(None)` once
    /// the stack is empty.
    pub fn advance(&mut self) -> Result<Option<Event>> {
        let Some(ty) = self.stack.pop() else {
            return Ok(None);
        };

        match ty {
            WireType::Unit => self.advance(),
            WireType::VarInt => Ok(Some(Event::VarInt {
                value: self.pop_front()?,
            })),
            WireType::Pair(a, b) => {
                self.stack.push(*b);
                self.stack.push(*a);
                self.advance()
            }
            WireType::List(elem) => {
                let length = self.pop_front()?;
                for _ in 0..length {
                    self.stack.push((*elem).clone());
                }
                Ok(Some(Event::ListLength { length }))
            }
            WireType::Sum(variants) => {
                let index = self.pop_front()?;
                let max = variants.len();
                if index as usize >= max {
                    return Err(Error::SumIndexOutOfRange { index, max });
                }
                let chosen = variants
                    .into_iter()
                    .nth(index as usize)
                    .unwrap_or_else(|| unreachable!("index already range-checked above"));
                self.stack.push(chosen);
                Ok(Some(Event::SumIndex { index }))
            }
        }
    }
}
