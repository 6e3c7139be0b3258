//! Decoder core (component H; §4.7): reconstructs a tree of [`Element`]s
//! from raw wire bytes plus the instruction stream a generated artifact's
//! emitted code would drive.
//!
//! Two independent decoders live here, grounded on two distinct original
//! files:
//! - [`ParsedData`]/[`Lazy`] parses a LEB128 VarInt byte stream one
//!   `WireType` at a time, lazily, sharing a cursor across a `Pair`'s
//!   children.
//! - [`TypeCheckingWalker`] validates a fixed-width `&[u64]` word buffer
//!   against a `WireType` shape, independent of LEB128 concerns.
//!
//! [`IntrospectionResult`] ties `ParsedData` to the `Inst`/`Field`
//! instruction stream (§4.7, §4.8) to produce the preorder `Element`
//! sequence a presenter would walk.

mod inst;
mod introspection_result;
mod parsed_data;
mod type_checking_walker;

pub use inst::{Field, Inst, ProcessorFn};
pub use introspection_result::{collect_elements, DecodeIter, IntrospectionResult};
pub use parsed_data::{Lazy, ParsedData};
pub use type_checking_walker::{Event, TypeCheckingWalker};
