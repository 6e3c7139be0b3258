//! The instruction stream the decoder iterator drives (§4.7). Grounded on
//! `original_source/include/oi/exporters/inst.h`.
//!
//! A `Field` is the (conceptually `'static`, generated-code-embedded)
//! descriptor for one member: its display metadata, nested fields, and the
//! `(WireType, Processor)` pairs that extract container/pointer-specific
//! data out of the wire bytes while possibly scheduling more work.
//! `Field`s are shared via `Rc` rather than `'static` references, since this
//! rewrite never actually compiles the emitted code — only `oi_codegen`'s
//! text templates describe what a compiled artifact's `Field` tree would
//! contain; `oi_decode`'s tests build `Field` trees directly to exercise the
//! iterator.

use std::rc::Rc;

use oi_result::Element;

use crate::parsed_data::ParsedData;

/// Mutates the in-progress `Element` for this field and may schedule
/// further work by pushing `Inst`s through the callback — e.g. a list
/// container reads its length/capacity into `container_stats` and then
/// pushes `Inst::Repeat(length, element_field)`.
pub type ProcessorFn = for<'a> fn(&mut Element, &mut dyn FnMut(Inst), ParsedData<'a>);

#[derive(Clone)]
pub struct Field {
    pub static_size: u64,
    pub exclusive_size: u64,
    pub name: String,
    pub type_names: Vec<String>,
    pub fields: Vec<Rc<Field>>,
    pub processors: Vec<(oi_wire::WireType, ProcessorFn)>,
    pub is_primitive: bool,
}

impl Field {
    /// Convenience constructor for fields whose `exclusive_size` equals
    /// `static_size` (the common case — see the original's two-constructor
    /// `Field` overload).
    pub fn leaf(static_size: u64, name: impl Into<String>, is_primitive: bool) -> Self {
        Field {
            static_size,
            exclusive_size: static_size,
            name: name.into(),
            type_names: Vec::new(),
            fields: Vec::new(),
            processors: Vec::new(),
            is_primitive,
        }
    }
}

#[derive(Clone)]
pub enum Inst {
    PopTypePath,
    Repeat(u64, Rc<Field>),
    Field(Rc<Field>),
}
