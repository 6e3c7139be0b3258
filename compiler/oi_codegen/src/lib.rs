//! Code emitter (component F, §4.5): turns a sorted, final type graph into
//! a single text artifact — includes, forward declarations, struct bodies
//! with drift-checking `static_assert`s, per-type handlers in one of two
//! modes, optional polymorphic dispatch, and a top-level wrapper with its
//! typed-mode dynamic descriptor.
//!
//! Expects a graph that has completed `TopoSort` but has *not* yet run
//! through `Prune`: `Container::template_params` still needs to be intact
//! here to compute each container's wire shape. This mirrors
//! `original_source/oi/CodeGen.cpp::transform()`, whose own pass list never
//! includes Prune at all — Prune exists for graphs bound for storage or
//! comparison, not for the emitter.

pub mod descriptor;
mod emitter;
mod layout;
mod polymorphic;
mod typed;
mod untyped;
mod wrapper;
mod writer;

pub use descriptor::{wire_shape, wire_type_to_cpp};
pub use emitter::{emit, EmitRequest};
pub use polymorphic::VtableRange;
pub use wrapper::hash64;
