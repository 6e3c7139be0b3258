//! Lazy one-shot JIT handshake (§5) and its entry point (§6).
//!
//! Real compiler invocation is out of scope (§1); this crate specifies the
//! concurrency contract around it as a generic, testable primitive: exactly
//! one caller compiles per instantiation, concurrent callers see "busy" and
//! get `None`, and the published slots are visible to every later caller.

mod entry;
mod handshake;

pub use entry::{setup_and_introspect, GeneratorOptions};
pub use handshake::JitHandshake;
