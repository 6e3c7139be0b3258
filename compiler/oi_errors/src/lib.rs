//! Shared error taxonomy for the object-introspection pipeline.
//!
//! One enum, one `Result` alias, used at every crate boundary so that a
//! caller driving the whole pipeline (catalog load -> passes -> codegen ->
//! decode) only ever has to match one error type.

use thiserror::Error;

/// Every failure mode the pipeline can produce, per the error taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    /// A container descriptor file is missing a required field or is
    /// otherwise malformed.
    #[error("bad container descriptor {path}: {reason}")]
    BadDescriptor { path: String, reason: String },

    /// A type-graph invariant was violated during a pass.
    #[error("bad graph: {0}")]
    BadGraph(String),

    /// `CycleFinder` found a cycle with no preferred edge to break.
    #[error("unbreakable cycle: {0}")]
    UnbreakableCycle(String),

    /// Typed-data-segment mode requested for a container with no `handler`
    /// codegen template.
    #[error("container {0} has no handler template required by typed-data-segment mode")]
    CodegenHandlerMissing(String),

    /// LEB128 varint ran off the end of the buffer.
    #[error("truncated varint")]
    TruncatedVarInt,

    /// Decoder ran off the end of the data segment mid-element.
    #[error("unexpected end of segment")]
    UnexpectedEndOfSegment,

    /// Frame header magic or cookie did not match.
    #[error("bad frame: {0}")]
    BadFrame(String),

    /// A `Sum` tag was >= the number of variants.
    #[error("sum index {index} out of range (max {max})")]
    SumIndexOutOfRange { index: u64, max: usize },

    /// Introspection was invoked before the JIT slots were published.
    #[error("introspection not initialized")]
    NotInitialized,

    /// The type-graph arena ran out of capacity.
    #[error("type graph arena exhausted (capacity {0})")]
    GraphArenaExhausted(usize),

    /// A pass's `RecursiveVisitor`/`RecursiveMutator` recursed through an
    /// unbroken cycle without consulting a `NodeTracker`.
    #[error("pass {pass} hit an unhandled cycle at node {node}")]
    PassCycleUnhandled { pass: &'static str, node: u32 },

    /// Wrapper for I/O errors encountered loading descriptor files.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
