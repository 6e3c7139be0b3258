//! The `setup_and_introspect` entry point (§6) and its `GeneratorOptions`.
//!
//! The original signature, `setup_and_introspect<T, Features...>(&T,
//! GeneratorOptions) -> Option<IntrospectionResult>`, bakes "compile if
//! nobody has yet, then call the compiled entry point" into one function
//! because in the original the compiler invocation and the call trampoline
//! are fixed. Real compilation is out of scope here (§1), so this rewrite
//! takes the compile step and the call step as closures — the seam a real
//! backend plugs into — while keeping the same busy/ready/error contract.

use std::path::PathBuf;

use oi_decode::IntrospectionResult;
use oi_errors::Result;

use crate::handshake::JitHandshake;

/// Mirrors §6's `GeneratorOptions` verbatim.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    pub config_file_path: PathBuf,
    pub source_file_dump_path: Option<PathBuf>,
    pub debug_level: u8,
}

/// Drive one instantiation's handshake to completion for a single call.
///
/// - If the slots are already published, runs the compiled entry point
///   directly.
/// - If nobody has started compiling yet, this caller becomes the
///   compiler: it runs `compile`, publishes the result, then runs it.
/// - If another caller is already compiling, returns `Ok(None)` —
///   "initializing, try later" — without running anything.
///
/// `compile` errors propagate; they do not poison the handshake, so a
/// later caller may retry (the `is_critical` flag stays flipped, but a
/// fresh [`JitHandshake`] is expected per failed instantiation in
/// practice, matching the original's "compilation failure is fatal to
/// this instantiation" behavior).
pub fn setup_and_introspect<T, F, D>(
    handshake: &JitHandshake<F, D>,
    value: &T,
    options: &GeneratorOptions,
    compile: impl FnOnce(&GeneratorOptions) -> Result<(F, D)>,
    run: impl FnOnce(&F, &D, &T) -> Result<IntrospectionResult>,
) -> Result<Option<IntrospectionResult>> {
    if handshake.is_ready() {
        return run(handshake.introspect_fn(), handshake.descriptor(), value).map(Some);
    }
    if !handshake.try_begin_compilation() {
        return Ok(None);
    }
    let (f, d) = compile(options)?;
    handshake.publish(f, d);
    run(handshake.introspect_fn(), handshake.descriptor(), value).map(Some)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, reason = "tests may panic")]
    use super::*;
    use oi_decode::Field;
    use oi_errors::Error;
    use std::rc::Rc;

    fn opts() -> GeneratorOptions {
        GeneratorOptions { config_file_path: PathBuf::from("container-configs.toml"), source_file_dump_path: None, debug_level: 0 }
    }

    fn empty_result() -> IntrospectionResult {
        IntrospectionResult::new(Vec::new(), Rc::new(Field::leaf(4, "root", true)))
    }

    #[test]
    fn first_call_compiles_and_runs() {
        let h: JitHandshake<u32, u32> = JitHandshake::new();
        let result = setup_and_introspect(
            &h,
            &42u32,
            &opts(),
            |_opts| Ok((7u32, 9u32)),
            |f, d, _value| {
                assert_eq!(*f, 7);
                assert_eq!(*d, 9);
                Ok(empty_result())
            },
        )
        .unwrap();
        assert!(result.is_some());
        assert!(h.is_ready());
    }

    #[test]
    fn second_concurrent_call_sees_busy() {
        let h: JitHandshake<u32, u32> = JitHandshake::new();
        assert!(h.try_begin_compilation());
        let result = setup_and_introspect(
            &h,
            &42u32,
            &opts(),
            |_opts| Ok((7u32, 9u32)),
            |_f, _d, _value| Ok(empty_result()),
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn compile_failure_propagates() {
        let h: JitHandshake<u32, u32> = JitHandshake::new();
        let err = setup_and_introspect(
            &h,
            &42u32,
            &opts(),
            |_opts| Err(Error::BadDescriptor { path: "x".into(), reason: "missing [info]".into() }),
            |_f, _d, _value| Ok(empty_result()),
        );
        assert!(err.is_err());
        assert!(!h.is_ready());
    }

    #[test]
    fn already_ready_skips_recompilation() {
        let h: JitHandshake<u32, u32> = JitHandshake::new();
        h.try_begin_compilation();
        h.publish(1, 2);
        let result = setup_and_introspect(
            &h,
            &42u32,
            &opts(),
            |_opts| panic!("compile must not run once published"),
            |f, d, _value| {
                assert_eq!((*f, *d), (1, 2));
                Ok(empty_result())
            },
        )
        .unwrap();
        assert!(result.is_some());
    }
}
