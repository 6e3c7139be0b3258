//! Lazy one-shot JIT handshake (§5): two process-wide slots per
//! instantiation, `introspect_fn` and `descriptor`, published once by
//! whichever caller wins the race to compile.
//!
//! `original_source/include/oi/oi-jit*.h` coordinates this with a raw
//! `std::atomic<bool>` flag plus raw atomic pointers published with
//! `memory_order_release` and read with `memory_order_acquire`. The
//! `unsafe_code = "deny"` lint here rules out the raw-pointer-cast
//! equivalent, so this rewrite reaches for the same tool the teacher uses
//! for its own lazy-once state (`std::sync::OnceLock`, see
//! `oric::tracing_setup::init`): `OnceLock::set` already provides the
//! release-store / acquire-load pairing the original hand-rolls, and
//! `AtomicBool::compare_exchange` still does the "first caller wins" part.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

/// One instantiation's compiled entry point plus its descriptor, and the
/// flag that elects exactly one caller to produce them.
///
/// `F` and `D` are left generic rather than fixed to a raw function
/// pointer and a `dy` node, since real compilation is out of scope here
/// (§1); callers plug in whatever their compiled artifact's types are.
pub struct JitHandshake<F, D> {
    is_critical: AtomicBool,
    introspect_fn: OnceLock<F>,
    descriptor: OnceLock<D>,
}

impl<F, D> Default for JitHandshake<F, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F, D> JitHandshake<F, D> {
    pub fn new() -> Self {
        JitHandshake {
            is_critical: AtomicBool::new(false),
            introspect_fn: OnceLock::new(),
            descriptor: OnceLock::new(),
        }
    }

    /// Attempt to become the compiling caller. Returns `true` exactly once
    /// per instantiation; every other caller, whether concurrent or later,
    /// gets `false` and must not compile.
    pub fn try_begin_compilation(&self) -> bool {
        let won = self
            .is_critical
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if won {
            tracing::debug!("jit handshake: compilation started");
        } else {
            tracing::debug!("jit handshake: busy, caller must retry");
        }
        won
    }

    /// Publish the compiled slots. Only the caller that won
    /// [`try_begin_compilation`] should call this, and only once; later
    /// calls are silently ignored, matching `OnceLock`'s own contract.
    pub fn publish(&self, introspect_fn: F, descriptor: D) {
        let _ = self.introspect_fn.set(introspect_fn);
        let _ = self.descriptor.set(descriptor);
        tracing::debug!("jit handshake: slots published");
    }

    /// Both slots are non-null and safe to dereference.
    pub fn is_ready(&self) -> bool {
        self.introspect_fn.get().is_some() && self.descriptor.get().is_some()
    }

    /// The published entry point.
    ///
    /// # Panics
    ///
    /// Panics if called before [`Self::publish`] — calling `introspect`
    /// before both slots are non-null is a programmer error per the
    /// handshake contract, not a recoverable condition.
    pub fn introspect_fn(&self) -> &F {
        self.introspect_fn
            .get()
            .unwrap_or_else(|| panic!("introspect called before the JIT slots were published"))
    }

    /// The published descriptor. Panics under the same contract as
    /// [`Self::introspect_fn`].
    pub fn descriptor(&self) -> &D {
        self.descriptor
            .get()
            .unwrap_or_else(|| panic!("introspect called before the JIT slots were published"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, reason = "tests may panic")]
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn first_caller_wins_and_later_callers_lose() {
        let h: JitHandshake<u32, u32> = JitHandshake::new();
        assert!(h.try_begin_compilation());
        assert!(!h.try_begin_compilation());
        assert!(!h.try_begin_compilation());
    }

    #[test]
    fn not_ready_until_both_slots_are_published() {
        let h: JitHandshake<u32, u32> = JitHandshake::new();
        assert!(!h.is_ready());
        h.try_begin_compilation();
        h.publish(1, 2);
        assert!(h.is_ready());
        assert_eq!(*h.introspect_fn(), 1);
        assert_eq!(*h.descriptor(), 2);
    }

    #[test]
    #[should_panic(expected = "introspect called before the JIT slots were published")]
    fn introspect_before_publish_panics() {
        let h: JitHandshake<u32, u32> = JitHandshake::new();
        let _ = h.introspect_fn();
    }

    #[test]
    fn concurrent_callers_serialize_on_the_critical_flag() {
        let h = Arc::new(JitHandshake::<u32, u32>::new());
        let winners: Vec<bool> = (0..8)
            .map(|_| {
                let h = Arc::clone(&h);
                thread::spawn(move || h.try_begin_compilation())
            })
            .map(|handle| handle.join().expect("thread should not panic"))
            .collect();
        assert_eq!(winners.iter().filter(|&&won| won).count(), 1);
    }
}
