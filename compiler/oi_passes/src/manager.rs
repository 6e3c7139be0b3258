//! Ordered, named pass execution (component C, §4.3).

use oi_errors::Result;
use tracing::info_span;

use crate::context::Context;
use crate::tracker::NodeTracker;

/// One named transformation over the graph. Implementations use
/// [`NodeTracker`] to guard recursive traversals against cycles; an
/// unguarded re-entrant visit is a pass bug, not a user-facing error, but we
/// still surface it as `PassCycleUnhandled` rather than looping forever.
pub trait Pass {
    fn name(&self) -> &'static str;
    fn run(&mut self, ctx: &mut Context, tracker: &mut NodeTracker) -> Result<()>;
}

#[derive(Default)]
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn add(mut self, pass: impl Pass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// Runs every registered pass in order, failing fast on the first error
    /// (§4.4 "Failure policy": no partial outputs).
    pub fn run(&mut self, ctx: &mut Context) -> Result<()> {
        let mut tracker = NodeTracker::new();
        for pass in &mut self.passes {
            let span = info_span!("pass", name = pass.name());
            let _enter = span.enter();
            tracker.reset();
            tracker.resize(ctx.graph.len());
            let before = ctx.graph.len();
            pass.run(ctx, &mut tracker)?;
            tracing::info!(before, after = ctx.graph.len(), "pass complete");
        }
        Ok(())
    }
}
