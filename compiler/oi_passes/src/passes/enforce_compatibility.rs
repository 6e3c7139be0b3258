//! `enforce_compatibility` (supplemented, SPEC_FULL item 4): final sanity
//! pass validating every Container resolved a catalog entry during
//! IdentifyContainers. Grounded on
//! `original_source/oi/type_graph/EnforceCompatibility.cpp`.

use oi_errors::{Error, Result};
use oi_graph::Node;

use crate::context::Context;
use crate::manager::Pass;
use crate::tracker::NodeTracker;

#[derive(Default)]
pub struct EnforceCompatibility;

impl Pass for EnforceCompatibility {
    fn name(&self) -> &'static str {
        "EnforceCompatibility"
    }

    fn run(&mut self, ctx: &mut Context, _tracker: &mut NodeTracker) -> Result<()> {
        for id in ctx.graph.ids() {
            if let Node::Container(c) = ctx.graph.get(id) {
                if c.info.type_name.is_empty() {
                    return Err(Error::BadGraph(format!(
                        "container at {id} has no resolved catalog entry"
                    )));
                }
            }
        }
        Ok(())
    }
}
