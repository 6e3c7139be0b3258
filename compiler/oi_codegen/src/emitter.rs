//! Top-level orchestration (§4.5): assembles includes, declarations,
//! definitions, per-type handlers, and the top-level wrapper into the
//! single text artifact the module describes.

use std::collections::HashMap;

use oi_errors::Result;
use oi_graph::{FeatureSet, Node, NodeId, TypeGraph};

use crate::layout;
use crate::polymorphic::{self, VtableRange};
use crate::typed;
use crate::untyped;
use crate::wrapper::{self, WrapperOptions};
use crate::writer::Writer;

pub struct EmitRequest<'a> {
    pub graph: &'a TypeGraph,
    pub features: FeatureSet,
    pub type_name: &'a str,
    pub root_class_name: &'a str,
    /// Vtable ranges for polymorphic dispatch (§4.5.3), empty when
    /// `POLYMORPHIC_INHERITANCE` is not set or symbol resolution found
    /// nothing (every child then falls through to the base handler).
    pub vtable_ranges: HashMap<NodeId, VtableRange>,
}

pub fn emit(req: &EmitRequest<'_>) -> Result<String> {
    tracing::debug!(
        type_name = req.type_name,
        typed_mode = req.features.contains(FeatureSet::TYPED_DATA_SEGMENT),
        final_types = req.graph.final_types.len(),
        "emitting code"
    );
    let mut w = Writer::new();

    layout::emit_includes(&mut w, req.graph);
    layout::emit_forward_declarations(&mut w, req.graph);
    layout::emit_class_definitions(&mut w, req.graph);

    if req.features.contains(FeatureSet::TYPED_DATA_SEGMENT) {
        typed::emit_typed_handlers(&mut w, req.graph)?;
    } else {
        untyped::emit_untyped_handlers(&mut w, req.graph)?;
    }

    if req.features.contains(FeatureSet::POLYMORPHIC_INHERITANCE) {
        for &id in &req.graph.final_types {
            let Node::Class(c) = req.graph.get(id) else { continue };
            if polymorphic::is_polymorphic_root(c) {
                polymorphic::emit_dispatch(
                    &mut w,
                    req.graph,
                    &c.fully_qualified_name,
                    c,
                    &req.vtable_ranges,
                );
            }
        }
    }

    let opts = WrapperOptions {
        type_name: req.type_name.to_string(),
        root_class_name: req.root_class_name.to_string(),
        typed_mode: req.features.contains(FeatureSet::TYPED_DATA_SEGMENT),
        emit_timestamp: false,
    };
    wrapper::emit_top_level_wrapper(&mut w, &opts);
    if opts.typed_mode {
        wrapper::emit_dynamic_descriptor(&mut w, &opts);
    }

    Ok(w.take_output())
}
