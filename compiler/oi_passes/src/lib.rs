//! Pass framework and transform passes (components C, D; §4.3, §4.4) plus
//! the supplemented passes of SPEC_FULL.md (`add_children`,
//! `enforce_compatibility`, `remove_top_level_pointer`) and the `KeyCapture`
//! post-processor (§4.8), which is driven as a pass since it mutates graph
//! edges before TopoSort/Prune run.

mod context;
mod manager;
mod passes;
mod tracker;

pub use context::{Context, IgnoreSpec, KeyCaptureRequest};
pub use manager::{Pass, PassManager};
pub use passes::{
    standard_pipeline, AddChildren, AddPadding, AlignmentCalc, CycleFinder, EnforceCompatibility,
    Flatten, IdentifyContainers, KeyCapture, NameGen, Prune, RemoveMembers,
    RemoveTopLevelPointer, TopoSort, TypeIdentifier,
};
pub use tracker::NodeTracker;

#[cfg(test)]
mod pipeline_tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, reason = "tests may panic")]
    use super::*;
    use oi_containers::Catalog;
    use oi_graph::{ClassNode, Member, Node, PrimitiveKind, TypeGraph};

    #[test]
    fn standard_pipeline_runs_end_to_end_on_a_simple_struct() {
        let mut g = TypeGraph::new();
        let int32 = g.make_primitive(PrimitiveKind::Int32).unwrap();
        let int64 = g.make_primitive(PrimitiveKind::Int64).unwrap();
        let class_id = g
            .make_type(Node::Class(ClassNode {
                name: "S".into(),
                fully_qualified_name: "S".into(),
                size: 16,
                members: vec![
                    Member {
                        name: "a".into(),
                        type_ref: int32,
                        bit_offset: 0,
                        bit_size: None,
                        align: None,
                    },
                    Member {
                        name: "b".into(),
                        type_ref: int64,
                        bit_offset: 8 * 8,
                        bit_size: None,
                        align: None,
                    },
                ],
                ..ClassNode::default()
            }))
            .unwrap();
        g.add_root(class_id);

        let mut ctx = Context::new(g, Catalog::new());
        standard_pipeline().run(&mut ctx).unwrap();

        assert!(!ctx.graph.final_types.is_empty());
        let Node::Class(c) = ctx.graph.get(class_id) else {
            panic!("expected Class");
        };
        assert!(c.template_params.is_empty());
        assert!(c.parents.is_empty());
        assert_eq!(c.align, Some(8));
        // a, padding, b
        assert_eq!(c.members.len(), 3);
    }
}
