//! The `st -> dy` lowering (§4.5.5): computes the [`WireType`] shape a
//! type's handler will write, used both to build the `describe` dynamic
//! descriptor constant and to check testable property 8 (the isomorphism
//! between what a handler writes and what it describes).
//!
//! Operates on the graph as it stands right after `TopoSort`, before
//! `Prune` clears `Container::template_params` — see the crate-level docs
//! for why codegen and `Prune` don't compose in this pipeline, matching
//! `original_source/oi/CodeGen.cpp::transform()`, which never calls Prune
//! at all.

use rustc_hash::FxHashSet;

use oi_containers::ContainerType;
use oi_errors::{Error, Result};
use oi_graph::{Node, NodeId, TemplateParam, TypeGraph};
use oi_wire::WireType;

const PADDING_MEMBER_NAME: &str = "__oi_padding";

/// Compute the wire shape of `id`, recursing through members/containers/
/// pointers. `stack` tracks nodes currently being expanded so a cycle that
/// slipped past `CycleFinder` is reported as `UnbreakableCycle` instead of
/// overflowing the stack.
pub fn wire_shape(graph: &TypeGraph, id: NodeId) -> Result<WireType> {
    let mut stack = FxHashSet::default();
    wire_shape_inner(graph, id, &mut stack)
}

fn wire_shape_inner(graph: &TypeGraph, id: NodeId, stack: &mut FxHashSet<NodeId>) -> Result<WireType> {
    if !stack.insert(id) {
        return Err(Error::UnbreakableCycle(format!(
            "wire shape recursion revisited {id} without a CycleBreaker"
        )));
    }

    let shape = match graph.get(id) {
        Node::Primitive(_) => WireType::VarInt,
        Node::Enum(_) => WireType::VarInt,

        Node::Class(c) => {
            let mut members = Vec::with_capacity(c.members.len());
            for m in &c.members {
                if m.name == PADDING_MEMBER_NAME {
                    continue;
                }
                members.push(wire_shape_inner(graph, m.type_ref, stack)?);
            }
            WireType::fold_pairs(members)
        }

        Node::Container(c) => container_wire_shape(graph, c, stack)?,

        Node::Array(a) => WireType::list(wire_shape_inner(graph, a.element, stack)?),

        Node::Typedef(t) => wire_shape_inner(graph, t.underlying, stack)?,

        Node::Pointer(pointee) => {
            let inner = wire_shape_inner(graph, *pointee, stack)?;
            WireType::pair(WireType::VarInt, WireType::sum(vec![WireType::Unit, inner]))
        }

        // References are never null, so there is no "not yet seen" branch:
        // just the address followed by the referent, unconditionally.
        Node::Reference(referent) => {
            let inner = wire_shape_inner(graph, *referent, stack)?;
            WireType::pair(WireType::VarInt, inner)
        }

        Node::Incomplete(_) => WireType::Unit,
        Node::Dummy { .. } => WireType::Unit,
        Node::DummyAllocator { .. } => WireType::Unit,

        Node::CaptureKeys { inner, .. } => wire_shape_inner(graph, *inner, stack)?,

        // A broken cycle behaves like a raw pointer that is never chased
        // again: record the address, nothing more.
        Node::CycleBreaker { .. } => WireType::VarInt,
    };

    stack.remove(&id);
    Ok(shape)
}

/// Render a [`WireType`] as the `st::*` combinator expression the typed
/// emitter prints for a `TypeHandler<DB, T>::type` (§4.5.2).
pub fn wire_type_to_cpp(shape: &WireType) -> String {
    match shape {
        WireType::Unit => "Unit<DB>".to_string(),
        WireType::VarInt => "VarInt<DB>".to_string(),
        WireType::Pair(a, b) => format!("Pair<DB, {}, {}>", wire_type_to_cpp(a), wire_type_to_cpp(b)),
        WireType::Sum(variants) => {
            let parts: Vec<String> = variants.iter().map(wire_type_to_cpp).collect();
            format!("Sum<DB, {}>", parts.join(", "))
        }
        WireType::List(elem) => format!("List<DB, {}>", wire_type_to_cpp(elem)),
    }
}

fn type_param_type(params: &[TemplateParam], idx: usize) -> Option<NodeId> {
    match params.get(idx)? {
        TemplateParam::Type { type_ref, .. } => Some(*type_ref),
        TemplateParam::Value(_) => None,
    }
}

fn container_wire_shape(
    graph: &TypeGraph,
    c: &oi_graph::ContainerNode,
    stack: &mut FxHashSet<NodeId>,
) -> Result<WireType> {
    if c.info.ctype.is_pointer_like() {
        let Some(inner_id) = type_param_type(&c.template_params, 0) else {
            return Ok(WireType::pair(WireType::VarInt, WireType::sum(vec![WireType::Unit])));
        };
        let inner = wire_shape_inner(graph, inner_id, stack)?;
        return Ok(WireType::pair(WireType::VarInt, WireType::sum(vec![WireType::Unit, inner])));
    }

    match c.info.ctype {
        ContainerType::Pair => {
            let a = type_param_type(&c.template_params, 0);
            let b = type_param_type(&c.template_params, 1);
            let a = match a {
                Some(id) => wire_shape_inner(graph, id, stack)?,
                None => WireType::Unit,
            };
            let b = match b {
                Some(id) => wire_shape_inner(graph, id, stack)?,
                None => WireType::Unit,
            };
            Ok(WireType::pair(a, b))
        }
        ContainerType::Optional => {
            let Some(inner_id) = type_param_type(&c.template_params, 0) else {
                return Ok(WireType::sum(vec![WireType::Unit]));
            };
            let inner = wire_shape_inner(graph, inner_id, stack)?;
            Ok(WireType::sum(vec![WireType::Unit, inner]))
        }
        ContainerType::Variant => {
            let mut variants = Vec::new();
            for (idx, param) in c.template_params.iter().enumerate() {
                if let TemplateParam::Type { .. } = param {
                    if let Some(id) = type_param_type(&c.template_params, idx) {
                        variants.push(wire_shape_inner(graph, id, stack)?);
                    }
                }
            }
            if variants.is_empty() {
                variants.push(WireType::Unit);
            }
            Ok(WireType::sum(variants))
        }
        ContainerType::Map | ContainerType::UnorderedMap | ContainerType::MultiMap => {
            let key = type_param_type(&c.template_params, 0);
            let value = type_param_type(&c.template_params, 1);
            let entry = match (key, value) {
                (Some(k), Some(v)) => {
                    WireType::pair(wire_shape_inner(graph, k, stack)?, wire_shape_inner(graph, v, stack)?)
                }
                _ => WireType::Unit,
            };
            Ok(WireType::list(entry))
        }
        // Vector, Array, Set, UnorderedSet, List, String, Adapter: a single
        // element type repeated `n` times.
        _ => {
            let element = match type_param_type(&c.template_params, 0) {
                Some(id) => wire_shape_inner(graph, id, stack)?,
                None => WireType::VarInt,
            };
            Ok(WireType::list(element))
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, reason = "tests may panic")]
    use super::*;
    use oi_containers::{Codegen, ContainerInfo};
    use oi_graph::{ClassNode, ContainerNode, Member, PrimitiveKind, Qualifiers};
    use regex::Regex;

    fn vector_info() -> ContainerInfo {
        ContainerInfo::from_legacy(
            "std::vector",
            Regex::new(r"^std::vector(<.*>)?$").unwrap(),
            ContainerType::Vector,
            "vector",
            Codegen {
                decl: "%1%".into(),
                func: "%1%".into(),
                handler: None,
            },
        )
    }

    #[test]
    fn scalar_member_is_varint() {
        let mut g = TypeGraph::new();
        let int32 = g.make_primitive(PrimitiveKind::Int32).unwrap();
        assert_eq!(wire_shape(&g, int32).unwrap(), WireType::VarInt);
    }

    #[test]
    fn class_folds_non_padding_members() {
        let mut g = TypeGraph::new();
        let int32 = g.make_primitive(PrimitiveKind::Int32).unwrap();
        let int64 = g.make_primitive(PrimitiveKind::Int64).unwrap();
        let pad_array = g
            .make_type(Node::Array(oi_graph::ArrayNode {
                element: g.make_primitive(PrimitiveKind::Int8).unwrap(),
                length: 4,
            }))
            .unwrap();
        let class_id = g
            .make_type(Node::Class(ClassNode {
                name: "S".into(),
                members: vec![
                    Member { name: "a".into(), type_ref: int32, bit_offset: 0, bit_size: None, align: None },
                    Member { name: PADDING_MEMBER_NAME.into(), type_ref: pad_array, bit_offset: 32, bit_size: None, align: None },
                    Member { name: "b".into(), type_ref: int64, bit_offset: 64, bit_size: None, align: None },
                ],
                ..ClassNode::default()
            }))
            .unwrap();

        let shape = wire_shape(&g, class_id).unwrap();
        assert_eq!(shape, WireType::pair(WireType::VarInt, WireType::VarInt));
    }

    #[test]
    fn vector_is_a_list_of_its_element() {
        let mut g = TypeGraph::new();
        let int32 = g.make_primitive(PrimitiveKind::Int32).unwrap();
        let vec_id = g
            .make_type(Node::Container(Box::new(ContainerNode {
                name: "vector".into(),
                fully_qualified_name: "std::vector<int>".into(),
                size: 24,
                align: None,
                info: vector_info(),
                template_params: vec![TemplateParam::Type { type_ref: int32, qualifiers: Qualifiers::empty() }],
                underlying: None,
            })))
            .unwrap();

        assert_eq!(wire_shape(&g, vec_id).unwrap(), WireType::list(WireType::VarInt));
    }

    #[test]
    fn pointer_is_addr_then_optional_pointee() {
        let mut g = TypeGraph::new();
        let int32 = g.make_primitive(PrimitiveKind::Int32).unwrap();
        let ptr = g.make_type(Node::Pointer(int32)).unwrap();
        assert_eq!(
            wire_shape(&g, ptr).unwrap(),
            WireType::pair(WireType::VarInt, WireType::sum(vec![WireType::Unit, WireType::VarInt]))
        );
    }

    #[test]
    fn renders_pair_and_sum_as_nested_combinators() {
        let shape = WireType::pair(WireType::VarInt, WireType::sum(vec![WireType::Unit, WireType::VarInt]));
        assert_eq!(wire_type_to_cpp(&shape), "Pair<DB, VarInt<DB>, Sum<DB, Unit<DB>, VarInt<DB>>>");
    }

    #[test]
    fn unbroken_self_cycle_is_reported() {
        let mut g = TypeGraph::new();
        let class_id = g
            .make_type(Node::Class(ClassNode { name: "Node".into(), ..ClassNode::default() }))
            .unwrap();
        let ptr = g.make_type(Node::Pointer(class_id)).unwrap();
        if let Node::Class(c) = g.get_mut(class_id) {
            c.members.push(Member { name: "next".into(), type_ref: ptr, bit_offset: 0, bit_size: None, align: None });
        }
        let err = wire_shape(&g, class_id).unwrap_err();
        assert!(matches!(err, Error::UnbreakableCycle(_)));
    }
}
