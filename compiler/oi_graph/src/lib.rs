//! Type-graph intermediate representation (component A, §3.1, §4.1).
//!
//! A single arena ([`TypeGraph`]) owning a closed set of node variants
//! ([`Node`]), addressed by stable [`NodeId`]s. Cycles are permitted during
//! construction; `oi_passes::CycleFinder` makes them explicit.

mod features;
mod graph;
mod node;
mod node_id;

pub use features::FeatureSet;
pub use graph::TypeGraph;
pub use node::{
    ArrayNode, ClassKind, ClassNode, ContainerNode, EnumNode, Function, IncompleteNode, Member,
    Node, Parent, PrimitiveKind, Qualifiers, TemplateParam, TypedefNode, Virtuality,
};
pub use node_id::NodeId;
