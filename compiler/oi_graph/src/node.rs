//! The closed node algebra (§3.1).

use oi_containers::ContainerInfo;
use smallvec::SmallVec;

use crate::node_id::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Float80,
    Float128,
    Bool,
    UIntPtr,
    StubbedPointer,
    Void,
}

impl PrimitiveKind {
    /// Size in bytes. `Void` and `StubbedPointer` carry no storage of their
    /// own; `StubbedPointer` reports pointer width since it stands in for an
    /// address-sized slot (e.g. a stubbed allocator's storage pointer).
    pub fn size(self) -> u64 {
        match self {
            Self::Int8 | Self::UInt8 | Self::Bool => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 | Self::UIntPtr | Self::StubbedPointer => 8,
            Self::Float80 => 16,
            Self::Float128 => 16,
            Self::Void => 0,
        }
    }

    pub fn align(self) -> u64 {
        match self {
            Self::Float80 => 16,
            _ => self.size().max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Struct,
    Union,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Virtuality {
    NonVirtual,
    Virtual,
    PureVirtual,
}

bitflags::bitflags! {
    /// Template-parameter qualifiers. Currently only `const` (§3.1).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Qualifiers: u8 {
        const CONST = 0b01;
    }
}

#[derive(Debug, Clone)]
pub enum TemplateParam {
    Type { type_ref: NodeId, qualifiers: Qualifiers },
    Value(String),
}

#[derive(Debug, Clone)]
pub struct Parent {
    pub type_ref: NodeId,
    pub bit_offset: u64,
}

#[derive(Debug, Clone)]
pub struct Member {
    pub name: String,
    pub type_ref: NodeId,
    pub bit_offset: u64,
    pub bit_size: Option<u64>,
    pub align: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub virtuality: Virtuality,
}

#[derive(Debug, Clone, Default)]
pub struct ClassNode {
    pub kind: ClassKind,
    pub name: String,
    pub fully_qualified_name: String,
    pub size: u64,
    pub align: Option<u64>,
    pub packed: bool,
    pub virtuality: Option<Virtuality>,
    pub template_params: Vec<TemplateParam>,
    pub parents: Vec<Parent>,
    pub members: Vec<Member>,
    pub functions: Vec<Function>,
    /// Back-references for polymorphic dispatch (§4.5.3), populated by
    /// `passes::link_children` before `Flatten` clears `parents`.
    pub children: SmallVec<[NodeId; 4]>,
}

impl Default for ClassKind {
    fn default() -> Self {
        ClassKind::Struct
    }
}

impl Default for Virtuality {
    fn default() -> Self {
        Virtuality::NonVirtual
    }
}

#[derive(Debug, Clone)]
pub struct ContainerNode {
    pub name: String,
    pub fully_qualified_name: String,
    pub size: u64,
    pub align: Option<u64>,
    pub info: ContainerInfo,
    pub template_params: Vec<TemplateParam>,
    /// The original `Class` before `IdentifyContainers` replaced it;
    /// dropped by `Prune` (§4.4.10).
    pub underlying: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct EnumNode {
    pub name: String,
    pub size: u64,
    pub variants: Option<Vec<(i64, String)>>,
}

#[derive(Debug, Clone)]
pub struct ArrayNode {
    pub element: NodeId,
    pub length: u64,
}

#[derive(Debug, Clone)]
pub struct TypedefNode {
    pub name: String,
    pub underlying: NodeId,
}

#[derive(Debug, Clone)]
pub struct IncompleteNode {
    pub name: String,
}

/// The closed set of node variants (§3.1). `NodeId` equality, not structural
/// equality, is identity throughout the pipeline.
#[derive(Debug, Clone)]
pub enum Node {
    Primitive(PrimitiveKind),
    Class(ClassNode),
    Container(Box<ContainerNode>),
    Enum(EnumNode),
    Array(ArrayNode),
    Typedef(TypedefNode),
    Pointer(NodeId),
    Reference(NodeId),
    Incomplete(IncompleteNode),
    Dummy { size: u64, align: u64 },
    DummyAllocator { inner: NodeId, size: u64, align: u64 },
    /// Wraps a container site requesting key capture (§4.8). `info` is a
    /// clone of the wrapped container's `ContainerInfo` with
    /// `capture_keys = true`.
    CaptureKeys { inner: NodeId, info: ContainerInfo },
    /// Sentinel inserted on exactly one edge of each cycle by `CycleFinder`
    /// (§4.4.8); downstream passes treat it as a leaf.
    CycleBreaker { target: NodeId },
}

impl Node {
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Node::Class(c) => Some(&c.name),
            Node::Container(c) => Some(&c.name),
            Node::Enum(e) => Some(&e.name),
            Node::Typedef(t) => Some(&t.name),
            Node::Incomplete(i) => Some(&i.name),
            _ => None,
        }
    }

    pub fn is_class(&self) -> bool {
        matches!(self, Node::Class(_))
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Node::Container(_))
    }
}
