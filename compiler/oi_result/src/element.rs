//! One node of a decoded traversal tree (§3.4). Grounded on
//! `original_source/include/oi/result/Element.h`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerStats {
    pub length: u64,
    pub capacity: u64,
}

/// The scalar payload a leaf element may carry, mirroring
/// `Element::data`'s `variant<nullopt_t, Pointer, Scalar, string>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Data {
    Pointer(u64),
    Scalar(u64),
    Str(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    /// Field names from the root to this node, inclusive.
    pub type_path: Vec<String>,
    pub type_names: Vec<String>,
    pub static_size: u64,
    pub exclusive_size: u64,
    /// Address this node was reached through, if reached via a pointer.
    pub pointer: Option<u64>,
    pub data: Option<Data>,
    pub container_stats: Option<ContainerStats>,
    /// `Some(true)` for a set-like container, mirroring `IsSetStats`.
    pub is_set_stats: Option<bool>,
    pub is_primitive: bool,
}

impl Element {
    pub fn depth(&self) -> usize {
        self.type_path.len()
    }
}
