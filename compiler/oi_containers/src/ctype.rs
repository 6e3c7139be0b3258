//! Closed enumeration of container kinds a descriptor can declare.
//!
//! Mirrors `original_source/oi/ContainerTypeEnum.h`'s `LIST_OF_CONTAINER_TYPES`
//! macro table, trimmed to the kinds this rewrite's catalog and emitter
//! actually branch on (§3.2, §6). Unknown `ctype` strings are fatal per §4.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerType {
    Vector,
    Array,
    Map,
    UnorderedMap,
    MultiMap,
    Set,
    UnorderedSet,
    List,
    Pair,
    UniquePtr,
    SharedPtr,
    WeakPtr,
    String,
    Optional,
    Variant,
    /// A container whose semantics delegate to another catalog entry
    /// (e.g. `std::queue` over `std::deque`) via `underlying_container_index`.
    Adapter,
}

impl ContainerType {
    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "VECTOR" => Self::Vector,
            "ARRAY_TYPE" | "ARRAY" => Self::Array,
            "MAP" | "STD_MAP_TYPE" => Self::Map,
            "UNORDERED_MAP" | "STD_UNORDERED_MAP_TYPE" => Self::UnorderedMap,
            "MULTI_MAP" | "MULTI_MAP_TYPE" => Self::MultiMap,
            "SET" | "SET_TYPE" => Self::Set,
            "UNORDERED_SET" | "UNORDERED_SET_TYPE" => Self::UnorderedSet,
            "LIST" | "LIST_TYPE" => Self::List,
            "PAIR" | "PAIR_TYPE" => Self::Pair,
            "UNIQUE_PTR" | "UNIQ_PTR_TYPE" => Self::UniquePtr,
            "SHARED_PTR" | "SHRD_PTR_TYPE" => Self::SharedPtr,
            "WEAK_PTR" | "WEAK_PTR_TYPE" => Self::WeakPtr,
            "STRING" | "STRING_TYPE" => Self::String,
            "OPTIONAL" | "OPTIONAL_TYPE" => Self::Optional,
            "VARIANT" | "STD_VARIANT_TYPE" => Self::Variant,
            "CONTAINER_ADAPTER_TYPE" | "ADAPTER" => Self::Adapter,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vector => "VECTOR",
            Self::Array => "ARRAY",
            Self::Map => "MAP",
            Self::UnorderedMap => "UNORDERED_MAP",
            Self::MultiMap => "MULTI_MAP",
            Self::Set => "SET",
            Self::UnorderedSet => "UNORDERED_SET",
            Self::List => "LIST",
            Self::Pair => "PAIR",
            Self::UniquePtr => "UNIQUE_PTR",
            Self::SharedPtr => "SHARED_PTR",
            Self::WeakPtr => "WEAK_PTR",
            Self::String => "STRING",
            Self::Optional => "OPTIONAL",
            Self::Variant => "VARIANT",
            Self::Adapter => "CONTAINER_ADAPTER_TYPE",
        }
    }

    /// Pointer-like containers own exactly one referent and participate in
    /// the pointer-identity / dedup protocol rather than the list protocol.
    pub fn is_pointer_like(self) -> bool {
        matches!(self, Self::UniquePtr | Self::SharedPtr | Self::WeakPtr)
    }

    /// Containers whose wire shape is a single tagged key, used by the
    /// presenter's `is_set_stats` flag (§3.4).
    pub fn is_set_like(self) -> bool {
        matches!(self, Self::Set | Self::UnorderedSet)
    }
}
