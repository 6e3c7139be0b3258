//! The static/dynamic wire type duality (§3.3), collapsed into a single
//! data-first algebra per the design notes (§9): rather than a compile-time
//! `st::*` template family and a runtime `dy::*` mirror, one `WireType` tree
//! serves as both the generated artifact's embedded descriptor constant and
//! the shape the decoder checks against.

/// One node of the wire shape algebra. `Clone`+`PartialEq` so tests can
/// assert the isomorphism between what a handler writes and what it
/// describes (testable property 8, §8).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireType {
    /// Zero bytes.
    Unit,
    /// One LEB128 unsigned integer.
    VarInt,
    /// `a` followed by `b`.
    Pair(Box<WireType>, Box<WireType>),
    /// `VarInt` tag `i < variants.len()` followed by `variants[i]`.
    Sum(Vec<WireType>),
    /// `VarInt` length `n` followed by `n` copies of `element`.
    List(Box<WireType>),
}

impl WireType {
    pub fn pair(a: WireType, b: WireType) -> WireType {
        WireType::Pair(Box::new(a), Box::new(b))
    }

    pub fn list(element: WireType) -> WireType {
        WireType::List(Box::new(element))
    }

    pub fn sum(variants: Vec<WireType>) -> WireType {
        WireType::Sum(variants)
    }

    /// Right-fold a sequence of member shapes into nested `Pair`s, collapsing
    /// to `Unit` for an empty sequence (§4.5.2 — "empty classes collapse to
    /// `Unit<DB>`").
    pub fn fold_pairs(members: impl IntoIterator<Item = WireType>) -> WireType {
        let mut rest: Vec<WireType> = members.into_iter().collect();
        let Some(mut acc) = rest.pop() else {
            return WireType::Unit;
        };
        while let Some(prev) = rest.pop() {
            acc = WireType::pair(prev, acc);
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, reason = "tests may panic")]
    use super::*;

    #[test]
    fn fold_pairs_empty_is_unit() {
        assert_eq!(WireType::fold_pairs(Vec::new()), WireType::Unit);
    }

    #[test]
    fn fold_pairs_single_is_itself() {
        assert_eq!(WireType::fold_pairs(vec![WireType::VarInt]), WireType::VarInt);
    }

    #[test]
    fn fold_pairs_is_right_associative() {
        let shape = WireType::fold_pairs(vec![WireType::VarInt, WireType::Unit, WireType::VarInt]);
        assert_eq!(
            shape,
            WireType::pair(WireType::VarInt, WireType::pair(WireType::Unit, WireType::VarInt))
        );
    }
}
