//! `SizedResult`: exclusive-size post-processor (component I, §4.8).
//!
//! Grounded on `original_source/include/oi/result/SizedResult{.h,-inl.h}`.
//! The original streams over a lazily-decoded, clonable iterator so it never
//! materializes the whole tree; this rewrite's `Element`s are already owned
//! (`String`, not `string_view`), so there is no zero-copy benefit to
//! preserve and `oi_result` simply collects into a `Vec` up front — the
//! two-pass algorithm (prefix sums + last-descendant index) is unchanged.

use std::ops::Deref;

use crate::element::Element;

/// `Element` plus its exclusive subtree size — the sum of `exclusive_size`
/// over the node and all of its descendants in the type-path tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SizedElement {
    pub element: Element,
    pub size: u64,
}

impl Deref for SizedElement {
    type Target = Element;

    fn deref(&self) -> &Element {
        &self.element
    }
}

/// Attach exclusive subtree sizes to a preorder sequence of `Element`s.
///
/// # Algorithm
///
/// 1. First pass: walk the sequence once, tracking a stack of `(index,
///    depth)` keyed on `type_path.len()`. Whenever the next element's depth
///    is `<=` a stack entry's depth, that entry's subtree is closed — its
///    last descendant is the previous index. Anything still open at the end
///    closes with the last element's index. Also record a running prefix
///    sum of `exclusive_size`.
/// 2. Second pass: for element `i`, `size = prefix[last_descendant(i)] -
///    prefix[i - 1]` (`prefix[-1] = 0`).
pub fn size_elements(elements: Vec<Element>) -> Vec<SizedElement> {
    let n = elements.len();
    if n == 0 {
        return Vec::new();
    }

    #[derive(Clone, Copy)]
    struct StackEntry {
        index: usize,
        depth: usize,
    }

    let mut stack: Vec<StackEntry> = Vec::new();
    let mut last_descendant = vec![0usize; n];
    let mut prefix = vec![0u64; n];
    let mut running = 0u64;

    for (idx, element) in elements.iter().enumerate() {
        let depth = element.depth();
        while let Some(top) = stack.last().copied() {
            if top.depth >= depth {
                stack.pop();
                last_descendant[top.index] = idx - 1;
            } else {
                break;
            }
        }
        running += element.exclusive_size;
        prefix[idx] = running;
        stack.push(StackEntry { index: idx, depth });
    }
    while let Some(top) = stack.pop() {
        last_descendant[top.index] = n - 1;
    }

    elements
        .into_iter()
        .enumerate()
        .map(|(idx, element)| {
            let lc = last_descendant[idx];
            let size = prefix[lc] - if idx == 0 { 0 } else { prefix[idx - 1] };
            SizedElement { element, size }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, reason = "tests may panic")]
    use super::*;

    fn leaf(path: &[&str], exclusive: u64) -> Element {
        Element {
            name: path.last().unwrap().to_string(),
            type_path: path.iter().map(|s| s.to_string()).collect(),
            type_names: vec![],
            static_size: exclusive,
            exclusive_size: exclusive,
            pointer: None,
            data: None,
            container_stats: None,
            is_set_stats: None,
            is_primitive: true,
        }
    }

    #[test]
    fn s6_sized_result_nested() {
        // S6: exclusive sizes [A=8, B=4, C=2, D=1], depths [1,2,3,2]
        // -> sizes [15, 6, 2, 1].
        let elements = vec![
            leaf(&["a"], 8),
            leaf(&["a", "b"], 4),
            leaf(&["a", "b", "c"], 2),
            leaf(&["a", "d"], 1),
        ];
        let sized = size_elements(elements);
        let sizes: Vec<u64> = sized.iter().map(|s| s.size).collect();
        assert_eq!(sizes, vec![15, 6, 2, 1]);
    }

    #[test]
    fn flat_siblings_each_own_their_exclusive_size() {
        let elements = vec![leaf(&["a"], 3), leaf(&["b"], 5), leaf(&["c"], 7)];
        let sized = size_elements(elements);
        let sizes: Vec<u64> = sized.iter().map(|s| s.size).collect();
        assert_eq!(sizes, vec![3, 5, 7]);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(size_elements(Vec::new()).is_empty());
    }
}
