//! `IntrospectionResult`: ties the wire decoder to the `Inst` instruction
//! stream, yielding a preorder sequence of `Element`s (§4.7). Grounded on
//! `original_source/oi/IntrospectionResult.cpp` and
//! `include/oi/IntrospectionResult{.h,-inl.h}`.
//!
//! The original hand-rolls a C++ `const_iterator` whose `operator==` is
//! documented as "hacky" — it only compares equal to `end()`. This rewrite
//! resolves that open question (§9) by implementing the standard
//! [`Iterator`] trait instead: `Item = Result<Element>`, `None` once the
//! instruction stack is drained, and iteration stops (returns `None`
//! thereafter) the first time a decode error occurs, matching "decoder
//! errors terminate the iterator" (§7).

use std::cell::Cell;
use std::rc::Rc;

use oi_errors::Result;
use oi_result::Element;

use crate::inst::{Field, Inst};
use crate::parsed_data::ParsedData;

pub struct IntrospectionResult {
    buf: Vec<u8>,
    root: Rc<Field>,
}

impl IntrospectionResult {
    pub fn new(buf: Vec<u8>, root: Rc<Field>) -> Self {
        IntrospectionResult { buf, root }
    }

    pub fn iter(&self) -> DecodeIter<'_> {
        DecodeIter {
            data: &self.buf,
            cursor: Rc::new(Cell::new(0)),
            stack: vec![Inst::Field(self.root.clone())],
            type_path: Vec::new(),
            poisoned: false,
        }
    }
}

impl<'a> IntoIterator for &'a IntrospectionResult {
    type Item = Result<Element>;
    type IntoIter = DecodeIter<'a>;

    fn into_iter(self) -> DecodeIter<'a> {
        self.iter()
    }
}

pub struct DecodeIter<'a> {
    data: &'a [u8],
    /// Shared, not copied, into every `ParsedData::parse` call for this
    /// iterator: a `Pair`/`List`/`Sum`'s `Lazy` children are forced by
    /// processors *after* `parse` returns, and must advance the same
    /// position the next field's `parse` call reads from.
    cursor: Rc<Cell<usize>>,
    stack: Vec<Inst>,
    type_path: Vec<String>,
    poisoned: bool,
}

impl<'a> Iterator for DecodeIter<'a> {
    type Item = Result<Element>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.poisoned {
            return None;
        }
        loop {
            let inst = self.stack.pop()?;
            match inst {
                Inst::PopTypePath => {
                    self.type_path.pop();
                    continue;
                }
                Inst::Repeat(n, field) => {
                    for _ in 0..n {
                        self.stack.push(Inst::Field(field.clone()));
                    }
                    continue;
                }
                Inst::Field(field) => {
                    self.type_path.push(field.name.clone());
                    self.stack.push(Inst::PopTypePath);

                    let mut element = Element {
                        name: field.name.clone(),
                        type_path: self.type_path.clone(),
                        type_names: field.type_names.clone(),
                        static_size: field.static_size,
                        exclusive_size: field.exclusive_size,
                        pointer: None,
                        data: None,
                        container_stats: None,
                        is_set_stats: None,
                        is_primitive: field.is_primitive,
                    };

                    let mut scheduled = Vec::new();
                    for (ty, processor) in &field.processors {
                        let parsed = match ParsedData::parse(self.data, &self.cursor, ty.clone()) {
                            Ok(parsed) => parsed,
                            Err(e) => {
                                self.poisoned = true;
                                self.stack.clear();
                                return Some(Err(e));
                            }
                        };
                        processor(&mut element, &mut |inst| scheduled.push(inst), parsed);
                    }
                    // This field's own nested fields are pushed after the
                    // processor-scheduled work, so on a LIFO stack they pop
                    // (and so run) before it.
                    for inst in scheduled.into_iter().rev() {
                        self.stack.push(inst);
                    }
                    for child in field.fields.iter().rev() {
                        self.stack.push(Inst::Field(child.clone()));
                    }

                    return Some(Ok(element));
                }
            }
        }
    }
}

/// Drain a [`DecodeIter`] into a `Vec<Element>`, the input `oi_result`'s
/// `SizedResult` post-processor expects, short-circuiting on the first
/// decode error.
pub fn collect_elements(iter: DecodeIter<'_>) -> Result<Vec<Element>> {
    iter.collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, reason = "tests may panic")]
    use super::*;
    use oi_result::{ContainerStats, Data};
    use oi_wire::WireType;

    fn scalar_processor(element: &mut Element, _push: &mut dyn FnMut(Inst), parsed: ParsedData<'_>) {
        if let ParsedData::VarInt { value } = parsed {
            element.data = Some(Data::Scalar(value));
        }
    }

    fn list_processor(element: &mut Element, push: &mut dyn FnMut(Inst), parsed: ParsedData<'_>) {
        let ParsedData::Pair { first, second } = parsed else {
            panic!("list processor expects Pair(len, cap)");
        };
        let ParsedData::VarInt { value: length } = first.force().unwrap() else {
            panic!("expected VarInt length");
        };
        let ParsedData::VarInt { value: capacity } = second.force().unwrap() else {
            panic!("expected VarInt capacity");
        };
        element.container_stats = Some(ContainerStats { length, capacity });
        let int_field = Rc::new(Field::leaf(4, "[]", true));
        push(Inst::Repeat(length, int_field));
    }

    #[test]
    fn single_scalar_field() {
        let n_field = Rc::new(Field {
            processors: vec![(WireType::VarInt, scalar_processor as _)],
            ..Field::leaf(4, "n", true)
        });
        let mut bytes = Vec::new();
        oi_wire::encode(42, &mut bytes);
        let result = IntrospectionResult::new(bytes, n_field);
        let elements: Vec<Element> = collect_elements(result.iter()).unwrap();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].type_path, vec!["n"]);
        assert_eq!(elements[0].data, Some(Data::Scalar(42)));
    }

    #[test]
    fn vector_like_field_expands_into_repeated_elements() {
        // Mirrors S4: a vector<int> with len=3, capacity=3, [7, 8, 9].
        let v_field = Rc::new(Field {
            processors: vec![(
                WireType::pair(WireType::VarInt, WireType::VarInt),
                list_processor as _,
            )],
            ..Field::leaf(24, "v", false)
        });
        let mut bytes = Vec::new();
        oi_wire::encode(3, &mut bytes); // length
        oi_wire::encode(3, &mut bytes); // capacity
        for v in [7u64, 8, 9] {
            oi_wire::encode(v, &mut bytes);
        }
        let result = IntrospectionResult::new(bytes, v_field);
        let elements: Vec<Element> = collect_elements(result.iter()).unwrap();

        assert_eq!(elements[0].type_path, vec!["v"]);
        assert_eq!(
            elements[0].container_stats,
            Some(ContainerStats {
                length: 3,
                capacity: 3
            })
        );
        // The 3 repeated `[]` elements follow, each nested under "v".
        assert_eq!(elements.len(), 4);
        for el in &elements[1..] {
            assert_eq!(el.type_path, vec!["v", "[]"]);
        }
    }

    #[test]
    fn sibling_field_continues_from_where_a_forced_list_left_off() {
        // `{ vector<int> v; int x; }`: `v`'s processor only sees its own
        // Pair(len, cap) `Lazy`s and the repeated element `Lazy`s it
        // schedules; forcing every one of those must still leave the
        // shared cursor exactly where `x`'s processor reads next.
        fn list_processor_reading_elements(
            element: &mut Element,
            push: &mut dyn FnMut(Inst),
            parsed: ParsedData<'_>,
        ) {
            let ParsedData::Pair { first, second } = parsed else {
                panic!("list processor expects Pair(len, cap)");
            };
            let ParsedData::VarInt { value: length } = first.force().unwrap() else {
                panic!("expected VarInt length");
            };
            let ParsedData::VarInt { value: capacity } = second.force().unwrap() else {
                panic!("expected VarInt capacity");
            };
            element.container_stats = Some(ContainerStats { length, capacity });
            let int_field = Rc::new(Field {
                processors: vec![(WireType::VarInt, scalar_processor as _)],
                ..Field::leaf(4, "[]", true)
            });
            push(Inst::Repeat(length, int_field));
        }

        let v_field = Rc::new(Field {
            processors: vec![(
                WireType::pair(WireType::VarInt, WireType::VarInt),
                list_processor_reading_elements as _,
            )],
            ..Field::leaf(24, "v", false)
        });
        let x_field = Rc::new(Field {
            processors: vec![(WireType::VarInt, scalar_processor as _)],
            ..Field::leaf(4, "x", true)
        });
        let root = Rc::new(Field {
            fields: vec![v_field, x_field],
            ..Field::leaf(0, "root", false)
        });

        let mut bytes = Vec::new();
        oi_wire::encode(3, &mut bytes); // length
        oi_wire::encode(3, &mut bytes); // capacity
        for v in [7u64, 8, 9] {
            oi_wire::encode(v, &mut bytes);
        }
        oi_wire::encode(99, &mut bytes); // x

        let result = IntrospectionResult::new(bytes, root);
        let elements: Vec<Element> = collect_elements(result.iter()).unwrap();

        let list_elements: Vec<u64> = elements
            .iter()
            .filter(|e| e.name == "[]")
            .map(|e| match e.data {
                Some(Data::Scalar(v)) => v,
                _ => panic!("expected a scalar"),
            })
            .collect();
        assert_eq!(list_elements, vec![7, 8, 9]);

        let x_elem = elements.iter().find(|e| e.name == "x").expect("x present");
        assert_eq!(x_elem.data, Some(Data::Scalar(99)));
    }

    #[test]
    fn decode_error_terminates_iteration() {
        let field = Rc::new(Field {
            processors: vec![(WireType::VarInt, scalar_processor as _)],
            ..Field::leaf(4, "n", true)
        });
        // Empty buffer: parsing the VarInt fails with TruncatedVarInt.
        let result = IntrospectionResult::new(Vec::new(), field);
        let mut iter = result.iter();
        assert!(iter.next().unwrap().is_err());
        assert!(iter.next().is_none());
    }

    #[test]
    fn preorder_is_deterministic_across_runs() {
        let child = Rc::new(Field::leaf(1, "c", true));
        let parent = Rc::new(Field {
            fields: vec![child],
            ..Field::leaf(1, "p", false)
        });
        let result = IntrospectionResult::new(Vec::new(), parent);
        let first: Vec<Vec<String>> = collect_elements(result.iter())
            .unwrap()
            .into_iter()
            .map(|e| e.type_path)
            .collect();
        let second: Vec<Vec<String>> = collect_elements(result.iter())
            .unwrap()
            .into_iter()
            .map(|e| e.type_path)
            .collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![vec!["p".to_string()], vec!["p".to_string(), "c".to_string()]]);
    }
}
