//! Randomized checks of `PooledList` against a `VecDeque` model.

use std::collections::VecDeque;

use pooled_list::{NodeHandle, PooledList};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

struct Model {
    list: PooledList<u32>,
    expected: VecDeque<u32>,
    handles: VecDeque<NodeHandle>,
}

impl Model {
    fn new() -> Self {
        Self {
            list: PooledList::new(),
            expected: VecDeque::new(),
            handles: VecDeque::new(),
        }
    }

    fn check(&self) {
        assert_eq!(self.list.len(), self.expected.len());
        assert_eq!(self.list.iter().count(), self.expected.len());
        assert!(self.list.iter().eq(self.expected.iter()));
        assert!(self.list.iter().rev().eq(self.expected.iter().rev()));
        let live: Vec<_> = self.list.entries().map(|(handle, _)| handle).collect();
        assert!(live.iter().eq(self.handles.iter()));
    }
}

#[test]
fn test_random_operations_match_model() {
    for seed in 0..32u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut model = Model::new();
        let mut stale = Vec::new();

        for step in 0..400u32 {
            match rng.random_range(0..7) {
                0 => {
                    model.handles.push_front(model.list.add_first(step));
                    model.expected.push_front(step);
                }
                1 => {
                    model.handles.push_back(model.list.add_last(step));
                    model.expected.push_back(step);
                }
                2 | 3 if !model.expected.is_empty() => {
                    let index = rng.random_range(0..model.expected.len());
                    let anchor = model.handles[index];
                    if rng.random_bool(0.5) {
                        let handle = model.list.add_before(anchor, step).unwrap();
                        model.handles.insert(index, handle);
                        model.expected.insert(index, step);
                    } else {
                        let handle = model.list.add_after(anchor, step).unwrap();
                        model.handles.insert(index + 1, handle);
                        model.expected.insert(index + 1, step);
                    }
                }
                4 if !model.expected.is_empty() => {
                    let index = rng.random_range(0..model.expected.len());
                    let handle = model.handles.remove(index).unwrap();
                    let value = model.expected.remove(index).unwrap();
                    assert_eq!(model.list.remove(handle), Ok(value));
                    stale.push(handle);
                }
                5 => {
                    let removed = model.list.remove_first();
                    match model.expected.pop_front() {
                        Some(value) => {
                            assert_eq!(removed, Ok(value));
                            stale.push(model.handles.pop_front().unwrap());
                        }
                        None => assert!(removed.is_err()),
                    }
                }
                6 => {
                    let removed = model.list.remove_last();
                    match model.expected.pop_back() {
                        Some(value) => {
                            assert_eq!(removed, Ok(value));
                            stale.push(model.handles.pop_back().unwrap());
                        }
                        None => assert!(removed.is_err()),
                    }
                }
                _ => {}
            }

            if let Some(&handle) = stale.last() {
                assert!(model.list.get(handle).is_err());
                assert!(!model.list.is_live(handle));
            }
            model.check();
        }

        let live = model.list.len();
        let pooled = model.list.pooled_count();
        assert_eq!(model.list.allocation_count(), live + pooled);
    }
}

#[test]
fn test_clear_then_refill_allocates_nothing() {
    let mut list: PooledList<u32> = (0..64).collect();
    let allocated = list.allocation_count();

    for round in 0..4 {
        list.clear();
        assert_eq!(list.pooled_count(), 64);
        list.extend((0..64).map(|value| value + round));
        assert_eq!(list.allocation_count(), allocated);
    }

    list.clear();
    list.extend(0..80);
    assert_eq!(list.allocation_count(), allocated + 16);
}

#[test]
fn test_round_trip_order() {
    let values: Vec<u32> = (0..100).map(|value| value * 3).collect();
    let list: PooledList<u32> = values.iter().copied().collect();

    assert!(list.iter().eq(values.iter()));
    assert!(list.iter().rev().eq(values.iter().rev()));
}
