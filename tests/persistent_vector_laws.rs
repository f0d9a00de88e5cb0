//! Property-based tests for `PersistentVector` laws.
//!
//! Verifies the algebraic laws of the persistent contract with proptest:
//! identities between construction paths, immutability of inputs, and
//! agreement between every linearization the crate offers.

use persistent_vector::{PersistentVector, Reduction, Step};
use proptest::prelude::*;

proptest! {
    /// Build-then-read identity: appending `0..n` yields a vector where
    /// every index reads back its own value.
    #[test]
    fn prop_build_then_read_identity(size in 0usize..300) {
        let mut vector = PersistentVector::new();
        for value in 0..size {
            vector = vector.push_back(value);
        }

        prop_assert_eq!(vector.len(), size);
        for index in 0..size {
            prop_assert_eq!(vector.get(index), Some(&index));
        }
    }

    /// Construction-path equality: building `m` elements and removing
    /// `m - n` equals building `n` elements directly.
    #[test]
    fn prop_shrink_equals_fresh_build(sizes in (0usize..200, 0usize..200)) {
        let (low, high) = if sizes.0 <= sizes.1 { sizes } else { (sizes.1, sizes.0) };

        let mut shrunk: PersistentVector<usize> = (0..high).collect();
        for _ in 0..(high - low) {
            shrunk = shrunk.remove_last().unwrap();
        }

        let fresh: PersistentVector<usize> = (0..low).collect();
        prop_assert_eq!(shrunk, fresh);
    }

    /// Set-then-get: the written slot reads back the new value and every
    /// other slot is untouched.
    #[test]
    fn prop_set_then_get(
        elements in prop::collection::vec(any::<i32>(), 1..120),
        selector: usize,
        new_value: i32,
    ) {
        let vector: PersistentVector<i32> = elements.iter().copied().collect();
        let index = selector % vector.len();

        let updated = vector.set(index, new_value).unwrap();
        prop_assert_eq!(updated.get(index), Some(&new_value));
        for other in 0..vector.len() {
            if other != index {
                prop_assert_eq!(updated.get(other), vector.get(other));
            }
        }
    }

    /// Immutability: push_back, set, and remove_last leave the receiver
    /// observably unchanged.
    #[test]
    fn prop_mutations_never_touch_the_input(
        elements in prop::collection::vec(any::<i32>(), 1..120),
        new_value: i32,
    ) {
        let vector: PersistentVector<i32> = elements.iter().copied().collect();

        let _pushed = vector.push_back(new_value);
        let _updated = vector.set(elements.len() / 2, new_value).unwrap();
        let _shrunk = vector.remove_last().unwrap();

        prop_assert_eq!(vector.len(), elements.len());
        for (index, expected) in elements.iter().enumerate() {
            prop_assert_eq!(vector.get(index), Some(expected));
        }
    }

    /// Round-trip: remove_last(push_back(v, x)) == v.
    #[test]
    fn prop_push_then_pop_is_identity(
        elements in prop::collection::vec(any::<i32>(), 0..120),
        new_value: i32,
    ) {
        let vector: PersistentVector<i32> = elements.iter().copied().collect();
        let (round_tripped, popped) = vector.push_back(new_value).pop_back().unwrap();

        prop_assert_eq!(popped, new_value);
        prop_assert_eq!(round_tripped, vector);
    }

    /// Boundary write: set at index == len() is exactly append.
    #[test]
    fn prop_set_at_count_is_append(
        elements in prop::collection::vec(any::<i32>(), 0..120),
        new_value: i32,
    ) {
        let vector: PersistentVector<i32> = elements.iter().copied().collect();

        let via_set = vector.set(vector.len(), new_value).unwrap();
        let via_push = vector.push_back(new_value);
        prop_assert_eq!(via_set, via_push);
    }

    /// Linearization agreement: iter, to_list, and a reduce-built list all
    /// yield the elements in ascending index order.
    #[test]
    fn prop_every_linearization_agrees(
        elements in prop::collection::vec(any::<i32>(), 0..200),
    ) {
        let vector: PersistentVector<i32> = elements.iter().copied().collect();

        let iterated: Vec<i32> = vector.iter().copied().collect();
        let listed = vector.to_list();
        let reduced = vector
            .reduce(Step::Continue(Vec::new()), |mut list, element| {
                list.push(*element);
                Step::Continue(list)
            })
            .into_accumulator();

        prop_assert_eq!(&iterated, &elements);
        prop_assert_eq!(&listed, &elements);
        prop_assert_eq!(&reduced, &elements);
    }

    /// Halt truncates: taking `m` elements observes exactly min(m, n)
    /// reducer calls and yields the first min(m, n) elements.
    #[test]
    fn prop_halt_truncates(
        elements in prop::collection::vec(any::<i32>(), 0..200),
        take in 0usize..250,
    ) {
        let vector: PersistentVector<i32> = elements.iter().copied().collect();
        let expected: Vec<i32> = elements.iter().copied().take(take).collect();

        let mut calls = 0usize;
        let reduction = vector.reduce(
            if take == 0 { Step::Halt(Vec::new()) } else { Step::Continue(Vec::new()) },
            |mut taken, element| {
                calls += 1;
                taken.push(*element);
                if taken.len() == take {
                    Step::Halt(taken)
                } else {
                    Step::Continue(taken)
                }
            },
        );

        let taken = reduction.into_accumulator();
        prop_assert_eq!(taken, expected);
        prop_assert_eq!(calls, take.min(elements.len()));
    }

    /// Suspension transparency: suspending after every `stride` elements
    /// and resuming yields the same fold as an uninterrupted traversal.
    #[test]
    fn prop_resumed_traversal_equals_uninterrupted(
        elements in prop::collection::vec(any::<i32>(), 0..200),
        stride in 1usize..16,
    ) {
        let vector: PersistentVector<i32> = elements.iter().copied().collect();

        let mut seen = 0usize;
        let reducer = |mut list: Vec<i32>, element: &i32| {
            list.push(*element);
            seen += 1;
            if seen % stride == 0 {
                Step::Suspend(list)
            } else {
                Step::Continue(list)
            }
        };

        let mut reduction = vector.reduce(Step::Continue(Vec::new()), reducer);
        let collected = loop {
            match reduction {
                Reduction::Suspended(list, resume) => {
                    reduction = resume.resume(Step::Continue(list));
                }
                Reduction::Done(list) | Reduction::Halted(list) => break list,
            }
        };

        prop_assert_eq!(collected, elements);
    }
}
