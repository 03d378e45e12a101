//! Runs the suite against the standard library unstable sort, the baseline every other
//! implementation is compared with.

use std::cmp::Ordering;

use sort_test_tools::{instantiate_sort_tests, Sort};

struct StdUnstable;

impl Sort for StdUnstable {
    fn name() -> String {
        "rust_std_unstable".into()
    }

    fn sort<T>(arr: &mut [T])
    where
        T: Ord,
    {
        arr.sort_unstable();
    }

    fn sort_by<T, F>(arr: &mut [T], compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        arr.sort_unstable_by(compare);
    }
}

instantiate_sort_tests!(StdUnstable);

/// Reverses instead of sorting, every ordering check of the suite must reject it.
struct Reversing;

impl Sort for Reversing {
    fn name() -> String {
        "reversing_unstable".into()
    }

    fn sort<T>(arr: &mut [T])
    where
        T: Ord,
    {
        arr.reverse();
    }

    fn sort_by<T, F>(arr: &mut [T], _compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        arr.reverse();
    }
}

#[test]
#[should_panic]
fn reversing_fails_random() {
    sort_test_tools::tests::random::<Reversing>();
}

#[test]
#[should_panic]
fn reversing_fails_sort_vs_sort_by() {
    sort_test_tools::tests::sort_vs_sort_by::<Reversing>();
}
