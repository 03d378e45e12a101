//! Hoare style partitioning around the element at the start of a range.
//!
//! Every scan is bounded by the opposing cursor, a predicate that is not a strict weak ordering
//! can produce a bad split but never moves a cursor out of the range.

use crate::exchange::ElemLayout;
use crate::Ctx;

/// Partitions `[begin, end)` around the pivot at `begin` into elements that order before the
/// pivot, followed by all other elements.
///
/// Returns the final position of the pivot and whether the range was already partitioned, i.e.
/// no element had to be exchanged.
///
/// # Safety
///
/// `[begin, end)` must be a non-empty range of the buffer `cx` was built for.
pub(crate) unsafe fn partition_right<L, F>(
    cx: &mut Ctx<'_, L, F>,
    begin: *mut u8,
    end: *mut u8,
) -> (*mut u8, bool)
where
    L: ElemLayout,
    F: FnMut(*const u8, *const u8) -> bool,
{
    debug_assert!(begin < end);

    let pivot = begin;

    // SAFETY: `first` and `last` stay within `[begin + 1, end]` and only elements in
    // `[first, last)` are read, see function safety comment.
    unsafe {
        let mut first = cx.add(begin, 1);
        let mut last = end;

        // Invariant: `[begin + 1, first)` orders before the pivot, `[last, end)` does not.
        while first < last && cx.less(first, pivot) {
            first = cx.add(first, 1);
        }
        while first < last && !cx.less(cx.sub(last, 1), pivot) {
            last = cx.sub(last, 1);
        }

        let already_partitioned = first >= last;

        while first < last {
            last = cx.sub(last, 1);
            if first == last {
                // Only reachable if the predicate answered differently for the same pair.
                break;
            }
            cx.swap(first, last);
            cx.stats_mut().partition_exchanges += 1;
            first = cx.add(first, 1);

            while first < last && cx.less(first, pivot) {
                first = cx.add(first, 1);
            }
            while first < last && !cx.less(cx.sub(last, 1), pivot) {
                last = cx.sub(last, 1);
            }
        }

        let pivot_pos = cx.sub(first, 1);
        if pivot_pos != begin {
            cx.swap(begin, pivot_pos);
        }

        (pivot_pos, already_partitioned)
    }
}

/// Partitions `[begin, end)` around the pivot at `begin` into elements that do not order after
/// the pivot, followed by elements that do.
///
/// Used when the range holds no element ordering before the pivot, equal elements then end up
/// on the left and are done. Returns the final position of the pivot.
///
/// # Safety
///
/// `[begin, end)` must be a non-empty range of the buffer `cx` was built for.
pub(crate) unsafe fn partition_left<L, F>(
    cx: &mut Ctx<'_, L, F>,
    begin: *mut u8,
    end: *mut u8,
) -> *mut u8
where
    L: ElemLayout,
    F: FnMut(*const u8, *const u8) -> bool,
{
    debug_assert!(begin < end);

    let pivot = begin;

    // SAFETY: Same bounds as in `partition_right`.
    unsafe {
        let mut first = cx.add(begin, 1);
        let mut last = end;

        // Invariant: `[begin + 1, first)` does not order after the pivot, `[last, end)` does.
        while first < last && cx.less(pivot, cx.sub(last, 1)) {
            last = cx.sub(last, 1);
        }
        while first < last && !cx.less(pivot, first) {
            first = cx.add(first, 1);
        }

        while first < last {
            last = cx.sub(last, 1);
            if first == last {
                break;
            }
            cx.swap(first, last);
            cx.stats_mut().partition_exchanges += 1;
            first = cx.add(first, 1);

            while first < last && cx.less(pivot, cx.sub(last, 1)) {
                last = cx.sub(last, 1);
            }
            while first < last && !cx.less(pivot, first) {
                first = cx.add(first, 1);
            }
        }

        let pivot_pos = cx.sub(first, 1);
        if pivot_pos != begin {
            cx.swap(begin, pivot_pos);
        }

        pivot_pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::tests::with_ctx;

    fn split_at_pivot(v: &[i32], pivot_idx: usize) {
        let pivot = v[pivot_idx];
        assert!(v[..pivot_idx].iter().all(|&x| x < pivot), "{v:?}");
        assert!(v[(pivot_idx + 1)..].iter().all(|&x| x >= pivot), "{v:?}");
    }

    #[test]
    fn right() {
        let mut v = [5, 9, 1, 7, 3, 5, 8, 2, 6, 0];
        let (pivot_idx, already_partitioned) = with_ctx(&mut v, |cx, begin, end| unsafe {
            let (pivot_pos, already) = partition_right(cx, begin, end);
            (cx.len(begin, pivot_pos), already)
        });
        assert!(!already_partitioned);
        assert_eq!(v[pivot_idx], 5);
        split_at_pivot(&v, pivot_idx);
    }

    #[test]
    fn right_already_partitioned() {
        let mut v = [4, 1, 3, 0, 2, 8, 6, 9, 5, 7];
        let (pivot_idx, already_partitioned, stats) = with_ctx(&mut v, |cx, begin, end| unsafe {
            let (pivot_pos, already) = partition_right(cx, begin, end);
            (cx.len(begin, pivot_pos), already, *cx.stats())
        });
        assert!(already_partitioned);
        assert_eq!(pivot_idx, 4);
        assert_eq!(stats.partition_exchanges, 0);
        assert_eq!(v, [2, 1, 3, 0, 4, 8, 6, 9, 5, 7]);
    }

    #[test]
    fn right_extreme_pivot() {
        let mut v = [0, 5, 4, 3, 2, 1];
        let pivot_idx = with_ctx(&mut v, |cx, begin, end| unsafe {
            let (pivot_pos, _) = partition_right(cx, begin, end);
            cx.len(begin, pivot_pos)
        });
        assert_eq!(pivot_idx, 0);

        let mut v = [9, 5, 4, 3, 2, 1];
        let pivot_idx = with_ctx(&mut v, |cx, begin, end| unsafe {
            let (pivot_pos, _) = partition_right(cx, begin, end);
            cx.len(begin, pivot_pos)
        });
        assert_eq!(pivot_idx, 5);
        assert_eq!(v[5], 9);
    }

    #[test]
    fn left_groups_equal() {
        let mut v = [3, 7, 3, 9, 3, 3, 4, 3, 8];
        let pivot_idx = with_ctx(&mut v, |cx, begin, end| unsafe {
            let pivot_pos = partition_left(cx, begin, end);
            cx.len(begin, pivot_pos)
        });
        assert_eq!(pivot_idx, 4);
        assert!(v[..=pivot_idx].iter().all(|&x| x == 3), "{v:?}");
        assert!(v[(pivot_idx + 1)..].iter().all(|&x| x > 3), "{v:?}");
    }

    #[test]
    fn left_all_equal() {
        let mut v = [1; 40];
        let pivot_idx = with_ctx(&mut v, |cx, begin, end| unsafe {
            let pivot_pos = partition_left(cx, begin, end);
            cx.len(begin, pivot_pos)
        });
        assert_eq!(pivot_idx, 39);
    }
}
