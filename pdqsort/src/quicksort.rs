use crate::exchange::ElemLayout;
use crate::heapsort::heapsort;
use crate::insertion::{insertion_sort, partial_insertion_sort, unguarded_insertion_sort};
use crate::partition::{partition_left, partition_right};
use crate::pivot::{choose_pivot, NINTHER_THRESHOLD};
use crate::Ctx;

/// Ranges shorter than this are finished with insertion sort.
pub(crate) const INSERTION_SORT_THRESHOLD: usize = 24;

/// Sorts `[begin, end)` with pattern-defeating quicksort.
///
/// `depth` is the number of highly unbalanced partitions the range may still see before it is
/// handed to heapsort. `leftmost` is false if the element directly left of `begin` belongs to
/// the buffer and does not order after any element of the range.
///
/// # Safety
///
/// `[begin, end)` must be a range of the buffer `cx` was built for, `depth` must be at least one
/// and `leftmost` must be true when `begin` is the first element of the buffer.
pub(crate) unsafe fn quicksort<L, F>(
    cx: &mut Ctx<'_, L, F>,
    mut begin: *mut u8,
    end: *mut u8,
    mut depth: u32,
    mut leftmost: bool,
) -> Result<(), L::Error>
where
    L: ElemLayout,
    F: FnMut(*const u8, *const u8) -> bool,
{
    debug_assert!(depth >= 1);
    debug_assert!(leftmost || begin != cx.floor());

    loop {
        let len = cx.len(begin, end);

        // SAFETY: Every sub-range below lies within `[begin, end)`. The sentinel of an unguarded
        // sort is the pivot of an earlier partition, which does not order after the range.
        unsafe {
            if len < INSERTION_SORT_THRESHOLD {
                if leftmost {
                    insertion_sort(cx, begin, end);
                } else {
                    unguarded_insertion_sort(cx, begin, end);
                }
                return Ok(());
            }

            choose_pivot(cx, begin, end);

            // If the element left of the range does not order before the pivot, no element of the
            // range orders before it either. Group the elements equal to the pivot and skip them.
            if !leftmost && !cx.less(cx.sub(begin, 1), begin) {
                let pivot_pos = partition_left(cx, begin, end);
                cx.stats_mut().partitions_left += 1;
                begin = cx.add(pivot_pos, 1);
                continue;
            }

            let (pivot_pos, already_partitioned) = partition_right(cx, begin, end);
            let stats = cx.stats_mut();
            stats.partitions_right += 1;
            stats.already_partitioned += already_partitioned as u64;

            let after_pivot = cx.add(pivot_pos, 1);
            let l_len = cx.len(begin, pivot_pos);
            let r_len = cx.len(after_pivot, end);
            let highly_unbalanced = l_len < len / 8 || r_len < len / 8;

            if highly_unbalanced {
                cx.stats_mut().unbalanced_partitions += 1;

                depth -= 1;
                if depth == 0 {
                    cx.stats_mut().heapsort_fallbacks += 1;
                    return heapsort(cx, begin, end);
                }

                if l_len >= INSERTION_SORT_THRESHOLD {
                    break_patterns(cx, begin, pivot_pos, l_len);
                }
                if r_len >= INSERTION_SORT_THRESHOLD {
                    break_patterns(cx, after_pivot, end, r_len);
                }
            } else if already_partitioned
                && partial_insertion_sort(cx, begin, pivot_pos)
                && partial_insertion_sort(cx, after_pivot, end)
            {
                cx.stats_mut().partial_insertion_sorts += 1;
                return Ok(());
            }

            // Recurse into the left side and loop on the right side, whose left neighbor is now the
            // pivot.
            quicksort(cx, begin, pivot_pos, depth, leftmost)?;
            begin = after_pivot;
            leftmost = false;
        }
    }
}

/// Exchanges a few fixed elements near both ends of `[begin, end)` to break up patterns that
/// made the last partition unbalanced.
///
/// # Safety
///
/// `[begin, end)` must be a range of `len >= INSERTION_SORT_THRESHOLD` elements of the buffer
/// `cx` was built for.
#[cold]
unsafe fn break_patterns<L, F>(cx: &mut Ctx<'_, L, F>, begin: *mut u8, end: *mut u8, len: usize)
where
    L: ElemLayout,
    F: FnMut(*const u8, *const u8) -> bool,
{
    debug_assert!(len >= INSERTION_SORT_THRESHOLD);

    let quarter = len / 4;
    cx.stats_mut().pattern_breaks += 1;

    // SAFETY: `quarter >= 6`, so every pair below names two distinct elements of the range.
    unsafe {
        let pairs = [
            (cx.add(begin, 0), cx.add(begin, quarter)),
            (cx.sub(end, 1), cx.sub(end, quarter)),
        ];
        for (a, b) in pairs {
            cx.swap(a, b);
        }

        if len > NINTHER_THRESHOLD {
            let pairs = [
                (cx.add(begin, 1), cx.add(begin, quarter + 1)),
                (cx.add(begin, 2), cx.add(begin, quarter + 2)),
                (cx.sub(end, 2), cx.sub(end, quarter + 1)),
                (cx.sub(end, 3), cx.sub(end, quarter + 2)),
            ];
            for (a, b) in pairs {
                cx.swap(a, b);
            }
        }
    }
}
