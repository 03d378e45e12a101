//! Insertion sorts used as base cases and as the sortedness probe of the driver.
//!
//! All variants sift by exchanging neighbors, so a panicking predicate leaves the range a
//! permutation of its input.

use crate::exchange::ElemLayout;
use crate::Ctx;

/// The partial probe gives up once elements were shifted by more than this many positions in
/// total.
pub(crate) const PARTIAL_INSERTION_SORT_LIMIT: usize = 8;

/// Sorts `[begin, end)`. Sifts stop at `begin`.
///
/// # Safety
///
/// `[begin, end)` must be a range of the buffer `cx` was built for.
pub(crate) unsafe fn insertion_sort<L, F>(cx: &mut Ctx<'_, L, F>, begin: *mut u8, end: *mut u8)
where
    L: ElemLayout,
    F: FnMut(*const u8, *const u8) -> bool,
{
    if begin == end {
        return;
    }

    // SAFETY: All pointers stay within `[begin, end)`, see function safety comment.
    unsafe {
        let mut cur = cx.add(begin, 1);
        while cur < end {
            let mut sift = cur;
            while sift != begin {
                let prev = cx.sub(sift, 1);
                if !cx.less(sift, prev) {
                    break;
                }
                cx.swap(sift, prev);
                sift = prev;
            }

            cur = cx.add(cur, 1);
        }
    }
}

/// Sorts `[begin, end)` without checking the left range boundary while sifting.
///
/// # Safety
///
/// `[begin, end)` must be a range of the buffer `cx` was built for, and `begin` must not be the
/// first element of that buffer. The element directly left of `begin` must not order after any
/// element of `[begin, end)`, it stops every sift before it crosses `begin`.
///
/// If the predicate is not a strict weak ordering the sentinel can be crossed. Sifts then still
/// stop at the first element of the buffer, so nothing outside the buffer is touched.
pub(crate) unsafe fn unguarded_insertion_sort<L, F>(
    cx: &mut Ctx<'_, L, F>,
    begin: *mut u8,
    end: *mut u8,
) where
    L: ElemLayout,
    F: FnMut(*const u8, *const u8) -> bool,
{
    debug_assert!(begin != cx.floor());

    if begin == end {
        return;
    }

    // SAFETY: Sifts move within `[floor, end)`, see function safety comment.
    unsafe {
        let floor = cx.floor();
        let mut cur = cx.add(begin, 1);
        while cur < end {
            let mut sift = cur;
            while sift != floor {
                let prev = cx.sub(sift, 1);
                if !cx.less(sift, prev) {
                    break;
                }
                cx.swap(sift, prev);
                sift = prev;
            }

            cur = cx.add(cur, 1);
        }
    }
}

/// Attempts to sort `[begin, end)` with a bounded amount of work.
///
/// Returns `true` if the range is sorted. Returns `false` as soon as more than
/// [`PARTIAL_INSERTION_SORT_LIMIT`] positions were shifted in total, the range is then a
/// permutation of its input.
///
/// # Safety
///
/// `[begin, end)` must be a range of the buffer `cx` was built for.
pub(crate) unsafe fn partial_insertion_sort<L, F>(
    cx: &mut Ctx<'_, L, F>,
    begin: *mut u8,
    end: *mut u8,
) -> bool
where
    L: ElemLayout,
    F: FnMut(*const u8, *const u8) -> bool,
{
    if begin == end {
        return true;
    }

    let mut limit = 0;

    // SAFETY: All pointers stay within `[begin, end)`, see function safety comment.
    unsafe {
        let mut cur = cx.add(begin, 1);
        while cur < end {
            let mut sift = cur;
            while sift != begin {
                let prev = cx.sub(sift, 1);
                if !cx.less(sift, prev) {
                    break;
                }
                cx.swap(sift, prev);
                sift = prev;
            }

            limit += cx.len(sift, cur);
            if limit > PARTIAL_INSERTION_SORT_LIMIT {
                return false;
            }

            cur = cx.add(cur, 1);
        }
    }

    true
}
