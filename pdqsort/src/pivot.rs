use crate::exchange::ElemLayout;
use crate::Ctx;

/// Ranges longer than this pick the pivot as pseudo-median of nine instead of median of three.
pub(crate) const NINTHER_THRESHOLD: usize = 128;

/// Exchanges `a` and `b` if `b` orders before `a`.
///
/// # Safety
///
/// `a` and `b` must be distinct elements of the buffer `cx` was built for.
#[inline(always)]
unsafe fn sort2<L, F>(cx: &mut Ctx<'_, L, F>, a: *mut u8, b: *mut u8)
where
    L: ElemLayout,
    F: FnMut(*const u8, *const u8) -> bool,
{
    // SAFETY: See function safety comment.
    unsafe {
        if cx.less(b, a) {
            cx.swap(a, b);
        }
    }
}

/// Orders `a`, `b` and `c` so that `b` holds their median.
///
/// # Safety
///
/// `a`, `b` and `c` must be distinct elements of the buffer `cx` was built for.
#[inline(always)]
unsafe fn sort3<L, F>(cx: &mut Ctx<'_, L, F>, a: *mut u8, b: *mut u8, c: *mut u8)
where
    L: ElemLayout,
    F: FnMut(*const u8, *const u8) -> bool,
{
    // SAFETY: See function safety comment.
    unsafe {
        sort2(cx, a, b);
        sort2(cx, b, c);
        sort2(cx, a, b);
    }
}

/// Moves a pivot candidate to `begin`.
///
/// The candidate is the median of the first, middle and last element, or for ranges longer than
/// [`NINTHER_THRESHOLD`] the median of three such medians taken around those positions.
///
/// # Safety
///
/// `[begin, end)` must be a range of the buffer `cx` was built for, holding at least
/// [`INSERTION_SORT_THRESHOLD`](crate::quicksort::INSERTION_SORT_THRESHOLD) elements.
pub(crate) unsafe fn choose_pivot<L, F>(cx: &mut Ctx<'_, L, F>, begin: *mut u8, end: *mut u8)
where
    L: ElemLayout,
    F: FnMut(*const u8, *const u8) -> bool,
{
    let len = cx.len(begin, end);
    debug_assert!(len >= crate::quicksort::INSERTION_SORT_THRESHOLD);

    // SAFETY: `len >= 24`, so the middle is at least 12 elements away from both ends and all
    // positions below are distinct elements of the range.
    unsafe {
        let mid = cx.add(begin, len / 2);
        let last = cx.sub(end, 1);

        if len > NINTHER_THRESHOLD {
            let (begin_1, begin_2) = (cx.add(begin, 1), cx.add(begin, 2));
            let (mid_prev, mid_next) = (cx.sub(mid, 1), cx.add(mid, 1));
            let (last_1, last_2) = (cx.sub(last, 1), cx.sub(last, 2));

            // Four order-three sorts: three across the range, one across their medians.
            sort3(cx, begin, mid, last);
            sort3(cx, begin_1, mid_prev, last_1);
            sort3(cx, begin_2, mid_next, last_2);
            sort3(cx, mid_prev, mid, mid_next);
        } else {
            sort3(cx, begin, mid, last);
        }

        cx.swap(begin, mid);
    }
}
