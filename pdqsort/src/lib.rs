//! Pattern-defeating quicksort over typed slices and type-erased byte buffers.
//!
//! All entry points share one engine. The engine works on raw element pointers and moves
//! elements through an element layout, which is either a concrete type `T` or a runtime element
//! size for buffers whose element type is only known to the caller.

use std::cmp::Ordering;
use std::convert::Infallible;
use std::mem;
use std::slice;

mod error;
mod exchange;
pub mod ffi;
mod heapsort;
mod insertion;
mod partition;
mod pivot;
mod quicksort;
mod stats;

pub use error::SortError;
pub use exchange::SwapKind;
pub use stats::SortStats;

use exchange::{ElemLayout, Erased, Typed};

/// Sorts the slice, but might not preserve the order of equal elements.
///
/// This sort is unstable (i.e., may reorder equal elements), in-place (i.e., does not
/// allocate), and *O*(*n* \* log(*n*)) worst-case.
///
/// # Current implementation
///
/// The algorithm is [pattern-defeating quicksort][pdqsort] by Orson Peters. Median-of-three or
/// pseudo-median-of-nine pivots, insertion sort for short ranges, detection of already
/// partitioned ranges and of runs of equal elements, and a heapsort fallback after too many
/// unbalanced partitions.
///
/// [pdqsort]: https://github.com/orlp/pdqsort
#[inline]
pub fn sort<T>(v: &mut [T])
where
    T: Ord,
{
    sort_by_less(v, |a, b| a.lt(b));
}

/// Sorts the slice with a comparator function, but might not preserve the order of equal
/// elements.
///
/// The comparator function must define a total ordering for the elements in the slice. If the
/// ordering is not total, the order of the elements is unspecified, but the slice remains a
/// permutation of its input.
#[inline]
pub fn sort_by<T, F>(v: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    sort_by_less(v, |a, b| compare(a, b) == Ordering::Less);
}

/// Sorts the slice with a strict "orders before" predicate.
///
/// `is_less` must be a strict weak ordering. If it is not, the order of the elements is
/// unspecified. If it panics, the slice is left as a permutation of its input.
#[inline]
pub fn sort_by_less<T, F>(v: &mut [T], is_less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    sort_by_less_with_stats(v, is_less);
}

/// Same as [`sort_by_less`], and reports which paths the sort took.
pub fn sort_by_less_with_stats<T, F>(v: &mut [T], mut is_less: F) -> SortStats
where
    F: FnMut(&T, &T) -> bool,
{
    let mut stats = SortStats::default();

    // Sorting has no meaningful behavior on zero-sized types.
    if mem::size_of::<T>() == 0 || v.len() < 2 {
        return stats;
    }

    let len = v.len();
    let base = v.as_mut_ptr().cast::<u8>();
    let mut raw_less = typed_less(&mut is_less);

    // SAFETY: `base` points to `len >= 2` elements of `T` that are exclusively borrowed for the
    // duration of the call.
    let result =
        unsafe { sort_raw_parts(Typed::<T>::new(), base, len, &mut raw_less, &mut stats) };
    match result {
        Ok(()) => {}
        Err(never) => match never {},
    }

    stats
}

/// Sorts `v` using heapsort, which guarantees *O*(*n* \* log(*n*)) worst-case.
///
/// This is the fallback the quicksort switches to after too many unbalanced partitions.
pub fn heapsort<T, F>(v: &mut [T], mut is_less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    if mem::size_of::<T>() == 0 || v.len() < 2 {
        return;
    }

    let mut stats = SortStats::default();
    let layout = Typed::<T>::new();
    let len = v.len();
    let base = v.as_mut_ptr().cast::<u8>();
    let mut raw_less = typed_less(&mut is_less);

    // SAFETY: `base` points to `len` elements of `T`, which is also the end computed here.
    let result: Result<(), Infallible> = unsafe {
        let end = base.add(len * layout.size());
        let mut cx = Ctx::new(layout, &mut raw_less, &mut stats, base);
        heapsort::heapsort(&mut cx, base, end)
    };
    match result {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

/// Sorts `count` elements of `size` bytes each, stored back to back in `buffer`.
///
/// `is_less` sees each element as a byte slice of `size` bytes. Arguments are validated before
/// the buffer is touched.
///
/// # Errors
///
/// - [`SortError::ZeroElementSize`] if `size` is zero.
/// - [`SortError::BufferSizeMismatch`] if `count * size` is not `buffer.len()`.
/// - [`SortError::ScratchAlloc`] if the heapsort fallback could not allocate its one element
///   scratch slot. The buffer then holds a permutation of its input in unspecified order.
pub fn sort_in_place<F>(
    buffer: &mut [u8],
    count: usize,
    size: usize,
    is_less: F,
) -> Result<(), SortError>
where
    F: FnMut(&[u8], &[u8]) -> bool,
{
    sort_in_place_with_stats(buffer, count, size, is_less).map(|_| ())
}

/// Same as [`sort_in_place`], and reports which paths the sort took.
pub fn sort_in_place_with_stats<F>(
    buffer: &mut [u8],
    count: usize,
    size: usize,
    mut is_less: F,
) -> Result<SortStats, SortError>
where
    F: FnMut(&[u8], &[u8]) -> bool,
{
    check_buffer(buffer.len(), count, size)?;

    let mut stats = SortStats::default();
    if count < 2 {
        return Ok(stats);
    }

    let base = buffer.as_mut_ptr();
    let mut raw_less = |a: *const u8, b: *const u8| {
        // SAFETY: The engine only passes pointers to elements of `buffer` or to the scratch slot,
        // both hold `size` initialized bytes.
        unsafe { is_less(slice::from_raw_parts(a, size), slice::from_raw_parts(b, size)) }
    };

    // SAFETY: `buffer` holds exactly `count * size` bytes and is exclusively borrowed.
    unsafe {
        sort_raw_parts(Erased::new(base, size), base, count, &mut raw_less, &mut stats)?;
    }

    Ok(stats)
}

/// Sorts `count` elements of `size` bytes each, starting at `base`.
///
/// `is_less` receives pointers to two elements, either inside the buffer or to a scratch copy of
/// an element. A null `base` is accepted for an empty buffer.
///
/// # Errors
///
/// [`SortError::ZeroElementSize`], [`SortError::NullBuffer`] and [`SortError::ScratchAlloc`],
/// with the same meaning as for [`sort_in_place`].
///
/// # Safety
///
/// If `base` is not null, it must be valid for reads and writes of `count * size` bytes, that
/// product must not overflow `isize`, and nothing else may access the buffer during the call.
/// Element copies handed to `is_less` are only aligned to 16 bytes.
pub unsafe fn sort_in_place_raw<F>(
    base: *mut u8,
    count: usize,
    size: usize,
    mut is_less: F,
) -> Result<(), SortError>
where
    F: FnMut(*const u8, *const u8) -> bool,
{
    if size == 0 {
        return Err(SortError::ZeroElementSize);
    }

    if base.is_null() {
        return if count == 0 {
            Ok(())
        } else {
            Err(SortError::NullBuffer)
        };
    }

    if count < 2 {
        return Ok(());
    }

    let mut stats = SortStats::default();

    // SAFETY: See function safety comment.
    unsafe { sort_raw_parts(Erased::new(base, size), base, count, &mut is_less, &mut stats) }
}

/// Adapts a three-way comparator into a strict "orders before" predicate.
///
/// The comparator returns a negative value, zero or a positive value if `a` orders before, equal
/// to or after `b`. Only negative results count as "orders before".
pub fn three_way_less<T, F>(mut cmp: F) -> impl FnMut(&T, &T) -> bool
where
    T: ?Sized,
    F: FnMut(&T, &T) -> i32,
{
    move |a: &T, b: &T| cmp(a, b) < 0
}

// --- IMPL ---

fn check_buffer(len: usize, count: usize, size: usize) -> Result<(), SortError> {
    if size == 0 {
        return Err(SortError::ZeroElementSize);
    }

    if count.checked_mul(size) != Some(len) {
        return Err(SortError::BufferSizeMismatch { count, size, len });
    }

    Ok(())
}

fn typed_less<T, F>(is_less: &mut F) -> impl FnMut(*const u8, *const u8) -> bool + '_
where
    F: FnMut(&T, &T) -> bool,
{
    // SAFETY: The engine only passes pointers to elements of the slice or to a scratch copy of
    // one, both are properly aligned and initialized `T`.
    move |a: *const u8, b: *const u8| unsafe { is_less(&*a.cast::<T>(), &*b.cast::<T>()) }
}

/// Runs the engine over `count >= 2` elements starting at `base`.
///
/// # Safety
///
/// `base` must be valid for reads and writes of `count` elements of `layout` and exclusively
/// accessible for the duration of the call.
unsafe fn sort_raw_parts<L, F>(
    layout: L,
    base: *mut u8,
    count: usize,
    is_less: &mut F,
    stats: &mut SortStats,
) -> Result<(), L::Error>
where
    L: ElemLayout,
    F: FnMut(*const u8, *const u8) -> bool,
{
    debug_assert!(count >= 2);

    // At most this many highly unbalanced partitions before switching to heapsort.
    let depth = count.ilog2();

    // SAFETY: See function safety comment.
    unsafe {
        let end = base.add(count * layout.size());
        let mut cx = Ctx::new(layout, is_less, stats, base);
        quicksort::quicksort(&mut cx, base, end, depth, true)
    }
}

/// State shared by all engine functions of one sort call.
///
/// Pointer arithmetic is in elements of `layout`. Every comparison and exchange goes through
/// here and is counted.
pub(crate) struct Ctx<'a, L, F> {
    layout: L,
    is_less: &'a mut F,
    stats: &'a mut SortStats,
    /// First element of the whole buffer.
    floor: *mut u8,
}

impl<'a, L, F> Ctx<'a, L, F>
where
    L: ElemLayout,
    F: FnMut(*const u8, *const u8) -> bool,
{
    fn new(layout: L, is_less: &'a mut F, stats: &'a mut SortStats, floor: *mut u8) -> Self {
        Self {
            layout,
            is_less,
            stats,
            floor,
        }
    }

    #[inline(always)]
    pub(crate) fn layout(&self) -> L {
        self.layout
    }

    #[inline(always)]
    pub(crate) fn floor(&self) -> *mut u8 {
        self.floor
    }

    #[cfg(test)]
    pub(crate) fn stats(&self) -> &SortStats {
        self.stats
    }

    #[inline(always)]
    pub(crate) fn stats_mut(&mut self) -> &mut SortStats {
        self.stats
    }

    /// # Safety
    ///
    /// `a` and `b` must each point to an element of the buffer or to the scratch slot.
    #[inline(always)]
    pub(crate) unsafe fn less(&mut self, a: *const u8, b: *const u8) -> bool {
        self.stats.comparisons += 1;
        (self.is_less)(a, b)
    }

    /// # Safety
    ///
    /// `a` and `b` must point to two distinct elements of the buffer.
    #[inline(always)]
    pub(crate) unsafe fn swap(&mut self, a: *mut u8, b: *mut u8) {
        debug_assert!(a != b);
        self.stats.exchanges += 1;

        // SAFETY: See function safety comment.
        unsafe {
            self.layout.swap(a, b);
        }
    }

    /// # Safety
    ///
    /// The result must stay within the buffer or one past its end.
    #[inline(always)]
    pub(crate) unsafe fn add(&self, ptr: *mut u8, count: usize) -> *mut u8 {
        // SAFETY: See function safety comment.
        unsafe { ptr.add(count * self.layout.size()) }
    }

    /// # Safety
    ///
    /// The result must stay within the buffer.
    #[inline(always)]
    pub(crate) unsafe fn sub(&self, ptr: *mut u8, count: usize) -> *mut u8 {
        // SAFETY: See function safety comment.
        unsafe { ptr.sub(count * self.layout.size()) }
    }

    /// Number of elements in `[begin, end)`.
    #[inline(always)]
    pub(crate) fn len(&self, begin: *mut u8, end: *mut u8) -> usize {
        debug_assert!(begin <= end);
        (end as usize - begin as usize) / self.layout.size()
    }
}
