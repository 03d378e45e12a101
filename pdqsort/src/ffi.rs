//! C entry points.
//!
//! Both return `0` on success or a negative errno value, see [`SortError::errno`].

use std::ffi::{c_int, c_void};

use crate::{sort_in_place_raw, SortError};

/// `bool is_less(const void *a, const void *b, void *ctx)`
pub type IsLessFn = unsafe extern "C" fn(*const c_void, *const c_void, *mut c_void) -> bool;

/// `int cmp(const void *a, const void *b)`, as taken by `qsort`.
pub type CompareFn = unsafe extern "C" fn(*const c_void, *const c_void) -> c_int;

/// Sorts `count` elements of `size` bytes at `base` with a strict "orders before" predicate.
///
/// `ctx` is passed through to every `is_less` call.
///
/// # Safety
///
/// Same as [`sort_in_place_raw`]. `is_less` must not unwind.
#[no_mangle]
pub unsafe extern "C" fn pdqsort_sort_in_place(
    base: *mut c_void,
    count: usize,
    size: usize,
    is_less: Option<IsLessFn>,
    ctx: *mut c_void,
) -> c_int {
    let Some(is_less) = is_less else {
        return SortError::NullPredicate.errno();
    };

    // SAFETY: See function safety comment.
    let result = unsafe {
        sort_in_place_raw(base.cast::<u8>(), count, size, |a, b| {
            is_less(a.cast::<c_void>(), b.cast::<c_void>(), ctx)
        })
    };

    to_errno(result)
}

/// Sorts `count` elements of `size` bytes at `base` with a `qsort` style three-way comparator.
///
/// Only negative comparator results count as "orders before".
///
/// # Safety
///
/// Same as [`sort_in_place_raw`]. `cmp` must not unwind.
#[no_mangle]
pub unsafe extern "C" fn pdqsort_sort_in_place_cmp(
    base: *mut c_void,
    count: usize,
    size: usize,
    cmp: Option<CompareFn>,
) -> c_int {
    let Some(cmp) = cmp else {
        return SortError::NullPredicate.errno();
    };

    // SAFETY: See function safety comment.
    let result = unsafe {
        sort_in_place_raw(base.cast::<u8>(), count, size, |a, b| {
            cmp(a.cast::<c_void>(), b.cast::<c_void>()) < 0
        })
    };

    to_errno(result)
}

fn to_errno(result: Result<(), SortError>) -> c_int {
    match result {
        Ok(()) => 0,
        Err(err) => err.errno(),
    }
}
