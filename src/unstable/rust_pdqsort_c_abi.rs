//! The engine through its C entry point, the way a C caller sees it.

use std::cmp::Ordering;
use std::ffi::c_void;
use std::mem;
use std::ptr;

use crate::ffi_util::{rust_fn_is_less, CompareCtx};

sort_impl!("rust_pdqsort_c_abi_unstable");

#[inline]
pub fn sort<T>(v: &mut [T])
where
    T: Ord,
{
    sort_by(v, T::cmp);
}

pub fn sort_by<T, F>(v: &mut [T], compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    assert!(mem::align_of::<T>() <= 16, "Type alignment not supported");

    if mem::size_of::<T>() == 0 {
        return;
    }

    let len = v.len();
    let base: *mut c_void = if len == 0 {
        ptr::null_mut()
    } else {
        v.as_mut_ptr().cast()
    };
    let mut ctx = CompareCtx::<T, F>::new(compare);

    // SAFETY: `base` points to `len` exclusively borrowed elements of `T`, or is null for an empty
    // slice. `ctx` outlives the call and matches the trampoline's type parameters.
    let ret_code = unsafe {
        pdqsort::ffi::pdqsort_sort_in_place(
            base,
            len,
            mem::size_of::<T>(),
            Some(rust_fn_is_less::<T, F>),
            ctx.as_void_ptr(),
        )
    };

    ctx.finish();

    if ret_code != 0 {
        panic!("pdqsort_sort_in_place failed with {ret_code}");
    }
}
