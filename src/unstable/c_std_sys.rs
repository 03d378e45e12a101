//! libc `qsort`.

use std::cmp::Ordering;
use std::ffi::{c_int, c_void};
use std::mem;

use crate::ffi_util::{rust_fn_cmp_tls, with_tls_ctx, CompareCtx};

extern "C" {
    fn qsort(
        base: *mut c_void,
        nmemb: usize,
        size: usize,
        compar: unsafe extern "C" fn(*const c_void, *const c_void) -> c_int,
    );
}

sort_impl!("c_std_sys_unstable");

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
    if mem::size_of::<T>() == 0 || v.len() < 2 {
        return;
    }

    let mut ctx = CompareCtx::<T, F>::new(compare);

    // SAFETY: `v` is exclusively borrowed for the call, the trampoline only runs inside
    // `with_tls_ctx` with the matching context.
    with_tls_ctx(ctx.as_void_ptr(), || unsafe {
        qsort(
            v.as_mut_ptr().cast::<c_void>(),
            v.len(),
            mem::size_of::<T>(),
            rust_fn_cmp_tls::<T, F>,
        );
    });

    ctx.finish();
}
