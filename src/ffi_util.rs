#![allow(dead_code)] // Dependent on optional features.

use std::any::Any;
use std::cell::Cell;
use std::cmp::Ordering;
use std::ffi::{c_int, c_void};
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

/// Rust comparison function handed to C through a `void *` context.
///
/// C code cannot be unwound through, a panic of the comparison function is caught and stored.
/// Every later call answers `Equal` so the C side finishes quickly, [`CompareCtx::finish`] then
/// resumes the panic.
pub(crate) struct CompareCtx<T, F> {
    compare: F,
    panic: Option<Box<dyn Any + Send + 'static>>,
    _marker: PhantomData<fn(&T, &T)>,
}

impl<T, F> CompareCtx<T, F>
where
    F: FnMut(&T, &T) -> Ordering,
{
    pub(crate) fn new(compare: F) -> Self {
        Self {
            compare,
            panic: None,
            _marker: PhantomData,
        }
    }

    /// # Safety
    ///
    /// `a` and `b` must point to valid values of `T`.
    unsafe fn compare(&mut self, a: *const c_void, b: *const c_void) -> Ordering {
        if self.panic.is_some() {
            return Ordering::Equal;
        }

        // SAFETY: See function safety comment.
        let (a, b) = unsafe { (&*a.cast::<T>(), &*b.cast::<T>()) };

        match panic::catch_unwind(AssertUnwindSafe(|| (self.compare)(a, b))) {
            Ok(ord) => ord,
            Err(err) => {
                self.panic = Some(err);
                Ordering::Equal
            }
        }
    }

    pub(crate) fn as_void_ptr(&mut self) -> *mut c_void {
        (self as *mut Self).cast::<c_void>()
    }

    /// Resumes a panic of the comparison function, if there was one.
    pub(crate) fn finish(self) {
        if let Some(err) = self.panic {
            panic::resume_unwind(err);
        }
    }
}

/// `is_less` with context, as taken by `pdqsort_sort_in_place`.
///
/// # Safety
///
/// `ctx` must point to a live `CompareCtx<T, F>`, `a` and `b` to valid values of `T`.
pub(crate) unsafe extern "C" fn rust_fn_is_less<T, F>(
    a: *const c_void,
    b: *const c_void,
    ctx: *mut c_void,
) -> bool
where
    F: FnMut(&T, &T) -> Ordering,
{
    // SAFETY: See function safety comment.
    unsafe { (*ctx.cast::<CompareCtx<T, F>>()).compare(a, b) == Ordering::Less }
}

thread_local! {
    static CMP_CTX: Cell<*mut c_void> = Cell::new(ptr::null_mut());
}

/// Runs `f` with `ctx` reachable from [`rust_fn_cmp_tls`], for C functions that take a comparison
/// function without context.
pub(crate) fn with_tls_ctx<R>(ctx: *mut c_void, f: impl FnOnce() -> R) -> R {
    let prev = CMP_CTX.with(|cell| cell.replace(ctx));
    let ret = f();
    CMP_CTX.with(|cell| cell.set(prev));

    ret
}

/// Three-way comparison without context, as taken by `qsort`.
///
/// # Safety
///
/// Must only be called inside [`with_tls_ctx`] with a `CompareCtx<T, F>` context.
pub(crate) unsafe extern "C" fn rust_fn_cmp_tls<T, F>(a: *const c_void, b: *const c_void) -> c_int
where
    F: FnMut(&T, &T) -> Ordering,
{
    let ctx = CMP_CTX.with(|cell| cell.get());

    // SAFETY: See function safety comment.
    match unsafe { (*ctx.cast::<CompareCtx<T, F>>()).compare(a, b) } {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}
