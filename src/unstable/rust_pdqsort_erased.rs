//! The engine through its raw type-erased entry, with the element type only known as a size.

use std::cmp::Ordering;
use std::mem;

sort_impl!("rust_pdqsort_erased_unstable");

#[inline]
pub fn sort<T>(v: &mut [T])
where
    T: Ord,
{
    sort_by(v, T::cmp);
}

#[inline]
pub fn sort_by<T, F>(v: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    // Scratch copies handed to the comparison function are only aligned to 16.
    assert!(mem::align_of::<T>() <= 16, "Type alignment not supported");

    if mem::size_of::<T>() == 0 {
        return;
    }

    let len = v.len();
    let base = v.as_mut_ptr().cast::<u8>();

    // SAFETY: `base` points to `len` exclusively borrowed elements of `T`. The engine only passes
    // pointers to those elements or to a sufficiently aligned bitwise copy of one.
    let result = unsafe {
        pdqsort::sort_in_place_raw(base, len, mem::size_of::<T>(), |a, b| {
            compare(&*a.cast::<T>(), &*b.cast::<T>()) == Ordering::Less
        })
    };

    if let Err(err) = result {
        panic!("Type-erased sort failed: {err}");
    }
}
