//! The fallback of the engine on its own.

use std::cmp::Ordering;

sort_impl!("rust_heapsort_unstable");

#[inline]
pub fn sort<T>(v: &mut [T])
where
    T: Ord,
{
    pdqsort::heapsort(v, |a, b| a.lt(b));
}

#[inline]
pub fn sort_by<T, F>(v: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    pdqsort::heapsort(v, |a, b| compare(a, b) == Ordering::Less);
}
