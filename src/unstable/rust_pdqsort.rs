use std::cmp::Ordering;

sort_impl!("rust_pdqsort_unstable");

#[inline]
pub fn sort<T>(v: &mut [T])
where
    T: Ord,
{
    pdqsort::sort(v);
}

#[inline]
pub fn sort_by<T, F>(v: &mut [T], compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    pdqsort::sort_by(v, compare);
}
