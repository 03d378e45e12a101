//! The C entry points, called the way a C caller would.

use std::ffi::{c_int, c_void};
use std::ptr;

use pdqsort::ffi::{pdqsort_sort_in_place, pdqsort_sort_in_place_cmp};

use sort_test_tools::patterns;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Record {
    key: u32,
    tag: u32,
    payload: [u64; 3],
}

unsafe extern "C" fn record_less(a: *const c_void, b: *const c_void, ctx: *mut c_void) -> bool {
    // SAFETY: Only called with pointers to records and the call counter as context.
    unsafe {
        *ctx.cast::<u64>() += 1;
        (*a.cast::<Record>()).key < (*b.cast::<Record>()).key
    }
}

unsafe extern "C" fn i64_cmp(a: *const c_void, b: *const c_void) -> c_int {
    // SAFETY: Only called with pointers to `i64`.
    let (a, b) = unsafe { (*a.cast::<i64>(), *b.cast::<i64>()) };

    // Deliberately a three-way result, positive values must not count as "orders before".
    (a > b) as c_int - (a < b) as c_int
}

fn records(len: usize) -> Vec<Record> {
    patterns::random_uniform(len, 0..50)
        .into_iter()
        .enumerate()
        .map(|(i, key)| Record {
            key: key as u32,
            tag: i as u32,
            payload: [key as u64; 3],
        })
        .collect()
}

#[test]
fn sorts_records_with_context() {
    for len in [0, 1, 2, 20, 24, 100, 1_000, 5_000] {
        let original = records(len);
        let mut v = original.clone();
        let mut calls = 0u64;

        // SAFETY: `v` holds `len` records, `calls` outlives the call.
        let ret = unsafe {
            pdqsort_sort_in_place(
                v.as_mut_ptr().cast::<c_void>(),
                v.len(),
                std::mem::size_of::<Record>(),
                Some(record_less),
                ptr::addr_of_mut!(calls).cast::<c_void>(),
            )
        };

        assert_eq!(ret, 0);
        assert!(v.windows(2).all(|w| w[0].key <= w[1].key));
        assert!(v.iter().all(|r| r.payload == [r.key as u64; 3]));

        let mut tags = v.iter().map(|r| r.tag).collect::<Vec<_>>();
        tags.sort_unstable();
        assert!(tags.iter().copied().eq(0..len as u32));

        if len >= 2 {
            assert!(calls > 0);
        }
    }
}

#[test]
fn comparator_entry() {
    let original = patterns::random(2_000)
        .into_iter()
        .map(|val| val as i64 * 3)
        .collect::<Vec<_>>();
    let mut v = original.clone();

    // SAFETY: `v` holds `v.len()` elements of `i64`.
    let ret = unsafe {
        pdqsort_sort_in_place_cmp(v.as_mut_ptr().cast::<c_void>(), v.len(), 8, Some(i64_cmp))
    };

    let mut expected = original;
    expected.sort_unstable();

    assert_eq!(ret, 0);
    assert_eq!(v, expected);
}

#[test]
fn invalid_arguments() {
    let mut v = [3i64, 1, 2];
    let base = v.as_mut_ptr().cast::<c_void>();

    // SAFETY: Every call is rejected before the buffer is touched.
    unsafe {
        assert_eq!(pdqsort_sort_in_place(base, 3, 8, None, ptr::null_mut()), -22);
        assert_eq!(pdqsort_sort_in_place_cmp(base, 3, 8, None), -22);
        assert_eq!(pdqsort_sort_in_place_cmp(base, 3, 0, Some(i64_cmp)), -22);
        assert_eq!(pdqsort_sort_in_place_cmp(ptr::null_mut(), 3, 8, Some(i64_cmp)), -22);
        assert_eq!(pdqsort_sort_in_place_cmp(ptr::null_mut(), 0, 8, Some(i64_cmp)), 0);
    }

    assert_eq!(v, [3, 1, 2]);
}
