//! Element types that stress different parts of a sort implementation.

use std::cmp::Ordering;
use std::ffi::c_char;
use std::fmt;
use std::mem::ManuallyDrop;
use std::slice;
use std::str;

/// Owned string with a C compatible layout and a non-trivial destructor.
///
/// Catches sort implementations that duplicate or lose elements, which shows up as double free or
/// leak, also across the C entry points which move it as plain bytes.
#[repr(C)]
pub struct FfiString {
    data: *mut c_char,
    len: usize,
    capacity: usize,
}

impl FfiString {
    pub fn new(val: String) -> Self {
        let mut val = ManuallyDrop::new(val);

        Self {
            data: val.as_mut_ptr().cast::<c_char>(),
            len: val.len(),
            capacity: val.capacity(),
        }
    }

    pub fn as_str(&self) -> &str {
        // SAFETY: `data`, `len` and `capacity` come from a `String` owned by `self`.
        unsafe { str::from_utf8_unchecked(slice::from_raw_parts(self.data.cast::<u8>(), self.len)) }
    }
}

impl PartialEq for FfiString {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for FfiString {}

impl PartialOrd for FfiString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FfiString {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl fmt::Debug for FfiString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl Clone for FfiString {
    fn clone(&self) -> Self {
        Self::new(self.as_str().to_owned())
    }
}

impl Drop for FfiString {
    fn drop(&mut self) {
        // SAFETY: Reassembles the `String` taken apart in `new`, exactly once.
        drop(unsafe { String::from_raw_parts(self.data.cast::<u8>(), self.len, self.capacity) });
    }
}

/// Large element, exchanges dominate the cost of sorting it.
#[repr(C)]
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct OneKiloByte {
    values: [i64; 128],
}

impl OneKiloByte {
    pub fn new(val: i32) -> Self {
        let mut values = [0i64; 128];
        for (i, elem) in values.iter_mut().enumerate() {
            *elem = val as i64 + i as i64;
        }

        Self { values }
    }

    fn key(&self) -> i64 {
        self.values[3] + self.values[64] + self.values[127]
    }
}

impl PartialOrd for OneKiloByte {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OneKiloByte {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// 16 byte value with a comparison that costs a division per side.
#[repr(C)]
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct F128 {
    x: f64,
    y: f64,
}

impl F128 {
    pub fn new(val: i32) -> Self {
        let val_f = (val as f64) + (i32::MAX as f64) + 10.0;

        let x = val_f + 0.1;
        let y = val_f.log(4.1);

        assert!(y < x);
        assert!(x.is_normal() && y.is_normal());

        Self { x, y }
    }

    fn ratio(&self) -> f64 {
        self.x / self.y
    }
}

// Only ever holds normal values, see `new`.
impl Eq for F128 {}

impl PartialOrd for F128 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for F128 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ratio().total_cmp(&other.ratio())
    }
}
