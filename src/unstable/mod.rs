pub mod rust_heapsort;
pub mod rust_pdqsort;
pub mod rust_pdqsort_c_abi;
pub mod rust_pdqsort_erased;
pub mod rust_std;

// Call libc qsort via FFI.
#[cfg(feature = "c_std_sys")]
pub mod c_std_sys;
