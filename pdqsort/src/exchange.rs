//! Element exchange and element layouts.
//!
//! The engine never sees element types, it moves elements through an [`ElemLayout`]. Typed
//! callers get a layout per `T`, type-erased callers get one with a runtime element size and an
//! exchange kind picked from the buffer alignment.

use std::alloc;
use std::convert::Infallible;
use std::marker::PhantomData;
use std::mem::{self, MaybeUninit};
use std::ptr::{self, NonNull};

use crate::SortError;

/// Alignment of the type-erased scratch slot. Elements handed out from the scratch slot must be
/// at least as aligned as any element of the buffer can be.
const SCRATCH_ALIGN: usize = 16;

/// Unit used to exchange two type-erased elements.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SwapKind {
    /// Exchange in 64-bit words. Element size is a multiple of 8, the base is `u64` aligned.
    Words64,
    /// Exchange in 32-bit words. Element size is a multiple of 4, the base is `u32` aligned.
    Words32,
    /// Exchange byte by byte. Always correct.
    Bytes,
}

impl SwapKind {
    /// Picks the widest unit every element address `base + k * size` is aligned to.
    pub fn select(base: *const u8, size: usize) -> Self {
        let addr = base as usize;

        if size % 8 == 0 && addr % mem::align_of::<u64>() == 0 {
            SwapKind::Words64
        } else if size % 4 == 0 && addr % mem::align_of::<u32>() == 0 {
            SwapKind::Words32
        } else {
            SwapKind::Bytes
        }
    }

    /// Exchanges the `size` bytes at `a` with the `size` bytes at `b`.
    ///
    /// # Safety
    ///
    /// `a` and `b` must be valid for reads and writes of `size` bytes, must not overlap and must
    /// satisfy the size and alignment requirements of `self`, see [`SwapKind::select`].
    #[inline(always)]
    pub unsafe fn swap(self, a: *mut u8, b: *mut u8, size: usize) {
        // SAFETY: See function safety comment.
        unsafe {
            match self {
                SwapKind::Words64 => swap_words_64(a, b, size),
                SwapKind::Words32 => swap_words_32(a, b, size),
                SwapKind::Bytes => swap_bytes(a, b, size),
            }
        }
    }
}

/// # Safety
///
/// `n` is a non-zero multiple of 8, `a` and `b` are `u64` aligned and valid for `n` bytes.
#[inline(always)]
unsafe fn swap_words_64(a: *mut u8, b: *mut u8, mut n: usize) {
    // Walk from the back, this keeps the loop condition a single compare against zero.
    loop {
        n -= 8;
        // SAFETY: `n` stays a multiple of 8 below the original `n`, see function safety comment.
        unsafe {
            let a_word = a.add(n).cast::<u64>();
            let b_word = b.add(n).cast::<u64>();
            let tmp = a_word.read();
            a_word.write(b_word.read());
            b_word.write(tmp);
        }
        if n == 0 {
            break;
        }
    }
}

/// # Safety
///
/// `n` is a non-zero multiple of 4, `a` and `b` are `u32` aligned and valid for `n` bytes.
#[inline(always)]
unsafe fn swap_words_32(a: *mut u8, b: *mut u8, mut n: usize) {
    loop {
        n -= 4;
        // SAFETY: `n` stays a multiple of 4 below the original `n`, see function safety comment.
        unsafe {
            let a_word = a.add(n).cast::<u32>();
            let b_word = b.add(n).cast::<u32>();
            let tmp = a_word.read();
            a_word.write(b_word.read());
            b_word.write(tmp);
        }
        if n == 0 {
            break;
        }
    }
}

/// # Safety
///
/// `n` is non-zero, `a` and `b` are valid for `n` bytes.
#[inline(always)]
unsafe fn swap_bytes(a: *mut u8, b: *mut u8, mut n: usize) {
    loop {
        n -= 1;
        // SAFETY: `n` is below the original `n`, see function safety comment.
        unsafe {
            let tmp = a.add(n).read();
            a.add(n).write(b.add(n).read());
            b.add(n).write(tmp);
        }
        if n == 0 {
            break;
        }
    }
}

/// Storage for the one element heapsort holds outside of the buffer.
pub(crate) trait ScratchSlot {
    fn as_mut_ptr(&mut self) -> *mut u8;
}

impl<T> ScratchSlot for MaybeUninit<T> {
    fn as_mut_ptr(&mut self) -> *mut u8 {
        MaybeUninit::as_mut_ptr(self).cast::<u8>()
    }
}

/// Heap allocated scratch slot for elements whose size is only known at runtime.
pub(crate) struct ErasedScratch {
    ptr: NonNull<u8>,
    layout: alloc::Layout,
}

impl ScratchSlot for ErasedScratch {
    fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr.as_ptr()
    }
}

impl Drop for ErasedScratch {
    fn drop(&mut self) {
        // SAFETY: `ptr` was returned by `alloc::alloc` with exactly this layout.
        unsafe {
            alloc::dealloc(self.ptr.as_ptr(), self.layout);
        }
    }
}

/// Describes how the engine moves the elements of one buffer.
///
/// # Safety
///
/// `size` must be the distance in bytes between two consecutive elements and must not be zero.
/// `swap` and `copy` must move exactly one element of that size. The scratch slot must be valid
/// for reads and writes of one element and aligned like any element of the buffer.
pub(crate) unsafe trait ElemLayout: Copy {
    type Scratch: ScratchSlot;
    type Error;

    fn size(self) -> usize;

    /// # Safety
    ///
    /// `a` and `b` must point to two distinct elements of the buffer.
    unsafe fn swap(self, a: *mut u8, b: *mut u8);

    /// # Safety
    ///
    /// `src` and `dst` must each point to an element of the buffer or to the scratch slot, and
    /// must not be the same element.
    unsafe fn copy(self, src: *const u8, dst: *mut u8);

    fn scratch(self) -> Result<Self::Scratch, Self::Error>;
}

/// Layout of a buffer of `T`.
pub(crate) struct Typed<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Typed<T> {
    pub(crate) fn new() -> Self {
        debug_assert!(mem::size_of::<T>() != 0);
        Self {
            _marker: PhantomData,
        }
    }
}

// Manual impls, derive would require `T: Copy`.
impl<T> Clone for Typed<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Typed<T> {}

// SAFETY: Sizes and moves are exactly those of `T`, the scratch slot is a `MaybeUninit<T>`.
unsafe impl<T> ElemLayout for Typed<T> {
    type Scratch = MaybeUninit<T>;
    type Error = Infallible;

    #[inline(always)]
    fn size(self) -> usize {
        mem::size_of::<T>()
    }

    #[inline(always)]
    unsafe fn swap(self, a: *mut u8, b: *mut u8) {
        // SAFETY: See trait method safety comment.
        unsafe {
            ptr::swap_nonoverlapping(a.cast::<T>(), b.cast::<T>(), 1);
        }
    }

    #[inline(always)]
    unsafe fn copy(self, src: *const u8, dst: *mut u8) {
        // SAFETY: See trait method safety comment.
        unsafe {
            ptr::copy_nonoverlapping(src.cast::<T>(), dst.cast::<T>(), 1);
        }
    }

    fn scratch(self) -> Result<MaybeUninit<T>, Infallible> {
        Ok(MaybeUninit::uninit())
    }
}

/// Layout of a buffer of opaque elements with a runtime size.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Erased {
    size: usize,
    kind: SwapKind,
}

impl Erased {
    /// `size` must not be zero. `base` is the address of the first element.
    pub(crate) fn new(base: *const u8, size: usize) -> Self {
        debug_assert!(size != 0);
        Self {
            size,
            kind: SwapKind::select(base, size),
        }
    }

    #[cfg(test)]
    pub(crate) fn kind(self) -> SwapKind {
        self.kind
    }
}

// SAFETY: `size` is checked by the entry points, `kind` was selected for this buffer base and
// size, and the scratch slot is allocated with `size` bytes at `SCRATCH_ALIGN`.
unsafe impl ElemLayout for Erased {
    type Scratch = ErasedScratch;
    type Error = SortError;

    #[inline(always)]
    fn size(self) -> usize {
        self.size
    }

    #[inline(always)]
    unsafe fn swap(self, a: *mut u8, b: *mut u8) {
        // SAFETY: See trait method safety comment, `kind` matches the buffer.
        unsafe {
            self.kind.swap(a, b, self.size);
        }
    }

    #[inline(always)]
    unsafe fn copy(self, src: *const u8, dst: *mut u8) {
        // SAFETY: See trait method safety comment.
        unsafe {
            ptr::copy_nonoverlapping(src, dst, self.size);
        }
    }

    fn scratch(self) -> Result<ErasedScratch, SortError> {
        let alloc_err = SortError::ScratchAlloc { size: self.size };

        #[cfg(test)]
        if tests::FAIL_SCRATCH_ALLOC.with(|fail| fail.get()) {
            return Err(alloc_err);
        }

        let layout = alloc::Layout::from_size_align(self.size, SCRATCH_ALIGN)
            .map_err(|_| alloc_err.clone())?;

        // SAFETY: `size` is not zero, so neither is the layout.
        let ptr = unsafe { alloc::alloc(layout) };

        NonNull::new(ptr)
            .map(|ptr| ErasedScratch { ptr, layout })
            .ok_or(alloc_err)
    }
}
