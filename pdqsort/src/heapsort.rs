use crate::exchange::{ElemLayout, ScratchSlot};
use crate::Ctx;

/// Sorts `[begin, end)` with heapsort, *O*(*n* \* log(*n*)) worst-case.
///
/// The heap is built by sifting down with exchanges. Elements are then extracted with Floyd's
/// bottom-up method, the displaced last element is held in a scratch slot while a hole walks
/// down to a leaf and the element is sifted back up from there.
///
/// Fails only if the scratch slot cannot be obtained, the range is then untouched.
///
/// # Safety
///
/// `[begin, end)` must be a range of the buffer `cx` was built for.
pub(crate) unsafe fn heapsort<L, F>(
    cx: &mut Ctx<'_, L, F>,
    begin: *mut u8,
    end: *mut u8,
) -> Result<(), L::Error>
where
    L: ElemLayout,
    F: FnMut(*const u8, *const u8) -> bool,
{
    let len = cx.len(begin, end);
    if len < 2 {
        return Ok(());
    }

    let mut scratch = cx.layout().scratch()?;
    let tmp = scratch.as_mut_ptr();

    // SAFETY: All indices passed below are in `0..len`, see function safety comment.
    unsafe {
        for node in (0..(len / 2)).rev() {
            sift_down(cx, begin, node, len);
        }

        for heap_len in (1..len).rev() {
            pop_max(cx, begin, heap_len, tmp);
        }
    }

    Ok(())
}

/// Restores the heap property `parent >= child` for the subtree rooted at `node` in the heap
/// `v[..heap_len]`.
///
/// # Safety
///
/// `node < heap_len` and `v[..heap_len]` are elements of the buffer `cx` was built for.
unsafe fn sift_down<L, F>(cx: &mut Ctx<'_, L, F>, v: *mut u8, mut node: usize, heap_len: usize)
where
    L: ElemLayout,
    F: FnMut(*const u8, *const u8) -> bool,
{
    // SAFETY: `child < heap_len` is checked before every access.
    unsafe {
        loop {
            let mut child = 2 * node + 1;
            if child >= heap_len {
                break;
            }

            // Choose the greater child.
            if child + 1 < heap_len && cx.less(cx.add(v, child), cx.add(v, child + 1)) {
                child += 1;
            }

            let node_ptr = cx.add(v, node);
            let child_ptr = cx.add(v, child);
            if !cx.less(node_ptr, child_ptr) {
                break;
            }

            cx.swap(node_ptr, child_ptr);
            node = child;
        }
    }
}

/// Moves the maximum of the heap `v[..=heap_len]` to `v[heap_len]` and restores the heap
/// property for `v[..heap_len]`.
///
/// # Safety
///
/// `heap_len >= 1`, `v[..=heap_len]` are elements of the buffer `cx` was built for and form a
/// heap, `tmp` is a scratch slot for one element.
unsafe fn pop_max<L, F>(cx: &mut Ctx<'_, L, F>, v: *mut u8, heap_len: usize, tmp: *mut u8)
where
    L: ElemLayout,
    F: FnMut(*const u8, *const u8) -> bool,
{
    let layout = cx.layout();

    // SAFETY: The element at `hole.dest` is always a stale copy, its value lives elsewhere. The
    // guard fills it from `tmp` when this function returns or a comparison panics, which keeps
    // the range a permutation of its input.
    unsafe {
        let last = cx.add(v, heap_len);
        layout.copy(last, tmp);
        layout.copy(v, last);

        let mut hole = Hole {
            src: tmp,
            dest: v,
            layout,
        };
        let mut hole_idx = 0;

        // Walk the hole down to a leaf along the greater children, without looking at `tmp`.
        loop {
            let mut child = 2 * hole_idx + 1;
            if child >= heap_len {
                break;
            }

            if child + 1 < heap_len && cx.less(cx.add(v, child), cx.add(v, child + 1)) {
                child += 1;
            }

            let child_ptr = cx.add(v, child);
            layout.copy(child_ptr, hole.dest);
            hole.dest = child_ptr;
            hole_idx = child;
        }

        // Sift the displaced element back up.
        while hole_idx > 0 {
            let parent = (hole_idx - 1) / 2;
            let parent_ptr = cx.add(v, parent);
            if !cx.less(parent_ptr, tmp) {
                break;
            }

            layout.copy(parent_ptr, hole.dest);
            hole.dest = parent_ptr;
            hole_idx = parent;
        }

        // `hole` goes out of scope and writes `tmp` into its final position.
    }
}

/// When dropped, copies from `src` into `dest`.
struct Hole<L: ElemLayout> {
    src: *const u8,
    dest: *mut u8,
    layout: L,
}

impl<L: ElemLayout> Drop for Hole<L> {
    fn drop(&mut self) {
        // SAFETY: `src` is the scratch slot and `dest` an element of the buffer.
        unsafe {
            self.layout.copy(self.src, self.dest);
        }
    }
}
