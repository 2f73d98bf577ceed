//! Typed buffer handles
//!
//! A vector crosses the boundary as a `repr(C)` value carrying pointer,
//! length, capacity, and the reclaim function bound to that specific
//! allocation. Allocations of different origin must be freed by the code
//! that created them, so the reclaim path travels inside the value rather
//! than through a side-channel global free function: the consumer copies
//! the elements out and immediately routes the exact recorded geometry
//! back through the embedded function pointer.
//!
//! Each element type also gets a process-wide reclaim entry point, so any
//! holder of a Seam-allocated buffer can release it. A buffer is freed
//! exactly once; the pointer may be null only when the length is zero, and
//! zero-length buffers reclaim as a no-op.

use std::panic::{catch_unwind, AssertUnwindSafe};

macro_rules! typed_array {
    ($(#[$attr:meta])* $name:ident, $elem:ty, $free_fn:ident) => {
        $(#[$attr])*
        #[repr(C)]
        #[derive(Clone)]
        pub struct $name {
            /// First element; null only when `len` is 0
            pub ptr: *const $elem,
            /// Element count
            pub len: usize,
            /// Allocation capacity in elements; may exceed `len`
            pub cap: usize,
            /// Reclaim function bound to this allocation's origin
            pub free_fn: extern "C" fn(*mut $elem, usize, usize),
        }

        impl From<Vec<$elem>> for $name {
            /// Capture a vector's exact allocation geometry for transfer.
            fn from(v: Vec<$elem>) -> Self {
                let mut v = std::mem::ManuallyDrop::new(v);
                $name {
                    ptr: v.as_mut_ptr(),
                    len: v.len(),
                    cap: v.capacity(),
                    free_fn: $free_fn,
                }
            }
        }

        impl $name {
            /// Borrow the elements without taking ownership.
            ///
            /// # Safety
            /// `ptr` must point to `len` live elements (or be null with
            /// `len == 0`), and the buffer must not be reclaimed while the
            /// slice is in use.
            pub unsafe fn as_slice(&self) -> &[$elem] {
                if self.ptr.is_null() || self.len == 0 {
                    &[]
                } else {
                    std::slice::from_raw_parts(self.ptr, self.len)
                }
            }

            /// Copy the elements out, then release the buffer through its
            /// embedded reclaim function. This is the canonical intake path
            /// for a buffer the other side handed over.
            ///
            /// # Safety
            /// Same requirements as [`Self::as_slice`], and the handle must
            /// not have been consumed or reclaimed before.
            pub unsafe fn consume(self) -> Vec<$elem> {
                let values = self.as_slice().to_vec();
                self.reclaim();
                values
            }

            /// Release the buffer through its embedded reclaim function,
            /// passing back the exact recorded length and capacity.
            pub fn reclaim(self) {
                (self.free_fn)(self.ptr as *mut $elem, self.len, self.cap);
            }
        }

        /// Process-wide reclaim entry point for buffers of this element
        /// type allocated by this library. Takes the exact pointer, length,
        /// and capacity recorded at creation; anything else is undefined.
        /// Null-tolerant; must be called at most once per allocation.
        #[no_mangle]
        pub extern "C" fn $free_fn(ptr: *mut $elem, len: usize, cap: usize) {
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                if ptr.is_null() {
                    return;
                }
                unsafe { drop(Vec::from_raw_parts(ptr, len, cap)) };
            }));
            if outcome.is_err() {
                log::error!(
                    "panic while reclaiming a {} buffer",
                    stringify!($elem)
                );
            }
        }
    };
}

typed_array!(
    /// Contiguous `i8` elements handed across the boundary
    SeamI8Array, i8, seam_i8_array_free
);
typed_array!(
    /// Contiguous `u8` elements handed across the boundary
    SeamU8Array, u8, seam_u8_array_free
);
typed_array!(
    /// Contiguous `i16` elements handed across the boundary
    SeamI16Array, i16, seam_i16_array_free
);
typed_array!(
    /// Contiguous `u16` elements handed across the boundary
    SeamU16Array, u16, seam_u16_array_free
);
typed_array!(
    /// Contiguous `i32` elements handed across the boundary
    SeamI32Array, i32, seam_i32_array_free
);
typed_array!(
    /// Contiguous `u32` elements handed across the boundary
    SeamU32Array, u32, seam_u32_array_free
);
typed_array!(
    /// Contiguous `i64` elements handed across the boundary
    SeamI64Array, i64, seam_i64_array_free
);
typed_array!(
    /// Contiguous `u64` elements handed across the boundary
    SeamU64Array, u64, seam_u64_array_free
);
typed_array!(
    /// Contiguous `f32` elements handed across the boundary
    SeamF32Array, f32, seam_f32_array_free
);
typed_array!(
    /// Contiguous `f64` elements handed across the boundary
    SeamF64Array, f64, seam_f64_array_free
);
