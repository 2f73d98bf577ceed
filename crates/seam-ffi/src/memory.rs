//! Memory management utilities for the boundary
//!
//! Strings cross the boundary as NUL-terminated byte sequences. A string
//! returned to the host transfers ownership, and the holder releases it
//! through [`seam_string_free`], the dedicated string-reclaim path, never
//! a buffer-reclaim entry point. This module also owns the thread-local
//! last-error channel that carries failure detail alongside status codes.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;

use crate::types::SeamStatus;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Record the last error message for the current thread
pub fn set_last_error<S: Into<String>>(err: S) {
    let message = CString::new(err.into())
        .unwrap_or_else(|_| CString::new("error message contained a NUL byte").unwrap());
    LAST_ERROR.with(|slot| {
        *slot.borrow_mut() = Some(message);
    });
}

/// Clear the last error message for the current thread
pub fn clear_last_error() {
    LAST_ERROR.with(|slot| {
        *slot.borrow_mut() = None;
    });
}

/// Allocate a NUL-terminated string for return to the host.
///
/// Returns null (with the last error set) if the text contains an interior
/// NUL; the caller maps that to [`SeamStatus::MemoryError`].
pub fn allocate_string(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(c_string) => c_string.into_raw(),
        Err(_) => {
            set_last_error("string contains an interior NUL byte");
            ptr::null_mut()
        }
    }
}

/// Read a host-supplied C string into an owned Rust string
///
/// # Safety
/// `s` must be null or a valid NUL-terminated C string.
pub unsafe fn c_str_to_string(s: *const c_char) -> Result<String, SeamStatus> {
    if s.is_null() {
        set_last_error("string argument is null");
        return Err(SeamStatus::NullPointer);
    }

    match CStr::from_ptr(s).to_str() {
        Ok(text) => Ok(text.to_string()),
        Err(_) => {
            set_last_error("input string is not valid UTF-8");
            Err(SeamStatus::Utf8Error)
        }
    }
}

/// Release a string allocated by this library.
///
/// `len` and `cap` are the allocation geometry recorded when the string was
/// produced; boundary strings are canonically `CString` allocations, so the
/// pointer alone identifies the allocation and the geometry arguments exist
/// for symmetry with the typed-array reclaim entry points. Must be called
/// exactly once per returned string, and never with a pointer from any
/// other source.
///
/// # Safety
/// `ptr` must be null or a pointer previously returned by a Seam entry
/// point that transfers string ownership.
#[no_mangle]
pub unsafe extern "C" fn seam_string_free(ptr: *mut c_char, _len: usize, _cap: usize) {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        if ptr.is_null() {
            return;
        }
        drop(CString::from_raw(ptr));
    }));
    if outcome.is_err() {
        log::error!("panic while reclaiming a boundary string");
    }
}

/// Get the last error message for the current thread.
///
/// Returns null when no error is recorded. The pointer is owned by the
/// library and must NOT be freed; it stays valid until the next failing
/// call on this thread.
#[no_mangle]
pub extern "C" fn seam_last_error_message() -> *const c_char {
    LAST_ERROR.with(|slot| match &*slot.borrow() {
        Some(message) => message.as_ptr(),
        None => ptr::null(),
    })
}

/// Clear the last error message
#[no_mangle]
pub extern "C" fn seam_clear_last_error() {
    clear_last_error();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_error_channel() {
        set_last_error("probe failure");
        let message = seam_last_error_message();
        assert!(!message.is_null());
        let text = unsafe { CStr::from_ptr(message) }.to_str().unwrap();
        assert_eq!(text, "probe failure");

        seam_clear_last_error();
        assert!(seam_last_error_message().is_null());
    }

    #[test]
    fn test_string_allocation_round_trip() {
        let s = allocate_string("hello, host");
        assert!(!s.is_null());

        let text = unsafe { CStr::from_ptr(s) }.to_str().unwrap();
        assert_eq!(text, "hello, host");
        let len = text.len() + 1;

        unsafe { seam_string_free(s, len, len) };
    }

    #[test]
    fn test_interior_nul_is_rejected() {
        let s = allocate_string("bad\0text");
        assert!(s.is_null());
        assert!(!seam_last_error_message().is_null());
        clear_last_error();
    }

    #[test]
    fn test_null_string_free_is_a_noop() {
        unsafe { seam_string_free(ptr::null_mut(), 0, 0) };
    }

    #[test]
    fn test_null_intake() {
        let err = unsafe { c_str_to_string(ptr::null()) }.unwrap_err();
        assert_eq!(err, SeamStatus::NullPointer);
        clear_last_error();
    }
}
