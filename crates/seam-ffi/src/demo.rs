//! Demonstration entry points
//!
//! One entry point per shape the boundary supports: exact-width scalars,
//! 0/1 booleans, strings, typed buffers in both directions, opaque struct
//! payloads, callback bundles, and a no-return call. The logic behind them
//! lives in `seam_core::demo`; this module only marshals.

use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;

use seam_core::codec::{self, JsonCodec};
use seam_core::demo::{self, DemoRecord};

use crate::array::{SeamI16Array, SeamI32Array, SeamI64Array, SeamI8Array, SeamU32Array, SeamU8Array};
use crate::callback::{HostCallback, SeamCallback};
use crate::error::{map_core_error, validate_mut_ptr, validate_ptr};
use crate::ffi_boundary;
use crate::memory::{allocate_string, c_str_to_string, clear_last_error};
use crate::types::{bool_to_c, c_to_bool, SeamStatus};

macro_rules! demo_add {
    ($(#[$attr:meta])* $fn_name:ident, $ty:ty) => {
        $(#[$attr])*
        #[no_mangle]
        pub extern "C" fn $fn_name(left: $ty, right: $ty) -> $ty {
            left.wrapping_add(right)
        }
    };
}

demo_add!(
    /// Wrapping 8-bit signed addition
    seam_demo_add_i8, i8
);
demo_add!(
    /// Wrapping 8-bit unsigned addition
    seam_demo_add_u8, u8
);
demo_add!(
    /// Wrapping 16-bit signed addition
    seam_demo_add_i16, i16
);
demo_add!(
    /// Wrapping 16-bit unsigned addition
    seam_demo_add_u16, u16
);
demo_add!(
    /// Wrapping 32-bit signed addition
    seam_demo_add_i32, i32
);
demo_add!(
    /// Wrapping 32-bit unsigned addition
    seam_demo_add_u32, u32
);
demo_add!(
    /// Wrapping 64-bit signed addition
    seam_demo_add_i64, i64
);
demo_add!(
    /// Wrapping 64-bit unsigned addition
    seam_demo_add_u64, u64
);

/// Exclusive-or of two 0/1 booleans
#[no_mangle]
pub extern "C" fn seam_demo_xor_bool(left: i32, right: i32) -> i32 {
    bool_to_c(demo::xor(c_to_bool(left), c_to_bool(right)))
}

/// Concatenate two strings.
///
/// Both arguments are borrowed for the call. The returned string transfers
/// to the caller, who must release it with `seam_string_free`; null is
/// returned on invalid input, with detail in the last-error message.
///
/// # Safety
/// `left` and `right` must be null or valid NUL-terminated C strings.
#[no_mangle]
pub unsafe extern "C" fn seam_demo_concat(
    left: *const c_char,
    right: *const c_char,
) -> *mut c_char {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let left = match c_str_to_string(left) {
            Ok(text) => text,
            Err(_) => return ptr::null_mut(),
        };
        let right = match c_str_to_string(right) {
            Ok(text) => text,
            Err(_) => return ptr::null_mut(),
        };
        allocate_string(&demo::concat(&left, &right))
    }));
    outcome.unwrap_or(ptr::null_mut())
}

macro_rules! demo_sum {
    ($(#[$attr:meta])* $fn_name:ident, $array:ty) => {
        $(#[$attr])*
        #[no_mangle]
        pub unsafe extern "C" fn $fn_name(values: $array) -> i64 {
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                let values = values.consume();
                demo::sum(&values)
            }));
            outcome.unwrap_or(0)
        }
    };
}

demo_sum!(
    /// Sum an 8-bit signed buffer; consumes the buffer
    ///
    /// # Safety
    /// `values` must describe a live buffer per its type's contract.
    seam_demo_sum_i8, SeamI8Array
);
demo_sum!(
    /// Sum a 16-bit signed buffer; consumes the buffer
    ///
    /// # Safety
    /// `values` must describe a live buffer per its type's contract.
    seam_demo_sum_i16, SeamI16Array
);
demo_sum!(
    /// Sum a 32-bit signed buffer; consumes the buffer
    ///
    /// # Safety
    /// `values` must describe a live buffer per its type's contract.
    seam_demo_sum_i32, SeamI32Array
);
demo_sum!(
    /// Sum a 64-bit signed buffer; consumes the buffer
    ///
    /// # Safety
    /// `values` must describe a live buffer per its type's contract.
    seam_demo_sum_i64, SeamI64Array
);

/// Double every byte; consumes the input, returns a fresh buffer.
///
/// # Safety
/// `values` must describe a live buffer per its type's contract.
#[no_mangle]
pub unsafe extern "C" fn seam_demo_double_u8(values: SeamU8Array) -> SeamU8Array {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let values = values.consume();
        SeamU8Array::from(demo::double_u8(&values))
    }));
    outcome.unwrap_or_else(|_| SeamU8Array::from(Vec::new()))
}

/// Double every element; consumes the input, returns a fresh buffer.
///
/// # Safety
/// `values` must describe a live buffer per its type's contract.
#[no_mangle]
pub unsafe extern "C" fn seam_demo_double_i32(values: SeamI32Array) -> SeamI32Array {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let values = values.consume();
        SeamI32Array::from(demo::double_i32(&values))
    }));
    outcome.unwrap_or_else(|_| SeamI32Array::from(Vec::new()))
}

/// The sequence 0..count as a fresh buffer
#[no_mangle]
pub extern "C" fn seam_demo_sequence_u32(count: u32) -> SeamU32Array {
    let outcome = catch_unwind(|| SeamU32Array::from(demo::sequence_u32(count)));
    outcome.unwrap_or_else(|_| SeamU32Array::from(Vec::new()))
}

/// Build the sample record as an opaque payload.
///
/// The returned payload transfers to the caller; release it with
/// `seam_string_free`.
#[no_mangle]
pub extern "C" fn seam_demo_make_record() -> *mut c_char {
    let outcome = catch_unwind(|| match codec::encode(&JsonCodec, &demo::make_record()) {
        Ok(payload) => allocate_string(&payload),
        Err(error) => {
            map_core_error(&error);
            ptr::null_mut()
        }
    });
    outcome.unwrap_or(ptr::null_mut())
}

/// Decode a record payload and write its integer summary.
///
/// A malformed payload is a recoverable failure: the call returns
/// `DecodeError` and the process continues.
///
/// # Safety
/// `payload` must be null or a valid NUL-terminated C string;
/// `out_total` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn seam_demo_record_total(
    payload: *const c_char,
    out_total: *mut i64,
) -> SeamStatus {
    ffi_boundary!({
        clear_last_error();
        validate_ptr(payload, "payload")?;
        validate_mut_ptr(out_total, "out_total")?;

        let payload = c_str_to_string(payload)?;
        let record: DemoRecord =
            codec::decode(&JsonCodec, &payload).map_err(|e| map_core_error(&e))?;

        *out_total = demo::record_total(&record);
        Ok(SeamStatus::Ok)
    })
}

/// Decode a vector-of-records payload and return a copy of it.
///
/// The output payload transfers to the caller; release it with
/// `seam_string_free`.
///
/// # Safety
/// `payload` must be null or a valid NUL-terminated C string;
/// `out_payload` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn seam_demo_clone_records(
    payload: *const c_char,
    out_payload: *mut *mut c_char,
) -> SeamStatus {
    ffi_boundary!({
        clear_last_error();
        validate_ptr(payload, "payload")?;
        validate_mut_ptr(out_payload, "out_payload")?;

        let payload = c_str_to_string(payload)?;
        let records: Vec<DemoRecord> =
            codec::decode(&JsonCodec, &payload).map_err(|e| map_core_error(&e))?;
        let cloned = codec::encode(&JsonCodec, &records).map_err(|e| map_core_error(&e))?;

        *out_payload = allocate_string(&cloned);
        if (*out_payload).is_null() {
            return Err(SeamStatus::MemoryError);
        }
        Ok(SeamStatus::Ok)
    })
}

/// Drive every slot of a host callback bundle and write the checksum.
///
/// The bundle is retained only for the duration of the call; its release
/// slot fires exactly once before this function returns, including on
/// failure.
///
/// # Safety
/// Every function pointer in `callback` must be invocable with the
/// declared shapes; `out_checksum` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn seam_demo_drive_callback(
    callback: SeamCallback,
    out_checksum: *mut i64,
) -> SeamStatus {
    ffi_boundary!({
        clear_last_error();
        let callback = HostCallback::new(callback);
        validate_mut_ptr(out_checksum, "out_checksum")?;

        *out_checksum = demo::drive_callback(&callback);
        Ok(SeamStatus::Ok)
    })
}

/// No arguments, no return; the smallest possible boundary crossing
#[no_mangle]
pub extern "C" fn seam_demo_noop() {}
