//! Host callback bundles
//!
//! A callback object registered by the host crosses the boundary as a
//! `repr(C)` bundle of function pointers plus the opaque index of the
//! host-side instance. The boundary has no shared type system, so there is
//! no generic "invoke": each (argument-shape, return-shape) pair is its own
//! typed slot, and every slot receives `index` as its first argument so the
//! host can route the call to the right instance.
//!
//! [`HostCallback`] wraps a bundle as a Rust trait object. It retains the
//! bundle only while native code can still call it; dropping the wrapper
//! invokes the bundle's release slot exactly once, after which no slot is
//! ever invoked again.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use seam_core::codec::{self, JsonCodec};
use seam_core::demo::{DemoCallback, DemoRecord};

use crate::array::SeamU8Array;
use crate::types::{bool_to_c, c_to_bool};

/// Function-pointer bundle for one host callback instance
#[repr(C)]
#[derive(Clone)]
pub struct SeamCallback {
    /// Host-side instance this bundle routes to
    pub index: i64,
    /// 8-bit unsigned slot
    pub on_u8: extern "C" fn(i64, u8) -> u8,
    /// 8-bit signed slot
    pub on_i8: extern "C" fn(i64, i8) -> i8,
    /// 16-bit signed slot
    pub on_i16: extern "C" fn(i64, i16) -> i16,
    /// 16-bit unsigned slot
    pub on_u16: extern "C" fn(i64, u16) -> u16,
    /// 32-bit signed slot
    pub on_i32: extern "C" fn(i64, i32) -> i32,
    /// 32-bit unsigned slot
    pub on_u32: extern "C" fn(i64, u32) -> u32,
    /// 64-bit signed slot
    pub on_i64: extern "C" fn(i64, i64) -> i64,
    /// 64-bit unsigned slot
    pub on_u64: extern "C" fn(i64, u64) -> u64,
    /// Single-precision float slot
    pub on_f32: extern "C" fn(i64, f32) -> f32,
    /// Double-precision float slot
    pub on_f64: extern "C" fn(i64, f64) -> f64,
    /// Boolean slot; 0/1 in, 0/1 out
    pub on_flag: extern "C" fn(i64, i32) -> i32,
    /// String slot; the argument is borrowed for the call, the returned
    /// string is host-allocated and handed back through `free_ptr`
    pub on_text: extern "C" fn(i64, *const c_char) -> *mut c_char,
    /// Byte-vector slot; both directions carry their own reclaim function
    pub on_bytes: extern "C" fn(i64, SeamU8Array) -> SeamU8Array,
    /// Structured-value slot; the argument is an opaque payload borrowed
    /// for the call
    pub on_record: extern "C" fn(i64, *const c_char) -> i32,
    /// Fire-and-forget slot
    pub on_done: extern "C" fn(i64),
    /// Release slot; called exactly once when native code will never
    /// invoke this bundle again
    pub free_callback: extern "C" fn(i64),
    /// Reclaim slot for host-owned buffers the native side must hand back
    pub free_ptr: extern "C" fn(*mut u8, usize, usize),
}

/// A host callback bundle wrapped as a native trait object
pub(crate) struct HostCallback {
    model: SeamCallback,
}

impl HostCallback {
    pub(crate) fn new(model: SeamCallback) -> Self {
        HostCallback { model }
    }

    fn with_c_text<R>(&self, value: &str, f: impl FnOnce(*const c_char) -> R) -> R {
        // Interior NULs cannot cross as C text; an empty string is the
        // defined substitute.
        let c_value = CString::new(value).unwrap_or_else(|_| CString::new("").unwrap());
        let raw = c_value.into_raw();
        let result = f(raw);
        // The host borrowed the pointer only for the duration of the call.
        unsafe { drop(CString::from_raw(raw)) };
        result
    }

    /// Copy a host-allocated string out and hand the allocation back
    /// through the bundle's reclaim slot.
    fn intake_host_text(&self, raw: *mut c_char) -> String {
        if raw.is_null() {
            return String::new();
        }
        let c_str = unsafe { CStr::from_ptr(raw) };
        let text = c_str.to_string_lossy().into_owned();
        let bytes_with_nul = c_str.to_bytes_with_nul().len();
        (self.model.free_ptr)(raw as *mut u8, bytes_with_nul, bytes_with_nul);
        text
    }
}

impl DemoCallback for HostCallback {
    fn on_u8(&self, value: u8) -> u8 {
        (self.model.on_u8)(self.model.index, value)
    }

    fn on_i8(&self, value: i8) -> i8 {
        (self.model.on_i8)(self.model.index, value)
    }

    fn on_i16(&self, value: i16) -> i16 {
        (self.model.on_i16)(self.model.index, value)
    }

    fn on_u16(&self, value: u16) -> u16 {
        (self.model.on_u16)(self.model.index, value)
    }

    fn on_i32(&self, value: i32) -> i32 {
        (self.model.on_i32)(self.model.index, value)
    }

    fn on_u32(&self, value: u32) -> u32 {
        (self.model.on_u32)(self.model.index, value)
    }

    fn on_i64(&self, value: i64) -> i64 {
        (self.model.on_i64)(self.model.index, value)
    }

    fn on_u64(&self, value: u64) -> u64 {
        (self.model.on_u64)(self.model.index, value)
    }

    fn on_f32(&self, value: f32) -> f32 {
        (self.model.on_f32)(self.model.index, value)
    }

    fn on_f64(&self, value: f64) -> f64 {
        (self.model.on_f64)(self.model.index, value)
    }

    fn on_flag(&self, value: bool) -> bool {
        c_to_bool((self.model.on_flag)(self.model.index, bool_to_c(value)))
    }

    fn on_text(&self, value: &str) -> String {
        let returned = self.with_c_text(value, |raw| (self.model.on_text)(self.model.index, raw));
        self.intake_host_text(returned)
    }

    fn on_bytes(&self, value: &[u8]) -> Vec<u8> {
        let returned = (self.model.on_bytes)(self.model.index, SeamU8Array::from(value.to_vec()));
        unsafe { returned.consume() }
    }

    fn on_record(&self, value: DemoRecord) -> i32 {
        match codec::encode(&JsonCodec, &value) {
            Ok(payload) => {
                self.with_c_text(&payload, |raw| (self.model.on_record)(self.model.index, raw))
            }
            Err(error) => {
                log::warn!("record for callback {} did not encode: {error}", self.model.index);
                0
            }
        }
    }

    fn on_done(&self) {
        (self.model.on_done)(self.model.index);
    }
}

impl Drop for HostCallback {
    fn drop(&mut self) {
        (self.model.free_callback)(self.model.index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    static LAST_INDEX: AtomicI64 = AtomicI64::new(0);
    static RELEASED: AtomicI64 = AtomicI64::new(0);

    extern "C" fn echo_u8(index: i64, value: u8) -> u8 {
        LAST_INDEX.store(index, Ordering::SeqCst);
        value
    }
    extern "C" fn echo_i8(_: i64, value: i8) -> i8 {
        value
    }
    extern "C" fn echo_i16(_: i64, value: i16) -> i16 {
        value
    }
    extern "C" fn echo_u16(_: i64, value: u16) -> u16 {
        value
    }
    extern "C" fn echo_i32(_: i64, value: i32) -> i32 {
        value
    }
    extern "C" fn echo_u32(_: i64, value: u32) -> u32 {
        value
    }
    extern "C" fn echo_i64(_: i64, value: i64) -> i64 {
        value
    }
    extern "C" fn echo_u64(_: i64, value: u64) -> u64 {
        value
    }
    extern "C" fn echo_f32(_: i64, value: f32) -> f32 {
        value
    }
    extern "C" fn echo_f64(_: i64, value: f64) -> f64 {
        value
    }
    extern "C" fn echo_flag(_: i64, value: i32) -> i32 {
        value
    }
    extern "C" fn echo_text(_: i64, value: *const c_char) -> *mut c_char {
        let text = unsafe { CStr::from_ptr(value) }.to_str().unwrap();
        CString::new(text).unwrap().into_raw()
    }
    extern "C" fn echo_bytes(_: i64, value: SeamU8Array) -> SeamU8Array {
        let values = unsafe { value.consume() };
        SeamU8Array::from(values)
    }
    extern "C" fn record_len(_: i64, payload: *const c_char) -> i32 {
        unsafe { CStr::from_ptr(payload) }.to_bytes().len() as i32
    }
    extern "C" fn noop(_: i64) {}
    extern "C" fn noop_release(_: i64) {}
    extern "C" fn record_release(index: i64) {
        RELEASED.store(index, Ordering::SeqCst);
    }
    extern "C" fn host_free(ptr: *mut u8, _len: usize, _cap: usize) {
        // The simulated host allocates its strings as CStrings.
        unsafe { drop(CString::from_raw(ptr as *mut c_char)) };
    }

    fn test_bundle(index: i64) -> SeamCallback {
        SeamCallback {
            index,
            on_u8: echo_u8,
            on_i8: echo_i8,
            on_i16: echo_i16,
            on_u16: echo_u16,
            on_i32: echo_i32,
            on_u32: echo_u32,
            on_i64: echo_i64,
            on_u64: echo_u64,
            on_f32: echo_f32,
            on_f64: echo_f64,
            on_flag: echo_flag,
            on_text: echo_text,
            on_bytes: echo_bytes,
            on_record: record_len,
            on_done: noop,
            free_callback: noop_release,
            free_ptr: host_free,
        }
    }

    #[test]
    fn test_slots_receive_the_index_first() {
        let callback = HostCallback::new(test_bundle(7));
        assert_eq!(callback.on_u8(5), 5);
        assert_eq!(LAST_INDEX.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_text_round_trip_reclaims_host_allocation() {
        let callback = HostCallback::new(test_bundle(1));
        assert_eq!(callback.on_text("ping"), "ping");
        assert_eq!(callback.on_text(""), "");
    }

    #[test]
    fn test_bytes_round_trip() {
        let callback = HostCallback::new(test_bundle(2));
        assert_eq!(callback.on_bytes(&[1, 2, 3]), vec![1, 2, 3]);
    }

    #[test]
    fn test_drop_releases_exactly_once() {
        RELEASED.store(0, Ordering::SeqCst);
        let mut bundle = test_bundle(99);
        bundle.free_callback = record_release;
        let callback = HostCallback::new(bundle);
        drop(callback);
        assert_eq!(RELEASED.load(Ordering::SeqCst), 99);
    }
}
