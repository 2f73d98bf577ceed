//! Seam FFI - the C ABI boundary for managed-host interop
//!
//! This crate is the native side of the Seam boundary: a C-compatible
//! surface through which a managed host environment (garbage collection or
//! automatic reference counting) exchanges typed buffers, strings, opaque
//! payloads, callback bundles, futures, and service capabilities with a
//! Rust library.
//!
//! Three rules hold everywhere:
//! - nothing crosses without a matching reclaim path: buffers carry their
//!   reclaim function inside the value, strings have a dedicated reclaim
//!   entry point, and every handle has a release slot that fires exactly
//!   once;
//! - objects are addressed by opaque index, never by a pointer into the
//!   other side's memory;
//! - nothing unwinds across the boundary: every entry point converts
//!   failure to a typed status code, with detail in the per-thread
//!   last-error message.

#![warn(missing_docs)]

use std::os::raw::c_char;

pub mod array;
pub mod callback;
pub mod demo;
pub mod error;
pub mod future;
pub mod memory;
pub mod objects;
pub mod service;
pub mod types;

pub use array::{
    SeamF32Array, SeamF64Array, SeamI16Array, SeamI32Array, SeamI64Array, SeamI8Array,
    SeamU16Array, SeamU32Array, SeamU64Array, SeamU8Array,
};
pub use callback::SeamCallback;
pub use future::SeamStatusFuture;
pub use memory::{seam_clear_last_error, seam_last_error_message, seam_string_free};
pub use objects::{seam_handle_release, seam_live_handles};
pub use service::{
    seam_login_service_new, seam_upload_service_new, SeamLoginService, SeamUploadProgress,
    SeamUploadService,
};
pub use types::{SeamFutureState, SeamStatus};

/// Get version information.
///
/// The returned string is static and must NOT be freed.
#[no_mangle]
pub extern "C" fn seam_version() -> *const c_char {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"), "\0").as_ptr()
        as *const c_char
}
