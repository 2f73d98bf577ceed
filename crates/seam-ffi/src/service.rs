//! Service capability handles
//!
//! A service is constructed natively and handed to the host as a bundle of
//! operation function pointers plus the opaque index of its internal
//! state. The host consumes the service only through those slots and
//! finally calls the release slot, after which no operation may be
//! invoked. Operations follow the boundary's argument/return conventions:
//! strings are borrowed for the call, listeners arrive as callback
//! bundles, and asynchronous results leave as future handles.

use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use seam_core::{BridgeFuture, Error, ServiceHolder, UploadProgress};

use crate::array::seam_u8_array_free;
use crate::error::map_core_error;
use crate::future::{status_future_model, SeamStatusFuture};
use crate::memory::c_str_to_string;
use crate::objects::{seam_handle_release, with_login, with_upload, BoundaryObject, OBJECTS};
use crate::types::SeamFutureState;

/// Host-supplied progress listener bundle
#[repr(C)]
#[derive(Clone)]
pub struct SeamUploadProgress {
    /// Host-side instance this bundle routes to
    pub index: i64,
    /// Progress slot: task id, bytes sent, bytes total
    pub on_progress: extern "C" fn(i64, i64, i64, i64),
    /// Release slot; called exactly once when the upload stops reporting
    pub free_callback: extern "C" fn(i64),
    /// Reclaim slot for host-owned buffers
    pub free_ptr: extern "C" fn(*mut u8, usize, usize),
}

/// Login capability bundle
#[repr(C)]
pub struct SeamLoginService {
    /// Native-side state this bundle addresses
    pub index: i64,
    /// Start a login attempt; both strings are borrowed for the call and
    /// the result arrives as a future handle
    pub login: extern "C" fn(i64, *const c_char, *const c_char) -> SeamStatusFuture,
    /// Release slot; operations must not be invoked afterwards
    pub free_callback: extern "C" fn(i64),
    /// Reclaim slot for native-owned byte buffers
    pub free_ptr: extern "C" fn(*mut u8, usize, usize),
}

/// Upload capability bundle
#[repr(C)]
pub struct SeamUploadService {
    /// Native-side state this bundle addresses
    pub index: i64,
    /// Start an upload; returns the task id immediately, progress arrives
    /// through the listener bundle until the task finishes
    pub upload: extern "C" fn(i64, *const c_char, SeamUploadProgress) -> i64,
    /// Release slot; operations must not be invoked afterwards
    pub free_callback: extern "C" fn(i64),
    /// Reclaim slot for native-owned byte buffers
    pub free_ptr: extern "C" fn(*mut u8, usize, usize),
}

/// Construct a login service and hand out its capability bundle.
///
/// The returned handle owns one registry entry; the host releases it
/// through the bundle's `free_callback` slot exactly once.
#[no_mangle]
pub extern "C" fn seam_login_service_new() -> SeamLoginService {
    let outcome = catch_unwind(|| {
        OBJECTS.insert(BoundaryObject::Login(ServiceHolder::login_service()))
    });
    SeamLoginService {
        // Index 0 is never handed out; operations on it poll as typed
        // failures.
        index: outcome.unwrap_or(0),
        login: login_slot,
        free_callback: seam_handle_release,
        free_ptr: seam_u8_array_free,
    }
}

/// Construct an upload service and hand out its capability bundle.
#[no_mangle]
pub extern "C" fn seam_upload_service_new() -> SeamUploadService {
    let outcome = catch_unwind(|| {
        OBJECTS.insert(BoundaryObject::Upload(ServiceHolder::upload_service()))
    });
    SeamUploadService {
        index: outcome.unwrap_or(0),
        upload: upload_slot,
        free_callback: seam_handle_release,
        free_ptr: seam_u8_array_free,
    }
}

extern "C" fn login_slot(
    index: i64,
    user_name: *const c_char,
    password: *const c_char,
) -> SeamStatusFuture {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let future = login_future(index, user_name, password);
        status_future_model(future)
    }));
    // A failure this late cannot allocate a registry entry; index 0 is
    // never handed out, so the handle polls as a typed failure.
    outcome.unwrap_or_else(|_| SeamStatusFuture {
        index: 0,
        poll: dead_poll,
        free_callback: seam_handle_release,
        free_ptr: seam_u8_array_free,
    })
}

extern "C" fn dead_poll(_index: i64, _out_value: *mut i32) -> SeamFutureState {
    SeamFutureState::Failed
}

fn login_future(index: i64, user_name: *const c_char, password: *const c_char) -> BridgeFuture<i32> {
    let user_name = match unsafe { c_str_to_string(user_name) } {
        Ok(text) => text,
        Err(_) => return BridgeFuture::failed(Error::invalid_argument("user_name string")),
    };
    let password = match unsafe { c_str_to_string(password) } {
        Ok(text) => text,
        Err(_) => return BridgeFuture::failed(Error::invalid_argument("password string")),
    };

    match with_login(index, |service| service.login(&user_name, &password)) {
        Ok(future) => future,
        Err(error) => {
            map_core_error(&error);
            BridgeFuture::failed(error)
        }
    }
}

extern "C" fn upload_slot(index: i64, path: *const c_char, listener: SeamUploadProgress) -> i64 {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        // Wrap first: the listener's release slot must fire even when the
        // call fails before starting any work.
        let listener: Box<dyn UploadProgress> = Box::new(HostProgress { model: listener });

        let path = match unsafe { c_str_to_string(path) } {
            Ok(text) => text,
            Err(_) => return -1,
        };

        match with_upload(index, |service| service.upload(&path, listener)) {
            Ok(task_id) => task_id,
            Err(error) => {
                map_core_error(&error);
                -1
            }
        }
    }));
    outcome.unwrap_or(-1)
}

/// A host progress bundle wrapped as a native trait object
struct HostProgress {
    model: SeamUploadProgress,
}

impl UploadProgress for HostProgress {
    fn on_progress(&self, id: i64, sent: i64, total: i64) {
        (self.model.on_progress)(self.model.index, id, sent, total);
    }
}

impl Drop for HostProgress {
    fn drop(&mut self) {
        (self.model.free_callback)(self.model.index);
    }
}
