//! Error handling at the boundary
//!
//! Failures on the native side must reach the host as typed status codes,
//! never as unwinding: a panic crossing an `extern "C"` frame is undefined
//! behavior. Every entry point body runs under [`catch_panic`], and core
//! errors are folded to [`SeamStatus`] codes with detail recorded in the
//! last-error channel.

use std::any::Any;
use std::panic;

use crate::memory::set_last_error;
use crate::types::SeamStatus;

/// Convert a core error to a boundary status code, recording detail
pub fn map_core_error(error: &seam_core::Error) -> SeamStatus {
    use seam_core::Error;

    set_last_error(error.to_string());
    match error {
        Error::Decode { .. } | Error::Encode { .. } => SeamStatus::DecodeError,
        Error::UnknownHandle { .. } => SeamStatus::UnknownHandle,
        Error::HandleKind { .. } => SeamStatus::KindMismatch,
        Error::InvalidArgument { .. } => SeamStatus::InvalidArgument,
        Error::Worker { .. } => SeamStatus::WorkerError,
    }
}

/// Safely execute a closure that might panic.
///
/// Any panic is converted to [`SeamStatus::Panic`] with its message in the
/// last-error channel, so nothing unwinds past the entry point.
pub fn catch_panic<F, R>(f: F) -> Result<R, SeamStatus>
where
    F: FnOnce() -> Result<R, SeamStatus> + panic::UnwindSafe,
{
    match panic::catch_unwind(f) {
        Ok(result) => result,
        Err(panic_info) => {
            set_last_error(format!("panic contained: {}", panic_message(&panic_info)));
            Err(SeamStatus::Panic)
        }
    }
}

fn panic_message(panic_info: &Box<dyn Any + Send>) -> String {
    if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic_info.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    }
}

/// Macro wrapping an entry point body in panic containment.
///
/// The body evaluates to `Result<SeamStatus, SeamStatus>`; either arm
/// becomes the returned code.
#[macro_export]
macro_rules! ffi_boundary {
    ($body:expr) => {{
        match $crate::error::catch_panic(|| $body) {
            Ok(status) => status,
            Err(code) => code,
        }
    }};
}

/// Validate that a pointer argument is non-null
pub fn validate_ptr<T>(ptr: *const T, name: &str) -> Result<(), SeamStatus> {
    if ptr.is_null() {
        set_last_error(format!("{name} is null"));
        Err(SeamStatus::NullPointer)
    } else {
        Ok(())
    }
}

/// Validate that a mutable pointer argument is non-null
pub fn validate_mut_ptr<T>(ptr: *mut T, name: &str) -> Result<(), SeamStatus> {
    validate_ptr(ptr as *const T, name)
}
