//! Native-held boundary objects
//!
//! Every native object the host addresses by handle (services, pending
//! futures) lives in one process-wide registry, exactly one entry per
//! handed-out index. The bundles embed [`seam_handle_release`] as their
//! release slot; calling it is the only thing that drops the entry and its
//! backing state.

use std::panic::{catch_unwind, AssertUnwindSafe};

use once_cell::sync::Lazy;
use seam_core::{BridgeFuture, Error, LoginService, Registry, Result, UploadService};

pub(crate) enum BoundaryObject {
    Login(Box<dyn LoginService>),
    Upload(Box<dyn UploadService>),
    StatusFuture(BridgeFuture<i32>),
}

pub(crate) static OBJECTS: Lazy<Registry<BoundaryObject>> = Lazy::new(Registry::new);

/// Dispatch against the login service under `index`
pub(crate) fn with_login<R>(index: i64, f: impl FnOnce(&dyn LoginService) -> R) -> Result<R> {
    OBJECTS
        .with(index, |object| match object {
            BoundaryObject::Login(service) => Ok(f(service.as_ref())),
            _ => Err(Error::HandleKind {
                index,
                expected: "login service",
            }),
        })?
}

/// Dispatch against the upload service under `index`
pub(crate) fn with_upload<R>(index: i64, f: impl FnOnce(&dyn UploadService) -> R) -> Result<R> {
    OBJECTS
        .with(index, |object| match object {
            BoundaryObject::Upload(service) => Ok(f(service.as_ref())),
            _ => Err(Error::HandleKind {
                index,
                expected: "upload service",
            }),
        })?
}

/// Dispatch against the status future under `index`
pub(crate) fn with_status_future<R>(
    index: i64,
    f: impl FnOnce(&BridgeFuture<i32>) -> R,
) -> Result<R> {
    OBJECTS
        .with(index, |object| match object {
            BoundaryObject::StatusFuture(future) => Ok(f(future)),
            _ => Err(Error::HandleKind {
                index,
                expected: "status future",
            }),
        })?
}

/// Release the native object under `index`.
///
/// Embedded as the `free_callback` slot of every native-produced bundle.
/// Must be called exactly once per handle; the native side never invokes a
/// released index again. A stray second call finds no entry and is a no-op.
#[no_mangle]
pub extern "C" fn seam_handle_release(index: i64) {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        OBJECTS.remove(index);
    }));
    if outcome.is_err() {
        log::error!("panic while releasing handle {index}");
    }
}

/// Number of live native-held handles.
///
/// A well-behaved host sees this return to its baseline after releasing
/// everything it was handed; harnesses use it to prove no entry dangles.
#[no_mangle]
pub extern "C" fn seam_live_handles() -> usize {
    catch_unwind(|| OBJECTS.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seam_core::ServiceHolder;

    #[test]
    fn test_release_is_idempotent_per_index() {
        let index = OBJECTS.insert(BoundaryObject::Login(ServiceHolder::login_service()));
        assert!(OBJECTS.contains(index));

        seam_handle_release(index);
        assert!(!OBJECTS.contains(index));
        // Second release of the same index touches nothing.
        seam_handle_release(index);
    }

    #[test]
    fn test_kind_mismatch_is_typed() {
        let index = OBJECTS.insert(BoundaryObject::StatusFuture(BridgeFuture::ready(0)));
        let err = with_login(index, |_| ()).unwrap_err();
        assert!(matches!(err, Error::HandleKind { .. }));
        seam_handle_release(index);
    }
}
