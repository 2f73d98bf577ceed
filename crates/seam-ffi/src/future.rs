//! Future handles
//!
//! A pending native computation crosses the boundary as a bundle holding
//! an opaque index and a non-blocking poll slot. The host polls until it
//! observes a terminal state, then releases the handle; the value is
//! written through an out-pointer only when the state is `Ready`, and
//! failure detail travels through the last-error channel.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::array::seam_u8_array_free;
use crate::error::map_core_error;
use crate::memory::set_last_error;
use crate::objects::{seam_handle_release, with_status_future, BoundaryObject, OBJECTS};
use crate::types::SeamFutureState;
use seam_core::{BridgeFuture, FuturePoll};

/// Handle for a pending native computation resolving to an i32
#[repr(C)]
pub struct SeamStatusFuture {
    /// Native-side state this bundle addresses
    pub index: i64,
    /// Non-blocking probe; writes the value through the out-pointer only
    /// when returning `Ready`
    pub poll: extern "C" fn(i64, *mut i32) -> SeamFutureState,
    /// Release slot; the handle must not be polled afterwards
    pub free_callback: extern "C" fn(i64),
    /// Reclaim slot for native-owned byte buffers
    pub free_ptr: extern "C" fn(*mut u8, usize, usize),
}

/// Register a core future and build the bundle addressing it
pub(crate) fn status_future_model(future: BridgeFuture<i32>) -> SeamStatusFuture {
    let index = OBJECTS.insert(BoundaryObject::StatusFuture(future));
    SeamStatusFuture {
        index,
        poll: poll_status,
        free_callback: seam_handle_release,
        free_ptr: seam_u8_array_free,
    }
}

extern "C" fn poll_status(index: i64, out_value: *mut i32) -> SeamFutureState {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        if out_value.is_null() {
            set_last_error("poll out-value pointer is null");
            return SeamFutureState::Failed;
        }

        let polled = with_status_future(index, |future| future.poll());
        match polled {
            Ok(FuturePoll::Pending) => SeamFutureState::Pending,
            Ok(FuturePoll::Ready(value)) => {
                unsafe { *out_value = value };
                SeamFutureState::Ready
            }
            Ok(FuturePoll::Failed(error)) => {
                set_last_error(error.to_string());
                SeamFutureState::Failed
            }
            Err(error) => {
                // Dead or mismatched index; typed failure rather than unwinding.
                map_core_error(&error);
                SeamFutureState::Failed
            }
        }
    }));
    outcome.unwrap_or(SeamFutureState::Failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seam_core::Error;
    use std::time::Duration;

    fn poll_until_terminal(model: &SeamStatusFuture) -> (SeamFutureState, i32) {
        let mut value = 0;
        for _ in 0..200 {
            match (model.poll)(model.index, &mut value) {
                SeamFutureState::Pending => std::thread::sleep(Duration::from_millis(5)),
                state => return (state, value),
            }
        }
        panic!("future never reached a terminal state");
    }

    #[test]
    fn test_ready_future_writes_the_value() {
        let model = status_future_model(BridgeFuture::ready(204));
        let (state, value) = poll_until_terminal(&model);
        assert_eq!(state, SeamFutureState::Ready);
        assert_eq!(value, 204);

        // Terminal reads are idempotent.
        let (state, value) = poll_until_terminal(&model);
        assert_eq!(state, SeamFutureState::Ready);
        assert_eq!(value, 204);

        (model.free_callback)(model.index);
    }

    #[test]
    fn test_failed_future_sets_the_error_channel() {
        crate::memory::clear_last_error();
        let model = status_future_model(BridgeFuture::failed(Error::worker("backend gone")));
        let (state, _) = poll_until_terminal(&model);
        assert_eq!(state, SeamFutureState::Failed);
        assert!(!crate::memory::seam_last_error_message().is_null());
        crate::memory::clear_last_error();

        (model.free_callback)(model.index);
    }

    #[test]
    fn test_poll_after_release_is_a_typed_failure() {
        let model = status_future_model(BridgeFuture::ready(1));
        (model.free_callback)(model.index);

        let mut value = 0;
        let state = (model.poll)(model.index, &mut value);
        assert_eq!(state, SeamFutureState::Failed);
        crate::memory::clear_last_error();
    }

    #[test]
    fn test_null_out_pointer_is_rejected() {
        let model = status_future_model(BridgeFuture::ready(1));
        let state = (model.poll)(model.index, std::ptr::null_mut());
        assert_eq!(state, SeamFutureState::Failed);
        crate::memory::clear_last_error();

        (model.free_callback)(model.index);
    }
}
