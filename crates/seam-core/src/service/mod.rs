//! Demonstration services exposed through capability handles
//!
//! A service is native state the host addresses through a bundle of
//! operation function pointers plus an opaque index; these traits are the
//! native half of that contract. Operations accept and return the other
//! boundary shapes: strings, listeners, futures.

mod login;
mod upload;

pub use login::Authenticator;
pub use upload::Uploader;

use crate::future::BridgeFuture;

/// Credential check producing an observable status code
pub trait LoginService: Send + Sync {
    /// Start a login attempt; the future resolves to an HTTP-style status
    /// code (200 accepted, 401 rejected).
    fn login(&self, user_name: &str, password: &str) -> BridgeFuture<i32>;
}

/// Host-supplied progress listener for a running upload
pub trait UploadProgress: Send + Sync {
    fn on_progress(&self, id: i64, sent: i64, total: i64);
}

/// Background upload returning a task id immediately
pub trait UploadService: Send + Sync {
    /// Start uploading `path`; progress is reported through `listener`
    /// until the task finishes. Returns the task id.
    fn upload(&self, path: &str, listener: Box<dyn UploadProgress>) -> i64;
}

/// Factory for the demonstration services
pub struct ServiceHolder;

impl ServiceHolder {
    pub fn login_service() -> Box<dyn LoginService> {
        Box::new(Authenticator::new())
    }

    pub fn upload_service() -> Box<dyn UploadService> {
        Box::new(Uploader::new())
    }
}
