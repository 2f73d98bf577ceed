//! Seam Core - boundary protocol engine for managed-host interop
//!
//! This crate holds the host-agnostic half of the Seam boundary: the
//! machinery that lets a garbage-collected host environment call into a
//! Rust library (and receive calls back) without either side leaking,
//! double-freeing, or using memory after the other side reclaimed it.
//!
//! # Main Components
//!
//! - **Error Handling**: typed, recoverable failures using `thiserror`
//! - **Opaque Value Codec**: pluggable serialization for structured values
//! - **Registry**: index-addressed arena for objects shared by handle
//! - **Future Bridge**: non-blocking observation of background work
//! - **Services**: demonstration capabilities (login, upload)
//!
//! The C ABI itself lives in the companion `seam-ffi` crate.
//!
//! # Example
//!
//! ```
//! use seam_core::{codec, codec::JsonCodec, Registry};
//!
//! let registry = Registry::new();
//! let index = registry.insert("live object".to_string());
//! assert!(registry.contains(index));
//!
//! let payload = codec::encode(&JsonCodec, &vec![1, 2, 3]).unwrap();
//! let back: Vec<i32> = codec::decode(&JsonCodec, &payload).unwrap();
//! assert_eq!(back, vec![1, 2, 3]);
//! ```

pub mod codec;
pub mod demo;
pub mod error;
pub mod future;
pub mod registry;
mod runtime;
pub mod service;

pub use codec::{JsonCodec, PayloadCodec};
pub use error::{Error, Result};
pub use future::{BridgeFuture, FuturePoll};
pub use registry::Registry;
pub use service::{
    Authenticator, LoginService, ServiceHolder, UploadProgress, UploadService, Uploader,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
