//! FFI-safe type definitions
//!
//! All types in this module are designed to be safely passed across
//! the boundary with C ABI compatibility.

/// Result codes for boundary operations
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeamStatus {
    /// Operation completed successfully
    Ok = 0,
    /// Null pointer provided where non-null is required
    NullPointer = -1,
    /// Input string was not valid UTF-8
    Utf8Error = -2,
    /// An opaque payload could not be decoded
    DecodeError = -3,
    /// Caller-supplied argument violated the boundary contract
    InvalidArgument = -4,
    /// An opaque index resolved to no live object
    UnknownHandle = -5,
    /// An opaque index resolved to an object of another kind
    KindMismatch = -6,
    /// Memory allocation failed
    MemoryError = -7,
    /// Background work backing a future failed
    WorkerError = -8,
    /// A panic was contained at the boundary
    Panic = -9,
    /// Internal error
    InternalError = -99,
}

impl SeamStatus {
    /// Check whether the code indicates success
    pub fn is_ok(self) -> bool {
        self == SeamStatus::Ok
    }

    /// Get a human-readable description of the code
    pub fn message(self) -> &'static str {
        match self {
            SeamStatus::Ok => "Success",
            SeamStatus::NullPointer => "Null pointer provided",
            SeamStatus::Utf8Error => "Invalid UTF-8 string",
            SeamStatus::DecodeError => "Payload decode failed",
            SeamStatus::InvalidArgument => "Invalid argument",
            SeamStatus::UnknownHandle => "No live object under index",
            SeamStatus::KindMismatch => "Object kind mismatch",
            SeamStatus::MemoryError => "Memory allocation failed",
            SeamStatus::WorkerError => "Background work failed",
            SeamStatus::Panic => "Panic contained at the boundary",
            SeamStatus::InternalError => "Internal error",
        }
    }
}

/// Observable state of a bridged future, as seen across the boundary
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeamFutureState {
    /// No terminal value yet; poll again
    Pending = 0,
    /// The out-value has been written; terminal
    Ready = 1,
    /// The work failed; detail is in the last-error message; terminal
    Failed = 2,
}

/// Booleans cross the boundary as 0/1 integers
pub fn bool_to_c(value: bool) -> i32 {
    i32::from(value)
}

/// Any nonzero integer reads back as true
pub fn c_to_bool(value: i32) -> bool {
    value != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages() {
        assert!(SeamStatus::Ok.is_ok());
        assert!(!SeamStatus::UnknownHandle.is_ok());
        assert_eq!(SeamStatus::DecodeError.message(), "Payload decode failed");
    }

    #[test]
    fn test_bool_round_trip() {
        assert_eq!(bool_to_c(true), 1);
        assert_eq!(bool_to_c(false), 0);
        assert!(c_to_bool(1));
        assert!(c_to_bool(-7));
        assert!(!c_to_bool(0));
    }
}
