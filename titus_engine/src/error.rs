//! Error types for the Titus engine
//!
//! This module defines the error types used throughout the engine,
//! covering GPU allocation, buffer access and resource loading.

use std::fmt;

/// Result type for Titus engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Titus engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// The device could not satisfy a buffer allocation (size/usage/residency)
    Allocation(String),

    /// A map was requested on memory that is not host-visible
    Mapping(String),

    /// A byte-range write fell outside the buffer's extent
    OutOfBounds {
        /// Requested start offset in bytes
        offset: u64,
        /// Requested write length in bytes
        len: u64,
        /// Buffer size in bytes
        size: u64,
    },

    /// A per-instance update targeted an index past the array's capacity
    IndexOutOfRange {
        /// Requested instance index
        index: u32,
        /// Array capacity
        capacity: u32,
    },

    /// A resource file could not be opened or read
    ResourceLoad(String),

    /// A resource manifest was malformed or missing its type field
    ResourceParse(String),

    /// No loader is registered for a manifest's declared type
    UnknownResourceType(String),

    /// The device refused to create a native object (pool, set, pipeline, ...)
    DeviceObjectCreation(String),

    /// Backend-specific error (command recording, submission, misuse)
    Backend(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Allocation(msg) => write!(f, "Allocation failed: {}", msg),
            Error::Mapping(msg) => write!(f, "Mapping failed: {}", msg),
            Error::OutOfBounds { offset, len, size } => write!(
                f,
                "Buffer write out of bounds: [{}, {}) exceeds size {}",
                offset,
                offset + len,
                size
            ),
            Error::IndexOutOfRange { index, capacity } => write!(
                f,
                "Instance index {} out of range (capacity {})",
                index, capacity
            ),
            Error::ResourceLoad(msg) => write!(f, "Resource load failed: {}", msg),
            Error::ResourceParse(msg) => write!(f, "Resource parse failed: {}", msg),
            Error::UnknownResourceType(tag) => {
                write!(f, "No loader registered for resource type '{}'", tag)
            }
            Error::DeviceObjectCreation(msg) => {
                write!(f, "Device object creation failed: {}", msg)
            }
            Error::Backend(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
