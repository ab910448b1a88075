//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Validation error - missing settings or invalid input
pub const VALIDATION_ERROR: i32 = 2;

/// API error - the Buddy API rejected the request or was unreachable
pub const API_ERROR: i32 = 3;

/// Not found - the requested variable or member does not exist
pub const NOT_FOUND: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;
