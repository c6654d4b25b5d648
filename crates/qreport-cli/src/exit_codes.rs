//! Process exit codes. Stable across releases; CI scripts branch on them.

use qreport_core::{ErrorKind, QualityError};

pub const SUCCESS: i32 = 0;
pub const GENERAL_ERROR: i32 = 1; // Anything not raised by the pipeline itself
pub const MISSING_INPUT: i32 = 2; // Required file absent
pub const MALFORMED_INPUT: i32 = 3; // Input present but unparsable
pub const IO_ERROR: i32 = 4; // Write/render failure

pub fn for_kind(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::MissingInput => MISSING_INPUT,
        ErrorKind::MalformedInput => MALFORMED_INPUT,
        ErrorKind::Io => IO_ERROR,
    }
}

/// Exit code for a command failure, looking through any added context.
pub fn for_error(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|e| e.downcast_ref::<QualityError>())
        .map(|q| for_kind(q.kind()))
        .unwrap_or(GENERAL_ERROR)
}
