//! UUID-shape utilities.
//!
//! OpenMRS addresses every resource (patient, person, concept, location, ...) by a UUID string.
//! Users on the command line, however, usually type human identifiers such as a patient
//! identifier (`100-8`) or a concept code (`5089`). The client needs a cheap, purely syntactic way
//! to tell the two apart so that already-resolved references skip the lookup round trip.
//!
//! ## UUID shape
//! A string is *UUID-shaped* when:
//! - Length: 32 to 36 characters (inclusive)
//! - Characters: `0-9`, `a-f`, `A-F` and `-` only
//!
//! Examples:
//! - `550e8400-e29b-41d4-a716-446655440000` (hyphenated)
//! - `550e8400e29b41d4a716446655440000` (simple)
//! - `1067AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA` (CIEL-style concept UUID, not RFC 4122)
//!
//! Notes:
//! - The check is deliberately looser than RFC 4122. OpenMRS concept dictionaries ship UUIDs such
//!   as `5089AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA` that an RFC 4122 parser rejects.
//! - A UUID-shaped value is passed to the server verbatim; no case or hyphen normalisation.

mod service;

// Re-export public types
pub use service::ResourceUuid;

/// Error type for UUID operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for UUID operations.
pub type UuidResult<T> = Result<T, UuidError>;
