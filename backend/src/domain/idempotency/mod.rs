//! Idempotency primitives for safe mutation retries.
//!
//! Mutations that accept an `Idempotency-Key` header store the first response
//! keyed by `(key, user, mutation type, payload hash)`:
//!
//! - [`IdempotencyKey`]: validated UUID supplied by the client.
//! - [`PayloadHash`]: SHA-256 hash of the canonicalized request payload, used
//!   to tell an honest retry apart from key reuse with a different payload.
//! - [`IdempotencyRecord`]: stored record linking a key to its payload hash
//!   and the response snapshot to replay.
//! - [`IdempotencyLookupResult`]: outcome of a store lookup.
//! - [`MutationType`]: discriminator isolating keys per operation kind.
//!
//! # Payload canonicalization
//!
//! So that semantically equal payloads hash identically regardless of key
//! order or whitespace, object keys are sorted recursively, the value is
//! serialized to compact JSON, and SHA-256 is computed over those bytes.

mod key;
mod mutation_type;
mod payload;
mod record;

pub use key::{IdempotencyKey, IdempotencyKeyValidationError};
pub use mutation_type::{MutationType, ParseMutationTypeError};
pub use payload::{PayloadHash, PayloadHashError, canonicalize_and_hash};
pub use record::{IdempotencyLookupQuery, IdempotencyLookupResult, IdempotencyRecord};
