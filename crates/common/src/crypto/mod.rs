//! Integrity primitives used by file transfers.

pub mod checksum;

pub use checksum::{Checksum, ChecksumError};
