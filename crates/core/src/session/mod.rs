//! Authenticated session lifecycle
//!
//! `UNINITIALIZED -> authenticate -> AUTHENTICATED`; an expired credential
//! is renewed once by `ensure_fresh`. A failed renewal leaves the previous
//! credentials in place and the caller must authenticate again.

pub mod credential_store;
pub mod manager;
pub mod ports;
pub mod transport;
