//! # Scribe MI Core
//!
//! Session lifecycle and transfer-integrity rules - no HTTP.
//!
//! This crate contains:
//! - The credential store and session manager state machine
//! - Port interfaces for the identity provider and request signer
//! - Integrity checks applied to downloaded models
//!
//! ## Architecture Principles
//! - Depends only on `scribe-mi-common` and `scribe-mi-domain`
//! - All external capabilities via traits
//! - Transports bind credentials to requests; they never perform I/O

pub mod session;
pub mod transfer;

#[cfg(any(feature = "test-utils", test))]
pub mod testing;

// Re-export specific items to avoid ambiguity
pub use session::credential_store::{CredentialStore, Credentials};
pub use session::manager::SessionManager;
pub use session::ports::{IdentityProvider, RequestSigner, SignableRequest, SigningScope};
pub use session::transport::{SessionTransport, TransportStrategy};
pub use transfer::{decode_model, model_location, strip_tag_quotes, upload_checksum, verify_download};
