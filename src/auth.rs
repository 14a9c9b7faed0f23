//! Credential pairs, redacted secrets, and verifier values.

pub mod credentials;
pub mod secret;
pub mod verifier;

pub use credentials::*;
pub use secret::*;
pub use verifier::*;
