//! # sharebite-auth
//!
//! Identity verification for ShareBite. Bearer tokens are minted by the
//! external identity provider; this crate only validates them and
//! surfaces the verified principal, which is all the rest of the system
//! ever consumes.

pub mod claims;
pub mod verifier;

pub use claims::Claims;
pub use verifier::IdentityVerifier;
