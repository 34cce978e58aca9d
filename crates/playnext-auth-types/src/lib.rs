//! Auth types shared by PlayNext services.
//!
//! Provides JWT validation and the `BearerIdentity` extractor.

pub mod identity;
pub mod token;
