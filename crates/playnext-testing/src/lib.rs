//! Test utilities for PlayNext services.
//!
//! Provides `MockAuth` token minting and the fixture loader.
//! Import from tests only, never from production code.

pub mod auth;
pub mod fixture;
