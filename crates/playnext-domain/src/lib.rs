//! Domain types shared across PlayNext crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod backlog;
pub mod game;
pub mod pagination;
pub mod score;
