//! Domain layer types and invariants.

pub mod blocks;
pub mod chips;
pub mod email;
pub mod error;
pub mod pages;
